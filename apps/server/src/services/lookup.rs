//! Lookup service
//!
//! Owns the session scope for each lookup: acquires a read session from the
//! store, runs the resolver, and closes the session on every exit path.
//! Variant-generic operations are also exposed by [`LookupKind`] with JSON
//! output for the HTTP layer.

use pesp_lookup::{
    with_lookup_kind, AgreementDocument, ApplicantType, BeneficialOwnerType, LookupKind,
    LookupResolver, LookupSession, LookupStore, ProviderType, ServiceAssuranceExtType,
    ServiceAssuranceType,
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::{Error, Result};

#[derive(Clone)]
pub struct LookupService {
    store: Arc<dyn LookupStore>,
    resolver: LookupResolver,
}

impl LookupService {
    pub fn new(store: Arc<dyn LookupStore>) -> Self {
        Self {
            store,
            resolver: LookupResolver::new(),
        }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    async fn begin(&self) -> Result<Box<dyn LookupSession>> {
        Ok(self.store.begin_read().await?)
    }

    pub async fn provider_types(
        &self,
        applicant_type: Option<ApplicantType>,
    ) -> Result<Vec<ProviderType>> {
        let mut session = self.begin().await?;
        let result = self
            .resolver
            .get_provider_types(session.as_mut(), applicant_type)
            .await;
        finish(session, result).await
    }

    pub async fn required_documents(
        &self,
        provider_type_code: &str,
    ) -> Result<Vec<AgreementDocument>> {
        let mut session = self.begin().await?;
        let result = self
            .resolver
            .find_required_documents(session.as_mut(), provider_type_code)
            .await;
        finish(session, result).await
    }

    pub async fn beneficial_owner_types(
        &self,
        entity_structure: Option<&str>,
    ) -> Result<Vec<BeneficialOwnerType>> {
        let mut session = self.begin().await?;
        let result = self
            .resolver
            .find_beneficial_owner_types(session.as_mut(), entity_structure)
            .await;
        finish(session, result).await
    }

    pub async fn assured_service_types(
        &self,
        patient_ind: &str,
    ) -> Result<Vec<ServiceAssuranceType>> {
        let mut session = self.begin().await?;
        let result = self
            .resolver
            .find_assured_service_types(session.as_mut(), patient_ind)
            .await;
        finish(session, result).await
    }

    pub async fn assured_service_ext_types(
        &self,
        parent_code: &str,
    ) -> Result<Vec<ServiceAssuranceExtType>> {
        let mut session = self.begin().await?;
        let result = self
            .resolver
            .find_assured_service_ext_types(session.as_mut(), parent_code)
            .await;
        finish(session, result).await
    }

    pub async fn find_all(&self, kind: LookupKind) -> Result<Vec<JsonValue>> {
        let mut session = self.begin().await?;
        let result = with_lookup_kind!(kind, E => self
            .resolver
            .find_all::<E>(session.as_mut())
            .await
            .and_then(|rows| to_json_rows(&rows)));
        finish(session, result).await
    }

    pub async fn find_by_code(&self, kind: LookupKind, code: &str) -> Result<Option<JsonValue>> {
        let mut session = self.begin().await?;
        let result = with_lookup_kind!(kind, E => self
            .resolver
            .find_by_code::<E>(session.as_mut(), Some(code))
            .await
            .and_then(|row| row.as_ref().map(to_json).transpose()));
        finish(session, result).await
    }

    pub async fn find_by_description(
        &self,
        kind: LookupKind,
        description: Option<&str>,
    ) -> Result<Option<JsonValue>> {
        let mut session = self.begin().await?;
        let result = with_lookup_kind!(kind, E => self
            .resolver
            .find_by_description::<E>(session.as_mut(), description)
            .await
            .and_then(|row| row.as_ref().map(to_json).transpose()));
        finish(session, result).await
    }

    pub async fn find_related(
        &self,
        kind: LookupKind,
        provider_type_code: &str,
        relationship_type: &str,
    ) -> Result<Vec<JsonValue>> {
        let mut session = self.begin().await?;
        let result = with_lookup_kind!(kind, E => self
            .resolver
            .find_related::<E>(session.as_mut(), provider_type_code, relationship_type)
            .await
            .and_then(|rows| to_json_rows(&rows)));
        finish(session, result).await
    }
}

/// Close the session, then hand back the operation result
///
/// Sessions are read-only, so a failed close never changes the outcome: it is
/// logged and the operation's rows or error are returned as they are.
async fn finish<T>(
    session: Box<dyn LookupSession>,
    result: pesp_lookup::Result<T>,
) -> Result<T> {
    if let Err(close_err) = session.close().await {
        tracing::warn!(
            error = %close_err,
            operation_failed = result.is_err(),
            "Failed to close lookup session"
        );
    }
    result.map_err(Error::Lookup)
}

fn to_json<T: Serialize>(value: &T) -> pesp_lookup::Result<JsonValue> {
    serde_json::to_value(value).map_err(pesp_lookup::Error::store)
}

fn to_json_rows<T: Serialize>(rows: &[T]) -> pesp_lookup::Result<Vec<JsonValue>> {
    rows.iter().map(to_json).collect()
}
