//! Lookup resolution
//!
//! [`LookupResolver`] turns typed lookup requests into store queries and
//! enforces their cardinality contracts:
//! - code/description lookups return at most one row; more than one is an
//!   [`Error::IntegrityViolation`]
//! - relationship and filter lookups return any number of rows, including none
//! - beneficial owner types fall back to the full table when no structure
//!   matches or the structure has no configured owner types
//!
//! The resolver holds no state. Every operation runs inside a session the
//! caller acquired and will release.

use tracing::{debug, error};

use crate::models::{
    columns, relationship, AgreementDocument, ApplicantType, BeneficialOwnerType,
    EntityStructureType, HasRelationshipJoin, LookupEntity, ProviderType,
    ServiceAssuranceExtType, ServiceAssuranceType,
};
use crate::store::{LookupQuery, LookupSession, Predicate};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct LookupResolver;

impl LookupResolver {
    pub fn new() -> Self {
        Self
    }

    /// Provider types available to an applicant kind
    ///
    /// `None` returns every provider type.
    #[tracing::instrument(level = "debug", skip_all, fields(applicant_type = ?applicant_type))]
    pub async fn get_provider_types(
        &self,
        session: &mut dyn LookupSession,
        applicant_type: Option<ApplicantType>,
    ) -> Result<Vec<ProviderType>> {
        let filters = match applicant_type {
            Some(applicant) => vec![Predicate::int(columns::APPLICANT_TYPE, applicant.flag())],
            None => Vec::new(),
        };
        fetch_filtered(session, filters).await
    }

    /// Find the single entity with this exact description
    ///
    /// Blank input returns `None` without querying the store.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = %E::KIND, description = ?description))]
    pub async fn find_by_description<E: LookupEntity>(
        &self,
        session: &mut dyn LookupSession,
        description: Option<&str>,
    ) -> Result<Option<E>> {
        find_unique(session, columns::DESCRIPTION, description).await
    }

    /// Find the single entity with this exact code
    ///
    /// Blank input returns `None` without querying the store.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = %E::KIND, code = ?code))]
    pub async fn find_by_code<E: LookupEntity>(
        &self,
        session: &mut dyn LookupSession,
        code: Option<&str>,
    ) -> Result<Option<E>> {
        find_unique(session, columns::CODE, code).await
    }

    /// Entities of `E` related to a provider type under a relationship kind
    #[tracing::instrument(level = "debug", skip_all, fields(kind = %E::KIND, provider_type_code = %provider_type_code, relationship_type = %relationship_type))]
    pub async fn find_related<E: HasRelationshipJoin>(
        &self,
        session: &mut dyn LookupSession,
        provider_type_code: &str,
        relationship_type: &str,
    ) -> Result<Vec<E>> {
        fetch_related(session, columns::CODE, provider_type_code, Some(relationship_type)).await
    }

    /// Agreement documents configured for a provider type, of any relationship kind
    ///
    /// Settings name the document `type` here rather than its `code`.
    #[tracing::instrument(level = "debug", skip_all, fields(provider_type_code = %provider_type_code))]
    pub async fn find_required_documents(
        &self,
        session: &mut dyn LookupSession,
        provider_type_code: &str,
    ) -> Result<Vec<AgreementDocument>> {
        fetch_related(session, columns::DOCUMENT_TYPE, provider_type_code, None).await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(kind = %E::KIND))]
    pub async fn find_all<E: LookupEntity>(
        &self,
        session: &mut dyn LookupSession,
    ) -> Result<Vec<E>> {
        fetch_filtered(session, Vec::new()).await
    }

    /// Beneficial owner types allowed for an entity structure
    ///
    /// Falls back to every beneficial owner type when the structure
    /// description matches nothing, and also when the structure exists but
    /// has no owner types configured.
    // TODO: confirm with enrollment policy owners whether a structure with no
    // configured owner types should really allow every owner type.
    #[tracing::instrument(level = "debug", skip_all, fields(entity_structure = ?entity_structure_description))]
    pub async fn find_beneficial_owner_types(
        &self,
        session: &mut dyn LookupSession,
        entity_structure_description: Option<&str>,
    ) -> Result<Vec<BeneficialOwnerType>> {
        let structure: Option<EntityStructureType> = self
            .find_by_description(session, entity_structure_description)
            .await?;

        if let Some(structure) = &structure {
            let related: Vec<BeneficialOwnerType> = self
                .find_related(session, &structure.code, relationship::BENEFICIAL_OWNER_TYPE)
                .await?;
            if !related.is_empty() {
                return Ok(related);
            }
            debug!(
                structure_code = %structure.code,
                "No beneficial owner types configured for entity structure, returning all"
            );
        } else {
            debug!("Entity structure not found, returning all beneficial owner types");
        }

        self.find_all(session).await
    }

    /// Service assurance types for an in/out patient indicator
    #[tracing::instrument(level = "debug", skip_all, fields(patient_ind = %patient_ind))]
    pub async fn find_assured_service_types(
        &self,
        session: &mut dyn LookupSession,
        patient_ind: &str,
    ) -> Result<Vec<ServiceAssuranceType>> {
        fetch_filtered(session, vec![Predicate::text(columns::PATIENT_IND, patient_ind)]).await
    }

    /// Extended service assurance types under a parent service assurance code
    #[tracing::instrument(level = "debug", skip_all, fields(parent_code = %parent_code))]
    pub async fn find_assured_service_ext_types(
        &self,
        session: &mut dyn LookupSession,
        parent_code: &str,
    ) -> Result<Vec<ServiceAssuranceExtType>> {
        fetch_filtered(
            session,
            vec![Predicate::text(columns::SERVICE_ASSURANCE_CODE, parent_code)],
        )
        .await
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

async fn fetch_filtered<E: LookupEntity>(
    session: &mut dyn LookupSession,
    filters: Vec<Predicate>,
) -> Result<Vec<E>> {
    let rows = session
        .select(&LookupQuery::Select {
            table: E::TABLE,
            filters,
        })
        .await?;
    rows.into_iter().map(E::from_row).collect()
}

async fn fetch_related<E: HasRelationshipJoin>(
    session: &mut dyn LookupSession,
    join_column: &'static str,
    provider_type_code: &str,
    relationship_type: Option<&str>,
) -> Result<Vec<E>> {
    let rows = session
        .select(&LookupQuery::Related {
            table: E::TABLE,
            join_column,
            provider_type_code: provider_type_code.to_string(),
            relationship_type: relationship_type.map(str::to_string),
            related_entity_type: E::RELATED_ENTITY_TYPE,
        })
        .await?;
    rows.into_iter().map(E::from_row).collect()
}

/// Exactly-one-or-none lookup on a unique column
async fn find_unique<E: LookupEntity>(
    session: &mut dyn LookupSession,
    column: &'static str,
    value: Option<&str>,
) -> Result<Option<E>> {
    let Some(value) = value.filter(|v| !is_blank(v)) else {
        return Ok(None);
    };

    let mut rows = session
        .select(&LookupQuery::Select {
            table: E::TABLE,
            filters: vec![Predicate::text(column, value)],
        })
        .await?;

    match rows.len() {
        0 => Ok(None),
        1 => rows.pop().map(E::from_row).transpose(),
        matches => {
            error!(
                table = E::TABLE,
                column,
                value,
                matches,
                "Lookup table contains non unique element"
            );
            Err(Error::IntegrityViolation {
                table: E::TABLE,
                column,
                value: value.to_string(),
                matches,
            })
        }
    }
}
