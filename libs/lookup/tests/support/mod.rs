//! Shared fixtures for lookup resolver tests

#![allow(dead_code)]

use async_trait::async_trait;
use pesp_lookup::{
    models::relationship::BENEFICIAL_OWNER_TYPE, AgreementDocument, BeneficialOwnerType,
    EntityStructureType, LookupQuery, LookupSession, MemoryStore, ProviderType,
    RelationshipSetting, ServiceAssuranceExtType, ServiceAssuranceType,
};
use serde_json::Value as JsonValue;

pub fn provider_type(code: &str, description: &str, applicant_type: i32) -> ProviderType {
    ProviderType {
        code: code.to_string(),
        description: description.to_string(),
        applicant_type,
    }
}

pub fn owner_type(code: &str, description: &str) -> BeneficialOwnerType {
    BeneficialOwnerType {
        code: code.to_string(),
        description: description.to_string(),
    }
}

pub fn structure(code: &str, description: &str) -> EntityStructureType {
    EntityStructureType {
        code: code.to_string(),
        description: description.to_string(),
    }
}

pub fn document(code: &str, description: &str, document_type: &str) -> AgreementDocument {
    AgreementDocument {
        code: code.to_string(),
        description: description.to_string(),
        document_type: document_type.to_string(),
    }
}

/// Reference data resembling a small enrollment deployment
///
/// - "Corporation" (CORP) has two configured owner types
/// - "Sole Proprietor" (SOLE) exists but has none
/// - provider type 01 requires two agreements, 02 requires none
pub fn enrollment_store() -> anyhow::Result<MemoryStore> {
    let store = MemoryStore::new()
        .with_entities([
            provider_type("01", "Physician", 0),
            provider_type("02", "Nurse Practitioner", 0),
            provider_type("10", "Hospital", 1),
            provider_type("11", "Pharmacy", 1),
        ])?
        .with_entities([
            owner_type("SH", "Shareholder"),
            owner_type("OF", "Officer"),
            owner_type("PT", "Partner"),
            owner_type("MM", "Managing Employee"),
        ])?
        .with_entities([
            structure("CORP", "Corporation"),
            structure("SOLE", "Sole Proprietor"),
            structure("LLC", "Limited Liability Company"),
        ])?
        .with_entities([
            document("PA", "Provider Agreement", "PROVIDER_AGREEMENT"),
            document("EFT", "EFT Authorization", "EFT"),
            document("ADD", "Addendum", "ADDENDUM"),
        ])?
        .with_entities([
            ServiceAssuranceType {
                code: "IP1".into(),
                description: "Inpatient Stay".into(),
                patient_ind: "I".into(),
            },
            ServiceAssuranceType {
                code: "OP1".into(),
                description: "Outpatient Visit".into(),
                patient_ind: "O".into(),
            },
            ServiceAssuranceType {
                code: "OP2".into(),
                description: "Outpatient Surgery".into(),
                patient_ind: "O".into(),
            },
        ])?
        .with_entities([
            ServiceAssuranceExtType {
                code: "OP2-A".into(),
                description: "Ambulatory Surgery".into(),
                service_assurance_code: "OP2".into(),
            },
            ServiceAssuranceExtType {
                code: "OP2-B".into(),
                description: "Day Surgery".into(),
                service_assurance_code: "OP2".into(),
            },
        ])?
        .with_settings([
            RelationshipSetting::new("CORP", BENEFICIAL_OWNER_TYPE, "SH", "BeneficialOwnerType"),
            RelationshipSetting::new("CORP", BENEFICIAL_OWNER_TYPE, "OF", "BeneficialOwnerType"),
            // Same code under another tag must not leak into owner type results
            RelationshipSetting::new("LLC", BENEFICIAL_OWNER_TYPE, "PT", "EntityStructureType"),
            RelationshipSetting::new("01", "REQUIRED_AGREEMENT", "PROVIDER_AGREEMENT", "AgreementDocument"),
            RelationshipSetting::new("01", "REQUIRED_ADDENDUM", "ADDENDUM", "AgreementDocument"),
            RelationshipSetting::new("10", "REQUIRED_AGREEMENT", "EFT", "ProviderType"),
        ])?;
    Ok(store)
}

/// Session that fails the test if the resolver touches the store
pub struct UnreachableSession;

#[async_trait]
impl LookupSession for UnreachableSession {
    async fn select(&mut self, query: &LookupQuery) -> pesp_lookup::Result<Vec<JsonValue>> {
        panic!("store must not be queried, got {query:?}");
    }

    async fn close(self: Box<Self>) -> pesp_lookup::Result<()> {
        Ok(())
    }
}

/// Session that returns canned rows and records every query
#[derive(Default)]
pub struct ScriptedSession {
    responses: Vec<pesp_lookup::Result<Vec<JsonValue>>>,
    pub queries: Vec<LookupQuery>,
}

impl ScriptedSession {
    pub fn new(responses: Vec<pesp_lookup::Result<Vec<JsonValue>>>) -> Self {
        Self {
            responses: responses.into_iter().rev().collect(),
            queries: Vec::new(),
        }
    }
}

#[async_trait]
impl LookupSession for ScriptedSession {
    async fn select(&mut self, query: &LookupQuery) -> pesp_lookup::Result<Vec<JsonValue>> {
        self.queries.push(query.clone());
        self.responses
            .pop()
            .unwrap_or_else(|| panic!("unexpected query {query:?}"))
    }

    async fn close(self: Box<Self>) -> pesp_lookup::Result<()> {
        Ok(())
    }
}
