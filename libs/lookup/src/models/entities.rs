//! Coded reference entities
//!
//! Every variant is a plain serde struct whose field names match the column
//! names of its table. Rows come back from a store as JSON objects and are
//! mapped with [`LookupEntity::from_row`], so no variant needs runtime
//! reflection to be loaded.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::LookupKind;
use crate::{Error, Result};

/// Column names shared by the lookup tables
pub mod columns {
    pub const CODE: &str = "code";
    pub const DESCRIPTION: &str = "description";
    pub const APPLICANT_TYPE: &str = "applicant_type";
    pub const PATIENT_IND: &str = "patient_ind";
    pub const SERVICE_ASSURANCE_CODE: &str = "service_assurance_code";
    pub const DOCUMENT_TYPE: &str = "type";
}

/// A category of coded reference values with unique code and description
pub trait LookupEntity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Logical table name in the store
    const TABLE: &'static str;

    /// Runtime discriminator for this variant
    const KIND: LookupKind;

    /// Map a store row onto this variant's shape
    fn from_row(row: JsonValue) -> Result<Self> {
        serde_json::from_value(row).map_err(|source| Error::RowMapping {
            table: Self::TABLE,
            source,
        })
    }
}

/// Variants reachable through the provider type settings join table
///
/// `RELATED_ENTITY_TYPE` is the tag stored in
/// `provider_type_settings.related_entity_type` for this variant.
pub trait HasRelationshipJoin: LookupEntity {
    const RELATED_ENTITY_TYPE: &'static str;
}

/// Provider type, selectable by applicant kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderType {
    pub code: String,
    pub description: String,
    /// 0 = individual, 1 = organization
    pub applicant_type: i32,
}

/// Type of a beneficial owner of an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeneficialOwnerType {
    pub code: String,
    pub description: String,
}

/// Corporate structure of an organization (corporation, sole proprietor, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStructureType {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAssuranceType {
    pub code: String,
    pub description: String,
    /// In/out patient indicator
    pub patient_ind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAssuranceExtType {
    pub code: String,
    pub description: String,
    /// Code of the parent service assurance type
    pub service_assurance_code: String,
}

/// Agreement a provider must accept during enrollment
///
/// Required documents are linked from the settings table through the
/// document `type`; every other relationship links through `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementDocument {
    pub code: String,
    pub description: String,
    #[serde(rename = "type")]
    pub document_type: String,
}

macro_rules! lookup_entity {
    ($ty:ident, $table:literal) => {
        impl LookupEntity for $ty {
            const TABLE: &'static str = $table;
            const KIND: LookupKind = LookupKind::$ty;
        }

        impl HasRelationshipJoin for $ty {
            const RELATED_ENTITY_TYPE: &'static str = stringify!($ty);
        }
    };
}

lookup_entity!(ProviderType, "provider_types");
lookup_entity!(BeneficialOwnerType, "beneficial_owner_types");
lookup_entity!(EntityStructureType, "entity_structure_types");
lookup_entity!(ServiceAssuranceType, "service_assurance_types");
lookup_entity!(ServiceAssuranceExtType, "service_assurance_ext_types");
lookup_entity!(AgreementDocument, "agreement_documents");
