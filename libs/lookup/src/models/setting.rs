//! Provider type settings: the generic relationship join table

use serde::{Deserialize, Serialize};

/// Relationship kinds stored in `provider_type_settings.relationship_type`
pub mod relationship {
    /// Beneficial owner types allowed for an entity structure
    pub const BENEFICIAL_OWNER_TYPE: &str = "BENEFICIAL_OWNER_TYPE";
}

/// Column names of the settings table
pub mod columns {
    pub const PROVIDER_TYPE_CODE: &str = "provider_type_code";
    pub const RELATIONSHIP_TYPE: &str = "relationship_type";
    pub const RELATED_ENTITY_CODE: &str = "related_entity_code";
    pub const RELATED_ENTITY_TYPE: &str = "related_entity_type";
}

/// Ties a provider type (or any code used in its place, such as an entity
/// structure code) to a related lookup code of some variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipSetting {
    pub provider_type_code: String,
    pub relationship_type: String,
    pub related_entity_code: String,
    pub related_entity_type: String,
}

impl RelationshipSetting {
    pub const TABLE: &'static str = "provider_type_settings";

    pub fn new(
        provider_type_code: impl Into<String>,
        relationship_type: impl Into<String>,
        related_entity_code: impl Into<String>,
        related_entity_type: impl Into<String>,
    ) -> Self {
        Self {
            provider_type_code: provider_type_code.into(),
            relationship_type: relationship_type.into(),
            related_entity_code: related_entity_code.into(),
            related_entity_type: related_entity_type.into(),
        }
    }
}
