//! Runtime discriminator for lookup variants
//!
//! Typed code should use the entity types directly. `LookupKind` exists for
//! outer surfaces that receive the variant as a name (HTTP paths, config).

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{
    AgreementDocument, BeneficialOwnerType, EntityStructureType, HasRelationshipJoin,
    LookupEntity, ProviderType, ServiceAssuranceExtType, ServiceAssuranceType,
};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupKind {
    ProviderType,
    BeneficialOwnerType,
    EntityStructureType,
    ServiceAssuranceType,
    ServiceAssuranceExtType,
    AgreementDocument,
}

/// Run `$body` with `$E` bound to the entity type selected by `$kind`.
///
/// ```ignore
/// let rows = with_lookup_kind!(kind, E => resolver.find_all::<E>(session).await.map(to_json)?);
/// ```
#[macro_export]
macro_rules! with_lookup_kind {
    ($kind:expr, $E:ident => $body:expr) => {
        match $kind {
            $crate::LookupKind::ProviderType => {
                type $E = $crate::ProviderType;
                $body
            }
            $crate::LookupKind::BeneficialOwnerType => {
                type $E = $crate::BeneficialOwnerType;
                $body
            }
            $crate::LookupKind::EntityStructureType => {
                type $E = $crate::EntityStructureType;
                $body
            }
            $crate::LookupKind::ServiceAssuranceType => {
                type $E = $crate::ServiceAssuranceType;
                $body
            }
            $crate::LookupKind::ServiceAssuranceExtType => {
                type $E = $crate::ServiceAssuranceExtType;
                $body
            }
            $crate::LookupKind::AgreementDocument => {
                type $E = $crate::AgreementDocument;
                $body
            }
        }
    };
}

impl LookupKind {
    pub const ALL: [LookupKind; 6] = [
        LookupKind::ProviderType,
        LookupKind::BeneficialOwnerType,
        LookupKind::EntityStructureType,
        LookupKind::ServiceAssuranceType,
        LookupKind::ServiceAssuranceExtType,
        LookupKind::AgreementDocument,
    ];

    /// Kebab-case name used in URLs
    pub fn as_str(self) -> &'static str {
        match self {
            LookupKind::ProviderType => "provider-type",
            LookupKind::BeneficialOwnerType => "beneficial-owner-type",
            LookupKind::EntityStructureType => "entity-structure-type",
            LookupKind::ServiceAssuranceType => "service-assurance-type",
            LookupKind::ServiceAssuranceExtType => "service-assurance-ext-type",
            LookupKind::AgreementDocument => "agreement-document",
        }
    }

    pub fn table(self) -> &'static str {
        with_lookup_kind!(self, E => <E as LookupEntity>::TABLE)
    }

    /// Tag used for this variant in `provider_type_settings.related_entity_type`
    pub fn related_entity_type(self) -> &'static str {
        with_lookup_kind!(self, E => <E as HasRelationshipJoin>::RELATED_ENTITY_TYPE)
    }
}

impl FromStr for LookupKind {
    type Err = Error;

    /// Accepts the kebab-case name or the settings tag (`EntityStructureType`)
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        LookupKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s || kind.related_entity_type() == s)
            .ok_or_else(|| Error::UnknownKind(s.to_string()))
    }
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
