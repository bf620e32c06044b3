//! Lookup entity models

pub mod applicant;
pub mod entities;
pub mod kind;
pub mod setting;

pub use applicant::ApplicantType;
pub use entities::{
    columns, AgreementDocument, BeneficialOwnerType, EntityStructureType, HasRelationshipJoin,
    LookupEntity, ProviderType, ServiceAssuranceExtType, ServiceAssuranceType,
};
pub use kind::LookupKind;
pub use setting::{relationship, RelationshipSetting};
