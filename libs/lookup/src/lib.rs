//! Provider-enrollment reference data lookups
//!
//! Resolves coded lookup values (provider types, ownership types,
//! service-assurance types, agreement documents) against a relational store:
//! - Uniqueness-checked lookups by code or description
//! - Relationship traversal through the generic provider type settings table
//! - Beneficial owner type resolution with fallback to the full list
//!
//! Storage is abstracted behind [`LookupStore`] / [`LookupSession`]. The
//! caller acquires a read session and passes it to every
//! [`LookupResolver`] operation.

pub mod error;
pub mod models;
pub mod resolver;
pub mod store;

pub use error::{Error, Result};
pub use models::{
    AgreementDocument, ApplicantType, BeneficialOwnerType, EntityStructureType,
    HasRelationshipJoin, LookupEntity, LookupKind, ProviderType, RelationshipSetting,
    ServiceAssuranceExtType, ServiceAssuranceType,
};
pub use resolver::LookupResolver;
pub use store::{
    memory::MemoryStore, FilterValue, LookupQuery, LookupSession, LookupStore, Predicate,
};
