//! Business logic layer
//!
//! Services own store sessions and wrap the lookup resolver for the API layer.

pub mod lookup;

pub use lookup::LookupService;
