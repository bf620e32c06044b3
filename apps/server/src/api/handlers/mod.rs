//! Request handlers for API endpoints
//!
//! Handlers extract and validate parameters, call the lookup service and
//! shape the JSON response. Errors convert through `crate::Error`.

pub mod lookups;
