//! Provider enrollment lookup server
//!
//! HTTP front end over the `pesp-lookup` resolver:
//! - Unique lookups by code or description for every lookup kind
//! - Relationship queries through the provider type settings table
//! - Beneficial owner types per entity structure, with fallback to all
//! - Service assurance lookups by patient indicator and parent code

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
