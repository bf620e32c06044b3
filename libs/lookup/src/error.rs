//! Error types for lookup resolution

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed source error raised by a store backend
pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum Error {
    /// A uniqueness-constrained lookup matched more than one row.
    ///
    /// This is a data defect in the store, never a business outcome.
    #[error("Lookup table {table} contains non unique element: {matches} rows with {column} = {value:?}")]
    IntegrityViolation {
        table: &'static str,
        column: &'static str,
        value: String,
        matches: usize,
    },

    #[error("Store error: {0}")]
    Store(#[source] StoreError),

    #[error("Row mapping error for {table}: {source}")]
    RowMapping {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown lookup kind: {0}")]
    UnknownKind(String),

    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),
}

impl Error {
    /// Wrap a backend failure, keeping it as the error source
    pub fn store(err: impl Into<StoreError>) -> Self {
        Error::Store(err.into())
    }

    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, Error::IntegrityViolation { .. })
    }
}
