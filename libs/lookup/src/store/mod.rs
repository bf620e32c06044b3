//! Storage abstraction for lookup queries
//!
//! The resolver only needs two query shapes:
//! - a filtered select over one lookup table (equality predicates only)
//! - the settings join: rows of one lookup table whose join column equals the
//!   `related_entity_code` of matching `provider_type_settings` rows
//!
//! Any backend (PostgreSQL, in-memory, ...) implements [`LookupStore`] and
//! [`LookupSession`]. Rows are returned as JSON objects keyed by column name.

pub mod memory;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::Result;

/// Value compared by an equality predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Int(i32),
}

impl FilterValue {
    pub fn matches(&self, value: &JsonValue) -> bool {
        match self {
            FilterValue::Text(expected) => value.as_str() == Some(expected.as_str()),
            FilterValue::Int(expected) => value.as_i64() == Some(i64::from(*expected)),
        }
    }
}

/// `column = value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: &'static str,
    pub value: FilterValue,
}

impl Predicate {
    pub fn text(column: &'static str, value: impl Into<String>) -> Self {
        Self {
            column,
            value: FilterValue::Text(value.into()),
        }
    }

    pub fn int(column: &'static str, value: i32) -> Self {
        Self {
            column,
            value: FilterValue::Int(value),
        }
    }
}

/// A read query against the store
///
/// Table and column identifiers are always compile-time constants; only
/// values come from callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupQuery {
    /// All rows of `table` matching every predicate
    Select {
        table: &'static str,
        filters: Vec<Predicate>,
    },
    /// Rows of `table` joined through `provider_type_settings`
    ///
    /// `relationship_type = None` matches settings of any relationship kind.
    Related {
        table: &'static str,
        join_column: &'static str,
        provider_type_code: String,
        relationship_type: Option<String>,
        related_entity_type: &'static str,
    },
}

impl LookupQuery {
    pub fn table(&self) -> &'static str {
        match self {
            LookupQuery::Select { table, .. } | LookupQuery::Related { table, .. } => table,
        }
    }
}

/// A read scope over the store, acquired by the caller for one operation
///
/// Sessions are not shared between concurrent callers. Backends must release
/// the underlying resources when a session is dropped without `close`.
#[async_trait]
pub trait LookupSession: Send {
    /// Execute a query and return its rows
    async fn select(&mut self, query: &LookupQuery) -> Result<Vec<JsonValue>>;

    /// End the session and release its resources
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Source of read sessions
#[async_trait]
pub trait LookupStore: Send + Sync {
    /// Open a read-only session
    async fn begin_read(&self) -> Result<Box<dyn LookupSession>>;

    /// Short backend name for logs
    fn backend(&self) -> &'static str;
}
