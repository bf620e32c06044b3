//! In-memory lookup store
//!
//! Tables are held as JSON rows keyed by table name, so the same row mapping
//! used for database rows applies here. The store can be seeded from typed
//! entities or from a seed document of the form
//! `{ "<table>": [ { "<column>": ... }, ... ], ... }`.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use super::{LookupQuery, LookupSession, LookupStore};
use crate::models::setting::columns as setting_columns;
use crate::models::{LookupEntity, LookupKind, RelationshipSetting};
use crate::{Error, Result};

#[derive(Debug, Default)]
struct Inner {
    tables: RwLock<HashMap<&'static str, Vec<JsonValue>>>,
    queries: AtomicUsize,
    open_sessions: AtomicUsize,
    offline: AtomicBool,
}

/// Lookup store backed by in-process tables
///
/// Cloning is cheap; clones share the same tables and counters.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add entities to their variant's table
    pub fn with_entities<E: LookupEntity>(self, rows: impl IntoIterator<Item = E>) -> Result<Self> {
        self.insert_rows(E::TABLE, rows)?;
        Ok(self)
    }

    /// Add rows to the provider type settings table
    pub fn with_settings(
        self,
        settings: impl IntoIterator<Item = RelationshipSetting>,
    ) -> Result<Self> {
        self.insert_rows(RelationshipSetting::TABLE, settings)?;
        Ok(self)
    }

    /// Build a store from a seed document
    pub fn from_seed(seed: JsonValue) -> Result<Self> {
        let JsonValue::Object(tables) = seed else {
            return Err(Error::InvalidSeed(
                "seed document must be an object of tables".to_string(),
            ));
        };

        let store = Self::new();
        for (name, rows) in tables {
            let table = known_table(&name)
                .ok_or_else(|| Error::InvalidSeed(format!("unknown table '{name}'")))?;
            let JsonValue::Array(rows) = rows else {
                return Err(Error::InvalidSeed(format!(
                    "table '{name}' must be an array of rows"
                )));
            };
            if let Some(bad) = rows.iter().position(|row| !row.is_object()) {
                return Err(Error::InvalidSeed(format!(
                    "row {bad} of table '{name}' is not an object"
                )));
            }
            store.write_tables()?.entry(table).or_default().extend(rows);
        }

        Ok(store)
    }

    /// Number of queries executed against this store
    pub fn query_count(&self) -> usize {
        self.inner.queries.load(Ordering::SeqCst)
    }

    /// Number of sessions acquired and not yet released
    pub fn open_sessions(&self) -> usize {
        self.inner.open_sessions.load(Ordering::SeqCst)
    }

    /// Make every query fail with a store error
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Row counts per table
    pub fn table_sizes(&self) -> Result<HashMap<&'static str, usize>> {
        Ok(self
            .read_tables()?
            .iter()
            .map(|(table, rows)| (*table, rows.len()))
            .collect())
    }

    fn insert_rows<T: Serialize>(
        &self,
        table: &'static str,
        rows: impl IntoIterator<Item = T>,
    ) -> Result<()> {
        let rows = rows
            .into_iter()
            .map(|row| serde_json::to_value(row).map_err(|source| Error::RowMapping { table, source }))
            .collect::<Result<Vec<_>>>()?;
        self.write_tables()?.entry(table).or_default().extend(rows);
        Ok(())
    }

    fn read_tables(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<&'static str, Vec<JsonValue>>>> {
        self.inner
            .tables
            .read()
            .map_err(|_| Error::store("memory store lock poisoned"))
    }

    fn write_tables(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<&'static str, Vec<JsonValue>>>> {
        self.inner
            .tables
            .write()
            .map_err(|_| Error::store("memory store lock poisoned"))
    }

    fn execute(&self, query: &LookupQuery) -> Result<Vec<JsonValue>> {
        self.inner.queries.fetch_add(1, Ordering::SeqCst);
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(Error::store("memory store is offline"));
        }

        let tables = self.read_tables()?;
        let rows = tables.get(query.table()).map(Vec::as_slice).unwrap_or_default();

        match query {
            LookupQuery::Select { filters, .. } => Ok(rows
                .iter()
                .filter(|row| {
                    filters.iter().all(|p| {
                        row.get(p.column)
                            .map(|value| p.value.matches(value))
                            .unwrap_or(false)
                    })
                })
                .cloned()
                .collect()),
            LookupQuery::Related {
                join_column,
                provider_type_code,
                relationship_type,
                related_entity_type,
                ..
            } => {
                let settings: Vec<&str> = tables
                    .get(RelationshipSetting::TABLE)
                    .map(Vec::as_slice)
                    .unwrap_or_default()
                    .iter()
                    .filter(|s| {
                        column_eq(s, setting_columns::PROVIDER_TYPE_CODE, provider_type_code)
                            && column_eq(s, setting_columns::RELATED_ENTITY_TYPE, related_entity_type)
                            && relationship_type.as_deref().map_or(true, |rel| {
                                column_eq(s, setting_columns::RELATIONSHIP_TYPE, rel)
                            })
                    })
                    .filter_map(|s| s.get(setting_columns::RELATED_ENTITY_CODE)?.as_str())
                    .collect();

                // One output row per matching (row, setting) pair, as an SQL join would give.
                let mut out = Vec::new();
                for row in rows {
                    let Some(key) = row.get(*join_column).and_then(JsonValue::as_str) else {
                        continue;
                    };
                    let matches = settings.iter().filter(|code| **code == key).count();
                    out.extend(std::iter::repeat(row).take(matches).cloned());
                }
                Ok(out)
            }
        }
    }
}

fn column_eq(row: &JsonValue, column: &str, expected: &str) -> bool {
    row.get(column).and_then(JsonValue::as_str) == Some(expected)
}

fn known_table(name: &str) -> Option<&'static str> {
    if name == RelationshipSetting::TABLE {
        return Some(RelationshipSetting::TABLE);
    }
    LookupKind::ALL
        .into_iter()
        .map(LookupKind::table)
        .find(|table| *table == name)
}

#[async_trait]
impl LookupStore for MemoryStore {
    async fn begin_read(&self) -> Result<Box<dyn LookupSession>> {
        self.inner.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession {
            store: self.clone(),
            released: false,
        }))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Session over a [`MemoryStore`]
#[derive(Debug)]
pub struct MemorySession {
    store: MemoryStore,
    released: bool,
}

impl MemorySession {
    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.store.inner.open_sessions.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl LookupSession for MemorySession {
    async fn select(&mut self, query: &LookupQuery) -> Result<Vec<JsonValue>> {
        self.store.execute(query)
    }

    async fn close(mut self: Box<Self>) -> Result<()> {
        self.release();
        Ok(())
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        self.release();
    }
}
