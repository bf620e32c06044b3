//! PostgreSQL lookup store
//!
//! Every read session is a `READ ONLY` transaction. Rows are returned as
//! `to_jsonb(row)` so the entity mapping is shared with every other backend.
//! Table and column identifiers come only from entity constants; all values
//! are bound parameters.

use async_trait::async_trait;
use pesp_lookup::{
    models::setting::columns as setting, Error as LookupError, FilterValue, LookupQuery,
    LookupSession, LookupStore, RelationshipSetting,
};
use serde_json::Value as JsonValue;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder, Transaction};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::{Error, Result};

/// Create the connection pool from configuration
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .min_connections(config.pool_min_size)
        .max_connections(config.pool_max_size)
        .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
        .connect(&config.url)
        .await
        .map_err(Error::Database)?;
    Ok(pool)
}

/// Apply the bundled schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(Clone)]
pub struct PostgresLookupStore {
    pool: PgPool,
    statement_timeout_seconds: u64,
}

impl PostgresLookupStore {
    pub fn new(pool: PgPool, statement_timeout_seconds: u64) -> Self {
        Self {
            pool,
            statement_timeout_seconds,
        }
    }

    /// Open a read-only transaction bounded by the statement timeout
    async fn begin_session(&self) -> pesp_lookup::Result<PostgresLookupSession> {
        let mut tx = self.pool.begin().await.map_err(LookupError::store)?;

        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(LookupError::store)?;

        if self.statement_timeout_seconds > 0 {
            // SET does not accept bind parameters
            sqlx::query(&format!(
                "SET LOCAL statement_timeout = '{}s'",
                self.statement_timeout_seconds
            ))
            .execute(&mut *tx)
            .await
            .map_err(LookupError::store)?;
        }

        Ok(PostgresLookupSession { tx: Some(tx) })
    }
}

#[async_trait]
impl LookupStore for PostgresLookupStore {
    async fn begin_read(&self) -> pesp_lookup::Result<Box<dyn LookupSession>> {
        Ok(Box::new(self.begin_session().await?))
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Read session over one Postgres transaction
///
/// Dropping the session without `close` rolls the transaction back.
pub struct PostgresLookupSession {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PostgresLookupSession {
    fn tx_mut(&mut self) -> pesp_lookup::Result<&mut Transaction<'static, Postgres>> {
        self.tx
            .as_mut()
            .ok_or_else(|| LookupError::store("Session already closed"))
    }
}

#[async_trait]
impl LookupSession for PostgresLookupSession {
    async fn select(&mut self, query: &LookupQuery) -> pesp_lookup::Result<Vec<JsonValue>> {
        let mut builder = build_query(query);
        tracing::trace!(sql = builder.sql(), "Lookup query");

        let tx = self.tx_mut()?;
        builder
            .build_query_scalar::<JsonValue>()
            .fetch_all(&mut **tx)
            .await
            .map_err(LookupError::store)
    }

    async fn close(mut self: Box<Self>) -> pesp_lookup::Result<()> {
        match self.tx.take() {
            // Nothing was written; rollback just ends the read transaction
            Some(tx) => tx.rollback().await.map_err(LookupError::store),
            None => Ok(()),
        }
    }
}

fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::Text(s) => builder.push_bind(s.clone()),
        FilterValue::Int(i) => builder.push_bind(*i),
    };
}

/// Render a lookup query as SQL
pub(crate) fn build_query(query: &LookupQuery) -> QueryBuilder<'static, Postgres> {
    match query {
        LookupQuery::Select { table, filters } => {
            let mut builder = QueryBuilder::new(format!("SELECT to_jsonb(t) FROM {table} t"));
            for (i, predicate) in filters.iter().enumerate() {
                builder.push(if i == 0 { " WHERE " } else { " AND " });
                builder.push(format!("t.{} = ", predicate.column));
                push_value(&mut builder, &predicate.value);
            }
            builder
        }
        LookupQuery::Related {
            table,
            join_column,
            provider_type_code,
            relationship_type,
            related_entity_type,
        } => {
            let mut builder = QueryBuilder::new(format!(
                "SELECT to_jsonb(l) FROM {table} l JOIN {settings} s ON l.{join_column} = s.{code} WHERE s.{provider} = ",
                settings = RelationshipSetting::TABLE,
                code = setting::RELATED_ENTITY_CODE,
                provider = setting::PROVIDER_TYPE_CODE,
            ));
            builder.push_bind(provider_type_code.clone());
            builder.push(format!(" AND s.{} = ", setting::RELATED_ENTITY_TYPE));
            builder.push_bind(*related_entity_type);
            if let Some(relationship_type) = relationship_type {
                builder.push(format!(" AND s.{} = ", setting::RELATIONSHIP_TYPE));
                builder.push_bind(relationship_type.clone());
            }
            builder
        }
    }
}
