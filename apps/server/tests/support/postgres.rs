//! Postgres-backed test app
//!
//! Each app gets its own schema on the database named by `DATABASE_URL`, with
//! migrations applied and the bundled seed loaded. Tests are skipped when
//! `DATABASE_URL` is unset.

use anyhow::Context as _;
use axum::{
    http::{HeaderMap, StatusCode},
    Router,
};
use futures::FutureExt as _;
use pesp_lookup::{LookupKind, RelationshipSetting};
use pesp_lookup_server::{
    api::create_router,
    config::{Config, StoreBackend},
    AppState,
};
use serde_json::Value;
use sqlx::Connection as _;
use url::Url;
use uuid::Uuid;

use super::{send_get, SEED};

pub struct PgTestApp {
    pub router: Router,
    pub state: AppState,
    schema: String,
    admin_database_url: String,
    database_url: String,
}

impl PgTestApp {
    pub async fn new() -> anyhow::Result<Option<Self>> {
        let Ok(admin_database_url) = std::env::var("DATABASE_URL") else {
            return Ok(None);
        };

        let schema = format!("lookup_test_{}", Uuid::new_v4().simple());
        let mut admin_conn = sqlx::PgConnection::connect(&admin_database_url)
            .await
            .context("connect admin db for schema create")?;
        sqlx::query(&format!(r#"CREATE SCHEMA "{}""#, schema))
            .execute(&mut admin_conn)
            .await
            .context("create test schema")?;

        let database_url = with_search_path(&admin_database_url, &schema)?;

        let mut config = Config::default();
        config.store.backend = StoreBackend::Postgres;
        config.database.url = database_url.clone();
        config.database.run_migrations = true;
        config.database.pool_min_size = 0;
        // Each test has its own pool; keep them small
        config.database.pool_max_size = 2;

        let state = AppState::new(config)
            .await
            .context("initialize AppState")?;

        let app = Self {
            router: create_router(state.clone()),
            state,
            schema,
            admin_database_url,
            database_url,
        };
        app.load_seed().await?;
        Ok(Some(app))
    }

    /// Insert the bundled seed rows into the test schema
    async fn load_seed(&self) -> anyhow::Result<()> {
        let seed: Value = serde_json::from_str(SEED).context("parse seed")?;
        let mut conn = sqlx::PgConnection::connect(&self.database_url)
            .await
            .context("connect test schema for seeding")?;

        let tables = LookupKind::ALL
            .iter()
            .map(|kind| kind.table())
            .chain([RelationshipSetting::TABLE]);
        for table in tables {
            let Some(rows) = seed.get(table) else {
                continue;
            };
            sqlx::query(&format!(
                "INSERT INTO {table} SELECT * FROM jsonb_populate_recordset(NULL::{table}, $1)"
            ))
            .bind(rows.clone())
            .execute(&mut conn)
            .await
            .with_context(|| format!("seed {table}"))?;
        }
        Ok(())
    }

    /// Run raw SQL against the test schema outside any lookup session
    pub async fn execute(&self, sql: &str) -> anyhow::Result<()> {
        let mut conn = sqlx::PgConnection::connect(&self.database_url)
            .await
            .context("connect test schema")?;
        sqlx::query(sql).execute(&mut conn).await.context("execute")?;
        Ok(())
    }

    pub async fn get(&self, path_and_query: &str) -> anyhow::Result<(StatusCode, HeaderMap, Value)> {
        send_get(&self.router, path_and_query, &[]).await
    }

    pub async fn cleanup(self) -> anyhow::Result<()> {
        let Self {
            router,
            state,
            schema,
            admin_database_url,
            ..
        } = self;
        drop(router);
        drop(state);

        let mut admin_conn = sqlx::PgConnection::connect(&admin_database_url)
            .await
            .context("connect admin db for schema drop")?;
        sqlx::query(&format!(r#"DROP SCHEMA "{}" CASCADE"#, schema))
            .execute(&mut admin_conn)
            .await
            .context("drop test schema")?;
        Ok(())
    }
}

/// Run `f` against a fresh Postgres-backed app, or skip without `DATABASE_URL`
pub async fn with_pg_app<F>(f: F) -> anyhow::Result<()>
where
    F: for<'a> FnOnce(
        &'a PgTestApp,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + 'a>,
    >,
{
    let Some(app) = PgTestApp::new().await? else {
        eprintln!("DATABASE_URL not set, skipping Postgres test");
        return Ok(());
    };

    let result = std::panic::AssertUnwindSafe(f(&app)).catch_unwind().await;
    if let Err(e) = app.cleanup().await {
        eprintln!("test schema cleanup failed: {e:?}");
    }

    match result {
        Ok(r) => r,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

fn with_search_path(database_url: &str, schema: &str) -> anyhow::Result<String> {
    let mut url = Url::parse(database_url).context("parse database URL")?;
    url.query_pairs_mut()
        .append_pair("options", &format!("-c search_path={}", schema));
    Ok(url.to_string())
}
