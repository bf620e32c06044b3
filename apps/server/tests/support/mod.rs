pub mod postgres;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use pesp_lookup::MemoryStore;
use pesp_lookup_server::{
    api::create_router,
    config::{Config, StoreBackend},
    AppState,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt as _;

/// Demo seed shipped with the server
pub const SEED: &str = include_str!("../../seed/lookups.json");

pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
}

impl TestApp {
    /// App over the bundled seed document
    pub fn new() -> anyhow::Result<Self> {
        let seed: Value = serde_json::from_str(SEED).context("parse seed")?;
        Self::with_store(MemoryStore::from_seed(seed)?)
    }

    pub fn with_store(store: MemoryStore) -> anyhow::Result<Self> {
        let mut config = Config::default();
        config.store.backend = StoreBackend::Memory;
        let state = AppState::with_store(config, Arc::new(store.clone()));
        Ok(Self {
            router: create_router(state),
            store,
        })
    }

    pub async fn get(&self, path_and_query: &str) -> anyhow::Result<(StatusCode, HeaderMap, Value)> {
        self.get_with_headers(path_and_query, &[]).await
    }

    pub async fn get_with_headers(
        &self,
        path_and_query: &str,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Value)> {
        send_get(&self.router, path_and_query, extra_headers).await
    }
}

/// Dispatch a GET through the router and decode the JSON body
pub async fn send_get(
    router: &Router,
    path_and_query: &str,
    extra_headers: &[(&str, &str)],
) -> anyhow::Result<(StatusCode, HeaderMap, Value)> {
    let mut request = Request::builder()
        .method(Method::GET)
        .uri(path_and_query)
        .header("accept", "application/json");
    for (name, value) in extra_headers {
        request = request.header(*name, *value);
    }
    let request = request.body(Body::empty()).context("build request")?;

    let response = router
        .clone()
        .oneshot(request)
        .await
        .context("dispatch request")?;

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .context("read response body")?;

    Ok((status, headers, parse_body(&body)?))
}

fn parse_body(body: &Bytes) -> anyhow::Result<Value> {
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).context("parse response body")
}

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(actual, expected, "{context}: unexpected status");
}

/// Sorted `field` values of a JSON array of objects
pub fn field_values(body: &Value, field: &str) -> Vec<String> {
    let mut values: Vec<String> = body
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|row| row.get(field).and_then(Value::as_str))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    values.sort();
    values
}

pub fn error_code(body: &Value) -> Option<&str> {
    body.get("error")
        .and_then(|e| e.get("code"))
        .and_then(Value::as_str)
}
