//! Layer factories for middleware

use axum::{body::Body, http::Request};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

type MakeSpanFn = fn(&Request<Body>) -> tracing::Span;

pub type HttpTraceLayer = TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeSpanFn>;

/// Tracing/logging middleware
///
/// Opens one `http` span per request; completion is logged at debug level
/// since `request_id_middleware` already logs each request at info.
pub fn trace() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(make_span as MakeSpanFn)
        .on_response(DefaultOnResponse::new().level(Level::DEBUG))
}

fn make_span(req: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "http_request",
        http.method = %req.method(),
        http.route = %req.uri().path(),
        http.response.status_code = tracing::field::Empty,
        request_id = tracing::field::Empty,
    )
}

/// CORS middleware
pub fn cors(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        // No CORS headers unless origins are configured
        return CorsLayer::new();
    }

    let mut header_values = Vec::with_capacity(origins.len());
    for origin in origins {
        match axum::http::HeaderValue::from_str(origin) {
            Ok(value) => header_values.push(value),
            Err(_) => tracing::warn!(origin = %origin, "Ignoring invalid CORS origin"),
        }
    }

    if header_values.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(header_values))
        .allow_methods(Any)
        .allow_headers(Any)
}
