//! Lookup API Routes
//!
//! Fixed operations live directly under `/lookups`; the kind-generic
//! operations take the kebab-case kind name under `/lookups/kinds/:kind`
//! (for example `/lookups/kinds/entity-structure-type/by-code/CORP`).

use crate::api::handlers::lookups;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn lookup_routes() -> Router<AppState> {
    Router::new()
        .route("/provider-types", get(lookups::provider_types))
        .route(
            "/required-documents/:provider_type",
            get(lookups::required_documents),
        )
        .route(
            "/beneficial-owner-types",
            get(lookups::beneficial_owner_types),
        )
        .route(
            "/service-assurance-types",
            get(lookups::service_assurance_types),
        )
        .route(
            "/service-assurance-ext-types",
            get(lookups::service_assurance_ext_types),
        )
        .route("/kinds/:kind", get(lookups::find_all))
        .route("/kinds/:kind/by-code/:code", get(lookups::find_by_code))
        .route(
            "/kinds/:kind/by-description",
            get(lookups::find_by_description),
        )
        .route("/kinds/:kind/related", get(lookups::find_related))
}
