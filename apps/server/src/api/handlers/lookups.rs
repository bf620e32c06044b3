//! Lookup endpoint handlers
//!
//! Absent unique lookups answer 404; empty collections answer 200 with `[]`.

use crate::{state::AppState, Error, Result};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use pesp_lookup::{
    AgreementDocument, ApplicantType, BeneficialOwnerType, LookupKind, ProviderType,
    ServiceAssuranceExtType, ServiceAssuranceType,
};
use serde::Deserialize;
use serde_json::Value as JsonValue;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTypeParams {
    pub applicant_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionParams {
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedParams {
    pub provider_type: Option<String>,
    pub relationship_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficialOwnerParams {
    pub entity_structure: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAssuranceParams {
    pub patient_ind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAssuranceExtParams {
    pub parent_code: Option<String>,
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value.ok_or_else(|| Error::Validation(format!("Missing required parameter '{name}'")))
}

fn parse_kind(kind: &str) -> Result<LookupKind> {
    Ok(kind.parse::<LookupKind>()?)
}

/// GET /lookups/provider-types?applicantType=
///
/// An unrecognized applicant type is treated as unspecified.
pub async fn provider_types(
    State(state): State<AppState>,
    Query(params): Query<ProviderTypeParams>,
) -> Result<Json<Vec<ProviderType>>> {
    let applicant_type = params.applicant_type.as_deref().and_then(|raw| {
        raw.parse::<ApplicantType>()
            .map_err(|e| {
                tracing::debug!(applicant_type = %raw, error = %e, "Ignoring applicant type filter")
            })
            .ok()
    });
    Ok(Json(state.lookups.provider_types(applicant_type).await?))
}

/// GET /lookups/required-documents/:provider_type
pub async fn required_documents(
    State(state): State<AppState>,
    Path(provider_type): Path<String>,
) -> Result<Json<Vec<AgreementDocument>>> {
    Ok(Json(state.lookups.required_documents(&provider_type).await?))
}

/// GET /lookups/beneficial-owner-types?entityStructure=
pub async fn beneficial_owner_types(
    State(state): State<AppState>,
    Query(params): Query<BeneficialOwnerParams>,
) -> Result<Json<Vec<BeneficialOwnerType>>> {
    Ok(Json(
        state
            .lookups
            .beneficial_owner_types(params.entity_structure.as_deref())
            .await?,
    ))
}

/// GET /lookups/service-assurance-types?patientInd=
pub async fn service_assurance_types(
    State(state): State<AppState>,
    Query(params): Query<ServiceAssuranceParams>,
) -> Result<Json<Vec<ServiceAssuranceType>>> {
    let patient_ind = required(params.patient_ind, "patientInd")?;
    Ok(Json(state.lookups.assured_service_types(&patient_ind).await?))
}

/// GET /lookups/service-assurance-ext-types?parentCode=
pub async fn service_assurance_ext_types(
    State(state): State<AppState>,
    Query(params): Query<ServiceAssuranceExtParams>,
) -> Result<Json<Vec<ServiceAssuranceExtType>>> {
    let parent_code = required(params.parent_code, "parentCode")?;
    Ok(Json(
        state.lookups.assured_service_ext_types(&parent_code).await?,
    ))
}

/// GET /lookups/kinds/:kind
pub async fn find_all(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<JsonValue>>> {
    let kind = parse_kind(&kind)?;
    Ok(Json(state.lookups.find_all(kind).await?))
}

/// GET /lookups/kinds/:kind/by-code/:code
pub async fn find_by_code(
    State(state): State<AppState>,
    Path((kind, code)): Path<(String, String)>,
) -> Result<Json<JsonValue>> {
    let kind = parse_kind(&kind)?;
    state
        .lookups
        .find_by_code(kind, &code)
        .await?
        .map(Json)
        .ok_or_else(|| Error::NotFound(format!("No {kind} with code '{code}'")))
}

/// GET /lookups/kinds/:kind/by-description?description=
pub async fn find_by_description(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<DescriptionParams>,
) -> Result<Json<JsonValue>> {
    let kind = parse_kind(&kind)?;
    let description = params.description.as_deref();
    state
        .lookups
        .find_by_description(kind, description)
        .await?
        .map(Json)
        .ok_or_else(|| {
            Error::NotFound(format!(
                "No {kind} with description '{}'",
                description.unwrap_or_default()
            ))
        })
}

/// GET /lookups/kinds/:kind/related?providerType=&relationshipType=
pub async fn find_related(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<RelatedParams>,
) -> Result<Json<Vec<JsonValue>>> {
    let kind = parse_kind(&kind)?;
    let provider_type = required(params.provider_type, "providerType")?;
    let relationship_type = required(params.relationship_type, "relationshipType")?;
    Ok(Json(
        state
            .lookups
            .find_related(kind, &provider_type, &relationship_type)
            .await?,
    ))
}
