//! Autocomplete lookups, quick-add and plain CRUD over the reference tables.
//!
//! Lookup and quick-create answer with bare JSON since they feed form
//! widgets; the CRUD routes use the usual [`ApiResponse`] envelope.

use super::common::FormOrJson;
use crate::{
    errors::ServiceError,
    services::reference::{LookupItem, QuickCreateInput, QuickCreated, ReferenceKind},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LookupQuery {
    pub q: Option<String>,
    /// Drivers only: restrict to the driver assigned to this vehicle
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub vehicle_id: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/lookup/{kind}",
    summary = "Autocomplete lookup",
    params(
        ("kind" = String, Path, description = "station, pin_code, goods, consignor, consignee, booking_agent, owner, driver, vehicle or order"),
        LookupQuery,
    ),
    responses(
        (status = 200, description = "Matching rows ordered by label", body = Vec<LookupItem>),
        (status = 404, description = "Unknown reference type", body = crate::errors::ErrorResponse),
    ),
    tag = "reference"
)]
pub async fn lookup(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<Vec<LookupItem>>, ServiceError> {
    let kind = ReferenceKind::parse(&kind)?;
    let items = state
        .services
        .reference
        .lookup(kind, query.q.as_deref(), query.vehicle_id)
        .await?;
    Ok(Json(items))
}

/// Find-or-create by label
#[utoipa::path(
    post,
    path = "/api/v1/lookup/{kind}",
    summary = "Quick-create reference row",
    description = "Returns the existing row when one with the same label already exists",
    params(("kind" = String, Path, description = "Reference type")),
    request_body = QuickCreateInput,
    responses(
        (status = 201, description = "Row created", body = QuickCreated),
        (status = 200, description = "Existing row returned", body = QuickCreated),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown reference type", body = crate::errors::ErrorResponse),
    ),
    tag = "reference"
)]
pub async fn quick_create(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    FormOrJson(input): FormOrJson<QuickCreateInput>,
) -> Result<(StatusCode, Json<QuickCreated>), ServiceError> {
    let kind = ReferenceKind::parse(&kind)?;
    let outcome = state.services.reference.quick_create(kind, input).await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reference/{kind}",
    summary = "List reference rows",
    params(("kind" = String, Path, description = "Reference type")),
    responses(
        (status = 200, description = "Rows ordered by label", body = ApiResponse<Vec<Object>>),
        (status = 404, description = "Unknown reference type", body = crate::errors::ErrorResponse),
    ),
    tag = "reference"
)]
pub async fn list_reference(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<Vec<Value>> {
    let kind = ReferenceKind::parse(&kind)?;
    let rows = state.services.reference.list(kind).await?;
    Ok(Json(ApiResponse::success(rows)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reference/{kind}/{id}",
    summary = "Get reference row",
    params(
        ("kind" = String, Path, description = "Reference type"),
        ("id" = i32, Path, description = "Row id"),
    ),
    responses(
        (status = 200, description = "Row retrieved", body = ApiResponse<Object>),
        (status = 404, description = "Unknown type or row not found", body = crate::errors::ErrorResponse),
    ),
    tag = "reference"
)]
pub async fn get_reference(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i32)>,
) -> ApiResult<Value> {
    let kind = ReferenceKind::parse(&kind)?;
    let row = state.services.reference.get(kind, id).await?;
    Ok(Json(ApiResponse::success(row)))
}

#[utoipa::path(
    put,
    path = "/api/v1/reference/{kind}/{id}",
    summary = "Update reference row",
    description = "Only the supplied fields change; unknown fields are rejected",
    params(
        ("kind" = String, Path, description = "Reference type"),
        ("id" = i32, Path, description = "Row id"),
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Row updated", body = ApiResponse<Object>),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown type or row not found", body = crate::errors::ErrorResponse),
    ),
    tag = "reference"
)]
pub async fn update_reference(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i32)>,
    FormOrJson(patch): FormOrJson<Map<String, Value>>,
) -> ApiResult<Value> {
    let kind = ReferenceKind::parse(&kind)?;
    let row = state.services.reference.update(kind, id, patch).await?;
    Ok(Json(ApiResponse::success(row)))
}
