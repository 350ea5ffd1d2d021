use super::common::{redirect_to, FormOrJson, Mutation, ResponseMode};
use crate::{
    entities::builty,
    errors::ServiceError,
    services::builty::{BuiltyDraft, BuiltyInput, BuiltyListQuery, BuiltyView, DraftQuery},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};

#[utoipa::path(
    get,
    path = "/api/v1/builty",
    summary = "List builty",
    params(BuiltyListQuery),
    responses(
        (status = 200, description = "Builty retrieved successfully", body = ApiResponse<Vec<BuiltyView>>),
    ),
    tag = "builty"
)]
pub async fn list_builty(
    State(state): State<AppState>,
    Query(query): Query<BuiltyListQuery>,
) -> ApiResult<Vec<BuiltyView>> {
    let rows = state.services.builty.list(&query).await?;
    Ok(Json(ApiResponse::success(rows)))
}

#[utoipa::path(
    get,
    path = "/api/v1/builty/{id}",
    summary = "Get builty",
    params(("id" = i32, Path, description = "Builty id")),
    responses(
        (status = 200, description = "Builty retrieved successfully", body = ApiResponse<BuiltyView>),
        (status = 404, description = "Builty not found", body = crate::errors::ErrorResponse),
    ),
    tag = "builty"
)]
pub async fn get_builty(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<BuiltyView> {
    let row = state.services.builty.get(id).await?;
    Ok(Json(ApiResponse::success(row)))
}

/// Pre-fill a builty from an order
#[utoipa::path(
    get,
    path = "/api/v1/builty/draft",
    summary = "Builty draft",
    description = "Copies the order's route, goods, weights and parties; blank contacts fall back to the party's primary person",
    params(DraftQuery),
    responses(
        (status = 200, description = "Draft built", body = ApiResponse<BuiltyDraft>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "builty"
)]
pub async fn builty_draft(
    State(state): State<AppState>,
    Query(query): Query<DraftQuery>,
) -> ApiResult<BuiltyDraft> {
    let draft = state.services.builty.draft(query.order_id).await?;
    Ok(Json(ApiResponse::success(draft)))
}

/// Dispatch an order by issuing its builty
#[utoipa::path(
    post,
    path = "/api/v1/builty",
    summary = "Create builty",
    description = "Creates the builty, copies its parties onto the order and marks the order DISPATCHED in one transaction",
    request_body(content = BuiltyInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Builty created", body = crate::handlers::common::MutationResponse<builty::Model>),
        (status = 303, description = "Builty created, redirecting to it"),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order or a referenced row not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "The order already has a builty", body = crate::errors::ErrorResponse),
    ),
    tag = "builty"
)]
pub async fn create_builty(
    State(state): State<AppState>,
    mode: ResponseMode,
    FormOrJson(input): FormOrJson<BuiltyInput>,
) -> Result<Mutation<builty::Model>, ServiceError> {
    let created = state.services.builty.create(input).await?;
    Ok(Mutation::created(
        mode,
        format!(
            "Builty #{} created, order #{} dispatched",
            created.id, created.order_id
        ),
        redirect_to(format!("/builty/{}", created.id)),
        created,
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/builty/{id}",
    summary = "Update builty",
    params(("id" = i32, Path, description = "Builty id")),
    request_body = BuiltyInput,
    responses(
        (status = 200, description = "Builty updated", body = crate::handlers::common::MutationResponse<builty::Model>),
        (status = 303, description = "Builty updated, redirecting to it"),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Builty not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Builty was modified concurrently", body = crate::errors::ErrorResponse),
    ),
    tag = "builty"
)]
pub async fn update_builty(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mode: ResponseMode,
    FormOrJson(input): FormOrJson<BuiltyInput>,
) -> Result<Mutation<builty::Model>, ServiceError> {
    let updated = state.services.builty.edit(id, input).await?;
    Ok(Mutation::ok(
        mode,
        format!("Builty #{} updated", id),
        redirect_to(format!("/builty/{}", id)),
        updated,
    ))
}
