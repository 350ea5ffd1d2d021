use super::common::{redirect_to, FormOrJson, Mutation, ResponseMode};
use crate::{
    entities::order,
    errors::ServiceError,
    services::orders::{OrderInput, OrderListQuery, OrderView, StatusInput},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};

/// List orders
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    summary = "List orders",
    description = "Orders newest first, filtered by status bucket and a free-text query",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Orders retrieved successfully", body = ApiResponse<Vec<OrderView>>,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> ApiResult<Vec<OrderView>> {
    let orders = state.services.orders.list(&query).await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// Get an order with the display names of everything it references
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    summary = "Get order",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order retrieved successfully", body = ApiResponse<OrderView>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn get_order(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<OrderView> {
    let order = state.services.orders.get(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// Create an order
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    summary = "Create order",
    description = "Accepts a form post or JSON. Identical submissions inside the duplicate window are rejected.",
    request_body(content = OrderInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Order created", body = crate::handlers::common::MutationResponse<order::Model>),
        (status = 303, description = "Order created, redirecting to it"),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "A referenced row does not exist", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate submission", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    mode: ResponseMode,
    FormOrJson(input): FormOrJson<OrderInput>,
) -> Result<Mutation<order::Model>, ServiceError> {
    let created = state.services.orders.create(input).await?;
    Ok(Mutation::created(
        mode,
        format!("Order #{} created", created.id),
        redirect_to(format!("/orders/{}", created.id)),
        created,
    ))
}

/// Edit an order; party changes are pushed to its builty
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}",
    summary = "Update order",
    params(("id" = i32, Path, description = "Order id")),
    request_body = OrderInput,
    responses(
        (status = 200, description = "Order updated", body = crate::handlers::common::MutationResponse<order::Model>),
        (status = 303, description = "Order updated, redirecting to it"),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Order was modified concurrently", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mode: ResponseMode,
    FormOrJson(input): FormOrJson<OrderInput>,
) -> Result<Mutation<order::Model>, ServiceError> {
    let updated = state.services.orders.edit(id, input).await?;
    Ok(Mutation::ok(
        mode,
        format!("Order #{} updated", id),
        redirect_to(format!("/orders/{}", id)),
        updated,
    ))
}

/// Set an order's status
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/status",
    summary = "Update order status",
    description = "Any non-empty status is accepted unless the strict status policy is configured",
    params(("id" = i32, Path, description = "Order id")),
    request_body = StatusInput,
    responses(
        (status = 200, description = "Status updated", body = crate::handlers::common::MutationResponse<order::Model>),
        (status = 303, description = "Status updated, redirecting to the order"),
        (status = 400, description = "Missing or disallowed status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mode: ResponseMode,
    FormOrJson(input): FormOrJson<StatusInput>,
) -> Result<Mutation<order::Model>, ServiceError> {
    let status = input.status.unwrap_or_default();
    let updated = state.services.orders.set_status(id, &status).await?;
    Ok(Mutation::ok(
        mode,
        format!("Order #{} marked {}", id, updated.status),
        redirect_to(format!("/orders/{}", id)),
        updated,
    ))
}

/// Delete an order together with its builty
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    summary = "Delete order",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order deleted"),
        (status = 303, description = "Order deleted, redirecting to the list"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mode: ResponseMode,
) -> Result<Mutation<()>, ServiceError> {
    state.services.orders.delete(id).await?;
    Ok(Mutation::done(
        mode,
        format!("Order #{} deleted", id),
        redirect_to("/orders"),
    ))
}
