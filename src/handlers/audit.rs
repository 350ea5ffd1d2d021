use crate::{
    entities::transaction_log,
    services::audit::AuditQuery,
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};

/// Most recent audit entries, newest first
#[utoipa::path(
    get,
    path = "/api/v1/transaction-logs",
    summary = "List audit log entries",
    params(AuditQuery),
    responses(
        (status = 200, description = "Audit entries", body = ApiResponse<Vec<transaction_log::Model>>),
    ),
    tag = "audit"
)]
pub async fn list_transaction_logs(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> ApiResult<Vec<transaction_log::Model>> {
    let entries = state.services.audit.list(&query).await?;
    Ok(Json(ApiResponse::success(entries)))
}
