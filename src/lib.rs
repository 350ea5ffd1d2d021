//! Transport API Library
//!
//! Orders, dispatch receipts (builty), the shared phone directory and the
//! reference tables behind a road-transport booking office.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod common;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<db::DbPool>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<db::DbPool>, config: config::AppConfig, event_sender: events::EventSender) -> Self {
        let services =
            handlers::AppServices::new(db.clone(), Arc::new(event_sender.clone()), &config);
        Self {
            db,
            config,
            event_sender,
            services,
        }
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-123"), async {
                ApiResponse::success("ok")
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[test]
    fn response_outside_a_request_has_no_request_id() {
        let response = ApiResponse::success(1).with_message("done");
        assert_eq!(response.message.as_deref(), Some("done"));
        assert!(response.meta.expect("metadata expected").request_id.is_none());
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Everything served under `/api/v1`. Mutations accept POST as well as
/// PUT/DELETE so plain HTML forms can reach them.
pub fn api_v1_routes() -> Router<AppState> {
    let orders = Router::new()
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route(
            "/orders/:id",
            get(handlers::orders::get_order)
                .put(handlers::orders::update_order)
                .post(handlers::orders::update_order)
                .delete(handlers::orders::delete_order),
        )
        .route(
            "/orders/:id/status",
            post(handlers::orders::update_order_status),
        )
        .route("/orders/:id/delete", post(handlers::orders::delete_order));

    let builty = Router::new()
        .route(
            "/builty",
            get(handlers::builty::list_builty).post(handlers::builty::create_builty),
        )
        .route("/builty/draft", get(handlers::builty::builty_draft))
        .route(
            "/builty/:id",
            get(handlers::builty::get_builty)
                .put(handlers::builty::update_builty)
                .post(handlers::builty::update_builty),
        );

    let phonebook = Router::new()
        .route("/phonebook/search", get(handlers::phonebook::search_phones))
        .route("/phonebook/persons", post(handlers::phonebook::add_person))
        .route(
            "/phonebook/persons/:id/primary",
            post(handlers::phonebook::set_primary_person),
        )
        .route(
            "/phonebook/persons/:id/phones",
            get(handlers::phonebook::list_person_phones),
        )
        .route("/phonebook/phones", post(handlers::phonebook::add_phone))
        .route(
            "/phonebook/phones/:id",
            axum::routing::put(handlers::phonebook::update_phone)
                .post(handlers::phonebook::update_phone)
                .delete(handlers::phonebook::delete_phone),
        )
        .route(
            "/phonebook/phones/:id/delete",
            post(handlers::phonebook::delete_phone),
        )
        .route(
            "/phonebook/phones/:id/primary",
            post(handlers::phonebook::set_primary_phone),
        )
        .route(
            "/phonebook/entities/:kind/:id/persons",
            get(handlers::phonebook::list_entity_persons),
        )
        .route(
            "/phonebook/entities/:kind/:id/phones",
            get(handlers::phonebook::list_entity_phones),
        );

    let reference = Router::new()
        .route(
            "/lookup/:kind",
            get(handlers::reference::lookup).post(handlers::reference::quick_create),
        )
        .route("/reference/:kind", get(handlers::reference::list_reference))
        .route(
            "/reference/:kind/:id",
            get(handlers::reference::get_reference).put(handlers::reference::update_reference),
        );

    Router::new()
        // Status and health endpoints
        .route("/status", get(handlers::health::status))
        .route("/health", get(handlers::health::health_check))
        .route(
            "/transaction-logs",
            get(handlers::audit::list_transaction_logs),
        )
        .merge(orders)
        .merge(builty)
        .merge(phonebook)
        .merge(reference)
}

/// The full application: versioned API, Swagger UI, request ids and HTTP
/// tracing. CORS is layered on by the server binary.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .layer(crate::tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}
