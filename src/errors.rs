use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{error::DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// `from_station_id` -> `From station`
fn field_label(field: &str) -> String {
    let words = field.strip_suffix("_id").unwrap_or(field).replace('_', " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A single per-field problem reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "driver_id")]
    pub field: String,
    #[schema(example = "Driver is required")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Flattens validator output into one entry per failed rule, ordered by field name.
    pub fn from_validation(errors: &validator::ValidationErrors) -> Vec<FieldError> {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));

        fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let message = match (&err.message, err.code.as_ref()) {
                        (Some(m), _) => m.to_string(),
                        (None, "required") => format!("{} is required", field_label(field)),
                        (None, _) => format!("{} is invalid", field),
                    };
                    FieldError::new(field, message)
                })
            })
            .collect()
    }
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "success": false,
    "error": "Bad Request",
    "message": "Validation failed",
    "errors": [{"field": "driver_id", "message": "Driver is required"}],
    "request_id": "req-abc123xyz",
    "timestamp": "2024-12-09T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// Always false; lets form clients share one success check
    pub success: bool,
    /// HTTP status category (e.g., "Not Found", "Bad Request", "Internal Server Error")
    #[schema(example = "Not Found")]
    pub error: String,
    /// Human-readable error description
    #[schema(example = "Order 42 not found")]
    pub message: String,
    /// Field-level errors for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    /// Unique request identifier for support and debugging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "req-abc123xyz")]
    pub request_id: Option<String>,
    /// ISO 8601 timestamp when error occurred
    #[schema(example = "2024-12-09T10:30:00.000Z")]
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        DbErr,
    ),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed")]
    FieldErrors(Vec<FieldError>),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Duplicate submission: {0}")]
    DuplicateSubmission(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Concurrent modification of {entity} {id}")]
    ConcurrentModification { entity: &'static str, id: i32 },

    #[error("{0}")]
    Transient(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::FieldErrors(FieldError::from_validation(&err))
    }
}

/// True when the database rejected the statement because of lock contention.
pub fn is_lock_contention(err: &DbErr) -> bool {
    let message = err.to_string().to_ascii_lowercase();
    message.contains("deadlock")
        || message.contains("database is locked")
        || message.contains("lock wait timeout")
        || message.contains("could not serialize access")
}

impl ServiceError {
    /// Classifies a database error raised while performing `action`
    /// (e.g. "Order creation"): lock contention becomes a retry hint, unique
    /// violations become conflicts, everything else stays a database error.
    pub fn from_db(action: &str, err: DbErr) -> Self {
        if is_lock_contention(&err) {
            return ServiceError::Transient(format!(
                "{} failed due to system load. Please try again.",
                action
            ));
        }
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                ServiceError::Conflict(format!("{} conflicts with an existing record: {}", action, detail))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => ServiceError::Conflict(format!(
                "{} references a record that does not exist or is still in use",
                action
            )),
            _ => ServiceError::DatabaseError(err),
        }
    }

    /// Single-message convenience for one failing field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::FieldErrors(vec![FieldError::new(field, message)])
    }

    pub fn not_found(entity: &str, id: i32) -> Self {
        ServiceError::NotFound(format!("{} {} not found", entity, id))
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::FieldErrors(_) | Self::InvalidStatus(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::DuplicateSubmission(_) | Self::Conflict(_) | Self::ConcurrentModification { .. } => {
                StatusCode::CONFLICT
            }
            Self::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::InternalError(_) => "Internal server error".to_string(),
            Self::DuplicateSubmission(msg) | Self::Transient(msg) => msg.clone(),
            _ => self.to_string(),
        }
    }

    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            Self::FieldErrors(errors) => Some(errors),
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let err = ErrorResponse {
            success: false,
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            errors: self.field_errors().map(|e| e.to_vec()),
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}
