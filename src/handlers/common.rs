use crate::errors::ServiceError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{de::DeserializeOwned, Serialize};
use std::convert::Infallible;
use tracing::info;
use utoipa::ToSchema;

/// Prefix of every redirect target handed back to callers.
pub const API_PREFIX: &str = "/api/v1";

pub fn redirect_to(path: impl AsRef<str>) -> String {
    format!("{}{}", API_PREFIX, path.as_ref())
}

/// Request body accepted either as `application/json` or as
/// `application/x-www-form-urlencoded`. Decoding failures surface as 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormOrJson<T>(pub T);

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            let ct = ct.to_ascii_lowercase();
            ct.starts_with("application/json") || ct.contains("+json")
        })
        .unwrap_or(false)
}

#[async_trait]
impl<S, T> FromRequest<S> for FormOrJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(req.headers()) {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| ServiceError::BadRequest(e.body_text()))?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ServiceError::BadRequest(e.body_text()))?;
            Ok(Self(value))
        }
    }
}

/// How a mutation reports success: a JSON envelope for programmatic
/// callers, a `303 See Other` for browser form posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    Ajax,
    Redirect,
}

impl ResponseMode {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let xhr = headers
            .get("x-requested-with")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
        let wants_json = headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.to_ascii_lowercase().contains("application/json"));

        if xhr || wants_json {
            ResponseMode::Ajax
        } else {
            ResponseMode::Redirect
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ResponseMode
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// Success envelope returned to programmatic callers.
#[derive(Debug, Serialize, ToSchema)]
pub struct MutationResponse<T> {
    pub success: bool,
    pub message: String,
    pub redirect_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Outcome of a successful mutation, rendered according to [`ResponseMode`].
pub struct Mutation<T> {
    mode: ResponseMode,
    status: StatusCode,
    message: String,
    redirect_url: String,
    data: Option<T>,
}

impl<T> Mutation<T> {
    pub fn ok(mode: ResponseMode, message: impl Into<String>, redirect_url: String, data: T) -> Self {
        Self {
            mode,
            status: StatusCode::OK,
            message: message.into(),
            redirect_url,
            data: Some(data),
        }
    }

    pub fn created(mode: ResponseMode, message: impl Into<String>, redirect_url: String, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::ok(mode, message, redirect_url, data)
        }
    }
}

impl Mutation<()> {
    pub fn done(mode: ResponseMode, message: impl Into<String>, redirect_url: String) -> Self {
        Self {
            mode,
            status: StatusCode::OK,
            message: message.into(),
            redirect_url,
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Mutation<T> {
    fn into_response(self) -> Response {
        info!(redirect = %self.redirect_url, "{}", self.message);
        match self.mode {
            ResponseMode::Ajax => (
                self.status,
                Json(MutationResponse {
                    success: true,
                    message: self.message,
                    redirect_url: self.redirect_url,
                    data: self.data,
                }),
            )
                .into_response(),
            ResponseMode::Redirect => {
                (StatusCode::SEE_OTHER, [(header::LOCATION, self.redirect_url)]).into_response()
            }
        }
    }
}
