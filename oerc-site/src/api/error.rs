//! HTTP error mapping
//!
//! Every handler error becomes `{"error": "..."}` with a status code chosen
//! by kind. Backend write failures also carry the backend's own message under
//! `detail`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::BackendError;
use crate::views::{AdminError, ChatError, LibraryError, MembershipError};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    /// Backend rejected or failed a write
    BackendFailure { message: String, detail: String },
    /// No backend configured
    Unavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            ApiError::BackendFailure { message, detail } => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": message, "detail": detail }),
            ),
            ApiError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<LibraryError> for ApiError {
    fn from(e: LibraryError) -> Self {
        match e {
            LibraryError::Busy => ApiError::Conflict(e.to_string()),
            LibraryError::PaperNotFound(_) => ApiError::NotFound(e.to_string()),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Empty => ApiError::BadRequest(e.to_string()),
            ChatError::Busy => ApiError::Conflict(e.to_string()),
        }
    }
}

impl From<MembershipError> for ApiError {
    fn from(e: MembershipError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<AdminError> for ApiError {
    fn from(e: AdminError) -> Self {
        let message = e.to_string();
        match e {
            AdminError::Unauthenticated | AdminError::LoginFailed(_) => {
                ApiError::Unauthorized(message)
            }
            AdminError::SignInInProgress
            | AdminError::UploadInProgress
            | AdminError::DeleteInProgress(_)
            | AdminError::ConfirmationRequired => ApiError::Conflict(message),
            AdminError::MissingField(_) => ApiError::BadRequest(message),
            AdminError::UploadFailed(source) | AdminError::DeleteFailed(source) => match source {
                BackendError::NotConfigured => ApiError::Unavailable(source.to_string()),
                BackendError::NotFound(_) => ApiError::NotFound(source.to_string()),
                other => ApiError::BackendFailure {
                    message,
                    detail: other.to_string(),
                },
            },
        }
    }
}
