use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Request-level failure taxonomy. Every variant maps to exactly one
/// status code and a stable client-facing message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Please provide both username and password")]
    MissingCredentials,
    #[error("User does not exist")]
    UserNotFound,
    #[error("Incorrect password")]
    IncorrectPassword,
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("Authentication required")]
    Unauthorized,
    #[error("Not found")]
    NotFound,
    #[error("Referenced player does not exist")]
    InvalidReference,
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCredentials
            | ApiError::UserAlreadyExists
            | ApiError::InvalidReference => StatusCode::BAD_REQUEST,
            ApiError::UserNotFound | ApiError::IncorrectPassword | ApiError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // The cause stays in the log; the wire gets the generic message.
        if let ApiError::Internal(ref cause) = self {
            error!("Request failed: {:#}", cause);
        }

        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
