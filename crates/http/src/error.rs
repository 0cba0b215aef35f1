//! Error handling for the bookshelf HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Body shared by every message-only response, success or failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Application error types that map to HTTP responses.
///
/// The message is what the client sees. The optional source is only logged.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("unprocessable entity: {message}")]
    Unprocessable {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("not found: {message}")]
    NotFound {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("bad request: {message}")]
    BadRequest {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl AppError {
    /// Create an unprocessable entity error (422)
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Unprocessable {
            message: message.into(),
            source: None,
        }
    }

    /// Create a not found error (404)
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            source: None,
        }
    }

    /// Create a bad request error (400)
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal server error (500)
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause for logging
    pub fn with_source(mut self, cause: impl Into<BoxError>) -> Self {
        let slot = match &mut self {
            AppError::Unprocessable { source, .. }
            | AppError::NotFound { source, .. }
            | AppError::BadRequest { source, .. }
            | AppError::Internal { source, .. } => source,
        };
        *slot = Some(cause.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Unprocessable { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::BadRequest { message, .. }
            | AppError::Internal { message, .. } => message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status();

        let (message, source) = match self {
            AppError::Unprocessable { message, source }
            | AppError::NotFound { message, source }
            | AppError::BadRequest { message, source }
            | AppError::Internal { message, source } => (message, source),
        };

        match &source {
            Some(cause) if status.is_server_error() => tracing::error!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                cause = %cause,
                "{}",
                message
            ),
            Some(cause) => tracing::warn!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                cause = %cause,
                "{}",
                message
            ),
            None => tracing::warn!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                "{}",
                message
            ),
        }

        (status, Json(MessageBody { message })).into_response()
    }
}
