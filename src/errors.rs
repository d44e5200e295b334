use axum::{
    response::{IntoResponse, Response},
    {Json, http},
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::{fmt, io};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Server startup error: {0}")]
    Server(String),

    #[error("Catalog client error: {0}")]
    Catalog(String),
}

/// Error returned to HTTP clients.
/// Contains the following fields:
/// - status_code: the HTTP status code to return
/// - error: a short description of the error
/// - message: a longer description of the error
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        error!("I/O Error occurred: {}", err);
        AppError::Server(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return ApiError::internal_server_error(format!("Catalog request timed out: {e}"));
        }

        ApiError::internal_server_error(format!("HTTP error: {e}"))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::internal_server_error(format!("JSON error: {e}"))
    }
}

impl ApiError {
    /// The requested set code is not in the catalog
    pub fn set_not_found() -> Self {
        Self {
            error: "Not Found".to_string(),
            message: "Not found".to_string(),
            status_code: 404,
        }
    }

    /// Fallback for unknown routes
    pub fn not_found() -> Self {
        Self {
            error: "Not Found".to_string(),
            message: "The requested component has not been found.".to_string(),
            status_code: 404,
        }
    }

    pub fn method_not_allowed() -> Self {
        Self {
            error: "Method Not Allowed".to_string(),
            message: "Invalid path or method.".to_string(),
            status_code: 405,
        }
    }

    /// This error is converted in middleware to internal_server_error_user
    pub fn internal_server_error(error: String) -> Self {
        Self {
            error: "Internal Server Error".to_string(),
            message: error,
            status_code: 500,
        }
    }

    /// Internal server error for users, with a generic message
    pub fn internal_server_error_user() -> Self {
        Self {
            error: "Internal Server Error".to_string(),
            message: "An unexpected response was received from the backend.".to_string(),
            status_code: 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiError: {}", self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match self.status_code {
            400 => StatusCode::BAD_REQUEST,
            404 => StatusCode::NOT_FOUND,
            405 => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // 5xx details are logged once, by error_middleware
        (status_code, Json(self)).into_response()
    }
}
