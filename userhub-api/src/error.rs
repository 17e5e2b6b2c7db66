/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`, so every failure ends as a JSON
/// body with a status code and nothing escapes the handler boundary.
///
/// # Response bodies
///
/// - Most errors: `{"error": "<message>"}`
/// - Missing user: `{"message": "User does not exist", "<key>": <value>}`
///
/// Persistence errors carry the driver's message verbatim. Existing clients
/// display it, so it is not sanitised.
///
/// # Example
///
/// ```
/// use userhub_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::{json, Value};
///
/// async fn handler(id: &str) -> ApiResult<Json<Value>> {
///     let id: i32 = id
///         .parse()
///         .map_err(|_| ApiError::BadRequest("Invalid user id".to_string()))?;
///     Ok(Json(json!({ "id": id })))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use userhub_shared::repository::RepositoryError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Message of every "user not found" response
pub const USER_NOT_FOUND: &str = "User does not exist";

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// No user matched (404)
    ///
    /// `key` names the lookup field echoed back next to the message.
    NotFound { key: &'static str, value: Value },

    /// Database operation failed (500), message sent as is
    Persistence(String),

    /// Writing an uploaded file failed (500)
    FileStore(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Persistence(_) | ApiError::FileStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::NotFound { key, value } => write!(f, "Not found: {} {}", key, value),
            ApiError::Persistence(msg) => write!(f, "Persistence error: {}", msg),
            ApiError::FileStore(msg) => write!(f, "File store error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        match self {
            ApiError::NotFound { key, value } => {
                let mut body = json!({ "message": USER_NOT_FOUND });
                body[key] = value;
                (status, Json(body)).into_response()
            }
            ApiError::BadRequest(msg) | ApiError::Persistence(msg) | ApiError::FileStore(msg) => {
                (status, Json(ErrorResponse { error: msg })).into_response()
            }
        }
    }
}

/// Convert repository errors to API errors
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::Persistence(err.to_string())
    }
}
