// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// Errors produced by the proxy handlers, rendered as `{"error": ..., "details"?: ...}`.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // Upstream answered with a non-2xx status; relayed as-is
    Upstream {
        status: StatusCode,
        message: String,
        details: Option<Value>,
    },

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Upstream { status, .. } => *status,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::InvalidJson(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Upstream { message, .. } => message,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Upstream {
                message,
                details: Some(details),
                ..
            } => json!({ "error": message, "details": details }),
            _ => json!({ "error": self.message() }),
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn upstream(status: StatusCode, message: impl Into<String>, details: Option<Value>) -> Self {
        ApiError::Upstream {
            status,
            message: message.into(),
            details,
        }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_carries_details() {
        let err = ApiError::upstream(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Failed to update transaction: Unprocessable Entity",
            Some(json!({ "field": "amount" })),
        );
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.to_json(),
            json!({
                "error": "Failed to update transaction: Unprocessable Entity",
                "details": { "field": "amount" }
            })
        );
    }

    #[test]
    fn plain_errors_render_only_the_message() {
        let err = ApiError::bad_request("Missing transaction ID");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_json(), json!({ "error": "Missing transaction ID" }));
        assert_eq!(ApiError::unauthorized("Unauthorized").status_code(), StatusCode::UNAUTHORIZED);
    }
}
