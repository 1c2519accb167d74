//! Error handling for the HTTP transport.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Convert from wordbank-core errors
impl From<wordbank_core::WordbankError> for ApiError {
    fn from(err: wordbank_core::WordbankError) -> Self {
        use wordbank_core::WordbankError;

        let code = err.code().as_str();
        let suggestion = err.suggestion().map(str::to_string);
        let api = match &err {
            WordbankError::Validation { message, .. } => {
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, code, message.clone())
            }
            WordbankError::NoCurrentWord { .. } => {
                ApiError::new(StatusCode::CONFLICT, code, err.to_string())
            }
            WordbankError::Configuration(msg) => ApiError::bad_request(msg.clone()),
            WordbankError::RateLimit { message, .. } => {
                ApiError::new(StatusCode::TOO_MANY_REQUESTS, code, message.clone())
            }
            _ => ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, code, err.to_string()),
        };

        match suggestion {
            Some(suggestion) => api.with_details(serde_json::json!({ "suggestion": suggestion })),
            None => api,
        }
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use wordbank_core::WordbankError;

    #[test]
    fn test_no_current_word_is_conflict() {
        let api = ApiError::from(WordbankError::no_current_word("alice"));
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.code, "REV_001");
        assert!(api.details.unwrap()["suggestion"].is_string());
    }

    #[test]
    fn test_status_mapping() {
        let api = ApiError::from(WordbankError::from_http_status(429, "slow down"));
        assert_eq!(api.status, StatusCode::TOO_MANY_REQUESTS);

        let api = ApiError::from(WordbankError::validation("bad word"));
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api.code, "VAL_001");

        let api = ApiError::from(WordbankError::database("locked"));
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.code, "DB_002");

        let api = ApiError::from(WordbankError::Configuration("no lexicon".to_string()));
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, "no lexicon");
    }
}
