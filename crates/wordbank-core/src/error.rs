//! Error types for wordbank operations.
//!
//! Every fallible operation in the workspace returns [`WordbankResult`]. Variants
//! carry an [`ErrorCode`] so transports can map failures without string matching.

use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for wordbank operations.
pub type WordbankResult<T> = Result<T, WordbankError>;

/// Main error type for all wordbank operations.
#[derive(Error, Debug)]
pub enum WordbankError {
    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        details: HashMap<String, String>,
        suggestion: Option<String>,
    },

    /// An answer or deletion arrived while no word was being shown.
    #[error("No current word for user '{username}'")]
    NoCurrentWord { username: String, code: ErrorCode },

    /// Dictionary credentials were rejected.
    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Dictionary rate limit exceeded.
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        code: ErrorCode,
        retry_after: Option<u64>,
    },

    /// Dictionary lookup failed.
    #[error("Dictionary error: {message}")]
    Dictionary {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network error.
    #[error("Network error: {message}")]
    Network {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Parse error.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Authentication (AUTH_xxx)
    AuthInvalidKey,
    AuthMissingCredentials,

    // Validation (VAL_xxx)
    ValInvalidInput,
    ValInvalidConfig,

    // Review (REV_xxx)
    RevNoCurrentWord,
    RevCorruptedRecord,

    // Rate Limit (RATE_xxx)
    RateLimitExceeded,

    // Dictionary (DICT_xxx)
    DictConnectionFailed,
    DictLookupFailed,
    DictInvalidResponse,

    // Database (DB_xxx)
    DbConnectionFailed,
    DbOperationFailed,

    // Network (NET_xxx)
    NetTimeout,
    NetConnectionFailed,

    // Parse (PARSE_xxx)
    ParseInvalidJson,
    ParseMissingField,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthInvalidKey => "AUTH_001",
            ErrorCode::AuthMissingCredentials => "AUTH_002",
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValInvalidConfig => "VAL_002",
            ErrorCode::RevNoCurrentWord => "REV_001",
            ErrorCode::RevCorruptedRecord => "REV_002",
            ErrorCode::RateLimitExceeded => "RATE_001",
            ErrorCode::DictConnectionFailed => "DICT_001",
            ErrorCode::DictLookupFailed => "DICT_002",
            ErrorCode::DictInvalidResponse => "DICT_003",
            ErrorCode::DbConnectionFailed => "DB_001",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::NetTimeout => "NET_001",
            ErrorCode::NetConnectionFailed => "NET_002",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::ParseMissingField => "PARSE_002",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl WordbankError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            details: HashMap::new(),
            suggestion: None,
        }
    }

    /// Create a validation error with suggestion.
    pub fn validation_with_suggestion(
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            details: HashMap::new(),
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create the precondition error for answering without a shown word.
    pub fn no_current_word(username: impl Into<String>) -> Self {
        Self::NoCurrentWord {
            username: username.into(),
            code: ErrorCode::RevNoCurrentWord,
        }
    }

    /// Create a dictionary error.
    pub fn dictionary(message: impl Into<String>) -> Self {
        Self::Dictionary {
            message: message.into(),
            code: ErrorCode::DictLookupFailed,
            source: None,
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidJson,
        }
    }

    /// Create an error for a stored word list that cannot be decoded.
    pub fn corrupted_record(username: &str, reason: impl std::fmt::Display) -> Self {
        Self::Parse {
            message: format!("Stored word list for '{}' is corrupted: {}", username, reason),
            code: ErrorCode::RevCorruptedRecord,
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Create an API error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetConnectionFailed,
            source: None,
        }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            code: ErrorCode::AuthInvalidKey,
            source: None,
        }
    }

    /// Create a rate limit error.
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimit {
            message: message.into(),
            code: ErrorCode::RateLimitExceeded,
            retry_after: None,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::NoCurrentWord { code, .. } => *code,
            Self::Authentication { code, .. } => *code,
            Self::RateLimit { code, .. } => *code,
            Self::Dictionary { code, .. } => *code,
            Self::Database { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            Self::Configuration(_) => ErrorCode::ValInvalidConfig,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::RateLimit { .. } | Self::Dictionary { .. }
        )
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Authentication { .. } => {
                Some("Please check the dictionary app id and key")
            }
            Self::RateLimit { .. } => Some("Please wait before submitting more words"),
            Self::NoCurrentWord { .. } => Some("Ask for the next word before answering"),
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Dictionary { .. } => Some("Please check your dictionary provider configuration"),
            _ => None,
        }
    }

    /// Convert from HTTP status code (for dictionary client errors).
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            400 => Self::Validation {
                message: body.to_string(),
                code: ErrorCode::ValInvalidInput,
                details: HashMap::new(),
                suggestion: Some("Please check the submitted word".to_string()),
            },
            401 | 403 => Self::Authentication {
                message: body.to_string(),
                code: ErrorCode::AuthInvalidKey,
                source: None,
            },
            429 => Self::RateLimit {
                message: body.to_string(),
                code: ErrorCode::RateLimitExceeded,
                retry_after: None,
            },
            500..=599 => Self::Dictionary {
                message: format!("HTTP {}: {}", status, body),
                code: ErrorCode::DictConnectionFailed,
                source: None,
            },
            _ => Self::Internal(format!("HTTP {}: {}", status, body)),
        }
    }
}

impl From<rusqlite::Error> for WordbankError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            code: ErrorCode::DbOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}
