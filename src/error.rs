//! Error types for the file-search CLI

use std::time::Duration;
use thiserror::Error;

use crate::directory::ResourceKind;

/// Result type alias for file-search operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

/// API-related errors
///
/// `Clone` because one directory fetch outcome is handed to every caller
/// that was waiting on the same refresh.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error(
        "Authentication failed. Set an API key with --api-key, --api-key-env, the config file, or GOOGLE_API_KEY/GEMINI_API_KEY."
    )]
    Unauthorized,

    #[error("Access denied. The API key does not have permission to access this resource.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Retry after {0:?}")]
    RateLimit(Duration),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl ApiError {
    /// Failures that may succeed on a later attempt (unavailable or throttled).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::RateLimit(_)
                | ApiError::ServerError(_)
                | ApiError::Network(_)
                | ApiError::Timeout(_)
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Failures turning a user-supplied name into a resource identifier
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("{kind} not found: no {kind} has the display name \"{value}\"")]
    NotFound { kind: ResourceKind, value: String },

    #[error(
        "{kind} name \"{value}\" is ambiguous; it matches {}. Pass one of these identifiers instead of the display name.",
        .candidates.join(", ")
    )]
    Ambiguous {
        kind: ResourceKind,
        value: String,
        candidates: Vec<String>,
    },

    #[error(
        "Cannot look up {kind} \"{value}\" by name without an API key. Configure credentials or pass the {kind} identifier."
    )]
    Unauthenticated { kind: ResourceKind, value: String },

    #[error(
        "Cannot look up {kind} \"{value}\" by name: name lookups are disabled (completion_enabled=false). Pass the {kind} identifier instead."
    )]
    LookupsDisabled { kind: ResourceKind, value: String },

    #[error(
        "Document \"{value}\" needs a store to be resolved by name. Use --store or --store-id, or pass the full document identifier."
    )]
    MissingParent { value: String },

    #[error(transparent)]
    Directory(#[from] ApiError),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(
        "API key not set. Use --api-key, --api-key-env, the config file, or GOOGLE_API_KEY/GEMINI_API_KEY."
    )]
    MissingApiKey,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
