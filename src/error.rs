//! Error types for the ProbModelSEED client
//!
//! Two families of errors live here:
//!
//! - [`ProbModelSeedError`] covers everything that can go wrong locally:
//!   configuration, credential storage, invalid method names or inputs, and
//!   I/O. Application code propagates it through the [`Result`] alias.
//! - [`RpcError`] is the rejection value of a single remote call. It is
//!   `Clone` because one settled outcome is handed to both the pending-call
//!   future and the caller's error callback.

use serde_json::Value;
use thiserror::Error;

/// Status attached to rejections caused by an unparseable success body.
pub const SERVICE_UNAVAILABLE_STATUS: u16 = 503;

/// Status attached to rejections caused by a failed HTTP exchange.
pub const INTERNAL_ERROR_STATUS: u16 = 500;

/// Message used when a failed exchange produced no response body at all.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown Error";

/// Main error type for local ProbModelSEED client operations
#[derive(Error, Debug)]
pub enum ProbModelSeedError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A method name that is not part of the ProbModelSEED catalog
    #[error("Unknown ProbModelSEED method: {0}")]
    InvalidMethod(String),

    /// Input supplied to a method that takes none, or missing where required
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Credential errors (no stored token, bad user id)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// A remote call was rejected
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Rejection value of a ProbModelSEED call.
///
/// Every failed call settles with exactly one of these. The variant decides
/// the numeric status reported by [`RpcError::status`].
///
/// # Examples
///
/// ```
/// use probmodelseed::error::RpcError;
///
/// let err = RpcError::unknown();
/// assert_eq!(err.status(), 500);
/// assert_eq!(err.to_string(), "Service error (500): Unknown Error");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RpcError {
    /// The exchange succeeded but the body was not a usable JSON-RPC
    /// envelope, typically an HTML page from a gateway or proxy.
    #[error("Service unavailable (503): {error} [url: {url}]")]
    MalformedResponse {
        /// Parser message describing why the body was rejected.
        error: String,
        /// The endpoint the request was posted to.
        url: String,
        /// The raw response body, verbatim.
        response: String,
    },

    /// The exchange failed or the server reported an application error.
    #[error("Service error (500): {}", render_error(.error))]
    Service {
        /// The server's `error` value, or a constructed message.
        error: Value,
    },
}

impl RpcError {
    /// The rejection used when a failed exchange carried no body.
    pub fn unknown() -> Self {
        RpcError::Service {
            error: Value::String(UNKNOWN_ERROR_MESSAGE.to_string()),
        }
    }

    /// Numeric status class of this rejection (503 or 500).
    pub fn status(&self) -> u16 {
        match self {
            RpcError::MalformedResponse { .. } => SERVICE_UNAVAILABLE_STATUS,
            RpcError::Service { .. } => INTERNAL_ERROR_STATUS,
        }
    }

    /// The error payload: the parser message or the server's error value.
    pub fn error_value(&self) -> Value {
        match self {
            RpcError::MalformedResponse { error, .. } => Value::String(error.clone()),
            RpcError::Service { error } => error.clone(),
        }
    }

    /// Render the rejection as the JSON object callers log or print.
    ///
    /// Malformed responses carry `status`, `error`, `url` and `resp`;
    /// service errors carry `status` and `error`.
    pub fn to_value(&self) -> Value {
        match self {
            RpcError::MalformedResponse {
                error,
                url,
                response,
            } => serde_json::json!({
                "status": SERVICE_UNAVAILABLE_STATUS,
                "error": error,
                "url": url,
                "resp": response,
            }),
            RpcError::Service { error } => serde_json::json!({
                "status": INTERNAL_ERROR_STATUS,
                "error": error,
            }),
        }
    }
}

fn render_error(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Result type alias for ProbModelSEED client operations
///
/// Uses `anyhow::Error` so that callers get rich context while still being
/// able to downcast to [`ProbModelSeedError`] or [`RpcError`].
pub type Result<T> = anyhow::Result<T>;
