//! Error types for lc-core
//!
//! Every failure surfaced by the client, from transport problems to
//! structured API rejections, is represented by [`Error`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{ErrorCatalog, KnownError};

/// Result type alias for lc-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error coming from the underlying HTTP stack
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Message used when an error body could neither be parsed nor salvaged
pub const UNDECODABLE_BODY: &str = "unable to decode response body";

/// Error types for client operations
#[derive(Error, Debug)]
pub enum Error {
    /// DNS, connection or timeout failure, passed through untouched
    #[error(transparent)]
    Transport(TransportError),

    /// Non-200 response without any body to explain it
    #[error("non-200 response did not come with any reason for failure")]
    EmptyErrorBody {
        /// HTTP status of the response
        status: u16,
    },

    /// Non-200 response whose body is not the documented JSON error object
    #[error("dubious response from the API: {0}")]
    DubiousResponse(String),

    /// Structured rejection returned by the API
    #[error(transparent)]
    Api(#[from] ApiCallFailedError),

    /// Successful response whose payload could not be decoded
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Token validity returned by the API is not a whole number of seconds
    #[error("invalid token expiration: {0:?}")]
    InvalidExpiration(String),

    /// Policy-type permission submitted without a policy document
    #[error("permission is missing required policy JSON document")]
    PolicyMissing,

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Profile not found
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Profile already exists
    #[error("Profile already exists: {0}")]
    ProfileExists(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Timestamp arithmetic error
    #[error("Time error: {0}")]
    Time(#[from] jiff::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Wrap an error from the HTTP stack without altering its message
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Transport(Box::new(err))
    }

    /// The structured API error, if this is one
    pub fn api_error(&self) -> Option<&ApiCallFailedError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Error code reported by the API, if any
    pub fn api_code(&self) -> Option<&str> {
        self.api_error().map(ApiCallFailedError::code)
    }

    /// HTTP status of the failed response, when one was received
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::Api(e) => Some(e.http_status_code()),
            Error::EmptyErrorBody { status } => Some(*status),
            _ => None,
        }
    }

    /// Look the API error code up in `catalog`
    pub fn classify(&self, catalog: &ErrorCatalog) -> Option<KnownError> {
        self.api_error().and_then(|e| e.classify(catalog))
    }
}

/// Error object as it appears on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code, e.g. `PermissionNotFound`
    #[serde(default)]
    pub code: String,

    /// Human-readable explanation
    #[serde(default)]
    pub message: String,
}

/// A request the API understood and rejected with a `{code, message}` body.
///
/// The display form is `request failed: <message> (<code>)`, substituting
/// placeholders when either field is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCallFailedError {
    body: ErrorBody,
    http_status_code: u16,
}

impl ApiCallFailedError {
    /// Create an error from its decoded body and the response status
    pub fn new(body: ErrorBody, http_status_code: u16) -> Self {
        Self {
            body,
            http_status_code,
        }
    }

    pub fn code(&self) -> &str {
        &self.body.code
    }

    pub fn message(&self) -> &str {
        &self.body.message
    }

    pub fn http_status_code(&self) -> u16 {
        self.http_status_code
    }

    /// Serialize back to the JSON object the API sent
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "code": self.body.code,
            "message": self.body.message,
        })
        .to_string()
    }

    /// Known meaning of this error's code, if `catalog` has one
    pub fn classify(&self, catalog: &ErrorCatalog) -> Option<KnownError> {
        catalog.lookup(self.code())
    }

    fn display_message(&self) -> &str {
        if self.body.message.is_empty() {
            "no additional information given"
        } else {
            &self.body.message
        }
    }

    fn display_code(&self) -> &str {
        if self.body.code.is_empty() {
            "unknown"
        } else {
            &self.body.code
        }
    }
}

impl std::fmt::Display for ApiCallFailedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "request failed: {} ({})",
            self.display_message(),
            self.display_code()
        )
    }
}

impl std::error::Error for ApiCallFailedError {}
