//! Error code catalog
//!
//! Maps API error codes onto a small set of errors callers commonly branch
//! on. A catalog is built once and never mutated afterwards; lookups are
//! pure functions of the code.

use std::collections::HashMap;

use thiserror::Error;

/// Errors the API reports often enough to deserve a fixed meaning
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownError {
    #[error("token presented to the API is invalid")]
    InvalidToken,

    #[error("authentication was unsuccessful; check supplied credentials")]
    AuthenticationFailed,

    #[error("permission name is already taken")]
    PermissionExists,

    #[error("permission does not exist")]
    PermissionNotFound,
}

/// Immutable mapping from API error codes to [`KnownError`]
#[derive(Debug, Clone)]
pub struct ErrorCatalog {
    codes: HashMap<String, KnownError>,
}

impl ErrorCatalog {
    /// A catalog with no mappings at all
    pub fn empty() -> Self {
        Self {
            codes: HashMap::new(),
        }
    }

    /// Return a catalog that additionally maps `code` to `known`
    pub fn with_code(mut self, code: impl Into<String>, known: KnownError) -> Self {
        self.codes.insert(code.into(), known);
        self
    }

    /// Resolve an API error code
    pub fn lookup(&self, code: &str) -> Option<KnownError> {
        self.codes.get(code).copied()
    }

    /// Number of mapped codes
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for ErrorCatalog {
    fn default() -> Self {
        Self::empty()
            .with_code("InvalidToken", KnownError::InvalidToken)
            .with_code("AuthenticationFailed", KnownError::AuthenticationFailed)
            // The API sometimes sends this code with a trailing space.
            .with_code("AuthenticationFailed ", KnownError::AuthenticationFailed)
            .with_code("PermissionNameAlreadyExists", KnownError::PermissionExists)
            .with_code("PermissionNotFound", KnownError::PermissionNotFound)
    }
}
