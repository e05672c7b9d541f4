//! lc-core: Core library for the Lyve Cloud management API client
//!
//! This crate provides the transport-independent parts of the client:
//! - Credentials, tokens and token expiry computation
//! - The error taxonomy and the API error-code catalog
//! - Service account, permission and usage types
//! - The ManagementApi trait for resource operations
//! - Configuration and profile management
//!
//! It has no HTTP dependency; `lc-api` implements the wire protocol.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod profile;

pub use admin::ManagementApi;
pub use auth::{Credentials, Token, TokenDetails};
pub use catalog::{ErrorCatalog, KnownError};
pub use config::{Config, ConfigManager, DEFAULT_API_URL};
pub use error::{ApiCallFailedError, Error, ErrorBody, Result};
pub use profile::{Profile, ProfileManager, TimeoutConfig};
