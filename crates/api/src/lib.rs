//! lc-api: HTTP client for the Lyve Cloud management API
//!
//! This crate implements the wire protocol on top of reqwest: token
//! authentication, bearer-authenticated requests, normalization of failed
//! responses, and the ManagementApi trait from lc-core. It is the only
//! crate that depends on an HTTP stack.

pub mod admin;
pub mod client;
pub mod normalize;
pub mod transport;

pub use client::{Client, ClientBuilder};
pub use normalize::normalize;
pub use transport::{ResponseBody, Transport};
