//! Shared helpers for the mock-server tests

#![allow(dead_code)]

use jiff::Timestamp;
use lc_api::Client;
use lc_core::Credentials;
use serde_json::json;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path prefix the mock API is served under, like the real `/v2`
pub const API_PREFIX: &str = "/v2";

pub fn credentials() -> Credentials {
    Credentials::new("mock-account", "mock-access-key", "mock-secret")
}

pub fn api_url(server: &MockServer) -> String {
    format!("{}{API_PREFIX}", server.uri())
}

pub fn api_path(rest: &str) -> String {
    format!("{API_PREFIX}{rest}")
}

/// Answer token requests with `token`, valid for `expiration_sec`
pub async fn mount_auth(server: &MockServer, token: &str, expiration_sec: &str) {
    Mock::given(method("POST"))
        .and(path(api_path("/auth/token")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": token,
            "expirationSec": expiration_sec,
        })))
        .mount(server)
        .await;
}

/// Route client logs to the test output, filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init();
}

/// A client authenticated against `server` with the token `abc`
pub async fn connected_client(server: &MockServer) -> Client {
    init_tracing();
    mount_auth(server, "abc", "86400").await;
    Client::connect(&credentials(), &api_url(server))
        .await
        .unwrap()
}

/// Assert `actual` is within one second of now plus `secs`
pub fn assert_within_a_second_of_now_plus(actual: Timestamp, secs: i64) {
    let expected = Timestamp::now().as_second() + secs;
    let drift = (actual.as_second() - expected).abs();
    assert!(drift <= 1, "{actual} is {drift}s away from now + {secs}s");
}
