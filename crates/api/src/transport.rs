//! HTTP transport for the management API
//!
//! [`Transport`] performs single exchanges with the API: the unauthenticated
//! token request and bearer-authenticated calls. It holds no token state and
//! never retries.

use std::time::Duration;

use bytes::Bytes;
use lc_core::{Credentials, Error, Result, TimeoutConfig, Token};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::normalize::{normalize, normalize_response};

/// Path of the token endpoint, relative to the API base URL
pub const AUTH_TOKEN_PATH: &str = "/auth/token";

const APPLICATION_JSON: &str = "application/json";

/// Open body of a successful response.
///
/// The underlying connection is released when this value is consumed or
/// dropped, so every exit path of the caller closes it.
#[derive(Debug)]
pub struct ResponseBody {
    inner: Response,
}

impl ResponseBody {
    fn new(inner: Response) -> Self {
        Self { inner }
    }

    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Body length, if the server declared it
    pub fn content_length(&self) -> Option<u64> {
        self.inner.content_length()
    }

    /// Read the whole body and decode it as JSON
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| Error::Decode(e.to_string()))
    }

    pub async fn bytes(self) -> Result<Bytes> {
        self.inner.bytes().await.map_err(Error::transport)
    }

    pub async fn text(self) -> Result<String> {
        self.inner.text().await.map_err(Error::transport)
    }

    /// Next chunk of the body, or `None` once it is exhausted
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        self.inner.chunk().await.map_err(Error::transport)
    }

    /// Give up the wrapper and take the raw response
    pub fn into_inner(self) -> Response {
        self.inner
    }
}

/// Executes requests against the API
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
}

impl Transport {
    /// Create a transport with default timeouts
    pub fn new() -> Result<Self> {
        Self::with_timeouts(&TimeoutConfig::default())
    }

    /// Create a transport with the given timeouts
    pub fn with_timeouts(timeouts: &TimeoutConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(timeouts.connect_ms))
            .timeout(Duration::from_millis(timeouts.request_ms))
            .build()
            .map_err(Error::transport)?;
        Ok(Self { http })
    }

    /// Use an already configured reqwest client
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Issue one bearer-authenticated request.
    ///
    /// `payload` is sent as a JSON body for every method except GET. A 200
    /// response hands back the open body; anything else becomes an error.
    pub async fn request(
        &self,
        token: &str,
        method: Method,
        url: &str,
        payload: Option<Vec<u8>>,
    ) -> Result<ResponseBody> {
        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT, APPLICATION_JSON)
            .header(AUTHORIZATION, format!("Bearer {token}"));

        if method != Method::GET {
            builder = builder
                .header(CONTENT_TYPE, APPLICATION_JSON)
                .body(payload.unwrap_or_default());
        }

        let response = builder.send().await.map_err(Error::transport)?;
        let status = response.status();
        tracing::debug!(%method, url, status = status.as_u16(), "API request completed");

        if status != StatusCode::OK {
            return Err(error_from_response(response).await);
        }

        Ok(ResponseBody::new(response))
    }

    /// Exchange credentials for a token at `{base_url}/auth/token`.
    ///
    /// This call carries no bearer token.
    pub async fn authenticate(&self, credentials: &Credentials, base_url: &str) -> Result<Token> {
        let payload = serde_json::to_vec(credentials)?;
        let url = format!("{base_url}{AUTH_TOKEN_PATH}");

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCEPT, APPLICATION_JSON)
            .body(payload)
            .send()
            .await
            .map_err(Error::transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(url, status = status.as_u16(), "authentication rejected");
            return Err(normalize_response(response).await);
        }

        let token: Token = ResponseBody::new(response).json().await?;
        tracing::info!(
            account_id = credentials.account_id(),
            expiration_sec = %token.expiration_sec,
            "authenticated with the API"
        );
        Ok(token)
    }
}

/// Turn a non-200 response into an error.
///
/// A body that turns out to be empty, whether declared with
/// `Content-Length: 0` or sent chunked with no data, is never decoded.
async fn error_from_response(response: Response) -> Error {
    let status = response.status().as_u16();
    if response.content_length() == Some(0) {
        return Error::EmptyErrorBody { status };
    }
    match response.bytes().await {
        Ok(body) if body.is_empty() => Error::EmptyErrorBody { status },
        Ok(body) => normalize(status, Some(&body[..])),
        Err(e) => {
            tracing::debug!(status, error = %e, "failed to read error response body");
            normalize(status, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_builds_with_defaults() {
        assert!(Transport::new().is_ok());
    }

    #[test]
    fn test_transport_builds_with_timeouts() {
        let timeouts = TimeoutConfig {
            connect_ms: 100,
            request_ms: 1000,
        };
        assert!(Transport::with_timeouts(&timeouts).is_ok());
    }

    #[tokio::test]
    async fn test_transport_error_is_surfaced() {
        let transport = Transport::new().unwrap();
        let err = transport
            .request("tok", Method::GET, "http://127.0.0.1:1/auth/token", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
