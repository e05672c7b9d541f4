//! Error response normalization
//!
//! The API is documented to answer failures with a `{code, message}` JSON
//! object, but it sometimes sends HTML error pages or nothing useful at all.
//! Whatever arrives, the caller gets an [`Error`] describing it.

use lc_core::error::UNDECODABLE_BODY;
use lc_core::{ApiCallFailedError, Error, ErrorBody};
use reqwest::Response;

/// Convert a failed response body into an error.
///
/// `body` is `None` when the body could not be read. This never panics,
/// whatever the shape of the body.
pub fn normalize(status: u16, body: Option<&[u8]>) -> Error {
    let Some(body) = body else {
        return Error::DubiousResponse(UNDECODABLE_BODY.to_string());
    };

    if let Ok(decoded) = serde_json::from_slice::<ErrorBody>(body) {
        return ApiCallFailedError::new(decoded, status).into();
    }

    if body.first() == Some(&b'<') {
        tracing::warn!(status, "API answered with an HTML error page");
        let flattened: Vec<u8> = body
            .iter()
            .copied()
            .filter(|b| *b != b'\r' && *b != b'\n')
            .collect();
        return Error::DubiousResponse(String::from_utf8_lossy(&flattened).into_owned());
    }

    tracing::warn!(status, len = body.len(), "API error body is not JSON");
    Error::DubiousResponse(UNDECODABLE_BODY.to_string())
}

/// Read the body of a failed response and normalize it
pub async fn normalize_response(response: Response) -> Error {
    let status = response.status().as_u16();
    match response.bytes().await {
        Ok(body) => normalize(status, Some(&body[..])),
        Err(e) => {
            tracing::debug!(status, error = %e, "failed to read error response body");
            normalize(status, None)
        }
    }
}
