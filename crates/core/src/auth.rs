//! Credentials and token types
//!
//! [`Credentials`] are exchanged once for a [`Token`]. The token carries its
//! validity as a relative number of seconds; [`TokenDetails`] pins that to an
//! absolute expiry at the moment the token was received.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Account credentials accepted by the `/auth/token` endpoint
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    account_id: String,
    access_key: String,
    secret: String,
}

impl Credentials {
    pub fn new(
        account_id: impl Into<String>,
        access_key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            access_key: access_key.into(),
            secret: secret.into(),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("access_key", &self.access_key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Token as returned by the API.
///
/// `expiration_sec` is the number of seconds the token stays valid, encoded
/// as a string. The introspection endpoint omits `token`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub expiration_sec: String,
}

impl Token {
    /// Remaining validity reported by the API
    pub fn expires_in(&self) -> Result<SignedDuration> {
        self.expiration_sec
            .parse::<i64>()
            .map(SignedDuration::from_secs)
            .map_err(|_| Error::InvalidExpiration(self.expiration_sec.clone()))
    }
}

/// Compute the absolute expiry of a token received at `received_at`.
///
/// The result is truncated to whole seconds: the API reports validity in
/// seconds and neither clock skew nor network latency is accounted for.
pub fn expiry_from(received_at: Timestamp, validity: SignedDuration) -> Result<Timestamp> {
    let expires = received_at.checked_add(validity)?;
    Ok(Timestamp::from_second(expires.as_second())?)
}

/// Token state held by a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDetails {
    token: String,
    expires_after: Timestamp,
    issued_at: Timestamp,
}

impl TokenDetails {
    /// Pin `token` to an absolute expiry, `validity` after `issued_at`
    pub fn new(
        token: impl Into<String>,
        issued_at: Timestamp,
        validity: SignedDuration,
    ) -> Result<Self> {
        Ok(Self {
            token: token.into(),
            expires_after: expiry_from(issued_at, validity)?,
            issued_at,
        })
    }

    /// Build details from an API token received at `issued_at`
    pub fn from_token(token: Token, issued_at: Timestamp) -> Result<Self> {
        let validity = token.expires_in()?;
        Self::new(token.token, issued_at, validity)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Estimated moment after which the token is no longer accepted
    pub fn expires_after(&self) -> Timestamp {
        self.expires_after
    }

    /// Moment the token was received
    pub fn issued_at(&self) -> Timestamp {
        self.issued_at
    }

    /// Whether the token is believed expired at `now`
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now > self.expires_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_wire_format() {
        let creds = Credentials::new("acct", "AKEY", "s3cr3t");
        let value = serde_json::to_value(&creds).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"accountId": "acct", "accessKey": "AKEY", "secret": "s3cr3t"})
        );
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let creds = Credentials::new("acct", "AKEY", "s3cr3t");
        let debug = format!("{creds:?}");
        assert!(debug.contains("AKEY"));
        assert!(!debug.contains("s3cr3t"));
    }

    #[test]
    fn test_token_decode_without_token_field() {
        let tok: Token = serde_json::from_str(r#"{"expirationSec":"86400"}"#).unwrap();
        assert!(tok.token.is_empty());
        assert_eq!(tok.expires_in().unwrap(), SignedDuration::from_secs(86400));
    }

    #[test]
    fn test_token_invalid_expiration() {
        let tok = Token {
            token: "abc".into(),
            expiration_sec: "1d".into(),
        };
        assert!(matches!(tok.expires_in(), Err(Error::InvalidExpiration(s)) if s == "1d"));

        let tok = Token::default();
        assert!(tok.expires_in().is_err());
    }

    #[test]
    fn test_expiry_truncates_to_seconds() {
        let received: Timestamp = "2024-03-01T12:00:00.750Z".parse().unwrap();
        let expiry = expiry_from(received, SignedDuration::from_secs(30)).unwrap();
        assert_eq!(expiry, "2024-03-01T12:00:30Z".parse::<Timestamp>().unwrap());
    }

    #[test]
    fn test_token_details_expiry() {
        let issued: Timestamp = "2024-03-01T12:00:00Z".parse().unwrap();
        let tok = Token {
            token: "abc".into(),
            expiration_sec: "30".into(),
        };
        let details = TokenDetails::from_token(tok, issued).unwrap();
        assert_eq!(details.token(), "abc");
        assert_eq!(details.issued_at(), issued);

        let before = issued.checked_add(SignedDuration::from_secs(29)).unwrap();
        let after = issued.checked_add(SignedDuration::from_secs(31)).unwrap();
        assert!(!details.is_expired_at(issued));
        assert!(!details.is_expired_at(before));
        assert!(details.is_expired_at(after));
    }
}
