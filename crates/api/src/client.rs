//! Lyve Cloud API client
//!
//! [`Client`] owns the API base URL and the current bearer token. Both live
//! behind a read/write lock so one client can be shared between tasks. The
//! lock is only ever held long enough to copy values out or write new ones
//! in, never across a network call.
//!
//! The client does not renew its token. Once [`Client::token_expired`]
//! reports true, call [`Client::reauthenticate`] or build a new client.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use jiff::{SignedDuration, Timestamp};
use lc_core::auth::expiry_from;
use lc_core::{
    Credentials, DEFAULT_API_URL, ErrorCatalog, Profile, Result, TimeoutConfig, Token,
    TokenDetails,
};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::transport::{AUTH_TOKEN_PATH, ResponseBody, Transport};

#[derive(Clone)]
struct ClientState {
    api_url: String,
    token: TokenDetails,
}

/// Authenticated client for the management API
pub struct Client {
    transport: Transport,
    catalog: ErrorCatalog,
    state: RwLock<ClientState>,
}

impl Client {
    /// Start configuring a client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Authenticate with `credentials` and return a ready client.
    ///
    /// An empty `api_url` selects the production API.
    pub async fn connect(credentials: &Credentials, api_url: &str) -> Result<Self> {
        Self::builder().api_url(api_url).connect(credentials).await
    }

    /// Build a client around a token issued earlier.
    ///
    /// The API is asked how long the token remains valid; this fails if the
    /// token is already expired or otherwise rejected.
    pub async fn with_token(token: impl Into<String>, api_url: &str) -> Result<Self> {
        Self::builder().api_url(api_url).with_token(token).await
    }

    /// Authenticate using a configured profile
    pub async fn from_profile(profile: &Profile) -> Result<Self> {
        Self::builder()
            .api_url(profile.api_url.clone())
            .timeouts(profile.timeout_config())
            .connect(&profile.credentials())
            .await
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ClientState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ClientState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy out the API URL and token for one call
    fn snapshot(&self) -> (String, String) {
        let state = self.read_state();
        (state.api_url.clone(), state.token.token().to_string())
    }

    /// Current bearer token
    pub fn token(&self) -> String {
        self.read_state().token.token().to_string()
    }

    /// Estimated moment after which the token must be replaced
    pub fn expires_after(&self) -> Timestamp {
        self.read_state().token.expires_after()
    }

    /// Moment the current token was received
    pub fn issued_at(&self) -> Timestamp {
        self.read_state().token.issued_at()
    }

    /// Whether the token is believed expired.
    ///
    /// Purely local: compares the clock with the expiry estimated when the
    /// token was received, so it can disagree with the API.
    pub fn token_expired(&self) -> bool {
        let expires_after = self.expires_after();
        Timestamp::now() > expires_after
    }

    /// Ask the API how long the token remains valid and return the
    /// resulting expiry. Client state is left untouched.
    pub async fn token_valid_until(&self) -> Result<Timestamp> {
        let (api_url, token) = self.snapshot();
        let now = Timestamp::now();
        let validity = token_validity(&self.transport, &token, &api_url).await?;
        expiry_from(now, validity)
    }

    /// Exchange `credentials` for a fresh token and start using it
    pub async fn reauthenticate(&self, credentials: &Credentials) -> Result<()> {
        let api_url = self.api_url();
        let token = self.transport.authenticate(credentials, &api_url).await?;
        let details = TokenDetails::from_token(token, Timestamp::now())?;

        tracing::debug!(expires_after = %details.expires_after(), "replacing client token");
        self.write_state().token = details;
        Ok(())
    }

    /// Base URL requests are sent to
    pub fn api_url(&self) -> String {
        self.read_state().api_url.clone()
    }

    /// Redirect subsequent requests to another base URL.
    ///
    /// Meant for tests against mock servers, not for switching endpoints
    /// in the middle of a live session.
    pub fn set_api_url(&self, api_url: impl Into<String>) {
        self.write_state().api_url = api_url.into();
    }

    /// Catalog used to classify API error codes
    pub fn error_catalog(&self) -> &ErrorCatalog {
        &self.catalog
    }

    /// Send an authenticated request to `{api_url}{path}`
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<Vec<u8>>,
    ) -> Result<ResponseBody> {
        let (api_url, token) = self.snapshot();
        let url = format!("{api_url}{path}");
        self.transport.request(&token, method, &url, payload).await
    }

    /// GET `path` and decode the JSON response
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, None).await?.json().await
    }

    /// Send `body` as JSON and decode the JSON response
    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)?;
        self.request(method, path, Some(payload)).await?.json().await
    }

    /// Send a request whose successful response carries nothing of interest
    pub(crate) async fn request_no_response(
        &self,
        method: Method,
        path: &str,
        payload: Option<Vec<u8>>,
    ) -> Result<()> {
        let _body = self.request(method, path, payload).await?;
        Ok(())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read_state();
        f.debug_struct("Client")
            .field("api_url", &state.api_url)
            .field("expires_after", &state.token.expires_after())
            .finish_non_exhaustive()
    }
}

/// Remaining validity of `token` according to the API
async fn token_validity(
    transport: &Transport,
    token: &str,
    api_url: &str,
) -> Result<SignedDuration> {
    let url = format!("{api_url}{AUTH_TOKEN_PATH}");
    let introspected: Token = transport
        .request(token, Method::GET, &url, None)
        .await?
        .json()
        .await?;
    introspected.expires_in()
}

/// Builder for [`Client`]
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    api_url: Option<String>,
    timeouts: Option<TimeoutConfig>,
    catalog: Option<ErrorCatalog>,
    http: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Base URL of the API; empty selects the production API
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// Connection and request timeouts, also bounding authentication
    pub fn timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = Some(timeouts);
        self
    }

    /// Catalog for classifying API error codes
    pub fn error_catalog(mut self, catalog: ErrorCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Use a preconfigured reqwest client; overrides `timeouts`
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    fn resolve_api_url(&self) -> Result<String> {
        let api_url = match self.api_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => DEFAULT_API_URL,
        };
        url::Url::parse(api_url)?;
        Ok(api_url.trim_end_matches('/').to_string())
    }

    fn build_transport(&mut self) -> Result<Transport> {
        match self.http.take() {
            Some(http) => Ok(Transport::from_client(http)),
            None => Transport::with_timeouts(&self.timeouts.clone().unwrap_or_default()),
        }
    }

    fn finish(self, transport: Transport, api_url: String, token: TokenDetails) -> Client {
        Client {
            transport,
            catalog: self.catalog.unwrap_or_default(),
            state: RwLock::new(ClientState { api_url, token }),
        }
    }

    /// Authenticate with `credentials` and build the client
    pub async fn connect(mut self, credentials: &Credentials) -> Result<Client> {
        let api_url = self.resolve_api_url()?;
        let transport = self.build_transport()?;

        let token = transport.authenticate(credentials, &api_url).await?;
        let details = TokenDetails::from_token(token, Timestamp::now())?;

        Ok(self.finish(transport, api_url, details))
    }

    /// Build the client around an existing token, learning its expiry from
    /// the API
    pub async fn with_token(mut self, token: impl Into<String>) -> Result<Client> {
        let token = token.into();
        let api_url = self.resolve_api_url()?;
        let transport = self.build_transport()?;

        let now = Timestamp::now();
        let validity = token_validity(&transport, &token, &api_url).await?;
        let details = TokenDetails::new(token, now, validity)?;

        Ok(self.finish(transport, api_url, details))
    }
}
