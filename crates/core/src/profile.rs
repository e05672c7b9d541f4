//! Profile management
//!
//! Profiles are named sets of account credentials together with the API
//! endpoint they authenticate against.

use serde::{Deserialize, Serialize};

use crate::auth::Credentials;
use crate::config::{ConfigManager, DEFAULT_API_URL};
use crate::error::{Error, Result};

/// Timeout configuration for a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_ms: u64,

    /// Whole-request timeout in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_ms: u64,
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_request_timeout() -> u64 {
    30000
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: default_connect_timeout(),
            request_ms: default_request_timeout(),
        }
    }
}

/// A named Lyve Cloud account
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name for this profile
    pub name: String,

    /// Base URL of the management API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Account ID
    pub account_id: String,

    /// Access key
    pub access_key: String,

    /// Secret
    pub secret: String,

    /// Timeout configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutConfig>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Profile {
    /// Create a new profile against the production API
    pub fn new(
        name: impl Into<String>,
        account_id: impl Into<String>,
        access_key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            api_url: default_api_url(),
            account_id: account_id.into(),
            access_key: access_key.into(),
            secret: secret.into(),
            timeout: None,
        }
    }

    /// Point the profile at a different API endpoint
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Credentials to exchange for a token
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.account_id, &self.access_key, &self.secret)
    }

    /// Get the effective timeout configuration
    pub fn timeout_config(&self) -> TimeoutConfig {
        self.timeout.clone().unwrap_or_default()
    }

    /// Check that the API URL is an absolute URL
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api_url)?;
        Ok(())
    }
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("api_url", &self.api_url)
            .field("account_id", &self.account_id)
            .field("access_key", &self.access_key)
            .field("secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Named-profile operations on top of the configuration file.
///
/// Every call reads the file afresh; mutations write it back immediately.
#[derive(Debug, Clone)]
pub struct ProfileManager {
    config: ConfigManager,
}

impl ProfileManager {
    /// Manage profiles in the default configuration file
    pub fn new() -> Result<Self> {
        Ok(Self::with_config_manager(ConfigManager::new()?))
    }

    pub fn with_config_manager(config: ConfigManager) -> Self {
        Self { config }
    }

    pub fn list(&self) -> Result<Vec<Profile>> {
        Ok(self.config.load()?.profiles)
    }

    pub fn get(&self, name: &str) -> Result<Profile> {
        self.config
            .load()?
            .profile(name)
            .cloned()
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }

    /// The profile selected when a caller names none
    pub fn default_profile(&self) -> Result<Profile> {
        let config = self.config.load()?;
        let Some(name) = config.defaults.profile.as_deref() else {
            return Err(Error::Config("no default profile configured".into()));
        };
        config
            .profile(name)
            .cloned()
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }

    pub fn set_default(&self, name: &str) -> Result<()> {
        let mut config = self.config.load()?;
        if config.profile(name).is_none() {
            return Err(Error::ProfileNotFound(name.to_string()));
        }
        config.defaults.profile = Some(name.to_string());
        self.config.save(&config)
    }

    /// Store `profile`, replacing one of the same name
    pub fn set(&self, profile: Profile) -> Result<()> {
        profile.validate()?;
        let mut config = self.config.load()?;
        config.upsert_profile(profile);
        self.config.save(&config)
    }

    /// Store `profile` unless its name is already taken
    pub fn add(&self, profile: Profile) -> Result<()> {
        profile.validate()?;
        let mut config = self.config.load()?;
        if config.profile(&profile.name).is_some() {
            return Err(Error::ProfileExists(profile.name));
        }
        config.upsert_profile(profile);
        self.config.save(&config)
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config.load()?;
        if config.remove_profile(name).is_none() {
            return Err(Error::ProfileNotFound(name.to_string()));
        }
        self.config.save(&config)
    }

    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.config.load()?.profile(name).is_some())
    }
}
