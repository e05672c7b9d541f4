//! Client configuration file
//!
//! Profiles are persisted as TOML in `<config dir>/lyvecloud/config.toml`.
//! `LYVECLOUD_CONFIG_DIR` replaces the directory part, which is how tests
//! and containers point the client at a throwaway location.
//!
//! The file carries a `schema_version`; files written by an older release
//! are upgraded on load, files from a newer release are refused.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::profile::Profile;

/// Layout version written to new configuration files.
///
/// Raising it needs a matching arm in [`ConfigManager::upgrade`].
pub const SCHEMA_VERSION: u32 = 1;

/// Production entry point of the management API
pub const DEFAULT_API_URL: &str = "https://api.lyvecloud.seagate.com/v2";

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "LYVECLOUD_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";

/// Contents of the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub schema_version: u32,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub profiles: Vec<Profile>,
}

/// Settings applied when a caller does not pick a profile explicitly
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Defaults {
    /// Profile used when none is named
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            defaults: Defaults::default(),
            profiles: Vec::new(),
        }
    }
}

impl Config {
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Insert `profile`, replacing any profile of the same name in place
    pub fn upsert_profile(&mut self, profile: Profile) {
        match self.profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(slot) => *slot = profile,
            None => self.profiles.push(profile),
        }
    }

    /// Drop the named profile and forget it as the default.
    ///
    /// Returns the removed profile, if there was one.
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        let index = self.profiles.iter().position(|p| p.name == name)?;
        if self.defaults.profile.as_deref() == Some(name) {
            self.defaults.profile = None;
        }
        Some(self.profiles.remove(index))
    }
}

/// Where the configuration file lives when no path is given
fn default_config_path() -> Result<PathBuf> {
    let dir = match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::config_dir()
            .ok_or_else(|| Error::Config("could not determine config directory".into()))?
            .join("lyvecloud"),
    };
    Ok(dir.join(CONFIG_FILE))
}

/// Reads and writes the configuration file
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Use the default location
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: default_config_path()?,
        })
    }

    /// Use an explicit file path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    /// Read the file, or return an empty configuration if there is none
    pub fn load(&self) -> Result<Config> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no configuration file");
                return Ok(Config::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: Config = toml::from_str(&content)?;
        match config.schema_version {
            v if v == SCHEMA_VERSION => Ok(config),
            v if v < SCHEMA_VERSION => Ok(Self::upgrade(config)),
            v => Err(Error::Config(format!(
                "configuration schema {v} is newer than supported schema {SCHEMA_VERSION}"
            ))),
        }
    }

    /// Write `config`, readable by the owner only.
    ///
    /// The file is created owner-only before any content is written, then
    /// renamed over the destination, so a crash never leaves a truncated
    /// file behind.
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let staged = self.path.with_extension("toml.tmp");
        let content = toml::to_string_pretty(config)?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&staged)?;

        // A leftover staged file keeps the mode it was created with.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&staged, &self.path)?;
        Ok(())
    }

    /// Bring a file written by an older release up to [`SCHEMA_VERSION`]
    fn upgrade(mut config: Config) -> Config {
        tracing::info!(
            from = config.schema_version,
            to = SCHEMA_VERSION,
            "upgrading configuration schema"
        );
        // Schema 0 had the same layout, only without the version key.
        config.schema_version = SCHEMA_VERSION;
        config
    }
}
