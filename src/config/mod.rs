//! Process-level configuration: NSRDB credentials, endpoint and transport settings.
//!
//! A [`Config`] is loaded once at start-up (from a JSON file, then environment
//! overrides, then command-line overrides) and passed explicitly to
//! [`crate::RequestBuilder`] and [`crate::ResponseFetcher`]. Nothing in the library
//! reads credentials from process-wide state.

pub mod error;

use crate::config::error::ConfigError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR_NAME: &str = "nsrdb-pv";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_ENDPOINT: &str = "https://developer.nrel.gov/api/nsrdb/v2/solar/psm3-download.csv";
pub const DEFAULT_AFFILIATION: &str = "myself";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

pub const ENV_API_KEY: &str = "NSRDB_API_KEY";
pub const ENV_EMAIL: &str = "NSRDB_EMAIL";
pub const ENV_USERNAME: &str = "NSRDB_USERNAME";

/// NSRDB account credentials.
///
/// All three fields are required when building a request; `username` is sent as
/// `full_name`. The `Debug` output never shows the API key.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub api_key: String,
    pub email: String,
    pub username: String,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        email: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            email: email.into(),
            username: username.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("Credentials")
            .field("api_key", &api_key)
            .field("email", &self.email)
            .field("username", &self.username)
            .finish()
    }
}

/// Settings shared by every request made during one invocation.
///
/// Missing fields in the JSON file fall back to their defaults, so a file containing only
/// `{"credentials": {"api_key": "...", "email": "..."}}` is a complete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub credentials: Credentials,
    /// PSM3 CSV download endpoint.
    pub endpoint: String,
    /// Value of the `affiliation` query parameter.
    pub affiliation: String,
    /// Request timeout in seconds. `0` disables the timeout.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            affiliation: DEFAULT_AFFILIATION.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Default config file location, e.g. `~/.config/nsrdb-pv/config.json` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Reads a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let config: Config =
            serde_json::from_str(&text).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reads the config file at [`Config::default_path`], or returns [`Config::default`]
    /// when that file does not exist.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            Some(path) => {
                debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                debug!("Could not determine config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Applies `NSRDB_API_KEY`, `NSRDB_EMAIL` and `NSRDB_USERNAME` when they are set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(api_key) = non_empty(ENV_API_KEY) {
            self.credentials.api_key = api_key;
        }
        if let Some(email) = non_empty(ENV_EMAIL) {
            self.credentials.email = email;
        }
        if let Some(username) = non_empty(ENV_USERNAME) {
            self.credentials.username = username;
        }
        self
    }

    /// The request timeout, or `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
