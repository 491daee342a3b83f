//! Configuration for platform access and batch submission.
//!
//! Two TOML files feed a run: a settings file (organization, source, hosts)
//! and a credentials file (API token, SSH key). Both are loaded once into a
//! [`PlatformConfig`] that is handed to every component that needs it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::error::{PushError, Result};

/// Default administration API host.
pub const DEFAULT_PLATFORM_URL: &str = "https://platformdev.cloud.coveo.com";

/// Default Push API host.
pub const DEFAULT_PUSH_API_URL: &str = "https://apidev.cloud.coveo.com";

/// Default batch size for field definitions.
pub const DEFAULT_FIELD_BATCH_SIZE: usize = 250;

/// Default batch size for documents.
pub const DEFAULT_DOCUMENT_BATCH_SIZE: usize = 5000;

/// General settings, usually read from `settings.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Organization that owns the index.
    pub organization_id: String,
    /// Push source receiving documents.
    pub source_id: String,
    /// Remote machine used for the reverse SSH tunnel.
    pub aws_machine_url: String,
    /// Administration API host (fields, search).
    #[serde(default = "default_platform_url")]
    pub platform_url: String,
    /// Push API host (file staging, document batches).
    #[serde(default = "default_push_api_url")]
    pub push_api_url: String,
}

fn default_platform_url() -> String {
    DEFAULT_PLATFORM_URL.to_string()
}

fn default_push_api_url() -> String {
    DEFAULT_PUSH_API_URL.to_string()
}

/// Secrets, usually read from `credentials.toml`.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    /// Bearer token for the platform APIs.
    pub token: String,
    /// Private key used for the reverse tunnel.
    pub ssh_key: String,
    /// API key for the OMDb metadata provider.
    #[serde(default)]
    pub omdb_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("ssh_key", &self.ssh_key)
            .field("omdb_api_key", &self.omdb_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Everything a run needs to reach the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformConfig {
    pub settings: Settings,
    pub credentials: Credentials,
}

impl PlatformConfig {
    /// Load and validate both configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`PushError::Io`] if a file is missing, [`PushError::Toml`] if
    /// it is malformed, and [`PushError::Config`] if a required value is empty.
    pub fn load(settings_path: impl AsRef<Path>, credentials_path: impl AsRef<Path>) -> Result<Self> {
        let settings: Settings = read_toml(settings_path.as_ref())?;
        let credentials: Credentials = read_toml(credentials_path.as_ref())?;
        Self::new(settings, credentials)
    }

    /// Validate already-parsed settings and credentials.
    pub fn new(settings: Settings, credentials: Credentials) -> Result<Self> {
        require_non_empty("organization_id", &settings.organization_id)?;
        require_non_empty("source_id", &settings.source_id)?;
        require_non_empty("platform_url", &settings.platform_url)?;
        require_non_empty("push_api_url", &settings.push_api_url)?;
        require_non_empty("token", &credentials.token)?;
        Ok(Self { settings, credentials })
    }

    /// Administration API base URL without a trailing slash.
    pub fn platform_url(&self) -> &str {
        self.settings.platform_url.trim_end_matches('/')
    }

    /// Push API base URL without a trailing slash.
    pub fn push_api_url(&self) -> &str {
        self.settings.push_api_url.trim_end_matches('/')
    }

    pub fn organization_id(&self) -> &str {
        &self.settings.organization_id
    }

    pub fn source_id(&self) -> &str {
        &self.settings.source_id
    }
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| PushError::io(path, e))?;
    toml::from_str(&raw).map_err(|source| PushError::Toml { path: path.to_path_buf(), source })
}

fn require_non_empty(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PushError::Config(format!("`{key}` must not be empty")));
    }
    Ok(())
}

/// How a collection is split and what happens when a batch fails.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchPolicy {
    /// Maximum number of items per batch.
    pub batch_size: usize,
    /// Abort the remaining batches after the first failure.
    pub stop_on_first_failure: bool,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self { batch_size: DEFAULT_FIELD_BATCH_SIZE, stop_on_first_failure: false }
    }
}

impl BatchPolicy {
    /// Create a new builder for constructing a [`BatchPolicy`].
    pub fn builder() -> BatchPolicyBuilder {
        BatchPolicyBuilder::default()
    }

    /// Default policy for field definitions (250 per batch, continue on error).
    pub fn fields() -> Self {
        Self::default()
    }

    /// Default policy for documents (5000 per batch, continue on error).
    pub fn documents() -> Self {
        Self { batch_size: DEFAULT_DOCUMENT_BATCH_SIZE, ..Self::default() }
    }
}

/// Builder for constructing a validated [`BatchPolicy`].
#[derive(Debug, Clone, Default)]
pub struct BatchPolicyBuilder {
    policy: BatchPolicy,
}

impl BatchPolicyBuilder {
    /// Set the maximum batch size.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.policy.batch_size = size;
        self
    }

    /// Stop after the first failed batch instead of continuing.
    pub fn stop_on_first_failure(mut self, stop: bool) -> Self {
        self.policy.stop_on_first_failure = stop;
        self
    }

    /// Build the [`BatchPolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`PushError::Config`] if `batch_size == 0`.
    pub fn build(self) -> Result<BatchPolicy> {
        if self.policy.batch_size == 0 {
            return Err(PushError::Config("batch_size must be greater than zero".to_string()));
        }
        Ok(self.policy)
    }
}
