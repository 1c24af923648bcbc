//! Static configuration: requested scopes, storage path and provider endpoints.
//!
//! Reads a TOML file (see `resolve::config_file`); every key is optional.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::resolve;

pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/drive";
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub google_auth_scope: Vec<String>,
    pub storage_file: PathBuf,
    pub auth_uri: String,
    pub token_uri: String,
    pub http_timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            google_auth_scope: vec![DEFAULT_SCOPE.to_string()],
            storage_file: resolve::default_storage_file(),
            auth_uri: DEFAULT_AUTH_URI.to_string(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            http_timeout_secs: 30,
        }
    }
}

impl AuthConfig {
    /// Parse config TOML. `~` in `storage_file` is expanded.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: AuthConfig = toml::from_str(content)?;
        config.storage_file = resolve::expand_tilde(&config.storage_file.to_string_lossy());
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(mut self, storage_file: Option<&Path>, scopes: &[String]) -> Result<Self> {
        if let Some(path) = storage_file {
            self.storage_file = resolve::expand_tilde(&path.to_string_lossy());
        }
        if !scopes.is_empty() {
            self.google_auth_scope = scopes.to_vec();
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.google_auth_scope.iter().all(|s| s.trim().is_empty()) {
            bail!("google_auth_scope must name at least one scope");
        }
        if self.storage_file.as_os_str().is_empty() {
            bail!("storage_file must not be empty");
        }
        if self.http_timeout_secs == 0 {
            bail!("http_timeout_secs must be at least 1");
        }
        Ok(())
    }
}

/// Load the config from an explicit path or the resolved location.
///
/// An explicit path must exist; the default location may be absent, in
/// which case built-in defaults apply.
pub fn load(path: Option<&Path>) -> Result<AuthConfig> {
    let named = path.map(PathBuf::from).or_else(resolve::config_env);
    let explicit = named.is_some();
    let path = named.unwrap_or_else(resolve::config_file);
    if !path.exists() {
        if explicit {
            bail!("config file not found at {}", path.display());
        }
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AuthConfig::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    AuthConfig::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
}
