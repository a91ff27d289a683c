//! Client configuration model.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_ROOT, DOCKER_API_VERSION_ENV, DOCKER_HOST_ENV, DOCKER_TIMEOUT_ENV,
};
use crate::error::{DockwireError, Result};

/// Settings for reaching a Docker daemon over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the remote API, e.g. `http://localhost:2375`.
    pub api_root: String,
    /// Remote API version to pin, e.g. `1.41`. Unversioned paths when absent.
    pub api_version: Option<String>,
    /// Whole-request timeout in seconds. The transport default applies when absent.
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            api_version: None,
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for the given API root.
    ///
    /// # Errors
    ///
    /// Returns `DockwireError::Config` if the root uses an unsupported scheme.
    pub fn new(api_root: &str) -> Result<Self> {
        Ok(Self {
            api_root: normalize_api_root(api_root)?,
            ..Self::default()
        })
    }

    /// Builds a configuration from `DOCKER_HOST`, `DOCKER_API_VERSION`, and
    /// `DOCKER_CLIENT_TIMEOUT`.
    ///
    /// # Errors
    ///
    /// Returns `DockwireError::Config` if `DOCKER_HOST` is not a TCP/HTTP
    /// endpoint or the timeout is not a whole number of seconds.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `DockwireError::Config` if the host or timeout value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(host) = lookup(DOCKER_HOST_ENV).filter(|h| !h.is_empty()) {
            config.api_root = normalize_api_root(&host)?;
        }
        config.api_version = lookup(DOCKER_API_VERSION_ENV).filter(|v| !v.is_empty());
        if let Some(secs) = lookup(DOCKER_TIMEOUT_ENV).filter(|t| !t.is_empty()) {
            let secs = secs.trim().parse().map_err(|_| DockwireError::Config {
                message: format!("{DOCKER_TIMEOUT_ENV} must be a number of seconds, got {secs:?}"),
            })?;
            config.timeout_secs = Some(secs);
        }
        Ok(config)
    }

    /// Path prefix selecting the pinned API version, or `""`.
    #[must_use]
    pub fn version_prefix(&self) -> String {
        self.api_version
            .as_deref()
            .map_or_else(String::new, |v| format!("/v{}", v.trim_start_matches('v')))
    }
}

/// Rewrites `tcp://` to `http://` and strips trailing slashes.
fn normalize_api_root(root: &str) -> Result<String> {
    let root = root.trim().trim_end_matches('/');
    if let Some(rest) = root.strip_prefix("tcp://") {
        return Ok(format!("http://{rest}"));
    }
    if root.starts_with("http://") || root.starts_with("https://") {
        return Ok(root.to_string());
    }
    Err(DockwireError::Config {
        message: format!("unsupported docker host {root:?}: only tcp:// and http(s):// endpoints are reachable"),
    })
}
