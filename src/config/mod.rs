// ABOUTME: Client configuration: base URL, API version prefix, default headers.
// ABOUTME: Deserializable for embedding in app config, or discovered from DOCKER_HOST.

use serde::Deserialize;
use std::collections::BTreeMap;

pub const DOCKER_HOST_ENV: &str = "DOCKER_HOST";
pub const DOCKER_API_VERSION_ENV: &str = "DOCKER_API_VERSION";
pub const DEFAULT_DOCKER_HOST: &str = "unix:///var/run/docker.sock";
pub const DEFAULT_USER_AGENT: &str = concat!("dockapi/", env!("CARGO_PKG_VERSION"));

/// Everything a [`Client`](crate::Client) needs to reach one engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// `http://host[:port][/prefix]`, `tcp://host:port` or `unix:///path/to/socket`.
    pub base_url: String,

    /// API version appended to the base URL path, e.g. `1.41` or `v1.41`.
    #[serde(default)]
    pub api_version: Option<String>,

    /// Headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_version: None,
            headers: BTreeMap::new(),
            user_agent: default_user_agent(),
        }
    }

    /// Build a configuration from `DOCKER_HOST` and `DOCKER_API_VERSION`.
    ///
    /// Falls back to the local Docker socket with no version prefix, which
    /// lets the engine pick its own default API version.
    pub fn from_env() -> Self {
        let base_url = std::env::var(DOCKER_HOST_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DOCKER_HOST.to_string());

        let mut config = Self::new(base_url);
        config.api_version = std::env::var(DOCKER_API_VERSION_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());
        config
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The version path segment, normalized to carry a leading `v`.
    pub(crate) fn version_segment(&self) -> Option<String> {
        let version = self.api_version.as_deref()?.trim().trim_matches('/');
        if version.is_empty() {
            return None;
        }
        if version.starts_with('v') {
            Some(version.to_string())
        } else {
            Some(format!("v{}", version))
        }
    }
}
