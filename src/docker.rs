// ABOUTME: DockerApi facade: one client, every endpoint family.
// ABOUTME: Construction registers the client unless built detached.

use crate::api::{Config, System};
use crate::client::Client;
use crate::config::ClientConfig;
use crate::registry;
use crate::resource::Collection;

/// Single entry point to an engine.
///
/// A facade always dispatches through the client it was built with, even
/// if a later construction replaces the registered client.
#[derive(Debug, Clone)]
pub struct DockerApi {
    client: Client,
}

impl DockerApi {
    /// Connect to `base_url` and register the client process-wide.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            client: registry::set_instance_with(config),
        }
    }

    /// Build from `DOCKER_HOST` / `DOCKER_API_VERSION` and register it.
    pub fn from_env() -> Self {
        Self::with_config(ClientConfig::from_env())
    }

    /// A facade that leaves the registry untouched.
    pub fn detached(config: ClientConfig) -> Self {
        Self {
            client: Client::with_config(config),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn configs(&self) -> Collection<Config> {
        Collection::new(self.client.clone())
    }

    pub fn system(&self) -> System {
        System::new(self.client.clone())
    }
}
