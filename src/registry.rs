// ABOUTME: Process-wide client slot for callers that don't thread a Client through.
// ABOUTME: Last set_instance wins; handles already obtained keep their own client.

use crate::client::{ByteStream, Client};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::resource::{Collection, Resource};
use crate::transport::RequestOptions;
use hyper::Method;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;

static INSTANCE: RwLock<Option<Client>> = parking_lot::const_rwlock(None);

/// Build a client for `base_url`, register it, and return the handle.
///
/// Replaces any previously registered client. URL problems are reported by
/// the first dispatch, not here.
pub fn set_instance(base_url: impl Into<String>) -> Client {
    set_instance_with(ClientConfig::new(base_url))
}

pub fn set_instance_with(config: ClientConfig) -> Client {
    let client = Client::with_config(config);
    install(client.clone());
    client
}

/// Register an existing client.
pub fn install(client: Client) {
    tracing::debug!("registering engine client for {}", client.base_url());
    if let Some(previous) = INSTANCE.write().replace(client) {
        tracing::debug!("replaced engine client for {}", previous.base_url());
    }
}

/// The registered client.
pub fn instance() -> Result<Client> {
    INSTANCE.read().clone().ok_or(Error::Uninitialized)
}

/// A resource family bound to the registered client.
pub fn collection<R: Resource>() -> Result<Collection<R>> {
    Ok(Collection::new(instance()?))
}

/// [`Client::json_endpoint`] through the registered client.
pub async fn json_endpoint<R: DeserializeOwned>(
    method: Method,
    path: &str,
    options: RequestOptions,
) -> Result<R> {
    instance()?.json_endpoint(method, path, options).await
}

/// [`Client::string_endpoint`] through the registered client.
pub async fn string_endpoint(method: Method, path: &str, options: RequestOptions) -> Result<String> {
    instance()?.string_endpoint(method, path, options).await
}

/// [`Client::stream_endpoint`] through the registered client.
pub async fn stream_endpoint(path: &str, options: RequestOptions) -> Result<ByteStream> {
    instance()?.stream_endpoint(path, options).await
}
