// ABOUTME: Engine-level system endpoints: ping, version, info, and the event feed.
// ABOUTME: Exercises text dispatch (ping) and stream dispatch (events).

use super::json_lines::{JsonLines, json_lines};
use crate::client::{ByteStream, Client};
use crate::error::Result;
use crate::transport::RequestOptions;
use hyper::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// System endpoints bound to one client.
#[derive(Debug, Clone)]
pub struct System {
    client: Client,
}

impl System {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// `GET _ping`. The engine answers with the plain text `OK`.
    pub async fn ping(&self) -> Result<String> {
        self.client
            .string_endpoint(Method::GET, "_ping", RequestOptions::new())
            .await
    }

    /// `GET version`
    pub async fn version(&self) -> Result<SystemVersion> {
        self.client
            .json_endpoint(Method::GET, "version", RequestOptions::new())
            .await
    }

    /// `GET info`
    pub async fn info(&self) -> Result<SystemInfo> {
        self.client
            .json_endpoint(Method::GET, "info", RequestOptions::new())
            .await
    }

    /// `GET events` as raw frames.
    ///
    /// Without `until` the feed stays open until the stream is dropped.
    pub async fn events(&self, query: &EventsQuery) -> Result<ByteStream> {
        let options = RequestOptions::new().query_from(query)?;
        self.client.stream_endpoint("events", options).await
    }

    /// `GET events` decoded one message per line.
    pub async fn event_messages(&self, query: &EventsQuery) -> Result<JsonLines<EventMessage>> {
        Ok(json_lines(self.events(query).await?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemVersion {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(rename = "MinAPIVersion", default)]
    pub min_api_version: Option<String>,
    #[serde(default)]
    pub git_commit: Option<String>,
    #[serde(default)]
    pub go_version: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub kernel_version: Option<String>,
}

/// The subset of `/info` callers usually need. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemInfo {
    #[serde(rename = "ID", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub server_version: Option<String>,
    #[serde(default)]
    pub containers: Option<u64>,
    #[serde(default)]
    pub containers_running: Option<u64>,
    #[serde(default)]
    pub images: Option<u64>,
    #[serde(default)]
    pub operating_system: Option<String>,
    #[serde(default)]
    pub architecture: Option<String>,
    #[serde(rename = "NCPU", default)]
    pub ncpu: Option<u64>,
    #[serde(default)]
    pub mem_total: Option<u64>,
    #[serde(default)]
    pub swarm: Option<SwarmInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SwarmInfo {
    /// `inactive`, `pending`, `active`, `error` or `locked`.
    #[serde(default)]
    pub local_node_state: Option<String>,
    #[serde(default)]
    pub control_available: Option<bool>,
}

/// Query for the event feed. Times are Unix timestamps as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, Vec<String>>,
}

impl EventsQuery {
    pub fn since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    pub fn until(mut self, until: impl Into<String>) -> Self {
        self.until = Some(until.into());
        self
    }

    /// Add a filter value, e.g. `("type", "config")`.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.entry(key.into()).or_default().push(value.into());
        self
    }
}

/// One entry of the event feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
    #[serde(rename = "Action", default)]
    pub action: Option<String>,
    #[serde(rename = "Actor", default)]
    pub actor: Option<EventActor>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(rename = "timeNano", default)]
    pub time_nano: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventActor {
    #[serde(rename = "ID", default)]
    pub id: Option<String>,
    #[serde(rename = "Attributes", default)]
    pub attributes: BTreeMap<String, String>,
}
