// ABOUTME: Swarm config objects: entity, spec, and query shapes for /configs.
// ABOUTME: Field names follow the v1.41 engine API contract.

use crate::resource::Resource;
use crate::types::{Id, ObjectVersion};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type ConfigId = Id<Config>;

/// A config as returned by list and inspect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ConfigId>,

    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<ObjectVersion>,

    #[serde(rename = "CreatedAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(rename = "UpdatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(rename = "Spec", default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ConfigSpec>,
}

impl Config {
    /// Update query carrying this config's current version.
    pub fn update_query(&self) -> Option<ConfigUpdateQuery> {
        self.version.map(ConfigUpdateQuery::new)
    }

    /// The decoded payload, if `Spec.Data` is set.
    pub fn data(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.spec.as_ref().and_then(ConfigSpec::decoded_data)
    }
}

impl Resource for Config {
    const KIND: &'static str = "config";
    const COLLECTION: &'static str = "configs";

    type ListQuery = ConfigListQuery;
    type Spec = ConfigSpec;
    type UpdateQuery = ConfigUpdateQuery;
    type Created = CreatedConfig;

    fn id(&self) -> Option<&ConfigId> {
        self.id.as_ref()
    }
}

/// Desired state of a config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSpec {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "Labels", default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    /// Base64-encoded payload.
    #[serde(rename = "Data", default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    #[serde(rename = "Templating", default, skip_serializing_if = "Option::is_none")]
    pub templating: Option<Driver>,
}

impl ConfigSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the payload, base64-encoding it.
    pub fn with_data(mut self, data: impl AsRef<[u8]>) -> Self {
        self.data = Some(STANDARD.encode(data));
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_templating(mut self, driver: Driver) -> Self {
        self.templating = Some(driver);
        self
    }

    /// The decoded payload, if one is set.
    pub fn decoded_data(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.data.as_deref().map(|data| STANDARD.decode(data))
    }
}

/// A named driver with options, used for config templating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Options", default, skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<String, String>>,
}

/// Response of config create.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedConfig {
    #[serde(rename = "ID", alias = "Id")]
    pub id: ConfigId,

    #[serde(rename = "Version", default)]
    pub version: Option<ObjectVersion>,
}

/// Query for listing configs. Filters travel JSON-encoded in `filters`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigListQuery {
    #[serde(skip_serializing_if = "ConfigFilters::is_empty")]
    pub filters: ConfigFilters,
}

impl ConfigListQuery {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.filters.id.push(id.into());
        self
    }

    /// `key` or `key=value`.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.filters.label.push(label.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.filters.name.push(name.into());
        self
    }

    pub fn names(mut self, name: impl Into<String>) -> Self {
        self.filters.names.push(name.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigFilters {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub id: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub label: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
}

impl ConfigFilters {
    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.label.is_empty() && self.name.is_empty() && self.names.is_empty()
    }
}

/// Query for config update: the version being replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigUpdateQuery {
    pub version: u64,
}

impl ConfigUpdateQuery {
    pub fn new(version: ObjectVersion) -> Self {
        Self {
            version: version.index,
        }
    }
}
