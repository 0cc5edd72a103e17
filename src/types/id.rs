// ABOUTME: Phantom-typed identifiers for compile-time type safety.
// ABOUTME: An Id<Config> cannot be passed where another resource's ID is expected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A server-assigned identifier tagged with the resource it belongs to.
///
/// The phantom parameter is the resource type itself, so `Id<Config>` and
/// an ID for any other resource kind are distinct types.
///
/// ```compile_fail
/// use dockapi::Id;
/// use dockapi::api::{Config, Driver};
///
/// let driver_id: Id<Driver> = Id::new("tmpl");
/// let config_id: Id<Config> = driver_id;
/// ```
#[must_use = "IDs reference resources and should not be ignored"]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// The ID as a single percent-encoded path segment.
    pub(crate) fn path_segment(&self) -> String {
        urlencoding::encode(&self.value).into_owned()
    }
}

// Manual trait implementations that don't require T to implement the trait.
// T is only a phantom marker.

impl<T> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Id").field("value", &self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Widget {}

    #[test]
    fn path_segment_is_percent_encoded() {
        let id: Id<Widget> = Id::new("a b/c");
        assert_eq!(id.path_segment(), "a%20b%2Fc");
        assert_eq!(id.as_str(), "a b/c");
    }

    #[test]
    fn serde_is_transparent() {
        let id: Id<Widget> = Id::new("abc123");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""abc123""#);
        let back: Id<Widget> = serde_json::from_str(r#""abc123""#).unwrap();
        assert_eq!(back, id);
    }
}
