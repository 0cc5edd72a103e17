// ABOUTME: Per-call request options: query parameters, JSON body, extra headers.
// ABOUTME: Query encoding flattens serializable structs the way the engine expects.

use crate::error::{Error, Result};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

/// Query parameters, sent in the order they were pushed.
///
/// Scalars are sent as-is; nested objects and arrays are JSON-encoded into a
/// single value, which is how the engine takes `filters`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Flatten a serializable struct or map into query parameters.
    ///
    /// Keys come out sorted by name, not in field order. `None` fields are
    /// skipped. Anything that does not serialize to an object (or null) is
    /// rejected.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let value = serde_json::to_value(value).map_err(Error::Encode)?;
        let fields = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(fields) => fields,
            _ => {
                return Err(Error::Encode(serde::ser::Error::custom(
                    "query parameters must serialize to an object",
                )));
            }
        };

        let mut query = Self::new();
        for (key, value) in fields {
            if let Some(value) = query_value(value) {
                query.push(key, value);
            }
        }
        Ok(query)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Percent-encoded `key=value&...` form, or `None` when empty.
    pub fn encode(&self) -> Option<String> {
        if self.pairs.is_empty() {
            return None;
        }
        let encoded = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        Some(encoded)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (k, v) in iter {
            query.push(k, v);
        }
        query
    }
}

fn query_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested @ (Value::Array(_) | Value::Object(_)) => Some(nested.to_string()),
    }
}

/// Query, body and headers for a single dispatch.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub(crate) query: Query,
    pub(crate) body: Option<Bytes>,
    pub(crate) headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Replace the query with one flattened from `value`.
    pub fn query_from<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        Ok(self.query(Query::from_serialize(value)?))
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(body).map_err(Error::Encode)?;
        self.body = Some(Bytes::from(bytes));
        Ok(self)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query_params(&self) -> &Query {
        &self.query
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}
