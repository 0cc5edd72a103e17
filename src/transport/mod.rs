// ABOUTME: HTTP transport beneath the dispatch primitives.
// ABOUTME: Base URL parsing, request options, and raw hyper connections.

mod base_url;
mod connection;
mod options;

pub(crate) use base_url::BaseUrl;
pub(crate) use connection::send;
pub use options::{Query, RequestOptions};
