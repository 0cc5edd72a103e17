// ABOUTME: Library root for dockapi, a typed Docker Engine API client.
// ABOUTME: Re-exports the facade, dispatch primitives, and resource types.

pub mod api;
pub mod client;
pub mod config;
pub mod docker;
pub mod error;
pub mod registry;
pub mod resource;
pub mod transport;
pub mod types;

pub use client::{ByteStream, Client};
pub use config::ClientConfig;
pub use docker::DockerApi;
pub use error::{Error, ErrorKind, Result};
pub use hyper::Method;
pub use resource::{Collection, Instance, Resource};
pub use transport::{Query, RequestOptions};
pub use types::{Id, ObjectVersion};
