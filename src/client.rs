// ABOUTME: The three dispatch primitives every resource wrapper routes through.
// ABOUTME: JSON, text and streaming requests against one configured engine.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::transport::{self, BaseUrl, RequestOptions};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{CONTENT_TYPE, HOST, USER_AGENT};
use hyper::{Method, Request, Response};
use serde::de::DeserializeOwned;
use std::pin::Pin;
use std::sync::Arc;

/// Body frames exactly as they arrive on the wire.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// A handle to one engine.
///
/// Cloning is cheap and shares the configuration. A malformed base URL is
/// accepted here and reported by the first dispatch.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    config: ClientConfig,
    base: std::result::Result<BaseUrl, String>,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let base = BaseUrl::parse(&config.base_url).map(|base| match config.version_segment() {
            Some(version) => base.join_segment(&version),
            None => base,
        });
        Self {
            inner: Arc::new(Inner { config, base }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Whether both handles share the same underlying configuration.
    pub fn same_instance(&self, other: &Client) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Issue a request and decode the response body as JSON.
    ///
    /// An empty body decodes as `null`, so `R = ()` fits endpoints that
    /// answer 204 No Content.
    pub async fn json_endpoint<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<R> {
        let response = self.send_checked(method, path, options).await?;
        let body = response.into_body().collect().await?.to_bytes();
        let body: &[u8] = if body.is_empty() { b"null" } else { &body };
        serde_json::from_slice(body).map_err(Error::Decode)
    }

    /// Issue a request and return the response body as text.
    pub async fn string_endpoint(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<String> {
        let response = self.send_checked(method, path, options).await?;
        let body = response.into_body().collect().await?.to_bytes();
        Ok(String::from_utf8(body.to_vec())?)
    }

    /// Issue a GET and hand back the body as an open stream.
    ///
    /// The status is checked before the stream is returned. Frames are
    /// yielded as they arrive; dropping the stream closes the connection.
    pub async fn stream_endpoint(&self, path: &str, options: RequestOptions) -> Result<ByteStream> {
        let response = self.send_checked(Method::GET, path, options).await?;
        let frames = response
            .into_body()
            .into_data_stream()
            .map(|frame| frame.map_err(Error::from));
        Ok(Box::pin(frames))
    }

    async fn send_checked(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response<Incoming>> {
        let response = self.send(method, path, options).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.into_body().collect().await?.to_bytes();
        Err(Error::from_status(
            status.as_u16(),
            String::from_utf8_lossy(&body).into_owned(),
        ))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response<Incoming>> {
        let base = self
            .inner
            .base
            .as_ref()
            .map_err(|reason| Error::InvalidBaseUrl {
                url: self.inner.config.base_url.clone(),
                reason: reason.clone(),
            })?;

        let target = base.request_target(path, options.query.encode().as_deref());
        tracing::debug!("{} {}", method, target);

        let mut builder = Request::builder()
            .method(method.clone())
            .uri(target.as_str())
            .header(HOST, base.authority())
            .header(USER_AGENT, self.inner.config.user_agent.as_str());

        for (name, value) in &self.inner.config.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = match options.body {
            Some(bytes) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Full::new(bytes)
            }
            None => Full::new(Bytes::new()),
        };

        let request = builder.body(body)?;
        let response = transport::send(base, request).await?;
        tracing::debug!("{} {} -> {}", method, target, response.status());
        Ok(response)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.config.base_url)
            .finish()
    }
}
