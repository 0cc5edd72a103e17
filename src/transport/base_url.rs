// ABOUTME: Parses engine base URLs into a connect target and path prefix.
// ABOUTME: Accepts http://, tcp:// and unix:// forms; rejects everything else.

use std::path::PathBuf;
use url::{Host, Url};

const DEFAULT_HTTP_PORT: u16 = 80;
const DEFAULT_TCP_PORT: u16 = 2375;

/// Where to open the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Target {
    Tcp { host: String, port: u16 },
    Unix(PathBuf),
}

/// A validated base URL: connect target, `Host` header value and path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BaseUrl {
    target: Target,
    authority: String,
    /// Empty, or `/segment[/segment...]` without a trailing slash.
    prefix: String,
}

impl BaseUrl {
    pub(crate) fn parse(url: &str) -> Result<Self, String> {
        let url = Url::parse(url.trim()).map_err(|e| e.to_string())?;

        if url.query().is_some() || url.fragment().is_some() {
            return Err("query strings and fragments are not allowed".to_string());
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err("credentials in the URL are not supported".to_string());
        }

        match url.scheme() {
            "http" => Self::from_tcp(&url, DEFAULT_HTTP_PORT),
            "tcp" => Self::from_tcp(&url, DEFAULT_TCP_PORT),
            "unix" => Self::from_unix(&url),
            "https" => Err("https is not supported; use http, tcp or a unix socket".to_string()),
            other => Err(format!("unsupported scheme: {}", other)),
        }
    }

    fn from_tcp(url: &Url, default_port: u16) -> Result<Self, String> {
        let (connect_host, header_host) = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => {
                (domain.to_string(), domain.to_string())
            }
            Some(Host::Ipv4(addr)) => (addr.to_string(), addr.to_string()),
            Some(Host::Ipv6(addr)) => (addr.to_string(), format!("[{}]", addr)),
            _ => return Err("missing host".to_string()),
        };

        let authority = match url.port() {
            Some(port) => format!("{}:{}", header_host, port),
            None => header_host,
        };

        Ok(Self {
            target: Target::Tcp {
                host: connect_host,
                port: url.port_or_known_default().unwrap_or(default_port),
            },
            authority,
            prefix: normalize_prefix(url.path()),
        })
    }

    fn from_unix(url: &Url) -> Result<Self, String> {
        if url.host_str().is_some_and(|host| !host.is_empty()) || url.port().is_some() {
            return Err("unix socket path must be absolute".to_string());
        }

        let path = urlencoding::decode(url.path()).map_err(|e| e.to_string())?;
        if !path.starts_with('/') || path.trim_matches('/').is_empty() {
            return Err("missing unix socket path".to_string());
        }

        Ok(Self {
            target: Target::Unix(PathBuf::from(path.as_ref())),
            authority: "localhost".to_string(),
            prefix: String::new(),
        })
    }

    /// Append one path segment (used for the API version) to the prefix.
    pub(crate) fn join_segment(mut self, segment: &str) -> Self {
        let segment = segment.trim_matches('/');
        if !segment.is_empty() {
            self.prefix.push('/');
            self.prefix.push_str(segment);
        }
        self
    }

    pub(crate) fn target(&self) -> &Target {
        &self.target
    }

    pub(crate) fn authority(&self) -> &str {
        &self.authority
    }

    /// Origin-form request target: prefix, relative path and encoded query.
    pub(crate) fn request_target(&self, path: &str, query: Option<&str>) -> String {
        let path = path.trim_start_matches('/');
        let mut target = format!("{}/{}", self.prefix, path);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }
        target
    }
}

fn normalize_prefix(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
