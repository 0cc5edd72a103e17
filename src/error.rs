// ABOUTME: Error types for every dispatch and resource operation.
// ABOUTME: Uses thiserror, with an ErrorKind classifier for programmatic handling.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("client not initialized: call registry::set_instance before dispatching")]
    Uninitialized,

    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("connection failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] hyper::Error),

    #[error("failed to build request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("engine returned {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: String,
    },

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("response body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("{kind} has no ID: instance operations need a server-assigned identity")]
    MissingIdentity { kind: &'static str },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Dispatch attempted before the registry was given a client.
    Uninitialized,
    /// The configured base URL cannot be used.
    InvalidBaseUrl,
    /// Connection or protocol failure below HTTP status level.
    Transport,
    /// The request could not be built, e.g. an invalid header name or value.
    InvalidRequest,
    /// HTTP 404.
    NotFound,
    /// HTTP 409, or a stale object version.
    Conflict,
    /// HTTP 400.
    BadRequest,
    /// Any other non-2xx status.
    Status,
    /// The request body could not be serialized.
    Encode,
    /// The response body did not match the expected shape.
    Decode,
    /// Instance operation on an entity without an ID.
    MissingIdentity,
}

impl Error {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Uninitialized => ErrorKind::Uninitialized,
            Error::InvalidBaseUrl { .. } => ErrorKind::InvalidBaseUrl,
            Error::Connect(_) | Error::Transport(_) => ErrorKind::Transport,
            Error::Request(_) => ErrorKind::InvalidRequest,
            Error::Status {
                status, message, ..
            } => match *status {
                404 => ErrorKind::NotFound,
                409 => ErrorKind::Conflict,
                400 => ErrorKind::BadRequest,
                // Swarm reports stale versions as a 500.
                500 if message.contains("out of sequence") => ErrorKind::Conflict,
                _ => ErrorKind::Status,
            },
            Error::Encode(_) => ErrorKind::Encode,
            Error::Decode(_) | Error::Utf8(_) => ErrorKind::Decode,
            Error::MissingIdentity { .. } => ErrorKind::MissingIdentity,
        }
    }

    /// Returns the HTTP status code if the engine answered with a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    /// Build a status error from a raw response body.
    ///
    /// The engine wraps failures as `{"message": "..."}`; anything else is
    /// kept verbatim as the message.
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        #[derive(serde::Deserialize)]
        struct Envelope {
            message: String,
        }

        let message = serde_json::from_str::<Envelope>(&body)
            .map(|e| e.message)
            .unwrap_or_else(|_| body.trim().to_string());

        Error::Status {
            status,
            message,
            body,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
