// ABOUTME: Opens one HTTP/1.1 connection per request over TCP or a Unix socket.
// ABOUTME: The connection driver runs on a spawned task and ends with the response body.

use super::base_url::{BaseUrl, Target};
use crate::error::{Error, Result};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

pub(crate) async fn send(
    base: &BaseUrl,
    request: Request<Full<Bytes>>,
) -> Result<Response<Incoming>> {
    match base.target() {
        Target::Tcp { host, port } => {
            let stream = TcpStream::connect((host.as_str(), *port))
                .await
                .map_err(Error::Connect)?;
            exchange(stream, request).await
        }
        #[cfg(unix)]
        Target::Unix(path) => {
            let stream = tokio::net::UnixStream::connect(path)
                .await
                .map_err(Error::Connect)?;
            exchange(stream, request).await
        }
        #[cfg(not(unix))]
        Target::Unix(path) => Err(Error::Connect(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            format!("unix sockets are not available here: {}", path.display()),
        ))),
    }
}

async fn exchange<S>(stream: S, request: Request<Full<Bytes>>) -> Result<Response<Incoming>>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let io = TokioIo::new(stream);
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;

    tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::warn!("engine connection error: {}", e);
        }
    });

    let response = sender.send_request(request).await?;
    Ok(response)
}
