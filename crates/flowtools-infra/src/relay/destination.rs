//! Streaming PUT to the destination over a dedicated HTTP/1.1 connection.
//!
//! The upload runs on its own hyper connection so the response head is read
//! while the body is still being written: a destination that rejects early
//! is reported with its real status and body.

use std::io;
use std::time::Duration;

use futures_util::{Stream, TryStreamExt};
use http_body_util::{BodyExt, StreamBody};
use hyper::body::{Bytes, Frame, Incoming};
use hyper::client::conn::http1;
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, HOST, USER_AGENT};
use hyper::Request;
use hyper_util::rt::TokioIo;
use reqwest::Url;
use tokio::net::TcpStream;
use tokio_native_tls::TlsConnector;
use tokio_native_tls::native_tls;
use tokio_util::task::AbortOnDropHandle;

use flowtools_types::config::RelayConfig;
use flowtools_types::error::RelayError;
use flowtools_types::relay::RelayResult;

use super::OCTET_STREAM;
use super::transport::{ParkingStream, Transport};

/// Connection settings for destination uploads.
#[derive(Clone)]
pub(crate) struct Destination {
    tls: TlsConnector,
    connect_timeout: Duration,
    request_timeout: Duration,
    user_agent: String,
}

impl Destination {
    pub(crate) fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let tls = native_tls::TlsConnector::new().map_err(|e| RelayError::Client(e.to_string()))?;

        Ok(Self {
            tls: TlsConnector::from(tls),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            user_agent: config.user_agent.clone(),
        })
    }

    /// PUT `chunks` to `url` and collect the destination's answer.
    ///
    /// Fails only when no response head arrives: connect errors, a peer that
    /// closes without answering, or the request deadline.
    pub(crate) async fn put<S>(
        &self,
        url: &Url,
        chunks: S,
        content_length: Option<u64>,
    ) -> Result<RelayResult, RelayError>
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        tokio::time::timeout(self.request_timeout, self.exchange(url, chunks, content_length))
            .await
            .map_err(|_| {
                RelayError::Transfer(format!(
                    "destination did not answer within {}s",
                    self.request_timeout.as_secs()
                ))
            })?
    }

    async fn exchange<S>(
        &self,
        url: &Url,
        chunks: S,
        content_length: Option<u64>,
    ) -> Result<RelayResult, RelayError>
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        let transport = self.connect(url).await?;
        let (mut sender, connection) = http1::handshake(TokioIo::new(transport))
            .await
            .map_err(transfer)?;

        // The connection lives until the answer has been read.
        let _connection = AbortOnDropHandle::new(tokio::spawn(async move {
            if let Err(err) = connection.await {
                tracing::debug!(error = %err, "destination connection ended with an error");
            }
        }));

        let mut request = Request::put(request_target(url))
            .header(HOST, host_header(url))
            .header(USER_AGENT, self.user_agent.as_str())
            .header(CONTENT_TYPE, OCTET_STREAM);
        if let Some(len) = content_length {
            request = request.header(CONTENT_LENGTH, len);
        }
        let request = request
            .body(StreamBody::new(chunks.map_ok(Frame::data)))
            .map_err(transfer)?;

        sender.ready().await.map_err(transfer)?;
        let response = sender.send_request(request).await.map_err(transfer)?;

        let status = response.status();
        let error_message = if status.is_client_error() || status.is_server_error() {
            read_error_body(response.into_body()).await
        } else {
            String::new()
        };

        Ok(RelayResult::with_error(i32::from(status.as_u16()), error_message))
    }

    async fn connect(&self, url: &Url) -> Result<Transport, RelayError> {
        ensure_supported(url)?;
        let host = url
            .host_str()
            .map(|h| h.trim_start_matches('[').trim_end_matches(']'))
            .unwrap_or_default();
        let port = url.port_or_known_default().unwrap_or(80);

        let tcp = tokio::time::timeout(self.connect_timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| RelayError::Transfer(format!("connect to {host}:{port} timed out")))?
            .map_err(|e| RelayError::Transfer(format!("connect to {host}:{port}: {e}")))?;
        let stream = ParkingStream::new(tcp);

        if url.scheme() == "http" {
            return Ok(Transport::Plain(stream));
        }

        let tls = tokio::time::timeout(self.connect_timeout, self.tls.connect(host, stream))
            .await
            .map_err(|_| RelayError::Transfer(format!("TLS handshake with {host} timed out")))?
            .map_err(|e| RelayError::Transfer(format!("TLS handshake with {host}: {e}")))?;
        Ok(Transport::Tls(tls))
    }
}

/// Reject destinations this relay cannot reach before any byte is fetched.
pub(crate) fn ensure_supported(url: &Url) -> Result<(), RelayError> {
    let reason = match (url.scheme(), url.host_str()) {
        ("http" | "https", Some(host)) if !host.is_empty() => return Ok(()),
        ("http" | "https", _) => "missing host".to_string(),
        (scheme, _) => format!("unsupported scheme `{scheme}`"),
    };
    Err(RelayError::InvalidUrl {
        url: url.to_string(),
        reason,
    })
}

/// Origin-form target: path plus query.
fn request_target(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

fn transfer(err: impl std::fmt::Display) -> RelayError {
    RelayError::Transfer(err.to_string())
}

/// Best-effort read of the destination's error body.
///
/// The status is already known at this point, so an unreadable body only
/// costs the message.
async fn read_error_body(body: Incoming) -> String {
    match body.collect().await {
        Ok(collected) => String::from_utf8_lossy(&collected.to_bytes()).into_owned(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to read destination error body");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn request_target_keeps_presigned_query() {
        let target = request_target(&url(
            "https://bucket.s3.amazonaws.com/app/build.zip?X-Amz-Signature=abc&X-Amz-Expires=300",
        ));
        assert_eq!(target, "/app/build.zip?X-Amz-Signature=abc&X-Amz-Expires=300");
        assert_eq!(request_target(&url("http://host")), "/");
    }

    #[test]
    fn host_header_includes_explicit_port_only() {
        assert_eq!(host_header(&url("http://127.0.0.1:8080/upload")), "127.0.0.1:8080");
        assert_eq!(host_header(&url("https://storage.example.com/upload")), "storage.example.com");
        assert_eq!(host_header(&url("https://storage.example.com:443/upload")), "storage.example.com");
    }

    #[test]
    fn only_http_destinations_are_supported() {
        assert!(ensure_supported(&url("http://127.0.0.1/upload")).is_ok());
        assert!(ensure_supported(&url("https://storage.example.com/upload")).is_ok());

        let err = ensure_supported(&url("ftp://files.example.com/upload")).unwrap_err();
        assert!(matches!(err, RelayError::InvalidUrl { .. }));
        assert!(ensure_supported(&url("file:///tmp/upload")).is_err());
    }
}
