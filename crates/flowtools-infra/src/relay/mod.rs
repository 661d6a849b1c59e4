//! Streaming HTTP implementation of the `FileRelay` port.
//!
//! The source is fetched with reqwest and its body consumed as a byte stream,
//! re-chunked through a fixed 8 KiB read buffer, and sent as the body of a PUT
//! on a dedicated hyper connection to the destination. The full payload is
//! never held in memory.
//!
//! Outcomes:
//! - Anything that fails before the destination answers (bad URL, refused
//!   connection, interrupted stream) yields the sentinel result.
//! - Once the destination answers, its status is reported verbatim together
//!   with its response body when the status is an error (>= 400). This holds
//!   even when the destination answers before reading the whole upload.

mod destination;
mod transport;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::TryStreamExt;
use reqwest::{Client, Response, Url};
use tokio_util::io::{ReaderStream, StreamReader};

use flowtools_core::relay::FileRelay;
use flowtools_types::config::RelayConfig;
use flowtools_types::error::RelayError;
use flowtools_types::relay::RelayResult;

use destination::{Destination, ensure_supported};

/// Size of the intermediate buffer used to copy source bytes to the destination.
pub const RELAY_CHUNK_SIZE: usize = 8 * 1024;

/// Content type sent with every upload.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// File relay that downloads with a shared `reqwest::Client` and uploads
/// over a fresh HTTP/1.1 connection per relay.
///
/// No authentication headers are attached to either request.
#[derive(Clone)]
pub struct HttpFileRelay {
    client: Client,
    destination: Destination,
}

impl HttpFileRelay {
    /// Build a relay whose connections apply the configured deadlines.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RelayError::Client(e.to_string()))?;

        Ok(Self {
            client,
            destination: Destination::new(config)?,
        })
    }

    async fn try_relay(
        &self,
        source_url: &str,
        destination_url: &str,
    ) -> Result<RelayResult, RelayError> {
        let source_url = parse_url(source_url)?;
        let destination_url = parse_url(destination_url)?;
        ensure_supported(&destination_url)?;

        let source = self.open_source(source_url).await?;
        self.upload(source, &destination_url).await
    }

    /// Issue the GET and hand back the response with its unread body.
    async fn open_source(&self, url: Url) -> Result<Response, RelayError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| RelayError::Source(e.to_string()))?;

        // Forwarded whatever the status.
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                source = %url,
                status = status.as_u16(),
                "source answered with a non-success status, relaying its body anyway"
            );
        }

        Ok(response)
    }

    /// Stream the source body into the destination PUT.
    async fn upload(&self, source: Response, url: &Url) -> Result<RelayResult, RelayError> {
        let relayed = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&relayed);
        let content_length = source.content_length();

        let reader = StreamReader::new(source.bytes_stream().map_err(std::io::Error::other));
        let chunks = ReaderStream::with_capacity(reader, RELAY_CHUNK_SIZE).inspect_ok(move |chunk| {
            counter.fetch_add(chunk.len() as u64, Ordering::Relaxed);
        });

        let result = self.destination.put(url, chunks, content_length).await?;
        tracing::info!(
            status = result.status_code,
            bytes = relayed.load(Ordering::Relaxed),
            "destination answered relay upload"
        );

        Ok(result)
    }
}

impl FileRelay for HttpFileRelay {
    #[tracing::instrument(
        name = "file_relay",
        skip_all,
        fields(
            relay.source.url = %source_url,
            relay.destination.url = %destination_url,
            http.response.status_code = tracing::field::Empty
        )
    )]
    async fn relay(&self, source_url: &str, destination_url: &str) -> RelayResult {
        let result = match self.try_relay(source_url, destination_url).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "relay failed before the destination answered");
                RelayResult::pre_transfer_failure()
            }
        };
        tracing::Span::current().record("http.response.status_code", result.status_code);
        result
    }
}

fn parse_url(raw: &str) -> Result<Url, RelayError> {
    Url::parse(raw).map_err(|e| RelayError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}
