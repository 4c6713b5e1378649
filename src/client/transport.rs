//! SSE transport layer.
//!
//! [`Transport`] abstracts holding one HTTP connection open and delivering
//! raw frame payloads to a callback; [`HttpTransport`] is the
//! reqwest-backed implementation. Reconnecting is owned by the session
//! layer; a transport only reports how its single connection ended.

use async_trait::async_trait;
use futures::StreamExt;

use crate::client::parser::SseParser;
use crate::error::{Result, StreamsError};

/// Callback receiving each frame payload delivered by a transport.
pub type MessageCallback<'a> = &'a mut (dyn FnMut(&[u8]) + Send);

/// A single-connection SSE transport.
///
/// Implement this to substitute the network layer, e.g. with a scripted
/// transport in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open `url` and invoke `on_message` once per received frame payload.
    ///
    /// Blocks until the connection fails (`Err`) or the server ends the
    /// stream cleanly (`Ok`). When `event_name` is set, frames tagged with
    /// any other event name are discarded before delivery.
    async fn open(
        &self,
        url: &str,
        event_name: Option<&str>,
        on_message: MessageCallback<'_>,
    ) -> Result<()>;
}

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport configured for long-lived streams.
    pub fn new() -> Self {
        // Only the connect phase gets a timeout; an overall request
        // timeout would cut the stream off mid-subscription.
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        HttpTransport { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn open(
        &self,
        url: &str,
        event_name: Option<&str>,
        on_message: MessageCallback<'_>,
    ) -> Result<()> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| StreamsError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StreamsError::InvalidStatus(status.as_u16()));
        }

        let mut parser = SseParser::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| StreamsError::Http(e.to_string()))?;
            for frame in parser.feed(&chunk) {
                if let Some(name) = event_name {
                    if frame.event != name {
                        continue;
                    }
                }
                on_message(&frame.data);
            }
        }

        // The server ended the stream without a transport fault.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        let _transport = HttpTransport::new();
        let _transport = HttpTransport::default();
    }
}
