//! Client configuration.

use std::time::Duration;

/// Default URL of the Wikimedia EventStreams service, sans any stream
/// endpoints.
pub const DEFAULT_URL: &str = "https://stream.wikimedia.org/v2/stream";

/// Configuration for an [`EventStreamsClient`](crate::EventStreamsClient).
///
/// # Examples
///
/// ```
/// use eventstreams::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig {
///     retries: 5,
///     backoff_min: Duration::from_millis(250),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the EventStreams service, without a stream endpoint.
    pub base_url: String,

    /// Reconnect attempts tolerated within one `reset_interval` before the
    /// session gives up and returns the last transport error.
    pub retries: u32,

    /// A connection that stays up at least this long resets the retry
    /// budget when it eventually drops.
    ///
    /// The upstream traffic layer disconnects streaming clients on a fixed
    /// ~15 minute keepalive period; those disconnects must not consume the
    /// budget or a healthy session would die after `retries` of them.
    pub reset_interval: Duration,

    /// First backoff delay; doubles on each consecutive failure.
    pub backoff_min: Duration,

    /// Upper bound on the backoff delay.
    pub backoff_max: Duration,

    /// SSE event name to deliver, or `None` for every event type.
    ///
    /// The service tags its payloads `message`; leave the default unless a
    /// stream is known to use other tags.
    pub event_name: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_URL.to_owned(),
            retries: 3,
            reset_interval: Duration::from_secs(600),
            backoff_min: Duration::from_millis(100),
            backoff_max: Duration::from_secs(10),
            event_name: Some("message".to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_URL);
        assert_eq!(config.retries, 3);
        assert_eq!(config.reset_interval, Duration::from_secs(600));
        assert_eq!(config.event_name.as_deref(), Some("message"));
    }
}
