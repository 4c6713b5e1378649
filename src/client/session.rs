//! The subscription session: connect, filter, dispatch, reconnect.
//!
//! [`EventStreamsClient`] owns one logical subscription at a time. Its
//! `subscribe` call opens a connection through the transport, decodes and
//! filters every delivered frame, and hands matching events to the
//! caller's handler, reconnecting on transport failure with an exponential
//! backoff.
//!
//! # Resuming
//!
//! The `meta.dt` timestamp of every decoded event is recorded before
//! predicate evaluation, so a reconnect resumes past events the predicates
//! rejected instead of replaying them. The recorded timestamp is appended
//! to the next connection's URL as `?since=`.
//!
//! # Retry Budget
//!
//! The upstream traffic layer disconnects streaming clients on a fixed
//! keepalive period, which at the transport level looks exactly like an
//! outage. Only failures clustered within `reset_interval` of each other
//! count against the retry budget: a connection that lived at least that
//! long resets the backoff schedule when it drops.
//!
//! # Examples
//!
//! ```ignore
//! use eventstreams::EventStreamsClient;
//!
//! #[tokio::main]
//! async fn main() -> eventstreams::Result<()> {
//!     let mut client = EventStreamsClient::new()
//!         .match_field("namespace", 0)
//!         .match_field("type", "edit");
//!
//!     client
//!         .recent_changes(|event| {
//!             println!("[{}] {} edited {}", event.meta.dt, event.user, event.title);
//!         })
//!         .await
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

use crate::client::config::ClientConfig;
use crate::client::matcher;
use crate::client::transport::{HttpTransport, Transport};
use crate::client::utils::{build_stream_url, Backoff};
use crate::error::{Result, StreamsError};
use crate::types::{decode, FieldValue, RecentChangeEvent};

/// Cloneable read handle onto a session's resume timestamp.
///
/// Snapshot reads are safe from any task or thread, including while the
/// owning session is blocked inside `subscribe`.
#[derive(Debug, Clone, Default)]
pub struct TimestampHandle {
    cell: Arc<RwLock<String>>,
}

impl TimestampHandle {
    /// ISO8601 timestamp of the most recently observed event, or the
    /// empty string before the first event arrives.
    pub fn get(&self) -> String {
        self.cell.read().clone()
    }

    fn set(&self, value: String) {
        *self.cell.write() = value;
    }
}

/// Client for the Wikimedia EventStreams service.
///
/// Construct one, register predicates with
/// [`match_field`](EventStreamsClient::match_field), then block on
/// [`recent_changes`](EventStreamsClient::recent_changes) or
/// [`subscribe`](EventStreamsClient::subscribe). Events are delivered to
/// the handler synchronously, in arrival order, only when every predicate
/// holds.
///
/// Each client drives a single subscription at a time; independent clients
/// share no state and may run fully in parallel.
pub struct EventStreamsClient {
    config: ClientConfig,
    predicates: BTreeMap<String, FieldValue>,
    since: String,
    last_timestamp: TimestampHandle,
    transport: Arc<dyn Transport>,
    cancel: Option<CancellationToken>,
}

impl EventStreamsClient {
    /// Create a client against the public EventStreams endpoint with an
    /// empty predicate set.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Create a client over a custom [`Transport`].
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        EventStreamsClient {
            config,
            predicates: BTreeMap::new(),
            since: String::new(),
            last_timestamp: TimestampHandle::default(),
            transport,
            cancel: None,
        }
    }

    /// Require `field` to equal `value` for an event to be delivered.
    ///
    /// Fields are named by their JSON key on the wire. Predicates conjoin:
    /// an event is delivered only when every registered predicate holds.
    /// Registering the same field again replaces its expected value.
    ///
    /// # Examples
    ///
    /// ```
    /// use eventstreams::EventStreamsClient;
    ///
    /// let client = EventStreamsClient::new()
    ///     .match_field("wiki", "enwiki")
    ///     .match_field("bot", false);
    /// ```
    pub fn match_field(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.predicates.insert(field.into(), value.into());
        self
    }

    /// Resume the first connection from `timestamp` instead of the live
    /// tail of the feed.
    pub fn since(mut self, timestamp: impl Into<String>) -> Self {
        self.since = timestamp.into();
        self
    }

    /// Stop the session when `token` is cancelled.
    ///
    /// Cancellation is honored both while a connection is open and during
    /// backoff sleeps; `subscribe` then returns `Ok(())`.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// ISO8601 timestamp of the most recently observed event.
    ///
    /// Updated for every decodable event, matching or not, before
    /// predicate evaluation.
    pub fn last_timestamp(&self) -> String {
        self.last_timestamp.get()
    }

    /// Cloneable handle for reading the resume timestamp from another
    /// task while the session runs.
    pub fn timestamp_handle(&self) -> TimestampHandle {
        self.last_timestamp.clone()
    }

    /// Subscribe to the `recentchange` feed.
    ///
    /// The handler is invoked once for every matching event received.
    pub async fn recent_changes<F>(&mut self, handler: F) -> Result<()>
    where
        F: FnMut(RecentChangeEvent) + Send,
    {
        self.subscribe("recentchange", handler).await
    }

    /// Subscribe to `stream`, invoking `handler` once per matching event.
    ///
    /// Blocks until the retry budget is exhausted (returning the last
    /// transport error), the server ends the stream cleanly, or the
    /// cancellation token fires (both returning `Ok`). Each reconnect
    /// resumes from the timestamp of the last observed event.
    pub async fn subscribe<F>(&mut self, stream: &str, mut handler: F) -> Result<()>
    where
        F: FnMut(RecentChangeEvent) + Send,
    {
        url::Url::parse(&self.config.base_url)
            .map_err(|e| StreamsError::InvalidUrl(format!("{}: {}", self.config.base_url, e)))?;

        let mut backoff = Backoff::new(self.config.backoff_min, self.config.backoff_max);
        let event_name = self.config.event_name.clone();

        loop {
            // Reconnect on each iteration; the URL carries a `since` param
            // with the timestamp of the last event observed by any
            // previous iteration.
            let stream_url = build_stream_url(&self.config.base_url, stream, &self.since);
            let attempt_start = Instant::now();
            tracing::debug!(url = %stream_url, "opening event stream");

            let predicates = &self.predicates;
            let last_timestamp = self.last_timestamp.clone();
            let mut on_message = |data: &[u8]| {
                // The first frame after connecting is always empty.
                if data.is_empty() {
                    return;
                }

                let event = match decode(data) {
                    Ok(event) => event,
                    Err(err) => {
                        tracing::warn!(error = %err, "dropping undecodable event");
                        return;
                    }
                };

                // Record the resume point before matching, so a reconnect
                // does not replay events the predicates rejected.
                last_timestamp.set(event.meta.dt.clone());

                if matcher::matches(&event, predicates) {
                    handler(event);
                }
            };

            let opened = self
                .transport
                .open(&stream_url, event_name.as_deref(), &mut on_message);
            let result = match &self.cancel {
                Some(token) => tokio::select! {
                    _ = token.cancelled() => return Ok(()),
                    result = opened => result,
                },
                None => opened.await,
            };

            let err = match result {
                // The server ended the stream without a fault.
                Ok(()) => return Ok(()),
                Err(err) => err,
            };

            // A connection that survived past the reset interval was
            // healthy; its disconnect starts a fresh retry budget.
            if attempt_start.elapsed() >= self.config.reset_interval {
                backoff.reset();
            }

            let delay = backoff.duration();
            tracing::warn!(
                error = %err,
                attempt = backoff.attempt(),
                delay_ms = delay.as_millis() as u64,
                "event stream disconnected, backing off"
            );

            match &self.cancel {
                Some(token) => tokio::select! {
                    _ = token.cancelled() => return Ok(()),
                    _ = sleep(delay) => {}
                },
                None => sleep(delay).await,
            }

            if backoff.attempt() >= self.config.retries {
                return Err(err);
            }

            // The next attempt picks up where the last observed event
            // left off.
            self.since = self.last_timestamp.get();
        }
    }
}

impl Default for EventStreamsClient {
    fn default() -> Self {
        Self::new()
    }
}
