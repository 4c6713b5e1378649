//! EventStreams client implementation.
//!
//! This module holds the subscription machinery:
//!
//! ```text
//! client/
//! ├── config    - Client configuration
//! ├── session   - EventStreamsClient and the reconnect loop
//! ├── matcher   - Predicate evaluation over decoded events
//! ├── parser    - Incremental SSE frame parser
//! ├── transport - Transport trait and the reqwest implementation
//! └── utils     - Backoff schedule and URL construction
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`EventStreamsClient`] | Subscription client with reconnect and filtering |
//! | [`ClientConfig`] | Client configuration options |
//! | [`Transport`] | Single-connection SSE transport seam |
//! | [`SseParser`] | Incremental `text/event-stream` parser |
//! | [`Backoff`] | Deterministic exponential backoff schedule |
//!
//! # Examples
//!
//! ```
//! use eventstreams::client::{ClientConfig, EventStreamsClient};
//! use std::time::Duration;
//!
//! // Default configuration
//! let client = EventStreamsClient::new();
//!
//! // Custom configuration
//! let config = ClientConfig {
//!     retries: 5,
//!     reset_interval: Duration::from_secs(300),
//!     ..Default::default()
//! };
//! let client = EventStreamsClient::with_config(config);
//! ```

mod config;
mod matcher;
mod parser;
mod session;
mod transport;
mod utils;

pub use config::{ClientConfig, DEFAULT_URL};
pub use matcher::matches;
pub use parser::{SseMessage, SseParser};
pub use session::{EventStreamsClient, TimestampHandle};
pub use transport::{HttpTransport, MessageCallback, Transport};
pub use utils::{build_stream_url, Backoff};
