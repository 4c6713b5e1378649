#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # EventStreams: a filtering SSE client
//!
//! This crate subscribes to the Wikimedia EventStreams service, a
//! server-sent-events feed of MediaWiki change notifications, and delivers
//! decoded events to a caller-supplied handler.
//!
//! ## Overview
//!
//! Three concerns compose the client:
//!
//! 1. **Session** - the reconnect loop: open a subscription, track the
//!    timestamp of the last observed event, and on failure either retry
//!    with exponential backoff or give up, resuming from that timestamp
//! 2. **Matching** - conjunction of exact-equality predicates over the
//!    flat, wire-named fields of each decoded event
//! 3. **Transport** - one HTTP connection parsed incrementally as SSE
//!    frames, swappable behind the [`Transport`] trait
//!
//! ## Key Behaviors
//!
//! - **Resume on reconnect**: every decodable event updates the resume
//!   timestamp before matching, so reconnects never replay rejected events
//! - **Keepalive-aware retry budget**: disconnects spaced at least the
//!   reset interval apart restart the backoff schedule; only clustered
//!   failures consume the budget
//! - **Malformed-message resilience**: undecodable payloads are logged
//!   and dropped without ending the session
//! - **Guarded resume point**: the last-observed timestamp is readable
//!   from other tasks through a synchronized handle
//!
//! ## Client Usage
//!
//! ```ignore
//! use eventstreams::EventStreamsClient;
//!
//! #[tokio::main]
//! async fn main() -> eventstreams::Result<()> {
//!     let mut client = EventStreamsClient::new()
//!         .match_field("wiki", "enwiki")
//!         .match_field("namespace", 0);
//!
//!     client
//!         .recent_changes(|event| {
//!             println!("{} edited {}", event.user, event.title);
//!         })
//!         .await
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[client]** - Subscription client, transport, parser, matching
//! - **[error]** - Error types and result handling
//! - **[types]** - Event record, metadata and predicate value types

pub mod client;
pub mod error;
pub mod types;

pub use client::{
    build_stream_url, matches, Backoff, ClientConfig, EventStreamsClient, HttpTransport,
    MessageCallback, SseMessage, SseParser, TimestampHandle, Transport, DEFAULT_URL,
};
pub use error::{Result, StreamsError};
pub use types::{decode, Delta, EventMeta, FieldValue, RecentChangeEvent};

#[cfg(test)]
mod tests;
