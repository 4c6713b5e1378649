//! Error types and result handling.
//!
//! All fallible operations in this crate return [`Result`], an alias over
//! [`StreamsError`].
//!
//! # Error Handling Policy
//!
//! Transport-level faults (connection failures, unexpected status codes)
//! are handled inside the subscription loop up to the configured retry
//! budget; only the final, unrecoverable fault is returned to the caller.
//! Decode failures on individual events are logged and the event is
//! dropped; a single malformed payload never terminates a session.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, StreamsError>;

/// Errors produced by the EventStreams client.
#[derive(Debug, Error)]
pub enum StreamsError {
    /// The HTTP request could not be sent, or the stream failed mid-read.
    #[error("http error: {0}")]
    Http(String),

    /// The server answered the subscription request with a non-success
    /// status code.
    #[error("unexpected status code {0} from event stream endpoint")]
    InvalidStatus(u16),

    /// The configured base URL could not be parsed.
    #[error("invalid base url: {0}")]
    InvalidUrl(String),

    /// An event payload could not be decoded.
    #[error("event decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
