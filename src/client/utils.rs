//! Backoff schedule and URL construction for the subscription loop.

use std::time::Duration;

/// Exponential backoff schedule for reconnect attempts.
///
/// Delays double deterministically from `min` up to `max`: the first
/// attempt sleeps `min`, the second `2 * min`, and so on. The attempt
/// counter feeds the session's retry budget and is rewound with
/// [`reset`](Backoff::reset) after a connection that lived long enough to
/// be considered healthy.
///
/// # Examples
///
/// ```
/// use eventstreams::Backoff;
/// use std::time::Duration;
///
/// let mut backoff = Backoff::new(Duration::from_millis(100), Duration::from_secs(10));
/// assert_eq!(backoff.duration(), Duration::from_millis(100));
/// assert_eq!(backoff.duration(), Duration::from_millis(200));
/// assert_eq!(backoff.attempt(), 2);
///
/// backoff.reset();
/// assert_eq!(backoff.duration(), Duration::from_millis(100));
/// ```
#[derive(Debug, Clone)]
pub struct Backoff {
    attempt: u32,
    min: Duration,
    max: Duration,
}

impl Backoff {
    /// Create a schedule doubling from `min` up to `max`.
    pub fn new(min: Duration, max: Duration) -> Self {
        Backoff { attempt: 0, min, max }
    }

    /// Delay for the current attempt; advances the attempt counter.
    pub fn duration(&mut self) -> Duration {
        let delay = self.for_attempt(self.attempt);
        self.attempt += 1;
        delay
    }

    /// Number of attempts consumed since creation or the last reset.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Rewind the schedule to its first attempt.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    fn for_attempt(&self, attempt: u32) -> Duration {
        // Cap the shift so the factor cannot overflow.
        let factor = 1u32 << attempt.min(16);
        self.min.saturating_mul(factor).min(self.max)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::new(Duration::from_millis(100), Duration::from_secs(10))
    }
}

/// Build the subscription URL for `stream`.
///
/// The result is `"{base}/{stream}"`, with `?since={since}` appended only
/// when a resume timestamp is present. The server replays the feed from
/// that point after a reconnect.
///
/// # Examples
///
/// ```
/// use eventstreams::build_stream_url;
///
/// let url = build_stream_url("https://stream.wikimedia.org/v2/stream", "recentchange", "");
/// assert_eq!(url, "https://stream.wikimedia.org/v2/stream/recentchange");
///
/// let url = build_stream_url("https://stream.wikimedia.org/v2/stream", "recentchange", "2020-05-21T00:26:42Z");
/// assert_eq!(
///     url,
///     "https://stream.wikimedia.org/v2/stream/recentchange?since=2020-05-21T00:26:42Z"
/// );
/// ```
pub fn build_stream_url(base: &str, stream: &str, since: &str) -> String {
    let mut url = format!("{}/{}", base, stream);
    if !since.is_empty() {
        url.push_str("?since=");
        url.push_str(since);
    }
    url
}
