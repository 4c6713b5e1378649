//! Core event types for the EventStreams feed.
//!
//! The central type is [`RecentChangeEvent`], the decoded form of one
//! message from the `recentchange` stream. Its shape mirrors the
//! mediawiki/recentchange schema: a set of flat scalar fields plus the
//! nested [`EventMeta`] group carried by every message on the event bus.
//!
//! # Matching
//!
//! Predicate matching operates over the event's *externally visible* field
//! names (the JSON keys on the wire), not its Rust field names. The
//! mapping is declared once in a static accessor table and exposed through
//! [`RecentChangeEvent::fields`]; nested groups (`length`, `revision`,
//! `meta`) do not participate.
//!
//! # Examples
//!
//! ```
//! use eventstreams::{decode, FieldValue};
//!
//! let event = decode(br#"{"type":"edit","namespace":0,"meta":{"dt":"2020-05-21T00:26:42Z"}}"#)?;
//! assert_eq!(event.kind, "edit");
//! assert_eq!(event.meta.dt, "2020-05-21T00:26:42Z");
//!
//! let names: Vec<_> = event.fields().map(|(name, _)| name).collect();
//! assert!(names.contains(&"namespace"));
//! # Ok::<(), eventstreams::StreamsError>(())
//! ```

use serde::Deserialize;

use crate::error::Result;

/// A scalar value a predicate can compare against.
///
/// The set of representable values is closed so equality is exhaustive:
/// comparison is exact over both tag and payload, with no coercion between
/// numeric and string representations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A UTF-8 string field.
    String(String),
    /// A signed integer field.
    Integer(i64),
    /// A boolean field.
    Boolean(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

/// A before/after pair of counters attached to an edit.
///
/// Used for both the byte length of the page (`length`) and the revision
/// ids (`revision`). Not a matchable target.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Delta {
    /// Value before the change.
    pub old: i64,
    /// Value after the change.
    pub new: i64,
}

/// Event bus metadata attached to every EventStreams message.
///
/// `dt` is the origin timestamp of the event and doubles as the resume
/// point when a dropped connection is reopened.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventMeta {
    /// Canonical URI of the changed resource.
    pub uri: String,
    /// Id of the HTTP request that produced the event.
    pub request_id: String,
    /// Unique id of this event.
    pub id: String,
    /// ISO8601 origin timestamp.
    pub dt: String,
    /// Domain the event originated from.
    pub domain: String,
    /// Name of the stream the event was published to.
    pub stream: String,
    /// Kafka topic backing the stream.
    pub topic: String,
    /// Partition within the topic.
    pub partition: i64,
    /// Offset within the partition.
    pub offset: i64,
}

/// One decoded event from the `recentchange` stream.
///
/// Fields missing from the wire payload decode to their default values;
/// the stream interleaves several change kinds (`edit`, `log`, `new`,
/// `categorize`) and not all of them carry the full field set.
///
/// Events are immutable once decoded and are handed to the caller's
/// handler by value; the client retains nothing beyond the `meta.dt`
/// resume timestamp.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecentChangeEvent {
    /// Id of the recentchange row this event was generated from.
    pub id: i64,
    /// Kind of change: `edit`, `new`, `log` or `categorize`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Namespace of the affected page.
    pub namespace: i64,
    /// Full title of the affected page, including the namespace prefix.
    pub title: String,
    /// Edit summary as entered by the user.
    pub comment: String,
    /// Unix timestamp of the change.
    pub timestamp: i64,
    /// Name of the user or IP that made the change.
    pub user: String,
    /// Whether the change was made by a bot account.
    pub bot: bool,
    /// Whether the edit was flagged as minor.
    pub minor: bool,
    /// Whether the change was patrolled.
    pub patrolled: bool,
    /// Page byte length before and after the change.
    pub length: Delta,
    /// Revision ids before and after the change.
    pub revision: Delta,
    /// Base URL of the originating wiki.
    pub server_url: String,
    /// Hostname of the originating wiki.
    pub server_name: String,
    /// Script path of the originating wiki.
    pub server_script_path: String,
    /// Internal database name of the originating wiki.
    pub wiki: String,
    /// Edit summary rendered to HTML.
    #[serde(rename = "parsedcomment")]
    pub parsed_comment: String,
    /// URI of the JSON schema the event conforms to.
    #[serde(rename = "$schema")]
    pub schema: String,
    /// Event bus metadata, including the `dt` resume timestamp.
    pub meta: EventMeta,
}

/// Accessor resolving one matchable field of an event.
type FieldAccessor = fn(&RecentChangeEvent) -> FieldValue;

/// Stable external field names and their accessors, declared once.
///
/// Only flat scalar fields with a wire-visible name appear here; the
/// nested `length`, `revision` and `meta` groups are not matchable.
const MATCHABLE_FIELDS: &[(&str, FieldAccessor)] = &[
    ("id", |e| FieldValue::Integer(e.id)),
    ("type", |e| FieldValue::String(e.kind.clone())),
    ("namespace", |e| FieldValue::Integer(e.namespace)),
    ("title", |e| FieldValue::String(e.title.clone())),
    ("comment", |e| FieldValue::String(e.comment.clone())),
    ("timestamp", |e| FieldValue::Integer(e.timestamp)),
    ("user", |e| FieldValue::String(e.user.clone())),
    ("bot", |e| FieldValue::Boolean(e.bot)),
    ("minor", |e| FieldValue::Boolean(e.minor)),
    ("patrolled", |e| FieldValue::Boolean(e.patrolled)),
    ("server_url", |e| FieldValue::String(e.server_url.clone())),
    ("server_name", |e| FieldValue::String(e.server_name.clone())),
    ("server_script_path", |e| {
        FieldValue::String(e.server_script_path.clone())
    }),
    ("wiki", |e| FieldValue::String(e.wiki.clone())),
    ("parsedcomment", |e| FieldValue::String(e.parsed_comment.clone())),
    ("$schema", |e| FieldValue::String(e.schema.clone())),
];

impl RecentChangeEvent {
    /// Enumerate the matchable `(external name, value)` pairs of this event.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, FieldValue)> + '_ {
        MATCHABLE_FIELDS.iter().map(move |(name, get)| (*name, get(self)))
    }
}

/// Decode one raw stream payload into a [`RecentChangeEvent`].
pub fn decode(data: &[u8]) -> Result<RecentChangeEvent> {
    Ok(serde_json::from_slice(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trimmed from a real commons.wikimedia.org event.
    const SAMPLE: &[u8] = br#"{
        "$schema": "/mediawiki/recentchange/1.0.0",
        "meta": {
            "uri": "https://commons.wikimedia.org/wiki/File:Abydos-Bold-hieroglyph-O10A.png",
            "request_id": "eb2f4e7b-0aaa-4df0-8dc6-d49cfbb62178",
            "id": "013846b7-9e2a-430a-8959-7a423bf38385",
            "dt": "2020-05-21T00:26:42Z",
            "domain": "commons.wikimedia.org",
            "stream": "mediawiki.recentchange",
            "topic": "eqiad.mediawiki.recentchange",
            "partition": 0,
            "offset": 2420955111
        },
        "id": 1390275467,
        "type": "edit",
        "namespace": 6,
        "title": "File:Abydos-Bold-hieroglyph-O10A.png",
        "comment": "automatically adding claims based on file information: date",
        "timestamp": 1590020802,
        "user": "SchlurcherBot",
        "bot": true,
        "minor": false,
        "patrolled": true,
        "length": { "old": 366, "new": 1010 },
        "revision": { "old": 326564921, "new": 420613296 },
        "server_url": "https://commons.wikimedia.org",
        "server_name": "commons.wikimedia.org",
        "server_script_path": "/w",
        "wiki": "commonswiki",
        "parsedcomment": "automatically adding claims based on file information: date"
    }"#;

    #[test]
    fn test_decode_sample_event() {
        let event = decode(SAMPLE).unwrap();
        assert_eq!(event.id, 1390275467);
        assert_eq!(event.kind, "edit");
        assert_eq!(event.namespace, 6);
        assert_eq!(event.user, "SchlurcherBot");
        assert!(event.bot);
        assert!(!event.minor);
        assert_eq!(event.length.old, 366);
        assert_eq!(event.length.new, 1010);
        assert_eq!(event.meta.dt, "2020-05-21T00:26:42Z");
        assert_eq!(event.meta.offset, 2420955111);
        assert_eq!(event.schema, "/mediawiki/recentchange/1.0.0");
    }

    #[test]
    fn test_missing_fields_default() {
        // Log events omit most of the edit fields.
        let event = decode(br#"{"type":"log","wiki":"enwiki"}"#).unwrap();
        assert_eq!(event.kind, "log");
        assert_eq!(event.namespace, 0);
        assert_eq!(event.title, "");
        assert!(!event.bot);
        assert_eq!(event.meta.dt, "");
    }

    #[test]
    fn test_decode_rejects_malformed_payload() {
        assert!(decode(b"{ not json").is_err());
        assert!(decode(b"").is_err());
    }

    #[test]
    fn test_fields_expose_external_names() {
        let event = decode(SAMPLE).unwrap();
        let fields: Vec<_> = event.fields().collect();

        assert!(fields.contains(&("namespace", FieldValue::Integer(6))));
        assert!(fields.contains(&("type", FieldValue::String("edit".to_owned()))));
        assert!(fields.contains(&("bot", FieldValue::Boolean(true))));
        // Nested groups are not matchable.
        assert!(!fields.iter().any(|(name, _)| *name == "meta" || *name == "length"));
        // The wire name wins over the Rust field name.
        assert!(fields.iter().any(|(name, _)| *name == "parsedcomment"));
        assert!(!fields.iter().any(|(name, _)| *name == "parsed_comment"));
    }

    #[test]
    fn test_field_value_conversions() {
        assert_eq!(FieldValue::from("edit"), FieldValue::String("edit".to_owned()));
        assert_eq!(FieldValue::from(0), FieldValue::Integer(0));
        assert_eq!(FieldValue::from(7i64), FieldValue::Integer(7));
        assert_eq!(FieldValue::from(true), FieldValue::Boolean(true));
    }
}
