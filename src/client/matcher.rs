//! Predicate evaluation over decoded events.
//!
//! A predicate set maps external field names to expected scalar values.
//! An event matches when every predicate is satisfied by a field of the
//! same name carrying an equal value; the empty set matches every event.

use std::collections::BTreeMap;

use crate::types::{FieldValue, RecentChangeEvent};

/// Whether `event` satisfies every predicate in `predicates`.
///
/// Counts the predicates satisfied by the event's matchable fields and
/// requires the count to equal the size of the predicate set. A predicate
/// naming a field the event does not expose can never be satisfied, so it
/// forces a non-match. Comparison is exact scalar equality: an integer
/// predicate never matches a string field, whatever its rendering.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use eventstreams::{decode, matches, FieldValue};
///
/// let event = decode(br#"{"type":"edit","namespace":0}"#)?;
///
/// let mut predicates = BTreeMap::new();
/// predicates.insert("namespace".to_owned(), FieldValue::Integer(0));
/// assert!(matches(&event, &predicates));
///
/// predicates.insert("type".to_owned(), FieldValue::String("log".to_owned()));
/// assert!(!matches(&event, &predicates));
/// # Ok::<(), eventstreams::StreamsError>(())
/// ```
pub fn matches(event: &RecentChangeEvent, predicates: &BTreeMap<String, FieldValue>) -> bool {
    let mut satisfied = 0;
    for (name, value) in event.fields() {
        if predicates.get(name) == Some(&value) {
            satisfied += 1;
        }
    }
    satisfied == predicates.len()
}
