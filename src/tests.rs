//! Cross-module smoke tests.

use crate::{ClientConfig, EventStreamsClient, FieldValue, DEFAULT_URL};

#[test]
fn test_default_client_targets_public_endpoint() {
    let _client = EventStreamsClient::new();
    assert_eq!(ClientConfig::default().base_url, DEFAULT_URL);
}

#[test]
fn test_builder_chains() {
    let client = EventStreamsClient::new()
        .match_field("namespace", 0)
        .match_field("type", "edit")
        .match_field("bot", false)
        .since("2024-01-01T00:00:00Z");

    assert_eq!(client.last_timestamp(), "");
}

#[test]
fn test_predicate_values_from_literals() {
    assert_eq!(FieldValue::from(0), FieldValue::Integer(0));
    assert_eq!(
        FieldValue::from("enwiki"),
        FieldValue::String("enwiki".to_owned())
    );
    assert_eq!(FieldValue::from(false), FieldValue::Boolean(false));
}
