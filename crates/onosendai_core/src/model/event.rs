//! Protocol event model.
//!
//! # Responsibility
//! - Hold the event fields the visualization core consumes.
//! - Decode relay JSON leniently so one bad field never drops an event.
//!
//! # Invariants
//! - `id` is the only required field; everything else degrades to empty.
//! - A malformed tag entry is kept in place as an empty entry, so the
//!   first-tag parent convention still reads the right position.
//! - Wire names follow the protocol (`pubkey`, `simhash`).
//! - Fields the core does not read are carried through unchanged, so a
//!   re-encoded event keeps everything the relay sent.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Tag kind that marks a referenced event.
pub const EVENT_TAG_KIND: &str = "e";

/// Protocol event as delivered by the relay layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Opaque unique event id.
    pub id: String,
    /// Publisher identifier.
    #[serde(rename = "pubkey", default, deserialize_with = "lenient_string")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,
    /// Ordered tag entries. The first entry of kind `e` names the parent.
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<Vec<String>>,
    /// Hex similarity hash over `content`, computed upstream.
    #[serde(rename = "simhash", default, deserialize_with = "lenient_string")]
    pub fingerprint: String,
    /// Remaining protocol fields (`kind`, `created_at`, `sig`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// How an event declares its parent through the first tag entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef<'a> {
    /// No tags, or the first tag is not of kind `e`.
    Undeclared,
    /// First tag is `["e", <id>, ...]`.
    Declared(&'a str),
    /// First tag is of kind `e` but carries no usable id.
    DeclaredWithoutId,
}

/// Raw event decode failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    Malformed(String),
}

impl Display for EventError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(message) => write!(f, "malformed event: {message}"),
        }
    }
}

impl Error for EventError {}

impl Event {
    /// Creates an event without tags or fingerprint.
    pub fn new(id: impl Into<String>, author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            content: content.into(),
            tags: Vec::new(),
            fingerprint: String::new(),
            extra: Map::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<Vec<String>>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = fingerprint.into();
        self
    }

    /// Decodes one relay event from JSON text.
    ///
    /// # Errors
    /// - `EventError::Malformed` when the text is not a JSON object or has no
    ///   string `id`. Field-level problems inside a valid object degrade
    ///   instead of failing.
    pub fn from_json(raw: &str) -> Result<Self, EventError> {
        let event: Event =
            serde_json::from_str(raw).map_err(|err| EventError::Malformed(err.to_string()))?;
        if event.id.trim().is_empty() {
            return Err(EventError::Malformed("event id must not be empty".to_string()));
        }
        Ok(event)
    }

    /// Returns the first tag entry, if any.
    pub fn first_tag(&self) -> Option<&[String]> {
        self.tags.first().map(Vec::as_slice)
    }

    /// Reads the parent declaration from the first tag entry.
    pub fn parent_ref(&self) -> ParentRef<'_> {
        match self.first_tag() {
            Some([kind, rest @ ..]) if kind == EVENT_TAG_KIND => match rest.first() {
                Some(id) if !id.is_empty() => ParentRef::Declared(id.as_str()),
                _ => ParentRef::DeclaredWithoutId,
            },
            _ => ParentRef::Undeclared,
        }
    }

    /// Whether the first tag entry is `("e", parent_id)`.
    pub fn is_reply_to(&self, parent_id: &str) -> bool {
        matches!(self.parent_ref(), ParentRef::Declared(id) if id == parent_id)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => value,
        _ => String::new(),
    })
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(entries.into_iter().map(tag_entry_from_value).collect())
}

fn tag_entry_from_value(value: Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    let mut entry = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(text) => entry.push(text),
            _ => return Vec::new(),
        }
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::{Event, EventError, ParentRef};

    fn tag(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parent_ref_reads_first_tag_only() {
        let reply = Event::new("e2", "p1", "re").with_tags(vec![tag(&["e", "e1"]), tag(&["p", "p9"])]);
        assert_eq!(reply.parent_ref(), ParentRef::Declared("e1"));
        assert!(reply.is_reply_to("e1"));

        let mention_first =
            Event::new("e3", "p1", "hi").with_tags(vec![tag(&["p", "p9"]), tag(&["e", "e1"])]);
        assert_eq!(mention_first.parent_ref(), ParentRef::Undeclared);
        assert!(!mention_first.is_reply_to("e1"));

        assert_eq!(Event::new("e4", "p1", "").parent_ref(), ParentRef::Undeclared);
    }

    #[test]
    fn parent_ref_flags_e_tag_without_id() {
        let bare = Event::new("e5", "p1", "").with_tags(vec![tag(&["e"])]);
        assert_eq!(bare.parent_ref(), ParentRef::DeclaredWithoutId);

        let empty = Event::new("e6", "p1", "").with_tags(vec![tag(&["e", ""])]);
        assert_eq!(empty.parent_ref(), ParentRef::DeclaredWithoutId);
    }

    #[test]
    fn from_json_uses_protocol_field_names() {
        let event = Event::from_json(
            r#"{"id":"e1","pubkey":"p1","content":"hello","tags":[["e","e0"]],"simhash":"ff","kind":1}"#,
        )
        .unwrap();
        assert_eq!(event.author, "p1");
        assert_eq!(event.fingerprint, "ff");
        assert_eq!(event.tags, vec![tag(&["e", "e0"])]);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["pubkey"], "p1");
        assert_eq!(json["simhash"], "ff");
    }

    #[test]
    fn unread_fields_survive_re_encoding() {
        let event = Event::from_json(
            r#"{"id":"e1","pubkey":"p1","content":"c","tags":[],"simhash":"ab","kind":1,"created_at":1700000000,"sig":"deadbeef"}"#,
        )
        .unwrap();
        assert_eq!(event.extra.len(), 3);
        assert!(!event.extra.contains_key("pubkey"));

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], 1);
        assert_eq!(json["created_at"], 1_700_000_000);
        assert_eq!(json["sig"], "deadbeef");
        assert_eq!(Event::from_json(&json.to_string()).unwrap(), event);
    }

    #[test]
    fn from_json_degrades_malformed_fields_in_place() {
        let event = Event::from_json(
            r#"{"id":"e1","pubkey":7,"content":null,"tags":[["e",3],["e","e0"],"junk"]}"#,
        )
        .unwrap();
        assert_eq!(event.author, "");
        assert_eq!(event.content, "");
        assert_eq!(event.tags.len(), 3);
        assert!(event.tags[0].is_empty());
        assert_eq!(event.parent_ref(), ParentRef::Undeclared);

        let no_tags = Event::from_json(r#"{"id":"e2","tags":"nope"}"#).unwrap();
        assert!(no_tags.tags.is_empty());
    }

    #[test]
    fn from_json_rejects_missing_or_empty_id() {
        assert!(matches!(
            Event::from_json(r#"{"content":"x"}"#),
            Err(EventError::Malformed(_))
        ));
        assert!(matches!(
            Event::from_json(r#"{"id":"  "}"#),
            Err(EventError::Malformed(_))
        ));
        assert!(matches!(Event::from_json("[1,2]"), Err(EventError::Malformed(_))));
    }
}
