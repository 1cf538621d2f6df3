//! Payload types handed to the upload transport.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How the transport should attach a file-typed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// `file`: upload the file as-is.
    Single,
    /// `file|array`: the path lists one file per line.
    Array,
    /// `file|base64`: send the file contents base64 encoded.
    Base64,
    /// `file|string|array`: the path lists one string value per line.
    StringArray,
}

/// Reference to a file on disk. Contents are read by the transport, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub path: PathBuf,
    pub kind: FileKind,
}

/// One materialized field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Text(String),
    List(Vec<String>),
    File(FileRef),
}

impl PayloadValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Ordered field → value mapping for one tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedPayload {
    fields: IndexMap<String, PayloadValue>,
}

impl ResolvedPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&PayloadValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Insert or replace a field, keeping its original position on replace.
    pub fn insert(&mut self, field: impl Into<String>, value: PayloadValue) {
        self.fields.insert(field.into(), value);
    }

    /// Insert only when the field is not set yet. Returns whether it was inserted.
    pub fn insert_absent(&mut self, field: impl Into<String>, value: PayloadValue) -> bool {
        let field = field.into();
        if self.fields.contains_key(&field) {
            return false;
        }
        self.fields.insert(field, value);
        true
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// A translation entry that produced no payload field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedField {
    pub attribute: String,
    pub field: String,
    pub reason: String,
}

/// Diagnostics of one materialization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterializeReport {
    /// The hybrid field was deferred to the end of the walk.
    pub deferred_hybrid: bool,
    /// The hybrid field was folded in as the invalid-configuration sentinel.
    pub hybrid_invalid: bool,
    pub skipped: Vec<SkippedField>,
    /// Default fields that were added because translation left them unset.
    pub defaults_applied: Vec<String>,
}

/// A fully built payload together with its diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Materialized {
    pub payload: ResolvedPayload,
    pub report: MaterializeReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_absent_keeps_existing() {
        let mut payload = ResolvedPayload::new();
        payload.insert("anonymous", PayloadValue::text("1"));
        assert!(!payload.insert_absent("anonymous", PayloadValue::text("0")));
        assert!(payload.insert_absent("stream", PayloadValue::text("0")));
        assert_eq!(payload.get("anonymous").and_then(|v| v.as_text()), Some("1"));
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn test_serializes_in_insertion_order() {
        let mut payload = ResolvedPayload::new();
        payload.insert("name", PayloadValue::text("Movie 2024"));
        payload.insert("tags", PayloadValue::List(vec!["HDR".to_string()]));
        payload.insert(
            "torrent",
            PayloadValue::File(FileRef {
                path: PathBuf::from("/tmp/movie.torrent"),
                kind: FileKind::Single,
            }),
        );

        let fields: Vec<(&str, Option<&str>)> =
            payload.fields().map(|(k, v)| (k, v.as_text())).collect();
        assert_eq!(
            fields,
            vec![("name", Some("Movie 2024")), ("tags", None), ("torrent", None)]
        );

        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Movie 2024","tags":["HDR"],"torrent":{"path":"/tmp/movie.torrent","kind":"single"}}"#
        );
    }
}
