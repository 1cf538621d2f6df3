use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::args::UploadArgs;

static IMDB_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[tT]{2})?(\d+)$").expect("valid imdb regex"));

/// Values that mark a flag attribute as unset even though the key is present.
const FALSY: [&str; 4] = ["", "0", "false", "no"];

/// Immutable snapshot of the canonical attributes of one release.
///
/// Absence of a key means "unknown", never "false". Produced by the upstream
/// extractors through [`AttributeStoreBuilder`] or deserialized from a flat
/// JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, String>")]
pub struct AttributeStore {
    values: BTreeMap<String, String>,
}

impl AttributeStore {
    /// Start building a new store.
    pub fn builder() -> AttributeStoreBuilder {
        AttributeStoreBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Whether a flag attribute is present and truthy.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name)
            .map(|v| !FALSY.iter().any(|f| v.trim().eq_ignore_ascii_case(f)))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Tracker-scoped working copy.
    ///
    /// Forced attributes from `args` overlay the snapshot, then derived keys
    /// are computed: `imdb` holds the bare numeric id and `imdb_with_tt` the
    /// `tt`-prefixed one. `self` is left untouched.
    pub fn scoped(&self, args: &UploadArgs) -> AttributeStore {
        let mut builder = AttributeStoreBuilder {
            values: self.values.clone(),
        };
        builder = builder.extend(args.forced.iter().map(|(k, v)| (k.clone(), v.clone())));

        if let Some(imdb) = builder.values.get("imdb").cloned() {
            match IMDB_ID.captures(imdb.trim()) {
                Some(caps) => {
                    let id = format!("{:0>7}", &caps[1]);
                    builder.values.insert("imdb_with_tt".to_string(), format!("tt{}", id));
                    builder.values.insert("imdb".to_string(), id);
                }
                None => {
                    tracing::warn!("Ignoring malformed imdb id: {}", imdb);
                }
            }
        }

        builder.build()
    }
}

impl From<BTreeMap<String, Value>> for AttributeStore {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let values = raw
            .into_iter()
            .filter_map(|(k, v)| json_to_attribute(v).map(|v| (k, v)))
            .collect();
        Self { values }
    }
}

impl From<AttributeStore> for BTreeMap<String, String> {
    fn from(store: AttributeStore) -> Self {
        store.values
    }
}

/// Flatten a JSON value into the attribute representation.
///
/// `false` and `null` drop the key so that flags keep key-presence semantics.
fn json_to_attribute(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("1".to_string()),
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(json_to_attribute)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other @ Value::Object(_) => Some(other.to_string()),
    }
}

/// Builder for [`AttributeStore`].
#[derive(Debug, Clone, Default)]
pub struct AttributeStoreBuilder {
    values: BTreeMap<String, String>,
}

impl AttributeStoreBuilder {
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Set a flag attribute; `false` removes the key.
    pub fn set_flag(mut self, name: impl Into<String>, on: bool) -> Self {
        let name = name.into();
        if on {
            self.values.insert(name, "1".to_string());
        } else {
            self.values.remove(&name);
        }
        self
    }

    pub fn extend<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.values.extend(values);
        self
    }

    pub fn build(self) -> AttributeStore {
        AttributeStore {
            values: self.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_semantics() {
        let store = AttributeStore::builder()
            .set("complete_season", "1")
            .set("hdr", "false")
            .set("dv", "")
            .build();
        assert!(store.flag("complete_season"));
        assert!(!store.flag("hdr"));
        assert!(!store.flag("dv"));
        assert!(!store.flag("missing"));
    }

    #[test]
    fn test_set_flag_false_removes_key() {
        let store = AttributeStore::builder()
            .set_flag("complete_season", true)
            .set_flag("complete_season", false)
            .build();
        assert!(!store.contains("complete_season"));
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"{
            "source_type": "bluray_remux",
            "screen_size": "2160p",
            "tmdb": 603,
            "complete_season": true,
            "hdr": false,
            "mal": null,
            "tags": ["HDR", "Atmos"]
        }"#;
        let store: AttributeStore = serde_json::from_str(json).unwrap();
        assert_eq!(store.get("source_type"), Some("bluray_remux"));
        assert_eq!(store.get("tmdb"), Some("603"));
        assert_eq!(store.get("complete_season"), Some("1"));
        assert_eq!(store.get("tags"), Some("HDR,Atmos"));
        assert!(!store.contains("hdr"));
        assert!(!store.contains("mal"));

        let names: Vec<&str> = store.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec!["complete_season", "screen_size", "source_type", "tags", "tmdb"]
        );
    }

    #[test]
    fn test_scoped_derives_imdb_keys() {
        let store = AttributeStore::builder().set("imdb", "tt0133093").build();
        let scoped = store.scoped(&UploadArgs::default());

        assert_eq!(scoped.get("imdb"), Some("0133093"));
        assert_eq!(scoped.get("imdb_with_tt"), Some("tt0133093"));
        // Snapshot is untouched
        assert_eq!(store.get("imdb"), Some("tt0133093"));
        assert!(!store.contains("imdb_with_tt"));
    }

    #[test]
    fn test_scoped_pads_short_imdb_ids() {
        let store = AttributeStore::builder().set("imdb", "133093").build();
        let scoped = store.scoped(&UploadArgs::default());
        assert_eq!(scoped.get("imdb_with_tt"), Some("tt0133093"));
    }

    #[test]
    fn test_scoped_ignores_malformed_imdb() {
        let store = AttributeStore::builder().set("imdb", "not-an-id").build();
        let scoped = store.scoped(&UploadArgs::default());
        assert_eq!(scoped.get("imdb"), Some("not-an-id"));
        assert!(!scoped.contains("imdb_with_tt"));
    }

    #[test]
    fn test_scoped_applies_forced_attributes() {
        let store = AttributeStore::builder().set("type", "movie").build();
        let mut args = UploadArgs::default();
        args.forced.insert("type".to_string(), "episode".to_string());

        let scoped = store.scoped(&args);
        assert_eq!(scoped.get("type"), Some("episode"));
        assert_eq!(store.get("type"), Some("movie"));
    }
}
