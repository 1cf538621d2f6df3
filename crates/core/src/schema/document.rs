//! On-disk JSON shape of a tracker schema.
//!
//! The document keeps the declaration order of every map (`IndexMap`); the
//! conversion into [`TrackerSchema`] turns those maps into ordered `Vec`s.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::types::{
    CategoryCandidate, CategoryRules, DataSource, FieldRule, FieldSpec, HybridCandidate,
    HybridCondition, HybridTypeConfig, Priority, SubAttribute, TrackerSchema, Translation,
    ValueTypeTag,
};
use super::SchemaError;

/// Canonical attributes whose translated field is resolved by the category
/// matcher, in the order they become hybrid prerequisites.
pub const CATEGORY_ATTRIBUTES: [&str; 3] = ["source", "resolution", "type"];

#[derive(Debug, Deserialize)]
pub(crate) struct SchemaDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    acronym: Option<String>,
    #[serde(default)]
    required: IndexMap<String, RawFieldSpec>,
    #[serde(default)]
    optional: IndexMap<String, RawFieldSpec>,
    translation: IndexMap<String, String>,
    #[serde(default)]
    categories: IndexMap<String, IndexMap<String, IndexMap<String, Priority>>>,
    #[serde(default)]
    hybrid_type: Option<RawHybridType>,
    #[serde(default)]
    defaults: IndexMap<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFieldSpec {
    Tag(String),
    Allowed(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct RawHybridType {
    #[serde(default)]
    required: bool,
    #[serde(default)]
    prerequisite: Option<Vec<String>>,
    #[serde(default)]
    mapping: IndexMap<String, IndexMap<String, RawHybridCondition>>,
}

#[derive(Debug, Deserialize)]
struct RawHybridCondition {
    data_source: DataSource,
    #[serde(default)]
    values: Vec<String>,
}

impl SchemaDocument {
    /// Convert into the typed schema. `fallback_acronym` is used when the
    /// document does not name its tracker.
    pub(crate) fn into_schema(self, fallback_acronym: &str) -> Result<TrackerSchema, SchemaError> {
        let acronym = self
            .acronym
            .unwrap_or_else(|| fallback_acronym.to_uppercase());
        let name = self.name.unwrap_or_else(|| acronym.clone());

        let mut fields = Vec::with_capacity(self.required.len() + self.optional.len());
        for (required, map) in [(true, self.required), (false, self.optional)] {
            for (field, raw) in map {
                let spec = match raw {
                    RawFieldSpec::Tag(tag) => FieldSpec::Typed(
                        tag.parse::<ValueTypeTag>()
                            .map_err(|tag| SchemaError::UnknownValueType {
                                field: field.clone(),
                                tag,
                            })?,
                    ),
                    RawFieldSpec::Allowed(values) => FieldSpec::Enumerated(values),
                };
                fields.push(FieldRule {
                    name: field,
                    spec,
                    required,
                });
            }
        }

        let translations: Vec<Translation> = self
            .translation
            .into_iter()
            .map(|(attribute, field)| Translation { attribute, field })
            .collect();

        let categories = self
            .categories
            .into_iter()
            .map(|(field, candidates)| CategoryRules {
                field,
                candidates: candidates
                    .into_iter()
                    .map(|(key, subs)| CategoryCandidate {
                        key,
                        sub_attributes: subs
                            .into_iter()
                            .map(|(name, priority)| SubAttribute { name, priority })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        let hybrid_type = self.hybrid_type.map(|raw| {
            let prerequisite = raw.prerequisite.unwrap_or_else(|| {
                CATEGORY_ATTRIBUTES
                    .iter()
                    .filter_map(|attr| {
                        translations
                            .iter()
                            .find(|t| t.attribute == *attr)
                            .map(|t| t.field.clone())
                    })
                    .collect()
            });
            HybridTypeConfig {
                required: raw.required,
                prerequisite,
                candidates: raw
                    .mapping
                    .into_iter()
                    .map(|(key, conditions)| HybridCandidate {
                        key,
                        conditions: conditions
                            .into_iter()
                            .map(|(name, c)| HybridCondition {
                                name,
                                data_source: c.data_source,
                                values: c.values,
                            })
                            .collect(),
                    })
                    .collect(),
            }
        });

        let defaults = self
            .defaults
            .into_iter()
            .filter_map(|(field, value)| scalar_to_string(value).map(|v| (field, v)))
            .collect();

        Ok(TrackerSchema {
            name,
            acronym,
            fields,
            translations,
            categories,
            hybrid_type,
            defaults,
        })
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(if b { "1" } else { "0" }.to_string()),
        other => Some(other.to_string()),
    }
}
