//! Typed tracker schema.
//!
//! Every collection whose order matters for matching is a `Vec`, in the order
//! the schema document declares it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declared value type of a tracker field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTypeTag {
    /// `file`
    File,
    /// `file|array`
    FileArray,
    /// `file|base64`
    FileBase64,
    /// `file|string|array`
    FileStringArray,
    /// `string|array`
    StringArray,
    /// `string`
    String,
    /// `url`
    Url,
}

impl ValueTypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::FileArray => "file|array",
            Self::FileBase64 => "file|base64",
            Self::FileStringArray => "file|string|array",
            Self::StringArray => "string|array",
            Self::String => "string",
            Self::Url => "url",
        }
    }
}

impl FromStr for ValueTypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "file" => Ok(Self::File),
            "file|array" => Ok(Self::FileArray),
            "file|base64" => Ok(Self::FileBase64),
            "file|string|array" => Ok(Self::FileStringArray),
            "string|array" => Ok(Self::StringArray),
            "string" => Ok(Self::String),
            "url" => Ok(Self::Url),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for ValueTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a tracker field's value is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    /// Free value of the given type.
    Typed(ValueTypeTag),
    /// One of an enumerated list of allowed values (optional fields only).
    Enumerated(Vec<String>),
}

/// A field the tracker's upload form accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub name: String,
    pub spec: FieldSpec,
    pub required: bool,
}

/// Weight of a sub-attribute inside a category candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    /// Informational, never gates acceptance.
    Optional = 0,
    /// Must be present.
    Required = 1,
    /// At least one of the candidate's SELECT_ONE group must be present.
    SelectOne = 2,
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Optional),
            1 => Ok(Self::Required),
            2 => Ok(Self::SelectOne),
            other => Err(format!("invalid sub-attribute priority {}", other)),
        }
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> Self {
        p as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubAttribute {
    pub name: String,
    pub priority: Priority,
}

/// One selectable tracker value (e.g. a category id) and the release
/// attributes that qualify for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCandidate {
    pub key: String,
    pub sub_attributes: Vec<SubAttribute>,
}

impl CategoryCandidate {
    pub fn with_priority(&self, priority: Priority) -> impl Iterator<Item = &SubAttribute> {
        self.sub_attributes
            .iter()
            .filter(move |s| s.priority == priority)
    }

    pub fn declares(&self, sub_attribute: &str) -> bool {
        self.sub_attributes
            .iter()
            .any(|s| s.name.eq_ignore_ascii_case(sub_attribute))
    }
}

/// Category lookup table for one tracker field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRules {
    pub field: String,
    pub candidates: Vec<CategoryCandidate>,
}

/// Where a hybrid condition reads its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Already materialized tracker payload fields.
    Tracker,
    /// The tracker-scoped attribute copy.
    #[serde(alias = "torrent_info")]
    Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridCondition {
    pub name: String,
    pub data_source: DataSource,
    /// Accepted values; empty means any non-null value.
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridCandidate {
    pub key: String,
    pub conditions: Vec<HybridCondition>,
}

/// Combinatorial category derived from already resolved fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridTypeConfig {
    /// Whether the tracker uses the hybrid field at all.
    pub required: bool,
    /// Tracker fields that must be materialized before resolution.
    pub prerequisite: Vec<String>,
    pub candidates: Vec<HybridCandidate>,
}

/// Canonical attribute → tracker field pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub attribute: String,
    pub field: String,
}

/// Declarative description of one tracker's upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerSchema {
    pub name: String,
    pub acronym: String,
    pub fields: Vec<FieldRule>,
    pub translations: Vec<Translation>,
    pub categories: Vec<CategoryRules>,
    pub hybrid_type: Option<HybridTypeConfig>,
    pub defaults: Vec<(String, String)>,
}

impl TrackerSchema {
    /// Look up a declared field, required fields first.
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields
            .iter()
            .filter(|f| f.name == name)
            .max_by_key(|f| f.required)
    }

    /// Tracker field a canonical attribute translates to.
    pub fn translated_field(&self, attribute: &str) -> Option<&str> {
        self.translations
            .iter()
            .find(|t| t.attribute == attribute)
            .map(|t| t.field.as_str())
    }

    pub fn category_rules(&self, field: &str) -> Option<&CategoryRules> {
        self.categories.iter().find(|c| c.field == field)
    }

    /// Hybrid config, only when the tracker actually uses it.
    pub fn required_hybrid(&self) -> Option<&HybridTypeConfig> {
        self.hybrid_type.as_ref().filter(|h| h.required)
    }
}
