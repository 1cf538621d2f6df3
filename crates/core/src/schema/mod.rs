//! Tracker schema module.
//!
//! A tracker schema is the declarative description of one tracker's upload
//! form: which fields exist and of what type, how canonical attributes
//! translate to those fields, the category lookup tables and the optional
//! hybrid-type rule set.
//!
//! Schemas are JSON documents, one per tracker, named after the tracker's
//! acronym (`trackers/bhd.json`). Declaration order inside the document is
//! significant: it is the tie-break of the category matcher and the
//! evaluation order of hybrid candidates and translations.

mod document;
mod error;
mod loader;
mod types;
mod validate;

pub use document::CATEGORY_ATTRIBUTES;
pub use error::SchemaError;
pub use loader::{load_schema, load_schema_from_str, load_tracker_schema, schema_path};
pub use types::{
    CategoryCandidate, CategoryRules, DataSource, FieldRule, FieldSpec, HybridCandidate,
    HybridCondition, HybridTypeConfig, Priority, SubAttribute, TrackerSchema, Translation,
    ValueTypeTag,
};
pub use validate::validate_schema;
