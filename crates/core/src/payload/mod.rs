//! Payload materialization.
//!
//! Turns a tracker schema plus a release's attributes into the field-by-field
//! payload the tracker's upload form expects.
//!
//! # Example
//!
//! ```ignore
//! use trackerforge_core::{load_tracker_schema, materialize, AttributeStore, UploadArgs};
//!
//! let schema = load_tracker_schema(Path::new("trackers"), "EXT")?;
//! let attributes: AttributeStore = serde_json::from_str(&release_json)?;
//!
//! match materialize(&schema, &attributes, &UploadArgs::default()) {
//!     Ok(payload) => println!("{}", serde_json::to_string(&payload)?),
//!     Err(e) if e.is_stop() => println!("skipping {}: {}", schema.acronym, e),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

mod fuzzy;
mod materializer;
mod types;
mod urls;

pub use fuzzy::{match_contains, match_edition, match_exact, match_tags, normalize_edition};
pub use materializer::{materialize, materialize_with_report};
pub use types::{
    FileKind, FileRef, MaterializeReport, Materialized, PayloadValue, ResolvedPayload,
    SkippedField,
};
pub use urls::synthesize_url;

/// Canonical attribute naming the hybrid field.
pub const HYBRID_TYPE: &str = "hybrid_type";
/// Canonical attribute naming the free-text edition field.
pub const CUSTOM_EDITION: &str = "custom_edition";
pub const EDITION: &str = "edition";
pub const REGION: &str = "region";
pub const TAGS: &str = "tags";
