//! Canonical release attributes.
//!
//! The attribute store is the read-only input of the resolution engine. Every
//! tracker gets its own scoped copy (see [`AttributeStore::scoped`]) so derived
//! keys never leak from one tracker's payload into the next.

mod store;

pub use store::{AttributeStore, AttributeStoreBuilder};

/// Attribute names whose values feed the category matcher.
pub const SOURCE_TYPE: &str = "source_type";
pub const SCREEN_SIZE: &str = "screen_size";
pub const BLURAY_DISC_TYPE: &str = "bluray_disc_type";

/// Flag that implicitly selects a season-pack category.
pub const COMPLETE_SEASON: &str = "complete_season";
