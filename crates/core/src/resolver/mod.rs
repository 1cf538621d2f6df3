//! Category and hybrid-type resolution.
//!
//! # Architecture
//!
//! ```text
//! type        => matcher::resolve_type       (literal / implicit flag lookup)
//! source      => matcher::resolve_category   (required / select-one rules)
//! resolution  => matcher::resolve_category
//! hybrid_type => hybrid::resolve_hybrid      (after the three above)
//! ```
//!
//! Failures are values: `ResolutionError::Stop` skips the tracker,
//! `ResolutionError::HybridUnsatisfied` aborts the run, and
//! `HybridOutcome::InvalidConfiguration` is folded into the payload.

mod error;
mod hybrid;
mod matcher;

pub use error::ResolutionError;
pub use hybrid::{resolve_hybrid, HybridOutcome, HYBRID_MAPPING_INVALID_CONFIGURATION};
pub use matcher::{is_fallback, relevant_values, resolve_category, resolve_type, CategoryTarget};
