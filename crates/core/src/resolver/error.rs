//! Error types for the resolver module.

use thiserror::Error;

/// Outcomes that end a tracker's resolution without a payload.
///
/// `Stop` is recoverable: the upload loop skips the tracker and moves on.
/// `HybridUnsatisfied` aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The release (or this category of it) is not permitted on the tracker.
    #[error("{tracker}: could not resolve '{attribute}': {reason}")]
    Stop {
        tracker: String,
        attribute: String,
        reason: String,
    },

    /// A required hybrid field has no satisfied mapping and no fallback.
    #[error("{tracker}: no hybrid mapping satisfied for field '{field}'")]
    HybridUnsatisfied { tracker: String, field: String },
}

impl ResolutionError {
    pub fn stop(
        tracker: impl Into<String>,
        attribute: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Stop {
            tracker: tracker.into(),
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    /// Whether the upload loop should continue with the next tracker.
    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Stop { .. })
    }

    /// Whether the whole run must be aborted.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::HybridUnsatisfied { .. })
    }
}
