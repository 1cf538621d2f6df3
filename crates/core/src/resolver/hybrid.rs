//! Hybrid-type resolver.
//!
//! A hybrid field is a single tracker category derived from a combination of
//! already materialized fields (source, resolution, type) and raw attributes.
//! Candidates are curated to be prefix-exclusive, so the first candidate whose
//! conditions all hold wins.

use tracing::{debug, error, info};

use crate::attributes::AttributeStore;
use crate::metrics::HYBRID_RESOLUTIONS;
use crate::payload::{PayloadValue, ResolvedPayload, HYBRID_TYPE};
use crate::schema::{DataSource, HybridCandidate, HybridCondition, TrackerSchema};

use super::ResolutionError;

/// Text folded into the payload when no hybrid candidate is satisfied.
pub const HYBRID_MAPPING_INVALID_CONFIGURATION: &str = "HYBRID_MAPPING_INVALID_CONFIGURATION";

/// Non-fatal outcome of a hybrid resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HybridOutcome {
    Resolved(String),
    InvalidConfiguration,
}

impl HybridOutcome {
    /// Value placed in the payload for this outcome.
    pub fn into_value(self) -> PayloadValue {
        match self {
            Self::Resolved(key) => PayloadValue::Text(key),
            Self::InvalidConfiguration => {
                PayloadValue::text(HYBRID_MAPPING_INVALID_CONFIGURATION)
            }
        }
    }
}

enum ConditionCheck {
    Satisfied,
    Unsatisfied,
    /// The data source has no value for the condition.
    Missing,
}

/// Resolve the hybrid field of `schema`.
///
/// With `fail_fast`, an unsatisfied rule set is returned as
/// `ResolutionError::HybridUnsatisfied` instead of the sentinel outcome.
pub fn resolve_hybrid(
    schema: &TrackerSchema,
    resolved: &ResolvedPayload,
    attributes: &AttributeStore,
    fail_fast: bool,
) -> Result<HybridOutcome, ResolutionError> {
    let field = schema.translated_field(HYBRID_TYPE).unwrap_or(HYBRID_TYPE);
    let candidates = schema
        .hybrid_type
        .as_ref()
        .map(|h| h.candidates.as_slice())
        .unwrap_or_default();

    for candidate in candidates {
        if candidate_matches(&schema.acronym, candidate, resolved, attributes) {
            info!(
                "{}: resolved hybrid field '{}' to '{}'",
                schema.acronym, field, candidate.key
            );
            HYBRID_RESOLUTIONS.with_label_values(&["resolved"]).inc();
            return Ok(HybridOutcome::Resolved(candidate.key.clone()));
        }
    }

    if fail_fast {
        error!(
            "{}: no hybrid mapping satisfied for '{}', cannot continue",
            schema.acronym, field
        );
        HYBRID_RESOLUTIONS.with_label_values(&["fatal"]).inc();
        return Err(ResolutionError::HybridUnsatisfied {
            tracker: schema.acronym.clone(),
            field: field.to_string(),
        });
    }

    error!(
        "{}: no hybrid mapping satisfied for '{}'",
        schema.acronym, field
    );
    HYBRID_RESOLUTIONS
        .with_label_values(&["invalid_configuration"])
        .inc();
    Ok(HybridOutcome::InvalidConfiguration)
}

fn candidate_matches(
    tracker: &str,
    candidate: &HybridCandidate,
    resolved: &ResolvedPayload,
    attributes: &AttributeStore,
) -> bool {
    for condition in &candidate.conditions {
        match check(condition, resolved, attributes) {
            ConditionCheck::Satisfied => {}
            ConditionCheck::Unsatisfied => {
                debug!(
                    "Hybrid candidate '{}' rejected on '{}'",
                    candidate.key, condition.name
                );
                return false;
            }
            ConditionCheck::Missing => {
                error!(
                    "{}: hybrid candidate '{}' references '{}' with no value in {:?}",
                    tracker, candidate.key, condition.name, condition.data_source
                );
                return false;
            }
        }
    }
    true
}

fn check(
    condition: &HybridCondition,
    resolved: &ResolvedPayload,
    attributes: &AttributeStore,
) -> ConditionCheck {
    let fetched: Vec<&str> = match condition.data_source {
        DataSource::Tracker => match resolved.get(&condition.name) {
            None => return ConditionCheck::Missing,
            Some(PayloadValue::Text(s)) => vec![s.as_str()],
            Some(PayloadValue::List(items)) => items.iter().map(String::as_str).collect(),
            // Present, but nothing to compare against
            Some(PayloadValue::File(_)) => Vec::new(),
        },
        DataSource::Attributes => match attributes.get(&condition.name) {
            None => return ConditionCheck::Missing,
            Some(value) => vec![value],
        },
    };

    let accepted = |v: &&str| condition.values.iter().any(|a| a == v);
    if condition.values.is_empty() || fetched.iter().any(accepted) {
        ConditionCheck::Satisfied
    } else {
        ConditionCheck::Unsatisfied
    }
}
