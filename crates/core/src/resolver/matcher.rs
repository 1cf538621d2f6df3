//! Category/source/resolution matcher.
//!
//! Resolves one canonical attribute to exactly one candidate key of the
//! tracker's category table. Candidates are evaluated in declaration order
//! and that order is the tie-break.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::attributes::{
    AttributeStore, BLURAY_DISC_TYPE, COMPLETE_SEASON, SCREEN_SIZE, SOURCE_TYPE,
};
use crate::metrics::CATEGORY_RESOLUTIONS;
use crate::schema::{CategoryCandidate, CategoryRules, Priority, TrackerSchema};

use super::ResolutionError;

/// Canonical attributes resolved through a category table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryTarget {
    Type,
    Source,
    Resolution,
}

impl CategoryTarget {
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Source => "source",
            Self::Resolution => "resolution",
        }
    }

    pub fn from_attribute(name: &str) -> Option<Self> {
        match name {
            "type" => Some(Self::Type),
            "source" => Some(Self::Source),
            "resolution" => Some(Self::Resolution),
            _ => None,
        }
    }
}

/// Whether a candidate key is the catch-all fallback.
pub fn is_fallback(key: &str) -> bool {
    key.eq_ignore_ascii_case("other")
}

/// Values the matcher compares sub-attributes against.
///
/// Lower-cased `source_type`, `screen_size` and bluray disc type, plus their
/// `_`/space separated tokens (`bluray_remux` also yields `bluray` and `remux`).
pub fn relevant_values(attributes: &AttributeStore) -> BTreeSet<String> {
    let mut values = BTreeSet::new();
    for key in [SOURCE_TYPE, SCREEN_SIZE, BLURAY_DISC_TYPE] {
        if let Some(value) = attributes.get(key) {
            let value = value.trim().to_lowercase();
            if value.is_empty() {
                continue;
            }
            values.extend(
                value
                    .split(|c: char| c == '_' || c.is_whitespace())
                    .filter(|t| !t.is_empty())
                    .map(str::to_string),
            );
            values.insert(value);
        }
    }
    values
}

/// Why a candidate was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Rejection {
    MissingRequired(Vec<String>),
    NoSelection(Vec<String>),
}

/// Resolve `target` to one candidate key of its category table.
///
/// Returns `ResolutionError::Stop` when zero or several candidates remain.
pub fn resolve_category(
    target: CategoryTarget,
    schema: &TrackerSchema,
    attributes: &AttributeStore,
) -> Result<String, ResolutionError> {
    let attribute = target.attribute();
    let result = schema
        .translated_field(attribute)
        .and_then(|field| schema.category_rules(field))
        .ok_or_else(|| {
            ResolutionError::stop(
                &schema.acronym,
                attribute,
                "no category table for this attribute",
            )
        })
        .and_then(|rules| {
            let relevant = relevant_values(attributes);
            match_candidates(rules, &relevant)
                .map_err(|reason| ResolutionError::stop(&schema.acronym, attribute, reason))
        });

    record(attribute, &result);
    match &result {
        Ok(key) => info!("{}: resolved {} to '{}'", schema.acronym, attribute, key),
        Err(e) => warn!("{}", e),
    }
    result
}

/// Resolve the `type` attribute.
///
/// A truthy `complete_season` flag implicitly selects the first candidate that
/// requires it; otherwise the first candidate declaring the literal `type`
/// value wins.
pub fn resolve_type(
    schema: &TrackerSchema,
    attributes: &AttributeStore,
) -> Result<String, ResolutionError> {
    let attribute = CategoryTarget::Type.attribute();
    let result = schema
        .translated_field(attribute)
        .and_then(|field| schema.category_rules(field))
        .ok_or_else(|| {
            ResolutionError::stop(
                &schema.acronym,
                attribute,
                "no category table for this attribute",
            )
        })
        .and_then(|rules| {
            select_type(rules, attributes).ok_or_else(|| {
                ResolutionError::stop(
                    &schema.acronym,
                    attribute,
                    format!(
                        "upload type '{}' is not supported",
                        attributes.get(attribute).unwrap_or("<unknown>")
                    ),
                )
            })
        });

    record(attribute, &result);
    match &result {
        Ok(key) => info!("{}: resolved {} to '{}'", schema.acronym, attribute, key),
        Err(e) => warn!("{}", e),
    }
    result
}

fn select_type(rules: &CategoryRules, attributes: &AttributeStore) -> Option<String> {
    if attributes.flag(COMPLETE_SEASON) {
        let season = rules.candidates.iter().find(|c| {
            c.sub_attributes.iter().any(|s| {
                s.priority != Priority::Optional && s.name.eq_ignore_ascii_case(COMPLETE_SEASON)
            })
        });
        if let Some(candidate) = season {
            return Some(candidate.key.clone());
        }
    }

    let literal = attributes.get(CategoryTarget::Type.attribute())?;
    rules
        .candidates
        .iter()
        .find(|c| c.declares(literal.trim()))
        .map(|c| c.key.clone())
}

fn record(attribute: &str, result: &Result<String, ResolutionError>) {
    let outcome = if result.is_ok() { "resolved" } else { "stop" };
    CATEGORY_RESOLUTIONS
        .with_label_values(&[attribute, outcome])
        .inc();
}

/// Scan the candidates in declaration order.
///
/// Early exits:
/// - a candidate without SELECT_ONE sub-attributes that is not the fallback
///   ends the scan as soon as it is accepted;
/// - a candidate declaring two or more SELECT_ONE sub-attributes of which
///   exactly one matched ends the scan as soon as it is accepted.
///
/// The second rule can settle on a candidate before a later, more specific
/// one is examined. Schemas rely on this, keep it.
fn match_candidates(
    rules: &CategoryRules,
    relevant: &BTreeSet<String>,
) -> Result<String, String> {
    let mut accepted: Vec<&str> = Vec::new();
    let mut rejections: Vec<(&str, Rejection)> = Vec::new();

    for candidate in &rules.candidates {
        match evaluate(candidate, relevant) {
            Ok(selected) => {
                debug!("Candidate '{}' accepted", candidate.key);
                accepted.push(candidate.key.as_str());

                let select_count = candidate.with_priority(Priority::SelectOne).count();
                if select_count == 0 && !is_fallback(&candidate.key) {
                    break;
                }
                if select_count >= 2 && selected == 1 {
                    break;
                }
            }
            Err(rejection) => {
                debug!("Candidate '{}' rejected: {:?}", candidate.key, rejection);
                rejections.push((candidate.key.as_str(), rejection));
            }
        }
    }

    if accepted.len() > 1 {
        accepted.retain(|key| !is_fallback(key));
    }

    match accepted.as_slice() {
        [key] => Ok(key.to_string()),
        [] => Err(format!("no candidate matched ({})", describe(&rejections))),
        several => Err(format!("ambiguous candidates: {}", several.join(", "))),
    }
}

/// Returns the number of SELECT_ONE sub-attributes present.
fn evaluate(
    candidate: &CategoryCandidate,
    relevant: &BTreeSet<String>,
) -> Result<usize, Rejection> {
    let present = |name: &str| relevant.contains(&name.to_lowercase());

    let missing: Vec<String> = candidate
        .with_priority(Priority::Required)
        .filter(|s| !present(s.name.as_str()))
        .map(|s| s.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(Rejection::MissingRequired(missing));
    }

    let group: Vec<&str> = candidate
        .with_priority(Priority::SelectOne)
        .map(|s| s.name.as_str())
        .collect();
    if group.is_empty() {
        return Ok(0);
    }

    let selected = group.iter().filter(|name| present(**name)).count();
    if selected == 0 {
        return Err(Rejection::NoSelection(
            group.iter().map(|s| s.to_string()).collect(),
        ));
    }
    Ok(selected)
}

fn describe(rejections: &[(&str, Rejection)]) -> String {
    if rejections.is_empty() {
        return "no candidates declared".to_string();
    }
    rejections
        .iter()
        .map(|(key, rejection)| match rejection {
            Rejection::MissingRequired(missing) => {
                format!("{}: missing required [{}]", key, missing.join(", "))
            }
            Rejection::NoSelection(group) => {
                format!("{}: none of [{}] present", key, group.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
