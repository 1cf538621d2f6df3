//! Field materializer.
//!
//! Walks a tracker's translation table in declaration order and builds the
//! payload field by field.
//!
//! ```text
//! START → WALKING → (STOP | HYBRID_DEFERRED → WALKING) → HYBRID_RESOLVING
//!       → APPLYING_DEFAULTS → DONE
//! ```
//!
//! `STOP` is the only early exit. An unsatisfied hybrid mapping found during
//! the walk is folded into the payload so the remaining fields are still
//! computed; the deferred retry at the end of the walk is fail-fast.

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::args::{UploadArgs, UploadFlag};
use crate::attributes::AttributeStore;
use crate::metrics::MATERIALIZATIONS;
use crate::resolver::{
    resolve_category, resolve_hybrid, resolve_type, CategoryTarget, HybridOutcome,
    ResolutionError,
};
use crate::schema::{FieldSpec, HybridTypeConfig, TrackerSchema, Translation, ValueTypeTag};

use super::fuzzy::{match_contains, match_edition, match_exact, match_tags};
use super::types::{
    FileKind, FileRef, MaterializeReport, Materialized, PayloadValue, ResolvedPayload,
    SkippedField,
};
use super::urls::synthesize_url;
use super::{CUSTOM_EDITION, EDITION, HYBRID_TYPE, REGION, TAGS};

/// Value of a plain string field whose attribute is unknown.
const ABSENT_STRING: &str = "0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    Walking,
    HybridDeferred,
    HybridResolving,
    ApplyingDefaults,
    Done,
}

/// Build the payload for `schema`.
///
/// `attributes` is the release snapshot; a tracker-scoped copy is derived from
/// it and `args` before anything is read.
pub fn materialize(
    schema: &TrackerSchema,
    attributes: &AttributeStore,
    args: &UploadArgs,
) -> Result<ResolvedPayload, ResolutionError> {
    materialize_with_report(schema, attributes, args).map(|m| m.payload)
}

/// Same as [`materialize`], keeping the run's diagnostics.
pub fn materialize_with_report(
    schema: &TrackerSchema,
    attributes: &AttributeStore,
    args: &UploadArgs,
) -> Result<Materialized, ResolutionError> {
    let working = attributes.scoped(args);
    let result = Walk::new(schema, &working, args).run();

    let outcome = match &result {
        Ok(_) => "built",
        Err(e) if e.is_fatal() => "fatal",
        Err(_) => "stop",
    };
    MATERIALIZATIONS
        .with_label_values(&[schema.acronym.as_str(), outcome])
        .inc();
    result
}

struct Walk<'a> {
    schema: &'a TrackerSchema,
    attributes: &'a AttributeStore,
    args: &'a UploadArgs,
    payload: ResolvedPayload,
    report: MaterializeReport,
    pending_hybrid: Option<&'a str>,
    state: WalkState,
}

impl<'a> Walk<'a> {
    fn new(
        schema: &'a TrackerSchema,
        attributes: &'a AttributeStore,
        args: &'a UploadArgs,
    ) -> Self {
        Self {
            schema,
            attributes,
            args,
            payload: ResolvedPayload::new(),
            report: MaterializeReport::default(),
            pending_hybrid: None,
            state: WalkState::Walking,
        }
    }

    fn run(mut self) -> Result<Materialized, ResolutionError> {
        let schema = self.schema;
        for translation in &schema.translations {
            self.translate(translation)?;
        }

        if let Some(field) = self.pending_hybrid.take() {
            self.transition(WalkState::HybridResolving);
            let outcome = resolve_hybrid(self.schema, &self.payload, self.attributes, true)?;
            self.payload.insert(field, outcome.into_value());
        }

        self.transition(WalkState::ApplyingDefaults);
        for (field, value) in &schema.defaults {
            if self.payload.insert_absent(field.as_str(), PayloadValue::text(value.as_str())) {
                self.report.defaults_applied.push(field.clone());
            }
        }

        self.transition(WalkState::Done);
        info!(
            "{}: payload built with {} fields ({} skipped)",
            self.schema.acronym,
            self.payload.len(),
            self.report.skipped.len()
        );
        Ok(Materialized {
            payload: self.payload,
            report: self.report,
        })
    }

    fn transition(&mut self, next: WalkState) {
        debug!("{}: {:?} -> {:?}", self.schema.acronym, self.state, next);
        self.state = next;
    }

    fn translate(&mut self, translation: &'a Translation) -> Result<(), ResolutionError> {
        let schema = self.schema;
        let attributes = self.attributes;
        let attribute = translation.attribute.as_str();
        let field = translation.field.as_str();

        if let Some(target) = CategoryTarget::from_attribute(attribute) {
            let key = match target {
                CategoryTarget::Type => resolve_type(schema, attributes)?,
                _ => resolve_category(target, schema, attributes)?,
            };
            self.payload.insert(field, PayloadValue::Text(key));
            return Ok(());
        }

        match attribute {
            HYBRID_TYPE => {
                match schema.required_hybrid() {
                    Some(hybrid) => self.hybrid(field, hybrid)?,
                    None => self.skip(translation, "hybrid type not required by this tracker"),
                }
                Ok(())
            }
            CUSTOM_EDITION => {
                // Normally filled by the edition fallback
                match attributes.get(attribute) {
                    Some(value) if !self.payload.contains(field) => {
                        self.payload.insert(field, PayloadValue::text(value));
                    }
                    _ => {}
                }
                Ok(())
            }
            _ => {
                match schema.field(field).map(|rule| &rule.spec) {
                    Some(FieldSpec::Typed(tag)) => self.typed(translation, *tag),
                    Some(FieldSpec::Enumerated(allowed)) => self.enumerated(translation, allowed),
                    None => self.skip(translation, "field not declared by the tracker"),
                }
                Ok(())
            }
        }
    }

    fn hybrid(&mut self, field: &'a str, hybrid: &HybridTypeConfig) -> Result<(), ResolutionError> {
        let ready = hybrid
            .prerequisite
            .iter()
            .all(|p| self.payload.contains(p));

        if !ready {
            debug!(
                "{}: deferring hybrid field '{}' until {:?} are resolved",
                self.schema.acronym, field, hybrid.prerequisite
            );
            self.pending_hybrid = Some(field);
            self.report.deferred_hybrid = true;
            self.transition(WalkState::HybridDeferred);
            self.transition(WalkState::Walking);
            return Ok(());
        }

        let outcome = resolve_hybrid(self.schema, &self.payload, self.attributes, false)?;
        if outcome == HybridOutcome::InvalidConfiguration {
            self.report.hybrid_invalid = true;
        }
        self.payload.insert(field, outcome.into_value());
        Ok(())
    }

    fn typed(&mut self, translation: &Translation, tag: ValueTypeTag) {
        let attributes = self.attributes;
        let attribute = translation.attribute.as_str();
        let field = translation.field.as_str();

        match tag {
            ValueTypeTag::File => self.file(translation, FileKind::Single),
            ValueTypeTag::FileArray => self.file(translation, FileKind::Array),
            ValueTypeTag::FileBase64 => self.file(translation, FileKind::Base64),
            ValueTypeTag::FileStringArray => self.file(translation, FileKind::StringArray),
            ValueTypeTag::String => {
                let value = match UploadFlag::from_attribute(attribute) {
                    Some(flag) => self.args.flag_value(flag),
                    None => attributes
                        .get(attribute)
                        .unwrap_or(ABSENT_STRING)
                        .to_string(),
                };
                self.payload.insert(field, PayloadValue::Text(value));
            }
            ValueTypeTag::StringArray => match attributes.get(attribute) {
                Some(value) => {
                    let items = value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect();
                    self.payload.insert(field, PayloadValue::List(items));
                }
                None => self.skip(translation, "attribute absent"),
            },
            ValueTypeTag::Url => match synthesize_url(attribute, attributes) {
                Some(url) => self.payload.insert(field, PayloadValue::Text(url)),
                None => self.skip(translation, "no external id to build a url from"),
            },
        }
    }

    fn file(&mut self, translation: &Translation, kind: FileKind) {
        let attributes = self.attributes;
        let Some(value) = attributes.get(&translation.attribute) else {
            self.skip(translation, "attribute absent");
            return;
        };

        let path = PathBuf::from(value);
        if !path.is_file() {
            error!(
                "{}: file for '{}' not found at {}",
                self.schema.acronym,
                translation.field,
                path.display()
            );
            self.skip(translation, "file not found on disk");
            return;
        }

        self.payload
            .insert(translation.field.as_str(), PayloadValue::File(FileRef { path, kind }));
    }

    fn enumerated(&mut self, translation: &Translation, allowed: &[String]) {
        let attribute = translation.attribute.as_str();
        let field = translation.field.as_str();
        let attributes = self.attributes;
        let Some(value) = attributes.get(attribute) else {
            self.skip(translation, "attribute absent");
            return;
        };

        match attribute {
            EDITION => match match_edition(value, allowed) {
                Some(edition) => self.payload.insert(field, PayloadValue::text(edition)),
                None => self.custom_edition(translation, value),
            },
            REGION => match match_contains(value, allowed) {
                Some(region) => self.payload.insert(field, PayloadValue::text(region)),
                None => self.skip(translation, "region not offered by the tracker"),
            },
            TAGS => {
                let tags = match_tags(value, allowed);
                if tags.is_empty() {
                    self.skip(translation, "no tag offered by the tracker");
                } else {
                    self.payload.insert(field, PayloadValue::List(tags));
                }
            }
            _ => match match_exact(value, allowed) {
                Some(hit) => self.payload.insert(field, PayloadValue::text(hit)),
                None => {
                    debug!(
                        "{}: '{}' is not an allowed value of '{}'",
                        self.schema.acronym, value, field
                    );
                    self.skip(translation, "value not allowed by the tracker");
                }
            },
        }
    }

    fn custom_edition(&mut self, translation: &Translation, value: &str) {
        match self.schema.translated_field(CUSTOM_EDITION) {
            Some(custom) => {
                debug!(
                    "{}: edition '{}' not enumerated, using '{}'",
                    self.schema.acronym, value, custom
                );
                self.payload.insert(custom, PayloadValue::text(value));
            }
            None => self.skip(translation, "edition not offered and no custom edition field"),
        }
    }

    fn skip(&mut self, translation: &Translation, reason: &str) {
        warn!(
            "{}: skipping '{}' -> '{}': {}",
            self.schema.acronym, translation.attribute, translation.field, reason
        );
        self.report.skipped.push(SkippedField {
            attribute: translation.attribute.clone(),
            field: translation.field.clone(),
            reason: reason.to_string(),
        });
    }
}
