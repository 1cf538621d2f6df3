//! The per-tracker upload loop.
//!
//! Each configured tracker gets its own materialization. A STOP skips the
//! tracker and the loop moves on; a fatal resolution error ends the batch.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use trackerforge_core::{
    load_tracker_schema, materialize, AttributeStore, Config, ResolutionError, ResolvedPayload,
};

/// One line of batch output.
#[derive(Debug, Serialize)]
struct PayloadLine<'a> {
    tracker: &'a str,
    payload: &'a ResolvedPayload,
}

/// A tracker skipped because the release is not permitted there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoppedTracker {
    pub tracker: String,
    pub attribute: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub built: Vec<String>,
    pub stopped: Vec<StoppedTracker>,
}

/// Build the payload of every configured tracker, writing one JSON line per
/// built payload to `out`.
pub fn run_batch<W: Write>(
    config: &Config,
    attributes: &AttributeStore,
    out: &mut W,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for acronym in &config.trackers {
        let schema = load_tracker_schema(&config.schemas.dir, acronym)
            .with_context(|| format!("Failed to load schema for tracker {}", acronym))?;

        match materialize(&schema, attributes, &config.upload) {
            Ok(payload) => {
                for (field, value) in payload.fields() {
                    debug!("{}: {} = {:?}", schema.acronym, field, value);
                }
                let line = PayloadLine {
                    tracker: &schema.acronym,
                    payload: &payload,
                };
                serde_json::to_writer(&mut *out, &line)
                    .with_context(|| format!("Failed to write payload for {}", schema.acronym))?;
                writeln!(out)?;
                info!("{}: payload ready", schema.acronym);
                summary.built.push(schema.acronym.clone());
            }
            Err(ResolutionError::Stop {
                tracker,
                attribute,
                reason,
            }) => {
                warn!(
                    "{}: not uploading, '{}' could not be resolved: {}",
                    tracker, attribute, reason
                );
                summary.stopped.push(StoppedTracker {
                    tracker,
                    attribute,
                    reason,
                });
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Aborting batch at tracker {}", acronym));
            }
        }
    }

    Ok(summary)
}
