//! Prometheus metrics for the resolution engine.
//!
//! This module provides metrics for:
//! - Category matcher outcomes (per canonical attribute)
//! - Hybrid-type resolution outcomes
//! - Whole payload materializations

use once_cell::sync::Lazy;
use prometheus::{self, Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// Matcher Metrics
// =============================================================================

/// Category resolutions by canonical attribute and result.
pub static CATEGORY_RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "trackerforge_category_resolutions_total",
            "Total category/source/resolution lookups",
        ),
        &["attribute", "result"], // "resolved", "stop"
    )
    .unwrap()
});

/// Hybrid-type resolutions by result.
pub static HYBRID_RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "trackerforge_hybrid_resolutions_total",
            "Total hybrid-type resolutions",
        ),
        &["result"], // "resolved", "invalid_configuration", "fatal"
    )
    .unwrap()
});

// =============================================================================
// Materializer Metrics
// =============================================================================

/// Payload materializations by result.
pub static MATERIALIZATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "trackerforge_materializations_total",
            "Total tracker payload materializations",
        ),
        &["tracker", "result"], // "built", "stop", "fatal"
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(CATEGORY_RESOLUTIONS.clone()))
        .unwrap();
    registry
        .register(Box::new(HYBRID_RESOLUTIONS.clone()))
        .unwrap();
    registry
        .register(Box::new(MATERIALIZATIONS.clone()))
        .unwrap();
}

/// Encode all registered metrics in the Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
