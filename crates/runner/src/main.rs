mod batch;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trackerforge_core::{
    encode_metrics, load_config, validate_config, AttributeStore, LogFormat,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    if let Err(e) = run() {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Determine config path
    let config_path = std::env::var("TRACKERFORGE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("trackerforge.toml"));

    // The log format lives in the config, so logging starts once it is read
    let loaded = load_config(&config_path);
    init_tracing(
        loaded
            .as_ref()
            .map(|config| config.log_format)
            .unwrap_or_default(),
    );

    info!("trackerforge {} starting", VERSION);
    info!("Loading configuration from {:?}", config_path);
    let config =
        loaded.with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    // Compute config hash for the run log
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    let config_hash_short = &config_hash[..16];

    info!("Configuration loaded successfully (hash {})", config_hash_short);
    info!("Schema directory: {:?}", config.schemas.dir);
    info!("Trackers: {}", config.trackers.join(", "));

    let attributes = load_attributes(&config.release.attributes)?;
    info!(
        "Loaded {} release attributes from {:?}",
        attributes.len(),
        config.release.attributes
    );
    for (name, value) in attributes.iter() {
        debug!("  {} = {}", name, value);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = batch::run_batch(&config, &attributes, &mut out)?;
    out.flush().context("Failed to flush payload output")?;

    info!(
        "Batch finished: {} payload(s) built, {} tracker(s) skipped",
        summary.built.len(),
        summary.stopped.len()
    );
    for stopped in &summary.stopped {
        info!(
            "  {} skipped on '{}': {}",
            stopped.tracker, stopped.attribute, stopped.reason
        );
    }
    debug!("Resolution counters:\n{}", encode_metrics());

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    // Payloads go to stdout, logs to stderr
    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr),
            )
            .init(),
    }
}

fn load_attributes(path: &Path) -> Result<AttributeStore> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read release attributes from {:?}", path))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse release attributes in {:?}", path))
}
