pub mod args;
pub mod attributes;
pub mod config;
pub mod metrics;
pub mod payload;
pub mod resolver;
pub mod schema;
pub mod testing;

pub use args::{UploadArgs, UploadFlag};
pub use attributes::{AttributeStore, AttributeStoreBuilder};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, LogFormat,
    ReleaseConfig, SchemasConfig,
};
pub use metrics::encode_metrics;
pub use payload::{
    materialize, materialize_with_report, FileKind, FileRef, MaterializeReport, Materialized,
    PayloadValue, ResolvedPayload, SkippedField,
};
pub use resolver::{
    resolve_category, resolve_hybrid, resolve_type, CategoryTarget, HybridOutcome,
    ResolutionError, HYBRID_MAPPING_INVALID_CONFIGURATION,
};
pub use schema::{
    load_schema, load_schema_from_str, load_tracker_schema, schema_path, DataSource, FieldSpec,
    Priority, SchemaError, TrackerSchema, ValueTypeTag,
};
