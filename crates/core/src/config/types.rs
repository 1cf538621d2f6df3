use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::args::UploadArgs;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Tracker acronyms to build payloads for, in upload order
    pub trackers: Vec<String>,
    pub release: ReleaseConfig,
    #[serde(default)]
    pub schemas: SchemasConfig,
    #[serde(default)]
    pub upload: UploadArgs,
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Where tracker schema documents live
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchemasConfig {
    #[serde(default = "default_schema_dir")]
    pub dir: PathBuf,
}

impl Default for SchemasConfig {
    fn default() -> Self {
        Self {
            dir: default_schema_dir(),
        }
    }
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("trackers")
}

/// The release being uploaded
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReleaseConfig {
    /// JSON file holding the release's attribute snapshot
    pub attributes: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let toml = r#"
trackers = ["EXT"]

[release]
attributes = "release.json"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.schemas.dir, PathBuf::from("trackers"));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.upload.anon);
        assert!(config.upload.forced.is_empty());
    }

    #[test]
    fn test_upload_section() {
        let toml = r#"
trackers = ["EXT", "ALT"]
log_format = "json"

[release]
attributes = "/data/release.json"

[schemas]
dir = "/etc/trackerforge/trackers"

[upload]
anon = true
draft = true
signature = "uploaded with trackerforge"

[upload.forced]
edition = "Criterion"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.trackers, vec!["EXT".to_string(), "ALT".to_string()]);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.upload.anon);
        assert!(config.upload.draft);
        assert_eq!(
            config.upload.signature.as_deref(),
            Some("uploaded with trackerforge")
        );
        assert_eq!(config.upload.forced.get("edition").map(String::as_str), Some("Criterion"));
    }
}
