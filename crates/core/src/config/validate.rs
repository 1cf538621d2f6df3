use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one tracker is configured
/// - No tracker acronym is empty or listed twice (case-insensitive)
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.trackers.is_empty() {
        return Err(ConfigError::ValidationError(
            "trackers cannot be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for acronym in &config.trackers {
        let acronym = acronym.trim();
        if acronym.is_empty() {
            return Err(ConfigError::ValidationError(
                "tracker acronym cannot be empty".to_string(),
            ));
        }
        if !seen.insert(acronym.to_uppercase()) {
            return Err(ConfigError::ValidationError(format!(
                "tracker '{}' is listed more than once",
                acronym
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::UploadArgs;
    use crate::config::{LogFormat, ReleaseConfig, SchemasConfig};
    use std::path::PathBuf;

    fn config_with(trackers: &[&str]) -> Config {
        Config {
            trackers: trackers.iter().map(|s| s.to_string()).collect(),
            release: ReleaseConfig {
                attributes: PathBuf::from("release.json"),
            },
            schemas: SchemasConfig::default(),
            upload: UploadArgs::default(),
            log_format: LogFormat::Pretty,
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&config_with(&["EXT", "ALT"])).is_ok());
    }

    #[test]
    fn test_validate_no_trackers_fails() {
        let result = validate_config(&config_with(&[]));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_blank_acronym_fails() {
        let result = validate_config(&config_with(&["EXT", "  "]));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_duplicate_acronym_fails() {
        let err = validate_config(&config_with(&["EXT", "ext"])).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }
}
