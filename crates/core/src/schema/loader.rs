use std::path::{Path, PathBuf};

use super::document::SchemaDocument;
use super::{validate_schema, SchemaError, TrackerSchema};

/// Load and validate a tracker schema from a JSON file.
///
/// The file stem doubles as the acronym when the document has none.
pub fn load_schema(path: &Path) -> Result<TrackerSchema, SchemaError> {
    if !path.exists() {
        return Err(SchemaError::FileNotFound(path.display().to_string()));
    }

    let contents = std::fs::read_to_string(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    load_schema_from_str(&contents, &stem)
}

/// Load and validate a tracker schema from a JSON string (useful for testing)
pub fn load_schema_from_str(json: &str, acronym: &str) -> Result<TrackerSchema, SchemaError> {
    let document: SchemaDocument =
        serde_json::from_str(json).map_err(|e| SchemaError::ParseError(e.to_string()))?;
    let schema = document.into_schema(acronym)?;
    validate_schema(&schema)?;
    Ok(schema)
}

/// Path of a tracker's schema inside a schema directory: `<dir>/<acronym>.json`,
/// acronym lower-cased.
pub fn schema_path(dir: &Path, acronym: &str) -> PathBuf {
    dir.join(format!("{}.json", acronym.to_lowercase()))
}

/// Load the schema of one tracker from a schema directory.
pub fn load_tracker_schema(dir: &Path, acronym: &str) -> Result<TrackerSchema, SchemaError> {
    let mut schema = load_schema(&schema_path(dir, acronym))?;
    if schema.acronym.is_empty() {
        schema.acronym = acronym.to_uppercase();
    }
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"{
        "name": "Example Tracker",
        "required": { "name": "string" },
        "translation": { "torrent_title": "name" }
    }"#;

    #[test]
    fn test_load_schema_file_not_found() {
        let result = load_schema(Path::new("/nonexistent/ext.json"));
        assert!(matches!(result, Err(SchemaError::FileNotFound(_))));
    }

    #[test]
    fn test_load_schema_from_str_invalid_json() {
        let result = load_schema_from_str("{ not json", "ext");
        assert!(matches!(result, Err(SchemaError::ParseError(_))));
    }

    #[test]
    fn test_load_tracker_schema_from_dir() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join("ext.json")).unwrap();
        write!(file, "{}", MINIMAL).unwrap();

        let schema = load_tracker_schema(dir.path(), "EXT").unwrap();
        assert_eq!(schema.acronym, "EXT");
        assert_eq!(schema.name, "Example Tracker");
        assert_eq!(schema.translated_field("torrent_title"), Some("name"));
    }

    #[test]
    fn test_schema_path_lowercases_acronym() {
        assert_eq!(
            schema_path(Path::new("trackers"), "BHD"),
            PathBuf::from("trackers/bhd.json")
        );
    }
}
