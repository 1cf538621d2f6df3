use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const SCHEMA: &str = r#"{
    "name": "Example",
    "acronym": "EXT",
    "required": { "name": "string", "category_id": "string", "type_id": "string", "resolution_id": "string" },
    "optional": { "imdb": "url", "anonymous": "string" },
    "translation": {
        "title": "name",
        "type": "type_id",
        "source": "category_id",
        "resolution": "resolution_id",
        "imdb": "imdb",
        "anon": "anonymous"
    },
    "categories": {
        "type_id": { "1": { "movie": 2 }, "2": { "episode": 2, "season": 2 } },
        "category_id": {
            "remux": { "remux": 1 },
            "web": { "web": 2, "webrip": 2 },
            "other": {}
        },
        "resolution_id": { "1080p": { "1080p": 2 }, "2160p": { "2160p": 2 } }
    }
}"#;

/// Lay out a schema dir, a release file and a config; return the config path.
fn workspace(dir: &Path, trackers: &str, release: &str) -> std::path::PathBuf {
    let schemas = dir.join("trackers");
    fs::create_dir_all(&schemas).unwrap();
    fs::write(schemas.join("ext.json"), SCHEMA).unwrap();
    fs::write(dir.join("release.json"), release).unwrap();

    let config = dir.join("trackerforge.toml");
    fs::write(
        &config,
        format!(
            r#"
trackers = {}

[release]
attributes = "{}"

[schemas]
dir = "{}"
"#,
            trackers,
            dir.join("release.json").display(),
            schemas.display()
        ),
    )
    .unwrap();
    config
}

fn run(config: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_trackerforge"))
        .env("TRACKERFORGE_CONFIG", config)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .output()
        .expect("Failed to run trackerforge")
}

#[test]
fn test_prints_one_payload_line_per_tracker() {
    let dir = TempDir::new().unwrap();
    let config = workspace(
        dir.path(),
        r#"["EXT"]"#,
        r#"{ "title": "Dune", "type": "movie", "source_type": "bluray_remux", "screen_size": "2160p", "imdb": "tt1160419" }"#,
    );

    let output = run(&config);
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);

    let line: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(line["tracker"], "EXT");
    assert_eq!(line["payload"]["name"], "Dune");
    assert_eq!(line["payload"]["type_id"], "1");
    assert_eq!(line["payload"]["category_id"], "remux");
    assert_eq!(line["payload"]["resolution_id"], "2160p");
    assert_eq!(line["payload"]["imdb"], "https://www.imdb.com/title/tt1160419");
    assert_eq!(line["payload"]["anonymous"], "0");
}

#[test]
fn test_stopped_tracker_prints_nothing_and_succeeds() {
    let dir = TempDir::new().unwrap();
    let config = workspace(
        dir.path(),
        r#"["EXT"]"#,
        r#"{ "title": "Dune", "type": "documentary", "source_type": "web", "screen_size": "1080p" }"#,
    );

    let output = run(&config);
    assert!(output.status.success(), "{:?}", output);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_missing_config_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir.path().join("missing.toml"));
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_invalid_config_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let config = workspace(dir.path(), "[]", "{}");

    let output = run(&config);
    assert_eq!(output.status.code(), Some(1));
}
