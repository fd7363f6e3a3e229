//! End-to-end conversion: a minimal project archive in, a linked Markdown
//! vault out.

use aeon2md::{CliArgs, ConvertConfig, run};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn write_project(path: &Path, timeline: &serde_json::Value) {
    let file = fs::File::create(path).unwrap();
    let mut archive = zip::ZipWriter::new(file);
    archive
        .start_file("timeline.json", zip::write::FileOptions::default())
        .unwrap();
    archive.write_all(timeline.to_string().as_bytes()).unwrap();
    archive.finish().unwrap();
}

fn minimal_timeline() -> serde_json::Value {
    json!({
        "template": {
            "types": [
                {"guid": "t1", "name": "Character", "roles": [
                    {"guid": "r1", "name": "Protagonist"}
                ]}
            ],
            "properties": [],
            "rangeProperties": [
                {"guid": "rp1", "type": "date",
                 "calendar": {"eras": [{"name": "AD"}]}}
            ]
        },
        "entities": [
            {"guid": "e1", "name": "Alice", "entityType": "t1",
             "notes": "Protagonist of the piece."}
        ],
        "events": [{
            "guid": "ev1",
            "title": "Meeting",
            "rangeValues": [
                {"rangeProperty": "rp1", "position": {"timestamp": 0}}
            ],
            "relationships": [{"role": "r1", "entity": "e1"}],
            "values": [],
            "tags": []
        }]
    })
}

fn config_for(input: PathBuf) -> ConvertConfig {
    ConvertConfig::from_args(CliArgs {
        config: None,
        input,
        output: None,
        extension: None,
    })
    .unwrap()
}

#[test]
fn test_minimal_project_produces_linked_vault() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("novel.aeon");
    write_project(&input, &minimal_timeline());

    let config = config_for(input);
    run(&config).unwrap();

    let vault = dir.path().join("novel");
    let index = fs::read_to_string(vault.join("__index.md")).unwrap();
    assert!(index.contains("[[__events]]"));
    assert!(index.contains("[[_Character]]"));

    let events = fs::read_to_string(vault.join("__events.md")).unwrap();
    assert!(events.contains("[[Meeting]]"));

    let characters = fs::read_to_string(vault.join("_Character.md")).unwrap();
    assert!(characters.contains("[[Alice]]"));

    let alice = fs::read_to_string(vault.join("Alice.md")).unwrap();
    assert!(alice.contains("Protagonist of the piece."));

    let meeting = fs::read_to_string(vault.join("Meeting.md")).unwrap();
    assert!(meeting.lines().any(|line| line == "Protagonist: [[Alice]]"));
    assert!(meeting.contains("0001-01-01"));
}

#[test]
fn test_rerun_preserves_previous_documents_as_backups() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("novel.aeon");
    write_project(&input, &minimal_timeline());

    let config = config_for(input);
    let vault = dir.path().join("novel");
    fs::create_dir_all(&vault).unwrap();
    fs::write(vault.join("Alice.md"), "old").unwrap();

    run(&config).unwrap();

    assert_eq!(
        fs::read_to_string(vault.join("Alice.md.bak")).unwrap(),
        "old"
    );
    assert_ne!(fs::read_to_string(vault.join("Alice.md")).unwrap(), "old");
}

#[test]
fn test_non_archive_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("novel.aeon");
    fs::write(&input, "not a zip").unwrap();

    let config = config_for(input);
    assert!(run(&config).is_err());
}

#[test]
fn test_custom_extension_is_honored() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("novel.aeon");
    write_project(&input, &minimal_timeline());

    let config = ConvertConfig::from_args(CliArgs {
        config: None,
        input,
        output: None,
        extension: Some("txt".to_string()),
    })
    .unwrap();
    run(&config).unwrap();

    assert!(dir.path().join("novel").join("Alice.txt").exists());
}
