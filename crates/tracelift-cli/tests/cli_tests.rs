use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::{json, Value};
use tracelift_testkit::{latest_instance, legacy_instance, makeflow_legacy_instance};

fn tracelift() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tracelift"))
}

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_migrate_rewrites_file_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("trace.json");
    write_json(&file, &legacy_instance());

    let status = tracelift().arg("migrate").arg(&file).status().unwrap();

    assert!(status.success());
    assert_eq!(read_json(&file), latest_instance());
}

#[test]
fn test_migrate_walks_directories_recursively() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("runs").join("april");
    fs::create_dir_all(&nested).unwrap();

    let top = dir.path().join("a.json");
    let deep = nested.join("b.json");
    write_json(&top, &legacy_instance());
    write_json(&deep, &makeflow_legacy_instance());
    fs::write(dir.path().join("notes.txt"), "not a trace").unwrap();

    let status = tracelift().arg("migrate").arg(dir.path()).status().unwrap();

    assert!(status.success());
    assert_eq!(read_json(&top)["schemaVersion"], json!("1.5"));
    assert_eq!(read_json(&deep)["schemaVersion"], json!("1.5"));
    assert_eq!(
        fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
        "not a trace"
    );
}

#[test]
fn test_migrate_skips_unsupported_versions_without_failing() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("future.json");
    let mut instance = legacy_instance();
    instance["schemaVersion"] = json!("2.0");
    write_json(&file, &instance);

    let status = tracelift().arg("migrate").arg(&file).status().unwrap();

    assert!(status.success());
    // skipped files are never rewritten
    assert_eq!(read_json(&file), instance);
}

#[test]
fn test_migrate_continues_past_a_broken_file() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.json");
    let good = dir.path().join("good.json");
    fs::write(&broken, "{ this is not json").unwrap();
    write_json(&good, &legacy_instance());

    let status = tracelift().arg("migrate").arg(dir.path()).status().unwrap();

    // the batch fails overall but the good file still went through
    assert!(!status.success());
    assert_eq!(read_json(&good)["schemaVersion"], json!("1.5"));
}

fn minimal_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-04/schema#",
        "type": "object",
        "required": ["name", "schemaVersion", "workflow"],
        "properties": {
            "name": {"type": "string"},
            "schemaVersion": {"type": "string"}
        }
    })
}

#[test]
fn test_validate_passes_a_clean_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("trace.json");
    let schema = dir.path().join("schema.json");
    write_json(&file, &latest_instance());
    write_json(&schema, &minimal_schema());

    let status = tracelift()
        .arg("validate")
        .arg(&file)
        .arg("-s")
        .arg(&schema)
        .status()
        .unwrap();

    assert!(status.success());
}

#[test]
fn test_validate_fails_on_dangling_references() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("trace.json");
    let schema = dir.path().join("schema.json");

    let mut instance = latest_instance();
    instance["workflow"]["execution"]["tasks"][0]["machines"] = json!(["ghost-machine"]);
    write_json(&file, &instance);
    write_json(&schema, &minimal_schema());

    let status = tracelift()
        .arg("validate")
        .arg(&file)
        .arg("-s")
        .arg(&schema)
        .status()
        .unwrap();

    assert!(!status.success());
}

#[test]
fn test_validate_fails_on_schema_violations() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("trace.json");
    let schema = dir.path().join("schema.json");

    let mut instance = latest_instance();
    instance.as_object_mut().unwrap().remove("name");
    write_json(&file, &instance);
    write_json(&schema, &minimal_schema());

    let status = tracelift()
        .arg("validate")
        .arg(&file)
        .arg("-s")
        .arg(&schema)
        .status()
        .unwrap();

    assert!(!status.success());
}

#[test]
fn test_validate_reports_schema_violations_before_reference_checks() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("trace.json");
    let schema = dir.path().join("schema.json");

    // no workflow at all: the reference pass cannot even start
    write_json(&file, &json!({"schemaVersion": "1.5"}));
    write_json(&schema, &minimal_schema());

    let output = tracelift()
        .arg("validate")
        .arg(&file)
        .arg("-s")
        .arg(&schema)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("is a required property"),
        "schema diagnostics missing from stderr: {stderr}"
    );
}
