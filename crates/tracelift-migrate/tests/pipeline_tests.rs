use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashSet;

use tracelift_format::SchemaVersion;
use tracelift_migrate::{cleanup, MigrationOutcome, Migrator};
use tracelift_testkit::{
    document, identified_instance, latest_instance, legacy_instance, makeflow_legacy_instance,
    normalized_instance, renamed_instance,
};

#[test]
fn test_full_ladder_from_oldest_version() {
    let outcome = Migrator::new().migrate(document(legacy_instance())).unwrap();

    match outcome {
        MigrationOutcome::Migrated { document, from } => {
            assert_eq!(from, SchemaVersion::V1_0);
            assert_eq!(document.into_value(), latest_instance());
        }
        other => panic!("expected migration, got {other:?}"),
    }
}

#[test]
fn test_every_rung_converges_to_the_same_document() {
    let rungs = [
        (identified_instance(), SchemaVersion::V1_2),
        (renamed_instance(), SchemaVersion::V1_3),
        (normalized_instance(), SchemaVersion::V1_4),
    ];

    for (fixture, declared) in rungs {
        let outcome = Migrator::new().migrate(document(fixture)).unwrap();
        match outcome {
            MigrationOutcome::Migrated { document, from } => {
                assert_eq!(from, declared);
                assert_eq!(document.into_value(), latest_instance());
            }
            other => panic!("expected migration from {declared}, got {other:?}"),
        }
    }
}

#[test]
fn test_native_unit_tools_keep_byte_volumes() {
    let outcome = Migrator::new()
        .migrate(document(makeflow_legacy_instance()))
        .unwrap();

    let document = outcome.into_document();
    assert_eq!(document.version().unwrap(), SchemaVersion::V1_5);

    let exec = &document.workflow().unwrap()["execution"]["tasks"][0];
    assert_eq!(exec["readBytes"], json!(1_048_576));
    assert_eq!(exec["writtenBytes"], json!(2048));
}

#[test]
fn test_up_to_date_instance_passes_through_cleanup_unchanged() {
    let outcome = Migrator::new().migrate(document(latest_instance())).unwrap();

    match outcome {
        MigrationOutcome::UpToDate { document } => {
            assert_eq!(document.into_value(), latest_instance());
        }
        other => panic!("expected up-to-date, got {other:?}"),
    }
}

#[test]
fn test_unsupported_version_is_skipped_untouched() {
    let mut original = legacy_instance();
    original["schemaVersion"] = json!("0.9");

    let outcome = Migrator::new()
        .migrate(document(original.clone()))
        .unwrap();
    match outcome {
        MigrationOutcome::Skipped { document, version } => {
            assert_eq!(version, "0.9");
            assert_eq!(document.into_value(), original);
        }
        other => panic!("expected skip, got {other:?}"),
    }
}

fn generated_legacy(names: &[String]) -> Value {
    let jobs: Vec<Value> = names
        .iter()
        .map(|name| json!({"name": name, "runtime": 1.0, "parents": [], "files": []}))
        .collect();
    json!({
        "name": "generated",
        "schemaVersion": "1.0",
        "wms": {"name": "pegasus"},
        "workflow": {"makespan": 9.0, "jobs": jobs}
    })
}

fn mixed_state_instance(names: &[String]) -> Value {
    let tasks: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            json!({
                "id": format!("{name}_{index}"),
                "runtime": 1.5,
                "runtimeInSeconds": 1.5,
                "bytesRead": 10,
                "memory": 7,
                "memoryInBytes": 7000
            })
        })
        .collect();
    json!({
        "schemaVersion": "1.5",
        "wms": {"name": "pegasus"},
        "runtimeSystem": {"name": "pegasus"},
        "workflow": {
            "specification": {"tasks": [], "files": []},
            "execution": {"makespanInSeconds": 4.5, "tasks": tasks}
        }
    })
}

proptest! {
    // Duplicate names are deliberately likely: ids must stay unique anyway.
    #[test]
    fn prop_migrated_task_ids_are_unique(
        names in proptest::collection::vec("[a-z]{1,8}", 1..8)
    ) {
        let outcome = Migrator::new()
            .migrate(document(generated_legacy(&names)))
            .unwrap();
        let document = outcome.into_document();
        prop_assert_eq!(document.version().unwrap(), SchemaVersion::V1_5);

        let tasks = document.workflow().unwrap()["specification"]["tasks"]
            .as_array()
            .unwrap()
            .clone();
        let ids: HashSet<&str> = tasks.iter().map(|t| t["id"].as_str().unwrap()).collect();
        prop_assert_eq!(ids.len(), names.len());
    }

    #[test]
    fn prop_cleanup_is_idempotent(
        names in proptest::collection::vec("[a-z]{1,8}", 0..5)
    ) {
        let once = cleanup(document(mixed_state_instance(&names))).unwrap();
        let twice = cleanup(once.clone()).unwrap();
        prop_assert_eq!(once.into_value(), twice.into_value());
    }
}
