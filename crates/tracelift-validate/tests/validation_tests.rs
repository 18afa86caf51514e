use serde_json::json;

use tracelift_migrate::Migrator;
use tracelift_validate::{check_document, SchemaValidator, Violation};

use tracelift_testkit::{document, latest_instance, legacy_instance};

#[test]
fn test_latest_fixture_has_valid_references() {
    let report = check_document(&document(latest_instance())).unwrap();

    assert!(report.is_valid());
    assert_eq!(report.task_count(), 3);
    assert_eq!(report.machine_count(), 1);
}

#[test]
fn test_legacy_fixture_has_valid_references() {
    let report = check_document(&document(legacy_instance())).unwrap();

    assert!(report.is_valid());
    assert_eq!(report.task_count(), 3);
}

#[test]
fn test_migration_preserves_referential_closure() {
    let migrated = Migrator::new()
        .migrate(document(legacy_instance()))
        .unwrap()
        .into_document();

    let report = check_document(&migrated).unwrap();
    assert!(report.is_valid(), "violations: {:?}", report.violations());
}

#[test]
fn test_dangling_reference_survives_migration_for_the_validator() {
    let mut instance = legacy_instance();
    instance["workflow"]["jobs"][0]["parents"] = json!(["never_declared"]);

    let migrated = Migrator::new()
        .migrate(document(instance))
        .unwrap()
        .into_document();

    let report = check_document(&migrated).unwrap();
    assert_eq!(report.violations().len(), 1);
    assert!(matches!(
        &report.violations()[0],
        Violation::UnknownParent { parent, .. } if parent == "never_declared"
    ));
}

#[test]
fn test_schema_pass_distinguishes_split_documents() {
    let schema = json!({
        "$schema": "http://json-schema.org/draft-04/schema#",
        "type": "object",
        "required": ["name", "schemaVersion", "workflow"],
        "properties": {
            "schemaVersion": {"type": "string", "enum": ["1.5"]},
            "workflow": {
                "type": "object",
                "required": ["specification", "execution"]
            }
        }
    });
    let validator = SchemaValidator::compile(&schema).unwrap();

    assert!(validator.validate(&latest_instance()).is_valid());

    let report = validator.validate(&legacy_instance());
    assert!(!report.is_valid());
    let paths: Vec<&str> = report
        .violations()
        .iter()
        .map(|v| v.path.as_str())
        .collect();
    assert!(paths.contains(&"schemaVersion"));
    assert!(paths.contains(&"workflow"));
}
