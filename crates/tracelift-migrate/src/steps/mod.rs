//! The version-to-version transforms
//!
//! One module per rung of the ladder, plus the shared task-list plumbing
//! every step leans on. All steps fail loudly on structure their source
//! version requires and leave optional fields optional.

mod identify;
mod rename;
mod split;
mod units;

pub use identify::TaskIdentification;
pub use rename::ContainerRename;
pub use split::SpecificationSplit;
pub use units::UnitNormalization;

pub(crate) use units::convert_byte_volumes;

use serde_json::{Map, Value};

use crate::error::{MigrateError, MigrateResult};

/// Fetch the task list under `workflow.{key}`, failing loudly when absent or
/// not a list.
pub(crate) fn task_list_mut<'a>(
    workflow: &'a mut Map<String, Value>,
    key: &str,
) -> MigrateResult<&'a mut Vec<Value>> {
    match workflow.get_mut(key) {
        Some(Value::Array(list)) => Ok(list),
        Some(_) => Err(MigrateError::unexpected_type(format!("workflow.{key}"))),
        None => Err(MigrateError::missing(format!("workflow.{key}"))),
    }
}

/// View one task entry as an object, failing loudly otherwise.
pub(crate) fn task_object_mut<'a>(
    entry: &'a mut Value,
    key: &str,
    index: usize,
) -> MigrateResult<&'a mut Map<String, Value>> {
    entry
        .as_object_mut()
        .ok_or_else(|| MigrateError::unexpected_type(format!("workflow.{key}[{index}]")))
}

/// Clone a task's name, failing loudly when absent or not a string.
pub(crate) fn task_name(
    task: &Map<String, Value>,
    key: &str,
    index: usize,
) -> MigrateResult<String> {
    task.get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| MigrateError::missing(format!("workflow.{key}[{index}].name")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn workflow(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn task_list_requires_array() {
        let mut w = workflow(json!({"jobs": "oops"}));
        assert!(matches!(
            task_list_mut(&mut w, "jobs"),
            Err(MigrateError::Document(_))
        ));

        let mut w = workflow(json!({}));
        let err = task_list_mut(&mut w, "jobs").unwrap_err();
        assert!(err.to_string().contains("workflow.jobs"));
    }

    #[test]
    fn task_name_requires_string() {
        let t = workflow(json!({"name": 4}));
        let err = task_name(&t, "tasks", 2).unwrap_err();
        assert!(err.to_string().contains("workflow.tasks[2].name"));

        let t = workflow(json!({"name": "ok"}));
        assert_eq!(task_name(&t, "tasks", 0).unwrap(), "ok");
    }
}
