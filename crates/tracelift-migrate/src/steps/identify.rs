//! Task identification (1.0/1.1 → 1.2)
//!
//! Early traces carried task identity only inside the task name. This step
//! derives an explicit `id` and `category` per task and restructures the
//! free-form argument list into a `command` record.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use tracelift_format::naming::{category_of, split_marked_name, synthesized_id, NAME_DELIMITER};
use tracelift_format::{SchemaVersion, TraceDocument};

use crate::error::MigrateResult;
use crate::step::MigrationStep;
use crate::steps::{task_list_mut, task_name, task_object_mut};

/// Derives task ids, categories and command records (1.0/1.1 → 1.2).
///
/// # Characteristics
/// - Names with an explicit `_ID` marker keep their name; id and category
///   are read back out of it
/// - All other tasks draw a synthesized id from a document-scoped counter
///   and are renamed `{name}_{id}`
/// - Parent lists naming renamed tasks are rewritten only after every task
///   has been visited, since a parent may be declared after its child
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskIdentification;

impl TaskIdentification {
    /// Create the step
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MigrationStep for TaskIdentification {
    fn source_versions(&self) -> &'static [SchemaVersion] {
        &[SchemaVersion::V1_0, SchemaVersion::V1_1]
    }

    fn target(&self) -> SchemaVersion {
        SchemaVersion::V1_2
    }

    fn name(&self) -> &'static str {
        "TaskIdentification"
    }

    fn apply(&self, mut doc: TraceDocument) -> MigrateResult<TraceDocument> {
        doc.set_version(self.target());

        let workflow = doc.workflow_mut()?;
        let tasks = task_list_mut(workflow, "jobs")?;

        let mut counter: u64 = 0;
        let mut renames: HashMap<String, String> = HashMap::new();

        for (index, entry) in tasks.iter_mut().enumerate() {
            let task = task_object_mut(entry, "jobs", index)?;
            let name = task_name(task, "jobs", index)?;

            let (id, category) = match split_marked_name(&name) {
                Some((category, id)) => (id, category),
                None => {
                    let category = category_of(&name).to_string();
                    counter += 1;
                    let id = synthesized_id(counter);
                    let renamed = format!("{name}{NAME_DELIMITER}{id}");
                    task.insert("name".to_string(), Value::String(renamed.clone()));
                    renames.insert(name, renamed);
                    (id, category)
                }
            };

            let arguments = task
                .remove("arguments")
                .unwrap_or_else(|| Value::Array(Vec::new()));
            task.insert("id".to_string(), Value::String(id));
            task.insert("category".to_string(), Value::String(category.clone()));

            let mut command = Map::new();
            command.insert("program".to_string(), Value::String(category));
            command.insert("arguments".to_string(), arguments);
            task.insert("command".to_string(), Value::Object(command));
        }

        // Parents may name tasks declared later in the list, so references
        // can only be rewritten once the whole list has been renamed.
        if !renames.is_empty() {
            for entry in tasks.iter_mut() {
                let parents = entry
                    .as_object_mut()
                    .and_then(|task| task.get_mut("parents"))
                    .and_then(Value::as_array_mut);
                let Some(parents) = parents else { continue };
                for parent in parents {
                    if let Value::String(reference) = parent {
                        if let Some(renamed) = renames.get(reference.as_str()) {
                            *reference = renamed.clone();
                        }
                    }
                }
            }
        }

        debug!(synthesized = counter, "task identification complete");
        Ok(doc)
    }
}
