//! Semantic validation of cross-references
//!
//! Schema validation proves shape; this pass proves the references inside
//! the shape. Every machine reference must name a declared machine and every
//! parent reference must name a task in the same document. Violations are
//! collected rather than short-circuited, so one run reports every dangling
//! reference at once.
//!
//! The pass runs on any document, migrated or not: tasks are discovered
//! under `workflow.specification.tasks` with a fallback to the pre-split
//! `workflow.tasks` and `workflow.jobs` lists, where tasks may be identified
//! by `name` alone.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use tracelift_format::TraceDocument;

use crate::error::{ValidateError, ValidateResult};

/// One dangling reference inside a well-formed document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// Task references a machine missing from the declared machine lists
    #[error("machine '{machine}' referenced by task '{task}' is not declared in the list of machines")]
    UnknownMachine { task: String, machine: String },

    /// Task references a parent missing from the task list
    #[error("parent task '{parent}' referenced by task '{task}' is not declared in the list of workflow tasks")]
    UnknownParent { task: String, parent: String },
}

/// Result of one semantic pass over a document
#[derive(Debug, Default)]
pub struct SemanticReport {
    violations: Vec<Violation>,
    task_count: usize,
    machine_count: usize,
}

impl SemanticReport {
    /// Whether the document holds no dangling references
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Every collected violation, in document order
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Number of tasks discovered
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.task_count
    }

    /// Number of distinct machines declared
    #[must_use]
    pub fn machine_count(&self) -> usize {
        self.machine_count
    }
}

/// Check every cross-reference in the document.
///
/// Machine references are checked against the declared machine set even
/// when that set is empty or no machine list exists: a reference into an
/// empty set is still a dangling reference. Parent checks run against the
/// task list that defines the document's tasks.
///
/// # Errors
/// Returns error when the document has no workflow or no task list at all;
/// that is malformed input, not a violation.
pub fn check_document(doc: &TraceDocument) -> ValidateResult<SemanticReport> {
    let workflow = doc.workflow()?;

    let machines = declared_machines(workflow);
    let tasks = defining_tasks(workflow)?;
    let ids: HashSet<&str> = tasks.iter().filter_map(task_id).collect();

    let mut violations = Vec::new();
    for task in tasks {
        let label = task_label(task);
        if let Some(Value::Array(parents)) = task.get("parents") {
            for parent in parents {
                if let Some(reference) = parent.as_str() {
                    if !ids.contains(reference) {
                        violations.push(Violation::UnknownParent {
                            task: label.to_string(),
                            parent: reference.to_string(),
                        });
                    }
                }
            }
        }
    }

    for list in machine_checked_lists(workflow) {
        for task in list {
            check_machine_references(task, &machines, &mut violations);
        }
    }

    debug!(
        tasks = tasks.len(),
        machines = machines.len(),
        violations = violations.len(),
        "semantic check complete"
    );

    Ok(SemanticReport {
        violations,
        task_count: tasks.len(),
        machine_count: machines.len(),
    })
}

/// Gather declared machine node names from the workflow and execution
/// levels. A document without machine lists yields an empty set.
fn declared_machines(workflow: &Map<String, Value>) -> HashSet<&str> {
    let mut names = HashSet::new();
    collect_node_names(workflow.get("machines"), &mut names);
    if let Some(execution) = workflow.get("execution") {
        collect_node_names(execution.get("machines"), &mut names);
    }
    names
}

fn collect_node_names<'w>(list: Option<&'w Value>, names: &mut HashSet<&'w str>) {
    if let Some(Value::Array(entries)) = list {
        for entry in entries {
            if let Some(name) = entry.get("nodeName").and_then(Value::as_str) {
                names.insert(name);
            }
        }
    }
}

/// The task list that defines this document's task identities.
fn defining_tasks(workflow: &Map<String, Value>) -> ValidateResult<&Vec<Value>> {
    if let Some(specification) = workflow.get("specification") {
        if let Some(Value::Array(tasks)) = specification.get("tasks") {
            return Ok(tasks);
        }
    }
    for key in ["tasks", "jobs"] {
        if let Some(Value::Array(tasks)) = workflow.get(key) {
            return Ok(tasks);
        }
    }
    Err(ValidateError::missing("workflow.specification.tasks"))
}

/// Every task list whose entries may carry machine references.
fn machine_checked_lists(workflow: &Map<String, Value>) -> Vec<&Vec<Value>> {
    let mut lists = Vec::new();
    if let Some(specification) = workflow.get("specification") {
        if let Some(Value::Array(tasks)) = specification.get("tasks") {
            lists.push(tasks);
        }
    }
    for key in ["tasks", "jobs"] {
        if let Some(Value::Array(tasks)) = workflow.get(key) {
            lists.push(tasks);
        }
    }
    if let Some(execution) = workflow.get("execution") {
        if let Some(Value::Array(tasks)) = execution.get("tasks") {
            lists.push(tasks);
        }
    }
    lists
}

fn check_machine_references(
    task: &Value,
    machines: &HashSet<&str>,
    violations: &mut Vec<Violation>,
) {
    let label = task_label(task);
    if let Some(machine) = task.get("machine").and_then(Value::as_str) {
        if !machines.contains(machine) {
            violations.push(Violation::UnknownMachine {
                task: label.to_string(),
                machine: machine.to_string(),
            });
        }
    }
    if let Some(Value::Array(references)) = task.get("machines") {
        for entry in references {
            if let Some(machine) = entry.as_str() {
                if !machines.contains(machine) {
                    violations.push(Violation::UnknownMachine {
                        task: label.to_string(),
                        machine: machine.to_string(),
                    });
                }
            }
        }
    }
}

/// Explicit id, falling back to the name for pre-identification tasks.
fn task_id(task: &Value) -> Option<&str> {
    task.get("id")
        .and_then(Value::as_str)
        .or_else(|| task.get("name").and_then(Value::as_str))
}

fn task_label(task: &Value) -> &str {
    task_id(task).unwrap_or("<unnamed>")
}
