//! The Tekton task schema produced by the pipeline builders.
//!
//! A `Task` is a pure value: metadata (name) plus a spec of declared
//! parameters, an ordered step sequence, and volumes. Once built it is
//! handed to the external registration system and never mutated. Execution
//! order of `spec.steps` is index order; position in the sequence is the
//! contract, there is no separate dependency graph at this layer.
//!
//! `Task::new` is the single fail-fast validation point: a task with
//! conflicting parameter declarations or a step referencing an undeclared
//! parameter cannot be constructed at all. A malformed definition would
//! otherwise only surface much later, opaquely, inside the execution
//! engine.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::param::NamedParam;
use crate::resources::{EnvVar, Volume, VolumeMount};
use crate::utils::validation;

/// One step of a task. Produced by the step factories in `steps.rs`;
/// opaque to the composition engine apart from `name` and `params`.
///
/// `params` lists the names of every task parameter the step's script
/// references. It is the composition-side contract only (Tekton steps do
/// not declare parameters), so it is skipped during serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStep {
    pub name: String,
    pub image: String,
    pub script: String,
    #[serde(skip)]
    pub params: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
}

/// Ordered task spec. `params` is a set ordered by first declaration,
/// unique by name; `steps` execute in index order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub params: Vec<NamedParam>,
    pub steps: Vec<TaskStep>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub metadata: Metadata,
    pub spec: TaskSpec,
}

impl Task {
    /// Assemble and validate a task definition.
    ///
    /// Validation performed here, in order:
    /// - the task name and every parameter name are well-formed
    ///   (Tekton identifier shape);
    /// - `params` is deduplicated by name, keeping the first occurrence;
    ///   two declarations of one name with diverging defaults are rejected;
    /// - step names are unique within the task;
    /// - every parameter referenced by any step is declared (by name) in
    ///   the deduplicated parameter list.
    pub fn new(
        name: &str,
        params: Vec<NamedParam>,
        steps: Vec<TaskStep>,
        volumes: Vec<Volume>,
    ) -> Result<Task> {
        validation::require_non_empty(name, "name", "Task name cannot be empty")?;

        let params = dedup_params(name, params)?;

        let mut step_names = HashSet::new();
        for step in &steps {
            if !step_names.insert(step.name.clone()) {
                return Err(Error::duplicate_step(name, &step.name));
            }
        }

        let declared: HashSet<&str> = params.iter().map(|p| p.name.as_str()).collect();
        for step in &steps {
            for param in &step.params {
                if !declared.contains(param.as_str()) {
                    return Err(Error::unknown_param(name, &step.name, param));
                }
            }
        }

        Ok(Task {
            metadata: Metadata {
                name: name.to_string(),
            },
            spec: TaskSpec {
                params,
                steps,
                volumes,
            },
        })
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Look up a declared parameter by name.
    pub fn param(&self, name: &str) -> Option<&NamedParam> {
        self.spec.params.iter().find(|p| p.name == name)
    }

    /// Step names in execution order.
    pub fn step_names(&self) -> Vec<&str> {
        self.spec.steps.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Deduplicate a builder-assembled parameter list by name.
///
/// The first occurrence wins (its description is kept). A second
/// declaration of the same name is only legal when its default agrees
/// with the first; anything else is a builder bug and fails the build.
fn dedup_params(task_name: &str, params: Vec<NamedParam>) -> Result<Vec<NamedParam>> {
    let name_shape = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_-]*$").expect("static regex");

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut deduped: Vec<NamedParam> = Vec::with_capacity(params.len());

    for param in params {
        match seen.get(&param.name) {
            None => {
                if !name_shape.is_match(&param.name) {
                    return Err(Error::invalid_param_name(task_name, &param.name));
                }
                seen.insert(param.name.clone(), deduped.len());
                deduped.push(param);
            }
            Some(&idx) => {
                let first = &deduped[idx];
                if first.default != param.default {
                    return Err(Error::duplicate_param(
                        task_name,
                        &param.name,
                        first.default.clone(),
                        param.default.clone(),
                    ));
                }
            }
        }
    }

    Ok(deduped)
}
