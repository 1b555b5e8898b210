//! Rendering composed tasks as Tekton YAML manifests.
//!
//! Composition ends at an in-memory `Task`; this module is the hand-off
//! surface toward the external registration system: it wraps a task in
//! the Tekton manifest envelope (apiVersion/kind) and writes one
//! `<task-name>.yaml` per task.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::task::Task;

pub const TEKTON_API_VERSION: &str = "tekton.dev/v1beta1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskManifest<'a> {
    api_version: &'a str,
    kind: &'a str,
    #[serde(flatten)]
    task: &'a Task,
}

/// Serialize one task to its Tekton manifest.
pub fn task_to_yaml(task: &Task) -> Result<String> {
    let manifest = TaskManifest {
        api_version: TEKTON_API_VERSION,
        kind: "Task",
        task,
    };

    serde_yml::to_string(&manifest).map_err(|e| {
        Error::internal_yaml(
            e.to_string(),
            Some(format!("serialize task '{}'", task.name())),
        )
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedTask {
    pub name: String,
    pub path: String,
}

/// Write `<out_dir>/<task-name>.yaml`, creating the directory if needed.
pub fn write_task(task: &Task, out_dir: &Path) -> Result<RenderedTask> {
    fs::create_dir_all(out_dir).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("create {}", out_dir.display())))
    })?;

    let path: PathBuf = out_dir.join(format!("{}.yaml", task.name()));
    let yaml = task_to_yaml(task)?;

    fs::write(&path, yaml).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("write {}", path.display())))
    })?;

    Ok(RenderedTask {
        name: task.name().to_string(),
        path: path.display().to_string(),
    })
}
