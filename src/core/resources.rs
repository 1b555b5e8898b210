//! Execution-context descriptors passed through to every step.
//!
//! Environment variables, volumes, and volume mounts are supplied by the
//! caller and threaded unchanged into each step of a task, so that all
//! steps share one execution context (credentials, secret mounts, scratch
//! space). Builders may append fixed, pipeline-specific volumes on top of
//! the caller's list. Field names serialize camelCase to match the Tekton
//! schema.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub name: String,
    pub mount_path: String,
}

impl VolumeMount {
    pub fn new(name: impl Into<String>, mount_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mount_path: mount_path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostPathVolumeSource {
    pub path: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyDirVolumeSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_path: Option<HostPathVolumeSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_dir: Option<EmptyDirVolumeSource>,
}

impl Volume {
    /// A hostPath volume (e.g. the `/dev` passthrough the build pipelines
    /// need for loop devices).
    pub fn host_path(
        name: impl Into<String>,
        path: impl Into<String>,
        kind: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            host_path: Some(HostPathVolumeSource {
                path: path.into(),
                kind: kind.map(str::to_string),
            }),
            empty_dir: None,
        }
    }

    /// An in-memory emptyDir scratch volume.
    pub fn empty_dir_memory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host_path: None,
            empty_dir: Some(EmptyDirVolumeSource {
                medium: Some("Memory".to_string()),
            }),
        }
    }
}
