//! Cross-pipeline composition properties.
//!
//! Every builder must hand back a self-contained, internally consistent
//! task: unique parameter declarations, fully covered step references,
//! deterministic output. These hold for the whole pipeline set, not just
//! the individual builders exercised by the unit tests.

use std::collections::HashMap;

use glci::resources::{EnvVar, VolumeMount};
use glci::task::Task;
use glci::tasks;

fn pipeline_set() -> Vec<Task> {
    tasks::all_tasks(&[], &[], &[]).expect("pipeline set composes")
}

#[test]
fn no_task_declares_conflicting_defaults() {
    for task in pipeline_set() {
        let mut defaults: HashMap<&str, &Option<String>> = HashMap::new();
        for param in &task.spec.params {
            if let Some(previous) = defaults.insert(&param.name, &param.default) {
                panic!(
                    "task '{}' declares '{}' twice ({:?} vs {:?})",
                    task.name(),
                    param.name,
                    previous,
                    param.default
                );
            }
        }
    }
}

#[test]
fn every_step_reference_is_declared() {
    for task in pipeline_set() {
        for step in &task.spec.steps {
            for param in &step.params {
                assert!(
                    task.param(param).is_some(),
                    "task '{}' step '{}' references undeclared '{}'",
                    task.name(),
                    step.name,
                    param
                );
            }
        }
    }
}

#[test]
fn composition_is_deterministic() {
    let env = vec![EnvVar::new("SECRETS_SERVER_ENDPOINT", "http://secrets")];
    let mounts = vec![VolumeMount::new("secrets", "/secrets")];

    let first = tasks::all_tasks(&env, &[], &mounts).unwrap();
    let second = tasks::all_tasks(&env, &[], &mounts).unwrap();
    assert_eq!(first, second);
}

#[test]
fn execution_context_reaches_every_step_of_every_task() {
    let env = vec![EnvVar::new("SECRETS_SERVER_CACHE", "/secrets/config.json")];
    let mounts = vec![VolumeMount::new("secrets", "/secrets")];

    for task in tasks::all_tasks(&env, &[], &mounts).unwrap() {
        for step in &task.spec.steps {
            assert_eq!(step.env, env, "env vars missing in '{}'", step.name);
            assert_eq!(
                step.volume_mounts, mounts,
                "mounts missing in '{}'",
                step.name
            );
        }
    }
}

#[test]
fn task_names_are_unique_and_documented() {
    let names: Vec<String> = pipeline_set()
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "build-gardenlinux-task",
            "integration-test-task",
            "promote-gardenlinux-task",
            "build-packages",
            "build-kernel-packages",
            "build-baseimage",
            "notify-task",
        ]
    );
}

#[test]
fn rendered_manifest_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let set = pipeline_set();
    let build = set
        .iter()
        .find(|t| t.name() == "build-gardenlinux-task")
        .unwrap();

    let rendered = glci::render::write_task(build, dir.path()).unwrap();
    let raw = std::fs::read_to_string(&rendered.path).unwrap();
    let manifest: serde_yml::Value = serde_yml::from_str(&raw).unwrap();

    assert_eq!(manifest["apiVersion"], "tekton.dev/v1beta1");
    assert_eq!(manifest["kind"], "Task");
    assert_eq!(manifest["metadata"]["name"], "build-gardenlinux-task");
    assert_eq!(manifest["spec"]["steps"][0]["name"], "clone");

    let params = manifest["spec"]["params"].as_sequence().unwrap();
    let architecture = params
        .iter()
        .find(|p| p["name"] == "architecture")
        .expect("architecture param rendered");
    assert_eq!(architecture["default"], "amd64");

    // The step-level param contract stays composition-side.
    assert!(manifest["spec"]["steps"][0].get("params").is_none());
}
