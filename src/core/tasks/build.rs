//! The Garden Linux image build pipeline task.

use crate::error::Result;
use crate::resources::{EnvVar, Volume, VolumeMount};
use crate::steps;
use crate::task::Task;

use super::{build_and_test_params, scratch_volumes, REPO_DIR};

/// Assemble `build-gardenlinux-task`: clone, pre-build, image build,
/// result upload.
pub fn build_task(
    env_vars: &[EnvVar],
    volumes: &[Volume],
    volume_mounts: &[VolumeMount],
) -> Result<Task> {
    let p = build_and_test_params();
    let repo_dir = REPO_DIR.clone();

    let clone_step = steps::clone_step(
        "clone",
        &p.committish,
        &p.giturl,
        &repo_dir,
        env_vars,
        volume_mounts,
    );

    let pre_build_step = steps::pre_build_step(
        &p.architecture,
        &p.cicd_cfg_name,
        &p.committish,
        &p.gardenlinux_epoch,
        &p.modifiers,
        &p.platform,
        &p.publishing_actions,
        &repo_dir,
        &p.version,
        env_vars,
        volume_mounts,
    );

    let build_image_step = steps::build_image_step(
        &p.build_image,
        &p.architecture,
        &p.suite,
        &p.gardenlinux_epoch,
        &p.snapshot_timestamp,
        &p.platform,
        &p.modifiers,
        &p.committish,
        &p.version,
        &repo_dir,
        env_vars,
        volume_mounts,
    );

    let upload_step = steps::upload_results_step(
        &p.architecture,
        &p.cicd_cfg_name,
        &p.committish,
        &p.gardenlinux_epoch,
        &p.modifiers,
        &p.outfile,
        &p.platform,
        &p.publishing_actions,
        &repo_dir,
        &p.version,
        env_vars,
        volume_mounts,
    );

    let mut task_volumes = volumes.to_vec();
    task_volumes.extend(scratch_volumes());

    Task::new(
        "build-gardenlinux-task",
        vec![
            p.architecture,
            p.build_image,
            p.cicd_cfg_name,
            p.committish,
            p.flavourset,
            p.giturl,
            p.gardenlinux_epoch,
            p.modifiers,
            p.outfile,
            p.platform,
            p.promote_target,
            p.publishing_actions,
            repo_dir,
            p.snapshot_timestamp,
            p.suite,
            p.version,
        ],
        vec![clone_step, pre_build_step, build_image_step, upload_step],
        task_volumes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_task_has_documented_name_and_step_order() {
        let task = build_task(&[], &[], &[]).unwrap();
        assert_eq!(task.name(), "build-gardenlinux-task");
        assert_eq!(
            task.step_names(),
            vec!["clone", "pre-build", "build-image", "upload"]
        );
    }

    #[test]
    fn build_task_carries_documented_defaults() {
        let task = build_task(&[], &[], &[]).unwrap();
        assert_eq!(
            task.param("architecture").unwrap().default.as_deref(),
            Some("amd64")
        );
        assert_eq!(
            task.param("platform").unwrap().default.as_deref(),
            Some("bullseye")
        );
        assert_eq!(
            task.param("suite").unwrap().default.as_deref(),
            Some("bullseye")
        );
        assert!(task.param("version").unwrap().description.is_some());
    }

    #[test]
    fn build_task_appends_dev_and_scratch_volumes() {
        let caller = vec![Volume::empty_dir_memory("cache")];
        let task = build_task(&[], &caller, &[]).unwrap();
        let names: Vec<&str> = task.spec.volumes.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["cache", "dev", "build"]);
    }

    #[test]
    fn build_task_is_pure() {
        let env = vec![EnvVar::new("SECRETS_SERVER_CACHE", "/secrets/config.json")];
        let mounts = vec![VolumeMount::new("secrets", "/secrets")];
        let a = build_task(&env, &[], &mounts).unwrap();
        let b = build_task(&env, &[], &mounts).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn build_task_env_vars_reach_every_step() {
        let env = vec![EnvVar::new("HOME", "/workspace")];
        let task = build_task(&env, &[], &[]).unwrap();
        assert!(task.spec.steps.iter().all(|s| s.env == env));
    }
}
