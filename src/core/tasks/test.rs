//! The integration test pipeline task.

use crate::error::Result;
use crate::param::NamedParam;
use crate::resources::{EnvVar, Volume, VolumeMount};
use crate::steps;
use crate::task::Task;

use super::{build_and_test_params, scratch_volumes, REPO_DIR};

/// Assemble `integration-test-task`: clone, pre-check, test run, test
/// result upload.
///
/// The pre-check and test steps bind a fresh, non-defaulted
/// `publishing_actions` instance instead of the shared defaulted one,
/// since the shared default set is not applicable to test runs. The task's
/// declared parameter list still carries the shared instance; both
/// resolve to the same parameter name at execution time.
pub fn test_task(
    env_vars: &[EnvVar],
    volumes: &[Volume],
    volume_mounts: &[VolumeMount],
) -> Result<Task> {
    let p = build_and_test_params();
    let repo_dir = REPO_DIR.clone();

    let publishing_actions = NamedParam::new("publishing_actions");

    let pytest_cfg = NamedParam::with_default("pytest_cfg", "default")
        .describe("configuration name of testsuite in file test_cfg.yaml");

    let clone_step = steps::clone_step(
        "clone",
        &p.committish,
        &p.giturl,
        &repo_dir,
        env_vars,
        volume_mounts,
    );

    let pre_check_tests_step = steps::pre_check_tests_step(
        &p.architecture,
        &p.cicd_cfg_name,
        &p.committish,
        &p.gardenlinux_epoch,
        &p.modifiers,
        &p.platform,
        &publishing_actions,
        &repo_dir,
        &p.version,
        env_vars,
        volume_mounts,
    );

    let test_step = steps::test_step(
        &p.architecture,
        &p.cicd_cfg_name,
        &p.committish,
        &p.gardenlinux_epoch,
        &p.modifiers,
        &p.platform,
        &publishing_actions,
        &pytest_cfg,
        &repo_dir,
        &p.snapshot_timestamp,
        &p.suite,
        &p.version,
        env_vars,
        volume_mounts,
    );

    let upload_test_results_step = steps::upload_test_results_step(
        &p.architecture,
        &p.cicd_cfg_name,
        &p.committish,
        &p.gardenlinux_epoch,
        &p.modifiers,
        &p.platform,
        &repo_dir,
        &p.version,
        env_vars,
        volume_mounts,
    );

    let mut task_volumes = volumes.to_vec();
    task_volumes.extend(scratch_volumes());

    Task::new(
        "integration-test-task",
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
            pytest_cfg,
        ],
        vec![
            clone_step,
            pre_check_tests_step,
            test_step,
            upload_test_results_step,
        ],
        task_volumes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_has_documented_name_and_step_order() {
        let task = test_task(&[], &[], &[]).unwrap();
        assert_eq!(task.name(), "integration-test-task");
        assert_eq!(
            task.step_names(),
            vec!["clone", "pre-check-tests", "test", "upload-test-results"]
        );
    }

    #[test]
    fn declared_publishing_actions_keeps_the_shared_default() {
        // The steps bind a fresh undefaulted instance, but the declared
        // parameter stays the shared defaulted one.
        let task = test_task(&[], &[], &[]).unwrap();
        assert_eq!(
            task.param("publishing_actions").unwrap().default.as_deref(),
            Some("manifests")
        );
    }

    #[test]
    fn pytest_cfg_is_declared_with_default() {
        let task = test_task(&[], &[], &[]).unwrap();
        assert_eq!(
            task.param("pytest_cfg").unwrap().default.as_deref(),
            Some("default")
        );
    }

    #[test]
    fn test_task_appends_dev_and_scratch_volumes() {
        let task = test_task(&[], &[], &[]).unwrap();
        let names: Vec<&str> = task.spec.volumes.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["dev", "build"]);
    }
}
