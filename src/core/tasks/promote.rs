//! The promotion / release pipeline task.

use crate::error::Result;
use crate::param::NamedParam;
use crate::resources::{EnvVar, Volume, VolumeMount};
use crate::steps;
use crate::task::Task;

use super::{build_and_test_params, GIT_URL, REPO_DIR};

/// Pipeline-scoped parameters of the promote task. Supplied by the
/// pipeline wiring; `Default` builds the conventional instances, sharing
/// values with the build/test parameter pool where the names overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoteParams {
    pub branch: NamedParam,
    pub cicd_cfg_name: NamedParam,
    pub committish: NamedParam,
    pub flavourset: NamedParam,
    pub gardenlinux_epoch: NamedParam,
    pub publishing_actions: NamedParam,
    pub snapshot_timestamp: NamedParam,
    pub version: NamedParam,
    pub ctx_repository_config_name: NamedParam,
    pub snapshot_ctx_repository_config_name: NamedParam,
}

impl Default for PromoteParams {
    fn default() -> Self {
        let p = build_and_test_params();
        Self {
            branch: NamedParam::new("branch").describe("the branch to promote"),
            cicd_cfg_name: p.cicd_cfg_name,
            committish: p.committish,
            flavourset: p.flavourset,
            gardenlinux_epoch: p.gardenlinux_epoch,
            publishing_actions: p.publishing_actions,
            snapshot_timestamp: p.snapshot_timestamp,
            version: p.version,
            ctx_repository_config_name: NamedParam::new("ctx_repository_config_name")
                .describe("config name of the component-descriptor context repository"),
            snapshot_ctx_repository_config_name: NamedParam::new(
                "snapshot_ctx_repository_config_name",
            )
            .describe("config name of the snapshot component-descriptor context repository"),
        }
    }
}

/// Assemble `promote-gardenlinux-task`: clone, component-descriptor
/// creation, promotion, release.
///
/// `snapshot_timestamp` is declared without any step binding it: the
/// parameter list is a superset of what the steps reference, and the
/// pipeline wiring feeds the value through to downstream tasks.
pub fn promote_task(
    params: &PromoteParams,
    env_vars: &[EnvVar],
    volumes: &[Volume],
    volume_mounts: &[VolumeMount],
) -> Result<Task> {
    let giturl = GIT_URL.clone();
    let repo_dir = REPO_DIR.clone();

    let clone_step = steps::clone_step(
        "clone",
        &params.committish,
        &giturl,
        &repo_dir,
        env_vars,
        volume_mounts,
    );

    let build_cd_step = steps::create_component_descriptor_step(
        &params.branch,
        &params.cicd_cfg_name,
        &params.committish,
        &params.ctx_repository_config_name,
        &params.gardenlinux_epoch,
        &params.publishing_actions,
        &repo_dir,
        &params.snapshot_ctx_repository_config_name,
        &params.version,
        env_vars,
        volume_mounts,
    );

    let promote_step = steps::promote_step(
        &params.cicd_cfg_name,
        &params.committish,
        &params.flavourset,
        &params.gardenlinux_epoch,
        &params.publishing_actions,
        &repo_dir,
        &params.version,
        env_vars,
        volume_mounts,
    );

    let release_step = steps::release_step(
        &params.committish,
        &params.gardenlinux_epoch,
        &giturl,
        &params.publishing_actions,
        &repo_dir,
        env_vars,
        volume_mounts,
    );

    Task::new(
        "promote-gardenlinux-task",
        vec![
            params.branch.clone(),
            params.cicd_cfg_name.clone(),
            params.ctx_repository_config_name.clone(),
            params.snapshot_ctx_repository_config_name.clone(),
            params.committish.clone(),
            params.flavourset.clone(),
            params.gardenlinux_epoch.clone(),
            giturl,
            params.publishing_actions.clone(),
            repo_dir,
            params.snapshot_timestamp.clone(),
            params.version.clone(),
        ],
        vec![clone_step, build_cd_step, promote_step, release_step],
        volumes.to_vec(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promote_task_has_documented_name_and_step_order() {
        let task = promote_task(&PromoteParams::default(), &[], &[], &[]).unwrap();
        assert_eq!(task.name(), "promote-gardenlinux-task");
        assert_eq!(
            task.step_names(),
            vec!["clone", "create-component-descriptor", "promote", "release"]
        );
    }

    #[test]
    fn snapshot_timestamp_is_declared_but_unbound() {
        let task = promote_task(&PromoteParams::default(), &[], &[], &[]).unwrap();
        assert!(task.param("snapshot_timestamp").is_some());
        assert!(task
            .spec
            .steps
            .iter()
            .all(|s| !s.params.contains(&"snapshot_timestamp".to_string())));
    }

    #[test]
    fn promote_task_does_not_append_fixed_volumes() {
        let task = promote_task(&PromoteParams::default(), &[], &[], &[]).unwrap();
        assert!(task.spec.volumes.is_empty());
    }

    #[test]
    fn promote_task_is_pure() {
        let params = PromoteParams::default();
        let a = promote_task(&params, &[], &[], &[]).unwrap();
        let b = promote_task(&params, &[], &[], &[]).unwrap();
        assert_eq!(a, b);
    }
}
