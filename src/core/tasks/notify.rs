//! The failure-notification pipeline task.

use crate::error::Result;
use crate::param::NamedParam;
use crate::resources::{EnvVar, Volume, VolumeMount};
use crate::steps;
use crate::task::Task;

use super::{GIT_URL, REPO_DIR};

/// Assemble `notify-task`: clone, pipeline-run log collection, then the
/// notification mail.
pub fn notify_task(
    env_vars: &[EnvVar],
    volumes: &[Volume],
    volume_mounts: &[VolumeMount],
) -> Result<Task> {
    let additional_recipients = NamedParam::new("additional_recipients");
    let only_recipients = NamedParam::new("only_recipients");
    let cicd_cfg_name = NamedParam::with_default("cicd_cfg_name", "default");
    let committish = NamedParam::with_default("committish", "main").describe("commit to build");
    let disable_notifications = NamedParam::with_default("disable_notifications", "false")
        .describe("if true no notification emails are sent");
    let status = NamedParam::with_default("status_dict_str", "~")
        .describe("JSON string with status for all tasks");
    let namespace =
        NamedParam::new("namespace").describe("Namespace of current pipeline run");
    let pipeline_name =
        NamedParam::new("pipeline_name").describe("Name of current pipeline");
    let pipeline_run_name =
        NamedParam::new("pipeline_run_name").describe("Name of current pipeline run");

    let giturl = GIT_URL.clone();
    let repo_dir = REPO_DIR.clone();

    let clone_step = steps::clone_step(
        "clone",
        &committish,
        &giturl,
        &repo_dir,
        env_vars,
        volume_mounts,
    );

    let log_step = steps::get_logs_step(
        &repo_dir,
        &pipeline_run_name,
        &namespace,
        env_vars,
        volume_mounts,
    );

    let notify_step = steps::notify_step(
        &additional_recipients,
        &cicd_cfg_name,
        &disable_notifications,
        &giturl,
        &namespace,
        &only_recipients,
        &pipeline_name,
        &pipeline_run_name,
        &repo_dir,
        &status,
        env_vars,
        volume_mounts,
    );

    Task::new(
        "notify-task",
        vec![
            additional_recipients,
            cicd_cfg_name,
            committish,
            disable_notifications,
            giturl,
            only_recipients,
            repo_dir,
            status,
            namespace,
            pipeline_name,
            pipeline_run_name,
        ],
        vec![clone_step, log_step, notify_step],
        volumes.to_vec(),
    )
}
