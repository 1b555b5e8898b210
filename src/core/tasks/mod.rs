//! Per-pipeline task builders.
//!
//! One builder per pipeline stage (build, test, promote, package,
//! base-image, notify). Every builder is a pure function of its inputs:
//! it declares or reuses the NamedParams for its pipeline, invokes the
//! step factories in the fixed execution order, hand-assembles the full
//! parameter list, merges caller volumes with any pipeline-fixed ones,
//! and returns one validated `Task`. Building the whole pipeline set
//! concurrently is safe; the only shared state is the immutable default
//! instances below.

use std::sync::LazyLock;

use crate::error::Result;
use crate::param::NamedParam;
use crate::resources::{EnvVar, Volume, VolumeMount};
use crate::task::Task;

pub mod base_image;
pub mod build;
pub mod notify;
pub mod package;
pub mod promote;
pub mod test;

pub use base_image::base_image_build_task;
pub use build::build_task;
pub use notify::notify_task;
pub use package::{kernel_package_task, nokernel_package_task, PackageNameShape};
pub use promote::{promote_task, PromoteParams};
pub use test::test_task;

/// Build the full pipeline task set with one shared execution context.
pub fn all_tasks(
    env_vars: &[EnvVar],
    volumes: &[Volume],
    volume_mounts: &[VolumeMount],
) -> Result<Vec<Task>> {
    Ok(vec![
        build_task(env_vars, volumes, volume_mounts)?,
        test_task(env_vars, volumes, volume_mounts)?,
        promote_task(&PromoteParams::default(), env_vars, volumes, volume_mounts)?,
        nokernel_package_task(env_vars, volumes, volume_mounts)?,
        kernel_package_task(env_vars, volumes, volume_mounts)?,
        base_image_build_task(env_vars, volumes, volume_mounts)?,
        notify_task(env_vars, volumes, volume_mounts)?,
    ])
}

/// Shared `giturl` default. Reused by reference across builders so the
/// same logical parameter carries the same name/default/description
/// everywhere it recurs.
pub static GIT_URL: LazyLock<NamedParam> = LazyLock::new(|| {
    NamedParam::with_default("giturl", "ssh://git@github.com/gardenlinux/gardenlinux")
});

/// Shared working-directory default.
pub static REPO_DIR: LazyLock<NamedParam> = LazyLock::new(|| {
    NamedParam::with_default("repo_dir", "/workspace/gardenlinux_git")
        .describe("Gardenlinux working dir")
});

/// Fixed volumes the build and test pipelines append to the caller's
/// list: host /dev passthrough (loop devices) and an in-memory scratch
/// volume for the build tree.
pub(crate) fn scratch_volumes() -> [Volume; 2] {
    [
        Volume::host_path("dev", "/dev", Some("Directory")),
        Volume::empty_dir_memory("build"),
    ]
}

/// The parameter pool shared by the build and test pipelines.
pub(crate) struct BuildAndTestParams {
    pub architecture: NamedParam,
    pub build_image: NamedParam,
    pub cicd_cfg_name: NamedParam,
    pub committish: NamedParam,
    pub flavourset: NamedParam,
    pub giturl: NamedParam,
    pub gardenlinux_epoch: NamedParam,
    pub modifiers: NamedParam,
    pub outfile: NamedParam,
    pub platform: NamedParam,
    pub publishing_actions: NamedParam,
    pub promote_target: NamedParam,
    pub snapshot_timestamp: NamedParam,
    pub suite: NamedParam,
    pub version: NamedParam,
}

pub(crate) fn build_and_test_params() -> BuildAndTestParams {
    BuildAndTestParams {
        architecture: NamedParam::with_default("architecture", "amd64")
            .describe("the build architecture (currently, only amd64 is supported)"),
        build_image: NamedParam::new("build_image")
            .describe("the container image for gardenlinux build (dynamically created)"),
        cicd_cfg_name: NamedParam::with_default("cicd_cfg_name", "default")
            .describe("the cicd cfg to use (see cicd.yaml)"),
        committish: NamedParam::with_default("committish", "master"),
        flavourset: NamedParam::with_default("flavourset", "all")
            .describe("the flavourset name this task is a part of"),
        giturl: GIT_URL.clone(),
        gardenlinux_epoch: NamedParam::new("gardenlinux_epoch")
            .describe("the gardenlinux epoch to use for as snapshot repo timestamp"),
        modifiers: NamedParam::with_default("modifiers", "bullseye")
            .describe("the build modifiers"),
        outfile: NamedParam::with_default("outfile", "/workspace/gardenlinux.out")
            .describe("build result file (parameter is used to pass between steps)"),
        platform: NamedParam::with_default("platform", "bullseye")
            .describe("the target platform (aws, gcp, metal, kvm, ..)"),
        publishing_actions: NamedParam::with_default("publishing_actions", "manifests")
            .describe("how artifacts should be published (glci.model.PublishingAction)"),
        promote_target: NamedParam::with_default("promote_target", "snapshots")
            .describe("the promotion target (snapshots|daily|release)"),
        snapshot_timestamp: NamedParam::new("snapshot_timestamp")
            .describe("the snapshot timestamp (calculated from gardenlinux_epoch)"),
        suite: NamedParam::with_default("suite", "bullseye")
            .describe("Debian release (buster, bullseye, ..)"),
        version: NamedParam::new("version").describe("the target version to build / release"),
    }
}
