//! The base image build pipeline task.

use crate::error::Result;
use crate::param::NamedParam;
use crate::resources::{EnvVar, Volume, VolumeMount};
use crate::steps;
use crate::task::Task;

use super::REPO_DIR;

/// Assemble `build-baseimage`: clone, then build and push the base image
/// to the OCI registry.
pub fn base_image_build_task(
    env_vars: &[EnvVar],
    volumes: &[Volume],
    volume_mounts: &[VolumeMount],
) -> Result<Task> {
    let repo_dir = REPO_DIR.clone();
    let oci_path = NamedParam::with_default(
        "oci_path",
        "eu.gcr.io/gardener-project/test/gardenlinux-test",
    )
    .describe("path in OCI-registry where to store output");
    let version_label = NamedParam::with_default("version_label", "latest")
        .describe("version label uses as tag for upload");
    let committish =
        NamedParam::with_default("committish", "master").describe("commit to build");
    let giturl =
        NamedParam::with_default("giturl", "https://github.com/gardenlinux/gardenlinux.git")
            .describe("Gardenlinux Git repo");

    let clone_repo_step = steps::clone_step(
        "clone",
        &committish,
        &giturl,
        &repo_dir,
        env_vars,
        volume_mounts,
    );

    let build_base_image_step = steps::build_base_image_step(
        &repo_dir,
        &oci_path,
        &version_label,
        env_vars,
        volume_mounts,
    );

    Task::new(
        "build-baseimage",
        vec![committish, giturl, oci_path, repo_dir, version_label],
        vec![clone_repo_step, build_base_image_step],
        volumes.to_vec(),
    )
}
