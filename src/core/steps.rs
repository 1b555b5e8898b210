//! Step factories for the Garden Linux pipelines.
//!
//! One factory per step kind. Each factory binds a subset of the enclosing
//! task's parameters, threads the caller's environment variables and volume
//! mounts through unchanged, and returns an opaque `TaskStep`. What a step
//! actually executes is the runner's business; the scripts here only
//! forward `$(params.x)` references to the step entrypoints baked into the
//! runner image. Factories are total: they never validate cross-parameter
//! consistency, that is the builders' job (enforced in `Task::new`).

use crate::param::NamedParam;
use crate::resources::{EnvVar, VolumeMount};
use crate::task::TaskStep;

/// CI/CD runner image with the step entrypoints under /cicd/steps.
pub const RUNNER_IMAGE: &str = "eu.gcr.io/gardener-project/cc/job-image:latest";

fn runner_step(
    name: &str,
    entrypoint: &str,
    bound: &[&NamedParam],
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    let params: Vec<String> = bound.iter().map(|p| p.name.clone()).collect();
    let args = params
        .iter()
        .map(|n| format!("\"$(params.{})\"", n))
        .collect::<Vec<_>>()
        .join(" ");

    TaskStep {
        name: name.to_string(),
        image: RUNNER_IMAGE.to_string(),
        script: format!(
            "#!/usr/bin/env sh\nset -eu\nexec /cicd/steps/{}.sh {}\n",
            entrypoint, args
        ),
        params,
        env: env_vars.to_vec(),
        volume_mounts: volume_mounts.to_vec(),
    }
}

/// Clone the Garden Linux repository at a given committish.
///
/// The step name is caller-chosen: the package pipeline names its instance
/// `clone-repo` to distinguish it from the cert-tool clone, everything else
/// uses plain `clone`.
pub fn clone_step(
    name: &str,
    committish: &NamedParam,
    git_url: &NamedParam,
    repo_dir: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step(
        name,
        "clone_repo",
        &[committish, git_url, repo_dir],
        env_vars,
        volume_mounts,
    )
}

/// Flavour expansion and build preparation ahead of the image build.
pub fn pre_build_step(
    architecture: &NamedParam,
    cicd_cfg_name: &NamedParam,
    committish: &NamedParam,
    gardenlinux_epoch: &NamedParam,
    modifiers: &NamedParam,
    platform: &NamedParam,
    publishing_actions: &NamedParam,
    repo_dir: &NamedParam,
    version: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step(
        "pre-build",
        "pre_build",
        &[
            architecture,
            cicd_cfg_name,
            committish,
            gardenlinux_epoch,
            modifiers,
            platform,
            publishing_actions,
            repo_dir,
            version,
        ],
        env_vars,
        volume_mounts,
    )
}

/// The image build itself. Runs inside the dynamically created build
/// image, so the step's container image is a parameter reference rather
/// than the fixed runner image.
pub fn build_image_step(
    build_image: &NamedParam,
    architecture: &NamedParam,
    suite: &NamedParam,
    gardenlinux_epoch: &NamedParam,
    snapshot_timestamp: &NamedParam,
    platform: &NamedParam,
    modifiers: &NamedParam,
    committish: &NamedParam,
    version: &NamedParam,
    repo_dir: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    let mut step = runner_step(
        "build-image",
        "build_image",
        &[
            architecture,
            suite,
            gardenlinux_epoch,
            snapshot_timestamp,
            platform,
            modifiers,
            committish,
            version,
            repo_dir,
        ],
        env_vars,
        volume_mounts,
    );
    step.image = format!("$(params.{})", build_image.name);
    step.params.push(build_image.name.clone());
    step
}

/// Upload build results to the artifact store.
pub fn upload_results_step(
    architecture: &NamedParam,
    cicd_cfg_name: &NamedParam,
    committish: &NamedParam,
    gardenlinux_epoch: &NamedParam,
    modifiers: &NamedParam,
    outfile: &NamedParam,
    platform: &NamedParam,
    publishing_actions: &NamedParam,
    repo_dir: &NamedParam,
    version: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step(
        "upload",
        "upload_results",
        &[
            architecture,
            cicd_cfg_name,
            committish,
            gardenlinux_epoch,
            modifiers,
            outfile,
            platform,
            publishing_actions,
            repo_dir,
            version,
        ],
        env_vars,
        volume_mounts,
    )
}

pub fn promote_step(
    cicd_cfg_name: &NamedParam,
    committish: &NamedParam,
    flavourset: &NamedParam,
    gardenlinux_epoch: &NamedParam,
    publishing_actions: &NamedParam,
    repo_dir: &NamedParam,
    version: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step(
        "promote",
        "promote",
        &[
            cicd_cfg_name,
            committish,
            flavourset,
            gardenlinux_epoch,
            publishing_actions,
            repo_dir,
            version,
        ],
        env_vars,
        volume_mounts,
    )
}

pub fn release_step(
    committish: &NamedParam,
    gardenlinux_epoch: &NamedParam,
    git_url: &NamedParam,
    publishing_actions: &NamedParam,
    repo_dir: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step(
        "release",
        "release",
        &[
            committish,
            gardenlinux_epoch,
            git_url,
            publishing_actions,
            repo_dir,
        ],
        env_vars,
        volume_mounts,
    )
}

pub fn create_component_descriptor_step(
    branch: &NamedParam,
    cicd_cfg_name: &NamedParam,
    committish: &NamedParam,
    ctx_repository_config_name: &NamedParam,
    gardenlinux_epoch: &NamedParam,
    publishing_actions: &NamedParam,
    repo_dir: &NamedParam,
    snapshot_ctx_repository_config_name: &NamedParam,
    version: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step(
        "create-component-descriptor",
        "component_descriptor",
        &[
            branch,
            cicd_cfg_name,
            committish,
            ctx_repository_config_name,
            gardenlinux_epoch,
            publishing_actions,
            repo_dir,
            snapshot_ctx_repository_config_name,
            version,
        ],
        env_vars,
        volume_mounts,
    )
}

/// Clone the cert tooling (cfssl) used for package signing.
pub fn cert_tool_clone_step(
    committish: &NamedParam,
    working_dir: &NamedParam,
    repo_dir: &NamedParam,
    git_url: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step(
        "clone-cert-tool",
        "clone_cert_tool",
        &[committish, working_dir, repo_dir, git_url],
        env_vars,
        volume_mounts,
    )
}

/// Materialize the package signing key from its config.
pub fn write_key_step(
    key_config_name: &NamedParam,
    repo_dir: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step(
        "write-signing-key",
        "write_key",
        &[key_config_name, repo_dir],
        env_vars,
        volume_mounts,
    )
}

pub fn build_cert_tool_step(
    repo_dir: &NamedParam,
    cfssl_fastpath: &NamedParam,
    cfssl_dir: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step(
        "build-cert-tool",
        "build_cert_tool",
        &[repo_dir, cfssl_fastpath, cfssl_dir],
        env_vars,
        volume_mounts,
    )
}

pub fn build_certs_step(
    repo_dir: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step("build-certs", "build_certs", &[repo_dir], env_vars, volume_mounts)
}

/// Build a single (non-kernel) package. Runs in the deb-build image.
pub fn build_package_step(
    deb_image: &NamedParam,
    repo_dir: &NamedParam,
    pkg_name: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    let mut step = runner_step(
        "build-package",
        "build_package",
        &[repo_dir, pkg_name],
        env_vars,
        volume_mounts,
    );
    step.image = format!("$(params.{})", deb_image.name);
    step.params.push(deb_image.name.clone());
    step
}

/// Build a set of kernel packages (comma-separated list parameter).
/// Runs in the deb-build image.
pub fn build_kernel_package_step(
    deb_image: &NamedParam,
    repo_dir: &NamedParam,
    pkg_names: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    let mut step = runner_step(
        "build-kernel-package",
        "build_kernel_package",
        &[repo_dir, pkg_names],
        env_vars,
        volume_mounts,
    );
    step.image = format!("$(params.{})", deb_image.name);
    step.params.push(deb_image.name.clone());
    step
}

pub fn upload_packages_step(
    cicd_cfg_name: &NamedParam,
    repo_dir: &NamedParam,
    s3_package_path: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step(
        "upload-packages",
        "upload_packages",
        &[cicd_cfg_name, repo_dir, s3_package_path],
        env_vars,
        volume_mounts,
    )
}

pub fn pre_check_tests_step(
    architecture: &NamedParam,
    cicd_cfg_name: &NamedParam,
    committish: &NamedParam,
    gardenlinux_epoch: &NamedParam,
    modifiers: &NamedParam,
    platform: &NamedParam,
    publishing_actions: &NamedParam,
    repo_dir: &NamedParam,
    version: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step(
        "pre-check-tests",
        "pre_check_tests",
        &[
            architecture,
            cicd_cfg_name,
            committish,
            gardenlinux_epoch,
            modifiers,
            platform,
            publishing_actions,
            repo_dir,
            version,
        ],
        env_vars,
        volume_mounts,
    )
}

pub fn test_step(
    architecture: &NamedParam,
    cicd_cfg_name: &NamedParam,
    committish: &NamedParam,
    gardenlinux_epoch: &NamedParam,
    modifiers: &NamedParam,
    platform: &NamedParam,
    publishing_actions: &NamedParam,
    pytest_cfg: &NamedParam,
    repo_dir: &NamedParam,
    snapshot_timestamp: &NamedParam,
    suite: &NamedParam,
    version: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step(
        "test",
        "run_tests",
        &[
            architecture,
            cicd_cfg_name,
            committish,
            gardenlinux_epoch,
            modifiers,
            platform,
            publishing_actions,
            pytest_cfg,
            repo_dir,
            snapshot_timestamp,
            suite,
            version,
        ],
        env_vars,
        volume_mounts,
    )
}

pub fn upload_test_results_step(
    architecture: &NamedParam,
    cicd_cfg_name: &NamedParam,
    committish: &NamedParam,
    gardenlinux_epoch: &NamedParam,
    modifiers: &NamedParam,
    platform: &NamedParam,
    repo_dir: &NamedParam,
    version: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step(
        "upload-test-results",
        "upload_test_results",
        &[
            architecture,
            cicd_cfg_name,
            committish,
            gardenlinux_epoch,
            modifiers,
            platform,
            repo_dir,
            version,
        ],
        env_vars,
        volume_mounts,
    )
}

pub fn build_base_image_step(
    repo_dir: &NamedParam,
    oci_path: &NamedParam,
    version_label: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step(
        "build-base-image",
        "build_base_image",
        &[repo_dir, oci_path, version_label],
        env_vars,
        volume_mounts,
    )
}

/// Collect pipeline-run logs for the notification mail.
pub fn get_logs_step(
    repo_dir: &NamedParam,
    pipeline_run_name: &NamedParam,
    namespace: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step(
        "get-logs",
        "get_logs",
        &[repo_dir, pipeline_run_name, namespace],
        env_vars,
        volume_mounts,
    )
}

pub fn notify_step(
    additional_recipients: &NamedParam,
    cicd_cfg_name: &NamedParam,
    disable_notifications: &NamedParam,
    git_url: &NamedParam,
    namespace: &NamedParam,
    only_recipients: &NamedParam,
    pipeline_name: &NamedParam,
    pipeline_run_name: &NamedParam,
    repo_dir: &NamedParam,
    status_dict_str: &NamedParam,
    env_vars: &[EnvVar],
    volume_mounts: &[VolumeMount],
) -> TaskStep {
    runner_step(
        "notify",
        "notify",
        &[
            additional_recipients,
            cicd_cfg_name,
            disable_notifications,
            git_url,
            namespace,
            only_recipients,
            pipeline_name,
            pipeline_run_name,
            repo_dir,
            status_dict_str,
        ],
        env_vars,
        volume_mounts,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str) -> NamedParam {
        NamedParam::new(name)
    }

    #[test]
    fn clone_step_binds_its_three_params() {
        let step = clone_step(
            "clone",
            &param("committish"),
            &param("giturl"),
            &param("repo_dir"),
            &[],
            &[],
        );
        assert_eq!(step.name, "clone");
        assert_eq!(step.params, vec!["committish", "giturl", "repo_dir"]);
        assert!(step.script.contains("$(params.committish)"));
        assert!(step.script.contains("$(params.giturl)"));
    }

    #[test]
    fn env_and_mounts_are_threaded_through() {
        let env = vec![EnvVar::new("SECRETS_SERVER_ENDPOINT", "http://secrets")];
        let mounts = vec![VolumeMount::new("secrets", "/secrets")];
        let step = build_certs_step(&param("repo_dir"), &env, &mounts);
        assert_eq!(step.env, env);
        assert_eq!(step.volume_mounts, mounts);
    }

    #[test]
    fn build_image_step_runs_in_the_build_image_param() {
        let step = build_image_step(
            &param("build_image"),
            &param("architecture"),
            &param("suite"),
            &param("gardenlinux_epoch"),
            &param("snapshot_timestamp"),
            &param("platform"),
            &param("modifiers"),
            &param("committish"),
            &param("version"),
            &param("repo_dir"),
            &[],
            &[],
        );
        assert_eq!(step.image, "$(params.build_image)");
        assert!(step.params.contains(&"build_image".to_string()));
    }

    #[test]
    fn factories_use_the_runner_image_by_default() {
        let step = write_key_step(&param("key_config_name"), &param("repo_dir"), &[], &[]);
        assert_eq!(step.image, RUNNER_IMAGE);
    }
}
