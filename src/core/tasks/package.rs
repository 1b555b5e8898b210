//! The package build pipeline tasks (kernel and non-kernel).
//!
//! Both variants share every step (repo clone, cert tooling, signing key,
//! package upload) and differ only in the package-build step itself and
//! the shape of the package-name parameter. `package_task` is the shared
//! internal builder; the two public builders pass the variant-specific
//! pieces explicitly instead of branching on a flag inside.

use crate::error::Result;
use crate::param::NamedParam;
use crate::resources::{EnvVar, Volume, VolumeMount};
use crate::steps;
use crate::task::{Task, TaskStep};

use super::REPO_DIR;

/// Name/shape of the package-name parameter: one package per task run, or
/// a comma-separated list (kernel builds compile the whole set at once).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageNameShape {
    Single,
    CommaList,
}

impl PackageNameShape {
    fn param(&self) -> NamedParam {
        match self {
            PackageNameShape::Single => {
                NamedParam::new("pkg_name").describe("name of package to build")
            }
            PackageNameShape::CommaList => NamedParam::new("pkg_names")
                .describe("list of kernel-package to build (comma separated string)"),
        }
    }
}

/// Produces the variant-specific package-build step from the deb-build
/// image param, the working dir, and the (already shaped) package-name
/// param.
type PackageBuildStepFn =
    fn(&NamedParam, &NamedParam, &NamedParam, &[EnvVar], &[VolumeMount]) -> TaskStep;

/// Assemble `build-packages`: single-package variant.
pub fn nokernel_package_task(
    env_vars: &[EnvVar],
    volumes: &[Volume],
    volume_mounts: &[VolumeMount],
) -> Result<Task> {
    package_task(
        "build-packages",
        PackageNameShape::Single,
        steps::build_package_step,
        env_vars,
        volumes,
        volume_mounts,
    )
}

/// Assemble `build-kernel-packages`: kernel-package-set variant.
pub fn kernel_package_task(
    env_vars: &[EnvVar],
    volumes: &[Volume],
    volume_mounts: &[VolumeMount],
) -> Result<Task> {
    package_task(
        "build-kernel-packages",
        PackageNameShape::CommaList,
        steps::build_kernel_package_step,
        env_vars,
        volumes,
        volume_mounts,
    )
}

fn package_task(
    task_name: &str,
    shape: PackageNameShape,
    package_build_step: PackageBuildStepFn,
    env_vars: &[EnvVar],
    volumes: &[Volume],
    volume_mounts: &[VolumeMount],
) -> Result<Task> {
    let cfssl_dir = NamedParam::with_default("cfssl_dir", "/workspace/cfssl")
        .describe("git working dir to clone and build cfssl");
    let cfssl_fastpath = NamedParam::with_default("cfssl_fastpath", "false")
        .describe("bypass cfssl build and copy binaries from github (set to true/false)");
    let cicd_cfg_name = NamedParam::with_default("cicd_cfg_name", "default");
    let committish =
        NamedParam::with_default("committish", "master").describe("commit to build");
    let gardenlinux_build_deb_image = NamedParam::new("gardenlinux_build_deb_image")
        .describe("image to use for package build");
    let giturl =
        NamedParam::with_default("giturl", "https://github.com/gardenlinux/gardenlinux.git")
            .describe("Gardenlinux Git repo");

    let pkg_name = shape.param();
    let repo_dir = REPO_DIR.clone();

    let s3_package_path = NamedParam::with_default("package_path_s3_prefix", "packages/pool")
        .describe("path relative to the root of the s3 bucket to upload the built packages to");
    let version_label =
        NamedParam::new("version_label").describe("version label uses as tag for upload");
    let cfssl_committish =
        NamedParam::with_default("cfssl_committish", "master").describe("cfssl branch to clone");
    let cfssl_git_url =
        NamedParam::with_default("cfssl_git_url", "https://github.com/cloudflare/cfssl.git")
            .describe("cfssl git url to clone");
    let key_config_name = NamedParam::with_default("key_config_name", "gardenlinux")
        .describe("config name of the key to use for signing the packages");

    let clone_repo_step = steps::clone_step(
        "clone-repo",
        &committish,
        &giturl,
        &repo_dir,
        env_vars,
        volume_mounts,
    );

    let clone_cert_tool_step = steps::cert_tool_clone_step(
        &cfssl_committish,
        &cfssl_dir,
        &repo_dir,
        &cfssl_git_url,
        env_vars,
        volume_mounts,
    );

    let write_key_step = steps::write_key_step(&key_config_name, &repo_dir, env_vars, volume_mounts);

    let build_cert_tool_step = steps::build_cert_tool_step(
        &repo_dir,
        &cfssl_fastpath,
        &cfssl_dir,
        env_vars,
        volume_mounts,
    );

    let build_certs_step = steps::build_certs_step(&repo_dir, env_vars, volume_mounts);

    let build_package_step = package_build_step(
        &gardenlinux_build_deb_image,
        &repo_dir,
        &pkg_name,
        env_vars,
        volume_mounts,
    );

    let upload_packages_step = steps::upload_packages_step(
        &cicd_cfg_name,
        &repo_dir,
        &s3_package_path,
        env_vars,
        volume_mounts,
    );

    Task::new(
        task_name,
        vec![
            cfssl_git_url,
            cfssl_committish,
            cfssl_dir,
            cfssl_fastpath,
            cicd_cfg_name,
            committish,
            gardenlinux_build_deb_image,
            giturl,
            key_config_name,
            pkg_name,
            repo_dir,
            s3_package_path,
            version_label,
        ],
        vec![
            clone_repo_step,
            clone_cert_tool_step,
            write_key_step,
            build_cert_tool_step,
            build_certs_step,
            build_package_step,
            upload_packages_step,
        ],
        volumes.to_vec(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nokernel_task_has_documented_name_and_step_order() {
        let task = nokernel_package_task(&[], &[], &[]).unwrap();
        assert_eq!(task.name(), "build-packages");
        assert_eq!(
            task.step_names(),
            vec![
                "clone-repo",
                "clone-cert-tool",
                "write-signing-key",
                "build-cert-tool",
                "build-certs",
                "build-package",
                "upload-packages",
            ]
        );
    }

    #[test]
    fn kernel_and_nokernel_differ_only_in_build_step_and_pkg_param() {
        let nokernel = nokernel_package_task(&[], &[], &[]).unwrap();
        let kernel = kernel_package_task(&[], &[], &[]).unwrap();

        assert_eq!(kernel.name(), "build-kernel-packages");

        // Same step sequence apart from the package-build position.
        let n_steps = nokernel.step_names();
        let k_steps = kernel.step_names();
        assert_eq!(n_steps.len(), k_steps.len());
        for (n, k) in n_steps.iter().zip(k_steps.iter()) {
            if *n == "build-package" {
                assert_eq!(*k, "build-kernel-package");
            } else {
                assert_eq!(n, k);
            }
        }

        // Same param set apart from the package-name shape.
        assert!(nokernel.param("pkg_name").is_some());
        assert!(nokernel.param("pkg_names").is_none());
        assert!(kernel.param("pkg_names").is_some());
        assert!(kernel.param("pkg_name").is_none());

        let n_params: Vec<&str> = nokernel
            .spec
            .params
            .iter()
            .map(|p| p.name.as_str())
            .filter(|n| *n != "pkg_name")
            .collect();
        let k_params: Vec<&str> = kernel
            .spec
            .params
            .iter()
            .map(|p| p.name.as_str())
            .filter(|n| *n != "pkg_names")
            .collect();
        assert_eq!(n_params, k_params);
    }

    #[test]
    fn package_giturl_uses_the_https_remote() {
        let task = nokernel_package_task(&[], &[], &[]).unwrap();
        assert_eq!(
            task.param("giturl").unwrap().default.as_deref(),
            Some("https://github.com/gardenlinux/gardenlinux.git")
        );
    }

    #[test]
    fn package_build_step_runs_in_the_deb_image() {
        let task = kernel_package_task(&[], &[], &[]).unwrap();
        let build = task
            .spec
            .steps
            .iter()
            .find(|s| s.name == "build-kernel-package")
            .unwrap();
        assert_eq!(build.image, "$(params.gardenlinux_build_deb_image)");
    }

    #[test]
    fn signing_key_defaults_to_the_gardenlinux_config() {
        let task = nokernel_package_task(&[], &[], &[]).unwrap();
        assert_eq!(
            task.param("key_config_name").unwrap().default.as_deref(),
            Some("gardenlinux")
        );
    }
}
