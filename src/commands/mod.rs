use glci::resources::{EnvVar, VolumeMount};
use glci::validation;

pub type CmdResult<T> = glci::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod render;
pub mod tasks;

// ============================================================================
// Flag parsing (CLI layer)
// ============================================================================

/// Parse repeatable `NAME=VALUE` flags into env vars.
pub(crate) fn parse_env_flags(flags: &[String]) -> glci::Result<Vec<EnvVar>> {
    flags
        .iter()
        .map(|raw| {
            let (name, value) = raw.split_once('=').ok_or_else(|| {
                glci::Error::validation_invalid_argument(
                    "env",
                    format!("Expected NAME=VALUE, got '{}'", raw),
                    None,
                    None,
                )
            })?;
            let name = validation::require_non_empty(
                name,
                "env",
                "Environment variable name cannot be empty",
            )?;
            Ok(EnvVar::new(name, value))
        })
        .collect()
}

/// Parse repeatable `NAME=PATH` flags into volume mounts.
pub(crate) fn parse_mount_flags(flags: &[String]) -> glci::Result<Vec<VolumeMount>> {
    flags
        .iter()
        .map(|raw| {
            let (name, path) = raw.split_once('=').ok_or_else(|| {
                glci::Error::validation_invalid_argument(
                    "volume-mount",
                    format!("Expected NAME=PATH, got '{}'", raw),
                    None,
                    None,
                )
            })?;
            let name =
                validation::require_non_empty(name, "volume-mount", "Mount name cannot be empty")?;
            let path =
                validation::require_non_empty(path, "volume-mount", "Mount path cannot be empty")?;
            Ok(VolumeMount::new(name, path))
        })
        .collect()
}
