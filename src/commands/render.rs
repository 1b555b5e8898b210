use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use glci::render::{self, RenderedTask};
use glci::task::Task;
use glci::tasks;
use glci::log_status;

use super::CmdResult;

#[derive(Args)]
pub struct RenderArgs {
    /// Output directory for the YAML manifests
    #[arg(long, default_value = "tasks")]
    out: String,

    /// Environment variable passed to every step (NAME=VALUE, repeatable)
    #[arg(long = "env", value_name = "NAME=VALUE")]
    env: Vec<String>,

    /// Volume mount passed to every step (NAME=PATH, repeatable)
    #[arg(long = "volume-mount", value_name = "NAME=PATH")]
    volume_mount: Vec<String>,

    /// Render only the named task definitions (default: all)
    #[arg(long = "task", value_name = "NAME")]
    task: Vec<String>,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RenderOutput {
    #[serde(rename = "render")]
    Render { tasks: Vec<RenderedTask> },
}

pub fn run(args: RenderArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RenderOutput> {
    let env_vars = super::parse_env_flags(&args.env)?;
    let volume_mounts = super::parse_mount_flags(&args.volume_mount)?;

    let all = tasks::all_tasks(&env_vars, &[], &volume_mounts)?;
    let selected = select_tasks(all, &args.task)?;

    let out_dir = PathBuf::from(&args.out);
    let mut rendered = Vec::with_capacity(selected.len());
    for task in &selected {
        log_status!("render", "Writing {} to {}", task.name(), out_dir.display());
        rendered.push(render::write_task(task, &out_dir)?);
    }

    Ok((RenderOutput::Render { tasks: rendered }, 0))
}

/// Filter the composed set down to the requested task names.
fn select_tasks(all: Vec<Task>, requested: &[String]) -> glci::Result<Vec<Task>> {
    if requested.is_empty() {
        return Ok(all);
    }

    let mut selected = Vec::with_capacity(requested.len());
    for name in requested {
        match all.iter().find(|t| t.name() == name) {
            Some(task) => selected.push(task.clone()),
            None => return Err(glci::Error::task_not_found(name)),
        }
    }
    Ok(selected)
}
