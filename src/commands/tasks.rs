use clap::Args;
use serde::Serialize;

use glci::task::Task;
use glci::tasks;

use super::CmdResult;

#[derive(Args)]
pub struct TasksArgs {}

#[derive(Serialize)]
pub struct TaskSummary {
    pub name: String,
    pub steps: Vec<String>,
    pub params: Vec<String>,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum TasksOutput {
    #[serde(rename = "tasks")]
    List { tasks: Vec<TaskSummary> },
}

pub fn run(_args: TasksArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<TasksOutput> {
    let all = tasks::all_tasks(&[], &[], &[])?;
    let summaries = all.iter().map(summarize).collect();
    Ok((TasksOutput::List { tasks: summaries }, 0))
}

fn summarize(task: &Task) -> TaskSummary {
    TaskSummary {
        name: task.name().to_string(),
        steps: task.step_names().iter().map(|s| s.to_string()).collect(),
        params: task.spec.params.iter().map(|p| p.name.clone()).collect(),
    }
}
