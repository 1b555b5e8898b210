use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{render, tasks};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "glci")]
#[command(version = VERSION)]
#[command(about = "Compose and render the Garden Linux pipeline task definitions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render task definitions as Tekton YAML manifests
    Render(render::RenderArgs),
    /// List the composed task definitions
    Tasks(tasks::TasksArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = commands::GlobalArgs {};

    let (json_result, exit_code) = match cli.command {
        Commands::Render(args) => output::map_cmd_result_to_json(render::run(args, &global)),
        Commands::Tasks(args) => output::map_cmd_result_to_json(tasks::run(args, &global)),
    };

    if output::print_json_result(json_result).is_err() {
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
