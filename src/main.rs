use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

mod commands;
mod output;

use commands::{assets, task, verify};
use distgo::asset::AssetRegistry;
use distgo::paths;
use distgo::tree::TaskCommandTree;
use output::response;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "distgo")]
#[command(version = VERSION)]
#[command(about = "Build, package, and publish products through asset executables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered assets and their tasks
    Assets(assets::AssetsArgs),
    /// Run every asset's verify task
    Verify(verify::VerifyArgs),
}

/// Built-in root command names a top-level task alias may never shadow.
fn reserved_names() -> Vec<String> {
    let mut names: Vec<String> = Cli::command()
        .get_subcommands()
        .map(|c| c.get_name().to_string())
        .collect();
    names.push("help".to_string());
    names
}

fn main() -> std::process::ExitCode {
    // Init order: discovery, then tree assembly, then command execution.
    // Registry and tree are built once and threaded as values from here.
    let registry = match discover_registry() {
        Ok(registry) => registry,
        Err(err) => return exit_with(response::report_passthrough_error(&err)),
    };

    let tree = match TaskCommandTree::build(&registry, &reserved_names()) {
        Ok(tree) => tree,
        Err(err) => return exit_with(response::report_passthrough_error(&err)),
    };

    let matches = tree.attach(Cli::command()).get_matches();

    // Asset tasks are passthrough: the asset owns stdout/stderr and the
    // host adds nothing beyond its own failures.
    if let Some((task_command, forwarded_args)) = tree.resolve(&matches) {
        return match task::run(task_command, &forwarded_args) {
            Ok(()) => std::process::ExitCode::SUCCESS,
            Err(err) => exit_with(response::report_passthrough_error(&err)),
        };
    }

    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    match cli.command {
        Commands::Assets(args) => {
            exit_with(response::print_json_result(assets::run(args, &registry, &tree)))
        }
        Commands::Verify(args) => match verify::run(args, &registry) {
            Ok(()) => std::process::ExitCode::SUCCESS,
            Err(err) => exit_with(response::report_passthrough_error(&err)),
        },
    }
}

fn discover_registry() -> distgo::Result<AssetRegistry> {
    let paths = paths::discover_asset_paths()?;
    if !paths.is_empty() {
        distgo::log_status!("discover", "probing {} assets", paths.len());
    }
    AssetRegistry::load(&paths)
}

fn exit_with(code: i32) -> std::process::ExitCode {
    std::process::ExitCode::from(exit_code_to_u8(code))
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
