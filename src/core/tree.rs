//! Assembles the CLI's dynamic subtree from the asset registry.
//!
//! Every cataloged task is reachable at its fully-qualified path
//! `<type> <asset-name> <task-name>`; tasks that ask for it also get a
//! top-level alias when the name is neither a built-in command nor already
//! claimed by an earlier asset. The tree is built exactly once per process,
//! from the registry, and its shape depends only on the registry contents.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{ArgMatches, Command};

use crate::asset::{AssetRegistry, AssetType, TaskInfo};
use crate::error::{CommandRegistrationDetails, Error, Result};

/// A runnable asset task the parser can resolve to.
#[derive(Debug, Clone)]
pub struct TaskCommand {
    pub asset_path: PathBuf,
    pub asset_name: String,
    pub asset_type: AssetType,
    pub task: TaskInfo,
}

const FORWARDED_ARGS_ID: &str = "args";

/// The assembled dynamic subtree plus the lookup tables needed to translate
/// parsed matches back to the owning asset task.
#[derive(Debug)]
pub struct TaskCommandTree {
    commands: Vec<Command>,
    tasks: Vec<TaskCommand>,
    /// (type, asset-name, task-name) → index into `tasks`.
    qualified: BTreeMap<(&'static str, String, String), usize>,
    /// Claimed top-level alias → index into `tasks`. First writer wins.
    aliases: BTreeMap<String, usize>,
}

impl TaskCommandTree {
    /// Build the subtree. `reserved_names` are the built-in root commands
    /// an alias may never shadow.
    ///
    /// Aborts with a registration error naming the offending asset, type,
    /// and task when a task cannot be turned into a command (an empty
    /// command argv, or a multi-token one on a task asking for top-level
    /// registration); nothing partial is returned.
    pub fn build(registry: &AssetRegistry, reserved_names: &[String]) -> Result<TaskCommandTree> {
        let mut tree = TaskCommandTree {
            commands: Vec::new(),
            tasks: Vec::new(),
            qualified: BTreeMap::new(),
            aliases: BTreeMap::new(),
        };

        // Per-type subcommands, created once each, keyed in natural order.
        let mut type_commands: BTreeMap<AssetType, Command> = BTreeMap::new();

        for asset in registry.assets_with_catalogs() {
            let Some(catalog) = asset.catalog.as_ref() else {
                continue;
            };

            let mut asset_command = Command::new(catalog.asset_name.clone())
                .about(format!("Tasks provided by the {} asset", catalog.asset_name))
                .subcommand_required(true)
                .arg_required_else_help(true);

            // BTreeMap iteration gives task names in lexicographic order,
            // independent of declaration order.
            for (task_name, task) in &catalog.tasks {
                let leaf = build_leaf_command(asset, &catalog.asset_name, task)?;

                let index = tree.tasks.len();
                tree.tasks.push(TaskCommand {
                    asset_path: asset.path.clone(),
                    asset_name: catalog.asset_name.clone(),
                    asset_type: asset.asset_type,
                    task: task.clone(),
                });
                tree.qualified.insert(
                    (
                        asset.asset_type.as_str(),
                        catalog.asset_name.clone(),
                        task_name.clone(),
                    ),
                    index,
                );

                // The per-type subcommand names are implicitly reserved:
                // an alias may not shadow `dister` and friends either.
                let shadows_type_command = AssetType::ALL
                    .iter()
                    .any(|t| t.as_str() == task_name.as_str());

                if task.register_as_top_level
                    && !shadows_type_command
                    && !reserved_names.iter().any(|r| r == task_name)
                    && !tree.aliases.contains_key(task_name)
                {
                    tree.aliases.insert(task_name.clone(), index);
                    tree.commands.push(leaf.clone());
                }

                asset_command = asset_command.subcommand(leaf);
            }

            let type_command = type_commands.entry(asset.asset_type).or_insert_with(|| {
                Command::new(asset.asset_type.as_str())
                    .about(format!(
                        "Tasks provided by {} assets",
                        asset.asset_type.as_str()
                    ))
                    .subcommand_required(true)
                    .arg_required_else_help(true)
            });
            *type_command = type_command.clone().subcommand(asset_command);
        }

        let mut commands: Vec<Command> = type_commands.into_values().collect();
        commands.append(&mut tree.commands);
        tree.commands = commands;

        Ok(tree)
    }

    /// Append the dynamic subcommands to the static root command.
    pub fn attach(&self, mut root: Command) -> Command {
        for command in &self.commands {
            root = root.subcommand(command.clone());
        }
        root
    }

    /// Translate parsed matches to the owning task and its forwarded args.
    ///
    /// Returns `None` when the matches name a built-in command instead.
    pub fn resolve(&self, matches: &ArgMatches) -> Option<(&TaskCommand, Vec<String>)> {
        let (name, submatches) = matches.subcommand()?;

        if let Some(&index) = self.aliases.get(name) {
            return Some((&self.tasks[index], forwarded_args(submatches)));
        }

        // Fully-qualified: <type> <asset-name> <task-name>.
        let asset_type = AssetType::from_wire(name).ok()?;
        let (asset_name, asset_matches) = submatches.subcommand()?;
        let (task_name, task_matches) = asset_matches.subcommand()?;
        let key = (
            asset_type.as_str(),
            asset_name.to_string(),
            task_name.to_string(),
        );
        let &index = self.qualified.get(&key)?;
        Some((&self.tasks[index], forwarded_args(task_matches)))
    }

    /// Claimed top-level alias names, for listings.
    pub fn alias_names(&self) -> Vec<&str> {
        self.aliases.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

fn build_leaf_command(
    asset: &crate::asset::Asset,
    asset_name: &str,
    task: &TaskInfo,
) -> Result<Command> {
    let problem = if task.command.is_empty() {
        Some("task command must have at least one token".to_string())
    } else if task.register_as_top_level && task.command.len() != 1 {
        // Only auto-registered tasks are held to the single-token rule;
        // fully-qualified-only tasks may carry a longer argv.
        Some(format!(
            "top-level registration requires a single-token command, got {:?}",
            task.command
        ))
    } else {
        None
    };

    if let Some(problem) = problem {
        return Err(Error::command_registration(CommandRegistrationDetails {
            asset_path: asset.path.to_string_lossy().to_string(),
            asset_name: asset_name.to_string(),
            asset_type: asset.asset_type.as_str().to_string(),
            task: task.name.clone(),
            problem,
        }));
    }

    Ok(Command::new(task.name.clone())
        .about(task.description.clone())
        .arg(
            clap::Arg::new(FORWARDED_ARGS_ID)
                .help("Arguments forwarded to the asset verbatim")
                .num_args(0..)
                .allow_hyphen_values(true)
                .trailing_var_arg(true),
        ))
}

fn forwarded_args(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>(FORWARDED_ARGS_ID)
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default()
}
