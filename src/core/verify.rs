//! Runs every asset's verify task across the registry and folds the
//! independent outcomes into one pass/fail result.

use std::io::Write;
use std::path::PathBuf;

use crate::asset::{AssetRegistry, AssetType, TaskInfo};
use crate::config::{filter_dister_configs, ProductDisterConfigs, ProductOutputInfos};
use crate::error::{Error, Result};
use crate::invoke::{invoke, TaskInvocation};

/// A verify-capable task, derived once from the registry.
#[derive(Debug, Clone)]
pub struct VerifyTask {
    pub asset_path: PathBuf,
    pub asset_name: String,
    pub asset_type: AssetType,
    pub task: TaskInfo,
}

/// Collect verify tasks in registry order: AssetType natural order, then
/// discovery order within type, then lexicographic task order per asset.
pub fn verify_tasks(registry: &AssetRegistry) -> Vec<VerifyTask> {
    let mut tasks = Vec::new();

    for asset in registry.assets_with_catalogs() {
        let Some(catalog) = asset.catalog.as_ref() else {
            continue;
        };

        for task in catalog.tasks.values() {
            if task.verify_options.is_some() {
                tasks.push(VerifyTask {
                    asset_path: asset.path.clone(),
                    asset_name: catalog.asset_name.clone(),
                    asset_type: asset.asset_type,
                    task: task.clone(),
                });
            }
        }
    }

    tasks
}

/// Run all verify tasks, in order, never stopping at an individual failure.
///
/// With no tasks registered this succeeds immediately and `resolve_context`
/// is never called. Otherwise the shared context is resolved once, each
/// task sees only the config entries owned by its asset, and `apply` picks
/// between the task's apply-true and apply-false argument variants.
///
/// Per-task failures are written to `stderr` as they happen (silent
/// sentinels carry no text and add nothing); if any task failed the return
/// value is a single message-less sentinel so the exit code reflects
/// failure without re-printing anything.
pub fn run<F>(tasks: &[VerifyTask], apply: bool, resolve_context: F, stderr: &mut dyn Write) -> Result<()>
where
    F: FnOnce() -> Result<(ProductDisterConfigs, ProductOutputInfos)>,
{
    if tasks.is_empty() {
        return Ok(());
    }

    let (dister_configs, output_infos) = resolve_context()?;

    let mut failed = false;
    for entry in tasks {
        crate::log_status!("verify", "running {} for {}", entry.task.name, entry.asset_name);

        if let Err(err) = run_one(entry, apply, &dister_configs, &output_infos) {
            if !err.message.is_empty() {
                let _ = writeln!(stderr, "{}", err.message);
            }
            failed = true;
        }
    }

    if failed {
        Err(Error::asset_task_failed(1))
    } else {
        Ok(())
    }
}

fn run_one(
    entry: &VerifyTask,
    apply: bool,
    dister_configs: &ProductDisterConfigs,
    output_infos: &ProductOutputInfos,
) -> Result<()> {
    // verify_tasks only collects tasks that carry options; a hand-built
    // entry without them has nothing to run.
    let Some(options) = entry.task.verify_options.as_ref() else {
        return Ok(());
    };

    let forwarded = if apply {
        &options.apply_true_args
    } else {
        &options.apply_false_args
    };

    let filtered = filter_dister_configs(dister_configs, &entry.asset_name);

    invoke(&TaskInvocation {
        asset_path: &entry.asset_path,
        command: &entry.task.command,
        dister_configs: &filtered,
        output_infos,
        forwarded_args: forwarded,
    })
}
