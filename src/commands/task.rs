use distgo::invoke::{invoke, TaskInvocation};
use distgo::project::ProjectConfig;
use distgo::tree::TaskCommand;

/// Run a single asset task resolved from the command tree.
///
/// Direct task invocations see the full product→dist config context;
/// narrowing to one asset's view is the verify aggregator's concern.
pub fn run(task: &TaskCommand, forwarded_args: &[String]) -> distgo::Result<()> {
    let project = ProjectConfig::load_or_default()?;
    let dister_configs = project.dister_configs();
    let output_infos = project.output_infos();

    invoke(&TaskInvocation {
        asset_path: &task.asset_path,
        command: &task.task.command,
        dister_configs: &dister_configs,
        output_infos: &output_infos,
        forwarded_args,
    })
}
