use clap::Args;
use distgo::asset::AssetRegistry;
use distgo::project::ProjectConfig;
use distgo::verify;

#[derive(Args)]
pub struct VerifyArgs {
    /// Apply fixes instead of only checking
    #[arg(long)]
    pub apply: bool,
}

/// Run every registered verify task across the registry.
///
/// The project configuration is only resolved when at least one verify task
/// exists.
pub fn run(args: VerifyArgs, registry: &AssetRegistry) -> distgo::Result<()> {
    let tasks = verify::verify_tasks(registry);

    verify::run(
        &tasks,
        args.apply,
        || {
            let project = ProjectConfig::load_or_default()?;
            Ok((project.dister_configs(), project.output_infos()))
        },
        &mut std::io::stderr(),
    )
}
