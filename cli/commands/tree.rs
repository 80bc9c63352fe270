use crate::cli_args::TreeArgs;
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use codesnap_core::{self as core, Config};

pub fn handle_tree_command(args: TreeArgs) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    let config = load_config_for_command(&project_root, &args.project_config, &args.filters)
        .context("Failed to load configuration for tree command")?;

    let scan = core::scan_project(&project_root, &config)
        .context("Failed to scan project directory")?;
    output::write_to_stdout(&scan.tree.join("\n"))
}
