use crate::cli_args::StatsArgs;
use crate::load_config_for_command;
use crate::output::{self, print_stats_pretty_table};
use anyhow::{Context, Result};
use codesnap_core::{self as core, Config, output_formats};
use log;

pub fn handle_stats_command(args: StatsArgs, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    let config = load_config_for_command(&project_root, &args.project_config, &args.filters)
        .context("Failed to load configuration for stats command")?;

    log::debug!("Scanning project for statistics...");
    let scan = core::scan_project(&project_root, &config)
        .context("Failed to scan project for statistics")?;
    let (statistics, stat_errors) = core::collect_statistics(&scan.files);

    match args.format.as_deref() {
        Some("json") => {
            output::write_to_stdout(&output_formats::serialize_to_json(&statistics, args.pretty)?)?
        }
        Some("yaml") => output::write_to_stdout(&output_formats::serialize_to_yaml(&statistics)?)?,
        _ => print_stats_pretty_table(&statistics)?,
    }

    let diagnostics: Vec<_> = scan.diagnostics.into_iter().chain(stat_errors).collect();
    output::print_diagnostics(&diagnostics, quiet);
    Ok(())
}
