use crate::cli_args::GenerateArgs;
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use codesnap_core::{self as core, Config, Snapshot};
use colored::Colorize;
use log;
use std::path::PathBuf;

pub fn handle_generate_command(args: GenerateArgs, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let mut config = load_config_for_command(&project_root, &args.project_config, &args.filters)
        .context("Failed to load configuration")?;
    apply_output_overrides(&mut config, &args)?;

    log::info!("Starting snapshot generation for: {}", project_root.display());
    let snapshot = Snapshot::build(&project_root, &config)
        .context("Failed to build project snapshot")?;
    let document = snapshot.render();

    if args.stdout {
        output::write_to_stdout(&document)?;
    } else {
        let output_path = config.output_path(&project_root);
        core::persist_document(&output_path, &document)
            .with_context(|| format!("Failed to save snapshot to {}", output_path.display()))?;
        if !quiet {
            println!(
                "{} All {} files have been concatenated into {}",
                "✅".green(),
                snapshot.files.len(),
                output_path.display().to_string().blue()
            );
        }
    }
    output::print_diagnostics(&snapshot.diagnostics, quiet);
    Ok(())
}

fn apply_output_overrides(config: &mut Config, args: &GenerateArgs) -> Result<()> {
    if let Some(path) = &args.output {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                core::AppError::InvalidArgument(format!(
                    "Output path '{}' has no file name",
                    path.display()
                ))
            })?;
        config.output.filename = Some(filename);
        config.output.output_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from);
    }
    if let Some(max_lines) = args.max_lines {
        config.truncate.max_lines = max_lines;
    }
    Ok(())
}
