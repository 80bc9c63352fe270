use crate::cli_args::ConfigArgs;
use crate::output;
use anyhow::{Context, Result, bail};
use codesnap_core::Config;
use colored::Colorize;
use std::fs;

pub fn handle_config_command(args: &ConfigArgs, quiet: bool) -> Result<()> {
    let default_toml = Config::default()
        .to_toml_string()
        .context("Failed to serialize default configuration")?;

    if !args.save {
        return output::write_to_stdout(&default_toml);
    }

    let project_root = Config::determine_project_root(args.project_root.as_ref())
        .context("Failed to determine project root")?;
    let config_path = Config::default_config_path(&project_root);
    if config_path.exists() && !args.force {
        bail!(
            "Config file already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(&config_path, default_toml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    if !quiet {
        println!(
            "{} Default config saved to: {}",
            "✅".green(),
            config_path.display().to_string().blue()
        );
    }
    Ok(())
}
