use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        long,
        help = "Specify the directory to snapshot (default: current dir).",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Specify path/filename of the TOML config file (default: .xtools/codesnap/codesnap.toml).",
        value_name = "CONFIG_FILE",
        conflicts_with = "disable_config",
        help_heading = "Project Setup"
    )]
    pub config: Option<String>,

    #[arg(
        long,
        help = "Disable loading any TOML config file.",
        conflicts_with = "config",
        help_heading = "Project Setup"
    )]
    pub disable_config: bool,

    #[arg(
        long,
        help = "Specify the project name used for the tree root and output file name.",
        value_name = "NAME",
        help_heading = "Project Setup"
    )]
    pub project_name: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterOpts {
    #[arg(
        long = "exclude",
        value_name = "GLOB",
        action = clap::ArgAction::Append,
        help = "Add a glob (relative to the project root) to exclude.",
        help_heading = "Filtering"
    )]
    pub exclude: Vec<String>,

    #[arg(
        long,
        help = "Do not read the project's ignore file.",
        help_heading = "Filtering"
    )]
    pub no_ignore_file: bool,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Snapshot a codebase into a single text document.",
    long_about = "codesnap walks a project directory, applies ignore rules, and writes one document \ncontaining statistics, a folder map, a file index, and the content of every included file.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  codesnap generate\n  codesnap generate --stdout --exclude 'docs/**'\n  codesnap stats -f json\n  codesnap tree",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv, -vvv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "g",
        about = "Generate the snapshot document."
    )]
    Generate(GenerateArgs),

    #[command(
        visible_alias = "s",
        about = "Calculate and display snapshot statistics."
    )]
    Stats(StatsArgs),

    #[command(visible_alias = "t", about = "Print the folder structure.")]
    Tree(TreeArgs),

    #[command(about = "Show or save the default configuration file.")]
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub filters: FilterOpts,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the snapshot to FILE instead of <project>_output.txt.",
        help_heading = "Output Control",
        conflicts_with = "stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        help = "Write the snapshot to standard output.",
        help_heading = "Output Control"
    )]
    pub stdout: bool,

    #[arg(
        long,
        value_name = "N",
        help = "Override the line threshold for truncated file types.",
        help_heading = "Output Control"
    )]
    pub max_lines: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub filters: FilterOpts,

    #[arg(short = 'f', long, help = "Print structured output instead of a table.", value_name = "FORMAT", value_parser = ["json", "yaml"])]
    pub format: Option<String>,

    #[arg(long, help = "Pretty-print JSON output.")]
    pub pretty: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub filters: FilterOpts,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        long,
        help = "Specify the project directory to save the config into (default: current dir).",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "Save the default config to .xtools/codesnap/codesnap.toml."
    )]
    pub save: bool,

    #[arg(long, requires = "save", help = "Overwrite an existing config file.")]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_collects_repeated_excludes() {
        let cli = Cli::parse_from([
            "codesnap",
            "generate",
            "--exclude",
            "docs/**",
            "--exclude",
            "*.md",
            "--max-lines",
            "50",
        ]);
        match cli.command {
            Some(Commands::Generate(args)) => {
                assert_eq!(args.filters.exclude, vec!["docs/**", "*.md"]);
                assert_eq!(args.max_lines, Some(50));
                assert!(!args.stdout);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_output_conflicts_with_stdout() {
        let result = Cli::try_parse_from(["codesnap", "g", "-o", "x.txt", "--stdout"]);
        assert!(result.is_err());
    }
}
