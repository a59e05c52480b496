use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use scanorder_core::PadWidth;
use std::path::PathBuf;

use super::types::{OutputFormat, PreviewArg};

/// Sort, interleave and rename scanned page images into reading order
#[derive(Parser, Debug)]
#[command(name = "scanorder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Run as if started in <path> instead of the current working directory
    #[arg(short = 'C', global = true, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Assume yes for all prompts
    #[arg(short = 'y', long = "yes", global = true, env = "SCANORDER_YES")]
    pub yes: bool,

    /// Output format for machine consumption (defaults to the config value)
    #[arg(long, global = true, value_enum)]
    pub output: Option<OutputFormat>,
}

/// Arguments shared by the commands that build a plan
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// A folder of scans, or several files from the same folder
    #[arg(required = true, value_name = "PATH")]
    pub inputs: Vec<String>,

    /// Digits in the page number: 'dynamic' (at least 3) or a fixed count
    #[arg(long, value_name = "WIDTH")]
    pub pad_width: Option<PadWidth>,

    /// Preview format
    #[arg(long, value_enum)]
    pub preview: Option<PreviewArg>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the reorder plan for a folder and save it for `apply`
    Plan {
        #[command(flatten)]
        batch: BatchArgs,

        /// Show the plan without saving it
        #[arg(long)]
        dry_run: bool,
    },

    /// Sort, interleave and rename in one step
    Reorder {
        #[command(flatten)]
        batch: BatchArgs,

        /// Show the plan and its predicted outcome without renaming anything
        #[arg(long)]
        dry_run: bool,

        /// Copy the pages into DIR instead of renaming them in place
        /// (default: <folder>_reordered next to the folder)
        #[arg(long, value_name = "DIR", num_args = 0..=1)]
        copy_to: Option<Option<String>>,
    },

    /// Apply a saved plan
    Apply {
        /// Plan ID to apply (default: the most recently saved plan)
        id: Option<String>,
    },

    /// Put the files of the last batch back under their original names
    Undo,

    /// Show pending undo history and saved plans
    Status,

    /// Forget the pending undo history without renaming anything
    Discard,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,

        /// Write the completion file into this directory instead of stdout
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
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
    fn test_parse_reorder_with_globals() {
        let cli = Cli::try_parse_from([
            "scanorder",
            "reorder",
            "scans",
            "--pad-width",
            "4",
            "-y",
            "--output",
            "json",
        ])
        .unwrap();

        assert!(cli.yes);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        match cli.command {
            Commands::Reorder {
                batch,
                dry_run,
                copy_to,
            } => {
                assert_eq!(batch.inputs, vec!["scans".to_string()]);
                assert_eq!(batch.pad_width, Some(PadWidth::Fixed(4)));
                assert!(!dry_run);
                assert_eq!(copy_to, None);
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_pad_width() {
        let result = Cli::try_parse_from(["scanorder", "plan", "scans", "--pad-width", "wide"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["scanorder", "plan", "scans", "--pad-width", "100000"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_copy_to_with_and_without_dir() {
        let cli = Cli::try_parse_from(["scanorder", "reorder", "scans", "--copy-to"]).unwrap();
        match cli.command {
            Commands::Reorder { batch, copy_to, .. } => {
                assert_eq!(copy_to, Some(None));
                assert_eq!(batch.inputs, vec!["scans".to_string()]);
            },
            other => panic!("unexpected command: {other:?}"),
        }

        let cli =
            Cli::try_parse_from(["scanorder", "reorder", "scans", "--copy-to", "out"]).unwrap();
        match cli.command {
            Commands::Reorder { copy_to, .. } => {
                assert_eq!(copy_to, Some(Some("out".to_string())));
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_reorder_requires_inputs() {
        let result = Cli::try_parse_from(["scanorder", "reorder"]);
        assert!(result.is_err());
    }
}
