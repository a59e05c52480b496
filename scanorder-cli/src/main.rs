use anyhow::Result;
use clap::{CommandFactory, Parser};
use scanorder_core::interrupt::prompt_active;
use scanorder_core::operations::state_dir;
use scanorder_core::{Config, OutputFormat as CoreOutputFormat, ReorderError};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

mod apply;
mod cli;
mod discard;
mod plan;
mod reorder;
mod status;
mod undo;

use cli::{Cli, Commands};

/// Settings every command handler needs, resolved from flags and config
pub struct RunContext {
    pub working_dir: Option<PathBuf>,
    pub output: CoreOutputFormat,
    pub use_color: Option<bool>,
    pub yes: bool,
}

fn main() {
    let interrupted = Arc::new(AtomicBool::new(false));

    // Handle SIGINT (Ctrl-C). A pending prompt has not renamed anything yet,
    // so it can end right away; a running batch finishes first.
    let interrupted_clone = Arc::clone(&interrupted);
    if let Err(e) = ctrlc::set_handler(move || {
        if prompt_active() {
            eprintln!("\nInterrupted");
            process::exit(130);
        }
        eprintln!("\nReceived SIGINT. Finishing the current batch...");
        interrupted_clone.store(true, Ordering::SeqCst);
    }) {
        eprintln!("Warning: Failed to set SIGINT handler: {e}");
    }

    // Handle SIGTERM
    if let Err(e) =
        signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&interrupted))
    {
        eprintln!("Warning: Failed to set SIGTERM handler: {e}");
    }

    let cli = Cli::parse();

    let ctx = match resolve_context(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(exit_code_for(&e));
        },
    };

    let result = match cli.command {
        Commands::Plan { batch, dry_run } => plan::handle_plan(batch, dry_run, &ctx),
        Commands::Reorder {
            batch,
            dry_run,
            copy_to,
        } => reorder::handle_reorder(batch, dry_run, copy_to, &ctx),
        Commands::Apply { id } => apply::handle_apply(id, &ctx),
        Commands::Undo => undo::handle_undo(&ctx),
        Commands::Status => status::handle_status(&ctx),
        Commands::Discard => discard::handle_discard(&ctx),
        Commands::Completions { shell, out_dir } => {
            let mut cmd = Cli::command();
            match out_dir {
                Some(dir) => generate_completions(shell, &mut cmd, "scanorder", &dir),
                None => {
                    clap_complete::generate(shell, &mut cmd, "scanorder", &mut io::stdout());
                    Ok(())
                },
            }
            .map(|()| true)
        },
    };

    // Renames already made are recorded in the session, so stopping here is safe
    if interrupted.load(Ordering::SeqCst) {
        eprintln!("Operation interrupted");
        process::exit(130);
    }

    match result {
        Ok(true) => process::exit(0),
        // Some renames or restores failed; the summary lists them
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(exit_code_for(&e));
        },
    }
}

fn resolve_context(cli: &Cli) -> Result<RunContext> {
    let working_dir = cli.directory.clone();
    let config = Config::load(&state_dir(working_dir.as_deref())?)?;

    let output = match cli.output {
        Some(output) => output.into(),
        None => config.output_format()?,
    };
    let use_color = if cli.no_color {
        Some(false)
    } else {
        config.defaults.use_color
    };

    Ok(RunContext {
        working_dir,
        output,
        use_color,
        yes: cli.yes,
    })
}

/// 2 for invalid input or a structural problem with the batch, 3 otherwise
fn exit_code_for(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<ReorderError>().is_some() {
        2
    } else {
        3
    }
}

pub fn generate_completions<G: clap_complete::Generator>(
    gen: G,
    cmd: &mut clap::Command,
    name: &str,
    out_dir: &Path,
) -> Result<()> {
    use clap_complete::generate_to;
    use std::fs;

    fs::create_dir_all(out_dir)?;
    let path = generate_to(gen, cmd, name, out_dir)?;
    println!("Generated completion file: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap_complete::Shell;
    use tempfile::TempDir;

    #[test]
    fn test_generate_completions_bash() {
        let temp_dir = TempDir::new().unwrap();
        let mut cmd = Cli::command();

        generate_completions(Shell::Bash, &mut cmd, "scanorder", temp_dir.path()).unwrap();

        let completion_file = temp_dir.path().join("scanorder.bash");
        let content = std::fs::read_to_string(completion_file).unwrap();
        assert!(content.contains("complete"));
        assert!(content.contains("reorder"));
    }

    #[test]
    fn test_structural_errors_map_to_exit_code_2() {
        let err = anyhow::Error::new(ReorderError::NoSupportedFiles {
            path: "scans".to_string(),
        });
        assert_eq!(exit_code_for(&err), 2);

        let err = anyhow::Error::new(ReorderError::PendingHistory { pending: 3 })
            .context("Cannot ask for confirmation");
        assert_eq!(exit_code_for(&err), 2);

        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(exit_code_for(&err), 3);
    }
}
