//! # Check Command Implementation
//!
//! This module implements the `check` subcommand: a read-only pass over the
//! same files `apply` would touch. Nothing is written and no backup is made.
//!
//! Files that would change are listed with a `~` marker. The command exits
//! non-zero when any file would change or could not be processed, which makes
//! it usable as a compliance probe from scripts.

use anyhow::Result;
use clap::Args;

use apt_components::engine::Engine;
use apt_components::output::{status_line, summary_line, OutputConfig};
use apt_components::rewrite::WriteMode;

use super::SelectionArgs;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Only print the summary line
    #[arg(long)]
    pub summary: bool,
}

/// Execute the `check` command.
pub fn execute(args: CheckArgs, output: &OutputConfig) -> Result<()> {
    let config = args.selection.resolve(None)?;
    let summary = Engine::new(&config).run(WriteMode::DryRun)?;

    if args.summary {
        println!("{}", summary_line(output, &summary));
    } else {
        let pending: Vec<_> = summary.outcomes.iter().filter(|o| o.is_changed()).collect();
        if !pending.is_empty() {
            println!("Files to update:");
            for outcome in &pending {
                println!("  ~ {}", outcome.path.display());
            }
            println!();
        }
        for outcome in summary.outcomes.iter().filter(|o| o.is_error()) {
            println!("{}", status_line(output, outcome, true));
        }
        println!("{}", summary_line(output, &summary));
    }

    if summary.has_errors() {
        anyhow::bail!("{} file(s) could not be processed", summary.errors());
    }
    if summary.changed() > 0 {
        anyhow::bail!(
            "{} file(s) are missing required components",
            summary.changed()
        );
    }

    Ok(())
}
