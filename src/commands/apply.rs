//! Apply command implementation
//!
//! The apply command runs the full engine:
//! 1. Back up the configuration tree (the run stops if this fails)
//! 2. Rewrite the main source list
//! 3. Rewrite every source file under the sources directory
//! 4. Optionally refresh the package index

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use apt_components::backup::TarGzBackup;
use apt_components::engine::{Engine, RunSummary};
use apt_components::output::{emoji, status_line, summary_line, OutputConfig};
use apt_components::refresh::{CommandRefresher, IndexRefresher};
use apt_components::rewrite::WriteMode;

use super::SelectionArgs;

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Directory backups are written to [default: /var/backups/apt-components]
    #[arg(long, value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Run `apt-get update` after files were changed
    #[arg(long)]
    pub refresh_index: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the apply command
pub fn execute(args: ApplyArgs, output: &OutputConfig) -> Result<()> {
    let config = args.selection.resolve(args.backup_dir.clone())?;
    let mode = if args.dry_run {
        WriteMode::DryRun
    } else {
        WriteMode::InPlace
    };

    if !args.quiet && args.dry_run {
        println!(
            "{} DRY RUN MODE - No changes will be made",
            emoji(output, "🔎", "[DRY RUN]")
        );
        println!();
    }

    let backup = TarGzBackup::new(config.backup_dir());
    let summary = Engine::new(&config)
        .with_backup(&backup)
        .run(mode)
        .context("Refusing to modify repository definitions")?;

    if !args.quiet {
        if let Some(path) = &summary.backup {
            println!("{} Backup: {}", emoji(output, "📦", "[BACKUP]"), path.display());
        }
        for outcome in &summary.outcomes {
            println!("{}", status_line(output, outcome, summary.dry_run));
        }
        for path in &summary.missing {
            println!("   Not found: {}", path.display());
        }
        println!("{}", summary_line(output, &summary));
    }

    if summary.has_errors() {
        let paths: Vec<String> = summary
            .error_paths()
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        anyhow::bail!(
            "{} file(s) could not be processed: {}",
            paths.len(),
            paths.join(", ")
        );
    }

    refresh_after(args.refresh_index, &summary, &CommandRefresher::default())?;

    Ok(())
}

/// Refresh the index when asked to, after an in-place run that changed files
/// without errors. Returns whether the refresher ran.
fn refresh_after(
    enabled: bool,
    summary: &RunSummary,
    refresher: &dyn IndexRefresher,
) -> Result<bool> {
    if !enabled || summary.dry_run || summary.has_errors() || summary.changed() == 0 {
        return Ok(false);
    }
    refresher.refresh()?;
    Ok(true)
}
