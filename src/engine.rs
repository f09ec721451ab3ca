//! Orchestrator for a complete run
//!
//! This module coordinates the backup, the main list file and the directory
//! walk into a single [`RunSummary`]:
//!
//! 1. Create the backup (skipped in a dry run). Failure aborts the run before
//!    any file is read for rewriting.
//! 2. Rewrite the main one-line list, when present.
//! 3. Walk the sources directory.

use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::backup::Backup;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::rewrite::{FileOutcome, FileRewriter, FileStatus, WriteMode};
use crate::walker::DirectoryWalker;

/// Aggregate result of one run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<FileOutcome>,
    /// Configured paths that did not exist.
    pub missing: Vec<PathBuf>,
    /// Archive created before mutation; `None` in a dry run.
    pub backup: Option<PathBuf>,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn changed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_changed()).count()
    }

    pub fn errors(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_error()).count()
    }

    pub fn unchanged(&self) -> usize {
        self.outcomes.len() - self.changed() - self.errors()
    }

    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }

    pub fn error_paths(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter(|o| o.is_error())
            .map(|o| o.path.as_path())
            .collect()
    }
}

/// Runs the rewrite over the configured tree.
pub struct Engine<'a> {
    config: &'a EngineConfig,
    backup: Option<&'a dyn Backup>,
}

impl<'a> Engine<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            backup: None,
        }
    }

    /// Use `backup` to snapshot the tree before an in-place run.
    pub fn with_backup(mut self, backup: &'a dyn Backup) -> Self {
        self.backup = Some(backup);
        self
    }

    /// Execute one run.
    ///
    /// An in-place run requires a backup; without one, or when it fails,
    /// `Error::Backup` is returned and nothing is touched. Per-file problems
    /// are reported in the summary instead.
    pub fn run(&self, mode: WriteMode) -> Result<RunSummary> {
        let sources_list = self.config.sources_list();
        let sources_dir = self.config.sources_dir();

        let mut summary = RunSummary {
            dry_run: mode == WriteMode::DryRun,
            ..Default::default()
        };

        if mode == WriteMode::InPlace {
            let backup = self.backup.ok_or_else(|| Error::Backup {
                message: "no backup configured; refusing to modify files".to_string(),
            })?;
            let targets: Vec<&Path> = [sources_list, sources_dir]
                .into_iter()
                .filter(|p| p.exists())
                .collect();
            summary.backup = Some(backup.create(&targets)?);
        }

        let rewriter = FileRewriter::new(self.config, mode);

        if sources_list.is_file() {
            summary.outcomes.push(rewriter.process(sources_list));
        } else if sources_list.exists() {
            warn!("Source list is not a regular file: {}", sources_list.display());
            summary.outcomes.push(FileOutcome {
                path: sources_list.to_path_buf(),
                status: FileStatus::Error(Error::Read {
                    path: sources_list.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
                }),
            });
        } else {
            warn!("Source list not found: {}", sources_list.display());
            summary.missing.push(sources_list.to_path_buf());
        }

        let report = DirectoryWalker::new(rewriter).walk(sources_dir);
        summary.outcomes.extend(report.outcomes);
        summary.missing.extend(report.missing);

        info!(
            "{} changed, {} unchanged, {} failed",
            summary.changed(),
            summary.unchanged(),
            summary.errors()
        );

        Ok(summary)
    }
}
