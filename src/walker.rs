//! Directory traversal for repository definition files

use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::defaults::SOURCE_SUFFIXES;
use crate::error::Error;
use crate::rewrite::{FileOutcome, FileRewriter, FileStatus};

/// Whether a file name carries one of the recognised suffixes.
pub fn is_source_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| SOURCE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
}

/// What a walk over one directory produced.
#[derive(Debug, Default)]
pub struct WalkReport {
    pub outcomes: Vec<FileOutcome>,
    /// Set when the directory itself does not exist.
    pub missing: Option<PathBuf>,
}

/// Feeds every source file under a directory to a [`FileRewriter`].
#[derive(Debug, Clone, Copy)]
pub struct DirectoryWalker<'a> {
    rewriter: FileRewriter<'a>,
}

impl<'a> DirectoryWalker<'a> {
    pub fn new(rewriter: FileRewriter<'a>) -> Self {
        Self { rewriter }
    }

    /// Process every `.list` and `.sources` file below `dir`, at any depth,
    /// in file-name order.
    ///
    /// Per-file failures become `Error` outcomes and do not stop the walk. A
    /// missing directory is recorded in the report.
    pub fn walk(&self, dir: &Path) -> WalkReport {
        let mut report = WalkReport::default();

        if !dir.is_dir() {
            warn!("Source directory not found: {}", dir.display());
            report.missing = Some(dir.to_path_buf());
            return report;
        }

        for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(dir).to_path_buf();
                    warn!("Skipping {}: {}", path.display(), e);
                    report.outcomes.push(FileOutcome {
                        path,
                        status: FileStatus::Error(Error::WalkDir(e)),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_source_file(entry.path()) {
                continue;
            }

            debug!("Processing {}", entry.path().display());
            report.outcomes.push(self.rewriter.process(entry.path()));
        }

        report
    }
}
