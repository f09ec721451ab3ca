//! # File Rewriting
//!
//! This module turns one repository definition file into its augmented form
//! and, when that differs from what is on disk, replaces the file atomically.
//!
//! ## Process
//!
//! 1.  **Read**: the file must be valid UTF-8.
//! 2.  **Classify**: [`crate::format::classify`] picks the parser.
//! 3.  **Parse**: into a [`ListDocument`] or [`StanzaDocument`], keeping every
//!     byte that is not part of an entry.
//! 4.  **Augment**: [`ComponentAugmenter`] appends missing components.
//! 5.  **Compare**: identical output means nothing is written.
//! 6.  **Replace**: the new content goes to a temporary file in the same
//!     directory, which is flushed, given the original's permissions, and
//!     renamed over the original. A symlinked file is resolved first, so the
//!     link survives and its target receives the new content.
//!
//! The temporary file is owned by a [`tempfile::NamedTempFile`]: it is either
//! persisted by the rename or removed when dropped, so a failed write never
//! leaves a partial file behind and never touches the original.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use tempfile::NamedTempFile;

use crate::augment::ComponentAugmenter;
use crate::config::EngineConfig;
use crate::entry::{LineError, ListDocument, StanzaDocument};
use crate::error::{Error, Result};
use crate::format::{classify, Format};

/// Result of processing one file.
#[derive(Debug)]
pub enum FileStatus {
    /// Content already satisfied the requirements; nothing was written.
    Unchanged,
    /// Content was (or, in a dry run, would be) rewritten.
    Changed,
    /// The file was skipped and left untouched.
    Error(Error),
}

/// A file path and what happened to it.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self.status, FileStatus::Changed)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, FileStatus::Error(_))
    }
}

/// Whether changes are written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    InPlace,
    DryRun,
}

/// The in-memory result of rewriting some content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub format: Format,
    pub content: String,
    /// Number of entries or stanzas that received components.
    pub updated: usize,
}

impl Rewrite {
    pub fn is_changed(&self) -> bool {
        self.updated > 0
    }
}

/// Rewrite file content in memory.
///
/// Never touches the filesystem; [`FileRewriter`] builds on it.
pub fn rewrite_content(
    content: &str,
    config: &EngineConfig,
) -> std::result::Result<Rewrite, LineError> {
    let augmenter = ComponentAugmenter::new(config);
    let format = classify(content);

    let (content, updated) = match format {
        Format::OneLine => {
            let mut doc = ListDocument::parse(content)?;
            let updated = augmenter.augment_list(&mut doc);
            (doc.render(), updated)
        }
        Format::Deb822 => {
            let mut doc = StanzaDocument::parse(content)?;
            let updated = augmenter.augment_stanzas(&mut doc);
            (doc.render(), updated)
        }
    };

    Ok(Rewrite {
        format,
        content,
        updated,
    })
}

/// Processes individual repository definition files.
#[derive(Debug, Clone, Copy)]
pub struct FileRewriter<'a> {
    config: &'a EngineConfig,
    mode: WriteMode,
}

impl<'a> FileRewriter<'a> {
    pub fn new(config: &'a EngineConfig, mode: WriteMode) -> Self {
        Self { config, mode }
    }

    /// Process one file, turning every failure into an `Error` outcome.
    pub fn process(&self, path: &Path) -> FileOutcome {
        let status = match self.try_process(path) {
            Ok(true) => FileStatus::Changed,
            Ok(false) => FileStatus::Unchanged,
            Err(e) => {
                warn!("{}", e);
                FileStatus::Error(e)
            }
        };
        FileOutcome {
            path: path.to_path_buf(),
            status,
        }
    }

    /// Process one file. Returns whether it changed.
    ///
    /// A symlink is followed: its target is rewritten and the link is kept.
    pub fn try_process(&self, path: &Path) -> Result<bool> {
        let read_error = |source: std::io::Error| Error::Read {
            path: path.to_path_buf(),
            source,
        };
        let target = fs::canonicalize(path).map_err(read_error)?;
        let bytes = fs::read(&target).map_err(read_error)?;
        let original = String::from_utf8(bytes).map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            line: None,
            message: format!("file is not valid UTF-8: {}", e),
        })?;

        let rewrite = rewrite_content(&original, self.config)
            .map_err(|e| Error::parse_at(path, e.line, e.message))?;
        debug!("{}: {} format", path.display(), rewrite.format);

        if rewrite.content == original {
            debug!("{}: unchanged", path.display());
            return Ok(false);
        }

        match self.mode {
            WriteMode::DryRun => {
                info!(
                    "{}: would update {} entr{}",
                    path.display(),
                    rewrite.updated,
                    if rewrite.updated == 1 { "y" } else { "ies" }
                );
            }
            WriteMode::InPlace => {
                write_atomic(&target, rewrite.content.as_bytes())?;
                info!(
                    "{}: updated {} entr{}",
                    path.display(),
                    rewrite.updated,
                    if rewrite.updated == 1 { "y" } else { "ies" }
                );
            }
        }

        Ok(true)
    }
}

/// Replace `path` with `content` through a temporary file and a rename.
///
/// The original's permissions (and, on Unix, ownership) are carried over.
/// On any failure the original is left as it was.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let write_error = |message: String| Error::Write {
        path: path.to_path_buf(),
        message,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let metadata = fs::metadata(path).ok();

    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|e| write_error(format!("failed to create temporary file: {}", e)))?;

    temp.write_all(content)
        .map_err(|e| write_error(format!("failed to write temporary file: {}", e)))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| write_error(format!("failed to flush temporary file: {}", e)))?;

    if let Some(metadata) = &metadata {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(|e| write_error(format!("failed to set permissions: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            if let Err(e) =
                std::os::unix::fs::fchown(temp.as_file(), Some(metadata.uid()), Some(metadata.gid()))
            {
                warn!("{}: could not preserve ownership: {}", path.display(), e);
            }
        }
    }

    temp.persist(path)
        .map_err(|e| write_error(format!("failed to replace file: {}", e.error)))?;

    Ok(())
}
