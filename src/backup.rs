//! # Pre-run Backup
//!
//! Before any repository definition is rewritten, the configuration tree is
//! archived so an operator can restore it by hand. The engine refuses to
//! mutate anything when this step fails.
//!
//! [`TarGzBackup`] writes `apt-sources-<YYYYmmdd-HHMMSS>.tar.gz` into its
//! backup directory. Archive member names are the source paths with the
//! leading `/` removed, so the archive can be unpacked at `/` to restore.
//! Relative paths and `..` are resolved first.
//! Existing backups are never overwritten or pruned.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;
use tar::Builder;

use crate::error::{Error, Result};

/// Something that can snapshot the configuration tree before mutation.
pub trait Backup {
    /// Archive `paths` (files or directories). Returns the archive location.
    fn create(&self, paths: &[&Path]) -> Result<PathBuf>;
}

/// Gzip-compressed tar archive backups.
#[derive(Debug, Clone)]
pub struct TarGzBackup {
    dir: PathBuf,
}

impl TarGzBackup {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Open a fresh archive file, never reusing an existing name.
    fn open_archive(&self) -> io::Result<(PathBuf, File)> {
        let stamp = Local::now().format("%Y%m%d-%H%M%S").to_string();

        for attempt in 0..100 {
            let name = if attempt == 0 {
                format!("apt-sources-{}.tar.gz", stamp)
            } else {
                format!("apt-sources-{}-{}.tar.gz", stamp, attempt)
            };
            let path = self.dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "no free backup file name",
        ))
    }

    fn write_archive(file: File, paths: &[PathBuf]) -> io::Result<()> {
        let encoder = GzEncoder::new(file, Compression::default());
        let mut archive = Builder::new(encoder);
        archive.follow_symlinks(false);

        for path in paths {
            let name = path.strip_prefix("/").unwrap_or(path);
            if path.is_dir() {
                archive.append_dir_all(name, path)?;
            } else {
                archive.append_path_with_name(path, name)?;
            }
        }

        let encoder = archive.into_inner()?;
        encoder.finish()?.sync_all()?;
        Ok(())
    }
}

/// Absolute, `..`-free locations to archive for `path`.
///
/// The parent directory is resolved but the last component is kept, so a
/// symlink is stored as a link. Its target is archived as well.
fn resolve(path: &Path) -> io::Result<Vec<PathBuf>> {
    let location = match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            fs::canonicalize(parent)?.join(name)
        }
        _ => fs::canonicalize(path)?,
    };

    let mut resolved = vec![fs::canonicalize(&location)?];
    if fs::symlink_metadata(&location)?.file_type().is_symlink() {
        resolved.insert(0, location);
    }
    Ok(resolved)
}

impl Backup for TarGzBackup {
    fn create(&self, paths: &[&Path]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::Backup {
            message: format!(
                "cannot create backup directory {}: {}",
                self.dir.display(),
                e
            ),
        })?;

        let mut sources = Vec::new();
        for path in paths {
            let resolved = resolve(path).map_err(|e| Error::Backup {
                message: format!("cannot resolve {}: {}", path.display(), e),
            })?;
            sources.extend(resolved);
        }

        let (archive_path, file) = self.open_archive().map_err(|e| Error::Backup {
            message: format!("cannot create archive in {}: {}", self.dir.display(), e),
        })?;

        if let Err(e) = Self::write_archive(file, &sources) {
            let _ = fs::remove_file(&archive_path);
            return Err(Error::Backup {
                message: format!("failed writing {}: {}", archive_path.display(), e),
            });
        }

        info!("Backup written to {}", archive_path.display());
        Ok(archive_path)
    }
}
