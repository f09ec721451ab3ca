//! Default values for apt-components configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication. Every value here can be
//! overridden by the configuration file or a CLI flag.

use std::path::PathBuf;

/// Components every official entry must carry, in the order they are appended.
pub const COMPONENTS: &[&str] = &["contrib", "non-free", "non-free-firmware"];

/// URI substrings identifying the distribution's own mirrors.
pub const MIRRORS: &[&str] = &["deb.debian.org", "security.debian.org", "ftp.debian.org"];

/// File name suffixes the directory walker picks up.
pub const SOURCE_SUFFIXES: &[&str] = &[".list", ".sources"];

/// Returns the path of the main one-line source list.
pub fn default_sources_list() -> PathBuf {
    PathBuf::from("/etc/apt/sources.list")
}

/// Returns the directory holding additional source files.
pub fn default_sources_dir() -> PathBuf {
    PathBuf::from("/etc/apt/sources.list.d")
}

/// Returns the directory backups are written into.
pub fn default_backup_dir() -> PathBuf {
    PathBuf::from("/var/backups/apt-components")
}
