//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_sources_list(lists::OFFICIAL_MAIN);
//!     fixture.command().arg("apply").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{lists, TestFixture};
}

/// Common source definitions for testing.
#[allow(dead_code)]
pub mod lists {
    /// Official one-line entry carrying only `main`.
    pub const OFFICIAL_MAIN: &str = "deb http://deb.debian.org/debian trixie main\n";

    /// `OFFICIAL_MAIN` after the rewrite.
    pub const OFFICIAL_FULL: &str =
        "deb http://deb.debian.org/debian trixie main contrib non-free non-free-firmware\n";

    /// Third-party one-line entry.
    pub const VENDOR: &str = "deb [signed-by=/usr/share/keyrings/vendor.gpg] https://packages.example.com/apt stable main\n";

    /// Official deb822 stanza carrying only `main`.
    pub const DEB822_MAIN: &str = "Types: deb\n\
URIs: http://deb.debian.org/debian\n\
Suites: trixie trixie-updates\n\
Components: main\n\
Signed-By: /usr/share/keyrings/debian-archive-keyring.gpg\n";

    /// Official deb822 stanza already carrying every required component.
    pub const DEB822_FULL: &str = "Types: deb\n\
URIs: http://deb.debian.org/debian\n\
Suites: trixie\n\
Components: main contrib non-free non-free-firmware\n";

    /// An entry with no suite, which cannot be parsed.
    pub const MALFORMED: &str = "deb http://deb.debian.org/debian\n";
}

/// A temporary `etc/apt` tree plus a backup directory next to it.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_sources_list(lists::OFFICIAL_MAIN)
///     .with_source("vendor.list", lists::VENDOR);
///
/// fixture.command().arg("apply").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a fixture with an empty `etc/apt/sources.list.d`.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("etc/apt/sources.list.d")
            .create_dir_all()
            .expect("Failed to create sources directory");
        Self { temp_dir }
    }

    /// Write `etc/apt/sources.list`.
    pub fn with_sources_list(self, content: &str) -> Self {
        self.temp_dir
            .child("etc/apt/sources.list")
            .write_str(content)
            .expect("Failed to write sources.list");
        self
    }

    /// Write a file under `etc/apt/sources.list.d`.
    pub fn with_source(self, name: &str, content: &str) -> Self {
        self.temp_dir
            .child("etc/apt/sources.list.d")
            .child(name)
            .write_str(content)
            .expect("Failed to write source file");
        self
    }

    /// Add a file with the given path relative to the fixture root.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn sources_list(&self) -> PathBuf {
        self.path().join("etc/apt/sources.list")
    }

    pub fn sources_dir(&self) -> PathBuf {
        self.path().join("etc/apt/sources.list.d")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.path().join("backups")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Read a file relative to the fixture root.
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }

    /// Number of archives in the backup directory.
    pub fn backup_count(&self) -> usize {
        std::fs::read_dir(self.backup_dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TestFixture {
    /// A bare command with the environment cleared of our variables.
    pub fn bare_command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("apt-components");
        cmd.current_dir(self.path())
            .env_remove("APT_COMPONENTS_CONFIG")
            .env_remove("APT_COMPONENTS_LOG")
            .env("NO_COLOR", "1");
        cmd
    }

    /// `apply` pointed at this fixture's tree and backup directory.
    pub fn apply(&self) -> assert_cmd::Command {
        let mut cmd = self.bare_command();
        cmd.arg("apply")
            .arg("--sources-list")
            .arg(self.sources_list())
            .arg("--sources-dir")
            .arg(self.sources_dir())
            .arg("--backup-dir")
            .arg(self.backup_dir());
        cmd
    }

    /// `check` pointed at this fixture's tree.
    pub fn check(&self) -> assert_cmd::Command {
        let mut cmd = self.bare_command();
        cmd.arg("check")
            .arg("--sources-list")
            .arg(self.sources_list())
            .arg("--sources-dir")
            .arg(self.sources_dir());
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_sources_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.sources_dir().is_dir());
        assert!(!fixture.sources_list().exists());
    }

    #[test]
    fn test_fixture_with_source() {
        let fixture = TestFixture::new().with_source("vendor.list", lists::VENDOR);
        assert_eq!(
            fixture.read("etc/apt/sources.list.d/vendor.list"),
            lists::VENDOR
        );
        assert_eq!(fixture.backup_count(), 0);
    }
}
