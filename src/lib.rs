//! # APT Components Library
//!
//! This library makes sure APT repository definitions carry a required set of
//! distribution components (by default `contrib`, `non-free` and
//! `non-free-firmware`). It is used by the `apt-components` command-line tool
//! but the engine works on any directory tree, which keeps it testable away
//! from `/etc/apt`.
//!
//! ## Quick Example
//!
//! ```
//! use apt_components::config::EngineConfig;
//! use apt_components::rewrite::rewrite_content;
//!
//! let config = EngineConfig::default();
//! let rewrite = rewrite_content("deb http://deb.debian.org/debian trixie main\n", &config).unwrap();
//! assert_eq!(
//!     rewrite.content,
//!     "deb http://deb.debian.org/debian trixie main contrib non-free non-free-firmware\n"
//! );
//!
//! // Running again on the output changes nothing.
//! let again = rewrite_content(&rewrite.content, &config).unwrap();
//! assert!(!again.is_changed());
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: the immutable [`config::EngineConfig`]:
//!   required components, official mirror patterns and the paths to work on.
//! - **Formats (`format`)**: one-line `sources.list` files versus deb822
//!   `.sources` stanzas, told apart by content.
//! - **Entries (`entry`)**: byte-preserving models of both formats.
//! - **Augmentation (`augment`)**: which entries lack which components, and
//!   the append itself.
//! - **Rewriting (`rewrite`, `walker`)**: per-file read, rewrite and atomic
//!   replace, and the directory walk feeding it.
//! - **Orchestration (`engine`, `backup`, `refresh`)**: a run is a backup,
//!   the main list, then the sources directory; the index refresh is an
//!   optional follow-up.
//!
//! ## Execution Flow
//!
//! 1.  **Backup**: archive the configuration tree. Failure stops the run.
//! 2.  **Main list**: rewrite `/etc/apt/sources.list`.
//! 3.  **Directory**: rewrite every `.list` and `.sources` file under
//!     `/etc/apt/sources.list.d`.
//! 4.  **Report**: every file ends up `Unchanged`, `Changed` or `Error`.

pub mod augment;
pub mod backup;
pub mod config;
pub mod defaults;
pub mod engine;
pub mod entry;
pub mod error;
pub mod format;
pub mod output;
pub mod refresh;
pub mod rewrite;
pub mod walker;

#[cfg(test)]
mod rewrite_proptest;
