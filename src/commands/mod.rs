//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `apt-components` command-line tool. Each subcommand is defined in its own
//! file.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `apt_components` library.
//!
//! `apply` and `check` share [`SelectionArgs`], which decides what the
//! engine looks at and what it requires.

pub mod apply;
pub mod check;
pub mod completions;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use apt_components::config::{ConfigFile, EngineConfig};

/// Which files to look at and which components to require.
#[derive(Args, Debug, Default)]
pub struct SelectionArgs {
    /// Path to a YAML configuration file
    #[arg(short, long, value_name = "FILE", env = "APT_COMPONENTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Main one-line source list [default: /etc/apt/sources.list]
    #[arg(long, value_name = "FILE")]
    pub sources_list: Option<PathBuf>,

    /// Directory of additional source files [default: /etc/apt/sources.list.d]
    #[arg(long, value_name = "DIR")]
    pub sources_dir: Option<PathBuf>,

    /// Required component; repeat to list several (replaces the default set)
    #[arg(long = "component", value_name = "NAME")]
    pub components: Vec<String>,

    /// URI substring of an official mirror; repeat to list several
    #[arg(long = "mirror", value_name = "PATTERN")]
    pub mirrors: Vec<String>,
}

impl SelectionArgs {
    /// Flags over config file over defaults.
    pub fn resolve(&self, backup_dir: Option<PathBuf>) -> Result<EngineConfig> {
        let file = match &self.config {
            Some(path) => ConfigFile::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ConfigFile::default(),
        };

        let overrides = ConfigFile {
            components: (!self.components.is_empty()).then(|| self.components.clone()),
            mirrors: (!self.mirrors.is_empty()).then(|| self.mirrors.clone()),
            sources_list: self.sources_list.clone(),
            sources_dir: self.sources_dir.clone(),
            backup_dir,
        };

        Ok(file.merge(overrides).into_config()?)
    }
}
