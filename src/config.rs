//! # Engine Configuration
//!
//! This module defines the immutable configuration handed to the rewrite
//! engine, and the optional YAML file it can be loaded from.
//!
//! ## Key Components
//!
//! - **`RequiredComponents`**: the ordered set of component names every
//!   official entry must carry.
//! - **`MirrorPatterns`**: the URI substrings that make an entry "official".
//! - **`EngineConfig`**: the two sets above plus the paths the engine works
//!   on. Built once at startup and only ever borrowed afterwards.
//! - **`ConfigFile`**: the serde form of the YAML configuration file. Every
//!   key is optional; missing keys fall back to [`crate::defaults`].
//!
//! ## Precedence
//!
//! CLI flags override the configuration file, which overrides built-in
//! defaults. The CLI expresses its flags as a second `ConfigFile` and merges
//! it over the loaded one with [`ConfigFile::merge`].
//!
//! ```
//! use apt_components::config::ConfigFile;
//!
//! let file = ConfigFile::parse("components: [contrib]\n").unwrap();
//! let config = file.into_config().unwrap();
//! assert_eq!(config.components().names(), ["contrib"]);
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};

/// Ordered, duplicate-free set of required component names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredComponents {
    names: Vec<String>,
}

impl RequiredComponents {
    /// Build the set, keeping first-seen order and dropping duplicates.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();

        for name in names {
            let name = name.into();
            if name.is_empty() {
                return Err(Error::Config {
                    message: "component name must not be empty".to_string(),
                    hint: Some("Remove the empty entry from 'components'".to_string()),
                });
            }
            if name.chars().any(char::is_whitespace) {
                return Err(Error::Config {
                    message: format!("component name '{}' contains whitespace", name),
                    hint: Some("List each component as its own entry".to_string()),
                });
            }
            if seen.insert(name.clone()) {
                ordered.push(name);
            }
        }

        if ordered.is_empty() {
            return Err(Error::Config {
                message: "no required components configured".to_string(),
                hint: None,
            });
        }

        Ok(Self { names: ordered })
    }

    /// The names in the order they are appended.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Required names absent from `present`, in required order.
    ///
    /// Membership is exact token equality.
    pub fn missing_from<'a, I>(&self, present: I) -> Vec<&str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let present: HashSet<&str> = present.into_iter().collect();
        self.names
            .iter()
            .map(String::as_str)
            .filter(|name| !present.contains(name))
            .collect()
    }
}

impl Default for RequiredComponents {
    fn default() -> Self {
        Self {
            names: defaults::COMPONENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// URI substrings marking an entry as pointing at an official mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorPatterns {
    patterns: Vec<String>,
}

impl MirrorPatterns {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        if patterns.is_empty() || patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::Config {
                message: "mirror patterns must be non-empty strings".to_string(),
                hint: Some("Set 'mirrors' to hostnames such as deb.debian.org".to_string()),
            });
        }
        Ok(Self { patterns })
    }

    /// Whether `uri` contains any of the patterns.
    pub fn matches(&self, uri: &str) -> bool {
        self.patterns.iter().any(|p| uri.contains(p.as_str()))
    }
}

impl Default for MirrorPatterns {
    fn default() -> Self {
        Self {
            patterns: defaults::MIRRORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Immutable configuration for one engine run.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    components: RequiredComponents,
    mirrors: MirrorPatterns,
    sources_list: PathBuf,
    sources_dir: PathBuf,
    backup_dir: PathBuf,
}

impl EngineConfig {
    pub fn new(
        components: RequiredComponents,
        mirrors: MirrorPatterns,
        sources_list: PathBuf,
        sources_dir: PathBuf,
        backup_dir: PathBuf,
    ) -> Self {
        Self {
            components,
            mirrors,
            sources_list,
            sources_dir,
            backup_dir,
        }
    }

    /// Default sets, with every path rooted under `root`.
    ///
    /// Lets tests and chroot-style invocations point the engine at a
    /// throwaway tree.
    pub fn rooted_at(root: &Path) -> Self {
        let rebase = |p: PathBuf| root.join(p.strip_prefix("/").unwrap_or(&p));
        Self::new(
            RequiredComponents::default(),
            MirrorPatterns::default(),
            rebase(defaults::default_sources_list()),
            rebase(defaults::default_sources_dir()),
            rebase(defaults::default_backup_dir()),
        )
    }

    pub fn components(&self) -> &RequiredComponents {
        &self.components
    }

    pub fn mirrors(&self) -> &MirrorPatterns {
        &self.mirrors
    }

    pub fn sources_list(&self) -> &Path {
        &self.sources_list
    }

    pub fn sources_dir(&self) -> &Path {
        &self.sources_dir
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(
            RequiredComponents::default(),
            MirrorPatterns::default(),
            defaults::default_sources_list(),
            defaults::default_sources_dir(),
            defaults::default_backup_dir(),
        )
    }
}

/// On-disk (YAML) form of the configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub components: Option<Vec<String>>,
    #[serde(default)]
    pub mirrors: Option<Vec<String>>,
    #[serde(default)]
    pub sources_list: Option<PathBuf>,
    #[serde(default)]
    pub sources_dir: Option<PathBuf>,
    #[serde(default)]
    pub backup_dir: Option<PathBuf>,
}

impl ConfigFile {
    /// Parse a YAML document. An empty document yields all defaults.
    pub fn parse(yaml_content: &str) -> Result<Self> {
        if yaml_content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml_content).map_err(|e| Error::Config {
            message: e.to_string(),
            hint: Some(
                "Valid keys are: components, mirrors, sources_list, sources_dir, backup_dir"
                    .to_string(),
            ),
        })
    }

    /// Load and parse a configuration file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Overlay `overrides` on top of `self`; keys set in `overrides` win.
    pub fn merge(self, overrides: ConfigFile) -> ConfigFile {
        ConfigFile {
            components: overrides.components.or(self.components),
            mirrors: overrides.mirrors.or(self.mirrors),
            sources_list: overrides.sources_list.or(self.sources_list),
            sources_dir: overrides.sources_dir.or(self.sources_dir),
            backup_dir: overrides.backup_dir.or(self.backup_dir),
        }
    }

    /// Validate and resolve into an [`EngineConfig`], filling in defaults.
    pub fn into_config(self) -> Result<EngineConfig> {
        let components = match self.components {
            Some(names) => RequiredComponents::new(names)?,
            None => RequiredComponents::default(),
        };
        let mirrors = match self.mirrors {
            Some(patterns) => MirrorPatterns::new(patterns)?,
            None => MirrorPatterns::default(),
        };

        Ok(EngineConfig::new(
            components,
            mirrors,
            self.sources_list
                .unwrap_or_else(defaults::default_sources_list),
            self.sources_dir.unwrap_or_else(defaults::default_sources_dir),
            self.backup_dir.unwrap_or_else(defaults::default_backup_dir),
        ))
    }
}
