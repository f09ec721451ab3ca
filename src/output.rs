//! # Output Configuration
//!
//! This module controls how run results are printed: whether colors and emoji
//! are used, and the per-file and summary lines of a run.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use apt_components::output::{OutputConfig, status_line};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! for outcome in &summary.outcomes {
//!     println!("{}", status_line(&config, outcome, summary.dry_run));
//! }
//! ```

use std::env;

use console::style;

use crate::engine::RunSummary;
use crate::rewrite::{FileOutcome, FileStatus};

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Detect whether color output is supported based on environment.
    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// One line describing what happened to a file.
///
/// `dry_run` switches "changed" to "would change".
pub fn status_line(config: &OutputConfig, outcome: &FileOutcome, dry_run: bool) -> String {
    let path = outcome.path.display();
    match &outcome.status {
        FileStatus::Unchanged => format!("{} {} unchanged", emoji(config, "✔️ ", "[OK]"), path),
        FileStatus::Changed => {
            let verb = if dry_run { "would change" } else { "changed" };
            let verb = if config.use_color {
                style(verb).yellow().force_styling(true).to_string()
            } else {
                verb.to_string()
            };
            format!("{} {} {}", emoji(config, "✏️ ", "[CHANGED]"), path, verb)
        }
        FileStatus::Error(e) => {
            let reason = if config.use_color {
                style(e.to_string()).red().force_styling(true).to_string()
            } else {
                e.to_string()
            };
            format!("{} {} error: {}", emoji(config, "❌", "[ERROR]"), path, reason)
        }
    }
}

/// The closing summary of a run.
pub fn summary_line(config: &OutputConfig, summary: &RunSummary) -> String {
    let changed_label = if summary.dry_run {
        "would change"
    } else {
        "changed"
    };
    let marker = if summary.has_errors() {
        emoji(config, "⚠️ ", "[WARN]")
    } else {
        emoji(config, "✅", "[DONE]")
    };
    format!(
        "{} {} files: {} {}, {} unchanged, {} failed",
        marker,
        summary.outcomes.len(),
        summary.changed(),
        changed_label,
        summary.unchanged(),
        summary.errors()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::path::PathBuf;

    fn outcome(status: FileStatus) -> FileOutcome {
        FileOutcome {
            path: PathBuf::from("/etc/apt/sources.list"),
            status,
        }
    }

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("never");
        assert!(!config.use_color);
    }

    #[test]
    fn test_emoji_helper_with_color() {
        let config = OutputConfig::with_color();
        assert_eq!(emoji(&config, "✅", "[DONE]"), "✅");
    }

    #[test]
    fn test_emoji_helper_without_color() {
        let config = OutputConfig::without_color();
        assert_eq!(emoji(&config, "✅", "[DONE]"), "[DONE]");
    }

    #[test]
    fn test_status_line_plain() {
        let config = OutputConfig::without_color();
        assert_eq!(
            status_line(&config, &outcome(FileStatus::Unchanged), false),
            "[OK] /etc/apt/sources.list unchanged"
        );
        assert_eq!(
            status_line(&config, &outcome(FileStatus::Changed), false),
            "[CHANGED] /etc/apt/sources.list changed"
        );
        assert_eq!(
            status_line(&config, &outcome(FileStatus::Changed), true),
            "[CHANGED] /etc/apt/sources.list would change"
        );
    }

    #[test]
    fn test_status_line_error_includes_reason() {
        let config = OutputConfig::without_color();
        let line = status_line(
            &config,
            &outcome(FileStatus::Error(Error::Write {
                path: PathBuf::from("/etc/apt/sources.list"),
                message: "Permission denied".to_string(),
            })),
            false,
        );
        assert!(line.starts_with("[ERROR] /etc/apt/sources.list error:"));
        assert!(line.contains("Permission denied"));
    }

    #[test]
    fn test_summary_line() {
        let config = OutputConfig::without_color();
        let summary = RunSummary {
            outcomes: vec![outcome(FileStatus::Changed), outcome(FileStatus::Unchanged)],
            ..Default::default()
        };
        assert_eq!(
            summary_line(&config, &summary),
            "[DONE] 2 files: 1 changed, 1 unchanged, 0 failed"
        );
    }
}
