//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use apt_components::output::OutputConfig;

use crate::commands;

/// Ensure APT repository definitions carry the required components
#[derive(Parser, Debug)]
#[command(name = "apt-components")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "warn",
        env = "APT_COMPONENTS_LOG"
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add missing components to official repository entries
    Apply(commands::apply::ApplyArgs),

    /// Report which files would change, without writing anything
    Check(commands::check::CheckArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Apply(args) => commands::apply::execute(args, &output),
            Commands::Check(args) => commands::check::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

fn init_logging(filters: &str) {
    // A logger may already be installed.
    let _ = env_logger::Builder::new()
        .parse_filters(filters)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
