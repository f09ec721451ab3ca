//! Package index refresh after a successful run

use std::process::Command;

use log::info;

use crate::error::{Error, Result};

/// Refreshes the package manager's index.
pub trait IndexRefresher {
    fn refresh(&self) -> Result<()>;
}

/// Runs an external command, `apt-get update` by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRefresher {
    program: String,
    args: Vec<String>,
}

impl CommandRefresher {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The command line, for messages.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for CommandRefresher {
    fn default() -> Self {
        Self::new("apt-get", ["update"])
    }
}

impl IndexRefresher for CommandRefresher {
    fn refresh(&self) -> Result<()> {
        info!("Refreshing package index: {}", self.command_line());

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| Error::Refresh {
                command: self.command_line(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Refresh {
                command: self.command_line(),
                message: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        Ok(())
    }
}
