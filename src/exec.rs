//! External command execution.
//!
//! Backends never spawn processes directly; they go through a
//! [`CommandRunner`] so tests can substitute a recording fake. The system
//! implementation captures stdout and stderr combined, since backends parse
//! tool output to determine installed versions.

use crate::error::{PakkError, Result};
use crate::utils::paths;
use std::path::PathBuf;
use std::process::Command;

/// Options for a single command invocation.
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Directory the command runs in. `~` is expanded.
    pub working_dir: Option<PathBuf>,
    /// Echo the captured output to stdout once the command finishes.
    pub echo: bool,
}

pub trait CommandRunner {
    /// Run `argv` and return the combined stdout/stderr output.
    ///
    /// A non-zero exit maps to [`PakkError::CommandFailed`] with the output
    /// attached, so callers can still inspect what the tool printed.
    fn run(&self, argv: &[String], opts: &ExecOptions) -> Result<String>;
}

/// Runs commands on the local system.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[String], opts: &ExecOptions) -> Result<String> {
        let Some((program, args)) = argv.split_first() else {
            return Err(PakkError::Other("no command given".to_string()));
        };
        let command = argv.join(" ");

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = &opts.working_dir {
            cmd.current_dir(paths::expand_home(dir)?);
        }

        let output = cmd.output().map_err(|e| PakkError::CommandFailed {
            command: command.clone(),
            status: "could not spawn".to_string(),
            output: e.to_string(),
        })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if opts.echo && !combined.is_empty() {
            print!("{}", combined);
        }

        if !output.status.success() {
            return Err(PakkError::CommandFailed {
                command,
                status: output.status.to_string(),
                output: combined,
            });
        }

        Ok(combined)
    }
}

#[cfg(test)]
mod tests;
