use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pakk",
    about = "Pluggable package manager front-end",
    long_about = "Manages packages across pluggable backends and keeps the \
                  resulting package index in a single config file",
    version,
    next_line_help = false,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug)]
pub struct GlobalFlags {
    /// Config file to use instead of the default location
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(short = 'y', long = "yes", global = true)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install packages through a backend and record them in the index
    Install {
        /// Backend to install with (e.g. "goget", "brew")
        backend: String,

        /// Package specifiers; empty reinstalls the whole recorded index
        packages: Vec<String>,
    },

    /// Remove packages through a backend and drop them from the index
    Remove {
        /// Backend to remove with
        backend: String,

        /// Package specifiers to remove
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Upgrade recorded packages, for one backend or all of them
    Upgrade {
        /// Backend to upgrade; omit to upgrade every backend
        backend: Option<String>,

        /// Package specifiers; empty upgrades the whole recorded index
        packages: Vec<String>,
    },

    /// List the recorded package index
    List {
        /// Backends to list; empty lists all of them
        backends: Vec<String>,
    },
}

#[cfg(test)]
mod tests;
