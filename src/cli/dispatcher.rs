//! Command dispatcher
//!
//! Resolves the config location, takes the config lock, and routes the
//! parsed CLI command through the controller.

use crate::cli::args::{Cli, Command};
use crate::controller::{ConfigLock, Configuration, Controller};
use crate::error::Result;
use crate::handlers;
use crate::project_identity;
use crate::ui;
use crate::utils::paths;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Dispatch the parsed CLI command to the controller.
pub fn dispatch(args: &Cli) -> Result<()> {
    let config_path = resolve_config_path(args)?;
    ui::debug(&format!("using config file {}", config_path.display()));

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| crate::error::PakkError::IoError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let _lock = ConfigLock::acquire(&config_path)?;

    let configuration = Configuration::load(&config_path)?;
    let mut controller = Controller::new(configuration);
    controller.register_handlers(handlers::default_handlers());

    let result = run_command(&mut controller, &args.command);

    // save even after a partial failure so successful work survives
    match controller.close() {
        Ok(()) => result,
        Err(close_err) => {
            if result.is_err() {
                ui::warning(&format!("{}", close_err));
                result
            } else {
                Err(close_err)
            }
        }
    }
}

fn run_command(controller: &mut Controller, command: &Command) -> Result<()> {
    match command {
        Command::Install { backend, packages } => controller.install(backend, packages),
        Command::Remove { backend, packages } => controller.remove(backend, packages),
        Command::Upgrade { backend, packages } => match backend {
            Some(backend) => controller.upgrade(backend, packages),
            None => controller.upgrade_all(),
        },
        Command::List { backends } => controller.print_packages(backends),
    }
}

/// Config location precedence: `--config` flag, then the environment,
/// then the platform default.
fn resolve_config_path(args: &Cli) -> Result<PathBuf> {
    if let Some(path) = &args.global.config {
        return paths::expand_home(path);
    }
    if let Ok(path) = env::var(project_identity::env_key("CONFIG")) {
        return paths::expand_home(Path::new(&path));
    }
    paths::config_file()
}
