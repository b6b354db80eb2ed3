//! The package-index controller.
//!
//! Owns the configuration and the backend registry, routes operations to
//! backends through one dispatch path, and persists the configuration on
//! close. Backends are initialised lazily, at most once, the first time an
//! operation is routed to them.

pub mod config;

pub use config::{ConfigLock, Configuration};

use crate::collection::ErrorCollection;
use crate::error::{PakkError, Result};
use crate::handlers::PackageHandler;
use crate::ui;
use std::collections::BTreeMap;

/// Lifecycle of a registered backend. There is no transition out of
/// `Failed`; re-initialisation within one controller lifetime is not
/// supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InitState {
    Uninitialized,
    Ready,
    Failed,
}

struct HandlerEntry {
    handler: Box<dyn PackageHandler>,
    state: InitState,
}

#[derive(Clone, Copy)]
enum Operation {
    Install,
    Remove,
    Upgrade,
}

impl Operation {
    fn verb(self) -> &'static str {
        match self {
            Operation::Install => "install",
            Operation::Remove => "remove",
            Operation::Upgrade => "upgrade",
        }
    }
}

pub struct Controller {
    configuration: Configuration,
    handlers: BTreeMap<String, HandlerEntry>,
}

impl Controller {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            handlers: BTreeMap::new(),
        }
    }

    /// Register backends on the controller. Registration alone does not
    /// initialise them.
    pub fn register_handlers(&mut self, handlers: Vec<Box<dyn PackageHandler>>) {
        for handler in handlers {
            ui::debug(&format!("registering backend {}", handler.name()));
            self.handlers.insert(
                handler.name().to_string(),
                HandlerEntry {
                    handler,
                    state: InitState::Uninitialized,
                },
            );
        }
    }

    pub fn install(&mut self, handler: &str, specs: &[String]) -> Result<()> {
        self.handler_do(Operation::Install, handler, specs)
    }

    pub fn remove(&mut self, handler: &str, specs: &[String]) -> Result<()> {
        self.handler_do(Operation::Remove, handler, specs)
    }

    pub fn upgrade(&mut self, handler: &str, specs: &[String]) -> Result<()> {
        self.handler_do(Operation::Upgrade, handler, specs)
    }

    /// Upgrade every package of every registered backend. One backend
    /// failing does not prevent the others from being attempted.
    pub fn upgrade_all(&mut self) -> Result<()> {
        let mut failures = ErrorCollection::new();
        let names: Vec<String> = self.handlers.keys().cloned().collect();
        for name in names {
            failures.record(name.clone(), self.handler_do(Operation::Upgrade, &name, &[]));
        }
        match failures.if_not_empty() {
            None => Ok(()),
            Some(failures) => Err(PakkError::Collected(failures)),
        }
    }

    /// Print the stored package index of the given backends, or of all
    /// registered backends when none are named.
    pub fn print_packages(&self, handlers: &[String]) -> Result<()> {
        let names: Vec<String> = if handlers.is_empty() {
            self.handlers.keys().cloned().collect()
        } else {
            handlers.to_vec()
        };

        let mut failures = ErrorCollection::new();
        for name in &names {
            match self.configuration.packages.get(name) {
                Some(index) => {
                    ui::header(name);
                    match serde_yml::to_string(index) {
                        Ok(rendered) => print!("{}", rendered),
                        Err(e) => failures.add(name.clone(), PakkError::YamlError(e)),
                    }
                }
                None if self.handlers.contains_key(name) => {
                    ui::info(&format!("Backend {} does not specify any packages", name));
                }
                None => {
                    failures.add(name.clone(), PakkError::HandlerNotRegistered(name.clone()));
                }
            }
        }
        match failures.if_not_empty() {
            None => Ok(()),
            Some(failures) => Err(PakkError::Collected(failures)),
        }
    }

    /// Save the configuration. This is the single point where in-memory
    /// state is committed to disk; callers invoke it even on the error path
    /// of other operations.
    pub fn close(self) -> Result<()> {
        ui::debug("closing controller");
        self.configuration.save().map_err(|e| {
            PakkError::ConfigError(format!("could not save config: {}", e))
        })
    }

    /// The uniform dispatch path: check registration, lazily initialise,
    /// run the operation, store the returned index blob, even when the
    /// operation also reported failures, so partial success is preserved.
    fn handler_do(&mut self, op: Operation, name: &str, specs: &[String]) -> Result<()> {
        let entry = self
            .handlers
            .get_mut(name)
            .ok_or_else(|| PakkError::HandlerNotRegistered(name.to_string()))?;

        match entry.state {
            InitState::Failed => return Err(PakkError::HandlerUnavailable(name.to_string())),
            InitState::Ready => {}
            InitState::Uninitialized => {
                ui::debug(&format!("initialising backend {}", name));
                let settings = self.configuration.settings.get(name);
                let packages = self.configuration.packages.get(name);
                match entry.handler.init(settings, packages) {
                    Ok(()) => entry.state = InitState::Ready,
                    Err(e) => {
                        entry.state = InitState::Failed;
                        return Err(PakkError::HandlerInitFailed {
                            name: name.to_string(),
                            source: Box::new(e),
                        });
                    }
                }
                if !entry.handler.available() {
                    ui::warning(&format!(
                        "Backend {} initialised, but its tool was not found on this system",
                        name
                    ));
                }
            }
        }

        ui::debug(&format!("dispatching {} to backend {}", op.verb(), name));
        let outcome = match op {
            Operation::Install => entry.handler.install(specs),
            Operation::Remove => entry.handler.remove(specs),
            Operation::Upgrade => entry.handler.upgrade(specs),
        }?;

        if let Some(index) = outcome.index {
            self.configuration
                .packages
                .insert(name.to_string(), index);
        }

        match outcome.failures.if_not_empty() {
            None => Ok(()),
            Some(failures) => Err(PakkError::HandlerFailures {
                name: name.to_string(),
                failures,
            }),
        }
    }

    #[cfg(test)]
    fn packages_blob(&self, name: &str) -> Option<&serde_json::Value> {
        self.configuration.packages.get(name)
    }
}
