use crate::collection::ErrorCollection;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PakkError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    YamlError(#[from] serde_yml::Error),

    #[error("Invalid package specifier '{spec}': {reason}")]
    InvalidSpecifier { spec: String, reason: String },

    #[error("Backend '{0}' does not exist or has not been registered")]
    HandlerNotRegistered(String),

    #[error("Could not initialise backend '{name}': {source}")]
    HandlerInitFailed {
        name: String,
        #[source]
        source: Box<PakkError>,
    },

    #[error("Backend '{0}' is unavailable after a failed initialisation")]
    HandlerUnavailable(String),

    /// One or more per-package operations on a single backend failed.
    /// The collection is part of the message and reachable through
    /// [`PakkError::failures`] for callers that want per-package detail.
    #[error("Error executing action on backend '{name}':{failures}")]
    HandlerFailures {
        name: String,
        failures: ErrorCollection,
    },

    /// Independent failures from independent backends or list targets.
    #[error("One or more operations failed:{0}")]
    Collected(ErrorCollection),

    #[error("Command '{command}' failed ({status}):\n{output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },

    #[error("Package {0} not in index")]
    NotInIndex(String),

    #[error("System dependency missing: {0}")]
    DependencyMissing(String),

    #[error("Operation interrupted by user")]
    Interrupted,

    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    #[error("{0}")]
    Other(String),
}

impl PakkError {
    /// Per-key failure detail, if this error aggregates any.
    pub fn failures(&self) -> Option<&ErrorCollection> {
        match self {
            PakkError::HandlerFailures { failures, .. } => Some(failures),
            PakkError::Collected(failures) => Some(failures),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PakkError>;
