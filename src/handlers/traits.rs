use crate::collection::ErrorCollection;
use crate::error::Result;
use serde_json::Value;

/// Result of a batch operation on one backend.
///
/// The index is the backend's *complete* package list in serialized form and
/// is returned even when some packages failed, so successfully processed
/// packages are never lost. The controller stores it opaquely.
pub struct Outcome {
    pub index: Option<Value>,
    pub failures: ErrorCollection,
}

impl Outcome {
    pub fn new(index: Value, failures: ErrorCollection) -> Self {
        Self {
            index: Some(index),
            failures,
        }
    }
}

/// The contract every package-manager backend implements.
///
/// For every operation the following holds:
///   - An empty specifier slice means "operate on every package in the
///     backend's index".
///   - Per-package failures are collected in the returned [`Outcome`]; the
///     batch keeps going past them. An `Err` return is fatal for the whole
///     dispatch (e.g. the index could not be serialized).
///   - Specifiers are backend-specific strings and are parsed by the
///     backend itself.
pub trait PackageHandler {
    /// Name the backend is registered and addressed under.
    fn name(&self) -> &'static str;

    /// Initialise from the opaque blobs stored in the configuration.
    ///
    /// `settings = None` keeps the backend's defaults. `packages = None`
    /// means the backend has never been used; it seeds its index with a
    /// backend-defined starting state. A deserialization failure is fatal
    /// for this backend only.
    fn init(&mut self, settings: Option<&Value>, packages: Option<&Value>) -> Result<()>;

    /// Install the given packages on the system.
    fn install(&mut self, specs: &[String]) -> Result<Outcome>;

    /// Remove the given packages from the system.
    fn remove(&mut self, specs: &[String]) -> Result<Outcome>;

    /// Upgrade the given packages, honouring the backend's pinning policy.
    fn upgrade(&mut self, specs: &[String]) -> Result<Outcome>;

    /// Whether the underlying tool is present on this system.
    fn available(&self) -> bool {
        true
    }
}
