//! Package-manager backends.
//!
//! Every backend implements [`PackageHandler`] against opaque serialized
//! blobs, so the controller stays agnostic of each backend's settings and
//! package schema. `goget` is the reference implementation of the batching
//! and pinning discipline; `brew` follows the same pattern.

pub mod brew;
pub mod goget;
pub mod traits;

pub use traits::{Outcome, PackageHandler};

/// The backends registered by the CLI.
pub fn default_handlers() -> Vec<Box<dyn PackageHandler>> {
    vec![
        Box::new(goget::GoGet::new()),
        Box::new(brew::Brew::new()),
    ]
}
