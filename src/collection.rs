//! Aggregation of independent per-key failures.
//!
//! Batch operations keep going when a single package fails; every failure is
//! recorded here under the key it belongs to (a package specifier or a
//! backend name) and surfaced as one error value at the end.

use crate::error::PakkError;
use std::collections::BTreeMap;
use std::fmt;

/// A collection of errors keyed by the operation they belong to.
///
/// The empty collection is not an error; convert with [`if_not_empty`]
/// before returning it so emptiness stays an explicitly checked state.
///
/// [`if_not_empty`]: ErrorCollection::if_not_empty
#[derive(Debug, Default)]
pub struct ErrorCollection {
    entries: BTreeMap<String, PakkError>,
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error under the given key, overwriting any prior entry.
    pub fn add(&mut self, key: impl Into<String>, err: PakkError) {
        self.entries.insert(key.into(), err);
    }

    /// Record the failure of a fallible step. `Ok` is a no-op; success is
    /// never stored as an error.
    pub fn record(&mut self, key: impl Into<String>, result: crate::error::Result<()>) {
        if let Err(err) = result {
            self.add(key, err);
        }
    }

    /// Merge another collection into this one. Entries from `other`
    /// overwrite entries with the same key.
    pub fn merge(&mut self, other: ErrorCollection) {
        for (key, err) in other.entries {
            self.entries.insert(key, err);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PakkError)> {
        self.entries.iter()
    }

    /// The collection as an error value, or `None` if nothing was collected.
    pub fn if_not_empty(self) -> Option<ErrorCollection> {
        if self.entries.is_empty() { None } else { Some(self) }
    }

    /// `Ok` if nothing was collected, the collection itself otherwise.
    pub fn into_result(self) -> std::result::Result<(), ErrorCollection> {
        match self.if_not_empty() {
            None => Ok(()),
            Some(c) => Err(c),
        }
    }
}

impl fmt::Display for ErrorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // keys render sorted, one line each
        for (key, err) in &self.entries {
            write!(f, "\n{}:\t{}", key, err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorCollection {}

#[cfg(test)]
mod tests;
