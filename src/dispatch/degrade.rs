//! Per-operation failure handling
//!
//! Some operations surface failures to the caller, others hand back a
//! renderable placeholder. Each fetch function picks its own entry.

use crate::error::{Error, Result};

use super::Operation;

/// Return a failure to the caller unchanged, logging it first
pub fn propagate<T>(operation: Operation, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        log::error!("Error fetching {}: {}", operation, err);
    }
    result
}

/// What to return instead of an error when an operation cannot produce
/// a usable answer
pub enum Degradation<T> {
    /// Return this value instead
    Fallback(T),
    /// Build the value from the error
    Recover(Box<dyn FnOnce(&Error) -> T + Send>),
}

impl<U> Degradation<Vec<U>> {
    /// Degrade to an empty list
    pub fn empty() -> Self {
        Degradation::Fallback(Vec::new())
    }
}

impl<U> Degradation<Option<U>> {
    /// Degrade to no value
    pub fn absent() -> Self {
        Degradation::Fallback(None)
    }
}

impl<T> Degradation<T> {
    /// Apply the policy to a dispatch result
    pub fn resolve(self, operation: Operation, result: Result<T>) -> T {
        let err = match result {
            Ok(value) => return value,
            Err(err) => err,
        };

        log::error!("Error fetching {}, using fallback: {}", operation, err);
        match self {
            Degradation::Fallback(value) => value,
            Degradation::Recover(build) => build(&err),
        }
    }
}
