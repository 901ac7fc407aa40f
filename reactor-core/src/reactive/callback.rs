//! Callback types for the reactive system.
//!
//! A callback observes one cell. It is invoked with the cell's new value once
//! per propagation in which that value changed.

use std::fmt;

use indexmap::IndexMap;

use crate::error::{ReactorError, Result};

/// Identifier for a callback registered on a cell.
///
/// Ids are unique within one cell, start at 1 and are never reused, even
/// after the callback they named has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(u64);

impl CallbackId {
    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "callback#{}", self.0)
    }
}

/// An observer of a cell's value.
///
/// Stored as a boxed closure so observers can capture whatever state they
/// need instead of receiving an opaque context pointer.
pub type Callback<T> = Box<dyn FnMut(T)>;

/// The callbacks registered on one cell.
pub struct CallbackRegistry<T> {
    next_id: u64,
    callbacks: IndexMap<CallbackId, Callback<T>>,
}

impl<T> CallbackRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            callbacks: IndexMap::new(),
        }
    }

    /// Register a callback, returning its id.
    pub fn register<F>(&mut self, callback: F) -> Result<CallbackId>
    where
        F: FnMut(T) + 'static,
    {
        self.callbacks
            .try_reserve(1)
            .map_err(|_| ReactorError::Allocation {
                context: "registering a callback",
            })?;
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.callbacks.insert(id, Box::new(callback));
        Ok(id)
    }

    /// Remove a callback. Returns `false` if no callback had that id.
    pub fn unregister(&mut self, id: CallbackId) -> bool {
        self.callbacks.shift_remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<T: Copy> CallbackRegistry<T> {
    /// Invoke every callback with `value`. Returns how many ran.
    pub fn notify(&mut self, value: T) -> usize {
        for callback in self.callbacks.values_mut() {
            callback(value);
        }
        self.callbacks.len()
    }
}

impl<T> Default for CallbackRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
