//! Cells
//!
//! This module defines the cells that live in the reactor's store, along with
//! the identifiers used to address them from outside.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::reactive::CallbackRegistry;

/// Unique identifier for a reactor.
///
/// Every [`CellId`] carries the id of the reactor that minted it, so a handle
/// handed to the wrong reactor is rejected instead of silently aliasing one
/// of its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReactorId(u64);

impl ReactorId {
    /// Generate a new unique reactor ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ReactorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReactorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reactor#{}", self.0)
    }
}

/// Handle to a cell inside a reactor.
///
/// Handles are plain values: copying one does not copy the cell. They stay
/// valid for as long as the reactor that created them is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    reactor: ReactorId,
    index: usize,
}

impl CellId {
    pub(crate) fn new(reactor: ReactorId, index: usize) -> Self {
        Self { reactor, index }
    }

    /// The reactor this cell belongs to.
    pub fn reactor(&self) -> ReactorId {
        self.reactor
    }

    /// Position of the cell in its reactor's store (creation order).
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell#{}", self.index)
    }
}

/// Compute function of a single-dependency cell.
pub type Compute1Fn<T> = Box<dyn Fn(T) -> T>;

/// Compute function of a two-dependency cell.
pub type Compute2Fn<T> = Box<dyn Fn(T, T) -> T>;

/// What a cell is, and for derived cells, how its value is produced.
pub enum CellKind<T> {
    /// A cell whose value is set directly by the caller.
    /// Input cells have no dependencies, only dependents.
    Input,

    /// A cell derived from one other cell.
    Compute1 {
        dependency: CellId,
        compute: Compute1Fn<T>,
    },

    /// A cell derived from two other cells.
    Compute2 {
        first: CellId,
        second: CellId,
        compute: Compute2Fn<T>,
    },
}

impl<T> CellKind<T> {
    /// The variant tag, without the compute function.
    pub fn tag(&self) -> CellKindTag {
        match self {
            CellKind::Input => CellKindTag::Input,
            CellKind::Compute1 { .. } => CellKindTag::Compute1,
            CellKind::Compute2 { .. } => CellKindTag::Compute2,
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, CellKind::Input)
    }

    /// The distinct cells this kind reads from.
    ///
    /// A compute2 cell built over the same cell twice reports it once.
    pub fn dependencies(&self) -> SmallVec<[CellId; 2]> {
        let mut deps = SmallVec::new();
        match self {
            CellKind::Input => {}
            CellKind::Compute1 { dependency, .. } => deps.push(*dependency),
            CellKind::Compute2 { first, second, .. } => {
                deps.push(*first);
                if first != second {
                    deps.push(*second);
                }
            }
        }
        deps
    }
}

impl<T> fmt::Debug for CellKind<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKind::Input => f.write_str("Input"),
            CellKind::Compute1 { dependency, .. } => f
                .debug_struct("Compute1")
                .field("dependency", dependency)
                .finish_non_exhaustive(),
            CellKind::Compute2 { first, second, .. } => f
                .debug_struct("Compute2")
                .field("first", first)
                .field("second", second)
                .finish_non_exhaustive(),
        }
    }
}

/// Variant of a cell, as reported by introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKindTag {
    Input,
    Compute1,
    Compute2,
}

/// A cell in the reactor's store.
pub struct Cell<T> {
    /// Current value. For derived cells this equals the compute function
    /// applied to the dependencies once propagation has returned.
    value: T,

    kind: CellKind<T>,

    /// Cells that read from this cell (reverse edges). Kept as a set:
    /// no entry appears twice.
    dependents: SmallVec<[CellId; 4]>,

    callbacks: CallbackRegistry<T>,

    /// Set while a propagation is in flight if the value changed.
    changed: bool,
}

impl<T: Copy + Eq> Cell<T> {
    /// Create a new cell holding `value`.
    pub fn new(value: T, kind: CellKind<T>) -> Self {
        Self {
            value,
            kind,
            dependents: SmallVec::new(),
            callbacks: CallbackRegistry::new(),
            changed: false,
        }
    }

    /// Create a new input cell.
    pub fn input(value: T) -> Self {
        Self::new(value, CellKind::Input)
    }

    pub fn value(&self) -> T {
        self.value
    }

    /// Store `value`, returning whether it differs from the old value.
    pub fn replace_value(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    pub fn kind(&self) -> &CellKind<T> {
        &self.kind
    }

    /// Add a dependent (a cell that reads from this cell).
    ///
    /// Returns `false` if it was already recorded.
    pub fn add_dependent(&mut self, cell: CellId) -> bool {
        if self.dependents.contains(&cell) {
            return false;
        }
        self.dependents.push(cell);
        true
    }

    /// Get all dependents.
    pub fn dependents(&self) -> &[CellId] {
        &self.dependents
    }

    pub(crate) fn reserve_dependent(&mut self) -> Result<(), smallvec::CollectionAllocErr> {
        self.dependents.try_reserve(1)
    }

    pub fn callbacks(&self) -> &CallbackRegistry<T> {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut CallbackRegistry<T> {
        &mut self.callbacks
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Clear the changed mark, returning what it was.
    pub fn take_changed(&mut self) -> bool {
        std::mem::replace(&mut self.changed, false)
    }
}

impl<T: fmt::Debug> fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("value", &self.value)
            .field("kind", &self.kind)
            .field("dependents", &self.dependents)
            .field("callbacks", &self.callbacks.len())
            .field("changed", &self.changed)
            .finish()
    }
}
