//! Reactor
//!
//! The reactor is the central coordinator that owns the cell store, the
//! update scheduler and every registered callback.
//!
//! # How It Works
//!
//! 1. Input cells are created with a value. Compute cells are created from
//!    one or two existing cells and a pure function; their value is computed
//!    immediately and they are recorded as dependents of what they read.
//!
//! 2. Callbacks can be attached to any cell and removed by id.
//!
//! 3. When an input's value changes, the reactor:
//!    a. Marks the input as changed
//!    b. Recomputes derived cells until nothing changes
//!    c. Runs the callbacks of every cell whose value changed
//!    d. Clears the change marks
//!
//! # Ownership
//!
//! A reactor exclusively owns its cells. [`CellId`] and [`CallbackId`] are
//! plain handles into it; dropping the reactor releases everything at once.
//! Callbacks are `'static` closures and cannot borrow the reactor, so they
//! cannot mutate the graph while a propagation is running.

use std::fmt;

use tracing::{debug, trace, warn};

use super::callback::CallbackId;
use super::propagation;
use crate::config::ReactorConfig;
use crate::error::Result;
use crate::graph::{Cell, CellId, CellKind, CellKindTag, CellStore, ReactorId, UpdateScheduler};

/// A graph of input and compute cells.
///
/// `T` is the value type carried by every cell. Values are compared with
/// `Eq` to decide whether a cell changed, so a propagation always settles.
///
/// # Example
///
/// ```rust
/// use reactor_core::Reactor;
///
/// let mut reactor: Reactor<i32> = Reactor::new();
/// let input = reactor.create_input(1).unwrap();
/// let plus_one = reactor.create_compute1(input, |v| v + 1).unwrap();
///
/// reactor.set_value(input, 4);
/// assert_eq!(reactor.value(plus_one), Some(5));
/// ```
pub struct Reactor<T = i32> {
    store: CellStore<T>,
    scheduler: UpdateScheduler,
    config: ReactorConfig,
}

impl<T> Reactor<T>
where
    T: Copy + Eq + 'static,
{
    /// Create an empty reactor with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ReactorConfig::default())
    }

    /// Create an empty reactor with the given configuration.
    pub fn with_config(config: ReactorConfig) -> Self {
        let reactor = Self {
            store: CellStore::new(),
            scheduler: UpdateScheduler::new(),
            config,
        };
        debug!(
            reactor = reactor.id().raw(),
            strategy = ?reactor.config.strategy,
            "created reactor"
        );
        reactor
    }

    pub fn id(&self) -> ReactorId {
        self.store.reactor()
    }

    /// Create an input cell holding `initial`.
    pub fn create_input(&mut self, initial: T) -> Result<CellId> {
        let id = self.store.insert(Cell::input(initial))?;
        debug!(reactor = self.id().raw(), cell = %id, "created input cell");
        Ok(id)
    }

    /// Create a cell whose value is `compute` applied to `dependency`.
    ///
    /// The value is computed immediately.
    pub fn create_compute1<F>(&mut self, dependency: CellId, compute: F) -> Result<CellId>
    where
        F: Fn(T) -> T + 'static,
    {
        self.check(dependency, "compute1 dependency")?;
        let value = compute(self.store.value_of(dependency));
        self.insert_derived(
            value,
            CellKind::Compute1 {
                dependency,
                compute: Box::new(compute),
            },
        )
    }

    /// Create a cell whose value is `compute` applied to `first` and `second`.
    ///
    /// The value is computed immediately. `first` and `second` may be the
    /// same cell.
    pub fn create_compute2<F>(&mut self, first: CellId, second: CellId, compute: F) -> Result<CellId>
    where
        F: Fn(T, T) -> T + 'static,
    {
        self.check(first, "compute2 dependency")?;
        self.check(second, "compute2 dependency")?;
        let value = compute(self.store.value_of(first), self.store.value_of(second));
        self.insert_derived(
            value,
            CellKind::Compute2 {
                first,
                second,
                compute: Box::new(compute),
            },
        )
    }

    /// Reject handles minted by another reactor, logging the rejection.
    fn check(&self, cell: CellId, role: &'static str) -> Result<()> {
        self.store.check(cell).map_err(|err| {
            warn!(reactor = self.id().raw(), cell = %cell, role, "{err}");
            err
        })
    }

    /// Insert a derived cell and record it as a dependent of what it reads.
    ///
    /// Edge storage is reserved before the cell is inserted, so a failed
    /// allocation leaves the graph untouched.
    fn insert_derived(&mut self, value: T, kind: CellKind<T>) -> Result<CellId> {
        let dependencies = kind.dependencies();
        for &dependency in &dependencies {
            self.store.reserve_dependent(dependency)?;
        }

        let tag = kind.tag();
        let id = self.store.insert(Cell::new(value, kind))?;
        for &dependency in &dependencies {
            self.store.add_dependent(dependency, id)?;
        }

        debug!(
            reactor = self.id().raw(),
            cell = %id,
            kind = ?tag,
            dependencies = dependencies.len(),
            "created compute cell"
        );
        Ok(id)
    }

    /// Current value of a cell, or `None` if the handle is not from this
    /// reactor.
    pub fn value(&self, cell: CellId) -> Option<T> {
        self.store.get(cell).map(Cell::value)
    }

    /// Set an input cell's value and propagate the change.
    ///
    /// Returns `true` if the value changed and a propagation ran. Setting a
    /// compute cell, setting a foreign handle, or setting an input to its
    /// current value does nothing and returns `false`.
    pub fn set_value(&mut self, cell: CellId, value: T) -> bool {
        let reactor = self.id().raw();
        let Some(target) = self.store.get_mut(cell) else {
            warn!(reactor, cell = %cell, "ignoring set on a cell from another reactor");
            return false;
        };
        if !target.kind().is_input() {
            warn!(reactor, cell = %cell, "ignoring set on a compute cell");
            return false;
        }
        if !target.replace_value(value) {
            trace!(reactor, cell = %cell, "value unchanged, nothing to propagate");
            return false;
        }
        target.mark_changed();

        let order = self.scheduler.order(&self.store, self.config.strategy);
        let report = propagation::propagate(&mut self.store, order, &self.config);
        debug!(
            reactor,
            cell = %cell,
            passes = report.passes,
            changed = report.changed,
            notified = report.notified,
            "propagated input change"
        );
        true
    }

    /// Register `callback` to run with `cell`'s new value after every
    /// propagation that changes it.
    ///
    /// Registering does not run the callback.
    pub fn add_callback<F>(&mut self, cell: CellId, callback: F) -> Result<CallbackId>
    where
        F: FnMut(T) + 'static,
    {
        self.check(cell, "callback target")?;
        let reactor = self.id().raw();
        let target = &mut self.store.cells_mut()[cell.index()];
        let id = target.callbacks_mut().register(callback)?;
        debug!(reactor, cell = %cell, callback = %id, "registered callback");
        Ok(id)
    }

    /// Remove a callback from `cell`.
    ///
    /// Returns `false` (and does nothing else) if no such callback exists.
    pub fn remove_callback(&mut self, cell: CellId, callback: CallbackId) -> bool {
        let reactor = self.id().raw();
        let Some(target) = self.store.get_mut(cell) else {
            warn!(
                reactor,
                cell = %cell,
                "ignoring callback removal on a cell from another reactor"
            );
            return false;
        };
        let removed = target.callbacks_mut().unregister(callback);
        if removed {
            debug!(reactor, cell = %cell, callback = %callback, "removed callback");
        }
        removed
    }

    /// Cells that read from `cell`, in the order they were created.
    pub fn dependents(&self, cell: CellId) -> Option<&[CellId]> {
        self.store.get(cell).map(Cell::dependents)
    }

    /// Cells that `cell` reads from. Empty for input cells.
    pub fn dependencies(&self, cell: CellId) -> Option<Vec<CellId>> {
        self.store
            .get(cell)
            .map(|c| c.kind().dependencies().into_vec())
    }

    pub fn kind(&self, cell: CellId) -> Option<CellKindTag> {
        self.store.get(cell).map(|c| c.kind().tag())
    }

    /// Number of callbacks currently registered on `cell`.
    pub fn callback_count(&self, cell: CellId) -> Option<usize> {
        self.store.get(cell).map(|c| c.callbacks().len())
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub(crate) fn store(&self) -> &CellStore<T> {
        &self.store
    }

    /// Run the recompute phase again without notifying anyone. Returns the
    /// number of sweeps it took.
    #[cfg(test)]
    pub(crate) fn resettle(&mut self) -> usize {
        let order = self.scheduler.order(&self.store, self.config.strategy);
        propagation::settle(&mut self.store, order, &self.config)
    }
}

impl<T> Default for Reactor<T>
where
    T: Copy + Eq + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Reactor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactor")
            .field("id", &self.store.reactor())
            .field("cells", &self.store.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
