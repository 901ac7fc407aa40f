//! Propagation Engine
//!
//! After an input cell changes, the engine brings every derived cell back in
//! line with its dependencies and then notifies observers.
//!
//! # Algorithm
//!
//! 1. Sweep the derived cells in the scheduler's order. Each cell is
//!    recomputed from its dependencies' current values; if the result differs
//!    from the stored value, it is stored and the cell is marked changed.
//! 2. Under [`PropagationStrategy::FixedPoint`], repeat step 1 until a full
//!    sweep changes nothing. Under [`PropagationStrategy::Topological`], the
//!    order already places dependencies first and one sweep is enough.
//! 3. Walk the store in creation order. For every cell marked changed, run
//!    its callbacks with the final value and clear the mark.
//!
//! Creation order is always a dependency order, so in practice the first
//! sweep already produces final values and the second only confirms them.

use tracing::{error, trace};

use crate::config::{PropagationStrategy, ReactorConfig};
use crate::graph::{CellKind, CellStore};

/// Summary of one propagation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Propagation {
    /// Sweeps performed, including the final one that changed nothing.
    pub passes: usize,

    /// Cells whose value changed, the input included.
    pub changed: usize,

    /// Callbacks invoked.
    pub notified: usize,
}

/// Recompute derived cells and notify observers of every changed cell.
///
/// The caller marks the input cell that triggered the propagation as changed
/// before calling this.
pub(crate) fn propagate<T: Copy + Eq>(
    store: &mut CellStore<T>,
    order: &[usize],
    config: &ReactorConfig,
) -> Propagation {
    let passes = settle(store, order, config);
    let (changed, notified) = notify_changed(store);
    Propagation {
        passes,
        changed,
        notified,
    }
}

/// Recompute derived cells until they agree with their dependencies.
///
/// Returns the number of sweeps performed.
pub(crate) fn settle<T: Copy + Eq>(
    store: &mut CellStore<T>,
    order: &[usize],
    config: &ReactorConfig,
) -> usize {
    match config.strategy {
        PropagationStrategy::Topological => {
            sweep(store, order);
            1
        }
        PropagationStrategy::FixedPoint => {
            let mut passes = 0;
            loop {
                passes += 1;
                let changed = sweep(store, order);
                if changed == 0 {
                    break;
                }
                if config.max_passes.is_some_and(|max| passes >= max) {
                    error!(
                        passes,
                        changed, "propagation did not reach a fixed point, giving up"
                    );
                    break;
                }
            }
            passes
        }
    }
}

/// One pass over `order`. Returns how many cells changed value.
fn sweep<T: Copy + Eq>(store: &mut CellStore<T>, order: &[usize]) -> usize {
    let mut changed = 0;
    for &index in order {
        let value = evaluate(store, index);
        let cell = &mut store.cells_mut()[index];
        if cell.replace_value(value) {
            cell.mark_changed();
            changed += 1;
            trace!(cell = index, "recomputed cell changed");
        }
    }
    changed
}

/// Apply a cell's compute function to its dependencies' current values.
fn evaluate<T: Copy + Eq>(store: &CellStore<T>, index: usize) -> T {
    let cell = &store.cells()[index];
    match cell.kind() {
        CellKind::Input => cell.value(),
        CellKind::Compute1 {
            dependency,
            compute,
        } => compute(store.value_of(*dependency)),
        CellKind::Compute2 {
            first,
            second,
            compute,
        } => compute(store.value_of(*first), store.value_of(*second)),
    }
}

/// Fire callbacks on every changed cell and clear the marks.
///
/// Returns `(changed cells, callbacks invoked)`.
fn notify_changed<T: Copy + Eq>(store: &mut CellStore<T>) -> (usize, usize) {
    let mut changed = 0;
    let mut notified = 0;
    for cell in store.cells_mut() {
        if cell.take_changed() {
            changed += 1;
            let value = cell.value();
            notified += cell.callbacks_mut().notify(value);
        }
    }
    (changed, notified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Cell, CellId};

    /// input(1) -> double -> plus_one
    fn chain(store: &mut CellStore<i32>) -> (CellId, CellId, CellId) {
        let input = store.insert(Cell::input(1)).unwrap();
        let double = store
            .insert(Cell::new(2, CellKind::Compute1 {
                dependency: input,
                compute: Box::new(|v| v * 2),
            }))
            .unwrap();
        let plus_one = store
            .insert(Cell::new(3, CellKind::Compute1 {
                dependency: double,
                compute: Box::new(|v| v + 1),
            }))
            .unwrap();
        store.add_dependent(input, double).unwrap();
        store.add_dependent(double, plus_one).unwrap();
        (input, double, plus_one)
    }

    #[test]
    fn fixed_point_sweeps_until_stable() {
        let mut store = CellStore::new();
        let (input, double, plus_one) = chain(&mut store);
        store.get_mut(input).unwrap().replace_value(5);

        let passes = settle(&mut store, &[1, 2], &ReactorConfig::default());
        assert_eq!(passes, 2);
        assert_eq!(store.value_of(double), 10);
        assert_eq!(store.value_of(plus_one), 11);
    }

    #[test]
    fn reversed_order_needs_an_extra_pass() {
        let mut store = CellStore::new();
        let (input, double, plus_one) = chain(&mut store);
        store.get_mut(input).unwrap().replace_value(5);

        // plus_one first reads a stale double; the next sweep fixes it.
        let passes = settle(&mut store, &[2, 1], &ReactorConfig::default());
        assert_eq!(passes, 3);
        assert_eq!(store.value_of(double), 10);
        assert_eq!(store.value_of(plus_one), 11);
    }

    #[test]
    fn max_passes_bounds_the_sweep() {
        let mut store = CellStore::new();
        let (input, _, plus_one) = chain(&mut store);
        store.get_mut(input).unwrap().replace_value(5);

        let config = ReactorConfig::default().with_max_passes(1);
        assert_eq!(settle(&mut store, &[2, 1], &config), 1);
        // plus_one was only ever computed from the stale double.
        assert_eq!(store.value_of(plus_one), 3);
    }

    #[test]
    fn propagate_notifies_and_clears_marks() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut store = CellStore::new();
        let (input, _, plus_one) = chain(&mut store);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store
            .get_mut(plus_one)
            .unwrap()
            .callbacks_mut()
            .register(move |v| sink.borrow_mut().push(v))
            .unwrap();

        let cell = store.get_mut(input).unwrap();
        cell.replace_value(5);
        cell.mark_changed();

        let report = propagate(&mut store, &[1, 2], &ReactorConfig::default());
        assert_eq!(
            report,
            Propagation {
                passes: 2,
                changed: 3,
                notified: 1,
            }
        );
        assert_eq!(*seen.borrow(), vec![11]);
        assert!(store.cells().iter().all(|cell| !cell.is_changed()));
    }
}
