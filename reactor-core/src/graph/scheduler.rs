//! Update Scheduler
//!
//! The scheduler determines the order in which derived cells are recomputed
//! during a propagation.
//!
//! # Orders
//!
//! - **Store order**: every derived cell in creation order. The fixed-point
//!   engine sweeps this order repeatedly until a pass changes nothing.
//! - **Topological order**: every derived cell, sorted with Kahn's algorithm
//!   so dependencies always come before dependents. A single pass in this
//!   order reaches the same fixed point.
//!
//! Both orders are cached and rebuilt only when cells have been added since
//! the last propagation.

use std::collections::VecDeque;

use super::store::CellStore;
use crate::config::PropagationStrategy;

/// Caches recomputation orders for one store.
#[derive(Debug, Default)]
pub struct UpdateScheduler {
    /// Store length the cached order was built for.
    built_for: Option<(usize, PropagationStrategy)>,

    /// Indices of derived cells, in recomputation order.
    order: Vec<usize>,
}

impl UpdateScheduler {
    /// Create a new scheduler with nothing cached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputation order for `store` under `strategy`.
    pub fn order<T: Copy + Eq>(
        &mut self,
        store: &CellStore<T>,
        strategy: PropagationStrategy,
    ) -> &[usize] {
        let key = (store.len(), strategy);
        if self.built_for != Some(key) {
            self.order = match strategy {
                PropagationStrategy::FixedPoint => store_order(store),
                PropagationStrategy::Topological => topological_order(store),
            };
            self.built_for = Some(key);
        }
        &self.order
    }
}

/// Derived cells in creation order.
fn store_order<T: Copy + Eq>(store: &CellStore<T>) -> Vec<usize> {
    store
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, cell)| !cell.kind().is_input())
        .map(|(index, _)| index)
        .collect()
}

/// Derived cells sorted so that dependencies come before dependents.
fn topological_order<T: Copy + Eq>(store: &CellStore<T>) -> Vec<usize> {
    let cells = store.cells();
    let mut in_degree: Vec<usize> = cells
        .iter()
        .map(|cell| cell.kind().dependencies().len())
        .collect();
    let mut queue: VecDeque<usize> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(index, _)| index)
        .collect();
    let mut result = Vec::with_capacity(cells.len());

    // Kahn's algorithm
    while let Some(index) = queue.pop_front() {
        if !cells[index].kind().is_input() {
            result.push(index);
        }

        for dependent in cells[index].dependents() {
            let degree = &mut in_degree[dependent.index()];
            *degree = degree.saturating_sub(1);
            if *degree == 0 {
                queue.push_back(dependent.index());
            }
        }
    }

    result
}
