//! Cell Store
//!
//! The store owns every cell of one reactor in an arena, addressed by
//! [`CellId`]. It also maintains the dependency index: each cell's list of
//! dependents.
//!
//! Cells are only ever appended, and a derived cell may only name cells that
//! already exist, so insertion order is always a valid dependency order and
//! the graph cannot contain a cycle. Dropping the store releases every cell,
//! edge and callback at once.

use super::cell::{Cell, CellId, ReactorId};
use crate::error::{ReactorError, Result};

/// Arena of cells belonging to a single reactor.
pub struct CellStore<T> {
    /// Identity stamped into every handle this store hands out.
    reactor: ReactorId,

    /// All cells, in creation order.
    cells: Vec<Cell<T>>,
}

impl<T> CellStore<T> {
    /// Create a new empty store with a fresh reactor identity.
    pub fn new() -> Self {
        Self {
            reactor: ReactorId::new(),
            cells: Vec::new(),
        }
    }

    pub fn reactor(&self) -> ReactorId {
        self.reactor
    }

    pub fn cells(&self) -> &[Cell<T>] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell<T>] {
        &mut self.cells
    }

    /// Get the total number of cells in the store.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<T: Copy + Eq> CellStore<T> {
    /// Append a cell, returning its handle.
    pub fn insert(&mut self, cell: Cell<T>) -> Result<CellId> {
        self.cells
            .try_reserve(1)
            .map_err(|_| ReactorError::Allocation {
                context: "creating a cell",
            })?;
        let id = CellId::new(self.reactor, self.cells.len());
        self.cells.push(cell);
        Ok(id)
    }

    /// Check that `id` was minted by this store.
    pub fn check(&self, id: CellId) -> Result<()> {
        if id.reactor() != self.reactor || id.index() >= self.cells.len() {
            return Err(ReactorError::ForeignCell {
                cell: id,
                owner: id.reactor(),
                reactor: self.reactor,
            });
        }
        Ok(())
    }

    /// Get a reference to a cell.
    pub fn get(&self, id: CellId) -> Option<&Cell<T>> {
        if id.reactor() != self.reactor {
            return None;
        }
        self.cells.get(id.index())
    }

    /// Get a mutable reference to a cell.
    pub fn get_mut(&mut self, id: CellId) -> Option<&mut Cell<T>> {
        if id.reactor() != self.reactor {
            return None;
        }
        self.cells.get_mut(id.index())
    }

    /// Value of a cell known to belong to this store.
    pub(crate) fn value_of(&self, id: CellId) -> T {
        self.cells[id.index()].value()
    }

    /// Make room for one more dependent on `dependency`, so a following
    /// [`add_dependent`](Self::add_dependent) cannot fail to allocate.
    pub fn reserve_dependent(&mut self, dependency: CellId) -> Result<()> {
        self.check(dependency)?;
        self.cells[dependency.index()]
            .reserve_dependent()
            .map_err(|_| ReactorError::Allocation {
                context: "recording a dependent",
            })
    }

    /// Record that `dependent` reads from `dependency`.
    ///
    /// Both cells must belong to this store. There is no removal: a cell's
    /// dependencies are fixed when it is created.
    pub fn add_dependent(&mut self, dependency: CellId, dependent: CellId) -> Result<()> {
        self.check(dependent)?;
        self.reserve_dependent(dependency)?;
        self.cells[dependency.index()].add_dependent(dependent);
        Ok(())
    }
}

impl<T> Default for CellStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
