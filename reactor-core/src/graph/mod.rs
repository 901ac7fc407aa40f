//! Dependency Graph
//!
//! This module implements the cell graph: the store that owns every cell and
//! the dependency index that records which cells read from which.
//!
//! # Overview
//!
//! The graph is a directed acyclic graph (DAG) where:
//!
//! - Nodes are cells: input cells hold values set by the caller, compute
//!   cells hold values derived from one or two other cells
//! - Edges are dependencies: if B reads from A, A's dependents include B
//!
//! # Design Decisions
//!
//! 1. Cells live in a single arena addressed by index rather than in linked
//!    lists, so there are no dangling references and tearing down a reactor
//!    is one deallocation.
//!
//! 2. Cell variants are a proper sum type ([`CellKind`]); there is no
//!    downcasting between cell shapes.
//!
//! 3. A compute cell can only be built from cells that already exist, which
//!    makes creation order a valid topological order and rules out cycles.

mod cell;
mod scheduler;
mod store;

pub use cell::{Cell, CellId, CellKind, CellKindTag, Compute1Fn, Compute2Fn, ReactorId};
pub use scheduler::UpdateScheduler;
pub use store::CellStore;
