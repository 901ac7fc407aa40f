//! Reactive Core
//!
//! This module implements the reactor: cell creation, change propagation and
//! observer callbacks.
//!
//! # Concepts
//!
//! ## Input cells
//!
//! An input cell holds a value set directly by the caller. Setting it to a
//! different value starts a propagation.
//!
//! ## Compute cells
//!
//! A compute cell derives its value from one or two other cells through a
//! pure function. Its value is kept in sync by the propagation engine and
//! cannot be set directly.
//!
//! ## Callbacks
//!
//! A callback observes one cell. It runs once per propagation in which the
//! cell's value changed, with the cell's final value, and never otherwise.
//!
//! # Implementation Notes
//!
//! Propagation recomputes derived cells by sweeping the whole graph until a
//! fixed point rather than walking dependents, trading some recomputation for
//! a loop that is easy to reason about. A topological single-pass strategy is
//! available through [`ReactorConfig`](crate::ReactorConfig).

mod callback;
mod propagation;
mod reactor;

pub use callback::{Callback, CallbackId, CallbackRegistry};
pub use reactor::Reactor;
