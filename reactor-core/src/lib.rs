//! Reactor Core
//!
//! This crate provides a small reactive dependency-cell engine. It
//! implements:
//!
//! - Input cells holding values set by the caller
//! - Compute cells derived from one or two other cells by pure functions
//! - Change propagation to a fixed point after every input change
//! - Observer callbacks fired once per propagation for each changed cell
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: Cell store, dependency index and recomputation ordering
//! - `reactive`: The [`Reactor`], its propagation engine and callbacks
//! - `config`: Propagation settings
//! - `snapshot`: Serializable dumps of a reactor's cells
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use reactor_core::Reactor;
//!
//! let mut reactor: Reactor<i32> = Reactor::new();
//! let a = reactor.create_input(1).unwrap();
//! let b = reactor.create_input(2).unwrap();
//! let sum = reactor.create_compute2(a, b, |x, y| x + y).unwrap();
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//! reactor.add_callback(sum, move |v| sink.borrow_mut().push(v)).unwrap();
//!
//! reactor.set_value(a, 5);
//! assert_eq!(reactor.value(sum), Some(7));
//! assert_eq!(*seen.borrow(), vec![7]);
//! ```
//!
//! The reactor is single-threaded and not reentrant: callbacks receive values
//! only and cannot reach back into the graph.

pub mod config;
pub mod error;
pub mod graph;
pub mod reactive;
pub mod snapshot;

pub use config::{PropagationStrategy, ReactorConfig};
pub use error::{ReactorError, Result};
pub use graph::{CellId, CellKindTag, ReactorId};
pub use reactive::{CallbackId, Reactor};
pub use snapshot::{CellSnapshot, GraphSnapshot};
