//! Error types for reactor operations.

use thiserror::Error;

use crate::graph::{CellId, ReactorId};

/// Errors returned by fallible reactor operations.
///
/// Operations that have a sensible do-nothing outcome (setting an input to
/// its current value, removing an absent callback) do not error; they report
/// the no-op through their return value instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReactorError {
    /// Memory for a new cell, dependency edge or callback could not be reserved.
    #[error("allocation failed while {context}")]
    Allocation { context: &'static str },

    /// A handle minted by a different reactor was passed in.
    #[error("{cell} belongs to {owner}, not {reactor}")]
    ForeignCell {
        cell: CellId,
        owner: ReactorId,
        reactor: ReactorId,
    },
}

/// Result alias for reactor operations.
pub type Result<T, E = ReactorError> = std::result::Result<T, E>;
