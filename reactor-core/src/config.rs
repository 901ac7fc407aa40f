//! Reactor Configuration
//!
//! Settings that tune how a reactor propagates changes. Every setting has a
//! default, so `ReactorConfig::default()` reproduces the reference behavior.
//! Configurations can be loaded from JSON; missing fields take their default.

use serde::{Deserialize, Serialize};

/// How derived cells are recomputed after an input changes.
///
/// Both strategies reach the same values and fire the same callbacks; they
/// differ only in how much recomputation they do on the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagationStrategy {
    /// Sweep every derived cell in creation order, repeating until a full
    /// pass changes nothing.
    #[default]
    FixedPoint,

    /// One pass over every derived cell in topological order.
    Topological,
}

/// Configuration for a [`Reactor`](crate::Reactor).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorConfig {
    pub strategy: PropagationStrategy,

    /// Upper bound on fixed-point sweeps per propagation. `None` sweeps until
    /// stable. Only reachable with non-deterministic compute functions.
    pub max_passes: Option<usize>,
}

impl ReactorConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_strategy(mut self, strategy: PropagationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = Some(max_passes);
        self
    }
}
