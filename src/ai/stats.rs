//! Search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Counters collected during one move selection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Positions visited by the search, leaves included.
    pub nodes: u64,

    /// Positions scored by the static evaluator.
    pub leaves: u64,

    /// Alpha-beta cutoffs.
    pub cutoffs: u64,

    /// Deepest ply reached.
    pub max_depth: u8,

    /// Root candidates searched.
    pub root_candidates: u32,

    /// Name of the pipeline step that produced the move.
    pub decided_by: Option<String>,

    /// Total time spent selecting (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Nodes per second over the whole selection.
    #[must_use]
    pub fn nodes_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.nodes as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    pub(crate) fn record_depth(&mut self, ply: u8) {
        self.max_depth = self.max_depth.max(ply);
    }
}
