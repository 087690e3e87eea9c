//! # Traversal Engines
//!
//! Three engines, one primitive. Every round is a single masked `vxm`
//! against a committed relation; only the semiring and the merge step
//! change:
//!
//! | Engine | Semiring | Mask | Merge |
//! |--------|----------|------|-------|
//! | [`traverse`] level | ANY_SECONDI | ¬result, replace | `round + 1` |
//! | [`traverse`] parent | ANY_SECONDI | ¬result, replace | predecessor id |
//! | [`exposure`] | MIN_PLUS | ¬seeds | strict improvements |
//! | [`trace`] | MIN_PLUS | none | `min` accumulate |
//!
//! Each call owns its vectors, reads relations only, and is deterministic:
//! the same store and arguments always give the same result.

mod exposure;
mod flow;
mod frontier;

use std::time::Instant;

use tracing::debug;

pub use exposure::{exposure, exposure_with};
pub use flow::{trace, trace_with, FlowTrace, TraceDiagnostic};
pub use frontier::{traverse, traverse_with, TraversalMode};

/// Depth bound meaning "until the frontier dies out"
pub const UNBOUNDED: usize = usize::MAX;

/// Periodic progress events for long-running rounds
pub(crate) struct Progress {
    engine: &'static str,
    every: usize,
    started: Instant,
}

impl Progress {
    pub(crate) fn start(engine: &'static str, semiring: &'static str, every: usize, seeds: usize) -> Self {
        debug!(engine, semiring, seeds, "traversal started");
        Self {
            engine,
            every: every.max(1),
            started: Instant::now(),
        }
    }

    /// Called after `round` (0-based) with the size of the live frontier
    pub(crate) fn round(&self, round: usize, frontier: usize) {
        if (round + 1) % self.every == 0 {
            debug!(
                engine = self.engine,
                round = round + 1,
                frontier,
                elapsed_ms = self.started.elapsed().as_millis() as u64,
                "traversal progress"
            );
        }
    }

    pub(crate) fn finish(&self, rounds: usize, reached: usize) {
        debug!(
            engine = self.engine,
            rounds,
            reached,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "traversal finished"
        );
    }
}

/// Round ceiling: a relation with `nvals` edges cannot extend a path
/// further than `nvals` hops.
#[inline]
pub(crate) fn round_ceiling(depth_bound: usize, nvals: usize) -> usize {
    depth_bound.min(nvals)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::chain::{Chain, RelationName};

    /// R = {1→2 w1, 2→3 w1, 2→4 w5} as the address graph
    pub fn fan_out() -> Chain {
        let mut chain = Chain::new();
        chain
            .extend(RelationName::SenderReceiver, [(1, 2, 1), (2, 3, 1), (2, 4, 5)])
            .unwrap();
        chain.flush();
        chain
    }

    /// Two routes from 10 to 40: 10→20→40 and 10→21→22→40
    pub fn two_routes() -> Chain {
        let mut chain = Chain::new();
        chain
            .extend(
                RelationName::Flow,
                [(10, 20, 1), (20, 40, 1), (10, 21, 1), (21, 22, 1), (22, 40, 1)],
            )
            .unwrap();
        chain.flush();
        chain
    }

    /// Cyclic graph with fan-in: 1→2→3→1, 1→4, 3→4, 4→5, 2→5
    pub fn cyclic() -> Chain {
        let mut chain = Chain::new();
        chain
            .extend(
                RelationName::SenderReceiver,
                [(1, 2, 3), (2, 3, 1), (3, 1, 1), (1, 4, 9), (3, 4, 1), (4, 5, 2), (2, 5, 7)],
            )
            .unwrap();
        chain.flush();
        chain
    }
}
