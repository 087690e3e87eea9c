//! Level-synchronous multi-source BFS.
//!
//! ```text
//! q = {seed → seed}        π = {seed → 0 | seed}
//! loop:
//!   q⟨¬π, replace⟩ = q ANY.SECONDI A
//!   q empty → done
//!   π⟨q⟩ = round + 1   (level)   or   π⟨q⟩ = q   (parent)
//! ```
//!
//! The complemented structural mask keeps every id out of `q` once it is in
//! `π`, so each id enters the result exactly once and the loop ends when
//! the reachable component is exhausted.

use tracing::info;

use super::{round_ceiling, Progress};
use crate::chain::{RelationName, RelationStore};
use crate::graphblas::{grb_assign, grb_assign_scalar, AnySecondI, GrBDesc, GrBVector, Semiring};
use crate::ids::Id;
use crate::{Result, TraceConfig};

/// What the BFS result records for each reached id
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalMode {
    /// Number of rounds needed to reach the id (seeds are 0)
    Level,
    /// Id of the predecessor it was reached from (seeds are their own parent)
    Parent,
}

/// Multi-source BFS over `relation` for at most `depth_bound` rounds.
pub fn traverse<S>(
    store: &S,
    seeds: &[Id],
    relation: RelationName,
    depth_bound: usize,
    mode: TraversalMode,
) -> Result<GrBVector<i64>>
where
    S: RelationStore + ?Sized,
{
    let config = TraceConfig::default().with_max_depth(depth_bound);
    traverse_with(store, seeds, relation, mode, &config)
}

/// [`traverse`] with explicit settings; the depth bound comes from `config`.
pub fn traverse_with<S>(
    store: &S,
    seeds: &[Id],
    relation: RelationName,
    mode: TraversalMode,
    config: &TraceConfig,
) -> Result<GrBVector<i64>>
where
    S: RelationStore + ?Sized,
{
    let a = store.relation(relation)?;

    let mut q = GrBVector::from_entries(a.nrows(), seeds.iter().map(|&s| (s, s as i64)))?;
    let mut pi = match mode {
        TraversalMode::Level => q.apply(|_| 0i64),
        TraversalMode::Parent => q.clone(),
    };
    if q.is_empty() {
        info!(%relation, "traverse: no seeds");
        return Ok(pi);
    }

    let progress = Progress::start("traverse", AnySecondI.name(), config.progress_every, q.nvals());
    let desc = GrBDesc::rsc();
    let mut rounds = 0;

    for round in 0..round_ceiling(config.depth_bound(), a.nvals()) {
        q = a.vxm(&q, &AnySecondI, Some(&pi), &desc)?;
        if q.is_empty() {
            break;
        }
        rounds = round + 1;

        match mode {
            TraversalMode::Level => grb_assign_scalar(&mut pi, &q, rounds as i64, &GrBDesc::s())?,
            TraversalMode::Parent => grb_assign(&mut pi, Some(&q), &q, &GrBDesc::s())?,
        }
        progress.round(round, q.nvals());
    }

    progress.finish(rounds, pi.nvals());
    Ok(pi)
}
