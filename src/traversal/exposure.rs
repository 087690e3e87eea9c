//! Min-cost exposure from a seed set.
//!
//! Seeds enter the live frontier at cost 0 and are reported with the
//! `INDEX_MAX` sentinel ("unconstrained start"). Each round relaxes the
//! frontier through the relation under MIN_PLUS, keeps only strict
//! improvements, merges them into the result and expands them next round.
//! Under hop costs every id is settled the first time it is reached; under
//! edge weights a later round may still lower a cost.

use tracing::info;

use super::{round_ceiling, Progress};
use crate::chain::{RelationName, RelationStore};
use crate::graphblas::{grb_assign, CostMetric, GrBDesc, GrBVector, MinPlus, Semiring, INDEX_MAX};
use crate::ids::Id;
use crate::{Result, TraceConfig};

/// Minimal accumulated cost from `seeds` to every id reachable over
/// `relation` in at most `depth_bound` rounds. Seeds map to `INDEX_MAX`.
pub fn exposure<S>(
    store: &S,
    seeds: &[Id],
    relation: RelationName,
    depth_bound: usize,
    metric: CostMetric,
) -> Result<GrBVector<i64>>
where
    S: RelationStore + ?Sized,
{
    let config = TraceConfig::default().with_max_depth(depth_bound).with_metric(metric);
    exposure_with(store, seeds, relation, &config)
}

/// [`exposure`] with explicit settings.
pub fn exposure_with<S>(
    store: &S,
    seeds: &[Id],
    relation: RelationName,
    config: &TraceConfig,
) -> Result<GrBVector<i64>>
where
    S: RelationStore + ?Sized,
{
    let a = store.relation(relation)?;
    let origin = GrBVector::from_indices(a.nrows(), seeds.iter().copied(), INDEX_MAX as i64)?;
    if origin.is_empty() {
        info!(%relation, "exposure: no seeds");
        return Ok(origin);
    }

    let semiring = MinPlus::new(config.metric);
    let progress = Progress::start("exposure", semiring.name(), config.progress_every, origin.nvals());
    let mut pi = origin.clone();
    let mut q = origin.apply(|_| 0i64);
    let mut rounds = 0;

    for round in 0..round_ceiling(config.depth_bound(), a.nvals()) {
        // Seeds never take a cost; everything else only ever improves
        let candidate = a.vxm(&q, &semiring, Some(&origin), &GrBDesc::sc())?;
        q = candidate.select(|id, cost| pi.get(id).map_or(true, |current| cost < current));
        if q.is_empty() {
            break;
        }
        rounds = round + 1;

        grb_assign(&mut pi, Some(&q), &q, &GrBDesc::s())?;
        progress.round(round, q.nvals());
    }

    progress.finish(rounds, pi.nvals());
    Ok(pi)
}
