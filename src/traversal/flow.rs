//! Flow tracing between two occurrence sets.
//!
//! Starting from the start occurrences at cost 0, the cost vector is relaxed
//! one hop per round over the whole relation. After every round the
//! reachable part of the end set is read off through its structural
//! pattern:
//!
//! ```text
//! cost ⊙= cost MIN.PLUS A        (min accumulate, unmasked)
//! found  = cost ∩ pattern(end)
//! ```
//!
//! The trace has converged once `found` covers every end occurrence and a
//! round leaves it unchanged; under edge weights no cost may have moved in
//! that round either. It stops early, unconverged, when the depth bound is
//! hit or when a round changes no cost at all.

use std::fmt;

use tracing::{debug, info};

use super::Progress;
use crate::chain::{RelationName, RelationStore};
use crate::graphblas::{
    grb_ewise_mult_first, grb_reduce_vector, grb_vxm, CostMetric, Descriptor, GrBMonoid, GrBVector,
    MinPlus, Semiring,
};
use crate::ids::Id;
use crate::{Result, TraceConfig};

/// Why a trace produced no (or only a partial) result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceDiagnostic {
    /// The start set was empty
    NoStartOccurrences,
    /// The end set was empty
    NoEndOccurrences,
    /// Every end occurrence precedes every start occurrence
    NoFeasibleOrdering,
    /// Relaxation settled before reaching every end occurrence
    Unreachable,
}

impl fmt::Display for TraceDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            TraceDiagnostic::NoStartOccurrences => "no start occurrences",
            TraceDiagnostic::NoEndOccurrences => "no end occurrences",
            TraceDiagnostic::NoFeasibleOrdering => "no feasible ordering",
            TraceDiagnostic::Unreachable => "some end occurrences are unreachable",
        };
        f.write_str(msg)
    }
}

/// Outcome of a flow trace
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowTrace {
    /// Reached end occurrences with their cheapest cost, ascending by id
    pub pairs: Vec<(Id, i64)>,
    /// Set when the trace could not run or could not finish
    pub diagnostic: Option<TraceDiagnostic>,
    /// Relaxation rounds performed
    pub rounds: usize,
    /// Full coverage of the end set reached a fixed point
    pub converged: bool,
}

impl FlowTrace {
    fn diagnosed(diagnostic: TraceDiagnostic) -> Self {
        Self {
            diagnostic: Some(diagnostic),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.pairs.iter().map(|&(id, _)| id)
    }

    /// Cheapest cost over all reached end occurrences
    pub fn min_cost(&self) -> Option<i64> {
        self.pairs.iter().map(|&(_, c)| c).min()
    }
}

/// Trace `start` occurrences forward over `relation` towards `end`
/// occurrences for at most `depth_bound` rounds.
pub fn trace<S>(
    store: &S,
    start: &[Id],
    end: &[Id],
    relation: RelationName,
    depth_bound: usize,
    metric: CostMetric,
) -> Result<FlowTrace>
where
    S: RelationStore + ?Sized,
{
    let config = TraceConfig::default().with_max_depth(depth_bound).with_metric(metric);
    trace_with(store, start, end, relation, &config)
}

/// [`trace`] with explicit settings.
pub fn trace_with<S>(
    store: &S,
    start: &[Id],
    end: &[Id],
    relation: RelationName,
    config: &TraceConfig,
) -> Result<FlowTrace>
where
    S: RelationStore + ?Sized,
{
    let a = store.relation(relation)?;
    let mut cost = GrBVector::from_indices(a.nrows(), start.iter().copied(), 0i64)?;
    let pattern = GrBVector::from_indices(a.ncols(), end.iter().copied(), true)?;

    if cost.is_empty() {
        info!(%relation, "trace: {}", TraceDiagnostic::NoStartOccurrences);
        return Ok(FlowTrace::diagnosed(TraceDiagnostic::NoStartOccurrences));
    }
    if pattern.is_empty() {
        info!(%relation, "trace: {}", TraceDiagnostic::NoEndOccurrences);
        return Ok(FlowTrace::diagnosed(TraceDiagnostic::NoEndOccurrences));
    }

    let earliest = grb_reduce_vector(&cost.apply_indexed(|i, _| i), GrBMonoid::Min);
    let latest = grb_reduce_vector(&pattern.apply_indexed(|i, _| i), GrBMonoid::Max);
    if let (Some(earliest), Some(latest)) = (earliest, latest) {
        if latest < earliest {
            info!(%relation, earliest, latest, "trace: {}", TraceDiagnostic::NoFeasibleOrdering);
            return Ok(FlowTrace::diagnosed(TraceDiagnostic::NoFeasibleOrdering));
        }
    }

    let semiring = MinPlus::new(config.metric);
    let progress = Progress::start("trace", semiring.name(), config.progress_every, cost.nvals());
    let mut found = intersect(&cost, &pattern)?;
    let mut rounds = 0;
    let mut converged = false;
    let mut settled = false;

    while rounds < config.depth_bound() {
        let before = found;
        let frontier = cost.clone();
        grb_vxm::<_, bool>(
            &mut cost,
            None,
            Some(GrBMonoid::Min),
            &semiring,
            &frontier,
            a,
            &Descriptor::new(),
        )?;
        found = intersect(&cost, &pattern)?;

        if found.nvals() > before.nvals() {
            debug!(round = rounds + 1, found = found.nvals(), of = pattern.nvals(), "trace: found more");
        }
        progress.round(rounds, cost.nvals());
        rounds += 1;

        // Under hop costs a found entry is already its shortest distance;
        // under weights a longer route may still undercut it until no cost moves
        let still = cost == frontier;
        let exact = config.metric == CostMetric::Hops || still;
        if found.nvals() == pattern.nvals() && found == before && exact {
            converged = true;
            break;
        }
        if still {
            settled = true;
            break;
        }
    }

    progress.finish(rounds, found.nvals());
    let diagnostic = if settled && !converged {
        info!(%relation, found = found.nvals(), of = pattern.nvals(), "trace: {}", TraceDiagnostic::Unreachable);
        Some(TraceDiagnostic::Unreachable)
    } else {
        None
    };

    Ok(FlowTrace {
        pairs: found.to_pairs(),
        diagnostic,
        rounds,
        converged,
    })
}

/// Costs of the end occurrences reached so far
fn intersect(cost: &GrBVector<i64>, pattern: &GrBVector<bool>) -> Result<GrBVector<i64>> {
    let mut found = GrBVector::new(cost.len());
    grb_ewise_mult_first::<_, _, bool>(&mut found, None, cost, pattern, &Descriptor::new())?;
    Ok(found)
}
