//! GraphBLAS Semirings for Ledger Traversal
//!
//! A semiring (⊕, ⊗) provides:
//! - ⊗ (multiply): combines a frontier value with a matching edge
//! - ⊕ (add): merges contributions arriving at the same destination
//!
//! ## Ledger Semirings
//!
//! | Semiring | ⊕ (Add) | ⊗ (Multiply) | Use Case |
//! |----------|---------|--------------|----------|
//! | ANY_SECONDI | Any (first wins) | source position | BFS level / parent |
//! | MIN_PLUS | Min | cost + edge cost | Exposure, flow tracing |
//!
//! The algorithm is the semiring choice: the frontier engine and the
//! exposure engine issue the same masked `vxm`, only the pair differs.

use serde::{Deserialize, Serialize};

use super::types::{Element, GrBIndex};

/// A semiring defines how a frontier is composed with a relation.
///
/// ```text
/// w[dst] = add over src ( multiply(u[src], A[src, dst], src, dst) )
/// ```
///
/// `multiply` receives the positions of the matched entry so positional
/// operators (`SECONDI`) need no extra lookup.
pub trait Semiring: Send + Sync {
    /// Frontier value type
    type Input: Element;
    /// Relation value type
    type Edge: Element;
    /// Result value type
    type Output: Element;

    /// Multiplication operation (⊗)
    fn multiply(
        &self,
        input: Self::Input,
        edge: Self::Edge,
        src: GrBIndex,
        dst: GrBIndex,
    ) -> Self::Output;

    /// Addition operation (⊕). `a` is the value already accumulated.
    fn add(&self, a: Self::Output, b: Self::Output) -> Self::Output;

    /// Name of this semiring
    fn name(&self) -> &'static str;
}

/// ANY.SECONDI: first-hit positional BFS
///
/// multiply: the source position `src`, i.e. the predecessor id
/// add: keep whichever witness arrived first
///
/// This is `GxB_ANY_SECONDI_INT64` in SuiteSparse GraphBLAS. Frontiers are
/// expanded in ascending id order, so "first" is the smallest predecessor.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnySecondI;

impl Semiring for AnySecondI {
    type Input = i64;
    type Edge = u64;
    type Output = i64;

    fn multiply(&self, _input: i64, _edge: u64, src: GrBIndex, _dst: GrBIndex) -> i64 {
        src as i64
    }

    fn add(&self, a: i64, _b: i64) -> i64 {
        a
    }

    fn name(&self) -> &'static str {
        "ANY_SECONDI_INT64"
    }
}

/// How an edge contributes to an accumulated cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostMetric {
    /// Every edge costs one hop
    #[default]
    Hops,
    /// Every edge costs its stored weight
    Weight,
}

impl CostMetric {
    /// Cost of traversing an edge carrying `weight`
    #[inline]
    pub fn edge_cost(self, weight: u64) -> i64 {
        match self {
            CostMetric::Hops => 1,
            CostMetric::Weight => weight.min(i64::MAX as u64) as i64,
        }
    }
}

/// MIN.PLUS: cheapest accumulated cost
///
/// multiply: `cost[src] + edge_cost`, saturating at `i64::MAX`
/// add: numeric minimum, so ties resolve to the smallest cost
///
/// `GxB_MIN_PLUS_INT64`, with the edge cost chosen by [`CostMetric`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MinPlus {
    pub metric: CostMetric,
}

impl MinPlus {
    pub fn new(metric: CostMetric) -> Self {
        Self { metric }
    }

    pub fn hops() -> Self {
        Self::new(CostMetric::Hops)
    }

    pub fn weighted() -> Self {
        Self::new(CostMetric::Weight)
    }
}

impl Semiring for MinPlus {
    type Input = i64;
    type Edge = u64;
    type Output = i64;

    fn multiply(&self, input: i64, edge: u64, _src: GrBIndex, _dst: GrBIndex) -> i64 {
        input.saturating_add(self.metric.edge_cost(edge))
    }

    fn add(&self, a: i64, b: i64) -> i64 {
        a.min(b)
    }

    fn name(&self) -> &'static str {
        match self.metric {
            CostMetric::Hops => "MIN_PLUS_HOPS_INT64",
            CostMetric::Weight => "MIN_PLUS_INT64",
        }
    }
}
