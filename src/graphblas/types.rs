//! GraphBLAS Type Definitions for Ledger Relations
//!
//! Maps GraphBLAS scalar domains to the three Rust types the ledger needs:
//! `bool` for patterns and masks, `i64` for levels, parents and costs,
//! `u64` for edge weights.

use std::fmt::Debug;

/// GraphBLAS index type
pub type GrBIndex = u64;

/// Maximal index of the shared identifier space (`GxB_INDEX_MAX`).
///
/// Every "maximal" vector or matrix is dimensioned by this value, and
/// exposure results report it for their seeds.
pub const INDEX_MAX: GrBIndex = 1 << 60;

/// GraphBLAS type descriptor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrBType {
    /// Boolean
    Bool,
    /// 64-bit signed integer
    Int64,
    /// 64-bit unsigned integer
    UInt64,
}

/// Monoid types (associative binary op used by `reduce`)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrBMonoid {
    /// Minimum
    Min,
    /// Maximum
    Max,
    /// Addition (saturating)
    Plus,
    /// Any value wins; implementations keep the first one seen
    Any,
}

/// A scalar that can live in a `GrBVector` or `GrBMatrix`.
pub trait Element: Copy + PartialEq + Debug + Send + Sync + 'static {
    /// GraphBLAS domain of this type
    const DTYPE: GrBType;

    /// Value-mask interpretation (non-zero is true)
    fn truthy(self) -> bool;

    /// Combine two values under a monoid
    fn combine(monoid: GrBMonoid, a: Self, b: Self) -> Self;
}

impl Element for bool {
    const DTYPE: GrBType = GrBType::Bool;

    fn truthy(self) -> bool {
        self
    }

    fn combine(monoid: GrBMonoid, a: bool, b: bool) -> bool {
        match monoid {
            GrBMonoid::Min => a && b,
            GrBMonoid::Max | GrBMonoid::Plus => a || b,
            GrBMonoid::Any => a,
        }
    }
}

impl Element for i64 {
    const DTYPE: GrBType = GrBType::Int64;

    fn truthy(self) -> bool {
        self != 0
    }

    fn combine(monoid: GrBMonoid, a: i64, b: i64) -> i64 {
        match monoid {
            GrBMonoid::Min => a.min(b),
            GrBMonoid::Max => a.max(b),
            GrBMonoid::Plus => a.saturating_add(b),
            GrBMonoid::Any => a,
        }
    }
}

impl Element for u64 {
    const DTYPE: GrBType = GrBType::UInt64;

    fn truthy(self) -> bool {
        self != 0
    }

    fn combine(monoid: GrBMonoid, a: u64, b: u64) -> u64 {
        match monoid {
            GrBMonoid::Min => a.min(b),
            GrBMonoid::Max => a.max(b),
            GrBMonoid::Plus => a.saturating_add(b),
            GrBMonoid::Any => a,
        }
    }
}
