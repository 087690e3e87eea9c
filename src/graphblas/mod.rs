//! # GraphBLAS for Ledger Relations
//!
//! A small in-memory implementation of the GraphBLAS API, just large enough
//! to express ledger traversal as linear algebra:
//!
//! - **Sparse vectors** as frontiers and result accumulators
//! - **Hypersparse CSR/CSC** relations over a 2^60 identifier space
//! - **Semirings** choosing how matches combine and merge
//! - **Descriptors** for masking, complement, replace and transpose
//!
//! ## GraphBLAS Mapping to Ledger Traversal
//!
//! ```text
//! GraphBLAS Operation    Ledger Equivalent
//! ─────────────────────  ──────────────────────────────────
//! q⟨¬π, replace⟩ = q ⊕.⊗ A   One BFS round, skipping visited ids
//! w ⊙= u ⊕.⊗ A (min accum)   One relaxation round of a flow trace
//! pattern(v)                 "Which ids", values dropped
//! reduce(v, MIN/MAX)         Earliest/latest occurrence position
//! nvals(A)                   Relation cardinality (round ceiling)
//! ```
//!
//! ## Semirings for Ledger Traversal
//!
//! | Name | "Multiply" | "Add" | Use Case |
//! |------|------------|-------|----------|
//! | ANY_SECONDI | source position | Any | BFS level / parent |
//! | MIN_PLUS | cost + edge cost | Min | Exposure, flow |

mod descriptor;
mod matrix;
mod ops;
mod semiring;
mod sparse;
mod types;
mod vector;

pub use descriptor::{Descriptor, GrBDesc};
pub use matrix::GrBMatrix;
pub use ops::*;
pub use semiring::{AnySecondI, CostMetric, MinPlus, Semiring};
pub use sparse::{CooStorage, CsrStorage, SparseEntry};
pub use types::*;
pub use vector::GrBVector;
