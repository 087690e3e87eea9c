//! # Ledgerblas: Ledger Flow Analysis over Sparse Relations
//!
//! Analyzes a cryptocurrency ledger as a graph without adjacency lists:
//! every edge kind is a sparse matrix over one shared 64-bit identifier
//! space, and traversal is repeated masked vector × matrix composition
//! under a semiring.
//!
//! ## Relations
//!
//! | Name | Rows → Columns | Meaning |
//! |------|----------------|---------|
//! | **BT** | block → tx | transaction belongs to block |
//! | **IT** | input → tx | transaction consumes input |
//! | **TO** | tx → output | transaction creates output |
//! | **SI** | address → input | address spends input |
//! | **OR** | output → address | output pays address |
//! | **ST** | address → tx | address is sender of transaction |
//! | **TR** | tx → address | address is receiver of transaction |
//! | **SR** | address → address | sender paid receiver |
//! | **IO** | input → output | input funds output |
//! | **Flow** | occurrence → occurrence | funds move from spend to receipt and on |
//!
//! ## Identifier Space
//!
//! ```text
//!   63      60 59            32 31             0
//!  ┌──────────┬────────────────┬────────────────┐
//!  │ reserved │  block number  │ slot in block  │
//!  └──────────┴────────────────┴────────────────┘
//!  block(id) = id >> 32        INDEX_MAX = 2^60
//! ```
//!
//! ## Core Architecture
//!
//! - **GraphBLAS substrate**: hypersparse CSR/CSC relations, sparse vectors,
//!   semirings and descriptors ([`graphblas`])
//! - **Relation store**: named relations with a pending delta and `flush`
//!   ([`chain`])
//! - **Traversal engines**: level/parent BFS, min-cost exposure and
//!   address-to-address flow tracing ([`traversal`])
//! - **Entities**: `Address`, `Block`, `Tx`, `Input`, `Output` handles that
//!   seed the engines from their own ids ([`entity`])
//!
//! ## One BFS Round
//!
//! ```text
//! q⟨¬π, replace⟩ = q ANY.SECONDI SR     (new ids, each with one predecessor)
//! π⟨q, struct⟩   = q                    (merge, never overwrite)
//! ```

use serde::{Deserialize, Serialize};

use std::path::Path;

// === Sparse algebra ===
pub mod graphblas;

// === Ledger model ===
pub mod chain;
pub mod ids;

// === Analysis ===
pub mod entity;
pub mod traversal;

// ========================================================================
// Re-exports
// ========================================================================

pub use chain::{Chain, RelationName, RelationStore};
pub use entity::{Address, Block, Input, Output, RequestCache, Tx};
pub use graphblas::{
    AnySecondI, CostMetric, Descriptor, GrBDesc, GrBIndex, GrBMatrix, GrBVector, MinPlus,
    Semiring, INDEX_MAX,
};
pub use ids::{block_number, BlockId, Id, BLOCK_SHIFT};
pub use traversal::{
    exposure, trace, traverse, FlowTrace, TraceDiagnostic, TraversalMode, UNBOUNDED,
};

// ========================================================================
// Error types
// ========================================================================

/// Error types for ledger relation operations
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Index {index} outside dimension {dim}")]
    InvalidIndex { index: u64, dim: u64 },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: u64, got: u64 },

    #[error("Unknown relation: {0}")]
    UnknownRelation(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

// ========================================================================
// Configuration
// ========================================================================

/// Settings shared by the traversal engines
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Round ceiling for every traversal (`None`: unbounded)
    pub max_depth: Option<usize>,
    /// Edge cost used by exposure and flow tracing (default: hops)
    pub metric: CostMetric,
    /// Emit a progress event every this many rounds
    pub progress_every: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            metric: CostMetric::Hops,
            progress_every: 16,
        }
    }
}

impl TraceConfig {
    /// Parse from a TOML document; missing keys take their defaults
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        if config.progress_every == 0 {
            return Err(LedgerError::InvalidValue("progress_every must be at least 1".into()));
        }
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Set the round ceiling; [`UNBOUNDED`] clears it
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = (depth != UNBOUNDED).then_some(depth);
        self
    }

    pub fn with_metric(mut self, metric: CostMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Round ceiling the engines run under
    pub fn depth_bound(&self) -> usize {
        self.max_depth.unwrap_or(UNBOUNDED)
    }
}
