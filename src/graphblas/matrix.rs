//! GraphBLAS Matrix for Ledger Relations
//!
//! A relation is an append-only sparse matrix over the identifier space.
//! Writes land in a pending COO delta; `flush` folds the delta into the
//! committed hypersparse CSR (and its transpose). Composition only ever
//! reads the committed storage, so a flushed matrix can be shared across
//! threads and traversed concurrently.
//!
//! ```text
//!   committed (CSR + CSC)        pending (COO)
//!   ┌────────────────────┐      ┌──────────────┐
//!   │ sorted, immutable  │  ◄── │ arrival order │   flush()
//!   └────────────────────┘      └──────────────┘
//!   read by vxm / row / col      written by set()
//! ```

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use super::descriptor::Descriptor;
use super::semiring::Semiring;
use super::sparse::{CooStorage, CsrStorage, SparseEntry};
use super::types::{Element, GrBIndex, GrBType, INDEX_MAX};
use super::vector::GrBVector;
use crate::{LedgerError, Result};

/// Frontier size at which `vxm` fans out over the rayon pool.
#[cfg(feature = "rayon")]
const PAR_FRONTIER_MIN: usize = 4096;

/// GraphBLAS Matrix
#[derive(Clone, Debug)]
pub struct GrBMatrix<T> {
    /// Committed rows
    main: CsrStorage<T>,
    /// Committed columns (CSR of the transpose)
    transposed: CsrStorage<T>,
    /// Writes not yet visible to composition
    pending: CooStorage<T>,
    nrows: GrBIndex,
    ncols: GrBIndex,
}

impl<T: Element> GrBMatrix<T> {
    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    /// Create a new empty matrix
    pub fn new(nrows: GrBIndex, ncols: GrBIndex) -> Self {
        Self {
            main: CsrStorage::new(nrows, ncols),
            transposed: CsrStorage::new(ncols, nrows),
            pending: CooStorage::new(nrows, ncols),
            nrows,
            ncols,
        }
    }

    /// Create an empty square matrix spanning the whole identifier space
    pub fn maximal() -> Self {
        Self::new(INDEX_MAX, INDEX_MAX)
    }

    /// Create from (src, dst, value) triples and commit them
    pub fn from_triples<I>(nrows: GrBIndex, ncols: GrBIndex, triples: I) -> Result<Self>
    where
        I: IntoIterator<Item = (GrBIndex, GrBIndex, T)>,
    {
        let mut m = Self::new(nrows, ncols);
        for (row, col, val) in triples {
            m.set(row, col, val)?;
        }
        m.flush();
        Ok(m)
    }

    // ========================================================================
    // PROPERTIES
    // ========================================================================

    /// Number of rows
    pub fn nrows(&self) -> GrBIndex {
        self.nrows
    }

    /// Number of columns
    pub fn ncols(&self) -> GrBIndex {
        self.ncols
    }

    /// Number of committed entries (the relation's cardinality)
    pub fn nvals(&self) -> usize {
        self.main.nnz()
    }

    /// Number of writes waiting for `flush`
    pub fn pending_nvals(&self) -> usize {
        self.pending.nnz()
    }

    /// Element type
    pub fn dtype(&self) -> GrBType {
        T::DTYPE
    }

    /// Is there pending work?
    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    // ========================================================================
    // ELEMENT ACCESS
    // ========================================================================

    /// Get committed element at (row, col)
    pub fn get(&self, row: GrBIndex, col: GrBIndex) -> Option<T> {
        self.main.get(row, col)
    }

    /// Stage an element; visible after `flush`
    pub fn set(&mut self, row: GrBIndex, col: GrBIndex, value: T) -> Result<()> {
        self.pending.add(row, col, value)
    }

    /// Fold pending writes into the committed storage.
    ///
    /// Later writes to an existing position replace the committed value.
    pub fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let mut merged = self.main.to_coo();
        for entry in self.pending.iter() {
            // Positions were validated by `set`
            let _ = merged.add(entry.row, entry.col, entry.value);
        }
        self.main = merged.to_csr();
        self.transposed = self.main.transpose();
        self.pending.clear();
    }

    // ========================================================================
    // SLICES & ITERATION
    // ========================================================================

    /// Row slice `A[row, :]` as a vector over columns
    pub fn row(&self, row: GrBIndex) -> Result<GrBVector<T>> {
        if row >= self.nrows {
            return Err(LedgerError::InvalidIndex { index: row, dim: self.nrows });
        }
        Ok(GrBVector::from_map(self.ncols, self.main.row(row).collect()))
    }

    /// Column slice `A[:, col]` as a vector over rows
    pub fn col(&self, col: GrBIndex) -> Result<GrBVector<T>> {
        if col >= self.ncols {
            return Err(LedgerError::InvalidIndex { index: col, dim: self.ncols });
        }
        Ok(GrBVector::from_map(self.nrows, self.transposed.row(col).collect()))
    }

    /// Iterate over committed entries in (row, col) order
    pub fn iter(&self) -> impl Iterator<Item = SparseEntry<T>> + '_ {
        self.main.iter()
    }

    /// Transposed copy of the committed relation
    pub fn transpose(&self) -> GrBMatrix<T> {
        GrBMatrix {
            main: self.transposed.clone(),
            transposed: self.main.clone(),
            pending: CooStorage::new(self.ncols, self.nrows),
            nrows: self.ncols,
            ncols: self.nrows,
        }
    }

    // ========================================================================
    // OPERATIONS (GraphBLAS-style)
    // ========================================================================

    /// Vector-matrix multiply: w⟨mask⟩ = u ⊕.⊗ A
    ///
    /// With `desc.transpose` the product is taken against Aᵀ, i.e. it walks
    /// edges backwards. Destinations the mask rejects are never produced.
    pub fn vxm<S, M>(
        &self,
        u: &GrBVector<S::Input>,
        semiring: &S,
        mask: Option<&GrBVector<M>>,
        desc: &Descriptor,
    ) -> Result<GrBVector<S::Output>>
    where
        S: Semiring<Edge = T>,
        M: Element,
    {
        let (csr, dim_in, dim_out) = if desc.is_transposed() {
            (&self.transposed, self.ncols, self.nrows)
        } else {
            (&self.main, self.nrows, self.ncols)
        };
        if u.len() != dim_in {
            return Err(LedgerError::DimensionMismatch { expected: dim_in, got: u.len() });
        }
        if let Some(m) = mask {
            if m.len() != dim_out {
                return Err(LedgerError::DimensionMismatch { expected: dim_out, got: m.len() });
            }
        }

        let admit = |dst: GrBIndex| mask.map_or(true, |m| m.admits(dst, desc));

        #[cfg(feature = "rayon")]
        if u.nvals() >= PAR_FRONTIER_MIN {
            return Ok(GrBVector::from_map(dim_out, par_compose(csr, u, semiring, &admit)));
        }

        Ok(GrBVector::from_map(dim_out, compose(csr, u.iter(), semiring, &admit)))
    }

    /// Matrix-vector multiply: w⟨mask⟩ = A ⊕.⊗ u, i.e. `u vxm Aᵀ`
    pub fn mxv<S, M>(
        &self,
        u: &GrBVector<S::Input>,
        semiring: &S,
        mask: Option<&GrBVector<M>>,
        desc: &Descriptor,
    ) -> Result<GrBVector<S::Output>>
    where
        S: Semiring<Edge = T>,
        M: Element,
    {
        let flipped = Descriptor { transpose: !desc.transpose, ..*desc };
        self.vxm(u, semiring, mask, &flipped)
    }
}

/// One composition pass over a run of frontier entries.
///
/// ```text
/// for each (src, u[src]) in frontier (ascending):
///   for each (dst, A[src, dst]) in row src:
///     if mask admits dst:
///       w[dst] = add(w[dst], multiply(u[src], A[src, dst], src, dst))
/// ```
fn compose<S, I, F>(
    csr: &CsrStorage<S::Edge>,
    frontier: I,
    semiring: &S,
    admit: &F,
) -> BTreeMap<GrBIndex, S::Output>
where
    S: Semiring,
    I: Iterator<Item = (GrBIndex, S::Input)>,
    F: Fn(GrBIndex) -> bool,
{
    let mut acc: BTreeMap<GrBIndex, S::Output> = BTreeMap::new();
    for (src, input) in frontier {
        for (dst, edge) in csr.row(src) {
            if !admit(dst) {
                continue;
            }
            let product = semiring.multiply(input, edge, src, dst);
            match acc.entry(dst) {
                Entry::Occupied(mut slot) => {
                    let merged = semiring.add(*slot.get(), product);
                    slot.insert(merged);
                }
                Entry::Vacant(slot) => {
                    slot.insert(product);
                }
            }
        }
    }
    acc
}

/// Parallel composition. Chunks are merged back in frontier order, so the
/// result is identical to the sequential pass for every semiring.
#[cfg(feature = "rayon")]
fn par_compose<S, F>(
    csr: &CsrStorage<S::Edge>,
    u: &GrBVector<S::Input>,
    semiring: &S,
    admit: &F,
) -> BTreeMap<GrBIndex, S::Output>
where
    S: Semiring,
    F: Fn(GrBIndex) -> bool + Sync,
{
    use rayon::prelude::*;

    let frontier: Vec<(GrBIndex, S::Input)> = u.iter().collect();
    let chunk = (frontier.len() / rayon::current_num_threads().max(1)).max(1);

    let partials: Vec<BTreeMap<GrBIndex, S::Output>> = frontier
        .par_chunks(chunk)
        .map(|run| compose(csr, run.iter().copied(), semiring, admit))
        .collect();

    let mut acc: BTreeMap<GrBIndex, S::Output> = BTreeMap::new();
    for partial in partials {
        for (dst, val) in partial {
            match acc.entry(dst) {
                Entry::Occupied(mut slot) => {
                    let merged = semiring.add(*slot.get(), val);
                    slot.insert(merged);
                }
                Entry::Vacant(slot) => {
                    slot.insert(val);
                }
            }
        }
    }
    acc
}
