//! Sparse Storage Formats
//!
//! Provides COO (Coordinate) storage for append-only ingestion and
//! hypersparse CSR storage for composition. Dimensions are the full
//! identifier space, so CSR only materializes rows that hold entries.

use std::collections::BTreeMap;

use super::types::{Element, GrBIndex};
use crate::{LedgerError, Result};

/// Entry in sparse storage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SparseEntry<T> {
    pub row: GrBIndex,
    pub col: GrBIndex,
    pub value: T,
}

/// COO (Coordinate) format storage
///
/// Stores triples (row, col, value) in arrival order.
/// Good for: ingestion, conversion
#[derive(Clone, Debug)]
pub struct CooStorage<T> {
    rows: Vec<GrBIndex>,
    cols: Vec<GrBIndex>,
    values: Vec<T>,
    nrows: GrBIndex,
    ncols: GrBIndex,
}

impl<T: Element> CooStorage<T> {
    /// Create empty COO storage
    pub fn new(nrows: GrBIndex, ncols: GrBIndex) -> Self {
        Self::with_capacity(nrows, ncols, 0)
    }

    /// Create with capacity
    pub fn with_capacity(nrows: GrBIndex, ncols: GrBIndex, nnz: usize) -> Self {
        Self {
            rows: Vec::with_capacity(nnz),
            cols: Vec::with_capacity(nnz),
            values: Vec::with_capacity(nnz),
            nrows,
            ncols,
        }
    }

    /// Add an entry. Out-of-range positions are rejected.
    pub fn add(&mut self, row: GrBIndex, col: GrBIndex, value: T) -> Result<()> {
        if row >= self.nrows {
            return Err(LedgerError::InvalidIndex { index: row, dim: self.nrows });
        }
        if col >= self.ncols {
            return Err(LedgerError::InvalidIndex { index: col, dim: self.ncols });
        }
        self.rows.push(row);
        self.cols.push(col);
        self.values.push(value);
        Ok(())
    }

    /// Number of stored triples (duplicates included)
    pub fn nnz(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get dimensions
    pub fn dims(&self) -> (GrBIndex, GrBIndex) {
        (self.nrows, self.ncols)
    }

    /// Drop all triples, keeping dimensions
    pub fn clear(&mut self) {
        self.rows.clear();
        self.cols.clear();
        self.values.clear();
    }

    /// Iterator over entries in arrival order
    pub fn iter(&self) -> impl Iterator<Item = SparseEntry<T>> + '_ {
        (0..self.nnz()).map(move |i| SparseEntry {
            row: self.rows[i],
            col: self.cols[i],
            value: self.values[i],
        })
    }

    /// Entries sorted by (row, col); a later duplicate replaces an earlier one
    fn sorted_entries(&self) -> Vec<SparseEntry<T>> {
        let mut entries: Vec<SparseEntry<T>> = self.iter().collect();
        // Stable sort keeps arrival order among equal positions
        entries.sort_by_key(|e| (e.row, e.col));

        let mut deduped: Vec<SparseEntry<T>> = Vec::with_capacity(entries.len());
        for entry in entries {
            match deduped.last_mut() {
                Some(last) if last.row == entry.row && last.col == entry.col => *last = entry,
                _ => deduped.push(entry),
            }
        }
        deduped
    }

    /// Convert to hypersparse CSR format
    pub fn to_csr(&self) -> CsrStorage<T> {
        CsrStorage::from_sorted(self.nrows, self.ncols, self.sorted_entries())
    }
}

/// Hypersparse CSR (Compressed Sparse Row) format storage
///
/// Only rows holding at least one entry appear in `row_ids`.
///
/// ```text
/// row_ids:  [ 1,     2,        7 ]
/// row_ptr:  [ 0,     1,        3,  4 ]
/// col_idx:  [ 2,     3, 4,     1 ]
/// ```
#[derive(Clone, Debug)]
pub struct CsrStorage<T> {
    /// Non-empty row ids, ascending
    pub row_ids: Vec<GrBIndex>,
    /// Row pointers (size row_ids.len() + 1)
    pub row_ptr: Vec<usize>,
    /// Column indices (size nnz), ascending within a row
    pub col_idx: Vec<GrBIndex>,
    /// Values (size nnz)
    pub values: Vec<T>,
    nrows: GrBIndex,
    ncols: GrBIndex,
}

impl<T: Element> CsrStorage<T> {
    /// Create empty CSR storage
    pub fn new(nrows: GrBIndex, ncols: GrBIndex) -> Self {
        Self {
            row_ids: Vec::new(),
            row_ptr: vec![0],
            col_idx: Vec::new(),
            values: Vec::new(),
            nrows,
            ncols,
        }
    }

    /// Build from entries already sorted by (row, col) without duplicates
    fn from_sorted(nrows: GrBIndex, ncols: GrBIndex, entries: Vec<SparseEntry<T>>) -> Self {
        let mut csr = Self::new(nrows, ncols);
        csr.col_idx.reserve(entries.len());
        csr.values.reserve(entries.len());

        for entry in entries {
            if csr.row_ids.last() != Some(&entry.row) {
                if !csr.row_ids.is_empty() {
                    csr.row_ptr.push(csr.col_idx.len());
                }
                csr.row_ids.push(entry.row);
            }
            csr.col_idx.push(entry.col);
            csr.values.push(entry.value);
        }
        if !csr.row_ids.is_empty() {
            csr.row_ptr.push(csr.col_idx.len());
        }
        csr
    }

    /// Number of non-zeros
    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    /// Get dimensions
    pub fn dims(&self) -> (GrBIndex, GrBIndex) {
        (self.nrows, self.ncols)
    }

    fn row_range(&self, row: GrBIndex) -> Option<(usize, usize)> {
        let pos = self.row_ids.binary_search(&row).ok()?;
        Some((self.row_ptr[pos], self.row_ptr[pos + 1]))
    }

    /// Get value at (row, col)
    pub fn get(&self, row: GrBIndex, col: GrBIndex) -> Option<T> {
        let (start, end) = self.row_range(row)?;
        // Binary search within row
        let idx = self.col_idx[start..end].binary_search(&col).ok()?;
        Some(self.values[start + idx])
    }

    /// Get row as iterator of (col, value)
    pub fn row(&self, row: GrBIndex) -> impl Iterator<Item = (GrBIndex, T)> + '_ {
        let (start, end) = self.row_range(row).unwrap_or((0, 0));
        self.col_idx[start..end]
            .iter()
            .zip(self.values[start..end].iter())
            .map(|(&col, &val)| (col, val))
    }

    /// Number of non-zeros in row
    pub fn row_nnz(&self, row: GrBIndex) -> usize {
        self.row_range(row).map_or(0, |(start, end)| end - start)
    }

    /// Iterate all entries in (row, col) order
    pub fn iter(&self) -> impl Iterator<Item = SparseEntry<T>> + '_ {
        self.row_ids.iter().enumerate().flat_map(move |(pos, &row)| {
            let (start, end) = (self.row_ptr[pos], self.row_ptr[pos + 1]);
            (start..end).map(move |i| SparseEntry {
                row,
                col: self.col_idx[i],
                value: self.values[i],
            })
        })
    }

    /// Convert to COO format
    pub fn to_coo(&self) -> CooStorage<T> {
        let mut coo = CooStorage::with_capacity(self.nrows, self.ncols, self.nnz());
        for entry in self.iter() {
            coo.rows.push(entry.row);
            coo.cols.push(entry.col);
            coo.values.push(entry.value);
        }
        coo
    }

    /// Transpose (returns CSR of the transposed matrix, i.e. this matrix's CSC)
    pub fn transpose(&self) -> CsrStorage<T> {
        let mut entries: Vec<SparseEntry<T>> = self
            .iter()
            .map(|e| SparseEntry { row: e.col, col: e.row, value: e.value })
            .collect();
        entries.sort_by_key(|e| (e.row, e.col));
        CsrStorage::from_sorted(self.ncols, self.nrows, entries)
    }
}

/// Sparse vector storage, ordered by index
#[derive(Clone, Debug, PartialEq)]
pub struct SparseVec<T> {
    /// Present entries
    pub entries: BTreeMap<GrBIndex, T>,
    /// Length
    pub len: GrBIndex,
}

impl<T: Element> SparseVec<T> {
    /// Create empty sparse vector
    pub fn new(len: GrBIndex) -> Self {
        Self {
            entries: BTreeMap::new(),
            len,
        }
    }

    /// Set element; out-of-range indices are rejected
    pub fn insert(&mut self, idx: GrBIndex, value: T) -> Result<()> {
        if idx >= self.len {
            return Err(LedgerError::InvalidIndex { index: idx, dim: self.len });
        }
        self.entries.insert(idx, value);
        Ok(())
    }

    /// Number of present entries
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Get value at index
    pub fn get(&self, idx: GrBIndex) -> Option<T> {
        self.entries.get(&idx).copied()
    }

    /// Iterator over (index, value) pairs in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = (GrBIndex, T)> + '_ {
        self.entries.iter().map(|(&i, &v)| (i, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coo_storage() {
        let mut coo = CooStorage::new(3, 3);

        coo.add(0, 0, 1u64).unwrap();
        coo.add(0, 2, 2u64).unwrap();
        coo.add(1, 1, 3u64).unwrap();
        coo.add(2, 0, 4u64).unwrap();

        assert_eq!(coo.nnz(), 4);
        assert!(coo.add(3, 0, 5u64).is_err());
        assert!(coo.add(0, 3, 5u64).is_err());
    }

    #[test]
    fn test_coo_to_csr() {
        let mut coo = CooStorage::new(10, 10);

        coo.add(7, 1, 4u64).unwrap();
        coo.add(1, 2, 1u64).unwrap();
        coo.add(2, 4, 3u64).unwrap();
        coo.add(2, 3, 2u64).unwrap();

        let csr = coo.to_csr();

        assert_eq!(csr.nnz(), 4);
        assert_eq!(csr.row_ids, vec![1, 2, 7]);
        assert_eq!(csr.row_ptr, vec![0, 1, 3, 4]);
        assert_eq!(csr.get(2, 3), Some(2));
        assert_eq!(csr.get(2, 5), None);
        assert_eq!(csr.row_nnz(2), 2);
        assert_eq!(csr.row_nnz(5), 0);
    }

    #[test]
    fn test_duplicate_keeps_latest() {
        let mut coo = CooStorage::new(4, 4);
        coo.add(1, 2, 10u64).unwrap();
        coo.add(1, 2, 20u64).unwrap();

        let csr = coo.to_csr();
        assert_eq!(csr.nnz(), 1);
        assert_eq!(csr.get(1, 2), Some(20));
    }

    #[test]
    fn test_csr_row_iteration() {
        let mut coo = CooStorage::new(3, 4);

        coo.add(1, 3, 3u64).unwrap();
        coo.add(1, 0, 1u64).unwrap();
        coo.add(1, 2, 2u64).unwrap();

        let csr = coo.to_csr();

        let row1: Vec<_> = csr.row(1).collect();
        assert_eq!(row1, vec![(0, 1), (2, 2), (3, 3)]);
        assert_eq!(csr.row(0).count(), 0);
    }

    #[test]
    fn test_transpose() {
        let mut coo = CooStorage::new(5, 8);
        coo.add(1, 7, 1u64).unwrap();
        coo.add(3, 7, 2u64).unwrap();
        coo.add(3, 0, 3u64).unwrap();

        let csc = coo.to_csr().transpose();
        assert_eq!(csc.dims(), (8, 5));
        assert_eq!(csc.row(7).collect::<Vec<_>>(), vec![(1, 1), (3, 2)]);
        assert_eq!(csc.get(0, 3), Some(3));
        assert_eq!(csc.to_coo().nnz(), 3);
    }

    #[test]
    fn test_sparse_vec_bounds() {
        let mut v = SparseVec::new(4);
        v.insert(3, true).unwrap();
        assert!(v.insert(4, true).is_err());
        assert_eq!(v.nnz(), 1);
        assert_eq!(v.get(3), Some(true));
    }
}
