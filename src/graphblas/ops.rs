//! GraphBLAS Operations
//!
//! Output-writing operations following the GraphBLAS C API shape
//! (`w⟨mask⟩ ⊙= op(...)`), used by the traversal engines to stage each
//! round's result and merge it into their accumulators.

use super::descriptor::Descriptor;
use super::matrix::GrBMatrix;
use super::semiring::Semiring;
use super::types::{Element, GrBIndex, GrBMonoid};
use super::vector::GrBVector;
use crate::{LedgerError, Result};

// ============================================================================
// MULTIPLY
// ============================================================================

/// Vector-matrix multiply: w⟨mask⟩ ⊙= u ⊕.⊗ A
///
/// # Arguments
/// * `w` - Output vector (will be modified)
/// * `mask` - Optional mask vector
/// * `accum` - Optional accumulator (how to combine with existing w)
/// * `semiring` - The semiring to use
/// * `u` - Input frontier
/// * `a` - Relation
/// * `desc` - Operation descriptor
pub fn grb_vxm<S, M>(
    w: &mut GrBVector<S::Output>,
    mask: Option<&GrBVector<M>>,
    accum: Option<GrBMonoid>,
    semiring: &S,
    u: &GrBVector<S::Input>,
    a: &GrBMatrix<S::Edge>,
    desc: &Descriptor,
) -> Result<()>
where
    S: Semiring,
    M: Element,
{
    let mut result = a.vxm(u, semiring, mask, desc)?;

    if let Some(monoid) = accum {
        result = w.ewise_add(&result, |old, new| S::Output::combine(monoid, old, new));
    }

    write_output(w, result, mask, desc)
}

// ============================================================================
// ELEMENT-WISE OPERATIONS
// ============================================================================

/// Element-wise vector multiplication (pattern intersection):
/// w⟨mask⟩ = u ⊗ v, keeping u's values
pub fn grb_ewise_mult_first<T, U, M>(
    w: &mut GrBVector<T>,
    mask: Option<&GrBVector<M>>,
    u: &GrBVector<T>,
    v: &GrBVector<U>,
    desc: &Descriptor,
) -> Result<()>
where
    T: Element,
    U: Element,
    M: Element,
{
    if u.len() != v.len() {
        return Err(LedgerError::DimensionMismatch { expected: u.len(), got: v.len() });
    }
    let mut result = u.ewise_mult(v, |a, _| a);
    if let Some(m) = mask {
        result = result.apply_mask(m, desc);
    }
    write_output(w, result, mask, desc)
}

// ============================================================================
// ASSIGN
// ============================================================================

/// Masked vector assign: w⟨mask⟩ = u
///
/// With a structural mask equal to `u` this is "copy every new entry
/// of u into w", the merge step of each traversal round.
pub fn grb_assign<T, M>(
    w: &mut GrBVector<T>,
    mask: Option<&GrBVector<M>>,
    u: &GrBVector<T>,
    desc: &Descriptor,
) -> Result<()>
where
    T: Element,
    M: Element,
{
    if w.len() != u.len() {
        return Err(LedgerError::DimensionMismatch { expected: w.len(), got: u.len() });
    }
    let result = match mask {
        Some(m) => u.apply_mask(m, desc),
        None => u.clone(),
    };
    write_output(w, result, mask, desc)
}

/// Masked scalar assign: w⟨mask⟩ = value
///
/// The mask enumerates the written positions, so it must not be
/// complemented (that would address the whole identifier space).
pub fn grb_assign_scalar<T, M>(
    w: &mut GrBVector<T>,
    mask: &GrBVector<M>,
    value: T,
    desc: &Descriptor,
) -> Result<()>
where
    T: Element,
    M: Element,
{
    if desc.is_mask_complemented() {
        return Err(LedgerError::InvalidValue(
            "scalar assign requires a non-complemented mask".into(),
        ));
    }
    let targets: Vec<GrBIndex> = mask.indices().filter(|&i| mask.admits(i, desc)).collect();
    let result = GrBVector::from_indices(w.len(), targets, value)?;
    write_output(w, result, Some(mask), desc)
}

// ============================================================================
// REDUCE
// ============================================================================

/// Reduce vector to scalar; `None` when `u` is empty
pub fn grb_reduce_vector<T: Element>(u: &GrBVector<T>, monoid: GrBMonoid) -> Option<T> {
    u.reduce(monoid)
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Write a staged result into `w`.
///
/// Replace mode drops every old entry the mask does not protect; merge mode
/// overwrites only the positions present in `result`.
fn write_output<T, M>(
    w: &mut GrBVector<T>,
    result: GrBVector<T>,
    mask: Option<&GrBVector<M>>,
    desc: &Descriptor,
) -> Result<()>
where
    T: Element,
    M: Element,
{
    if desc.should_replace_output() {
        match mask {
            Some(m) => {
                let kept = w.apply_mask(m, desc);
                *w = kept;
            }
            None => w.clear(),
        }
    }

    for (idx, val) in result.iter() {
        w.set(idx, val)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphblas::descriptor::GrBDesc;
    use crate::graphblas::semiring::{AnySecondI, MinPlus};

    fn chain() -> GrBMatrix<u64> {
        GrBMatrix::from_triples(6, 6, [(0, 1, 3), (1, 2, 3), (2, 3, 3)]).unwrap()
    }

    #[test]
    fn test_vxm_replace_with_complement_mask() {
        let a = chain();
        let visited = GrBVector::from_entries(6, [(0, 0i64), (1, 0)]).unwrap();
        let frontier = GrBVector::from_entries(6, [(0, 0i64), (1, 1)]).unwrap();
        let mut q = frontier.clone();

        grb_vxm(&mut q, Some(&visited), None, &AnySecondI, &frontier, &a, &GrBDesc::rsc()).unwrap();

        // 1 is visited, so only 2 survives; old frontier entries are gone
        assert_eq!(q.to_pairs(), vec![(2, 1)]);
    }

    #[test]
    fn test_vxm_min_accum() {
        let a = chain();
        let mut cost = GrBVector::from_entries(6, [(0, 0i64), (2, 1)]).unwrap();
        let u = cost.clone();

        grb_vxm::<_, bool>(&mut cost, None, Some(GrBMonoid::Min), &MinPlus::hops(), &u, &a, &Descriptor::new())
            .unwrap();

        // 1 reached at 1 hop, 2 keeps its cheaper 1, 3 reached at 2
        assert_eq!(cost.to_pairs(), vec![(0, 0), (1, 1), (2, 1), (3, 2)]);
    }

    #[test]
    fn test_assign_structural() {
        let mut pi = GrBVector::from_entries(6, [(0, 0i64)]).unwrap();
        let q = GrBVector::from_entries(6, [(1, 0i64), (2, 1)]).unwrap();

        grb_assign(&mut pi, Some(&q), &q, &GrBDesc::s()).unwrap();
        assert_eq!(pi.to_pairs(), vec![(0, 0), (1, 0), (2, 1)]);
    }

    #[test]
    fn test_assign_scalar() {
        let mut pi = GrBVector::from_entries(6, [(0, 0i64)]).unwrap();
        let q = GrBVector::from_entries(6, [(3, 9i64), (4, 9)]).unwrap();

        grb_assign_scalar(&mut pi, &q, 2, &GrBDesc::s()).unwrap();
        assert_eq!(pi.to_pairs(), vec![(0, 0), (3, 2), (4, 2)]);

        assert!(grb_assign_scalar(&mut pi, &q, 2, &GrBDesc::sc()).is_err());
    }

    #[test]
    fn test_ewise_mult_first() {
        let cost = GrBVector::from_entries(6, [(1, 4i64), (3, 6), (5, 8)]).unwrap();
        let pattern = GrBVector::from_indices(6, [3, 4, 5], true).unwrap();
        let mut found = GrBVector::new(6);

        grb_ewise_mult_first::<_, _, bool>(&mut found, None, &cost, &pattern, &Descriptor::new()).unwrap();
        assert_eq!(found.to_pairs(), vec![(3, 6), (5, 8)]);
    }

    #[test]
    fn test_reduce_vector() {
        let u = GrBVector::from_entries(6, [(1, 4u64), (3, 6)]).unwrap();
        assert_eq!(grb_reduce_vector(&u, GrBMonoid::Max), Some(6));
    }
}
