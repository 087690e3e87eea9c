use crate::chain::{RelationName, RelationStore};
use crate::graphblas::{CostMetric, GrBVector};
use crate::ids::Id;
use crate::traversal::{self, FlowTrace, TraversalMode};
use crate::Result;

use super::tx::occurrences;
use super::{Input, Output, Tx};

/// A ledger address
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    pub id: Id,
}

impl Address {
    pub fn new(id: Id) -> Self {
        Self { id }
    }

    /// Inputs this address spent (`SI[addr, :]`)
    pub fn sent<S: RelationStore + ?Sized>(&self, store: &S) -> Result<Vec<Input>> {
        Ok(occurrences(&store.row(RelationName::SenderInput, self.id)?, Input::new))
    }

    /// Outputs paid to this address (`OR[:, addr]`)
    pub fn received<S: RelationStore + ?Sized>(&self, store: &S) -> Result<Vec<Output>> {
        Ok(occurrences(&store.col(RelationName::OutputReceiver, self.id)?, Output::new))
    }

    /// Transactions this address sent (`ST[addr, :]`)
    pub fn tx_sender<S: RelationStore + ?Sized>(&self, store: &S) -> Result<Vec<Tx>> {
        let row = store.row(RelationName::SenderTx, self.id)?;
        Ok(row.indices().map(Tx::new).collect())
    }

    /// Transactions that paid this address (`TR[:, addr]`)
    pub fn tx_receiver<S: RelationStore + ?Sized>(&self, store: &S) -> Result<Vec<Tx>> {
        let col = store.col(RelationName::TxReceiver, self.id)?;
        Ok(col.indices().map(Tx::new).collect())
    }

    /// BFS levels over the sender → receiver graph
    pub fn bfs_level<S: RelationStore + ?Sized>(&self, store: &S, depth: usize) -> Result<GrBVector<i64>> {
        traversal::traverse(store, &[self.id], RelationName::SenderReceiver, depth, TraversalMode::Level)
    }

    /// BFS predecessors over the sender → receiver graph
    pub fn bfs_parent<S: RelationStore + ?Sized>(&self, store: &S, depth: usize) -> Result<GrBVector<i64>> {
        traversal::traverse(store, &[self.id], RelationName::SenderReceiver, depth, TraversalMode::Parent)
    }

    /// Cheapest cost to every address this one paid, directly or not
    pub fn bfs_exposure<S: RelationStore + ?Sized>(
        &self,
        store: &S,
        depth: usize,
        metric: CostMetric,
    ) -> Result<GrBVector<i64>> {
        traversal::exposure(store, &[self.id], RelationName::SenderReceiver, depth, metric)
    }

    /// Addresses reached within `depth` payments, with their level
    pub fn reached<S: RelationStore + ?Sized>(&self, store: &S, depth: usize) -> Result<Vec<(Address, usize)>> {
        let level = self.bfs_level(store, depth)?;
        Ok(level
            .iter()
            .filter(|&(id, _)| id != self.id)
            .map(|(id, l)| (Address::new(id), l as usize))
            .collect())
    }

    /// Trace funds spent by this address to the outputs later paid to
    /// `other`, over the occurrence graph.
    pub fn exposure_to<S: RelationStore + ?Sized>(
        &self,
        store: &S,
        other: &Address,
        depth: usize,
        metric: CostMetric,
    ) -> Result<FlowTrace> {
        let start: Vec<Id> = store.row(RelationName::SenderInput, self.id)?.indices().collect();
        let end: Vec<Id> = store.col(RelationName::OutputReceiver, other.id)?.indices().collect();
        traversal::trace(store, &start, &end, RelationName::Flow, depth, metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::tests::{ledger, ALICE, BOB, CAROL};
    use crate::entity::RequestCache;
    use crate::traversal::{TraceDiagnostic, UNBOUNDED};
    use crate::INDEX_MAX;

    #[test]
    fn test_occurrences() {
        let (chain, ids) = ledger();
        let alice = Address::new(ALICE);

        assert_eq!(alice.sent(&chain).unwrap(), vec![Input::new(ids.i1, 50)]);
        assert_eq!(
            alice.received(&chain).unwrap(),
            vec![Output::new(ids.o1, 50), Output::new(ids.o3, 20)]
        );
        assert_eq!(alice.tx_sender(&chain).unwrap(), vec![Tx::new(ids.t2)]);
        assert_eq!(alice.tx_receiver(&chain).unwrap(), vec![Tx::new(ids.t1), Tx::new(ids.t2)]);
    }

    #[test]
    fn test_bfs_over_payments() {
        let (chain, _) = ledger();
        let alice = Address::new(ALICE);

        assert_eq!(alice.bfs_level(&chain, UNBOUNDED).unwrap().to_pairs(), vec![(ALICE, 0), (BOB, 1), (CAROL, 2)]);
        assert_eq!(
            alice.bfs_parent(&chain, UNBOUNDED).unwrap().to_pairs(),
            vec![(ALICE, ALICE as i64), (BOB, ALICE as i64), (CAROL, BOB as i64)]
        );
        assert_eq!(
            alice.bfs_exposure(&chain, UNBOUNDED, CostMetric::Weight).unwrap().to_pairs(),
            vec![(ALICE, INDEX_MAX as i64), (BOB, 30), (CAROL, 60)]
        );
        assert_eq!(alice.reached(&chain, 1).unwrap(), vec![(Address::new(BOB), 1)]);
    }

    #[test]
    fn test_exposure_to() {
        let (chain, ids) = ledger();
        let alice = Address::new(ALICE);
        let carol = Address::new(CAROL);

        // i1 → o2 → i2 → o4
        let t = alice.exposure_to(&chain, &carol, UNBOUNDED, CostMetric::Hops).unwrap();
        assert_eq!(t.pairs, vec![(ids.o4, 3)]);
        assert!(t.converged);
        assert!(alice.exposure_to(&chain, &carol, 2, CostMetric::Hops).unwrap().is_empty());
    }

    #[test]
    fn test_exposure_to_diagnostics() {
        let (chain, _) = ledger();
        let alice = Address::new(ALICE);
        let bob = Address::new(BOB);
        let carol = Address::new(CAROL);

        let t = carol.exposure_to(&chain, &alice, UNBOUNDED, CostMetric::Hops).unwrap();
        assert_eq!(t.diagnostic, Some(TraceDiagnostic::NoStartOccurrences));

        let t = alice.exposure_to(&chain, &Address::new(99), UNBOUNDED, CostMetric::Hops).unwrap();
        assert_eq!(t.diagnostic, Some(TraceDiagnostic::NoEndOccurrences));

        // bob spent in block 3, alice was last paid in block 2
        let t = bob.exposure_to(&chain, &alice, UNBOUNDED, CostMetric::Hops).unwrap();
        assert_eq!(t.diagnostic, Some(TraceDiagnostic::NoFeasibleOrdering));
    }

    #[test]
    fn test_through_request_cache() {
        let (chain, _) = ledger();
        let cache = RequestCache::new(&chain);
        let alice = Address::new(ALICE);
        let carol = Address::new(CAROL);

        let direct = alice.exposure_to(&chain, &carol, UNBOUNDED, CostMetric::Hops).unwrap();
        let cached = alice.exposure_to(&cache, &carol, UNBOUNDED, CostMetric::Hops).unwrap();
        assert_eq!(direct, cached);
        assert_eq!(cache.len(), 2);

        alice.exposure_to(&cache, &carol, UNBOUNDED, CostMetric::Hops).unwrap();
        assert_eq!(cache.len(), 2);
    }
}
