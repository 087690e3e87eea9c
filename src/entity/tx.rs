//! Transactions and their occurrences.
//!
//! An `Input` is one spend (an address consuming funds), an `Output` one
//! receipt (funds paid to an address). Both carry the value of the edge
//! they were read from.

use crate::chain::{RelationName, RelationStore};
use crate::graphblas::GrBVector;
use crate::ids::Id;
use crate::Result;

use super::{Address, Block};

/// A transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tx {
    pub id: Id,
}

impl Tx {
    pub fn new(id: Id) -> Self {
        Self { id }
    }

    /// Block the transaction was minted in
    pub fn block(&self) -> Block {
        Block::from_id(self.id)
    }

    /// Inputs consumed (`IT[:, tx]`)
    pub fn inputs<S: RelationStore + ?Sized>(&self, store: &S) -> Result<Vec<Input>> {
        Ok(occurrences(&store.col(RelationName::InputTx, self.id)?, Input::new))
    }

    /// Outputs created (`TO[tx, :]`)
    pub fn outputs<S: RelationStore + ?Sized>(&self, store: &S) -> Result<Vec<Output>> {
        Ok(occurrences(&store.row(RelationName::TxOutput, self.id)?, Output::new))
    }

    /// Sending addresses (`ST[:, tx]`)
    pub fn senders<S: RelationStore + ?Sized>(&self, store: &S) -> Result<Vec<Address>> {
        let col = store.col(RelationName::SenderTx, self.id)?;
        Ok(col.indices().map(Address::new).collect())
    }

    /// Receiving addresses (`TR[tx, :]`)
    pub fn receivers<S: RelationStore + ?Sized>(&self, store: &S) -> Result<Vec<Address>> {
        let row = store.row(RelationName::TxReceiver, self.id)?;
        Ok(row.indices().map(Address::new).collect())
    }
}

/// A spend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Input {
    pub id: Id,
    pub value: u64,
}

impl Input {
    pub fn new(id: Id, value: u64) -> Self {
        Self { id, value }
    }

    /// Transaction consuming this input (`IT[input, :]`)
    pub fn tx<S: RelationStore + ?Sized>(&self, store: &S) -> Result<Option<Tx>> {
        let row = store.row(RelationName::InputTx, self.id)?;
        let tx = row.indices().next().map(Tx::new);
        Ok(tx)
    }

    /// Address doing the spending (`SI[:, input]`)
    pub fn sender<S: RelationStore + ?Sized>(&self, store: &S) -> Result<Option<Address>> {
        let col = store.col(RelationName::SenderInput, self.id)?;
        let sender = col.indices().next().map(Address::new);
        Ok(sender)
    }

    /// Outputs this input funds (`IO[input, :]`)
    pub fn funds<S: RelationStore + ?Sized>(&self, store: &S) -> Result<Vec<Output>> {
        Ok(occurrences(&store.row(RelationName::InputOutput, self.id)?, Output::new))
    }
}

/// A receipt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Output {
    pub id: Id,
    pub value: u64,
}

impl Output {
    pub fn new(id: Id, value: u64) -> Self {
        Self { id, value }
    }

    /// Transaction that created this output (`TO[:, output]`)
    pub fn tx<S: RelationStore + ?Sized>(&self, store: &S) -> Result<Option<Tx>> {
        let col = store.col(RelationName::TxOutput, self.id)?;
        let tx = col.indices().next().map(Tx::new);
        Ok(tx)
    }

    /// Address being paid (`OR[output, :]`)
    pub fn receiver<S: RelationStore + ?Sized>(&self, store: &S) -> Result<Option<Address>> {
        let row = store.row(RelationName::OutputReceiver, self.id)?;
        let receiver = row.indices().next().map(Address::new);
        Ok(receiver)
    }

    /// Input that later spends this output, if any (`IO` does not record
    /// it; the occurrence graph does)
    pub fn spent_by<S: RelationStore + ?Sized>(&self, store: &S) -> Result<Option<Input>> {
        let row = store.row(RelationName::Flow, self.id)?;
        let spender = row.iter().next().map(|(id, value)| Input::new(id, value));
        Ok(spender)
    }
}

pub(super) fn occurrences<T>(slice: &GrBVector<u64>, make: fn(Id, u64) -> T) -> Vec<T> {
    slice.iter().map(|(id, value)| make(id, value)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::tests::{ledger, ALICE, BOB};

    #[test]
    fn test_tx_slices() {
        let (chain, ids) = ledger();
        let t2 = Tx::new(ids.t2);

        assert_eq!(t2.block().number(), 2);
        assert_eq!(t2.inputs(&chain).unwrap(), vec![Input::new(ids.i1, 50)]);
        assert_eq!(
            t2.outputs(&chain).unwrap(),
            vec![Output::new(ids.o2, 30), Output::new(ids.o3, 20)]
        );
        assert_eq!(t2.senders(&chain).unwrap(), vec![Address::new(ALICE)]);
        assert_eq!(t2.receivers(&chain).unwrap(), vec![Address::new(ALICE), Address::new(BOB)]);
    }

    #[test]
    fn test_occurrence_links() {
        let (chain, ids) = ledger();
        let i1 = Input::new(ids.i1, 50);
        assert_eq!(i1.tx(&chain).unwrap(), Some(Tx::new(ids.t2)));
        assert_eq!(i1.sender(&chain).unwrap(), Some(Address::new(ALICE)));
        assert_eq!(i1.funds(&chain).unwrap().len(), 2);

        let o2 = Output::new(ids.o2, 30);
        assert_eq!(o2.tx(&chain).unwrap(), Some(Tx::new(ids.t2)));
        assert_eq!(o2.receiver(&chain).unwrap(), Some(Address::new(BOB)));
        assert_eq!(o2.spent_by(&chain).unwrap(), Some(Input::new(ids.i2, 30)));

        let o3 = Output::new(ids.o3, 20);
        assert_eq!(o3.spent_by(&chain).unwrap(), None);
    }

    #[test]
    fn test_spent_by_follows_the_money() {
        let (chain, ids) = ledger();
        let cache = crate::entity::RequestCache::new(&chain);

        // o1 → i1 → t2 → o2 → i2 → t3
        let i1 = Output::new(ids.o1, 50).spent_by(&cache).unwrap().unwrap();
        assert_eq!(i1, Input::new(ids.i1, 50));
        let t2 = i1.tx(&cache).unwrap().unwrap();
        let o2 = t2.outputs(&cache).unwrap()[0];
        let i2 = o2.spent_by(&cache).unwrap().unwrap();
        assert_eq!(i2.tx(&cache).unwrap(), Some(Tx::new(ids.t3)));

        // o4 is unspent
        assert_eq!(Output::new(ids.o4, 30).spent_by(&cache).unwrap(), None);
    }
}
