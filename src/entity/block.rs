use crate::chain::{RelationName, RelationStore};
use crate::ids::{BlockId, Id};
use crate::Result;

use super::Tx;

/// A block, named by its number
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Block {
    id: BlockId,
}

impl Block {
    pub fn new(number: u64) -> Result<Self> {
        Ok(Self {
            id: BlockId::from_number(number)?,
        })
    }

    /// Block owning any ledger id
    pub fn from_id(id: Id) -> Self {
        Self { id: BlockId::of(id) }
    }

    pub fn id(&self) -> Id {
        self.id.raw()
    }

    pub fn number(&self) -> u64 {
        self.id.number()
    }

    /// Transactions recorded in this block (`BT[block, :]`)
    pub fn txs<S: RelationStore + ?Sized>(&self, store: &S) -> Result<Vec<Tx>> {
        let row = store.row(RelationName::BlockTx, self.id())?;
        Ok(row.indices().map(Tx::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::tests::ledger;

    #[test]
    fn test_block_from_any_id() {
        let b = Block::new(2).unwrap();
        assert_eq!(b.id(), 2 << 32);
        assert_eq!(Block::from_id(b.id() + 17), b);
        assert_eq!(Block::from_id(b.id() + 17).number(), 2);
    }

    #[test]
    fn test_block_txs() {
        let (chain, ids) = ledger();
        let b2 = Block::new(2).unwrap();
        assert_eq!(b2.txs(&chain).unwrap(), vec![Tx::new(ids.t2)]);
        assert!(Block::new(9).unwrap().txs(&chain).unwrap().is_empty());
    }
}
