//! Relation Store
//!
//! Named ledger relations over the shared identifier space. Engines only
//! see the [`RelationStore`] trait; [`Chain`] is the in-memory store that
//! ingestion appends into.
//!
//! ```text
//!   add_edge(SI, addr, input, value)      add_edge(Flow, input, output, value)
//!            │                                     │
//!            ▼                                     ▼
//!   ┌───────────────┐   flush()   ┌──────────────────────────────┐
//!   │ pending COO   │ ──────────► │ committed CSR + CSC per name │ ◄── traverse / trace
//!   └───────────────┘             └──────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::graphblas::{GrBMatrix, GrBVector};
use crate::ids::Id;
use crate::{LedgerError, Result};

/// Semantic role of a relation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationName {
    /// block → transaction in that block
    BlockTx,
    /// input → transaction consuming it
    InputTx,
    /// transaction → output it creates
    TxOutput,
    /// address → input it spends
    SenderInput,
    /// output → address it pays
    OutputReceiver,
    /// address → transaction it sends
    SenderTx,
    /// transaction → address it pays
    TxReceiver,
    /// sender address → receiver address
    SenderReceiver,
    /// input → output it funds
    InputOutput,
    /// occurrence graph: input → funded output, output → spending input
    Flow,
}

impl RelationName {
    pub const ALL: [RelationName; 10] = [
        RelationName::BlockTx,
        RelationName::InputTx,
        RelationName::TxOutput,
        RelationName::SenderInput,
        RelationName::OutputReceiver,
        RelationName::SenderTx,
        RelationName::TxReceiver,
        RelationName::SenderReceiver,
        RelationName::InputOutput,
        RelationName::Flow,
    ];

    /// Relations a single block carries before it is merged into the chain
    pub const PER_BLOCK: [RelationName; 3] =
        [RelationName::BlockTx, RelationName::InputTx, RelationName::TxOutput];

    /// Short matrix name (`SR`, `OR`, ...)
    pub fn short(self) -> &'static str {
        match self {
            RelationName::BlockTx => "BT",
            RelationName::InputTx => "IT",
            RelationName::TxOutput => "TO",
            RelationName::SenderInput => "SI",
            RelationName::OutputReceiver => "OR",
            RelationName::SenderTx => "ST",
            RelationName::TxReceiver => "TR",
            RelationName::SenderReceiver => "SR",
            RelationName::InputOutput => "IO",
            RelationName::Flow => "FLOW",
        }
    }
}

impl fmt::Display for RelationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short())
    }
}

impl FromStr for RelationName {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        RelationName::ALL
            .into_iter()
            .find(|name| name.short().eq_ignore_ascii_case(s))
            .ok_or_else(|| LedgerError::UnknownRelation(s.to_string()))
    }
}

/// Read-only access to committed relations.
///
/// Implementors must only hand out committed state, so traversals see the
/// relation set as of their last flush.
pub trait RelationStore: Sync {
    /// Committed relation by name
    fn relation(&self, name: RelationName) -> Result<&GrBMatrix<u64>>;

    /// Row slice `name[id, :]`
    fn row(&self, name: RelationName, id: Id) -> Result<GrBVector<u64>> {
        self.relation(name)?.row(id)
    }

    /// Column slice `name[:, id]`
    fn col(&self, name: RelationName, id: Id) -> Result<GrBVector<u64>> {
        self.relation(name)?.col(id)
    }

    /// Relation cardinality
    fn nvals(&self, name: RelationName) -> Result<usize> {
        Ok(self.relation(name)?.nvals())
    }
}

/// In-memory relation store
#[derive(Clone, Debug)]
pub struct Chain {
    relations: BTreeMap<RelationName, GrBMatrix<u64>>,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    /// Store holding every relation, all empty
    pub fn new() -> Self {
        Self::with_relations(&RelationName::ALL)
    }

    /// Store holding only `names`; asking for anything else is an error
    pub fn with_relations(names: &[RelationName]) -> Self {
        Self {
            relations: names.iter().map(|&n| (n, GrBMatrix::maximal())).collect(),
        }
    }

    /// Store for one block's own relations
    pub fn block_scope() -> Self {
        Self::with_relations(&RelationName::PER_BLOCK)
    }

    fn relation_mut(&mut self, name: RelationName) -> Result<&mut GrBMatrix<u64>> {
        self.relations
            .get_mut(&name)
            .ok_or_else(|| LedgerError::UnknownRelation(name.to_string()))
    }

    /// Stage an edge; visible to traversals after `flush`
    pub fn add_edge(&mut self, name: RelationName, src: Id, dst: Id, weight: u64) -> Result<()> {
        self.relation_mut(name)?.set(src, dst, weight)
    }

    /// Stage many edges of one relation
    pub fn extend<I>(&mut self, name: RelationName, edges: I) -> Result<()>
    where
        I: IntoIterator<Item = (Id, Id, u64)>,
    {
        let m = self.relation_mut(name)?;
        for (src, dst, weight) in edges {
            m.set(src, dst, weight)?;
        }
        Ok(())
    }

    /// Append another store's committed edges (e.g. a finished block)
    pub fn absorb(&mut self, other: &Chain) -> Result<()> {
        for (&name, m) in &other.relations {
            let target = self.relation_mut(name)?;
            for e in m.iter() {
                target.set(e.row, e.col, e.value)?;
            }
        }
        Ok(())
    }

    /// Commit every pending delta
    pub fn flush(&mut self) {
        for (name, m) in self.relations.iter_mut() {
            if m.is_dirty() {
                let pending = m.pending_nvals();
                m.flush();
                debug!(relation = %name, pending, nvals = m.nvals(), "flushed relation");
            }
        }
    }

    /// Does any relation hold uncommitted writes?
    pub fn is_dirty(&self) -> bool {
        self.relations.values().any(GrBMatrix::is_dirty)
    }
}

impl RelationStore for Chain {
    fn relation(&self, name: RelationName) -> Result<&GrBMatrix<u64>> {
        self.relations
            .get(&name)
            .ok_or_else(|| LedgerError::UnknownRelation(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_names() {
        assert_eq!("sr".parse::<RelationName>().unwrap(), RelationName::SenderReceiver);
        assert_eq!("FLOW".parse::<RelationName>().unwrap(), RelationName::Flow);
        assert!(matches!(
            "XX".parse::<RelationName>(),
            Err(LedgerError::UnknownRelation(s)) if s == "XX"
        ));
        for name in RelationName::ALL {
            assert_eq!(name.short().parse::<RelationName>().unwrap(), name);
        }
    }

    #[test]
    fn test_edges_visible_after_flush() {
        let mut chain = Chain::new();
        chain.add_edge(RelationName::SenderReceiver, 1, 2, 5).unwrap();
        assert_eq!(chain.nvals(RelationName::SenderReceiver).unwrap(), 0);
        assert!(chain.is_dirty());

        chain.flush();
        assert!(!chain.is_dirty());
        assert_eq!(chain.nvals(RelationName::SenderReceiver).unwrap(), 1);
        assert_eq!(chain.row(RelationName::SenderReceiver, 1).unwrap().to_pairs(), vec![(2, 5)]);
        assert_eq!(chain.col(RelationName::SenderReceiver, 2).unwrap().to_pairs(), vec![(1, 5)]);
    }

    #[test]
    fn test_block_scope_and_absorb() {
        let mut block = Chain::block_scope();
        block.add_edge(RelationName::BlockTx, 1 << 32, (1 << 32) + 1, 1).unwrap();
        assert!(block.add_edge(RelationName::SenderReceiver, 1, 2, 1).is_err());
        assert!(block.relation(RelationName::Flow).is_err());
        block.flush();

        let mut chain = Chain::new();
        chain.absorb(&block).unwrap();
        chain.flush();
        assert_eq!(chain.relation(RelationName::BlockTx).unwrap().get(1 << 32, (1 << 32) + 1), Some(1));
    }

    #[test]
    fn test_out_of_space_edge_rejected() {
        let mut chain = Chain::new();
        let err = chain.add_edge(RelationName::Flow, crate::INDEX_MAX, 0, 1);
        assert!(matches!(err, Err(LedgerError::InvalidIndex { .. })));
    }
}
