//! # Ledger Entities
//!
//! Lightweight id handles that read their neighbourhood out of a
//! [`RelationStore`](crate::RelationStore) and seed the traversal engines
//! with their own ids. Handles are `Copy` and hold no state; pass a
//! [`RequestCache`] instead of the store to memoize slices for the length
//! of one request.
//!
//! ```text
//!   Address ──SI──► Input ──IT──► Tx ──TO──► Output ──OR──► Address
//!      │                           ▲                          ▲
//!      └────────ST─────────────────┘ └──────────TR────────────┘
//! ```

mod address;
mod block;
mod cache;
mod tx;

pub use address::Address;
pub use block::Block;
pub use cache::RequestCache;
pub use tx::{Input, Output, Tx};

#[cfg(test)]
pub(crate) mod tests {
    use crate::chain::{Chain, RelationName::*};
    use crate::ids::{BlockId, Id};

    pub const ALICE: Id = 1;
    pub const BOB: Id = 2;
    pub const CAROL: Id = 3;

    pub struct LedgerIds {
        pub t1: Id,
        pub o1: Id,
        pub t2: Id,
        pub i1: Id,
        pub o2: Id,
        pub o3: Id,
        pub t3: Id,
        pub i2: Id,
        pub o4: Id,
    }

    /// Three blocks:
    /// 1: t1 mints o1 (50) to alice
    /// 2: t2 spends o1 via i1, pays o2 (30) to bob and o3 (20) back to alice
    /// 3: t3 spends o2 via i2, pays o4 (30) to carol
    pub fn ledger() -> (Chain, LedgerIds) {
        let b1 = BlockId::from_number(1).unwrap();
        let b2 = BlockId::from_number(2).unwrap();
        let b3 = BlockId::from_number(3).unwrap();
        let ids = LedgerIds {
            t1: b1.id_at(1),
            o1: b1.id_at(2),
            t2: b2.id_at(1),
            i1: b2.id_at(2),
            o2: b2.id_at(3),
            o3: b2.id_at(4),
            t3: b3.id_at(1),
            i2: b3.id_at(2),
            o4: b3.id_at(3),
        };

        let mut chain = Chain::new();
        let edges = [
            (BlockTx, b1.raw(), ids.t1, 1),
            (BlockTx, b2.raw(), ids.t2, 1),
            (BlockTx, b3.raw(), ids.t3, 1),
            (TxOutput, ids.t1, ids.o1, 50),
            (TxOutput, ids.t2, ids.o2, 30),
            (TxOutput, ids.t2, ids.o3, 20),
            (TxOutput, ids.t3, ids.o4, 30),
            (InputTx, ids.i1, ids.t2, 50),
            (InputTx, ids.i2, ids.t3, 30),
            (SenderInput, ALICE, ids.i1, 50),
            (SenderInput, BOB, ids.i2, 30),
            (OutputReceiver, ids.o1, ALICE, 50),
            (OutputReceiver, ids.o2, BOB, 30),
            (OutputReceiver, ids.o3, ALICE, 20),
            (OutputReceiver, ids.o4, CAROL, 30),
            (SenderTx, ALICE, ids.t2, 50),
            (SenderTx, BOB, ids.t3, 30),
            (TxReceiver, ids.t1, ALICE, 50),
            (TxReceiver, ids.t2, BOB, 30),
            (TxReceiver, ids.t2, ALICE, 20),
            (TxReceiver, ids.t3, CAROL, 30),
            (SenderReceiver, ALICE, BOB, 30),
            (SenderReceiver, BOB, CAROL, 30),
            (InputOutput, ids.i1, ids.o2, 30),
            (InputOutput, ids.i1, ids.o3, 20),
            (InputOutput, ids.i2, ids.o4, 30),
            (Flow, ids.o1, ids.i1, 50),
            (Flow, ids.i1, ids.o2, 30),
            (Flow, ids.i1, ids.o3, 20),
            (Flow, ids.o2, ids.i2, 30),
            (Flow, ids.i2, ids.o4, 30),
        ];
        for (name, src, dst, value) in edges {
            chain.add_edge(name, src, dst, value).unwrap();
        }
        chain.flush();
        (chain, ids)
    }
}
