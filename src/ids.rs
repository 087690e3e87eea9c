//! Identifier Space
//!
//! Every address, transaction, input and output is a plain `u64` in
//! `[0, INDEX_MAX)`. Ids minted inside a block carry the block number in
//! their high bits, so the owning block is a shift away:
//!
//! ```text
//! BlockId::from_number(7)  →  0x0000_0007_0000_0000
//! tx in block 7            →  0x0000_0007_0000_0031
//! block_number(tx)         →  7
//! ```

use crate::graphblas::INDEX_MAX;
use crate::{LedgerError, Result};

/// Ledger identifier (row/column index into every relation)
pub type Id = u64;

/// Bits reserved for the position of an id inside its block
pub const BLOCK_SHIFT: u32 = 32;

/// Owning block number of any id
#[inline]
pub fn block_number(id: Id) -> u64 {
    id >> BLOCK_SHIFT
}

/// Block-level identifier: block number shifted into the high bits.
///
/// The block's own id is also the first id of its range, and it is the row
/// key of the block's transactions in `BT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct BlockId(u64);

impl BlockId {
    /// Largest block number whose ids still fit below `INDEX_MAX`
    pub const MAX_NUMBER: u64 = (INDEX_MAX >> BLOCK_SHIFT) - 1;

    /// Create from a block number
    pub fn from_number(number: u64) -> Result<Self> {
        if number > Self::MAX_NUMBER {
            return Err(LedgerError::InvalidIndex {
                index: number,
                dim: Self::MAX_NUMBER + 1,
            });
        }
        Ok(Self(number << BLOCK_SHIFT))
    }

    /// Block owning `id`
    #[inline]
    pub fn of(id: Id) -> Self {
        Self(id & !((1u64 << BLOCK_SHIFT) - 1))
    }

    /// Raw id of the block itself
    #[inline]
    pub fn raw(self) -> Id {
        self.0
    }

    #[inline]
    pub fn number(self) -> u64 {
        block_number(self.0)
    }

    /// Id of the `slot`-th entity minted in this block
    pub fn id_at(self, slot: u32) -> Id {
        self.0 | slot as u64
    }

    /// Does `id` belong to this block?
    #[inline]
    pub fn contains(self, id: Id) -> bool {
        Self::of(id) == self
    }

    /// Half-open id range `[first, end)` covered by this block
    pub fn id_range(self) -> (Id, Id) {
        (self.0, self.0 + (1u64 << BLOCK_SHIFT))
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "block#{}", self.number())
    }
}
