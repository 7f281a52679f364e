//! Id wrappers over the raw buffer types.

use lattice_primitives::buf::Buf32;
use lattice_primitives::impl_buf_wrapper;

/// 256-bit account id, an x-only public key on the wire.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Account(Buf32);

/// 256-bit block content hash.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BlockHash(Buf32);

impl_buf_wrapper!(Account, Buf32, 32);
impl_buf_wrapper!(BlockHash, Buf32, 32);

// The link field of a state block is a destination account, a source hash, or
// an epoch sentinel depending on context, so both reinterpretations exist.

impl Account {
    pub fn as_hash(self) -> BlockHash {
        BlockHash(self.0)
    }
}

impl BlockHash {
    pub fn as_account(self) -> Account {
        Account(self.0)
    }
}

/// Identifies an election independent of which forked block is in
/// contention: the pair of the chain root and the contested position's
/// previous hash.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct QualifiedRoot {
    pub root: Buf32,
    pub previous: BlockHash,
}
