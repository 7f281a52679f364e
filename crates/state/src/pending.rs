use lattice_primitives::amount::Amount;
use lattice_primitives::epoch::Epoch;

use crate::ids::{Account, BlockHash};

/// Key of a receivable amount: the destination account and the send block
/// that created it. Ordering groups all of an account's entries together so
/// stores can range-scan them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PendingKey {
    pub account: Account,
    pub hash: BlockHash,
}

impl PendingKey {
    pub fn new(account: Account, hash: BlockHash) -> Self {
        Self { account, hash }
    }
}

/// An unreceived send: who sent it, how much, and the epoch the send was
/// made under.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PendingInfo {
    pub source: Account,
    pub amount: Amount,
    pub epoch: Epoch,
}
