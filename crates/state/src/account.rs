use lattice_primitives::amount::Amount;
use lattice_primitives::epoch::Epoch;

use crate::ids::{Account, BlockHash};

/// Latest state of one account chain. Exists iff the account has at least
/// one block; the zero default stands in for a not-yet-opened account during
/// checking.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct AccountInfo {
    pub head: BlockHash,
    pub representative: Account,
    pub balance: Amount,
    pub block_count: u64,
    /// Unix seconds of the last head update.
    pub modified: u64,
    pub epoch: Epoch,
}
