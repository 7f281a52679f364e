//! Validator-derived metadata stored alongside a block, never sent on the
//! wire.

use lattice_primitives::amount::Amount;
use lattice_primitives::epoch::Epoch;

use crate::block::Block;
use crate::ids::{Account, BlockHash};

/// How the validator classified the block's operation, plus the chain epoch
/// it was made under.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BlockDetails {
    pub epoch: Epoch,
    pub is_send: bool,
    pub is_receive: bool,
    pub is_epoch: bool,
}

impl BlockDetails {
    /// Receive-like blocks get the relaxed work threshold in later epochs.
    pub fn receive_like(&self) -> bool {
        self.is_receive || self.is_epoch
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Sideband {
    /// Owning account, derived for variants that don't carry one.
    pub account: Account,
    /// Account balance after this block.
    pub balance: Amount,
    /// Position on the account chain, 1 for the opening block.
    pub height: u64,
    /// Unix seconds at local acceptance.
    pub timestamp: u64,
    pub details: BlockDetails,
    /// Epoch of the consumed pending entry, for receives.
    pub source_epoch: Epoch,
}

/// A block as the store holds it, with its sideband attached.
#[derive(Clone, Debug)]
pub struct SavedBlock {
    pub block: Block,
    pub sideband: Sideband,
}

impl SavedBlock {
    pub fn hash(&self) -> BlockHash {
        self.block.hash()
    }
}
