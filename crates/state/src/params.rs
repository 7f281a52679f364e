//! Network-level ledger params.

use lattice_primitives::epoch::Epochs;
use lattice_primitives::work::WorkThresholds;

use crate::block::Block;
use crate::ids::Account;

/// Everything the rule checker needs to know about the network: the genesis
/// block every node starts from, the epoch upgrade registry, and the work
/// thresholds.
pub struct LedgerParams {
    pub genesis: Block,
    pub genesis_account: Account,
    pub epochs: Epochs,
    pub work: WorkThresholds,
}

impl LedgerParams {
    /// The reserved all-zero account that can never sign. Opening it is
    /// rejected outright.
    pub fn burn_account() -> Account {
        Account::zero()
    }
}
