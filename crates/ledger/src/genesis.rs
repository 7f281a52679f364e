//! Genesis installation. Every node starts from a store holding the genesis
//! block, so bringup checks for it and writes it directly, sideband
//! synthesized, without going through the rule checker.

use lattice_db::errors::DbResult;
use lattice_db::traits::Store;
use lattice_primitives::amount::Amount;
use lattice_primitives::epoch::Epoch;
use lattice_state::account::AccountInfo;
use lattice_state::params::LedgerParams;
use lattice_state::sideband::{BlockDetails, SavedBlock, Sideband};

/// Installs the genesis block if the store doesn't have it yet. Returns
/// whether anything was written.
pub fn ensure_genesis(store: &dyn Store, params: &LedgerParams, now: u64) -> DbResult<bool> {
    let hash = params.genesis.hash();
    let mut tx = store.write();
    if tx.block_exists(&hash) {
        return Ok(false);
    }

    let representative = params
        .genesis
        .representative_field()
        .unwrap_or(params.genesis_account);
    let sideband = Sideband {
        account: params.genesis_account,
        balance: Amount::MAX,
        height: 1,
        timestamp: now,
        details: BlockDetails {
            epoch: Epoch::Epoch0,
            is_send: false,
            is_receive: false,
            is_epoch: false,
        },
        source_epoch: Epoch::Epoch0,
    };
    tx.put_block(SavedBlock {
        block: params.genesis.clone(),
        sideband,
    })?;
    tx.put_account_info(
        params.genesis_account,
        AccountInfo {
            head: hash,
            representative,
            balance: Amount::MAX,
            block_count: 1,
            modified: now,
            epoch: Epoch::Epoch0,
        },
    )?;
    Ok(true)
}
