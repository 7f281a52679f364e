//! Shared fixtures for the dev network: deterministic keys, dev ledger
//! params, a block builder, and store helpers. Everything here may panic,
//! it's test-only code.

pub mod builder;
pub mod keys;

use lattice_db::traits::{LedgerRead, Store};
use lattice_ledger::apply::apply_block;
use lattice_ledger::check::BlockCheckContext;
use lattice_ledger::genesis::ensure_genesis;
use lattice_primitives::buf::Buf32;
use lattice_primitives::epoch::{Epoch, Epochs};
use lattice_primitives::work::WorkThresholds;
use lattice_state::block::{Block, OpenBlock};
use lattice_state::params::LedgerParams;

pub use builder::BlockBuilder;

/// Dev network params: the deterministic dev genesis, epoch sentinels signed
/// by the genesis key, and cheap work thresholds.
pub fn dev_params() -> LedgerParams {
    let genesis_key = keys::dev_genesis_key();
    let account = genesis_key.account();
    let work = WorkThresholds::publish_dev();

    let mut genesis = Block::Open(OpenBlock {
        source: account.as_hash(),
        representative: account,
        account,
        signature: Default::default(),
        work: work.generate(account.inner(), Epoch::Epoch0, false),
    });
    let signature = genesis_key.sign(genesis.hash().inner());
    if let Block::Open(b) = &mut genesis {
        b.signature = signature;
    }

    let mut epochs = Epochs::new();
    epochs.add(
        Epoch::Epoch1,
        *account.inner(),
        epoch_sentinel(b"epoch v1 block"),
    );
    epochs.add(
        Epoch::Epoch2,
        *account.inner(),
        epoch_sentinel(b"epoch v2 block"),
    );

    LedgerParams {
        genesis,
        genesis_account: account,
        epochs,
        work,
    }
}

fn epoch_sentinel(text: &[u8]) -> Buf32 {
    let mut bytes = [0u8; 32];
    bytes[..text.len()].copy_from_slice(text);
    Buf32::from(bytes)
}

/// Installs the dev genesis, panicking on failure.
pub fn install_genesis(store: &dyn Store, params: &LedgerParams, now: u64) {
    ensure_genesis(store, params, now).expect("fixture: install genesis");
}

/// Checks and commits a block, panicking unless it progresses.
pub fn commit(store: &dyn Store, params: &LedgerParams, block: &Block) {
    let mut tx = store.write();
    let read: &dyn LedgerRead = &*tx;
    let (result, sideband) = BlockCheckContext::new(read, params, block, 1).check();
    let sideband = sideband.unwrap_or_else(|| panic!("fixture: block rejected as {result:?}"));
    apply_block(&mut *tx, block, &sideband).expect("fixture: apply block");
}
