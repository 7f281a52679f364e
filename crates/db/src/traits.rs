//! Trait definitions for low level store interfaces. Persistent backends are
//! out of scope here; the traits carve out exactly what the validation
//! pipeline and the bootstrap touch.
//!
//! Reads can't fail: a read that can't be served means the store is gone,
//! which is a process-fatal invariant, not a recoverable error. Writes return
//! [`DbResult`] so backends can refuse inconsistent updates.

use std::sync::Arc;

use lattice_state::account::AccountInfo;
use lattice_state::ids::{Account, BlockHash};
use lattice_state::pending::{PendingInfo, PendingKey};
use lattice_state::sideband::SavedBlock;

use crate::errors::DbResult;

/// Consistent read view of the ledger.
pub trait LedgerRead {
    /// Gets a block with its sideband.
    fn get_block(&self, hash: &BlockHash) -> Option<SavedBlock>;

    fn block_exists(&self, hash: &BlockHash) -> bool;

    /// Like [`block_exists`](Self::block_exists) but treating pruned stubs
    /// as present. This is the existence test duplicate detection uses.
    fn block_or_pruned_exists(&self, hash: &BlockHash) -> bool;

    fn account_info(&self, account: &Account) -> Option<AccountInfo>;

    fn pending_info(&self, key: &PendingKey) -> Option<PendingInfo>;

    /// Whether the account has any receivable entry at all.
    fn any_pending(&self, account: &Account) -> bool;

    fn for_each_account(&self, f: &mut dyn FnMut(&Account, &AccountInfo));

    fn for_each_pending(&self, f: &mut dyn FnMut(&PendingKey, &PendingInfo));
}

/// Exclusive write view. Everything written through one of these commits
/// atomically when the view is dropped.
pub trait LedgerWrite: LedgerRead {
    fn put_block(&mut self, saved: SavedBlock) -> DbResult<()>;

    fn put_account_info(&mut self, account: Account, info: AccountInfo) -> DbResult<()>;

    fn put_pending(&mut self, key: PendingKey, info: PendingInfo) -> DbResult<()>;

    fn remove_pending(&mut self, key: &PendingKey) -> DbResult<()>;

    fn put_pruned(&mut self, hash: BlockHash) -> DbResult<()>;
}

/// Handle to a ledger store. Read views are short-lived snapshots; there is
/// one writer at a time.
pub trait Store: Send + Sync + 'static {
    fn read(&self) -> Box<dyn LedgerRead + '_>;

    fn write(&self) -> Box<dyn LedgerWrite + '_>;
}

/// Shared store handle the node components pass around.
pub type StoreRef = Arc<dyn Store>;
