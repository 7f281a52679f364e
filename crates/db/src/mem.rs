//! In-memory reference store.

use std::collections::{BTreeMap, HashMap, HashSet};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use lattice_state::account::AccountInfo;
use lattice_state::ids::{Account, BlockHash};
use lattice_state::pending::{PendingInfo, PendingKey};
use lattice_state::sideband::SavedBlock;

use crate::errors::{DbError, DbResult};
use crate::traits::{LedgerRead, LedgerWrite, Store};

#[derive(Default)]
struct Inner {
    blocks: HashMap<BlockHash, SavedBlock>,
    accounts: HashMap<Account, AccountInfo>,
    pending: BTreeMap<PendingKey, PendingInfo>,
    pruned: HashSet<BlockHash>,
}

impl Inner {
    fn get_block(&self, hash: &BlockHash) -> Option<SavedBlock> {
        self.blocks.get(hash).cloned()
    }

    fn block_exists(&self, hash: &BlockHash) -> bool {
        self.blocks.contains_key(hash)
    }

    fn block_or_pruned_exists(&self, hash: &BlockHash) -> bool {
        self.blocks.contains_key(hash) || self.pruned.contains(hash)
    }

    fn account_info(&self, account: &Account) -> Option<AccountInfo> {
        self.accounts.get(account).copied()
    }

    fn pending_info(&self, key: &PendingKey) -> Option<PendingInfo> {
        self.pending.get(key).copied()
    }

    fn any_pending(&self, account: &Account) -> bool {
        let from = PendingKey::new(*account, BlockHash::zero());
        self.pending
            .range(from..)
            .next()
            .map(|(k, _)| k.account == *account)
            .unwrap_or(false)
    }

    fn for_each_account(&self, f: &mut dyn FnMut(&Account, &AccountInfo)) {
        for (account, info) in &self.accounts {
            f(account, info);
        }
    }

    fn for_each_pending(&self, f: &mut dyn FnMut(&PendingKey, &PendingInfo)) {
        for (key, info) in &self.pending {
            f(key, info);
        }
    }
}

/// Reference store backed by process memory. Snapshot semantics come from
/// the read/write lock: a read view sees a frozen ledger, the single write
/// view is the write transaction.
#[derive(Default)]
pub struct MemStore {
    inner: RwLock<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct MemReadTx<'a>(RwLockReadGuard<'a, Inner>);

pub struct MemWriteTx<'a>(RwLockWriteGuard<'a, Inner>);

macro_rules! impl_ledger_read {
    ($ty:ident) => {
        impl<'a> LedgerRead for $ty<'a> {
            fn get_block(&self, hash: &BlockHash) -> Option<SavedBlock> {
                self.0.get_block(hash)
            }

            fn block_exists(&self, hash: &BlockHash) -> bool {
                self.0.block_exists(hash)
            }

            fn block_or_pruned_exists(&self, hash: &BlockHash) -> bool {
                self.0.block_or_pruned_exists(hash)
            }

            fn account_info(&self, account: &Account) -> Option<AccountInfo> {
                self.0.account_info(account)
            }

            fn pending_info(&self, key: &PendingKey) -> Option<PendingInfo> {
                self.0.pending_info(key)
            }

            fn any_pending(&self, account: &Account) -> bool {
                self.0.any_pending(account)
            }

            fn for_each_account(&self, f: &mut dyn FnMut(&Account, &AccountInfo)) {
                self.0.for_each_account(f)
            }

            fn for_each_pending(&self, f: &mut dyn FnMut(&PendingKey, &PendingInfo)) {
                self.0.for_each_pending(f)
            }
        }
    };
}

impl_ledger_read!(MemReadTx);
impl_ledger_read!(MemWriteTx);

impl<'a> LedgerWrite for MemWriteTx<'a> {
    fn put_block(&mut self, saved: SavedBlock) -> DbResult<()> {
        let hash = saved.hash();
        if self.0.blocks.contains_key(&hash) {
            return Err(DbError::DuplicateBlock(hash));
        }
        self.0.blocks.insert(hash, saved);
        Ok(())
    }

    fn put_account_info(&mut self, account: Account, info: AccountInfo) -> DbResult<()> {
        self.0.accounts.insert(account, info);
        Ok(())
    }

    fn put_pending(&mut self, key: PendingKey, info: PendingInfo) -> DbResult<()> {
        self.0.pending.insert(key, info);
        Ok(())
    }

    fn remove_pending(&mut self, key: &PendingKey) -> DbResult<()> {
        self.0
            .pending
            .remove(key)
            .map(|_| ())
            .ok_or(DbError::MissingPending(key.account, key.hash))
    }

    fn put_pruned(&mut self, hash: BlockHash) -> DbResult<()> {
        self.0.pruned.insert(hash);
        Ok(())
    }
}

impl Store for MemStore {
    fn read(&self) -> Box<dyn LedgerRead + '_> {
        Box::new(MemReadTx(self.inner.read()))
    }

    fn write(&self) -> Box<dyn LedgerWrite + '_> {
        Box::new(MemWriteTx(self.inner.write()))
    }
}

#[cfg(test)]
mod tests {
    use lattice_primitives::amount::Amount;
    use lattice_primitives::epoch::Epoch;

    use super::*;

    fn key(account: u8, hash: u8) -> PendingKey {
        PendingKey::new(Account::from([account; 32]), BlockHash::from([hash; 32]))
    }

    fn info() -> PendingInfo {
        PendingInfo {
            source: Account::from([9u8; 32]),
            amount: Amount::raw(7),
            epoch: Epoch::Epoch0,
        }
    }

    #[test]
    fn test_any_pending_scoped_to_account() {
        let store = MemStore::new();
        {
            let mut tx = store.write();
            tx.put_pending(key(2, 5), info()).unwrap();
        }

        let tx = store.read();
        assert!(tx.any_pending(&Account::from([2u8; 32])));
        assert!(!tx.any_pending(&Account::from([1u8; 32])));
        assert!(!tx.any_pending(&Account::from([3u8; 32])));
    }

    #[test]
    fn test_remove_missing_pending_errors() {
        let store = MemStore::new();
        let mut tx = store.write();
        assert!(tx.remove_pending(&key(1, 1)).is_err());
    }

    #[test]
    fn test_pruned_counts_for_duplicates_only() {
        let store = MemStore::new();
        let hash = BlockHash::from([4u8; 32]);
        {
            let mut tx = store.write();
            tx.put_pruned(hash).unwrap();
        }

        let tx = store.read();
        assert!(tx.block_or_pruned_exists(&hash));
        assert!(!tx.block_exists(&hash));
        assert!(tx.get_block(&hash).is_none());
    }
}
