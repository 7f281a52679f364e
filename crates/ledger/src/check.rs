//! The block check context.
//!
//! One context checks one candidate block against one read view of the
//! store. All the state the rules need is captured at construction, so the
//! check itself is a pure function: identical store contents, block, and
//! timestamp give an identical result and sideband.
//!
//! The link field drives classification four ways. For state blocks it is
//! interpreted as: a destination account if the balance decreased; a noop if
//! zero; an epoch sentinel if it matches the registry; otherwise the hash of
//! a block ready to be received. Legacy variants carry their operation in
//! the block type.

use lattice_db::traits::LedgerRead;
use lattice_primitives::amount::Amount;
use lattice_primitives::crypto;
use lattice_primitives::epoch::Epoch;
use lattice_primitives::work;
use lattice_state::account::AccountInfo;
use lattice_state::block::Block;
use lattice_state::ids::Account;
use lattice_state::params::LedgerParams;
use lattice_state::pending::{PendingInfo, PendingKey};
use lattice_state::sideband::{BlockDetails, SavedBlock, Sideband};

use crate::process_result::ProcessResult;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum BlockOp {
    Receive,
    Send,
    Noop,
    Epoch,
}

pub struct BlockCheckContext<'a> {
    block: &'a Block,
    params: &'a LedgerParams,
    /// Timestamp stamped into the sideband. An input, not a clock read, so
    /// repeated checks are reproducible.
    now: u64,
    /// Set when the block (or its pruned stub) is already present.
    exists: bool,
    previous: Option<SavedBlock>,
    /// Account info for the derived account, zero-synthesized for an
    /// unopened account. `None` only on the gap-previous path, where no
    /// rule that needs it runs.
    state: Option<AccountInfo>,
    receivable: Option<PendingInfo>,
    any_receivable: bool,
    source_exists: bool,
    details: BlockDetails,
}

impl<'a> BlockCheckContext<'a> {
    pub fn new(
        tx: &dyn LedgerRead,
        params: &'a LedgerParams,
        block: &'a Block,
        now: u64,
    ) -> Self {
        let mut ctx = Self {
            block,
            params,
            now,
            exists: tx.block_or_pruned_exists(&block.hash()),
            previous: None,
            state: None,
            receivable: None,
            any_receivable: false,
            source_exists: false,
            details: BlockDetails::default(),
        };
        if ctx.exists {
            return ctx;
        }
        if !block.previous().is_zero() {
            ctx.previous = tx.get_block(&block.previous());
        }
        if !ctx.gap_previous() {
            let account = ctx.account();
            ctx.state = Some(tx.account_info(&account).unwrap_or_default());
            let source = block.source();
            ctx.source_exists = tx.block_or_pruned_exists(&source);
            ctx.receivable = tx.pending_info(&PendingKey::new(account, source));
            ctx.any_receivable = tx.any_pending(&account);
            ctx.details = BlockDetails {
                epoch: ctx.epoch(),
                is_send: ctx.is_send(),
                is_receive: ctx.is_receive(),
                is_epoch: ctx.is_epoch(),
            };
        }
        ctx
    }

    /// Runs every rule in order and derives the sideband on success.
    pub fn check(&self) -> (ProcessResult, Option<Sideband>) {
        if self.exists {
            return (ProcessResult::Old, None);
        }
        let structural = [
            Self::rule_sufficient_work,
            Self::rule_reserved_account,
            Self::rule_previous_frontier,
            Self::rule_state_block_account_position,
            Self::rule_state_block_source_position,
            Self::rule_block_signed,
            Self::rule_metastable,
        ];
        for rule in structural {
            let result = rule(self);
            if !result.is_progress() {
                return (result, None);
            }
        }
        let result = match self.op() {
            BlockOp::Receive => self.check_receive_rules(),
            BlockOp::Send => self.check_send_rules(),
            BlockOp::Noop => self.check_noop_rules(),
            BlockOp::Epoch => self.check_epoch_rules(),
        };
        if !result.is_progress() {
            return (result, None);
        }
        let sideband = Sideband {
            account: self.account(),
            balance: self.balance(),
            height: self.height(),
            timestamp: self.now,
            details: self.details,
            source_epoch: self.receivable.map(|r| r.epoch).unwrap_or_default(),
        };
        (ProcessResult::Progress, Some(sideband))
    }

    fn gap_previous(&self) -> bool {
        self.requires_previous() && self.previous.is_none()
    }

    /// Legacy non-open variants always chain on a previous block; a zero
    /// previous there is malformed and reads as an unsatisfiable gap.
    fn requires_previous(&self) -> bool {
        match self.block {
            Block::Open(_) => false,
            Block::State(b) => !b.previous.is_zero(),
            Block::Send(_) | Block::Receive(_) | Block::Change(_) => true,
        }
    }

    fn state(&self) -> &AccountInfo {
        self.state.as_ref().expect("check: state loaded")
    }

    fn previous(&self) -> &SavedBlock {
        self.previous.as_ref().expect("check: previous loaded")
    }

    fn op(&self) -> BlockOp {
        match self.block {
            Block::State(b) => {
                if b.balance < self.state().balance {
                    return BlockOp::Send;
                }
                if self.previous.is_some() && b.link.is_zero() {
                    return BlockOp::Noop;
                }
                if self.params.epochs.is_epoch_link(&b.link) {
                    return BlockOp::Epoch;
                }
                BlockOp::Receive
            }
            Block::Send(_) => BlockOp::Send,
            Block::Open(_) | Block::Receive(_) => BlockOp::Receive,
            Block::Change(_) => BlockOp::Noop,
        }
    }

    fn is_send(&self) -> bool {
        self.op() == BlockOp::Send
    }

    fn is_receive(&self) -> bool {
        self.op() == BlockOp::Receive
    }

    fn is_epoch(&self) -> bool {
        self.op() == BlockOp::Epoch
    }

    /// The account this block belongs to. Written in the block for opens and
    /// state blocks, derived from the previous block otherwise.
    fn account(&self) -> Account {
        match self.block {
            Block::Open(b) => b.account,
            Block::State(b) => b.account,
            Block::Send(_) | Block::Receive(_) | Block::Change(_) => {
                let prev = self.previous();
                match &prev.block {
                    Block::Open(p) => p.account,
                    Block::State(p) => p.account,
                    _ => prev.sideband.account,
                }
            }
        }
    }

    fn previous_balance(&self) -> Amount {
        self.previous().sideband.balance
    }

    /// Post-application balance for the operation.
    fn balance(&self) -> Amount {
        match self.block {
            Block::State(b) => b.balance,
            Block::Send(b) => b.balance,
            Block::Open(_) => self.receivable.expect("check: receivable loaded").amount,
            Block::Change(_) => self.previous_balance(),
            Block::Receive(_) => {
                let amount = self.receivable.expect("check: receivable loaded").amount;
                self.previous_balance()
                    .checked_add(amount)
                    .unwrap_or(Amount::MAX)
            }
        }
    }

    fn height(&self) -> u64 {
        self.previous
            .as_ref()
            .map(|p| p.sideband.height + 1)
            .unwrap_or(1)
    }

    fn epoch(&self) -> Epoch {
        if self.is_epoch() {
            let link = self.block.link_field().expect("check: epoch op is a state block");
            return self
                .params
                .epochs
                .epoch(&link)
                .expect("check: epoch op has a registered link");
        }
        let account_epoch = self
            .previous
            .as_ref()
            .map(|p| p.sideband.details.epoch)
            .unwrap_or_default();
        let source_epoch = self.receivable.map(|r| r.epoch).unwrap_or_default();
        account_epoch.max(source_epoch)
    }

    /// The key the signature must verify against. Legacy variants sign with
    /// the chain's account; state blocks sign with their account field,
    /// except epoch upgrades which the designated epoch key signs. A
    /// send-shaped state block whose link happens to equal an epoch sentinel
    /// is a malformed destination, not an upgrade, and stays account-signed.
    fn signer(&self) -> Option<Account> {
        match self.block {
            Block::Send(_) | Block::Receive(_) | Block::Change(_) => {
                let prev = &self.previous.as_ref()?.block;
                match prev {
                    // Legacy blocks can't follow state blocks; the position
                    // rule rejects before signature checking gets here.
                    Block::State(_) => None,
                    Block::Open(p) => Some(p.account),
                    _ => Some(self.previous().sideband.account),
                }
            }
            Block::State(b) => {
                if !self.params.epochs.is_epoch_link(&b.link) || self.is_send() {
                    Some(b.account)
                } else {
                    let epoch = self.params.epochs.epoch(&b.link)?;
                    self.params.epochs.signer(epoch).map(Account::from)
                }
            }
            Block::Open(b) => Some(b.account),
        }
    }

    fn rule_sufficient_work(&self) -> ProcessResult {
        let threshold = self
            .params
            .work
            .threshold(self.details.epoch, self.details.receive_like());
        if work::difficulty(self.block.work(), &self.block.root()) < threshold {
            return ProcessResult::InsufficientWork;
        }
        ProcessResult::Progress
    }

    fn rule_reserved_account(&self) -> ProcessResult {
        match self.block.account_field() {
            Some(account) if account.is_zero() => ProcessResult::OpenedBurnAccount,
            _ => ProcessResult::Progress,
        }
    }

    fn rule_previous_frontier(&self) -> ProcessResult {
        if self.gap_previous() {
            return ProcessResult::GapPrevious;
        }
        ProcessResult::Progress
    }

    /// Legacy blocks cannot come after a state block on the same chain.
    fn rule_state_block_account_position(&self) -> ProcessResult {
        let Some(prev) = self.previous.as_ref() else {
            return ProcessResult::Progress;
        };
        match self.block {
            Block::Send(_) | Block::Receive(_) | Block::Change(_) => match prev.block {
                Block::State(_) => ProcessResult::BlockPosition,
                _ => ProcessResult::Progress,
            },
            _ => ProcessResult::Progress,
        }
    }

    /// Legacy receives cannot claim a source sent under a later epoch; state
    /// receives can.
    fn rule_state_block_source_position(&self) -> ProcessResult {
        let Some(receivable) = self.receivable else {
            return ProcessResult::Progress;
        };
        match self.block {
            Block::Receive(_) | Block::Open(_) => {
                if receivable.epoch > Epoch::Epoch0 {
                    return ProcessResult::Unreceivable;
                }
                ProcessResult::Progress
            }
            _ => ProcessResult::Progress,
        }
    }

    fn rule_block_signed(&self) -> ProcessResult {
        let Some(signer) = self.signer() else {
            return ProcessResult::BadSignature;
        };
        let hash = self.block.hash();
        if !crypto::verify_message(self.block.signature(), hash.inner(), signer.inner()) {
            return ProcessResult::BadSignature;
        }
        ProcessResult::Progress
    }

    /// Identifies metastable (forked) blocks: either an opening block for an
    /// account that's already open, or a previous that exists but is not the
    /// head. Both show up as `previous != head`.
    fn rule_metastable(&self) -> ProcessResult {
        if self.block.previous() == self.state().head {
            ProcessResult::Progress
        } else {
            ProcessResult::Fork
        }
    }

    fn check_receive_rules(&self) -> ProcessResult {
        if !self.source_exists {
            return ProcessResult::GapSource;
        }
        let Some(receivable) = self.receivable else {
            return ProcessResult::Unreceivable;
        };
        if let Block::State(b) = self.block {
            let next_balance = self
                .state()
                .balance
                .checked_add(receivable.amount)
                .unwrap_or(Amount::MAX);
            if next_balance != b.balance {
                return ProcessResult::BalanceMismatch;
            }
        }
        ProcessResult::Progress
    }

    fn check_send_rules(&self) -> ProcessResult {
        let balance = self
            .block
            .balance_field()
            .expect("check: send op carries a balance");
        if self.state().balance < balance {
            return ProcessResult::NegativeSpend;
        }
        ProcessResult::Progress
    }

    fn check_noop_rules(&self) -> ProcessResult {
        if self.balance() != self.previous_balance() {
            return ProcessResult::BalanceMismatch;
        }
        ProcessResult::Progress
    }

    fn check_epoch_rules(&self) -> ProcessResult {
        let state = self.state();
        let balance = self
            .block
            .balance_field()
            .expect("check: epoch op is a state block");
        // Epoch blocks may not change an account's balance
        if state.balance != balance {
            return ProcessResult::BalanceMismatch;
        }
        // Epoch blocks may not change an account's representative
        let representative = self
            .block
            .representative_field()
            .expect("check: epoch op is a state block");
        if state.representative != representative {
            return ProcessResult::RepresentativeMismatch;
        }
        // Epoch blocks may not be created for accounts that have no
        // receivable entries
        if self.block.previous().is_zero() && !self.any_receivable {
            return ProcessResult::GapEpochOpenPending;
        }
        let previous_epoch = self
            .previous
            .as_ref()
            .map(|p| p.sideband.details.epoch)
            .unwrap_or_default();
        // Epoch blocks may only increase the epoch number by one
        if !state.head.is_zero() && !Epoch::is_sequential(previous_epoch, self.epoch()) {
            return ProcessResult::BlockPosition;
        }
        ProcessResult::Progress
    }
}

#[cfg(test)]
mod tests {
    use lattice_db::{MemStore, Store};
    use lattice_primitives::buf::Buf64;
    use lattice_state::block::StateBlock;
    use lattice_state::ids::BlockHash;
    use lattice_test_utils::{install_genesis, keys, BlockBuilder};

    use super::*;

    fn setup() -> (MemStore, LedgerParams) {
        let params = lattice_test_utils::dev_params();
        let store = MemStore::new();
        install_genesis(&store, &params, 1);
        (store, params)
    }

    /// Genesis balance less the given raw amount.
    fn gb(sub: u128) -> Amount {
        Amount::MAX.checked_sub(Amount::raw(sub)).unwrap()
    }

    fn check(store: &MemStore, params: &LedgerParams, block: &Block) -> (ProcessResult, Option<Sideband>) {
        let tx = store.read();
        BlockCheckContext::new(&*tx, params, block, 2).check()
    }

    #[test]
    fn test_genesis_is_old() {
        let (store, params) = setup();
        let (result, sideband) = check(&store, &params, &params.genesis);
        assert_eq!(result, ProcessResult::Old);
        assert!(sideband.is_none());
    }

    #[test]
    fn test_send_progress_and_sideband() {
        let (store, params) = setup();
        let builder = BlockBuilder::new(&params);
        let genesis_key = keys::dev_genesis_key();
        let dest = keys::dev_key(1);

        let send = builder.state_send(&genesis_key, params.genesis.hash(), gb(500), dest.account());
        let (result, sideband) = check(&store, &params, &send);
        assert_eq!(result, ProcessResult::Progress);

        let sideband = sideband.unwrap();
        assert_eq!(sideband.account, genesis_key.account());
        assert_eq!(sideband.height, 2);
        assert_eq!(sideband.balance, gb(500));
        assert!(sideband.details.is_send);
        assert!(!sideband.details.is_receive);
    }

    #[test]
    fn test_check_is_deterministic() {
        let (store, params) = setup();
        let builder = BlockBuilder::new(&params);
        let genesis_key = keys::dev_genesis_key();
        let send =
            builder.state_send(&genesis_key, params.genesis.hash(), gb(1), keys::dev_key(1).account());

        let first = check(&store, &params, &send);
        let second = check(&store, &params, &send);
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
    }

    #[test]
    fn test_gap_previous() {
        let (store, params) = setup();
        let builder = BlockBuilder::new(&params);
        let genesis_key = keys::dev_genesis_key();

        // Chain off a hash the store has never seen.
        let send = builder.state_send(
            &genesis_key,
            BlockHash::from([0x55u8; 32]),
            gb(1),
            keys::dev_key(1).account(),
        );
        let (result, _) = check(&store, &params, &send);
        assert_eq!(result, ProcessResult::GapPrevious);
    }

    #[test]
    fn test_fork_rejected() {
        let (store, params) = setup();
        let builder = BlockBuilder::new(&params);
        let genesis_key = keys::dev_genesis_key();
        let dest = keys::dev_key(1);

        let send1 = builder.state_send(&genesis_key, params.genesis.hash(), gb(10), dest.account());
        lattice_test_utils::commit(&store, &params, &send1);

        // Competing send chained on the same previous as send1.
        let send2 = builder.state_send(&genesis_key, params.genesis.hash(), gb(20), dest.account());
        let (result, _) = check(&store, &params, &send2);
        assert_eq!(result, ProcessResult::Fork);
    }

    #[test]
    fn test_bad_signature() {
        let (store, params) = setup();
        let builder = BlockBuilder::new(&params);
        let genesis_key = keys::dev_genesis_key();

        let mut send =
            builder.state_send(&genesis_key, params.genesis.hash(), gb(1), keys::dev_key(1).account());
        if let Block::State(b) = &mut send {
            b.signature = Buf64::from([0u8; 64]);
        }
        let (result, _) = check(&store, &params, &send);
        assert_eq!(result, ProcessResult::BadSignature);
    }

    #[test]
    fn test_negative_spend() {
        let (store, params) = setup();
        let genesis_key = keys::dev_genesis_key();
        let dest = keys::dev_key(1);
        let builder = BlockBuilder::new(&params);

        let send = builder.legacy_send(&genesis_key, params.genesis.hash(), gb(100), dest.account());
        lattice_test_utils::commit(&store, &params, &send);

        // A "send" claiming a higher balance than the head holds.
        let bogus = builder.legacy_send(&genesis_key, send.hash(), Amount::MAX, dest.account());
        let (result, _) = check(&store, &params, &bogus);
        assert_eq!(result, ProcessResult::NegativeSpend);
    }

    #[test]
    fn test_receive_gap_source_and_unreceivable() {
        let (store, params) = setup();
        let builder = BlockBuilder::new(&params);
        let genesis_key = keys::dev_genesis_key();
        let receiver = keys::dev_key(1);

        let send = builder.state_send(&genesis_key, params.genesis.hash(), gb(40), receiver.account());

        // Open referencing the send before the send is known: gap_source.
        let open = builder.state_open(&receiver, send.hash(), Amount::raw(40));
        let (result, _) = check(&store, &params, &open);
        assert_eq!(result, ProcessResult::GapSource);

        // After the send commits the same open progresses.
        lattice_test_utils::commit(&store, &params, &send);
        let (result, sideband) = check(&store, &params, &open);
        assert_eq!(result, ProcessResult::Progress);
        assert_eq!(sideband.unwrap().height, 1);

        // A second receive for the consumed source is unreceivable.
        lattice_test_utils::commit(&store, &params, &open);
        let again = builder.state_block(
            &receiver,
            receiver.account(),
            open.hash(),
            receiver.account(),
            Amount::raw(80),
            *send.hash().inner(),
        );
        let (result, _) = check(&store, &params, &again);
        assert_eq!(result, ProcessResult::Unreceivable);
    }

    #[test]
    fn test_state_receive_balance_mismatch() {
        let (store, params) = setup();
        let builder = BlockBuilder::new(&params);
        let genesis_key = keys::dev_genesis_key();
        let receiver = keys::dev_key(1);

        let send = builder.state_send(&genesis_key, params.genesis.hash(), gb(40), receiver.account());
        lattice_test_utils::commit(&store, &params, &send);

        // Claims 39 of the 40 that were sent.
        let open = builder.state_open(&receiver, send.hash(), Amount::raw(39));
        let (result, _) = check(&store, &params, &open);
        assert_eq!(result, ProcessResult::BalanceMismatch);
    }

    #[test]
    fn test_opened_burn_account() {
        let (store, params) = setup();
        let genesis_key = keys::dev_genesis_key();
        let send = BlockBuilder::new(&params).state_send(
            &genesis_key,
            params.genesis.hash(),
            gb(5),
            LedgerParams::burn_account(),
        );
        lattice_test_utils::commit(&store, &params, &send);

        let open = Block::State(StateBlock {
            account: LedgerParams::burn_account(),
            previous: BlockHash::zero(),
            representative: LedgerParams::burn_account(),
            balance: Amount::raw(5),
            link: *send.hash().inner(),
            signature: Buf64::from([0u8; 64]),
            work: params.work.generate(
                LedgerParams::burn_account().inner(),
                Epoch::Epoch0,
                false,
            ),
        });
        let (result, _) = check(&store, &params, &open);
        assert_eq!(result, ProcessResult::OpenedBurnAccount);
    }

    #[test]
    fn test_legacy_after_state_is_block_position() {
        let (store, params) = setup();
        let builder = BlockBuilder::new(&params);
        let genesis_key = keys::dev_genesis_key();
        let dest = keys::dev_key(1);

        let send = builder.state_send(&genesis_key, params.genesis.hash(), gb(3), dest.account());
        lattice_test_utils::commit(&store, &params, &send);

        let legacy = builder.legacy_send(&genesis_key, send.hash(), gb(4), dest.account());
        let (result, _) = check(&store, &params, &legacy);
        assert_eq!(result, ProcessResult::BlockPosition);
    }

    #[test]
    fn test_insufficient_work() {
        let (store, mut params) = setup();
        let builder = BlockBuilder::new(&params);
        let genesis_key = keys::dev_genesis_key();

        let mut send =
            builder.state_send(&genesis_key, params.genesis.hash(), gb(1), keys::dev_key(1).account());
        if let Block::State(b) = &mut send {
            b.work = 0;
        }
        // Raise the bar so a zero nonce can't clear it.
        params.work = lattice_primitives::work::WorkThresholds::new(u64::MAX, u64::MAX, u64::MAX);
        let (result, _) = check(&store, &params, &send);
        assert_eq!(result, ProcessResult::InsufficientWork);
    }

    #[test]
    fn test_epoch_upgrade() {
        let (store, params) = setup();
        let builder = BlockBuilder::new(&params);
        let genesis_key = keys::dev_genesis_key();
        let receiver = keys::dev_key(1);

        // Give the account a pending entry so the epoch rules are happy even
        // for open-shaped upgrades elsewhere, and a head to upgrade.
        let send = builder.state_send(&genesis_key, params.genesis.hash(), gb(40), receiver.account());
        lattice_test_utils::commit(&store, &params, &send);
        let open = builder.state_open(&receiver, send.hash(), Amount::raw(40));
        lattice_test_utils::commit(&store, &params, &open);

        let upgrade = builder.epoch_block(
            receiver.account(),
            open.hash(),
            receiver.account(),
            Amount::raw(40),
            Epoch::Epoch1,
        );
        let (result, sideband) = check(&store, &params, &upgrade);
        assert_eq!(result, ProcessResult::Progress);

        let sideband = sideband.unwrap();
        assert_eq!(sideband.details.epoch, Epoch::Epoch1);
        assert!(sideband.details.is_epoch);
        assert_eq!(sideband.balance, Amount::raw(40));
    }

    #[test]
    fn test_epoch_upgrade_rejects_balance_change() {
        let (store, params) = setup();
        let builder = BlockBuilder::new(&params);
        let genesis_key = keys::dev_genesis_key();
        let receiver = keys::dev_key(1);

        let send = builder.state_send(&genesis_key, params.genesis.hash(), gb(40), receiver.account());
        lattice_test_utils::commit(&store, &params, &send);
        let open = builder.state_open(&receiver, send.hash(), Amount::raw(40));
        lattice_test_utils::commit(&store, &params, &open);

        let upgrade = builder.epoch_block(
            receiver.account(),
            open.hash(),
            receiver.account(),
            Amount::raw(39),
            Epoch::Epoch1,
        );
        let (result, _) = check(&store, &params, &upgrade);
        assert_eq!(result, ProcessResult::BalanceMismatch);
    }

    #[test]
    fn test_epoch_open_requires_pending() {
        let (store, params) = setup();
        let builder = BlockBuilder::new(&params);
        let genesis_key = keys::dev_genesis_key();
        let receiver = keys::dev_key(1);

        // No pending entry yet: an upgrade-open has nothing to justify it.
        let premature = builder.epoch_block(
            receiver.account(),
            BlockHash::zero(),
            Account::zero(),
            Amount::zero(),
            Epoch::Epoch1,
        );
        let (result, _) = check(&store, &params, &premature);
        assert_eq!(result, ProcessResult::GapEpochOpenPending);

        // A send to the account makes the same block acceptable.
        let send =
            builder.state_send(&genesis_key, params.genesis.hash(), gb(40), receiver.account());
        lattice_test_utils::commit(&store, &params, &send);
        let (result, sideband) = check(&store, &params, &premature);
        assert_eq!(result, ProcessResult::Progress);

        let sideband = sideband.unwrap();
        assert_eq!(sideband.details.epoch, Epoch::Epoch1);
        assert!(sideband.details.is_epoch);
        assert_eq!(sideband.height, 1);
    }

    #[test]
    fn test_epoch_skip_is_block_position() {
        let (store, params) = setup();
        let builder = BlockBuilder::new(&params);
        let genesis_key = keys::dev_genesis_key();
        let receiver = keys::dev_key(1);

        let send = builder.state_send(&genesis_key, params.genesis.hash(), gb(40), receiver.account());
        lattice_test_utils::commit(&store, &params, &send);
        let open = builder.state_open(&receiver, send.hash(), Amount::raw(40));
        lattice_test_utils::commit(&store, &params, &open);

        // Epoch 0 chain going straight to epoch 2.
        let upgrade = builder.epoch_block(
            receiver.account(),
            open.hash(),
            receiver.account(),
            Amount::raw(40),
            Epoch::Epoch2,
        );
        let (result, _) = check(&store, &params, &upgrade);
        assert_eq!(result, ProcessResult::BlockPosition);
    }
}
