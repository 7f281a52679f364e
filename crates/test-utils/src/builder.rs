//! Signed, worked block construction for tests.
//!
//! Balances are given as the balance *after* the block, matching the wire
//! fields, so callers track chain balances themselves.

use lattice_primitives::amount::Amount;
use lattice_primitives::buf::Buf32;
use lattice_primitives::epoch::Epoch;
use lattice_state::block::{
    Block, ChangeBlock, OpenBlock, ReceiveBlock, SendBlock, StateBlock,
};
use lattice_state::ids::{Account, BlockHash};
use lattice_state::params::LedgerParams;

use crate::keys::{self, DevKey};

pub struct BlockBuilder<'a> {
    params: &'a LedgerParams,
}

impl<'a> BlockBuilder<'a> {
    pub fn new(params: &'a LedgerParams) -> Self {
        Self { params }
    }

    /// Attaches work and a signature. Content hash ignores both, so the
    /// order doesn't matter.
    fn finish(&self, signer: &DevKey, mut block: Block) -> Block {
        let work = self
            .params
            .work
            .generate(&block.root(), Epoch::Epoch0, false);
        let signature = signer.sign(block.hash().inner());
        match &mut block {
            Block::Send(b) => {
                b.work = work;
                b.signature = signature;
            }
            Block::Receive(b) => {
                b.work = work;
                b.signature = signature;
            }
            Block::Open(b) => {
                b.work = work;
                b.signature = signature;
            }
            Block::Change(b) => {
                b.work = work;
                b.signature = signature;
            }
            Block::State(b) => {
                b.work = work;
                b.signature = signature;
            }
        }
        block
    }

    pub fn state_block(
        &self,
        signer: &DevKey,
        account: Account,
        previous: BlockHash,
        representative: Account,
        balance: Amount,
        link: Buf32,
    ) -> Block {
        self.finish(
            signer,
            Block::State(StateBlock {
                account,
                previous,
                representative,
                balance,
                link,
                signature: Default::default(),
                work: 0,
            }),
        )
    }

    pub fn state_send(
        &self,
        key: &DevKey,
        previous: BlockHash,
        balance_after: Amount,
        destination: Account,
    ) -> Block {
        self.state_block(
            key,
            key.account(),
            previous,
            key.account(),
            balance_after,
            *destination.inner(),
        )
    }

    pub fn state_open(&self, key: &DevKey, source: BlockHash, balance: Amount) -> Block {
        self.state_block(
            key,
            key.account(),
            BlockHash::zero(),
            key.account(),
            balance,
            *source.inner(),
        )
    }

    pub fn state_receive(
        &self,
        key: &DevKey,
        previous: BlockHash,
        balance_after: Amount,
        source: BlockHash,
    ) -> Block {
        self.state_block(
            key,
            key.account(),
            previous,
            key.account(),
            balance_after,
            *source.inner(),
        )
    }

    /// Epoch upgrade block, signed by the dev epoch signer rather than the
    /// account.
    pub fn epoch_block(
        &self,
        account: Account,
        previous: BlockHash,
        representative: Account,
        balance: Amount,
        epoch: Epoch,
    ) -> Block {
        let link = self
            .params
            .epochs
            .link(epoch)
            .expect("builder: epoch registered");
        self.state_block(
            &keys::dev_genesis_key(),
            account,
            previous,
            representative,
            balance,
            link,
        )
    }

    pub fn legacy_send(
        &self,
        key: &DevKey,
        previous: BlockHash,
        balance_after: Amount,
        destination: Account,
    ) -> Block {
        self.finish(
            key,
            Block::Send(SendBlock {
                previous,
                destination,
                balance: balance_after,
                signature: Default::default(),
                work: 0,
            }),
        )
    }

    pub fn legacy_receive(&self, key: &DevKey, previous: BlockHash, source: BlockHash) -> Block {
        self.finish(
            key,
            Block::Receive(ReceiveBlock {
                previous,
                source,
                signature: Default::default(),
                work: 0,
            }),
        )
    }

    pub fn legacy_open(&self, key: &DevKey, source: BlockHash, representative: Account) -> Block {
        self.finish(
            key,
            Block::Open(OpenBlock {
                source,
                representative,
                account: key.account(),
                signature: Default::default(),
                work: 0,
            }),
        )
    }

    pub fn legacy_change(&self, key: &DevKey, previous: BlockHash, representative: Account) -> Block {
        self.finish(
            key,
            Block::Change(ChangeBlock {
                previous,
                representative,
                signature: Default::default(),
                work: 0,
            }),
        )
    }
}
