//! Store writes for an accepted block.

use lattice_db::errors::DbResult;
use lattice_db::traits::LedgerWrite;
use lattice_primitives::amount::Amount;
use lattice_state::account::AccountInfo;
use lattice_state::block::Block;
use lattice_state::ids::Account;
use lattice_state::pending::{PendingInfo, PendingKey};
use lattice_state::sideband::{SavedBlock, Sideband};

/// Commits a block the check context accepted, together with its sideband,
/// into the supplied write view: the block itself, the account head update,
/// and the pending-set delta for sends and receives. Must run under the same
/// view the block was checked against.
pub fn apply_block(tx: &mut dyn LedgerWrite, block: &Block, sideband: &Sideband) -> DbResult<()> {
    let hash = block.hash();
    let account = sideband.account;

    if sideband.details.is_send {
        let previous_balance = tx
            .get_block(&block.previous())
            .map(|p| p.sideband.balance)
            .unwrap_or_else(Amount::zero);
        let amount = previous_balance
            .checked_sub(sideband.balance)
            .expect("apply: send balance already validated");
        tx.put_pending(
            PendingKey::new(send_destination(block), hash),
            PendingInfo {
                source: account,
                amount,
                epoch: sideband.details.epoch,
            },
        )?;
    }

    if sideband.details.is_receive {
        tx.remove_pending(&PendingKey::new(account, block.source()))?;
    }

    // Read the old representative before the info record is replaced.
    let representative = block
        .representative_field()
        .or_else(|| tx.account_info(&account).map(|i| i.representative))
        .unwrap_or_default();

    tx.put_account_info(
        account,
        AccountInfo {
            head: hash,
            representative,
            balance: sideband.balance,
            block_count: sideband.height,
            modified: sideband.timestamp,
            epoch: sideband.details.epoch,
        },
    )?;
    tx.put_block(SavedBlock {
        block: block.clone(),
        sideband: *sideband,
    })?;
    Ok(())
}

/// Where a send-classified block pays to.
fn send_destination(block: &Block) -> Account {
    match block {
        Block::Send(b) => b.destination,
        Block::State(b) => lattice_state::ids::BlockHash::from(b.link).as_account(),
        _ => unreachable!("apply: only send and state blocks classify as sends"),
    }
}
