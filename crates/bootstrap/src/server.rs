//! Serving side of the bulk-pull exchange: answers ascending requests from
//! the local store.

use tokio::io::AsyncWriteExt;
use tracing::*;

use lattice_db::traits::{LedgerRead, Store, StoreRef};
use lattice_state::block::{Block, BlockType};
use lattice_state::ids::{Account, BlockHash};

use crate::transport::Connection;
use crate::wire::{self, BulkPullRequest, WireError};

/// Serves bulk-pull requests on one connection until the peer hangs up.
/// Each response is an ascending slice terminated by the `not_a_block` byte.
pub async fn serve_connection<C: Connection>(store: StoreRef, mut conn: C) -> Result<(), WireError> {
    loop {
        let request = match wire::read_request(&mut conn).await {
            Ok(request) => request,
            // Peer closing between requests is the normal end of service.
            Err(WireError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Ok(())
            }
            Err(e) => return Err(e),
        };
        trace!(start = %request.start, count = request.count, "serving bulk pull");

        let blocks = collect_ascending(&*store.read(), &request);
        let mut out = Vec::new();
        for block in &blocks {
            block.wire_serialize(&mut out);
        }
        out.push(u8::from(BlockType::NotABlock));
        conn.write_all(&out).await?;
        conn.flush().await?;
    }
}

/// Resolves the requested slice: a known block hash starts there inclusive,
/// an account id starts at the chain root, anything else is empty. The
/// chain is stored head-linked, so walk down from the head and reverse.
fn collect_ascending(tx: &dyn LedgerRead, request: &BulkPullRequest) -> Vec<Block> {
    let start_hash = BlockHash::from(request.start);
    let (head, stop_at) = if let Some(saved) = tx.get_block(&start_hash) {
        match tx.account_info(&saved.sideband.account) {
            Some(info) => (info.head, Some(start_hash)),
            None => return Vec::new(),
        }
    } else if let Some(info) = tx.account_info(&Account::from(request.start)) {
        (info.head, None)
    } else {
        return Vec::new();
    };

    let mut chain = Vec::new();
    let mut cursor = head;
    while let Some(saved) = tx.get_block(&cursor) {
        let previous = saved.block.previous();
        chain.push(saved.block);
        if stop_at == Some(cursor) || previous.is_zero() {
            break;
        }
        cursor = previous;
    }
    chain.reverse();
    chain.truncate(request.count as usize);
    chain
}
