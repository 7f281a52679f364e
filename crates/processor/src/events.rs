//! Observer events. Both fire on the validation thread while the write view
//! that decided them is still held, so subscribers see outcomes in commit
//! order.

use std::sync::Arc;

use lattice_ledger::ProcessResult;
use lattice_state::block::Block;

/// Fired for every block taken off the queue, whatever the outcome.
#[derive(Clone)]
pub struct ProcessedEvent {
    pub result: ProcessResult,
    pub block: Arc<Block>,
}

/// Fired only for blocks that were committed.
#[derive(Clone)]
pub struct InsertedEvent {
    pub block: Arc<Block>,
}
