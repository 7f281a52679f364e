use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tracing::*;

use lattice_db::traits::{LedgerRead, Store, StoreRef};
use lattice_ledger::apply::apply_block;
use lattice_ledger::check::BlockCheckContext;
use lattice_primitives::time::unix_secs;
use lattice_state::block::Block;
use lattice_state::params::LedgerParams;

use crate::config::ProcessorConfig;
use crate::events::{InsertedEvent, ProcessedEvent};

enum Msg {
    Block(Arc<Block>),
    Flush(oneshot::Sender<()>),
    Stop,
}

type Subscribers<T> = Arc<Mutex<Vec<mpsc::UnboundedSender<T>>>>;

/// Handle to the validation thread. Clones share the same queue and
/// subscriber lists.
#[derive(Clone)]
pub struct BlockProcessor {
    tx: mpsc::UnboundedSender<Msg>,
    depth: Arc<AtomicUsize>,
    max_queue: usize,
    processed_subs: Subscribers<ProcessedEvent>,
    inserted_subs: Subscribers<InsertedEvent>,
    worker: Arc<Mutex<Option<thread::JoinHandle<()>>>>,
}

impl BlockProcessor {
    /// Spawns the validation thread and returns the handle to it.
    pub fn start(store: StoreRef, params: Arc<LedgerParams>, config: ProcessorConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let depth = Arc::new(AtomicUsize::new(0));
        let processed_subs: Subscribers<ProcessedEvent> = Arc::new(Mutex::new(Vec::new()));
        let inserted_subs: Subscribers<InsertedEvent> = Arc::new(Mutex::new(Vec::new()));

        let worker = {
            let depth = depth.clone();
            let processed_subs = processed_subs.clone();
            let inserted_subs = inserted_subs.clone();
            thread::Builder::new()
                .name("blockproc".into())
                .spawn(move || {
                    worker_loop(rx, store, params, depth, processed_subs, inserted_subs)
                })
                .expect("processor: spawn worker")
        };

        Self {
            tx,
            depth,
            max_queue: config.max_queue,
            processed_subs,
            inserted_subs,
            worker: Arc::new(Mutex::new(Some(worker))),
        }
    }

    /// Enqueues a block for validation. Non-blocking; returns false when the
    /// queue is full or the processor has stopped, in which case the block
    /// is shed and the producer is expected to re-request it later.
    pub fn add(&self, block: Block) -> bool {
        if self.full() {
            debug!(hash = %block.hash(), "queue full, shedding block");
            return false;
        }
        self.depth.fetch_add(1, Ordering::Relaxed);
        let sent = self.tx.send(Msg::Block(Arc::new(block))).is_ok();
        if !sent {
            self.depth.fetch_sub(1, Ordering::Relaxed);
        }
        sent
    }

    /// Waits until everything enqueued before this call has been processed.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Msg::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    pub fn full(&self) -> bool {
        self.depth.load(Ordering::Relaxed) >= self.max_queue
    }

    pub fn half_full(&self) -> bool {
        self.depth.load(Ordering::Relaxed) >= self.max_queue / 2
    }

    /// Every processed block, in commit order.
    pub fn subscribe_processed(&self) -> mpsc::UnboundedReceiver<ProcessedEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.processed_subs.lock().push(tx);
        rx
    }

    /// Only committed blocks, in commit order.
    pub fn subscribe_inserted(&self) -> mpsc::UnboundedReceiver<InsertedEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inserted_subs.lock().push(tx);
        rx
    }

    /// Stops the validation thread after the current block and joins it.
    /// Idempotent.
    pub fn stop(&self) {
        let _ = self.tx.send(Msg::Stop);
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}

fn worker_loop(
    mut rx: mpsc::UnboundedReceiver<Msg>,
    store: StoreRef,
    params: Arc<LedgerParams>,
    depth: Arc<AtomicUsize>,
    processed_subs: Subscribers<ProcessedEvent>,
    inserted_subs: Subscribers<InsertedEvent>,
) {
    while let Some(msg) = rx.blocking_recv() {
        match msg {
            Msg::Block(block) => {
                depth.fetch_sub(1, Ordering::Relaxed);
                process_one(&store, &params, block, &processed_subs, &inserted_subs);
            }
            Msg::Flush(done) => {
                let _ = done.send(());
            }
            Msg::Stop => break,
        }
    }
}

fn process_one(
    store: &StoreRef,
    params: &LedgerParams,
    block: Arc<Block>,
    processed_subs: &Subscribers<ProcessedEvent>,
    inserted_subs: &Subscribers<InsertedEvent>,
) {
    let hash = block.hash();
    let mut tx = store.write();
    let read: &dyn LedgerRead = &*tx;
    let (result, sideband) = BlockCheckContext::new(read, params, &block, unix_secs()).check();
    if let Some(sideband) = &sideband {
        // A failed write here means the store is gone; that's a bug, not a
        // recoverable condition.
        apply_block(&mut *tx, &block, sideband).expect("processor: ledger write");
        trace!(%hash, height = sideband.height, "block inserted");
    } else {
        trace!(%hash, ?result, "block rejected");
    }

    // Observers fire while the write view is held so they see outcomes in
    // commit order.
    emit(
        processed_subs,
        ProcessedEvent {
            result,
            block: block.clone(),
        },
    );
    if result.is_progress() {
        emit(inserted_subs, InsertedEvent { block });
    }
}

fn emit<T: Clone>(subs: &Subscribers<T>, event: T) {
    subs.lock().retain(|sub| sub.send(event.clone()).is_ok());
}

#[cfg(test)]
mod tests {
    use lattice_db::MemStore;
    use lattice_ledger::ProcessResult;
    use lattice_primitives::amount::Amount;
    use lattice_test_utils::{dev_params, install_genesis, keys, BlockBuilder};

    use super::*;

    fn start_node() -> (StoreRef, Arc<LedgerParams>, BlockProcessor) {
        let params = Arc::new(dev_params());
        let store: StoreRef = Arc::new(MemStore::new());
        install_genesis(&*store, &params, 1);
        let processor =
            BlockProcessor::start(store.clone(), params.clone(), ProcessorConfig::default());
        (store, params, processor)
    }

    #[tokio::test]
    async fn test_processes_valid_send() {
        let (store, params, processor) = start_node();
        let mut processed = processor.subscribe_processed();
        let mut inserted = processor.subscribe_inserted();

        let genesis_key = keys::dev_genesis_key();
        let send = BlockBuilder::new(&params).state_send(
            &genesis_key,
            params.genesis.hash(),
            Amount::MAX.checked_sub(Amount::raw(9)).unwrap(),
            keys::dev_key(1).account(),
        );
        assert!(processor.add(send.clone()));
        processor.flush().await;

        let event = processed.recv().await.unwrap();
        assert_eq!(event.result, ProcessResult::Progress);
        assert_eq!(event.block.hash(), send.hash());
        assert_eq!(inserted.recv().await.unwrap().block.hash(), send.hash());

        let tx = store.read();
        assert!(tx.block_exists(&send.hash()));
        processor.stop();
    }

    #[tokio::test]
    async fn test_duplicate_reports_old() {
        let (_store, params, processor) = start_node();
        let mut processed = processor.subscribe_processed();
        let mut inserted = processor.subscribe_inserted();

        assert!(processor.add(params.genesis.clone()));
        processor.flush().await;

        assert_eq!(processed.recv().await.unwrap().result, ProcessResult::Old);
        assert!(inserted.try_recv().is_err());
        processor.stop();
    }

    #[tokio::test]
    async fn test_outcomes_in_commit_order() {
        let (_store, params, processor) = start_node();
        let mut processed = processor.subscribe_processed();

        let genesis_key = keys::dev_genesis_key();
        let receiver = keys::dev_key(1);
        let builder = BlockBuilder::new(&params);
        let send = builder.state_send(
            &genesis_key,
            params.genesis.hash(),
            Amount::MAX.checked_sub(Amount::raw(4)).unwrap(),
            receiver.account(),
        );
        let open = builder.state_open(&receiver, send.hash(), Amount::raw(4));

        // Queued out of order: the open gaps first, then the send lands.
        assert!(processor.add(open.clone()));
        assert!(processor.add(send.clone()));
        processor.flush().await;

        let first = processed.recv().await.unwrap();
        assert_eq!(first.block.hash(), open.hash());
        assert_eq!(first.result, ProcessResult::GapSource);
        let second = processed.recv().await.unwrap();
        assert_eq!(second.block.hash(), send.hash());
        assert_eq!(second.result, ProcessResult::Progress);
        processor.stop();
    }

    #[tokio::test]
    async fn test_zero_queue_sheds() {
        let params = Arc::new(dev_params());
        let store: StoreRef = Arc::new(MemStore::new());
        install_genesis(&*store, &params, 1);
        let processor = BlockProcessor::start(
            store,
            params.clone(),
            ProcessorConfig { max_queue: 0 },
        );

        assert!(processor.full());
        assert!(!processor.add(params.genesis.clone()));
        processor.stop();
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let (_store, _params, processor) = start_node();
        processor.stop();
        processor.stop();
    }
}
