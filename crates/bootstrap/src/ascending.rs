//! The ascending bootstrap attempt.
//!
//! One attempt owns a driver task. Each iteration waits for an in-flight
//! slot, picks an account, leases a connection (idle pool first, transport
//! dial otherwise), writes one bulk-pull starting at the local chain head,
//! and hands the connection to a reader task that streams blocks into the
//! processor. Processed outcomes come back over a channel the driver drains
//! between requests and folds into the selection sets.
//!
//! In-flight accounting is a semaphore: the permit moves into the reader
//! task and releases the slot when the stream ends, however it ends.
//! `stop` closes the semaphore, which wakes the driver and refuses further
//! permits.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::AsyncWriteExt;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tracing::*;

use lattice_db::traits::{LedgerRead, Store, StoreRef};
use lattice_ledger::ProcessResult;
use lattice_primitives::buf::Buf32;
use lattice_processor::{BlockProcessor, ProcessedEvent};
use lattice_state::block::Block;
use lattice_state::ids::{Account, BlockHash};

use crate::account_sets::AccountSets;
use crate::config::BootstrapConfig;
use crate::deserializer;
use crate::transport::Transport;
use crate::wire::BulkPullRequest;

#[derive(Default)]
struct Stats {
    requests: AtomicU64,
    blocks: AtomicU64,
    forwarded: AtomicU64,
    connect_failures: AtomicU64,
}

pub struct AscendingBootstrap<T: Transport> {
    transport: Arc<T>,
    store: StoreRef,
    processor: BlockProcessor,
    config: BootstrapConfig,
    sets: Mutex<AccountSets>,
    /// Idle connections from completed streams, reused before dialing.
    sockets: Mutex<VecDeque<T::Conn>>,
    inflight: Arc<Semaphore>,
    stopped: AtomicBool,
    stats: Stats,
}

impl<T: Transport> AscendingBootstrap<T> {
    pub fn new(
        transport: Arc<T>,
        store: StoreRef,
        processor: BlockProcessor,
        config: BootstrapConfig,
    ) -> Arc<Self> {
        let inflight = Arc::new(Semaphore::new(config.max_in_flight.max(1)));
        let sets = Mutex::new(AccountSets::new(config.backoff_exclusion));
        Arc::new(Self {
            transport,
            store,
            processor,
            config,
            sets,
            sockets: Mutex::new(VecDeque::new()),
            inflight,
            stopped: AtomicBool::new(false),
            stats: Stats::default(),
        })
    }

    /// Runs until [`stop`](Self::stop), the transport running out of peers,
    /// or the processor going away. In-flight readers drain before this
    /// returns.
    pub async fn run(self: Arc<Self>) {
        let mut events = self.processor.subscribe_processed();
        self.seed();
        let mut readers = JoinSet::new();

        loop {
            tokio::select! {
                // Feedback first: outcomes drain before the next request is
                // aimed.
                biased;

                event = events.recv() => {
                    match event {
                        Some(event) => self.inspect(&event),
                        None => {
                            debug!("processor gone, stopping attempt");
                            self.stop();
                            break;
                        }
                    }
                }

                permit = self.inflight.clone().acquire_owned() => {
                    let Ok(permit) = permit else {
                        break; // closed by stop()
                    };
                    if self.stopped() {
                        break;
                    }
                    if !self.clone().request_one(permit, &mut readers).await {
                        break;
                    }
                }
            }

            while readers.try_join_next().is_some() {}
        }

        while readers.join_next().await.is_some() {}
        debug!("attempt finished");
    }

    /// Idempotent; waiters wake and in-flight streams finish on their own.
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.inflight.close();
        }
    }

    pub fn stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Starts from every known account and every account that has something
    /// receivable waiting.
    fn seed(&self) {
        let tx = self.store.read();
        let mut sets = self.sets.lock();
        tx.for_each_account(&mut |account, _| sets.unblock(*account));
        tx.for_each_pending(&mut |key, _| sets.unblock(key.account));
        let (known, _, _) = sets.sizes();
        debug!(known, "seeded account sets");
    }

    /// Issues one bulk-pull. Returns false when the attempt should end.
    async fn request_one(
        self: Arc<Self>,
        permit: OwnedSemaphorePermit,
        readers: &mut JoinSet<()>,
    ) -> bool {
        let account = {
            let mut sets = self.sets.lock();
            sets.next(&mut rand::thread_rng())
        };
        let Some(account) = account else {
            // Nothing known yet; processed feedback will seed us.
            drop(permit);
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            return true;
        };

        let start = self.request_start(&account);
        let conn = match self.lease_connection().await {
            Some(conn) => conn,
            None => {
                info!("no bootstrap peer available, stopping");
                self.stop();
                return false;
            }
        };

        let mut conn = conn;
        let request = BulkPullRequest::ascending(start, self.config.max_pull_count);
        let mut frame = Vec::new();
        request.serialize(&mut frame);
        if let Err(e) = conn.write_all(&frame).await {
            // Connection is dropped, not pooled; the account will be drawn
            // again.
            self.stats.connect_failures.fetch_add(1, Ordering::Relaxed);
            debug!(err = %e, %account, "bulk pull write failed");
            return true;
        }

        let requests = self.stats.requests.fetch_add(1, Ordering::Relaxed) + 1;
        if requests % self.config.stats_interval.max(1) == 0 {
            self.dump_stats();
        }

        let this = self.clone();
        readers.spawn(async move {
            this.read_stream(conn, permit).await;
        });
        true
    }

    /// Resume point for an account: its chain head when known, else the
    /// account itself so the peer starts at the chain root.
    fn request_start(&self, account: &Account) -> Buf32 {
        let tx = self.store.read();
        tx.account_info(account)
            .map(|info| *info.head.inner())
            .unwrap_or(*account.inner())
    }

    async fn lease_connection(&self) -> Option<T::Conn> {
        if let Some(conn) = self.sockets.lock().pop_front() {
            return Some(conn);
        }
        let conn = self.transport.connect_bootstrap_peer().await;
        if conn.is_none() {
            self.stats.connect_failures.fetch_add(1, Ordering::Relaxed);
        }
        conn
    }

    /// Streams one response into the processor. The permit rides along and
    /// frees the in-flight slot when this returns.
    async fn read_stream(self: Arc<Self>, mut conn: T::Conn, _permit: OwnedSemaphorePermit) {
        loop {
            match deserializer::read_block(&mut conn).await {
                Ok(Some(block)) => {
                    self.stats.blocks.fetch_add(1, Ordering::Relaxed);
                    self.processor.add(block);
                }
                Ok(None) => {
                    // Clean end of stream; the connection is reusable.
                    self.sockets.lock().push_back(conn);
                    break;
                }
                Err(e) => {
                    debug!(err = %e, "read failed, dropping connection");
                    break;
                }
            }
        }
    }

    /// Folds one ledger outcome into the selection sets.
    fn inspect(&self, event: &ProcessedEvent) {
        match event.result {
            ProcessResult::Progress => {
                let tx = self.store.read();
                let Some(saved) = tx.get_block(&event.block.hash()) else {
                    return;
                };
                let account = saved.sideband.account;
                let mut sets = self.sets.lock();
                sets.unblock(account);
                sets.forward(account);
                if let Some(destination) = self.send_destination(&*tx, &event.block) {
                    sets.forward(destination);
                    self.stats.forwarded.fetch_add(1, Ordering::Relaxed);
                }
            }
            ProcessResult::GapSource => {
                // Don't ask for more of this chain until the source shows up.
                let tx = self.store.read();
                let account = if event.block.previous().is_zero() {
                    event.block.account_field()
                } else {
                    tx.get_block(&event.block.previous())
                        .map(|p| p.sideband.account)
                };
                if let Some(account) = account {
                    self.sets.lock().block(account);
                }
            }
            _ => {}
        }
    }

    /// The destination worth hinting after a progressed send. Legacy sends
    /// name it outright; for state blocks a balance drop against the
    /// previous block marks a send, gated by config.
    fn send_destination(&self, tx: &dyn LedgerRead, block: &Block) -> Option<Account> {
        match block {
            Block::Send(b) => Some(b.destination),
            Block::State(b) if self.config.forward_send_destinations => {
                let previous = tx.get_block(&b.previous)?;
                (b.balance < previous.sideband.balance)
                    .then(|| BlockHash::from(b.link).as_account())
            }
            _ => None,
        }
    }

    fn dump_stats(&self) {
        let (known, forwarding, blocking) = self.sets.lock().sizes();
        info!(
            requests = self.stats.requests.load(Ordering::Relaxed),
            blocks = self.stats.blocks.load(Ordering::Relaxed),
            forwarded = self.stats.forwarded.load(Ordering::Relaxed),
            connect_failures = self.stats.connect_failures.load(Ordering::Relaxed),
            known,
            forwarding,
            blocking,
            "bootstrap progress"
        );
    }
}
