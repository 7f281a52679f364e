//! A facade around an election pool that limits the number of elections a
//! scheduler lane may have live at once.

use std::collections::HashSet;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use lattice_state::block::Block;
use lattice_state::ids::QualifiedRoot;

use crate::election::{ElectionInsertion, ElectionPool};

pub struct Limiter {
    pool: Arc<dyn ElectionPool>,
    limit: usize,
    /// Elections started through this facade and not yet destroyed.
    live: Mutex<HashSet<QualifiedRoot>>,
    /// Handed to destruction hooks so they survive the limiter.
    weak_self: Weak<Limiter>,
}

impl Limiter {
    pub fn new(pool: Arc<dyn ElectionPool>, limit: usize) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            pool,
            limit,
            live: Mutex::new(HashSet::new()),
            weak_self: weak_self.clone(),
        })
    }

    /// Upper limit on elections allowed to be started.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether there is room to start another election. Advisory: see
    /// [`activate`](Self::activate).
    pub fn available(&self) -> bool {
        self.live.lock().len() < self.limit
    }

    pub fn elections(&self) -> HashSet<QualifiedRoot> {
        self.live.lock().clone()
    }

    /// Starts an election for the block if there is room, delegating the
    /// insertion to the pool.
    ///
    /// The pool call happens outside our lock to keep lock order one-way, so
    /// two concurrent activators can both pass `available` and briefly
    /// overshoot the limit by at most the number of racers. The slot is
    /// reclaimed when the election is destroyed; a weak reference keeps late
    /// hooks harmless after the limiter itself is gone.
    pub fn activate(&self, block: &Arc<Block>) -> ElectionInsertion {
        if !self.available() {
            return ElectionInsertion::none();
        }

        let result = self.pool.insert(block);
        if result.inserted {
            if let Some(election) = &result.election {
                let root = *election.qualified_root();
                self.live.lock().insert(root);
                let weak = self.weak_self.clone();
                election.on_drop(Box::new(move |root| {
                    if let Some(limiter) = weak.upgrade() {
                        limiter.election_destroyed(root);
                    }
                }));
            }
        }
        result
    }

    fn election_destroyed(&self, root: &QualifiedRoot) -> usize {
        usize::from(self.live.lock().remove(root))
    }
}
