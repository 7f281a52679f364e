//! The active-election pool seam.

use std::sync::Arc;

use parking_lot::Mutex;

use lattice_state::block::Block;
use lattice_state::ids::QualifiedRoot;

pub type ElectionRef = Arc<Election>;

type DropHook = Box<dyn FnOnce(&QualifiedRoot) + Send>;

/// A running election for one qualified root. Interested parties register
/// destruction hooks; each fires exactly once, when the last reference goes
/// away.
pub struct Election {
    root: QualifiedRoot,
    drop_hooks: Mutex<Vec<DropHook>>,
}

impl Election {
    pub fn new(root: QualifiedRoot) -> Self {
        Self {
            root,
            drop_hooks: Mutex::new(Vec::new()),
        }
    }

    pub fn qualified_root(&self) -> &QualifiedRoot {
        &self.root
    }

    pub fn on_drop(&self, hook: DropHook) {
        self.drop_hooks.lock().push(hook);
    }
}

impl Drop for Election {
    fn drop(&mut self) {
        let hooks = std::mem::take(self.drop_hooks.get_mut());
        for hook in hooks {
            hook(&self.root);
        }
    }
}

/// What the pool did with an activation request.
pub struct ElectionInsertion {
    /// The election for the block's root, freshly made or already running.
    pub election: Option<ElectionRef>,
    /// Whether this call created it.
    pub inserted: bool,
}

impl ElectionInsertion {
    pub fn none() -> Self {
        Self {
            election: None,
            inserted: false,
        }
    }
}

/// Pool of active elections. Consensus machinery implements this; the
/// limiter only relies on insertion being idempotent per qualified root.
pub trait ElectionPool: Send + Sync {
    fn insert(&self, block: &Arc<Block>) -> ElectionInsertion;
}
