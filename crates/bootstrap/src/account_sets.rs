//! Which account to bootstrap next.
//!
//! Three structures cooperate. `backoff` carries a weight per known account;
//! accounts picked recently weigh more and are sampled less, spreading
//! requests across the ledger. `forwarding` holds accounts hinted by blocks
//! that just progressed and is always drained first. `blocking` holds
//! accounts known to be gap-sourced; they stay out of selection entirely
//! until the dependency arrives and unblocks them.
//!
//! Blocking is disjoint from both other sets at every observable point.

use std::collections::{BTreeMap, HashSet};

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use lattice_state::ids::Account;

pub struct AccountSets {
    backoff: BTreeMap<Account, f32>,
    forwarding: HashSet<Account>,
    blocking: HashSet<Account>,
    /// Candidates sampled per weighted draw.
    backoff_exclusion: usize,
}

impl AccountSets {
    pub fn new(backoff_exclusion: usize) -> Self {
        Self {
            backoff: BTreeMap::new(),
            forwarding: HashSet::new(),
            blocking: HashSet::new(),
            backoff_exclusion,
        }
    }

    /// Makes the account selectable again with a fresh weight.
    pub fn unblock(&mut self, account: Account) {
        self.blocking.remove(&account);
        self.backoff.insert(account, 0.0);
    }

    /// Takes the account out of selection until something unblocks it.
    pub fn block(&mut self, account: Account) {
        self.backoff.remove(&account);
        self.forwarding.remove(&account);
        self.blocking.insert(account);
    }

    /// Hints that the account likely has a follow-up worth requesting soon.
    /// No effect on blocked accounts.
    pub fn forward(&mut self, account: Account) {
        if !self.blocking.contains(&account) {
            self.forwarding.insert(account);
        }
    }

    pub fn blocked(&self, account: &Account) -> bool {
        self.blocking.contains(account)
    }

    /// The next account to request: a forwarding hint if any, else a
    /// weighted random draw. `None` only when nothing is known at all.
    pub fn next(&mut self, rng: &mut impl Rng) -> Option<Account> {
        if let Some(&account) = self.forwarding.iter().next() {
            self.forwarding.remove(&account);
            return Some(account);
        }
        self.random(rng)
    }

    /// Samples candidates by probing the account space uniformly and taking
    /// the first known account at or after each probe (wrapping at the end),
    /// then draws one with probability proportional to `2^(-backoff)` and
    /// bumps its weight.
    fn random(&mut self, rng: &mut impl Rng) -> Option<Account> {
        if self.backoff.is_empty() {
            return None;
        }

        let mut candidates = Vec::with_capacity(self.backoff_exclusion);
        for _ in 0..self.backoff_exclusion.max(1) {
            let probe = Account::from(rng.gen::<[u8; 32]>());
            let (account, weight) = self
                .backoff
                .range(probe..)
                .next()
                .or_else(|| self.backoff.iter().next())
                .map(|(a, w)| (*a, *w))
                .expect("sets: backoff checked non-empty");
            candidates.push((account, weight));
        }

        // Weights floor at the smallest positive float so the distribution
        // stays valid however large a backoff grows.
        let weights = candidates
            .iter()
            .map(|(_, w)| 2f32.powf(-w).max(f32::MIN_POSITIVE));
        let dist = WeightedIndex::new(weights).expect("sets: weights positive");
        let (account, _) = candidates[dist.sample(rng)];

        *self
            .backoff
            .get_mut(&account)
            .expect("sets: candidate drawn from backoff") += 1.0;
        Some(account)
    }

    /// (known, forwarding, blocking) sizes for the stats dump.
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.backoff.len(), self.forwarding.len(), self.blocking.len())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn account(n: u8) -> Account {
        Account::from([n; 32])
    }

    fn sets() -> AccountSets {
        AccountSets::new(16)
    }

    fn assert_disjoint(sets: &AccountSets) {
        for blocked in &sets.blocking {
            assert!(!sets.forwarding.contains(blocked));
            assert!(!sets.backoff.contains_key(blocked));
        }
    }

    #[test]
    fn test_block_removes_everywhere() {
        let mut sets = sets();
        sets.unblock(account(1));
        sets.forward(account(1));
        sets.block(account(1));

        assert!(sets.blocked(&account(1)));
        assert_disjoint(&sets);

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sets.next(&mut rng), None);
    }

    #[test]
    fn test_forward_blocked_account_is_noop() {
        let mut sets = sets();
        sets.block(account(1));
        sets.forward(account(1));
        assert!(sets.forwarding.is_empty());
        assert_disjoint(&sets);
    }

    #[test]
    fn test_unblock_restores_selection() {
        let mut sets = sets();
        sets.block(account(1));
        sets.unblock(account(1));
        assert!(!sets.blocked(&account(1)));
        assert_eq!(sets.backoff.get(&account(1)), Some(&0.0));

        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(sets.next(&mut rng), Some(account(1)));
    }

    #[test]
    fn test_forwarding_preferred_over_random() {
        let mut sets = sets();
        sets.unblock(account(1));
        sets.forward(account(2));

        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(sets.next(&mut rng), Some(account(2)));
        // Hint consumed; selection falls back to the weighted draw.
        assert_eq!(sets.next(&mut rng), Some(account(1)));
    }

    #[test]
    fn test_random_bumps_backoff() {
        let mut sets = sets();
        sets.unblock(account(1));

        let mut rng = StdRng::seed_from_u64(4);
        for round in 1..=5u32 {
            assert_eq!(sets.next(&mut rng), Some(account(1)));
            assert_eq!(sets.backoff.get(&account(1)), Some(&(round as f32)));
        }
    }

    #[test]
    fn test_backoff_spreads_draws() {
        let mut sets = sets();
        for n in 1..=8 {
            sets.unblock(account(n));
        }

        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.insert(sets.next(&mut rng).unwrap());
        }
        // With exponential backoff every known account gets drawn.
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_next_on_empty_sets() {
        let mut rng = StdRng::seed_from_u64(6);
        assert_eq!(sets().next(&mut rng), None);
    }
}
