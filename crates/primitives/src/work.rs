//! Proof-of-work difficulty and acceptance thresholds.
//!
//! Work is an 8-byte nonce attached to every block. Its difficulty is derived
//! from the nonce and the block's root (previous hash, or the account for a
//! chain-opening block), and must meet the threshold for the chain's epoch.
//! Later epochs split the threshold: sends keep the high bar, receive-like
//! blocks get a lower one.

use digest::Digest;
use sha2::Sha256;

use crate::buf::Buf32;
use crate::epoch::Epoch;

/// Difficulty of a work nonce against a root.
pub fn difficulty(work: u64, root: &Buf32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(work.to_le_bytes());
    hasher.update(root.as_slice());
    let digest = hasher.finalize();
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(out)
}

/// Per-epoch acceptance thresholds.
#[derive(Clone, Debug)]
pub struct WorkThresholds {
    /// Base threshold, used through epoch 1.
    pub epoch_1: u64,
    /// Epoch 2 threshold for sends and noops.
    pub epoch_2: u64,
    /// Epoch 2 threshold for receives and epoch upgrades.
    pub epoch_2_receive: u64,
}

impl WorkThresholds {
    pub fn new(epoch_1: u64, epoch_2: u64, epoch_2_receive: u64) -> Self {
        Self {
            epoch_1,
            epoch_2,
            epoch_2_receive,
        }
    }

    /// Production-shaped thresholds.
    pub fn publish_full() -> Self {
        Self::new(
            0xffff_ffc0_0000_0000,
            0xffff_fff8_0000_0000,
            0xffff_fe00_0000_0000,
        )
    }

    /// Cheap thresholds for the dev network, a few hash attempts per block.
    pub fn publish_dev() -> Self {
        Self::new(
            0xfe00_0000_0000_0000,
            0xfe00_0000_0000_0000,
            0xf000_0000_0000_0000,
        )
    }

    /// The threshold a block must meet given its epoch and whether it is
    /// receive-like (a receive or an epoch upgrade).
    pub fn threshold(&self, epoch: Epoch, receive_like: bool) -> u64 {
        match epoch {
            Epoch::Epoch0 | Epoch::Epoch1 => self.epoch_1,
            Epoch::Epoch2 => {
                if receive_like {
                    self.epoch_2_receive
                } else {
                    self.epoch_2
                }
            }
        }
    }

    /// Brute-forces a nonce meeting the threshold. Dev/test helper; real
    /// nodes receive work from clients.
    pub fn generate(&self, root: &Buf32, epoch: Epoch, receive_like: bool) -> u64 {
        let target = self.threshold(epoch, receive_like);
        let mut nonce = 0u64;
        while difficulty(nonce, root) < target {
            nonce += 1;
        }
        nonce
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_work_passes() {
        let thresholds = WorkThresholds::publish_dev();
        let root = Buf32::from([9u8; 32]);
        let work = thresholds.generate(&root, Epoch::Epoch0, false);
        assert!(difficulty(work, &root) >= thresholds.threshold(Epoch::Epoch0, false));
    }

    #[test]
    fn test_threshold_split_by_epoch() {
        let thresholds = WorkThresholds::publish_full();
        assert_eq!(
            thresholds.threshold(Epoch::Epoch0, true),
            thresholds.threshold(Epoch::Epoch1, false)
        );
        assert!(
            thresholds.threshold(Epoch::Epoch2, true) < thresholds.threshold(Epoch::Epoch2, false)
        );
    }

    #[test]
    fn test_difficulty_depends_on_root() {
        let a = difficulty(42, &Buf32::from([1u8; 32]));
        let b = difficulty(42, &Buf32::from([2u8; 32]));
        assert_ne!(a, b);
    }
}
