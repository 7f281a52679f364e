//! Epoch ordinals and the sentinel-link registry.
//!
//! Every block is stamped with the epoch of its chain at the time it was
//! made. Upgrades happen through dedicated epoch blocks whose link field
//! carries a well-known sentinel value; the registry below maps sentinels to
//! epoch numbers and to the key allowed to sign the upgrade.

use arbitrary::Arbitrary;

use crate::buf::Buf32;

/// Monotone epoch ordinal. Upgrades raise this by exactly one.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Arbitrary)]
pub enum Epoch {
    #[default]
    Epoch0 = 0,
    Epoch1 = 1,
    Epoch2 = 2,
}

impl Epoch {
    /// Whether `next` is the direct successor of `prev`.
    pub fn is_sequential(prev: Epoch, next: Epoch) -> bool {
        next as u8 == prev as u8 + 1
    }
}

struct EpochEntry {
    epoch: Epoch,
    signer: Buf32,
    link: Buf32,
}

/// Registry of epoch sentinel links and their designated upgrade signers.
/// Network params decide the contents; an empty registry recognizes no
/// upgrades at all.
#[derive(Default)]
pub struct Epochs {
    entries: Vec<EpochEntry>,
}

impl Epochs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, epoch: Epoch, signer: Buf32, link: Buf32) {
        self.entries.push(EpochEntry {
            epoch,
            signer,
            link,
        });
    }

    pub fn is_epoch_link(&self, link: &Buf32) -> bool {
        self.entries.iter().any(|e| e.link == *link)
    }

    /// The epoch a sentinel link upgrades to.
    pub fn epoch(&self, link: &Buf32) -> Option<Epoch> {
        self.entries.iter().find(|e| e.link == *link).map(|e| e.epoch)
    }

    /// The key allowed to sign the upgrade block for an epoch.
    pub fn signer(&self, epoch: Epoch) -> Option<Buf32> {
        self.entries
            .iter()
            .find(|e| e.epoch == epoch)
            .map(|e| e.signer)
    }

    pub fn link(&self, epoch: Epoch) -> Option<Buf32> {
        self.entries
            .iter()
            .find(|e| e.epoch == epoch)
            .map(|e| e.link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential() {
        assert!(Epoch::is_sequential(Epoch::Epoch0, Epoch::Epoch1));
        assert!(Epoch::is_sequential(Epoch::Epoch1, Epoch::Epoch2));
        assert!(!Epoch::is_sequential(Epoch::Epoch0, Epoch::Epoch2));
        assert!(!Epoch::is_sequential(Epoch::Epoch1, Epoch::Epoch1));
        assert!(!Epoch::is_sequential(Epoch::Epoch2, Epoch::Epoch1));
    }

    #[test]
    fn test_registry_lookup() {
        let signer = Buf32::from([7u8; 32]);
        let link = Buf32::from([1u8; 32]);
        let mut epochs = Epochs::new();
        epochs.add(Epoch::Epoch1, signer, link);

        assert!(epochs.is_epoch_link(&link));
        assert!(!epochs.is_epoch_link(&Buf32::zero()));
        assert_eq!(epochs.epoch(&link), Some(Epoch::Epoch1));
        assert_eq!(epochs.signer(Epoch::Epoch1), Some(signer));
        assert_eq!(epochs.signer(Epoch::Epoch2), None);
        assert_eq!(epochs.link(Epoch::Epoch1), Some(link));
    }
}
