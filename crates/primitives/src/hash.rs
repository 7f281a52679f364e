//! Common wrapper around whatever we choose our native hash function to be.

use digest::Digest;
use sha2::Sha256;

use crate::buf::Buf32;

/// Direct untagged hash.
pub fn raw(buf: &[u8]) -> Buf32 {
    Buf32::from(<[u8; 32]>::from(Sha256::digest(buf)))
}

/// Hash of several fields in sequence, equivalent to hashing their
/// concatenation.
pub fn parts(parts: &[&[u8]]) -> Buf32 {
    let mut hasher = Sha256::new();
    for p in parts {
        hasher.update(p);
    }
    Buf32::from(<[u8; 32]>::from(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_matches_concat() {
        let whole = raw(b"hello world");
        let split = parts(&[b"hello", b" ", b"world"]);
        assert_eq!(whole, split);
    }
}
