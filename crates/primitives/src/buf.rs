//! Fixed-width byte values.
//!
//! Hashes, account keys, epoch links, and signatures are all plain
//! fixed-size byte strings, on the wire and in memory. `buf_type!` stamps
//! one such type out: a transparent array newtype carrying only what the
//! codecs and the ledger need, which is array and exact-length slice
//! conversions, the all-zero sentinel check, and hex formatting.

use arbitrary::{Arbitrary, Unstructured};

macro_rules! buf_type {
    ($(#[$attr:meta])* $name:ident, $len:expr) => {
        $(#[$attr])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// The all-zero value. Zero is load-bearing here: a zero
            /// previous marks a chain-opening block, the zero account is
            /// the burn account, a zero link is a noop.
            pub fn zero() -> Self {
                Self([0; $len])
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0; $len]
            }

            pub fn as_slice(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8; $len]> for $name {
            fn as_ref(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl TryFrom<&[u8]> for $name {
            /// The length actually seen.
            type Error = usize;

            fn try_from(slice: &[u8]) -> Result<Self, usize> {
                match slice.try_into() {
                    Ok(bytes) => Ok(Self(bytes)),
                    Err(_) => Err(slice.len()),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::zero()
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                // log lines want recognizable, not complete
                write!(
                    f,
                    "{}..{}",
                    hex::encode(&self.0[..4]),
                    hex::encode(&self.0[$len - 4..])
                )
            }
        }

        impl<'a> Arbitrary<'a> for $name {
            fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
                Ok(Self(u.arbitrary()?))
            }
        }
    };
}

buf_type!(
    /// 32-byte value: block hashes, account keys, state block links.
    Buf32,
    32
);

buf_type!(
    /// 64-byte value: schnorr signatures.
    Buf64,
    64
);
