//! Deterministic dev keys.

use lattice_primitives::buf::{Buf32, Buf64};
use lattice_primitives::crypto;
use lattice_state::ids::Account;

/// A dev keypair. The account is the public key.
#[derive(Copy, Clone, Debug)]
pub struct DevKey {
    secret: Buf32,
    account: Account,
}

impl DevKey {
    fn from_secret(secret: Buf32) -> Self {
        let account = Account::from(crypto::public_key(&secret).expect("devkey: valid secret"));
        Self { secret, account }
    }

    pub fn account(&self) -> Account {
        self.account
    }

    pub fn sign(&self, msg: &Buf32) -> Buf64 {
        crypto::sign_message(msg, &self.secret).expect("devkey: sign")
    }
}

/// The key holding the entire dev genesis balance. Also the dev epoch
/// upgrade signer.
pub fn dev_genesis_key() -> DevKey {
    DevKey::from_secret(Buf32::from([0xdau8; 32]))
}

/// Numbered throwaway keys. `n` must be nonzero, zero is not a valid secret.
pub fn dev_key(n: u8) -> DevKey {
    assert_ne!(n, 0, "devkey: secret can't be zero");
    DevKey::from_secret(Buf32::from([n; 32]))
}
