//! Logic to sign and check block signatures.
//!
//! Accounts are x-only schnorr public keys used verbatim as 32-byte ids, so
//! signature checks take the account buffer directly.

use secp256k1::{schnorr::Signature, Keypair, Message, XOnlyPublicKey, SECP256K1};

use crate::buf::{Buf32, Buf64};

/// Signs a 32-byte digest. Deterministic, no aux randomness.
pub fn sign_message(msg: &Buf32, sk: &Buf32) -> Option<Buf64> {
    let sk = secp256k1::SecretKey::from_slice(sk.as_slice()).ok()?;
    let kp = Keypair::from_secret_key(SECP256K1, &sk);
    let msg = Message::from_digest_slice(msg.as_slice()).ok()?;
    let sig = SECP256K1.sign_schnorr_no_aux_rand(&msg, &kp);
    Some(Buf64::from(sig.serialize()))
}

/// Checks a signature over a 32-byte digest. Any malformed input is just an
/// invalid signature, including the all-zero burn key which parses as no
/// valid point.
pub fn verify_message(sig: &Buf64, msg: &Buf32, pk: &Buf32) -> bool {
    let msg = match Message::from_digest_slice(msg.as_slice()) {
        Ok(msg) => msg,
        Err(_) => return false,
    };

    let pk = match XOnlyPublicKey::from_slice(pk.as_slice()) {
        Ok(pk) => pk,
        Err(_) => return false,
    };

    let sig = match Signature::from_slice(sig.as_slice()) {
        Ok(sig) => sig,
        Err(_) => return false,
    };

    sig.verify(&msg, &pk).is_ok()
}

/// The account id a secret key signs for.
pub fn public_key(sk: &Buf32) -> Option<Buf32> {
    let sk = secp256k1::SecretKey::from_slice(sk.as_slice()).ok()?;
    let kp = Keypair::from_secret_key(SECP256K1, &sk);
    let (pk, _) = kp.x_only_public_key();
    Some(Buf32::from(pk.serialize()))
}
