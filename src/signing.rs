use crate::error::{Error, Result};
use crate::key::{recover_public_key, StacksPrivateKey};
use crate::transaction::{StacksTransaction, AUTH_STANDARD};
use crate::util::sha512_256;

/// Hash of the transaction with its spending condition cleared.
pub fn initial_sighash(tx: &StacksTransaction) -> Result<[u8; 32]> {
    let mut cleared = tx.clone();
    cleared.auth = tx.auth.cleared();
    Ok(sha512_256(&cleared.serialize()?))
}

/// sighash || auth type || fee || nonce, hashed; this is what the key actually signs.
pub fn presign_sighash(cur_sighash: &[u8; 32], auth_type: u8, fee: u64, nonce: u64) -> [u8; 32] {
    let mut buf = Vec::with_capacity(32 + 1 + 8 + 8);
    buf.extend_from_slice(cur_sighash);
    buf.push(auth_type);
    buf.extend_from_slice(&fee.to_be_bytes());
    buf.extend_from_slice(&nonce.to_be_bytes());
    sha512_256(&buf)
}

/// Sign in place with the origin key.
pub fn sign_transaction(tx: &mut StacksTransaction, key: &StacksPrivateKey) -> Result<()> {
    let sender = key.address(tx.version.singlesig_address_version())?;
    if sender.hash160() != &tx.auth.signer {
        return Err(Error::InvalidKey(format!(
            "key belongs to {sender}, transaction is from {}",
            tx.sender()?
        )));
    }
    if key.encoding() != tx.auth.key_encoding {
        return Err(Error::InvalidKey("key encoding does not match spending condition".into()));
    }

    let sighash = initial_sighash(tx)?;
    let presign = presign_sighash(&sighash, AUTH_STANDARD, tx.auth.tx_fee, tx.auth.nonce);
    tx.auth.signature = key.sign_digest(&presign)?;
    Ok(())
}

/// Check that the signature recovers to the public key hashed into the signer field.
pub fn verify_transaction(tx: &StacksTransaction) -> Result<bool> {
    if tx.auth.signature.is_empty() {
        return Ok(false);
    }
    let sighash = initial_sighash(tx)?;
    let presign = presign_sighash(&sighash, AUTH_STANDARD, tx.auth.tx_fee, tx.auth.nonce);
    let pubkey = match recover_public_key(&presign, &tx.auth.signature, tx.auth.key_encoding) {
        Ok(pk) => pk,
        Err(_) => return Ok(false),
    };
    Ok(crate::address::hash160(&pubkey) == tx.auth.signer)
}
