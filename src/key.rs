use k256::ecdsa::{RecoveryId, SigningKey, VerifyingKey};
use rand_core::OsRng;
use zeroize::Zeroize;

use crate::address::StacksAddress;
use crate::error::{Error, Result};
use crate::types::{MessageSignature, PubkeyEncoding};

/// A secp256k1 signing key plus the public-key encoding its address commits to.
///
/// Keys are written as 32 bytes of hex (uncompressed public key) or 33 bytes
/// whose last byte is `01` (compressed public key).
#[derive(Clone)]
pub struct StacksPrivateKey {
    signing_key: SigningKey,
    compressed: bool,
}

impl StacksPrivateKey {
    pub fn from_hex(input: &str) -> Result<Self> {
        let t = input.trim();
        let t = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")).unwrap_or(t);
        let mut bytes = hex::decode(t).map_err(|e| Error::InvalidKey(format!("hex: {e}")))?;

        let compressed = match bytes.len() {
            32 => false,
            33 if bytes[32] == 0x01 => true,
            33 => {
                bytes.zeroize();
                return Err(Error::InvalidKey("33-byte key must end with 01".into()));
            }
            n => {
                bytes.zeroize();
                return Err(Error::InvalidKey(format!("expected 32 or 33 bytes, got {n}")));
            }
        };

        let signing_key = SigningKey::from_slice(&bytes[..32])
            .map_err(|_| Error::InvalidKey("secret scalar is zero or out of range".into()));
        bytes.zeroize();
        Ok(Self { signing_key: signing_key?, compressed })
    }

    /// Fresh random key using the compressed encoding.
    pub fn generate() -> Self {
        Self { signing_key: SigningKey::random(&mut OsRng), compressed: true }
    }

    pub fn to_hex(&self) -> String {
        let mut out = hex::encode(self.signing_key.to_bytes());
        if self.compressed {
            out.push_str("01");
        }
        out
    }

    pub fn encoding(&self) -> PubkeyEncoding {
        if self.compressed {
            PubkeyEncoding::Compressed
        } else {
            PubkeyEncoding::Uncompressed
        }
    }

    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.signing_key
            .verifying_key()
            .to_encoded_point(self.compressed)
            .as_bytes()
            .to_vec()
    }

    pub fn address(&self, version: u8) -> Result<StacksAddress> {
        StacksAddress::from_public_key(version, &self.public_key_bytes())
    }

    /// Recoverable, low-S signature over a 32-byte digest, laid out as `recid || r || s`.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<MessageSignature> {
        let (sig, recid) = self.signing_key.sign_prehash_recoverable(digest)?;
        let (sig, recid) = match sig.normalize_s() {
            Some(low) => (low, RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced())),
            None => (sig, recid),
        };
        let mut out = [0u8; 65];
        out[0] = recid.to_byte();
        out[1..].copy_from_slice(&sig.to_bytes());
        Ok(MessageSignature(out))
    }
}

impl std::fmt::Debug for StacksPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StacksPrivateKey").field("compressed", &self.compressed).finish_non_exhaustive()
    }
}

/// Recover the public key that produced `sig` over `digest`, serialized with `encoding`.
pub fn recover_public_key(digest: &[u8; 32], sig: &MessageSignature, encoding: PubkeyEncoding) -> Result<Vec<u8>> {
    let recid = RecoveryId::from_byte(sig.0[0])
        .ok_or_else(|| Error::Decoding(format!("bad recovery id {}", sig.0[0])))?;
    let signature = k256::ecdsa::Signature::from_slice(&sig.0[1..])?;
    let vk = VerifyingKey::recover_from_prehash(digest, &signature, recid)?;
    Ok(vk
        .to_encoded_point(encoding == PubkeyEncoding::Compressed)
        .as_bytes()
        .to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::TESTNET_SINGLESIG;

    const DEPLOYER_KEY: &str = "753b7cc01a1a2e86221266a154af739463fce51219d97e4f856cd7200c3bd2a601";

    #[test]
    fn devnet_deployer_key_derives_known_address() {
        let key = StacksPrivateKey::from_hex(DEPLOYER_KEY).unwrap();
        assert_eq!(key.encoding(), PubkeyEncoding::Compressed);
        assert_eq!(key.public_key_bytes().len(), 33);
        assert_eq!(
            key.address(TESTNET_SINGLESIG).unwrap().to_string(),
            "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM"
        );
        assert_eq!(key.to_hex(), DEPLOYER_KEY);
    }

    #[test]
    fn thirty_two_byte_key_is_uncompressed() {
        let key = StacksPrivateKey::from_hex(&format!("0x{}", &DEPLOYER_KEY[..64])).unwrap();
        assert_eq!(key.encoding(), PubkeyEncoding::Uncompressed);
        assert_eq!(key.public_key_bytes().len(), 65);
    }

    #[test]
    fn malformed_keys_are_rejected() {
        let bad_keys = vec![
            String::new(),
            "zz".to_string(),
            DEPLOYER_KEY[..40].to_string(),
            format!("{}02", &DEPLOYER_KEY[..64]),
            "00".repeat(32),
        ];
        for bad in &bad_keys {
            assert!(matches!(StacksPrivateKey::from_hex(bad), Err(Error::InvalidKey(_))), "{bad}");
        }
    }

    #[test]
    fn signature_recovers_to_signer() {
        let key = StacksPrivateKey::generate();
        let digest = crate::util::sha512_256(b"subnet");
        let sig = key.sign_digest(&digest).unwrap();
        assert!(sig.0[0] <= 3);
        let recovered = recover_public_key(&digest, &sig, key.encoding()).unwrap();
        assert_eq!(recovered, key.public_key_bytes());
    }
}
