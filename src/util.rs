// src/util.rs
use sha2::{Digest, Sha256, Sha512_256};

use crate::error::{Error, Result};

/// Parse a u32 given either as decimal or as 0x-prefixed hex (chain ids are usually written in hex).
pub fn parse_u32_any(s: &str) -> Result<u32> {
    let t = s.trim();
    let parsed = if let Some(x) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        u32::from_str_radix(x, 16)
    } else {
        t.parse::<u32>()
    };
    parsed.map_err(|e| Error::Encoding(format!("'{s}' is not a u32: {e}")))
}

/// Nonces come from argv as text; anything but a plain non-negative integer is refused.
pub fn parse_nonce(s: &str) -> Result<u64> {
    let t = s.trim();
    if t.is_empty() || !t.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidNonce(s.to_string()));
    }
    t.parse::<u64>().map_err(|_| Error::InvalidNonce(s.to_string()))
}

pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>> {
    let t = s.trim();
    let t = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")).unwrap_or(t);
    Ok(hex::decode(t)?)
}

pub fn bytes_to_0x(v: &[u8]) -> String {
    format!("0x{}", hex::encode(v))
}

pub fn sha512_256(data: &[u8]) -> [u8; 32] {
    Sha512_256::digest(data).into()
}

pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(data)).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_must_be_an_integer() {
        assert_eq!(parse_nonce("7").unwrap(), 7);
        assert_eq!(parse_nonce(" 12 ").unwrap(), 12);
        for bad in ["", "abc", "-1", "1.5", "0x10", "NaN"] {
            assert!(matches!(parse_nonce(bad), Err(Error::InvalidNonce(_))), "{bad}");
        }
    }

    #[test]
    fn chain_id_accepts_hex_and_decimal() {
        assert_eq!(parse_u32_any("0x80000000").unwrap(), 0x8000_0000);
        assert_eq!(parse_u32_any("1").unwrap(), 1);
        assert!(parse_u32_any("0x1_0000_0000").is_err());
    }

    #[test]
    fn sha512_256_of_empty_input() {
        assert_eq!(
            hex::encode(sha512_256(b"")),
            "c672b8d1ef56ed28ab87c3622c5114069bdd3ad7b8f9737498d0c01ecef0967a"
        );
    }
}
