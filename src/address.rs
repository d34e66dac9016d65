//! Stacks addresses: a version byte plus a hash160, written in c32check.

use std::fmt;
use std::str::FromStr;

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::util::double_sha256;

const C32_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

pub const MAINNET_SINGLESIG: u8 = 22;
pub const MAINNET_MULTISIG: u8 = 20;
pub const TESTNET_SINGLESIG: u8 = 26;
pub const TESTNET_MULTISIG: u8 = 21;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StacksAddress {
    version: u8,
    hash160: [u8; 20],
}

impl StacksAddress {
    pub fn new(version: u8, hash160: [u8; 20]) -> Result<Self> {
        if version >= 32 {
            return Err(Error::InvalidAddress(
                format!("version {version}"),
                "version must fit in one c32 character",
            ));
        }
        Ok(Self { version, hash160 })
    }

    /// P2PKH address for a serialized (compressed or uncompressed) public key.
    pub fn from_public_key(version: u8, public_key: &[u8]) -> Result<Self> {
        Self::new(version, hash160(public_key))
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn hash160(&self) -> &[u8; 20] {
        &self.hash160
    }

    pub fn is_mainnet(&self) -> bool {
        matches!(self.version, MAINNET_SINGLESIG | MAINNET_MULTISIG)
    }
}

impl fmt::Display for StacksAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", c32check_encode(self.version, &self.hash160))
    }
}

impl fmt::Debug for StacksAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StacksAddress({self})")
    }
}

impl FromStr for StacksAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let t = s.trim();
        let rest = t
            .strip_prefix(&['S', 's'][..])
            .ok_or_else(|| Error::InvalidAddress(s.to_string(), "must start with 'S'"))?;
        let (version, data) = c32check_decode(rest).map_err(|why| Error::InvalidAddress(s.to_string(), why))?;
        let hash160: [u8; 20] = data
            .try_into()
            .map_err(|_| Error::InvalidAddress(s.to_string(), "payload is not 20 bytes"))?;
        Self::new(version, hash160)
    }
}

pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(data)).into()
}

fn c32_encode(input: &[u8]) -> String {
    let mut out: Vec<u8> = Vec::with_capacity(input.len() * 8 / 5 + 1);
    let mut carry: u8 = 0;
    let mut carry_bits: u8 = 0;

    for &byte in input.iter().rev() {
        let take = 5 - carry_bits;
        let low = byte & ((1u8 << take) - 1);
        out.push(C32_ALPHABET[((low << carry_bits) + carry) as usize]);
        carry_bits = 8 + carry_bits - 5;
        carry = byte >> (8 - carry_bits);
        if carry_bits >= 5 {
            out.push(C32_ALPHABET[(carry & 0x1f) as usize]);
            carry_bits -= 5;
            carry >>= 5;
        }
    }
    if carry_bits > 0 {
        out.push(C32_ALPHABET[carry as usize]);
    }

    // strip the zero digits produced by the encoding itself ...
    while out.last() == Some(&C32_ALPHABET[0]) {
        out.pop();
    }
    // ... then keep one '0' per leading zero byte of the input
    for _ in input.iter().take_while(|b| **b == 0) {
        out.push(C32_ALPHABET[0]);
    }

    out.reverse();
    out.into_iter().map(char::from).collect()
}

fn c32_digit(c: char) -> Option<u8> {
    let c = match c.to_ascii_uppercase() {
        'O' => '0',
        'L' | 'I' => '1',
        other => other,
    };
    C32_ALPHABET.iter().position(|&a| a as char == c).map(|p| p as u8)
}

fn c32_decode(input: &str) -> std::result::Result<Vec<u8>, &'static str> {
    if !input.is_ascii() {
        return Err("non-ascii character");
    }
    let mut out = Vec::with_capacity(input.len() * 5 / 8 + 1);
    let mut carry: u16 = 0;
    let mut carry_bits: u8 = 0;

    for c in input.chars().rev() {
        let digit = c32_digit(c).ok_or("invalid c32 character")?;
        carry += u16::from(digit) << carry_bits;
        carry_bits += 5;
        if carry_bits >= 8 {
            out.push((carry & 0xff) as u8);
            carry_bits -= 8;
            carry >>= 8;
        }
    }
    if carry_bits > 0 {
        out.push(carry as u8);
    }

    while out.last() == Some(&0) {
        out.pop();
    }
    for _ in input.chars().take_while(|c| c32_digit(*c) == Some(0)) {
        out.push(0);
    }

    out.reverse();
    Ok(out)
}

fn checksum(version: u8, data: &[u8]) -> [u8; 4] {
    let mut buf = Vec::with_capacity(data.len() + 1);
    buf.push(version);
    buf.extend_from_slice(data);
    let h = double_sha256(&buf);
    [h[0], h[1], h[2], h[3]]
}

fn c32check_encode(version: u8, data: &[u8]) -> String {
    let mut payload = data.to_vec();
    payload.extend_from_slice(&checksum(version, data));
    format!("{}{}", C32_ALPHABET[version as usize] as char, c32_encode(&payload))
}

fn c32check_decode(s: &str) -> std::result::Result<(u8, Vec<u8>), &'static str> {
    let mut chars = s.chars();
    let version = chars.next().and_then(c32_digit).ok_or("missing or invalid version character")?;
    let decoded = c32_decode(chars.as_str())?;
    if decoded.len() < 4 {
        return Err("too short");
    }
    let (data, sum) = decoded.split_at(decoded.len() - 4);
    if sum != checksum(version, data) {
        return Err("checksum mismatch");
    }
    Ok((version, data.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boot_address_is_all_zero_hash() {
        let addr: StacksAddress = "ST000000000000000000002AMW42H".parse().unwrap();
        assert_eq!(addr.version(), TESTNET_SINGLESIG);
        assert_eq!(addr.hash160(), &[0u8; 20]);
        assert_eq!(addr.to_string(), "ST000000000000000000002AMW42H");
        assert!(!addr.is_mainnet());
    }

    #[test]
    fn deployer_address_round_trips() {
        let text = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";
        let addr: StacksAddress = text.parse().unwrap();
        assert_eq!(addr.version(), TESTNET_SINGLESIG);
        assert_eq!(addr.to_string(), text);
        // c32 is case-insensitive on input
        let lower: StacksAddress = text.to_lowercase().parse().unwrap();
        assert_eq!(lower, addr);
    }

    #[test]
    fn address_without_s_prefix_is_rejected() {
        let err = "T1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM".parse::<StacksAddress>().unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_, "must start with 'S'")));
    }

    #[test]
    fn mainnet_version_prefix() {
        let addr = StacksAddress::new(MAINNET_SINGLESIG, [7u8; 20]).unwrap();
        let text = addr.to_string();
        assert!(text.starts_with("SP"), "{text}");
        assert_eq!(text.parse::<StacksAddress>().unwrap(), addr);
    }

    #[test]
    fn corrupted_checksum_is_rejected() {
        let err = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGN".parse::<StacksAddress>().unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_, "checksum mismatch")), "{err}");
        assert!("XT1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM".parse::<StacksAddress>().is_err());
        assert!("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZG!".parse::<StacksAddress>().is_err());
    }

    #[test]
    fn c32_handles_leading_zero_bytes() {
        let raw = [0u8, 0, 1, 2, 3];
        let enc = c32_encode(&raw);
        assert!(enc.starts_with("00"));
        assert_eq!(c32_decode(&enc).unwrap(), raw);
    }
}
