use std::fmt;

use serde::Serialize;

use crate::address::StacksAddress;
use crate::encoding::{ClarityName, ClarityValue, ContractIdentifier};
use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionVersion {
    Mainnet = 0x00,
    Testnet = 0x80,
}

impl TransactionVersion {
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            0x00 => Ok(Self::Mainnet),
            0x80 => Ok(Self::Testnet),
            other => Err(Error::Decoding(format!("unknown transaction version {other:#04x}"))),
        }
    }

    /// Address version used for single-signature senders on this network.
    pub fn singlesig_address_version(self) -> u8 {
        match self {
            Self::Mainnet => crate::address::MAINNET_SINGLESIG,
            Self::Testnet => crate::address::TESTNET_SINGLESIG,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnchorMode {
    OnChainOnly = 0x01,
    OffChainOnly = 0x02,
    Any = 0x03,
}

impl AnchorMode {
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            0x01 => Ok(Self::OnChainOnly),
            0x02 => Ok(Self::OffChainOnly),
            0x03 => Ok(Self::Any),
            other => Err(Error::Decoding(format!("unknown anchor mode {other:#04x}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostConditionMode {
    Allow = 0x01,
    Deny = 0x02,
}

impl PostConditionMode {
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            0x01 => Ok(Self::Allow),
            0x02 => Ok(Self::Deny),
            other => Err(Error::Decoding(format!("unknown post-condition mode {other:#04x}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PubkeyEncoding {
    Compressed = 0x00,
    Uncompressed = 0x01,
}

impl PubkeyEncoding {
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            0x00 => Ok(Self::Compressed),
            0x01 => Ok(Self::Uncompressed),
            other => Err(Error::Decoding(format!("unknown key encoding {other:#04x}"))),
        }
    }
}

/// `recovery_id || r || s`
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MessageSignature(pub [u8; 65]);

impl MessageSignature {
    pub fn empty() -> Self {
        Self([0u8; 65])
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Debug for MessageSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageSignature({})", hex::encode(self.0))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Txid(pub [u8; 32]);

impl Txid {
    /// Accepts the node's rendering: optional quotes and optional `0x`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let t = s.trim().trim_matches('"');
        let bytes = crate::util::hex_to_bytes(t)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::Decoding(format!("txid must be 32 bytes: {s}")))?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Txid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Txid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Txid({self})")
    }
}

/// Where a transaction is headed: node endpoint and the chain parameters it signs for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkTarget {
    pub url: String,
    pub version: TransactionVersion,
    pub chain_id: u32,
}

impl NetworkTarget {
    pub fn testnet(url: impl Into<String>, chain_id: u32) -> Self {
        Self { url: url.into(), version: TransactionVersion::Testnet, chain_id }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoncePolicy {
    Explicit(u64),
    /// Ask the node for the account's next nonce.
    FromNode,
}

impl From<Option<u64>> for NoncePolicy {
    fn from(v: Option<u64>) -> Self {
        v.map(NoncePolicy::Explicit).unwrap_or(NoncePolicy::FromNode)
    }
}

/// Everything needed to build a signed contract call, minus the credential.
#[derive(Clone, Debug, PartialEq)]
pub struct ContractCallRequest {
    pub contract: ContractIdentifier,
    pub function_name: ClarityName,
    pub function_args: Vec<ClarityValue>,
    pub fee: u64,
    pub nonce: NoncePolicy,
    pub anchor_mode: AnchorMode,
    pub post_condition_mode: PostConditionMode,
}

/// A call that executes without a signature; only a caller address is sent.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadOnlyCallRequest {
    pub contract: ContractIdentifier,
    pub function_name: ClarityName,
    pub function_args: Vec<ClarityValue>,
    pub sender: StacksAddress,
}

/// JSON view of a decoded signed transaction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedTxOut {
    pub txid: String,
    pub version: TransactionVersion,
    pub chain_id: String,
    pub sender: String,
    pub nonce: u64,
    pub fee: u64,
    pub key_encoding: PubkeyEncoding,
    pub signature_valid: bool,
    pub anchor_mode: AnchorMode,
    pub post_condition_mode: PostConditionMode,
    pub contract: String,
    pub function_name: String,
    pub function_args: Vec<String>,
}

#[allow(non_snake_case)]
#[derive(Debug, Serialize)]
pub struct KeyRecord {
    pub privateKeyHex: String,   // 32 bytes + 01 (compressed marker)
    pub publicKeyHex: String,    // 33-byte compressed
    pub testnetAddress: String,  // ST…
    pub mainnetAddress: String,  // SP…
}
