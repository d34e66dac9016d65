//! Contract-call transactions with a standard single-signature authorization.

use crate::address::StacksAddress;
use crate::encoding::{write_address, write_short_name, ClarityName, ClarityValue, ContractIdentifier};
use crate::error::{Error, Result};
use crate::types::{AnchorMode, MessageSignature, PostConditionMode, PubkeyEncoding, TransactionVersion, Txid};
use crate::util::sha512_256;

pub const AUTH_STANDARD: u8 = 0x04;
pub const HASH_MODE_P2PKH: u8 = 0x00;
pub const PAYLOAD_CONTRACT_CALL: u8 = 0x02;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinglesigSpendingCondition {
    pub signer: [u8; 20],
    pub nonce: u64,
    pub tx_fee: u64,
    pub key_encoding: PubkeyEncoding,
    pub signature: MessageSignature,
}

impl SinglesigSpendingCondition {
    /// The form hashed for the initial sighash: nonce, fee and signature zeroed.
    pub fn cleared(&self) -> Self {
        Self { nonce: 0, tx_fee: 0, signature: MessageSignature::empty(), ..self.clone() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCallPayload {
    pub contract: ContractIdentifier,
    pub function_name: ClarityName,
    pub function_args: Vec<ClarityValue>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StacksTransaction {
    pub version: TransactionVersion,
    pub chain_id: u32,
    pub auth: SinglesigSpendingCondition,
    pub anchor_mode: AnchorMode,
    pub post_condition_mode: PostConditionMode,
    pub payload: ContractCallPayload,
}

impl StacksTransaction {
    /// Sender address on this transaction's network.
    pub fn sender(&self) -> Result<StacksAddress> {
        StacksAddress::new(self.version.singlesig_address_version(), self.auth.signer)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(256);
        out.push(self.version as u8);
        out.extend_from_slice(&self.chain_id.to_be_bytes());

        out.push(AUTH_STANDARD);
        out.push(HASH_MODE_P2PKH);
        out.extend_from_slice(&self.auth.signer);
        out.extend_from_slice(&self.auth.nonce.to_be_bytes());
        out.extend_from_slice(&self.auth.tx_fee.to_be_bytes());
        out.push(self.auth.key_encoding as u8);
        out.extend_from_slice(&self.auth.signature.0);

        out.push(self.anchor_mode as u8);
        out.push(self.post_condition_mode as u8);
        // no post-conditions, only the mode
        out.extend_from_slice(&0u32.to_be_bytes());

        out.push(PAYLOAD_CONTRACT_CALL);
        write_address(&mut out, &self.payload.contract.address);
        write_short_name(&mut out, self.payload.contract.name.as_str());
        write_short_name(&mut out, self.payload.function_name.as_str());
        let argc = u32::try_from(self.payload.function_args.len())
            .map_err(|_| Error::Encoding("too many function arguments".into()))?;
        out.extend_from_slice(&argc.to_be_bytes());
        for arg in &self.payload.function_args {
            arg.serialize_into(&mut out)?;
        }
        Ok(out)
    }

    pub fn txid(&self) -> Result<Txid> {
        Ok(Txid(sha512_256(&self.serialize()?)))
    }
}
