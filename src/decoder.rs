use std::collections::BTreeMap;

use crate::address::StacksAddress;
use crate::encoding::{prefix, ClarityName, ClarityValue, ContractIdentifier, ContractName};
use crate::error::{Error, Result};
use crate::signing::verify_transaction;
use crate::transaction::{
    ContractCallPayload, SinglesigSpendingCondition, StacksTransaction, AUTH_STANDARD, HASH_MODE_P2PKH,
    PAYLOAD_CONTRACT_CALL,
};
use crate::types::{AnchorMode, DecodedTxOut, MessageSignature, PostConditionMode, PubkeyEncoding, TransactionVersion};

/// Nesting bound for decoded values; the node enforces a far smaller depth.
const MAX_DEPTH: usize = 64;

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| Error::Decoding(format!("unexpected end of input at byte {}", self.pos)))?;
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.array()?))
    }

    fn address(&mut self) -> Result<StacksAddress> {
        let version = self.u8()?;
        let hash = self.array::<20>()?;
        StacksAddress::new(version, hash)
    }

    fn short_str(&mut self) -> Result<&'a str> {
        let len = self.u8()? as usize;
        std::str::from_utf8(self.take(len)?).map_err(|_| Error::Decoding("name is not utf-8".into()))
    }

    fn finish(&self) -> Result<()> {
        if self.pos != self.buf.len() {
            return Err(Error::Decoding(format!("{} trailing bytes", self.buf.len() - self.pos)));
        }
        Ok(())
    }

    fn value(&mut self, depth: usize) -> Result<ClarityValue> {
        if depth > MAX_DEPTH {
            return Err(Error::Decoding("value nested too deeply".into()));
        }
        let v = match self.u8()? {
            prefix::INT => ClarityValue::Int(i128::from_be_bytes(self.array()?)),
            prefix::UINT => ClarityValue::UInt(u128::from_be_bytes(self.array()?)),
            prefix::BUFFER => {
                let len = self.u32()? as usize;
                ClarityValue::Buffer(self.take(len)?.to_vec())
            }
            prefix::TRUE => ClarityValue::Bool(true),
            prefix::FALSE => ClarityValue::Bool(false),
            prefix::PRINCIPAL_STANDARD => ClarityValue::StandardPrincipal(self.address()?),
            prefix::PRINCIPAL_CONTRACT => {
                let address = self.address()?;
                let name = ContractName::new(self.short_str()?)?;
                ClarityValue::ContractPrincipal(ContractIdentifier { address, name })
            }
            prefix::RESPONSE_OK => ClarityValue::ResponseOk(Box::new(self.value(depth + 1)?)),
            prefix::RESPONSE_ERR => ClarityValue::ResponseErr(Box::new(self.value(depth + 1)?)),
            prefix::OPTIONAL_NONE => ClarityValue::OptionalNone,
            prefix::OPTIONAL_SOME => ClarityValue::OptionalSome(Box::new(self.value(depth + 1)?)),
            prefix::LIST => {
                let n = self.u32()?;
                let mut items = Vec::new();
                for _ in 0..n {
                    items.push(self.value(depth + 1)?);
                }
                ClarityValue::List(items)
            }
            prefix::TUPLE => {
                let n = self.u32()?;
                let mut fields = BTreeMap::new();
                for _ in 0..n {
                    let key = ClarityName::new(self.short_str()?)?;
                    let val = self.value(depth + 1)?;
                    if fields.insert(key.clone(), val).is_some() {
                        return Err(Error::Decoding(format!("duplicate tuple key {key}")));
                    }
                }
                ClarityValue::Tuple(fields)
            }
            prefix::STRING_ASCII => {
                let len = self.u32()? as usize;
                let bytes = self.take(len)?;
                if !bytes.is_ascii() {
                    return Err(Error::Decoding("string-ascii holds non-ascii bytes".into()));
                }
                ClarityValue::StringAscii(String::from_utf8_lossy(bytes).into_owned())
            }
            prefix::STRING_UTF8 => {
                let len = self.u32()? as usize;
                let s = std::str::from_utf8(self.take(len)?)
                    .map_err(|_| Error::Decoding("string-utf8 is not valid utf-8".into()))?;
                ClarityValue::StringUtf8(s.to_string())
            }
            other => return Err(Error::Decoding(format!("unknown clarity type prefix {other:#04x}"))),
        };
        Ok(v)
    }
}

impl ClarityValue {
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let mut r = Reader::new(bytes);
        let v = r.value(0)?;
        r.finish()?;
        Ok(v)
    }

    /// Accepts the node's `0x…` hex rendering.
    pub fn from_hex(s: &str) -> Result<Self> {
        Self::deserialize(&crate::util::hex_to_bytes(s)?)
    }
}

impl StacksTransaction {
    /// Only standard single-sig contract calls without post-conditions are understood.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let mut r = Reader::new(bytes);
        let version = TransactionVersion::from_byte(r.u8()?)?;
        let chain_id = r.u32()?;

        let auth_type = r.u8()?;
        if auth_type != AUTH_STANDARD {
            return Err(Error::Decoding(format!("unsupported auth type {auth_type:#04x}")));
        }
        let hash_mode = r.u8()?;
        if hash_mode != HASH_MODE_P2PKH {
            return Err(Error::Decoding(format!("unsupported hash mode {hash_mode:#04x}")));
        }
        let auth = SinglesigSpendingCondition {
            signer: r.array()?,
            nonce: r.u64()?,
            tx_fee: r.u64()?,
            key_encoding: PubkeyEncoding::from_byte(r.u8()?)?,
            signature: MessageSignature(r.array()?),
        };

        let anchor_mode = AnchorMode::from_byte(r.u8()?)?;
        let post_condition_mode = PostConditionMode::from_byte(r.u8()?)?;
        let n_post_conditions = r.u32()?;
        if n_post_conditions != 0 {
            return Err(Error::Decoding("post-condition lists are not supported".into()));
        }

        let payload_type = r.u8()?;
        if payload_type != PAYLOAD_CONTRACT_CALL {
            return Err(Error::Decoding(format!("not a contract call (payload {payload_type:#04x})")));
        }
        let address = r.address()?;
        let name = ContractName::new(r.short_str()?)?;
        let function_name = ClarityName::new(r.short_str()?)?;
        let argc = r.u32()?;
        let mut function_args = Vec::new();
        for _ in 0..argc {
            function_args.push(r.value(0)?);
        }
        r.finish()?;

        Ok(Self {
            version,
            chain_id,
            auth,
            anchor_mode,
            post_condition_mode,
            payload: ContractCallPayload { contract: ContractIdentifier { address, name }, function_name, function_args },
        })
    }
}

/// Decode a raw signed transaction and describe it, including whether the signature checks out.
pub fn build_decoded(raw_hex: &str) -> Result<DecodedTxOut> {
    let bytes = crate::util::hex_to_bytes(raw_hex)?;
    let tx = StacksTransaction::deserialize(&bytes)?;
    Ok(DecodedTxOut {
        txid: crate::util::bytes_to_0x(&crate::util::sha512_256(&bytes)),
        version: tx.version,
        chain_id: format!("{:#010x}", tx.chain_id),
        sender: tx.sender()?.to_string(),
        nonce: tx.auth.nonce,
        fee: tx.auth.tx_fee,
        key_encoding: tx.auth.key_encoding,
        signature_valid: verify_transaction(&tx)?,
        anchor_mode: tx.anchor_mode,
        post_condition_mode: tx.post_condition_mode,
        contract: tx.payload.contract.to_string(),
        function_name: tx.payload.function_name.to_string(),
        function_args: tx.payload.function_args.iter().map(ToString::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{some_cv, standard_principal_cv, string_ascii_cv, uint_cv};

    const USER: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";

    #[test]
    fn get_owner_result_decodes() {
        let owner = standard_principal_cv(USER).unwrap();
        let hex = ClarityValue::ResponseOk(Box::new(some_cv(owner.clone()))).to_hex().unwrap();
        let decoded = ClarityValue::from_hex(&hex).unwrap();
        assert_eq!(decoded.to_string(), format!("(ok (some {USER}))"));
    }

    #[test]
    fn uint_from_node_hex() {
        // (ok u0) as returned by a get-balance call
        let v = ClarityValue::from_hex("0x070100000000000000000000000000000000").unwrap();
        assert_eq!(v, ClarityValue::ResponseOk(Box::new(uint_cv(0))));
    }

    #[test]
    fn tuple_and_list_decode() {
        let mut fields = BTreeMap::new();
        fields.insert(ClarityName::new("name").unwrap(), string_ascii_cv("nft").unwrap());
        fields.insert(ClarityName::new("ids").unwrap(), ClarityValue::List(vec![uint_cv(1), uint_cv(5)]));
        let cv = ClarityValue::Tuple(fields);
        let back = ClarityValue::deserialize(&cv.serialize().unwrap()).unwrap();
        assert_eq!(back, cv);
        assert_eq!(back.to_string(), "(tuple (ids (list u1 u5)) (name \"nft\"))");
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(ClarityValue::deserialize(&[]).is_err());
        assert!(ClarityValue::deserialize(&[0x01, 0x00]).is_err());
        assert!(ClarityValue::deserialize(&[0x03, 0x03]).is_err());
        assert!(ClarityValue::deserialize(&[0x42]).is_err());
        // a list claiming more elements than present
        assert!(ClarityValue::deserialize(&[0x0b, 0, 0, 0, 9, 0x03]).is_err());
    }

    #[test]
    fn excessive_nesting_is_rejected() {
        let mut bytes = vec![prefix::OPTIONAL_SOME; MAX_DEPTH + 2];
        bytes.push(prefix::TRUE);
        assert!(ClarityValue::deserialize(&bytes).is_err());
    }
}
