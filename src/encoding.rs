//! Clarity values and their consensus serialization.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::address::StacksAddress;
use crate::error::{Error, Result};

pub const CONTRACT_NAME_MAX_LEN: usize = 40;
pub const CLARITY_NAME_MAX_LEN: usize = 128;

pub(crate) mod prefix {
    pub const INT: u8 = 0x00;
    pub const UINT: u8 = 0x01;
    pub const BUFFER: u8 = 0x02;
    pub const TRUE: u8 = 0x03;
    pub const FALSE: u8 = 0x04;
    pub const PRINCIPAL_STANDARD: u8 = 0x05;
    pub const PRINCIPAL_CONTRACT: u8 = 0x06;
    pub const RESPONSE_OK: u8 = 0x07;
    pub const RESPONSE_ERR: u8 = 0x08;
    pub const OPTIONAL_NONE: u8 = 0x09;
    pub const OPTIONAL_SOME: u8 = 0x0a;
    pub const LIST: u8 = 0x0b;
    pub const TUPLE: u8 = 0x0c;
    pub const STRING_ASCII: u8 = 0x0d;
    pub const STRING_UTF8: u8 = 0x0e;
}

/// Contract name: a letter, then letters, digits, `-` or `_`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContractName(String);

impl ContractName {
    pub fn new(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let ok = s.len() <= CONTRACT_NAME_MAX_LEN
            && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if ok {
            Ok(Self(s.to_string()))
        } else {
            Err(Error::InvalidContractName(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Function / tuple-key name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClarityName(String);

impl ClarityName {
    pub fn new(s: &str) -> Result<Self> {
        let operator = matches!(s, "-" | "+" | "=" | "/" | "*" | "<" | ">" | "<=" | ">=");
        let mut chars = s.chars();
        let identifier = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || "-_!?+<>=/*".contains(c));
        if s.len() <= CLARITY_NAME_MAX_LEN && (operator || identifier) {
            Ok(Self(s.to_string()))
        } else {
            Err(Error::InvalidFunctionName(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! name_traits {
    ($t:ty) => {
        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
        impl fmt::Debug for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:?}", self.0)
            }
        }
        impl FromStr for $t {
            type Err = Error;
            fn from_str(s: &str) -> Result<Self> {
                Self::new(s)
            }
        }
    };
}
name_traits!(ContractName);
name_traits!(ClarityName);

/// `ADDRESS.contract-name`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContractIdentifier {
    pub address: StacksAddress,
    pub name: ContractName,
}

impl ContractIdentifier {
    pub fn new(address: StacksAddress, name: &str) -> Result<Self> {
        Ok(Self { address, name: ContractName::new(name)? })
    }

    /// Like [`ContractIdentifier::new`] but with the address still in text form.
    pub fn parse_parts(address: &str, name: &str) -> Result<Self> {
        Self::new(address.parse()?, name)
    }
}

impl fmt::Display for ContractIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.address, self.name)
    }
}

impl FromStr for ContractIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (addr, name) = s
            .trim()
            .split_once('.')
            .ok_or_else(|| Error::InvalidAddress(s.to_string(), "contract identifier must be ADDRESS.name"))?;
        Self::parse_parts(addr, name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClarityValue {
    Int(i128),
    UInt(u128),
    Bool(bool),
    Buffer(Vec<u8>),
    StandardPrincipal(StacksAddress),
    ContractPrincipal(ContractIdentifier),
    OptionalNone,
    OptionalSome(Box<ClarityValue>),
    ResponseOk(Box<ClarityValue>),
    ResponseErr(Box<ClarityValue>),
    List(Vec<ClarityValue>),
    Tuple(BTreeMap<ClarityName, ClarityValue>),
    StringAscii(String),
    StringUtf8(String),
}

pub fn uint_cv(v: u128) -> ClarityValue {
    ClarityValue::UInt(v)
}

pub fn standard_principal_cv(addr: &str) -> Result<ClarityValue> {
    Ok(ClarityValue::StandardPrincipal(addr.parse()?))
}

pub fn contract_principal_cv(addr: &str, name: &str) -> Result<ClarityValue> {
    Ok(ClarityValue::ContractPrincipal(ContractIdentifier::parse_parts(addr, name)?))
}

/// Only printable ASCII plus `\t`, `\n`, `\r` is allowed in `string-ascii`.
pub fn string_ascii_cv(s: &str) -> Result<ClarityValue> {
    let ok = s
        .bytes()
        .all(|b| (0x20..=0x7e).contains(&b) || matches!(b, b'\t' | b'\n' | b'\r'));
    if ok {
        Ok(ClarityValue::StringAscii(s.to_string()))
    } else {
        Err(Error::InvalidAsciiString(s.to_string()))
    }
}

pub fn none_cv() -> ClarityValue {
    ClarityValue::OptionalNone
}

pub fn some_cv(v: ClarityValue) -> ClarityValue {
    ClarityValue::OptionalSome(Box::new(v))
}

fn write_len_prefixed_u32(out: &mut Vec<u8>, len: usize) -> Result<()> {
    let n = u32::try_from(len).map_err(|_| Error::Encoding(format!("length {len} does not fit in u32")))?;
    out.extend_from_slice(&n.to_be_bytes());
    Ok(())
}

pub(crate) fn write_address(out: &mut Vec<u8>, addr: &StacksAddress) {
    out.push(addr.version());
    out.extend_from_slice(addr.hash160());
}

/// One-byte length prefix; both name types are already bounded well below 256.
pub(crate) fn write_short_name(out: &mut Vec<u8>, name: &str) {
    out.push(name.len() as u8);
    out.extend_from_slice(name.as_bytes());
}

impl ClarityValue {
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.serialize_into(&mut out)?;
        Ok(out)
    }

    pub fn serialize_into(&self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            ClarityValue::Int(v) => {
                out.push(prefix::INT);
                out.extend_from_slice(&v.to_be_bytes());
            }
            ClarityValue::UInt(v) => {
                out.push(prefix::UINT);
                out.extend_from_slice(&v.to_be_bytes());
            }
            ClarityValue::Bool(true) => out.push(prefix::TRUE),
            ClarityValue::Bool(false) => out.push(prefix::FALSE),
            ClarityValue::Buffer(b) => {
                out.push(prefix::BUFFER);
                write_len_prefixed_u32(out, b.len())?;
                out.extend_from_slice(b);
            }
            ClarityValue::StandardPrincipal(addr) => {
                out.push(prefix::PRINCIPAL_STANDARD);
                write_address(out, addr);
            }
            ClarityValue::ContractPrincipal(id) => {
                out.push(prefix::PRINCIPAL_CONTRACT);
                write_address(out, &id.address);
                write_short_name(out, id.name.as_str());
            }
            ClarityValue::OptionalNone => out.push(prefix::OPTIONAL_NONE),
            ClarityValue::OptionalSome(v) => {
                out.push(prefix::OPTIONAL_SOME);
                v.serialize_into(out)?;
            }
            ClarityValue::ResponseOk(v) => {
                out.push(prefix::RESPONSE_OK);
                v.serialize_into(out)?;
            }
            ClarityValue::ResponseErr(v) => {
                out.push(prefix::RESPONSE_ERR);
                v.serialize_into(out)?;
            }
            ClarityValue::List(items) => {
                out.push(prefix::LIST);
                write_len_prefixed_u32(out, items.len())?;
                for item in items {
                    item.serialize_into(out)?;
                }
            }
            ClarityValue::Tuple(fields) => {
                out.push(prefix::TUPLE);
                write_len_prefixed_u32(out, fields.len())?;
                for (k, v) in fields {
                    write_short_name(out, k.as_str());
                    v.serialize_into(out)?;
                }
            }
            ClarityValue::StringAscii(s) => {
                out.push(prefix::STRING_ASCII);
                write_len_prefixed_u32(out, s.len())?;
                out.extend_from_slice(s.as_bytes());
            }
            ClarityValue::StringUtf8(s) => {
                out.push(prefix::STRING_UTF8);
                write_len_prefixed_u32(out, s.len())?;
                out.extend_from_slice(s.as_bytes());
            }
        }
        Ok(())
    }

    /// `0x`-prefixed hex, the form the node's read-only endpoint expects.
    pub fn to_hex(&self) -> Result<String> {
        Ok(crate::util::bytes_to_0x(&self.serialize()?))
    }

    /// Short type tag, used to compare argument lists against function signatures.
    pub fn type_name(&self) -> &'static str {
        match self {
            ClarityValue::Int(_) => "int",
            ClarityValue::UInt(_) => "uint",
            ClarityValue::Bool(_) => "bool",
            ClarityValue::Buffer(_) => "buff",
            ClarityValue::StandardPrincipal(_) | ClarityValue::ContractPrincipal(_) => "principal",
            ClarityValue::OptionalNone | ClarityValue::OptionalSome(_) => "optional",
            ClarityValue::ResponseOk(_) | ClarityValue::ResponseErr(_) => "response",
            ClarityValue::List(_) => "list",
            ClarityValue::Tuple(_) => "tuple",
            ClarityValue::StringAscii(_) => "string-ascii",
            ClarityValue::StringUtf8(_) => "string-utf8",
        }
    }
}

/// Clarity source notation: `u5`, `(some ST…)`, `(ok true)`, `"text"`.
impl fmt::Display for ClarityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClarityValue::Int(v) => write!(f, "{v}"),
            ClarityValue::UInt(v) => write!(f, "u{v}"),
            ClarityValue::Bool(b) => write!(f, "{b}"),
            ClarityValue::Buffer(b) => write!(f, "0x{}", hex::encode(b)),
            ClarityValue::StandardPrincipal(a) => write!(f, "{a}"),
            ClarityValue::ContractPrincipal(id) => write!(f, "{id}"),
            ClarityValue::OptionalNone => f.write_str("none"),
            ClarityValue::OptionalSome(v) => write!(f, "(some {v})"),
            ClarityValue::ResponseOk(v) => write!(f, "(ok {v})"),
            ClarityValue::ResponseErr(v) => write!(f, "(err {v})"),
            ClarityValue::List(items) => {
                f.write_str("(list")?;
                for item in items {
                    write!(f, " {item}")?;
                }
                f.write_str(")")
            }
            ClarityValue::Tuple(fields) => {
                f.write_str("(tuple")?;
                for (k, v) in fields {
                    write!(f, " ({k} {v})")?;
                }
                f.write_str(")")
            }
            ClarityValue::StringAscii(s) => write!(f, "\"{s}\""),
            ClarityValue::StringUtf8(s) => write!(f, "u\"{s}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";

    #[test]
    fn uint_is_sixteen_big_endian_bytes() {
        let bytes = uint_cv(5).serialize().unwrap();
        assert_eq!(bytes.len(), 17);
        assert_eq!(bytes[0], 0x01);
        assert_eq!(bytes[16], 5);
        assert!(bytes[1..16].iter().all(|b| *b == 0));
    }

    #[test]
    fn contract_principal_layout() {
        let cv = contract_principal_cv(USER, "simple-nft-l1").unwrap();
        let bytes = cv.serialize().unwrap();
        assert_eq!(bytes[0], 0x06);
        assert_eq!(bytes[1], crate::address::TESTNET_SINGLESIG);
        assert_eq!(bytes[22] as usize, "simple-nft-l1".len());
        assert_eq!(&bytes[23..], b"simple-nft-l1");
        assert_eq!(cv.to_string(), format!("{USER}.simple-nft-l1"));
    }

    #[test]
    fn string_ascii_layout_and_validation() {
        let bytes = string_ascii_cv("subnet-deposit-nft-token").unwrap().serialize().unwrap();
        assert_eq!(bytes[0], 0x0d);
        assert_eq!(&bytes[1..5], &24u32.to_be_bytes());
        assert_eq!(&bytes[5..], b"subnet-deposit-nft-token");
        assert!(matches!(string_ascii_cv("caf\u{e9}"), Err(Error::InvalidAsciiString(_))));
        assert!(string_ascii_cv("bell\x07").is_err());
    }

    #[test]
    fn names_are_validated() {
        assert!(ContractName::new("simple-nft-l1").is_ok());
        assert!(ContractName::new("subnet_alpha").is_ok());
        assert!(ContractName::new("1subnet").is_err());
        assert!(ContractName::new("bad.name").is_err());
        assert!(ContractName::new(&"a".repeat(41)).is_err());

        assert!(ClarityName::new("nft-withdraw?").is_ok());
        assert!(ClarityName::new("deposit-nft-asset").is_ok());
        assert!(ClarityName::new("<=").is_ok());
        assert!(ClarityName::new("").is_err());
        assert!(ClarityName::new("has space").is_err());
    }

    #[test]
    fn contract_identifier_parses() {
        let id: ContractIdentifier = "ST000000000000000000002AMW42H.subnet".parse().unwrap();
        assert_eq!(id.name.as_str(), "subnet");
        assert_eq!(id.to_string(), "ST000000000000000000002AMW42H.subnet");
        assert!("ST000000000000000000002AMW42H".parse::<ContractIdentifier>().is_err());
    }

    #[test]
    fn tuple_keys_serialize_sorted() {
        let mut fields = BTreeMap::new();
        fields.insert(ClarityName::new("b").unwrap(), uint_cv(2));
        fields.insert(ClarityName::new("a").unwrap(), ClarityValue::Bool(true));
        let cv = ClarityValue::Tuple(fields);
        let bytes = cv.serialize().unwrap();
        assert_eq!(&bytes[..7], &[0x0c, 0, 0, 0, 2, 1, b'a']);
        assert_eq!(cv.to_string(), "(tuple (a true) (b u2))");
    }

    #[test]
    fn notation_of_nested_values() {
        let owner = standard_principal_cv(USER).unwrap();
        let cv = ClarityValue::ResponseOk(Box::new(some_cv(owner)));
        assert_eq!(cv.to_string(), format!("(ok (some {USER}))"));
        assert_eq!(none_cv().to_string(), "none");
        assert_eq!(ClarityValue::Int(-3).to_string(), "-3");
        assert_eq!(ClarityValue::Buffer(vec![0xde, 0xad]).to_string(), "0xdead");
        assert_eq!(
            ClarityValue::List(vec![uint_cv(1), uint_cv(2)]).to_string(),
            "(list u1 u2)"
        );
    }
}
