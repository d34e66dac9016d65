use anyhow::Result;
use clap::Args;

use crate::address::{MAINNET_SINGLESIG, TESTNET_SINGLESIG};
use crate::key::StacksPrivateKey;
use crate::types::KeyRecord;

pub const MAX_KEYS: u32 = 1000;

#[derive(Args, Debug, Clone)]
pub struct KeygenArgs {
    /// Number of keypairs to generate
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(0..=MAX_KEYS as i64))]
    pub count: u32,
}

pub fn generate(count: u32) -> Result<Vec<KeyRecord>> {
    let mut out: Vec<KeyRecord> = Vec::new();

    for _ in 0..count {
        let key = StacksPrivateKey::generate();

        out.push(KeyRecord {
            privateKeyHex: key.to_hex(),
            publicKeyHex: hex::encode(key.public_key_bytes()),
            testnetAddress: key.address(TESTNET_SINGLESIG)?.to_string(),
            mainnetAddress: key.address(MAINNET_SINGLESIG)?.to_string(),
        });
    }

    Ok(out)
}

/// Pretty JSON for stdout; keys are never written to disk.
pub fn emit(records: &[KeyRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn run(args: &KeygenArgs) -> Result<String> {
    let records = generate(args.count)?;
    emit(&records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    #[test]
    fn generated_keys_round_trip_to_their_addresses() {
        let records = generate(3).unwrap();
        assert_eq!(records.len(), 3);
        for r in &records {
            assert!(r.testnetAddress.starts_with("ST"));
            assert!(r.mainnetAddress.starts_with("SP"));
            assert_eq!(r.publicKeyHex.len(), 66);

            let key = StacksPrivateKey::from_hex(&r.privateKeyHex).unwrap();
            assert_eq!(key.address(TESTNET_SINGLESIG).unwrap().to_string(), r.testnetAddress);
        }
    }

    #[test]
    fn zero_count_yields_empty_array() {
        let records = generate(0).unwrap();
        assert_eq!(emit(&records).unwrap(), "[]");
    }

    #[test]
    fn count_is_bounded() {
        assert!(Cli::try_parse_from(["subnet-scripts", "keygen", "--count", "4000000000"]).is_err());
        let cli = Cli::try_parse_from(["subnet-scripts", "keygen", "--count", "1000"]).unwrap();
        match cli.cmd {
            Command::Keygen(args) => assert_eq!(args.count, MAX_KEYS),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn there_is_no_output_file_option() {
        assert!(Cli::try_parse_from(["subnet-scripts", "keygen", "--out", "keys.json"]).is_err());
    }
}
