use clap::{Parser, Subcommand};

use crate::commands::{account, decode, ft, keygen, nft, stx};
use crate::defaults::Defaults;
use crate::util::{parse_nonce, parse_u32_any};

/// Subnet asset scripts: move NFTs, FTs and STX between a Stacks chain and its subnet
#[derive(Parser, Debug)]
#[command(name = "subnet-scripts", version, about = "Subnet asset scripts")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,

    /// Layer-1 node RPC endpoint
    #[arg(long, global = true, env = "L1_URL", default_value = Defaults::L1_URL)]
    pub l1_url: String,

    /// Subnet node RPC endpoint
    #[arg(long, global = true, env = "SUBNET_URL", default_value = Defaults::SUBNET_URL)]
    pub subnet_url: String,

    /// Subnet contract deployed on layer 1
    #[arg(long, global = true, env = "SUBNET_CONTRACT", default_value = Defaults::SUBNET_CONTRACT)]
    pub subnet_contract: String,

    /// Chain id signed into layer-1 transactions (hex or decimal)
    #[arg(long, global = true, env = "L1_CHAIN_ID", default_value = Defaults::L1_CHAIN_ID, value_parser = parse_chain_id_arg)]
    pub l1_chain_id: u32,

    /// Chain id signed into subnet transactions (hex or decimal)
    #[arg(long, global = true, env = "SUBNET_CHAIN_ID", default_value = Defaults::SUBNET_CHAIN_ID, value_parser = parse_chain_id_arg)]
    pub subnet_chain_id: u32,

    /// Transaction fee in µSTX
    #[arg(long, global = true, default_value_t = Defaults::FEE)]
    pub fee: u64,

    /// HTTP timeout per request, in seconds
    #[arg(long, global = true, default_value_t = Defaults::TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Print the signed transaction hex instead of broadcasting it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register the L1 NFT contract with the subnet (miner key)
    RegisterNft(nft::RegisterNftArgs),

    /// Deposit an NFT from L1 into the subnet
    DepositNft(nft::DepositNftArgs),

    /// Withdraw an NFT on the subnet to a recipient
    WithdrawNftL2(nft::WithdrawNftL2Args),

    /// Read-only get-owner query for an NFT
    Verify(nft::VerifyArgs),

    /// Register an L1/L2 fungible-token contract pair with the subnet (miner key)
    RegisterFt(ft::RegisterFtArgs),

    /// Deposit fungible tokens from L1 into the subnet
    DepositFt(ft::DepositFtArgs),

    /// Withdraw fungible tokens on the subnet
    WithdrawFtL2(ft::WithdrawFtL2Args),

    /// Read-only get-balance query for a fungible token
    FtBalance(ft::FtBalanceArgs),

    /// Deposit STX from L1 into the subnet
    DepositStx(stx::DepositStxArgs),

    /// Withdraw STX on the subnet
    WithdrawStxL2(stx::WithdrawStxL2Args),

    /// Print the next nonce of an account
    Nonce(account::NonceArgs),

    /// Generate Stacks keys (hex forms, testnet and mainnet addresses)
    Keygen(keygen::KeygenArgs),

    /// Decode a signed contract-call transaction
    Decode(decode::DecodeArgs),
}

pub fn parse_nonce_arg(s: &str) -> Result<u64, String> {
    parse_nonce(s).map_err(|e| e.to_string())
}

fn parse_chain_id_arg(s: &str) -> Result<u32, String> {
    parse_u32_any(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Layer;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("subnet-scripts").chain(args.iter().copied()))
    }

    #[test]
    fn nonce_is_optional_positional() {
        let cli = parse(&["deposit-nft", "--sender-key", "aa", "--user-addr", "ST000000000000000000002AMW42H", "7"]).unwrap();
        match cli.cmd {
            Command::DepositNft(a) => assert_eq!(a.nonce, Some(7)),
            other => panic!("unexpected {other:?}"),
        }

        let cli = parse(&["deposit-nft", "--sender-key", "aa", "--user-addr", "ST000000000000000000002AMW42H"]).unwrap();
        match cli.cmd {
            Command::DepositNft(a) => assert_eq!(a.nonce, None),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_integer_nonce_is_a_usage_error() {
        let err = parse(&["deposit-nft", "--sender-key", "aa", "--user-addr", "ST000000000000000000002AMW42H", "abc"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn chain_ids_accept_hex_and_decimal() {
        let cli = parse(&["--l1-chain-id", "0x80000000", "--subnet-chain-id", "1", "keygen"]).unwrap();
        assert_eq!(cli.l1_chain_id, 0x8000_0000);
        assert_eq!(cli.subnet_chain_id, 1);
    }

    #[test]
    fn verify_defaults_to_layer_one() {
        let cli = parse(&["verify", "--sender", "ST000000000000000000002AMW42H", "--contract-addr", "ST000000000000000000002AMW42H"]).unwrap();
        match cli.cmd {
            Command::Verify(a) => {
                assert_eq!(a.layer, Layer::L1);
                assert_eq!(a.asset_id, 5);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
