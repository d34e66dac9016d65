//! NFT scripts: register the L1 contract with the subnet, deposit, withdraw on L2, check ownership.

use anyhow::Result;
use clap::Args;

use super::{contract_call, query, read_only_call, submit, Layer, ScriptContext};
use crate::cli::parse_nonce_arg;
use crate::defaults::Defaults;
use crate::encoding::{contract_principal_cv, standard_principal_cv, string_ascii_cv, uint_cv, ContractIdentifier};
use crate::types::{ContractCallRequest, PostConditionMode, ReadOnlyCallRequest};

#[derive(Args, Debug, Clone)]
pub struct RegisterNftArgs {
    /// Key of the subnet miner allowed to register assets
    #[arg(long, env = "AUTH_SUBNET_MINER_KEY", hide_env_values = true)]
    pub sender_key: String,

    /// Address that deployed the NFT contract on L1
    #[arg(long, env = "USER_ADDR")]
    pub user_addr: String,

    /// NFT contract name on L1
    #[arg(long, default_value = Defaults::NFT_CONTRACT_L1)]
    pub nft_contract: String,

    /// Asset name the subnet mints deposits under
    #[arg(long, default_value = Defaults::NFT_DEPOSIT_TOKEN_NAME)]
    pub token_name: String,

    /// Transaction nonce (fetched from the node when omitted)
    #[arg(value_parser = parse_nonce_arg)]
    pub nonce: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct DepositNftArgs {
    #[arg(long, env = "USER_KEY", hide_env_values = true)]
    pub sender_key: String,

    /// Depositor; also the deployer of the NFT contract
    #[arg(long, env = "USER_ADDR")]
    pub user_addr: String,

    #[arg(long, default_value = Defaults::NFT_CONTRACT_L1)]
    pub nft_contract: String,

    #[arg(long, default_value_t = Defaults::ASSET_ID)]
    pub asset_id: u128,

    #[arg(value_parser = parse_nonce_arg)]
    pub nonce: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct WithdrawNftL2Args {
    #[arg(long, env = "ALT_USER_KEY", hide_env_values = true)]
    pub sender_key: String,

    /// Deployer of the NFT contract on the subnet
    #[arg(long, env = "USER_ADDR")]
    pub contract_addr: String,

    /// Who receives the withdrawn asset
    #[arg(long, env = "ALT_USER_ADDR")]
    pub recipient: String,

    #[arg(long, default_value = Defaults::NFT_CONTRACT_L2)]
    pub nft_contract: String,

    #[arg(long, default_value_t = Defaults::ASSET_ID)]
    pub asset_id: u128,

    #[arg(value_parser = parse_nonce_arg)]
    pub nonce: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// Caller address for the read-only call (never signs anything)
    #[arg(long, env = "ALT_USER_ADDR")]
    pub sender: String,

    #[arg(long, env = "USER_ADDR")]
    pub contract_addr: String,

    #[arg(long, default_value = Defaults::NFT_CONTRACT_L1)]
    pub nft_contract: String,

    #[arg(long, default_value_t = Defaults::ASSET_ID)]
    pub asset_id: u128,

    #[arg(long, value_enum, default_value_t = Layer::L1)]
    pub layer: Layer,
}

pub fn register_request(ctx: &ScriptContext<'_>, args: &RegisterNftArgs) -> Result<ContractCallRequest> {
    Ok(contract_call(
        ctx.subnet_contract.clone(),
        "register-new-nft-contract",
        vec![
            contract_principal_cv(&args.user_addr, &args.nft_contract)?,
            string_ascii_cv(&args.token_name)?,
        ],
        ctx.fee,
        args.nonce,
        PostConditionMode::Deny,
    )?)
}

pub fn deposit_request(ctx: &ScriptContext<'_>, args: &DepositNftArgs) -> Result<ContractCallRequest> {
    Ok(contract_call(
        ctx.subnet_contract.clone(),
        "deposit-nft-asset",
        vec![
            contract_principal_cv(&args.user_addr, &args.nft_contract)?,
            uint_cv(args.asset_id),
            standard_principal_cv(&args.user_addr)?,
        ],
        ctx.fee,
        args.nonce,
        PostConditionMode::Allow,
    )?)
}

pub fn withdraw_l2_request(ctx: &ScriptContext<'_>, args: &WithdrawNftL2Args) -> Result<ContractCallRequest> {
    Ok(contract_call(
        Defaults::L2_SUBNET_CONTRACT.parse()?,
        "nft-withdraw?",
        vec![
            contract_principal_cv(&args.contract_addr, &args.nft_contract)?,
            uint_cv(args.asset_id),
            standard_principal_cv(&args.recipient)?,
        ],
        ctx.fee,
        args.nonce,
        PostConditionMode::Allow,
    )?)
}

pub fn verify_request(args: &VerifyArgs) -> Result<ReadOnlyCallRequest> {
    Ok(read_only_call(
        ContractIdentifier::parse_parts(&args.contract_addr, &args.nft_contract)?,
        "get-owner",
        vec![uint_cv(args.asset_id)],
        &args.sender,
    )?)
}

pub async fn register(ctx: &ScriptContext<'_>, args: &RegisterNftArgs) -> Result<String> {
    let req = register_request(ctx, args)?;
    submit(ctx, Layer::L1, &args.sender_key, &req).await
}

pub async fn deposit(ctx: &ScriptContext<'_>, args: &DepositNftArgs) -> Result<String> {
    let req = deposit_request(ctx, args)?;
    submit(ctx, Layer::L1, &args.sender_key, &req).await
}

pub async fn withdraw_l2(ctx: &ScriptContext<'_>, args: &WithdrawNftL2Args) -> Result<String> {
    let req = withdraw_l2_request(ctx, args)?;
    submit(ctx, Layer::L2, &args.sender_key, &req).await
}

pub async fn verify(ctx: &ScriptContext<'_>, args: &VerifyArgs) -> Result<String> {
    let call = verify_request(args)?;
    query(ctx, args.layer, &call).await
}
