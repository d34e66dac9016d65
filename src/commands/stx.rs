use anyhow::Result;
use clap::Args;

use super::{contract_call, submit, Layer, ScriptContext};
use crate::cli::parse_nonce_arg;
use crate::defaults::Defaults;
use crate::encoding::{standard_principal_cv, uint_cv};
use crate::types::{ContractCallRequest, PostConditionMode};

#[derive(Args, Debug, Clone)]
pub struct DepositStxArgs {
    #[arg(long, env = "USER_KEY", hide_env_values = true)]
    pub sender_key: String,

    #[arg(long, env = "USER_ADDR")]
    pub user_addr: String,

    /// Amount in µSTX
    #[arg(long, default_value_t = Defaults::AMOUNT)]
    pub amount: u128,

    #[arg(value_parser = parse_nonce_arg)]
    pub nonce: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct WithdrawStxL2Args {
    #[arg(long, env = "ALT_USER_KEY", hide_env_values = true)]
    pub sender_key: String,

    #[arg(long, env = "ALT_USER_ADDR")]
    pub recipient: String,

    /// Amount in µSTX
    #[arg(long, default_value_t = Defaults::AMOUNT)]
    pub amount: u128,

    #[arg(value_parser = parse_nonce_arg)]
    pub nonce: Option<u64>,
}

pub fn deposit_request(ctx: &ScriptContext<'_>, args: &DepositStxArgs) -> Result<ContractCallRequest> {
    Ok(contract_call(
        ctx.subnet_contract.clone(),
        "deposit-stx",
        vec![uint_cv(args.amount), standard_principal_cv(&args.user_addr)?],
        ctx.fee,
        args.nonce,
        PostConditionMode::Allow,
    )?)
}

pub fn withdraw_l2_request(ctx: &ScriptContext<'_>, args: &WithdrawStxL2Args) -> Result<ContractCallRequest> {
    Ok(contract_call(
        Defaults::L2_SUBNET_CONTRACT.parse()?,
        "stx-withdraw?",
        vec![uint_cv(args.amount), standard_principal_cv(&args.recipient)?],
        ctx.fee,
        args.nonce,
        PostConditionMode::Allow,
    )?)
}

pub async fn deposit(ctx: &ScriptContext<'_>, args: &DepositStxArgs) -> Result<String> {
    let req = deposit_request(ctx, args)?;
    submit(ctx, Layer::L1, &args.sender_key, &req).await
}

pub async fn withdraw_l2(ctx: &ScriptContext<'_>, args: &WithdrawStxL2Args) -> Result<String> {
    let req = withdraw_l2_request(ctx, args)?;
    submit(ctx, Layer::L2, &args.sender_key, &req).await
}
