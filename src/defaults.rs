//! Central place for the scripts' default values.
//! Update these and every subcommand picks them up.

pub struct Defaults;

impl Defaults {
    /* Endpoints */
    pub const L1_URL: &'static str = "http://localhost:3999";
    pub const SUBNET_URL: &'static str = "http://localhost:30443";
    pub const TIMEOUT_SECS: u64 = 30;

    /* Chain parameters (testnet transaction version on both layers) */
    pub const L1_CHAIN_ID: &'static str = "0x80000000";
    pub const SUBNET_CHAIN_ID: &'static str = "0x80000000";

    /* Contracts */
    pub const SUBNET_CONTRACT: &'static str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM.subnet";
    pub const L2_SUBNET_CONTRACT: &'static str = "ST000000000000000000002AMW42H.subnet";
    pub const NFT_CONTRACT_L1: &'static str = "simple-nft-l1";
    pub const NFT_CONTRACT_L2: &'static str = "simple-nft-l2";
    pub const FT_CONTRACT_L1: &'static str = "simple-ft-l1";
    pub const FT_CONTRACT_L2: &'static str = "simple-ft-l2";
    pub const NFT_DEPOSIT_TOKEN_NAME: &'static str = "subnet-deposit-nft-token";

    /* Transaction defaults */
    pub const FEE: u64 = 10_000; // µSTX
    pub const ASSET_ID: u128 = 5;
    pub const AMOUNT: u128 = 1;
}
