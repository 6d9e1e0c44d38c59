use anchor_lang::prelude::*;

/// Event emitted when the global vault is initialized
#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub authority: Pubkey,
    pub protocol_fee_bps: u16,
    pub max_slippage_bps: u16,
    pub timestamp: i64,
}

/// Event emitted when the vault fee or slippage parameters change
#[event]
pub struct VaultParamsUpdated {
    pub vault: Pubkey,
    pub protocol_fee_bps: u16,
    pub max_slippage_bps: u16,
    pub timestamp: i64,
}

/// Event emitted when a yield source is created
#[event]
pub struct YieldSourceCreated {
    pub yield_source: Pubkey,
    pub base_mint: Pubkey,
    pub yield_mint: Pubkey,
    pub keeper: Pubkey,
    pub price_p32: u64,
    pub timestamp: i64,
}

/// Event emitted when a keeper pushes a new derivative-token price
#[event]
pub struct YieldPriceUpdated {
    pub yield_source: Pubkey,
    pub price_p32: u64,
    pub timestamp: i64,
}

/// Event emitted when an oracle rate is pushed for a token pair
#[event]
pub struct OracleRateUpdated {
    pub oracle: Pubkey,
    pub token_in: Pubkey,
    pub token_out: Pubkey,
    pub rate_p32: u64,
    pub timestamp: i64,
}

/// Event emitted when a strategy is created
#[event]
pub struct StrategyCreated {
    pub strategy: Pubkey,
    pub base_mint: Pubkey,
    pub yield_source: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when an account deposits an asset into the vault
#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
    pub balance: u64,
    pub timestamp: i64,
}

/// Event emitted when an account withdraws an asset from the vault
#[event]
pub struct Withdrawn {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
    pub balance: u64,
    pub timestamp: i64,
}

/// Event emitted when an account joins a strategy
#[event]
pub struct Joined {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub strategy: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
    pub shares_minted: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when an account exits a strategy
#[event]
pub struct Exited {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub strategy: Pubkey,
    pub mint: Pubkey,
    pub shares_burned: u64,
    pub amount_out: u64,
    pub fee: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when a strategy's idle balance is swept into its yield source
#[event]
pub struct IdleInvested {
    pub strategy: Pubkey,
    pub token: Pubkey,
    pub amount_swept: u64,
    pub base_invested: u64,
    pub timestamp: i64,
}
