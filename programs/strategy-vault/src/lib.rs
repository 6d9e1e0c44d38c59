// Strategy Vault - custodial vault routing pooled deposits into yield
// strategies, with proportional share accounting per strategy
// Architecture: vault custodies balances and investment records; each
// strategy owns one share ledger over one yield source

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod math;
pub mod state;
pub mod swap;
pub mod yield_adapter;

use instructions::*;
use state::ExitRequest;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod strategy_vault {
    use super::*;

    /// Initialize the global vault with fee and slippage parameters
    ///
    /// Security considerations:
    /// - Validates authority is signer and stores it in state
    /// - Rates validated as basis points
    pub fn initialize(
        ctx: Context<Initialize>,
        protocol_fee_bps: u16,
        max_slippage_bps: u16,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, protocol_fee_bps, max_slippage_bps)
    }

    /// Update the protocol fee and max slippage (authority only)
    pub fn set_vault_params(
        ctx: Context<SetVaultParams>,
        protocol_fee_bps: u16,
        max_slippage_bps: u16,
    ) -> Result<()> {
        instructions::set_vault_params::handler(ctx, protocol_fee_bps, max_slippage_bps)
    }

    /// Create a yield source: a derivative mint redeemable against a
    /// base-asset reserve at a keeper-pushed price
    pub fn create_yield_source(
        ctx: Context<CreateYieldSource>,
        id: u64,
        price_p32: u64,
    ) -> Result<()> {
        instructions::create_yield_source::handler(ctx, id, price_p32)
    }

    /// Keeper crank: push the current derivative-token price
    pub fn set_yield_price(ctx: Context<SetYieldPrice>, price_p32: u64) -> Result<()> {
        instructions::set_yield_price::handler(ctx, price_p32)
    }

    /// Push an exchange rate for a token pair (slippage bounding only)
    pub fn set_oracle_rate(ctx: Context<SetOracleRate>, rate_p32: u64) -> Result<()> {
        instructions::set_oracle_rate::handler(ctx, rate_p32)
    }

    /// Create a strategy wrapping one yield source for one base asset
    /// (authority only)
    pub fn create_strategy(ctx: Context<CreateStrategy>) -> Result<()> {
        instructions::create_strategy::handler(ctx)
    }

    /// Deposit an asset into the vault, crediting the account's balance
    ///
    /// Security considerations:
    /// - Validates user token accounts (mint, owner)
    /// - Checks-effects-interactions pattern, event emitted
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount)
    }

    /// Withdraw an asset from the vault, debiting the account's balance
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, amount)
    }

    /// Join a strategy: mint shares priced against the strategy's value
    /// before the incoming principal is counted
    ///
    /// Security considerations:
    /// - Uses checked math for the share calculation
    /// - Sweeps idle base balance first so prior airdrops are in the price
    pub fn join(ctx: Context<Join>, amount: u64) -> Result<()> {
        instructions::join::handler(ctx, amount)
    }

    /// Exit a strategy: burn shares against current total value, deduct the
    /// protocol fee, enforce the oracle slippage bound, credit the balance
    ///
    /// `request` takes either an absolute share count or a basis-point
    /// fraction of the caller's holding.
    pub fn exit(ctx: Context<Exit>, request: ExitRequest) -> Result<()> {
        instructions::exit::handler(ctx, request)
    }

    /// Sweep an idle token balance in a strategy into its yield source
    /// without minting or burning shares (authority only)
    pub fn invest_idle(ctx: Context<InvestIdle>) -> Result<()> {
        instructions::invest_idle::handler(ctx)
    }
}
