use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::math;
use crate::yield_adapter::{RateYieldAdapter, YieldSource};
use crate::{constants::*, errors::*, events::*, state::*};

/// Exit a strategy: burn shares against the current total value, divest the
/// proportional claim from the yield source, deduct the protocol fee, verify
/// the proceeds against the oracle-derived expectation, and credit the
/// account's vault balance
///
/// The whole operation is one indivisible unit: any failure (insufficient
/// yield-source liquidity, slippage bound, stale price) aborts with no
/// partial ledger mutation.
#[derive(Accounts)]
pub struct Exit<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,

    /// CHECK: PDA used as token authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED],
        bump = vault_state.vault_authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        address = strategy.base_mint @ VaultError::InvalidMint,
    )]
    pub base_mint: Account<'info, Mint>,

    #[account(
        mut,
        seeds = [STRATEGY_SEED, strategy.base_mint.as_ref(), strategy.yield_source.as_ref()],
        bump = strategy.bump,
    )]
    pub strategy: Account<'info, Strategy>,

    /// CHECK: PDA used as token authority, validated by seeds
    #[account(
        seeds = [STRATEGY_AUTHORITY_SEED, strategy.key().as_ref()],
        bump = strategy.authority_bump,
    )]
    pub strategy_authority: UncheckedAccount<'info>,

    #[account(
        address = strategy.yield_source @ VaultError::UnsupportedToken,
    )]
    pub yield_state: Account<'info, YieldSourceState>,

    #[account(
        mut,
        address = yield_state.yield_mint @ VaultError::InvalidMint,
    )]
    pub yield_mint: Account<'info, Mint>,

    /// CHECK: PDA used as token authority, validated by seeds
    #[account(
        seeds = [YIELD_AUTHORITY_SEED, yield_state.key().as_ref()],
        bump = yield_state.authority_bump,
    )]
    pub yield_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        associated_token::mint = base_mint,
        associated_token::authority = yield_authority,
    )]
    pub yield_reserve: Account<'info, TokenAccount>,

    /// Derivative-to-base rate used only to bound slippage
    #[account(
        seeds = [ORACLE_SEED, yield_mint.key().as_ref(), base_mint.key().as_ref()],
        bump = oracle.bump,
    )]
    pub oracle: Account<'info, PriceOracle>,

    #[account(
        mut,
        seeds = [USER_BALANCE_SEED, user.key().as_ref(), base_mint.key().as_ref()],
        bump = user_balance.bump,
        constraint = user_balance.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub user_balance: Account<'info, UserBalance>,

    #[account(
        mut,
        seeds = [INVESTMENT_SEED, strategy.key().as_ref(), user.key().as_ref()],
        bump = investment.bump,
        constraint = investment.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub investment: Account<'info, Investment>,

    #[account(
        mut,
        associated_token::mint = base_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        associated_token::mint = base_mint,
        associated_token::authority = strategy_authority,
    )]
    pub strategy_asset_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        associated_token::mint = yield_mint,
        associated_token::authority = strategy_authority,
    )]
    pub strategy_position_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Exit>, request: ExitRequest) -> Result<()> {
    // CHECKS: resolve the requested shares against the account's holding
    let shares_held_before = ctx.accounts.investment.shares_held;
    let shares_to_burn = request.resolve(shares_held_before)?;
    require!(shares_to_burn > 0, VaultError::ZeroAmount);
    require!(
        shares_to_burn <= shares_held_before,
        VaultError::InsufficientShares
    );

    let strategy_key = ctx.accounts.strategy.key();
    // burning every outstanding share must liquidate the whole position
    let full_exit = shares_to_burn == ctx.accounts.strategy.total_shares;

    let mut adapter = RateYieldAdapter {
        yield_state: &ctx.accounts.yield_state,
        yield_mint: ctx.accounts.yield_mint.to_account_info(),
        yield_reserve: &mut ctx.accounts.yield_reserve,
        position: &mut ctx.accounts.strategy_position_account,
        idle: ctx.accounts.strategy_asset_account.to_account_info(),
        strategy: strategy_key,
        strategy_authority: ctx.accounts.strategy_authority.to_account_info(),
        strategy_authority_bump: ctx.accounts.strategy.authority_bump,
        yield_authority: ctx.accounts.yield_authority.to_account_info(),
        token_program: ctx.accounts.token_program.to_account_info(),
    };

    // proportional claim against the current total value
    let value_now = adapter.total_value()?;
    let gross = ctx
        .accounts
        .strategy
        .value_for_shares(shares_to_burn, value_now)?;
    require!(gross > 0, VaultError::ZeroAmount);

    // derivative amount this divestment burns, for the oracle bound below
    let token_to_burn = if full_exit {
        adapter.position.amount
    } else {
        ctx.accounts.yield_state.base_to_token_ceil(gross)?
    };

    let amount_out = if full_exit {
        adapter.divest_all()?
    } else {
        adapter.divest(gross)?
    };

    // slippage: gross proceeds must stay within the oracle-derived bound
    math::check_price_not_stale(ctx.accounts.oracle.rate_timestamp)?;
    let expected = ctx.accounts.oracle.convert(token_to_burn)?;
    let min_out = math::apply_bp(
        expected,
        BASIS_POINTS_100_PERCENT - ctx.accounts.vault_state.max_slippage_bps,
    )?;
    require!(amount_out >= min_out, VaultError::SlippageExceeded);

    // INTERACTIONS: proceeds from the strategy back to the vault pool
    let strategy_bump = [ctx.accounts.strategy.authority_bump];
    let strategy_seeds: &[&[u8]] = &[
        STRATEGY_AUTHORITY_SEED,
        strategy_key.as_ref(),
        &strategy_bump,
    ];
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.strategy_asset_account.to_account_info(),
                to: ctx.accounts.vault_token_account.to_account_info(),
                authority: ctx.accounts.strategy_authority.to_account_info(),
            },
            &[strategy_seeds],
        ),
        amount_out,
    )?;

    // protocol fee stays in the vault pool
    let fee = math::apply_bp(amount_out, ctx.accounts.vault_state.protocol_fee_bps)?;
    let net_amount = amount_out
        .checked_sub(fee)
        .ok_or(VaultError::MathOverflow)?;

    // EFFECTS: ledger updates
    let principal_removed = if shares_to_burn == shares_held_before {
        ctx.accounts.investment.principal_invested
    } else {
        // cost basis reduced pro-rata by the share fraction removed
        math::mul_div(
            ctx.accounts.investment.principal_invested,
            shares_to_burn,
            shares_held_before,
        )?
    };

    let strategy = &mut ctx.accounts.strategy;
    strategy.total_shares = strategy
        .total_shares
        .checked_sub(shares_to_burn)
        .ok_or(VaultError::InsufficientShares)?;
    strategy.fees_collected = strategy
        .fees_collected
        .checked_add(fee)
        .ok_or(VaultError::MathOverflow)?;

    let investment = &mut ctx.accounts.investment;
    investment.shares_held -= shares_to_burn;
    investment.principal_invested -= principal_removed;

    ctx.accounts.user_balance.amount = ctx
        .accounts
        .user_balance
        .amount
        .checked_add(net_amount)
        .ok_or(VaultError::MathOverflow)?;

    emit!(Exited {
        vault: ctx.accounts.vault_state.key(),
        user: ctx.accounts.user.key(),
        strategy: strategy_key,
        mint: ctx.accounts.base_mint.key(),
        shares_burned: shares_to_burn,
        amount_out: net_amount,
        fee,
        total_shares: ctx.accounts.strategy.total_shares,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
