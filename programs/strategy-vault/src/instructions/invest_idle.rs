use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::math;
use crate::swap::{execute_swap, SwapLeg};
use crate::yield_adapter::{RateYieldAdapter, YieldSource};
use crate::{constants::*, errors::*, events::*, state::*};

/// Sweep a token balance sitting idle in the strategy (airdrops, residuals)
/// into the yield source
///
/// Never mints or burns shares: the sweep only raises total value, which
/// implicitly raises the share price for every existing holder. A non-base
/// token is first converted through the swap connector, bounded by the
/// oracle rate minus the configured max slippage. Sweeping the yield
/// source's own derivative token is rejected - burning or minting the
/// wrapper directly would desynchronize the share ledger from the position.
#[derive(Accounts)]
pub struct InvestIdle<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,

    #[account(
        address = strategy.base_mint @ VaultError::InvalidMint,
    )]
    pub base_mint: Account<'info, Mint>,

    #[account(
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

    /// Token being swept
    pub swept_mint: Account<'info, Mint>,

    /// Strategy's token account for a non-base swept token; unused when
    /// sweeping the base asset itself
    #[account(mut)]
    pub swept_token_account: Option<Account<'info, TokenAccount>>,

    /// Swept-token to base-asset rate; required for non-base sweeps
    pub oracle: Option<Account<'info, PriceOracle>>,

    /// Swap connector authority PDA; required for non-base sweeps
    /// CHECK: validated against the canonical PDA in the handler
    pub swap_authority: Option<UncheckedAccount<'info>>,

    /// Connector pool receiving the swept token
    #[account(mut)]
    pub pool_in: Option<Account<'info, TokenAccount>>,

    /// Connector pool paying out base asset
    #[account(mut)]
    pub pool_out: Option<Account<'info, TokenAccount>>,

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

pub fn handler(ctx: Context<InvestIdle>) -> Result<()> {
    let swept_mint = ctx.accounts.swept_mint.key();
    let base_mint = ctx.accounts.base_mint.key();

    require!(
        ctx.accounts.yield_state.is_sweepable(swept_mint),
        VaultError::UnsupportedToken
    );

    let strategy_key = ctx.accounts.strategy.key();
    let strategy_authority_key = ctx.accounts.strategy_authority.key();

    let (amount_swept, base_amount) = if swept_mint == base_mint {
        let idle = ctx.accounts.strategy_asset_account.amount;
        require!(idle > 0, VaultError::ZeroAmount);
        (idle, idle)
    } else {
        // non-base sweep: convert through the connector first
        let swept_account = ctx
            .accounts
            .swept_token_account
            .as_ref()
            .ok_or(VaultError::UnsupportedToken)?;
        require!(
            swept_account.mint == swept_mint,
            VaultError::InvalidMint
        );
        require!(
            swept_account.owner == strategy_authority_key,
            VaultError::InvalidOwner
        );
        let idle = swept_account.amount;
        require!(idle > 0, VaultError::ZeroAmount);

        let oracle = ctx
            .accounts
            .oracle
            .as_ref()
            .ok_or(VaultError::UnsupportedToken)?;
        require!(
            oracle.token_in == swept_mint && oracle.token_out == base_mint,
            VaultError::UnsupportedToken
        );

        let swap_authority = ctx
            .accounts
            .swap_authority
            .as_ref()
            .ok_or(VaultError::ExternalCallFailure)?;
        let (expected_authority, swap_authority_bump) =
            Pubkey::find_program_address(&[SWAP_AUTHORITY_SEED], ctx.program_id);
        require_keys_eq!(
            swap_authority.key(),
            expected_authority,
            VaultError::ExternalCallFailure
        );

        let pool_in = ctx
            .accounts
            .pool_in
            .as_ref()
            .ok_or(VaultError::ExternalCallFailure)?;
        require!(
            pool_in.mint == swept_mint && pool_in.owner == expected_authority,
            VaultError::ExternalCallFailure
        );
        let pool_in_info = pool_in.to_account_info();
        let swept_info = swept_account.to_account_info();

        let expected_out = oracle.convert(idle)?;
        let min_out = math::apply_bp(
            expected_out,
            BASIS_POINTS_100_PERCENT - ctx.accounts.vault_state.max_slippage_bps,
        )?;

        let pool_out = ctx
            .accounts
            .pool_out
            .as_mut()
            .ok_or(VaultError::ExternalCallFailure)?;
        require!(
            pool_out.mint == base_mint && pool_out.owner == expected_authority,
            VaultError::ExternalCallFailure
        );

        let mut leg = SwapLeg {
            oracle,
            pool_in: pool_in_info,
            pool_out,
            from: swept_info,
            to: ctx.accounts.strategy_asset_account.to_account_info(),
            from_authority: ctx.accounts.strategy_authority.to_account_info(),
            from_authority_seed: strategy_key,
            from_authority_bump: ctx.accounts.strategy.authority_bump,
            swap_authority: swap_authority.to_account_info(),
            swap_authority_bump,
            token_program: ctx.accounts.token_program.to_account_info(),
        };
        let received = execute_swap(&mut leg, idle, min_out)?;
        (idle, received)
    };

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
    adapter.invest(base_amount)?;

    emit!(IdleInvested {
        strategy: strategy_key,
        token: swept_mint,
        amount_swept,
        base_invested: base_amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
