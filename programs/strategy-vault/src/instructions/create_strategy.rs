use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};

use crate::{constants::*, errors::*, events::*, state::*};

/// Create a strategy wrapping one yield source for one base asset
///
/// Security considerations:
/// - Authority-only function (has_one constraint)
/// - The strategy exclusively owns its share ledger and its idle/position
///   token accounts; the investment records stay with the vault
#[derive(Accounts)]
pub struct CreateStrategy<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,

    pub base_mint: Account<'info, Mint>,

    /// Yield source the strategy invests into
    /// Security: must be denominated in the strategy's base asset
    #[account(
        constraint = yield_state.base_mint == base_mint.key() @ VaultError::InvalidMint,
    )]
    pub yield_state: Account<'info, YieldSourceState>,

    #[account(
        init,
        payer = authority,
        space = Strategy::SPACE,
        seeds = [STRATEGY_SEED, base_mint.key().as_ref(), yield_state.key().as_ref()],
        bump
    )]
    pub strategy: Account<'info, Strategy>,

    /// Strategy authority PDA - owns the strategy's token accounts
    /// CHECK: PDA used as token authority, validated by seeds
    #[account(
        seeds = [STRATEGY_AUTHORITY_SEED, strategy.key().as_ref()],
        bump
    )]
    pub strategy_authority: UncheckedAccount<'info>,

    #[account(
        address = yield_state.yield_mint @ VaultError::InvalidMint,
    )]
    pub yield_mint: Account<'info, Mint>,

    /// Idle base-asset account (un-invested funds and airdrops land here)
    #[account(
        init,
        payer = authority,
        associated_token::mint = base_mint,
        associated_token::authority = strategy_authority,
    )]
    pub strategy_asset_account: Account<'info, TokenAccount>,

    /// Derivative-token position account
    #[account(
        init,
        payer = authority,
        associated_token::mint = yield_mint,
        associated_token::authority = strategy_authority,
    )]
    pub strategy_position_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<CreateStrategy>) -> Result<()> {
    let strategy = &mut ctx.accounts.strategy;
    strategy.base_mint = ctx.accounts.base_mint.key();
    strategy.yield_source = ctx.accounts.yield_state.key();
    strategy.total_shares = 0;
    strategy.fees_collected = 0;
    strategy.bump = ctx.bumps.strategy;
    strategy.authority_bump = ctx.bumps.strategy_authority;
    strategy._reserved = [0; 64];

    emit!(StrategyCreated {
        strategy: strategy.key(),
        base_mint: strategy.base_mint,
        yield_source: strategy.yield_source,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
