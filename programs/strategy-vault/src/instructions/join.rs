use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::yield_adapter::{RateYieldAdapter, YieldSource};
use crate::{constants::*, errors::*, events::*, state::*};

/// Join a strategy: debit the account's vault balance, transfer the
/// principal to the strategy, and mint shares priced against the strategy's
/// value before the transfer
///
/// Security checklist:
/// - User must be signer; only their own balance is debited
/// - Strategy, authority and token account PDAs validated by seeds
/// - Checked math for share calculation
/// - Checks-effects-interactions ordering, event emitted
#[derive(Accounts)]
pub struct Join<'info> {
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

    #[account(
        mut,
        seeds = [USER_BALANCE_SEED, user.key().as_ref(), base_mint.key().as_ref()],
        bump = user_balance.bump,
        constraint = user_balance.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub user_balance: Account<'info, UserBalance>,

    /// Investment record, created on first join and reopened after a full exit
    #[account(
        init_if_needed,
        payer = user,
        space = Investment::SPACE,
        seeds = [INVESTMENT_SEED, strategy.key().as_ref(), user.key().as_ref()],
        bump
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
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Join>, amount: u64) -> Result<()> {
    // CHECKS
    require!(amount > 0, VaultError::ZeroAmount);
    require!(
        ctx.accounts.user_balance.amount >= amount,
        VaultError::InsufficientBalance
    );

    // First join creates the record
    if ctx.accounts.investment.owner == Pubkey::default() {
        let investment = &mut ctx.accounts.investment;
        investment.strategy = ctx.accounts.strategy.key();
        investment.owner = ctx.accounts.user.key();
        investment.bump = ctx.bumps.investment;
        investment._reserved = [0; 16];
    }

    let strategy_key = ctx.accounts.strategy.key();
    let idle_amount = ctx.accounts.strategy_asset_account.amount;

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

    // Sweep any idle base balance first, so value that arrived before this
    // join (airdrops, residuals) is in the share price the joiner pays
    adapter.invest(idle_amount)?;

    // Price the shares against the value excluding the incoming principal
    let value_before = adapter.total_value()?;
    let shares_to_mint = ctx
        .accounts
        .strategy
        .shares_for_deposit(amount, value_before)?;

    // EFFECTS: debit the account's balance
    ctx.accounts.user_balance.amount = ctx
        .accounts
        .user_balance
        .amount
        .checked_sub(amount)
        .ok_or(VaultError::InsufficientBalance)?;

    // INTERACTIONS: principal to the strategy, then into the yield source
    let authority_bump = [ctx.accounts.vault_state.vault_authority_bump];
    let authority_seeds: &[&[u8]] = &[VAULT_AUTHORITY_SEED, &authority_bump];
    let signer_seeds = &[&authority_seeds[..]];

    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.vault_token_account.to_account_info(),
                to: ctx.accounts.strategy_asset_account.to_account_info(),
                authority: ctx.accounts.vault_authority.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
    )?;
    adapter.invest(amount)?;

    let strategy = &mut ctx.accounts.strategy;
    strategy.total_shares = strategy
        .total_shares
        .checked_add(shares_to_mint)
        .ok_or(VaultError::MathOverflow)?;

    let investment = &mut ctx.accounts.investment;
    investment.shares_held = investment
        .shares_held
        .checked_add(shares_to_mint)
        .ok_or(VaultError::MathOverflow)?;
    investment.principal_invested = investment
        .principal_invested
        .checked_add(amount)
        .ok_or(VaultError::MathOverflow)?;

    emit!(Joined {
        vault: ctx.accounts.vault_state.key(),
        user: ctx.accounts.user.key(),
        strategy: strategy_key,
        mint: ctx.accounts.base_mint.key(),
        amount,
        shares_minted: shares_to_mint,
        total_shares: ctx.accounts.strategy.total_shares,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
