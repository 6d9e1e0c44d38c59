use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{self, Mint, Token, TokenAccount, Transfer},
};

use crate::{constants::*, errors::*, events::*, state::*};

/// Deposit an asset into the vault, crediting the account's balance
///
/// Balances are plain accounted currency, not shares. Joining a strategy
/// later debits this balance.
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// User depositing assets
    /// Security: Must be signer
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,

    /// Vault authority PDA
    /// CHECK: PDA used as token authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED],
        bump = vault_state.vault_authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    pub asset_mint: Account<'info, Mint>,

    /// Per-(account, asset) balance record, created on first deposit
    #[account(
        init_if_needed,
        payer = user,
        space = UserBalance::SPACE,
        seeds = [USER_BALANCE_SEED, user.key().as_ref(), asset_mint.key().as_ref()],
        bump
    )]
    pub user_balance: Account<'info, UserBalance>,

    /// User's asset token account (source)
    /// Security: Must be owned by user and correct mint
    #[account(
        mut,
        constraint = user_token_account.mint == asset_mint.key() @ VaultError::InvalidMint,
        constraint = user_token_account.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// Vault's pooled token account for this asset
    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = asset_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    // CHECKS
    require!(amount > 0, VaultError::ZeroAmount);

    let user_balance = &mut ctx.accounts.user_balance;
    if user_balance.owner == Pubkey::default() {
        user_balance.owner = ctx.accounts.user.key();
        user_balance.mint = ctx.accounts.asset_mint.key();
        user_balance.bump = ctx.bumps.user_balance;
        user_balance._reserved = [0; 16];
    }

    // EFFECTS: credit the balance before external calls
    user_balance.amount = user_balance
        .amount
        .checked_add(amount)
        .ok_or(VaultError::MathOverflow)?;

    // INTERACTIONS: pull the tokens into the vault pool
    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.user_token_account.to_account_info(),
            to: ctx.accounts.vault_token_account.to_account_info(),
            authority: ctx.accounts.user.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, amount)?;

    emit!(Deposited {
        vault: ctx.accounts.vault_state.key(),
        user: ctx.accounts.user.key(),
        mint: ctx.accounts.asset_mint.key(),
        amount,
        balance: user_balance.amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
