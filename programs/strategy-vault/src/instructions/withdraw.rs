use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::{constants::*, errors::*, events::*, state::*};

/// Withdraw an asset from the vault, debiting the account's balance
#[derive(Accounts)]
pub struct Withdraw<'info> {
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

    pub asset_mint: Account<'info, Mint>,

    #[account(
        mut,
        seeds = [USER_BALANCE_SEED, user.key().as_ref(), asset_mint.key().as_ref()],
        bump = user_balance.bump,
        constraint = user_balance.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub user_balance: Account<'info, UserBalance>,

    /// User's asset token account (destination)
    #[account(
        mut,
        constraint = user_token_account.mint == asset_mint.key() @ VaultError::InvalidMint,
        constraint = user_token_account.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// Vault's pooled token account for this asset
    #[account(
        mut,
        associated_token::mint = asset_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    // CHECKS
    require!(amount > 0, VaultError::ZeroAmount);

    let user_balance = &mut ctx.accounts.user_balance;
    require!(
        user_balance.amount >= amount,
        VaultError::InsufficientBalance
    );

    // EFFECTS
    user_balance.amount -= amount;

    // INTERACTIONS: pay out of the vault pool
    let authority_bump = [ctx.accounts.vault_state.vault_authority_bump];
    let authority_seeds: &[&[u8]] = &[VAULT_AUTHORITY_SEED, &authority_bump];
    let signer_seeds = &[&authority_seeds[..]];

    let transfer_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.vault_token_account.to_account_info(),
            to: ctx.accounts.user_token_account.to_account_info(),
            authority: ctx.accounts.vault_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, amount)?;

    emit!(Withdrawn {
        vault: ctx.accounts.vault_state.key(),
        user: ctx.accounts.user.key(),
        mint: ctx.accounts.asset_mint.key(),
        amount,
        balance: user_balance.amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
