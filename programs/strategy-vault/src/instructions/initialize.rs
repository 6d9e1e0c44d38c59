use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Initialize the global vault
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Vault authority - can create strategies and set parameters
    /// Security: Must be signer, stored in state
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Vault state PDA
    /// Security: Initialized with padding for upgrades
    #[account(
        init,
        payer = authority,
        space = VaultState::SPACE,
        seeds = [VAULT_SEED],
        bump
    )]
    pub vault_state: Account<'info, VaultState>,

    /// Vault authority PDA - owns the vault's pooled token accounts
    /// Security: CHECK constraint ensures correct derivation
    /// CHECK: PDA used as token authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED],
        bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<Initialize>,
    protocol_fee_bps: u16,
    max_slippage_bps: u16,
) -> Result<()> {
    // CHECKS: rates are basis points
    require!(
        protocol_fee_bps <= BASIS_POINTS_100_PERCENT,
        VaultError::InvalidFeeRate
    );
    require!(
        max_slippage_bps <= BASIS_POINTS_100_PERCENT,
        VaultError::InvalidFeeRate
    );

    let vault_state = &mut ctx.accounts.vault_state;

    // EFFECTS: Initialize vault state
    vault_state.authority = ctx.accounts.authority.key();
    vault_state.protocol_fee_bps = protocol_fee_bps;
    vault_state.max_slippage_bps = max_slippage_bps;
    vault_state.bump = ctx.bumps.vault_state;
    vault_state.vault_authority_bump = ctx.bumps.vault_authority;
    vault_state._reserved = [0; 64];

    emit!(VaultInitialized {
        vault: vault_state.key(),
        authority: vault_state.authority,
        protocol_fee_bps,
        max_slippage_bps,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
