use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

use crate::{constants::*, errors::*, events::*, state::*};

/// Push an exchange rate for one (token in, token out) pair
///
/// The oracle is only consulted to bound exit and swap slippage; the share
/// math never reads it.
#[derive(Accounts)]
pub struct SetOracleRate<'info> {
    /// Vault authority doubles as the oracle keeper
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,

    pub token_in_mint: Account<'info, Mint>,
    pub token_out_mint: Account<'info, Mint>,

    /// Oracle PDA, initialized on the first push for this pair
    #[account(
        init_if_needed,
        payer = authority,
        space = PriceOracle::SPACE,
        seeds = [ORACLE_SEED, token_in_mint.key().as_ref(), token_out_mint.key().as_ref()],
        bump
    )]
    pub oracle: Account<'info, PriceOracle>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<SetOracleRate>, rate_p32: u64) -> Result<()> {
    require!(rate_p32 > 0, VaultError::InvalidPrice);

    let oracle = &mut ctx.accounts.oracle;

    // First push for this pair initializes the record
    if oracle.token_in == Pubkey::default() {
        oracle.token_in = ctx.accounts.token_in_mint.key();
        oracle.token_out = ctx.accounts.token_out_mint.key();
        oracle.bump = ctx.bumps.oracle;
        oracle._reserved = [0; 16];
    }

    oracle.rate_p32 = rate_p32;
    oracle.rate_timestamp = Clock::get()?.unix_timestamp as u64;

    emit!(OracleRateUpdated {
        oracle: oracle.key(),
        token_in: oracle.token_in,
        token_out: oracle.token_out,
        rate_p32,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
