use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Update the vault's fee and slippage parameters
#[derive(Accounts)]
pub struct SetVaultParams<'info> {
    pub authority: Signer<'info>,

    /// Security: has_one constraint validates authority from state
    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,
}

pub fn handler(
    ctx: Context<SetVaultParams>,
    protocol_fee_bps: u16,
    max_slippage_bps: u16,
) -> Result<()> {
    require!(
        protocol_fee_bps <= BASIS_POINTS_100_PERCENT,
        VaultError::InvalidFeeRate
    );
    require!(
        max_slippage_bps <= BASIS_POINTS_100_PERCENT,
        VaultError::InvalidFeeRate
    );

    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.protocol_fee_bps = protocol_fee_bps;
    vault_state.max_slippage_bps = max_slippage_bps;

    emit!(VaultParamsUpdated {
        vault: vault_state.key(),
        protocol_fee_bps,
        max_slippage_bps,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
