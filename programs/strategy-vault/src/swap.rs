use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::VaultError;
use crate::math;
use crate::state::PriceOracle;

/// Accounts for one token-in to token-out conversion through the connector's
/// liquidity pools
pub struct SwapLeg<'a, 'info> {
    pub oracle: &'a Account<'info, PriceOracle>,

    /// Connector pool receiving the input token
    pub pool_in: AccountInfo<'info>,
    /// Connector pool paying the output token
    pub pool_out: &'a mut Account<'info, TokenAccount>,

    /// Caller's input token account
    pub from: AccountInfo<'info>,
    /// Caller's output token account
    pub to: AccountInfo<'info>,
    pub from_authority: AccountInfo<'info>,
    pub from_authority_seed: Pubkey,
    pub from_authority_bump: u8,

    pub swap_authority: AccountInfo<'info>,
    pub swap_authority_bump: u8,
    pub token_program: AccountInfo<'info>,
}

/// swap(token_in, token_out, amount_in, min_amount_out): pull the input into
/// the connector pool and pay out at the oracle rate. Fails if the payout is
/// below `min_amount_out` or the pool cannot cover it.
pub fn execute_swap(leg: &mut SwapLeg, amount_in: u64, min_amount_out: u64) -> Result<u64> {
    require!(amount_in > 0, VaultError::ZeroAmount);
    math::check_price_not_stale(leg.oracle.rate_timestamp)?;

    let amount_out = leg.oracle.convert(amount_in)?;
    require!(amount_out >= min_amount_out, VaultError::SlippageExceeded);

    leg.pool_out.reload()?;
    require!(
        leg.pool_out.amount >= amount_out,
        VaultError::ExternalCallFailure
    );

    let from_seed = leg.from_authority_seed;
    let from_bump = [leg.from_authority_bump];
    let from_seeds: &[&[u8]] = &[STRATEGY_AUTHORITY_SEED, from_seed.as_ref(), &from_bump];
    token::transfer(
        CpiContext::new_with_signer(
            leg.token_program.clone(),
            Transfer {
                from: leg.from.clone(),
                to: leg.pool_in.clone(),
                authority: leg.from_authority.clone(),
            },
            &[from_seeds],
        ),
        amount_in,
    )?;

    let swap_bump = [leg.swap_authority_bump];
    let swap_seeds: &[&[u8]] = &[SWAP_AUTHORITY_SEED, &swap_bump];
    token::transfer(
        CpiContext::new_with_signer(
            leg.token_program.clone(),
            Transfer {
                from: leg.pool_out.to_account_info(),
                to: leg.to.clone(),
                authority: leg.swap_authority.clone(),
            },
            &[swap_seeds],
        ),
        amount_out,
    )?;

    Ok(amount_out)
}
