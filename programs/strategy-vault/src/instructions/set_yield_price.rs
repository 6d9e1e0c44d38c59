use anchor_lang::prelude::*;

use crate::{errors::*, events::*, state::*};

/// Keeper crank: push the current derivative-token price
///
/// The price moves with the yield source's own accounting: interest accrual
/// raises it, protocol-fee skimming can lower it. Every value read in the
/// share math staleness-checks the timestamp written here.
#[derive(Accounts)]
pub struct SetYieldPrice<'info> {
    pub keeper: Signer<'info>,

    #[account(
        mut,
        has_one = keeper @ VaultError::Unauthorized,
    )]
    pub yield_state: Account<'info, YieldSourceState>,
}

pub fn handler(ctx: Context<SetYieldPrice>, price_p32: u64) -> Result<()> {
    require!(price_p32 > 0, VaultError::InvalidPrice);

    let yield_state = &mut ctx.accounts.yield_state;
    yield_state.price_p32 = price_p32;
    yield_state.price_timestamp = Clock::get()?.unix_timestamp as u64;

    emit!(YieldPriceUpdated {
        yield_source: yield_state.key(),
        price_p32,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
