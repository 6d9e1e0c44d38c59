use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};

use crate::{constants::*, errors::*, events::*, state::*};

/// Create a yield source for a base asset: a derivative mint redeemable
/// against a base-asset reserve at a keeper-pushed price
#[derive(Accounts)]
#[instruction(id: u64)]
pub struct CreateYieldSource<'info> {
    /// Keeper that will push prices for this yield source
    #[account(mut)]
    pub keeper: Signer<'info>,

    /// Base asset the reserve pays out
    pub base_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = keeper,
        space = YieldSourceState::SPACE,
        seeds = [YIELD_SOURCE_SEED, base_mint.key().as_ref(), &id.to_le_bytes()],
        bump
    )]
    pub yield_state: Account<'info, YieldSourceState>,

    /// Yield authority PDA - mint authority of the derivative token and
    /// owner of the reserve
    /// CHECK: PDA used as token authority, validated by seeds
    #[account(
        seeds = [YIELD_AUTHORITY_SEED, yield_state.key().as_ref()],
        bump
    )]
    pub yield_authority: UncheckedAccount<'info>,

    /// Derivative token mint PDA
    #[account(
        init,
        payer = keeper,
        seeds = [YIELD_MINT_SEED, yield_state.key().as_ref()],
        bump,
        mint::decimals = base_mint.decimals,
        mint::authority = yield_authority,
    )]
    pub yield_mint: Account<'info, Mint>,

    /// Base-asset reserve backing the derivative token
    #[account(
        init,
        payer = keeper,
        associated_token::mint = base_mint,
        associated_token::authority = yield_authority,
    )]
    pub yield_reserve: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<CreateYieldSource>, id: u64, price_p32: u64) -> Result<()> {
    require!(price_p32 > 0, VaultError::InvalidPrice);

    let yield_state = &mut ctx.accounts.yield_state;
    yield_state.base_mint = ctx.accounts.base_mint.key();
    yield_state.yield_mint = ctx.accounts.yield_mint.key();
    yield_state.keeper = ctx.accounts.keeper.key();
    yield_state.price_p32 = price_p32;
    yield_state.price_timestamp = Clock::get()?.unix_timestamp as u64;
    yield_state.id = id;
    yield_state.bump = ctx.bumps.yield_state;
    yield_state.authority_bump = ctx.bumps.yield_authority;
    yield_state.mint_bump = ctx.bumps.yield_mint;
    yield_state._reserved = [0; 32];

    emit!(YieldSourceCreated {
        yield_source: yield_state.key(),
        base_mint: yield_state.base_mint,
        yield_mint: yield_state.yield_mint,
        keeper: yield_state.keeper,
        price_p32,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
