use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, MintTo, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::VaultError;
use crate::math;
use crate::state::YieldSourceState;

/// Capability contract every yield source satisfies: report current value,
/// accept base asset, return base asset. The vault and share-accounting
/// logic are written once against this trait; integrating another yield
/// source means adding another implementation, not touching the ledger.
pub trait YieldSource {
    /// Current redeemable base-asset value of the strategy's position,
    /// recomputed from live account state on every call
    fn total_value(&mut self) -> Result<u64>;

    /// Move `amount` of base asset from the strategy's idle account into the
    /// yield source. No-op for zero.
    fn invest(&mut self, amount: u64) -> Result<()>;

    /// Redeem `amount` of base asset from the position back into the
    /// strategy's idle account; returns the amount actually received
    fn divest(&mut self, amount: u64) -> Result<u64>;

    /// Liquidate the entire position, leaving no residual derivative dust
    fn divest_all(&mut self) -> Result<u64>;
}

/// Yield source holding a derivative token redeemable at a keeper-pushed
/// p32 price: invest deposits base into the reserve and mints derivative,
/// divest burns derivative and pays base out of the reserve.
pub struct RateYieldAdapter<'a, 'info> {
    pub yield_state: &'a Account<'info, YieldSourceState>,
    pub yield_mint: AccountInfo<'info>,
    pub yield_reserve: &'a mut Account<'info, TokenAccount>,

    /// Strategy's derivative-token position account
    pub position: &'a mut Account<'info, TokenAccount>,
    /// Strategy's idle base-asset account
    pub idle: AccountInfo<'info>,

    pub strategy: Pubkey,
    pub strategy_authority: AccountInfo<'info>,
    pub strategy_authority_bump: u8,
    pub yield_authority: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
}

impl<'a, 'info> RateYieldAdapter<'a, 'info> {
    /// Burn derivative from the position and pay base out of the reserve
    fn redeem(&mut self, token_amount: u64, base_amount: u64) -> Result<u64> {
        self.yield_reserve.reload()?;
        // insufficient reserve liquidity is fatal to the whole exit
        require!(
            self.yield_reserve.amount >= base_amount,
            VaultError::ExternalCallFailure
        );

        let strategy_key = self.strategy;
        let strategy_bump = [self.strategy_authority_bump];
        let strategy_seeds: &[&[u8]] = &[
            STRATEGY_AUTHORITY_SEED,
            strategy_key.as_ref(),
            &strategy_bump,
        ];
        token::burn(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                Burn {
                    mint: self.yield_mint.clone(),
                    from: self.position.to_account_info(),
                    authority: self.strategy_authority.clone(),
                },
                &[strategy_seeds],
            ),
            token_amount,
        )?;

        let yield_state_key = self.yield_state.key();
        let yield_bump = [self.yield_state.authority_bump];
        let yield_seeds: &[&[u8]] = &[
            YIELD_AUTHORITY_SEED,
            yield_state_key.as_ref(),
            &yield_bump,
        ];
        token::transfer(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                Transfer {
                    from: self.yield_reserve.to_account_info(),
                    to: self.idle.clone(),
                    authority: self.yield_authority.clone(),
                },
                &[yield_seeds],
            ),
            base_amount,
        )?;

        Ok(base_amount)
    }
}

impl<'a, 'info> YieldSource for RateYieldAdapter<'a, 'info> {
    fn total_value(&mut self) -> Result<u64> {
        self.position.reload()?;
        math::check_price_not_stale(self.yield_state.price_timestamp)?;
        self.yield_state.token_to_base(self.position.amount)
    }

    fn invest(&mut self, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        // minting derivative at a stale rate would misprice the position
        math::check_price_not_stale(self.yield_state.price_timestamp)?;

        let strategy_key = self.strategy;
        let strategy_bump = [self.strategy_authority_bump];
        let strategy_seeds: &[&[u8]] = &[
            STRATEGY_AUTHORITY_SEED,
            strategy_key.as_ref(),
            &strategy_bump,
        ];
        token::transfer(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                Transfer {
                    from: self.idle.clone(),
                    to: self.yield_reserve.to_account_info(),
                    authority: self.strategy_authority.clone(),
                },
                &[strategy_seeds],
            ),
            amount,
        )?;

        let token_amount = self.yield_state.base_to_token(amount)?;
        let yield_state_key = self.yield_state.key();
        let yield_bump = [self.yield_state.authority_bump];
        let yield_seeds: &[&[u8]] = &[
            YIELD_AUTHORITY_SEED,
            yield_state_key.as_ref(),
            &yield_bump,
        ];
        token::mint_to(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                MintTo {
                    mint: self.yield_mint.clone(),
                    to: self.position.to_account_info(),
                    authority: self.yield_authority.clone(),
                },
                &[yield_seeds],
            ),
            token_amount,
        )?;

        Ok(())
    }

    fn divest(&mut self, amount: u64) -> Result<u64> {
        require!(amount > 0, VaultError::ZeroAmount);
        // round the burn up so the redeemed tokens cover the requested value
        let token_amount = self.yield_state.base_to_token_ceil(amount)?;
        self.position.reload()?;
        require!(
            token_amount <= self.position.amount,
            VaultError::ExternalCallFailure
        );
        self.redeem(token_amount, amount)
    }

    fn divest_all(&mut self) -> Result<u64> {
        self.position.reload()?;
        let token_amount = self.position.amount;
        if token_amount == 0 {
            return Ok(0);
        }
        let base_amount = self.yield_state.token_to_base(token_amount)?;
        self.redeem(token_amount, base_amount)
    }
}
