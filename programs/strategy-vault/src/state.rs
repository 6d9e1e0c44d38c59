use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::VaultError;
use crate::math;

/// Global vault configuration
///
/// Security considerations:
/// - Authority stored in state (not instruction args)
/// - Fee and slippage bounds are plain basis-point parameters
/// - Bumps stored for efficient PDA signing
#[account]
pub struct VaultState {
    /// Authority that can create strategies and set fee/slippage parameters
    pub authority: Pubkey,

    /// Protocol fee charged on exit proceeds, in basis points
    pub protocol_fee_bps: u16,

    /// Maximum tolerated deviation from the oracle-derived expectation, in basis points
    pub max_slippage_bps: u16,

    /// Bump seed for the vault state PDA
    pub bump: u8,

    /// Bump seed for the vault authority PDA
    pub vault_authority_bump: u8,

    // Padding for future upgrades
    pub _reserved: [u8; 64],
}

impl VaultState {
    pub const SPACE: usize = 8 + 32 + 2 + 2 + 1 + 1 + 64;
}

/// Per-(base asset, yield source) strategy share ledger
///
/// The strategy stores only `total_shares`. Its total value is always derived
/// from the live derivative-token position and the yield source's current
/// price, never cached, so unsolicited gains (interest, swept airdrops) are
/// reflected at every mint and burn.
#[account]
pub struct Strategy {
    /// Mint of the strategy's base asset
    pub base_mint: Pubkey,

    /// Yield source this strategy invests into
    pub yield_source: Pubkey,

    /// Total shares outstanding, adjusted only by mint-on-join and burn-on-exit
    pub total_shares: u64,

    /// Protocol fees retained from exits, in base-asset units
    pub fees_collected: u64,

    /// Bump seed for the strategy state PDA
    pub bump: u8,

    /// Bump seed for the strategy authority PDA
    pub authority_bump: u8,

    // Padding for future upgrades
    pub _reserved: [u8; 64],
}

impl Strategy {
    pub const SPACE: usize = 8 + 32 + 32 + 8 + 8 + 1 + 1 + 64;

    /// Shares to mint for a deposit of `amount`, priced against the
    /// strategy's value *before* the deposit is counted.
    ///
    /// - First join (no shares outstanding): 1:1
    /// - Otherwise: shares = amount * total_shares / value_before
    ///
    /// Pricing against `value_before` keeps the share price
    /// (total value / total shares) consistent across every mint: a later
    /// joiner pays for value that arrived before their join and earlier
    /// holders are not diluted by the new deposit.
    pub fn shares_for_deposit(&self, amount: u64, value_before: u64) -> Result<u64> {
        if self.total_shares == 0 || value_before == 0 {
            return Ok(amount);
        }
        math::mul_div(amount, self.total_shares, value_before)
    }

    /// Base-asset value owed for burning `shares` against the current total value
    ///
    /// amount_out = shares * value_now / total_shares
    pub fn value_for_shares(&self, shares: u64, value_now: u64) -> Result<u64> {
        if self.total_shares == 0 {
            return Ok(0);
        }
        math::mul_div(shares, value_now, self.total_shares)
    }

    /// Current share price with 32-bit fixed-point precision
    pub fn share_price_p32(&self, value_now: u64) -> Result<u64> {
        if self.total_shares == 0 {
            return Ok(TWO_POW_32);
        }
        math::mul_div(value_now, TWO_POW_32, self.total_shares)
    }
}

/// Per-(strategy, account) investment record
///
/// `shares_held` is the account's portion of the strategy's `total_shares`.
/// `principal_invested` is cost basis for reporting only; payout math is
/// share-proportional. The record is created on first join, reopens after a
/// full exit, and `shares_held == 0` marks it closed.
#[account]
pub struct Investment {
    /// Strategy this record belongs to
    pub strategy: Pubkey,

    /// The account that owns the shares
    pub owner: Pubkey,

    /// Shares currently held
    pub shares_held: u64,

    /// Principal contributed, reduced pro-rata on exit
    pub principal_invested: u64,

    /// Bump seed for the PDA
    pub bump: u8,

    pub _reserved: [u8; 16],
}

impl Investment {
    pub const SPACE: usize = 8 + 32 + 32 + 8 + 8 + 1 + 16;

    pub fn is_closed(&self) -> bool {
        self.shares_held == 0
    }
}

/// Per-(account, asset) vault balance
///
/// Plain accounted currency, not shares: credited on deposit and exit,
/// debited on withdraw and join.
#[account]
pub struct UserBalance {
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
    pub bump: u8,
    pub _reserved: [u8; 16],
}

impl UserBalance {
    pub const SPACE: usize = 8 + 32 + 32 + 8 + 1 + 16;
}

/// Yield source state: a derivative token redeemable for base asset at a
/// keeper-pushed price
///
/// The price is obtained off-path and pushed by the keeper, then staleness
/// checked on every read (interest accrual raises it, protocol fee skimming
/// can lower it). Strategies hold the derivative token; converting their
/// balance at this price is what `total_value()` means.
#[account]
pub struct YieldSourceState {
    /// Mint of the base asset the reserve pays out
    pub base_mint: Pubkey,

    /// Mint of the derivative token (PDA mint, authority = yield authority PDA)
    pub yield_mint: Pubkey,

    /// Keeper allowed to push prices
    pub keeper: Pubkey,

    /// Base asset per derivative token, 32-bit fixed-point precision
    pub price_p32: u64,

    /// Unix timestamp of the last price push
    pub price_timestamp: u64,

    /// Discriminates multiple yield sources over the same base mint
    pub id: u64,

    /// Bump seed for the yield source state PDA
    pub bump: u8,

    /// Bump seed for the yield authority PDA
    pub authority_bump: u8,

    /// Bump seed for the derivative mint PDA
    pub mint_bump: u8,

    pub _reserved: [u8; 32],
}

impl YieldSourceState {
    pub const SPACE: usize = 8 + 32 + 32 + 32 + 8 + 8 + 8 + 1 + 1 + 1 + 32;

    pub fn token_to_base(&self, token_amount: u64) -> Result<u64> {
        math::token_amount_to_base_value(token_amount, self.price_p32)
    }

    pub fn base_to_token(&self, base_value: u64) -> Result<u64> {
        math::base_value_to_token_amount(base_value, self.price_p32)
    }

    pub fn base_to_token_ceil(&self, base_value: u64) -> Result<u64> {
        math::base_value_to_token_amount_ceil(base_value, self.price_p32)
    }

    /// Whether a token may be swept into this yield source. The derivative
    /// token itself is never sweepable: burning or minting the wrapper
    /// outside invest/divest would desynchronize the share ledger from the
    /// position.
    pub fn is_sweepable(&self, token: Pubkey) -> bool {
        token != self.yield_mint
    }
}

/// Keeper-pushed exchange rate for one (token in, token out) pair
///
/// Used only to bound exit and swap slippage, never by the share math itself.
#[account]
pub struct PriceOracle {
    pub token_in: Pubkey,
    pub token_out: Pubkey,

    /// out = in * rate_p32 / 2^32
    pub rate_p32: u64,

    /// Unix timestamp of the last rate push
    pub rate_timestamp: u64,

    pub bump: u8,
    pub _reserved: [u8; 16],
}

impl PriceOracle {
    pub const SPACE: usize = 8 + 32 + 32 + 8 + 8 + 1 + 16;

    pub fn convert(&self, amount_in: u64) -> Result<u64> {
        math::mul_div(amount_in, self.rate_p32, TWO_POW_32)
    }
}

/// Requested exit size: either an absolute share count or a fraction of the
/// account's holding in basis points. Both representations appear in the
/// domain; this is the one canonical exit signature.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub enum ExitRequest {
    Shares(u64),
    Ratio(u16),
}

impl ExitRequest {
    /// Resolve to an absolute share count against the caller's holding
    pub fn resolve(&self, shares_held: u64) -> Result<u64> {
        match self {
            ExitRequest::Shares(shares) => Ok(*shares),
            ExitRequest::Ratio(bps) => {
                require!(
                    *bps > 0 && *bps <= BASIS_POINTS_100_PERCENT,
                    VaultError::InvalidExitRequest
                );
                // Ratio(10_000) exits the full holding exactly
                if *bps == BASIS_POINTS_100_PERCENT {
                    Ok(shares_held)
                } else {
                    math::mul_div(shares_held, *bps as u64, BASIS_POINTS_100_PERCENT as u64)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_strategy(total_shares: u64) -> Strategy {
        Strategy {
            base_mint: Pubkey::default(),
            yield_source: Pubkey::default(),
            total_shares,
            fees_collected: 0,
            bump: 0,
            authority_bump: 0,
            _reserved: [0; 64],
        }
    }

    #[test]
    fn test_first_join_mints_one_to_one() {
        let strategy = mock_strategy(0);
        assert_eq!(strategy.shares_for_deposit(1000, 0).unwrap(), 1000);
        // orphaned value with no shares outstanding still prices 1:1
        assert_eq!(strategy.shares_for_deposit(1000, 500).unwrap(), 1000);
    }

    #[test]
    fn test_join_after_gain_is_diluted_fairly() {
        // 1000 shares backed by 2000 of value: a 500 deposit buys 250 shares
        let strategy = mock_strategy(1000);
        assert_eq!(strategy.shares_for_deposit(500, 2000).unwrap(), 250);
    }

    #[test]
    fn test_value_for_shares() {
        let strategy = mock_strategy(1000);
        assert_eq!(strategy.value_for_shares(500, 2000).unwrap(), 1000);
        // burning every share claims the entire value, no dust
        assert_eq!(strategy.value_for_shares(1000, 2000).unwrap(), 2000);
    }

    #[test]
    fn test_value_for_shares_empty_strategy() {
        let strategy = mock_strategy(0);
        assert_eq!(strategy.value_for_shares(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_share_price_reflects_value() {
        let strategy = mock_strategy(1000);
        assert_eq!(strategy.share_price_p32(1000).unwrap(), TWO_POW_32);
        assert_eq!(strategy.share_price_p32(2000).unwrap(), 2 * TWO_POW_32);
    }

    #[test]
    fn test_precision_loss_rounds_down() {
        let strategy = mock_strategy(333);
        // 100 * 333 / 1000 = 33 (integer division)
        assert_eq!(strategy.shares_for_deposit(100, 1000).unwrap(), 33);
    }

    #[test]
    fn test_exit_request_absolute() {
        assert_eq!(ExitRequest::Shares(42).resolve(100).unwrap(), 42);
        // over-held requests resolve; the handler rejects them against the record
        assert_eq!(ExitRequest::Shares(200).resolve(100).unwrap(), 200);
    }

    #[test]
    fn test_exit_request_ratio() {
        assert_eq!(ExitRequest::Ratio(5000).resolve(100).unwrap(), 50);
        assert_eq!(ExitRequest::Ratio(10_000).resolve(101).unwrap(), 101);
        assert!(ExitRequest::Ratio(0).resolve(100).is_err());
        assert!(ExitRequest::Ratio(10_001).resolve(100).is_err());
    }

    #[test]
    fn test_yield_source_conversions() {
        let ys = YieldSourceState {
            base_mint: Pubkey::default(),
            yield_mint: Pubkey::default(),
            keeper: Pubkey::default(),
            price_p32: TWO_POW_32 * 2, // 2.0 base per token
            price_timestamp: 0,
            id: 0,
            bump: 0,
            authority_bump: 0,
            mint_bump: 0,
            _reserved: [0; 32],
        };
        assert_eq!(ys.token_to_base(500).unwrap(), 1000);
        assert_eq!(ys.base_to_token(1000).unwrap(), 500);
        assert_eq!(ys.base_to_token_ceil(1001).unwrap(), 501);
    }

    #[test]
    fn test_sweep_rejects_derivative_token() {
        let ys = YieldSourceState {
            base_mint: Pubkey::new_unique(),
            yield_mint: Pubkey::new_unique(),
            keeper: Pubkey::default(),
            price_p32: TWO_POW_32,
            price_timestamp: 0,
            id: 0,
            bump: 0,
            authority_bump: 0,
            mint_bump: 0,
            _reserved: [0; 32],
        };
        // the wrapper token itself is never sweepable
        assert!(!ys.is_sweepable(ys.yield_mint));
        // the base asset and foreign tokens are
        assert!(ys.is_sweepable(ys.base_mint));
        assert!(ys.is_sweepable(Pubkey::new_unique()));
    }
}
