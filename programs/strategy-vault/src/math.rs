use anchor_lang::prelude::*;

use crate::constants::{BASIS_POINTS_100_PERCENT, MAX_PRICE_AGE_SECONDS, TWO_POW_32};
use crate::errors::VaultError;

/// amount * numerator / denominator with u128 intermediates
///
/// Security: Uses checked math to prevent overflow
pub fn mul_div(amount: u64, numerator: u64, denominator: u64) -> Result<u64> {
    let result = (amount as u128)
        .checked_mul(numerator as u128)
        .ok_or(error!(VaultError::MathOverflow))?
        .checked_div(denominator as u128)
        .ok_or(error!(VaultError::DivisionByZero))?;

    u64::try_from(result).map_err(|_| error!(VaultError::MathOverflow))
}

/// amount * numerator / denominator, rounded up
pub fn mul_div_ceil(amount: u64, numerator: u64, denominator: u64) -> Result<u64> {
    if denominator == 0 {
        return Err(error!(VaultError::DivisionByZero));
    }
    let product = (amount as u128)
        .checked_mul(numerator as u128)
        .ok_or(error!(VaultError::MathOverflow))?;
    let result = product
        .checked_add(denominator as u128 - 1)
        .ok_or(error!(VaultError::MathOverflow))?
        / (denominator as u128);

    u64::try_from(result).map_err(|_| error!(VaultError::MathOverflow))
}

/// Apply a basis-points rate to an amount
pub fn apply_bp(amount: u64, bp: u16) -> Result<u64> {
    mul_div(amount, bp as u64, BASIS_POINTS_100_PERCENT as u64)
}

/// Convert a derivative-token amount to base-asset terms using a p32 price
pub fn token_amount_to_base_value(token_amount: u64, price_p32: u64) -> Result<u64> {
    mul_div(token_amount, price_p32, TWO_POW_32)
}

/// Convert a base-asset value to a derivative-token amount using a p32 price
pub fn base_value_to_token_amount(base_value: u64, price_p32: u64) -> Result<u64> {
    mul_div(base_value, TWO_POW_32, price_p32)
}

/// Like [`base_value_to_token_amount`] but rounded up, so redeeming the
/// resulting token amount covers at least `base_value`
pub fn base_value_to_token_amount_ceil(base_value: u64, price_p32: u64) -> Result<u64> {
    mul_div_ceil(base_value, TWO_POW_32, price_p32)
}

/// True when a pushed price or oracle rate is older than
/// [`MAX_PRICE_AGE_SECONDS`]
pub fn price_is_stale(now_ts: u64, price_timestamp: u64) -> bool {
    now_ts.saturating_sub(price_timestamp) > MAX_PRICE_AGE_SECONDS
}

/// Reject prices and oracle rates older than [`MAX_PRICE_AGE_SECONDS`]
pub fn check_price_not_stale(price_timestamp: u64) -> Result<()> {
    let now_ts = Clock::get()?.unix_timestamp as u64;
    require!(
        !price_is_stale(now_ts, price_timestamp),
        VaultError::StalePrice
    );
    Ok(())
}
