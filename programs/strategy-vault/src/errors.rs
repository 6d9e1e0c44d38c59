use anchor_lang::prelude::*;

/// Custom error codes for the Strategy Vault program
///
/// Security: Descriptive error messages without information leakage
#[error_code]
pub enum VaultError {
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Insufficient vault balance for this account and asset")]
    InsufficientBalance,

    #[msg("Exit requests more shares than the account holds")]
    InsufficientShares,

    #[msg("Output amount moved beyond the configured slippage bound")]
    SlippageExceeded,

    #[msg("Token is not supported for this operation")]
    UnsupportedToken,

    #[msg("Yield source or swap connector call did not complete as expected")]
    ExternalCallFailure,

    #[msg("Math overflow occurred during calculation")]
    MathOverflow,

    #[msg("Cannot divide by zero")]
    DivisionByZero,

    #[msg("Invalid token mint for this account")]
    InvalidMint,

    #[msg("Invalid token account owner")]
    InvalidOwner,

    #[msg("Unauthorized - only the configured authority can perform this action")]
    Unauthorized,

    #[msg("Pushed price or oracle rate is stale")]
    StalePrice,

    #[msg("Price or rate must be greater than zero")]
    InvalidPrice,

    #[msg("Fee or slippage rate exceeds 100 percent")]
    InvalidFeeRate,

    #[msg("Exit request ratio must be between 1 and 10000 basis points")]
    InvalidExitRequest,
}
