// Constants for the Strategy Vault program

/// Seed for the global vault state PDA
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for the vault authority PDA (owns the pooled asset token accounts)
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";

/// Seed for per-(base mint, yield source) strategy state PDAs
pub const STRATEGY_SEED: &[u8] = b"strategy";

/// Seed for the per-strategy authority PDA (owns the strategy token accounts)
pub const STRATEGY_AUTHORITY_SEED: &[u8] = b"strategy_authority";

/// Seed for per-(strategy, account) investment record PDAs
pub const INVESTMENT_SEED: &[u8] = b"investment";

/// Seed for per-(account, mint) vault balance PDAs
pub const USER_BALANCE_SEED: &[u8] = b"user_balance";

/// Seed for yield source state PDAs
pub const YIELD_SOURCE_SEED: &[u8] = b"yield_source";

/// Seed for the per-yield-source authority PDA (reserve owner and mint authority)
pub const YIELD_AUTHORITY_SEED: &[u8] = b"yield_authority";

/// Seed for the yield source's derivative token mint PDA
pub const YIELD_MINT_SEED: &[u8] = b"yield_mint";

/// Seed for per-(token in, token out) price oracle PDAs
pub const ORACLE_SEED: &[u8] = b"oracle";

/// Seed for the swap connector authority PDA (owns the connector liquidity pools)
pub const SWAP_AUTHORITY_SEED: &[u8] = b"swap_authority";

/// 32-bit fixed-point precision for derivative-token prices and oracle rates.
/// A price of exactly 1.0 base per token is stored as 2^32.
pub const TWO_POW_32: u64 = 0x1_0000_0000;

/// Basis-point denominator for the protocol fee and slippage bounds
pub const BASIS_POINTS_100_PERCENT: u16 = 10_000;

/// Maximum age of a pushed price or oracle rate before reads reject it as stale
pub const MAX_PRICE_AGE_SECONDS: u64 = 60 * 60 * 24;
