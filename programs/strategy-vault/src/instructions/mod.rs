pub mod create_strategy;
pub mod create_yield_source;
pub mod deposit;
pub mod exit;
pub mod initialize;
pub mod invest_idle;
pub mod join;
pub mod set_oracle_rate;
pub mod set_vault_params;
pub mod set_yield_price;
pub mod withdraw;

pub use create_strategy::*;
pub use create_yield_source::*;
pub use deposit::*;
pub use exit::*;
pub use initialize::*;
pub use invest_idle::*;
pub use join::*;
pub use set_oracle_rate::*;
pub use set_vault_params::*;
pub use set_yield_price::*;
pub use withdraw::*;
