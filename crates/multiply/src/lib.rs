//! Sizing for leveraged "multiply" positions.
//!
//! Given market and oracle prices, fee rates, a vault snapshot and a desired
//! end state, computes how much debt to borrow or repay, how much collateral
//! to buy or sell, the fees involved, and whether a flash loan can be skipped.
//! Also sizes full exits into either asset.
//!
//! Every operation is a pure function of its arguments.

pub mod config;
pub mod constants;
pub mod core;
pub mod errors;
pub mod logging;
pub mod types;

pub use crate::core::calculator::MultiplyCalculator;
pub use crate::core::multiply::get_multiply_params;
pub use errors::MultiplyError;
pub use types::{
    CloseParams, CloseToDebtFees, DesiredCdpState, MarketParams, MultiplyResult, VaultInfo,
};

/// Close into the debt asset with the default engine options.
pub fn get_close_to_dai_params(
    market: &MarketParams,
    vault: &VaultInfo,
) -> Result<CloseParams, MultiplyError> {
    MultiplyCalculator::default().get_close_to_dai_params(market, vault)
}

/// Close into the collateral asset with the default engine options.
pub fn get_close_to_collateral_params(
    market: &MarketParams,
    vault: &VaultInfo,
) -> Result<CloseParams, MultiplyError> {
    MultiplyCalculator::default().get_close_to_collateral_params(market, vault)
}
