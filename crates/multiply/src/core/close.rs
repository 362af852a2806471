//! Position closer: size a full exit into the debt asset or the collateral
//! asset. Neither path goes through the dispatcher.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::errors::MultiplyError;
use crate::types::{CloseParams, CloseToDebtFees, MarketParams, VaultInfo};

use super::math::{checked_add, checked_div, checked_mul, checked_sub, ensure_feasible};

/// Sell all collateral for the debt asset.
///
/// A straight sale: nothing is borrowed, so no flash-loan fee applies and
/// `required_debt` is always zero.
pub fn get_close_to_dai_params(
    market: &MarketParams,
    vault: &VaultInfo,
    fees: CloseToDebtFees,
) -> Result<CloseParams, MultiplyError> {
    market.validate()?;
    vault.validate()?;

    const CTX: &str = "close to debt asset";
    let one = Decimal::ONE;
    let gross = checked_mul(vault.current_collateral, market.market_price, CTX)?;
    let to_token_amount = match fees {
        CloseToDebtFees::SwapDeducted => {
            checked_mul(gross, checked_sub(one, market.oazo_fee, CTX)?, CTX)?
        }
        CloseToDebtFees::SaleOnly => gross,
    };
    let min_to_token_amount =
        checked_mul(to_token_amount, checked_sub(one, market.slippage, CTX)?, CTX)?;

    if min_to_token_amount < vault.current_debt {
        warn!(
            min_proceeds = %min_to_token_amount,
            debt = %vault.current_debt,
            "worst-case sale proceeds do not cover outstanding debt"
        );
    }

    debug!(
        fees = fees.as_str(),
        from = %vault.current_collateral,
        to = %to_token_amount,
        min_to = %min_to_token_amount,
        "sized close to debt asset"
    );

    Ok(CloseParams {
        from_token_amount: vault.current_collateral,
        to_token_amount,
        min_to_token_amount,
        borrow_collateral: vault.current_collateral,
        required_debt: Decimal::ZERO,
        withdraw_collateral: Decimal::ZERO,
        skip_flash_loan: false,
    })
}

/// Sell just enough collateral to repay the debt and hand back the rest.
///
/// `price_buffer` inflates the debt to tolerate a stale figure. The flash
/// loan is skipped when the vault's collateral, taken at `min_coll_ratio`
/// leverage, already exceeds what has to be sold.
pub fn get_close_to_collateral_params(
    market: &MarketParams,
    vault: &VaultInfo,
    price_buffer: Decimal,
) -> Result<CloseParams, MultiplyError> {
    market.validate()?;
    vault.validate()?;

    const CTX: &str = "close to collateral";
    let one = Decimal::ONE;
    let required_amount = checked_mul(
        checked_mul(vault.current_debt, price_buffer, CTX)?,
        checked_add(one, market.oazo_fee, CTX)?,
        CTX,
    )?;
    let max_coll_needed = checked_div(
        required_amount,
        checked_mul(
            market.market_price,
            checked_add(one, market.slippage, CTX)?,
            CTX,
        )?,
        "close to collateral: execution price",
    )?;

    let coverable = checked_div(
        vault.current_collateral,
        vault.min_coll_ratio,
        "close to collateral: min collateralization ratio",
    )?;
    let skip_flash_loan = coverable > max_coll_needed;

    let to_token_amount = checked_div(
        required_amount,
        checked_sub(one, market.slippage, CTX)?,
        "close to collateral: slippage of 100%",
    )?;
    let withdraw_collateral = ensure_feasible(
        "withdraw_collateral",
        checked_sub(vault.current_collateral, max_coll_needed, CTX)?,
    )
    .inspect_err(|e| warn!(error = %e, "collateral does not cover outstanding debt"))?;

    if skip_flash_loan {
        info!(
            coverable = %coverable,
            needed = %max_coll_needed,
            "vault collateral covers repayment, skipping flash loan"
        );
    }

    Ok(CloseParams {
        from_token_amount: max_coll_needed,
        to_token_amount,
        min_to_token_amount: required_amount,
        borrow_collateral: Decimal::ZERO,
        required_debt: if skip_flash_loan {
            Decimal::ZERO
        } else {
            required_amount
        },
        withdraw_collateral,
        skip_flash_loan,
    })
}
