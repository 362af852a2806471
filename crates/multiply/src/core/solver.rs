//! Delta Solver: closed-form sizing of a leverage adjustment.
//!
//! Both directions solve one linear equation for the flash-borrowed debt
//! amount `X` that lands the position exactly on the target ratio.
//!
//! **Increase** (borrow `X`, buy collateral at `mp·(1+s)` after the `OF` cut):
//!
//! ```text
//! (C + X·(1−OF)/mps)·P = r·(D + X·(1+FF))
//! X = (r·D − C·P) / ((1−OF)·P/mps − r·(1+FF))             mps = mp·(1+s)
//! ```
//!
//! **Decrease** (repay `X`, sell enough collateral at `mp·(1−s)` to cover the
//! flash loan, its fee and `OF`):
//!
//! ```text
//! (C − X·(1+OF)·(1+FF)/mps)·P = r·(D − X)
//! X = (C·P − r·D) / ((1+OF)·(1+FF)·P/mps − r)             mps = mp·(1−s)
//! ```
//!
//! Every step is checked: a zero divisor or a value outside the `Decimal`
//! range is an error, never a panic.
//!
//! Results are raw magnitudes. A negative magnitude means the target is not
//! reachable in this direction; rejecting it is the dispatcher's job.

use rust_decimal::Decimal;
use tracing::debug;

use crate::errors::MultiplyError;
use crate::types::{MarketParams, SolvedDeltas};

use super::math::{checked_add, checked_div, checked_mul, checked_sub};

/// Net balances the solver works from.
///
/// Deposits and withdrawals are already folded into `collateral` and `debt`
/// by the caller; `provided_debt` is carried for tracing only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverInputs {
    pub collateral: Decimal,
    pub debt: Decimal,
    pub target_ratio: Decimal,
    pub provided_debt: Decimal,
}

/// Solve for the debt to borrow and collateral to buy.
pub fn solve_increase(
    market: &MarketParams,
    inputs: &SolverInputs,
) -> Result<SolvedDeltas, MultiplyError> {
    const CTX: &str = "increase solver";
    let one = Decimal::ONE;
    let net_of_fee = checked_sub(one, market.oazo_fee, CTX)?;
    let price_with_slippage = checked_mul(
        market.market_price,
        checked_add(one, market.slippage, CTX)?,
        CTX,
    )?;

    // r·D − C·P: how far the debt side is short of the target.
    let value_gap = checked_sub(
        checked_mul(inputs.target_ratio, inputs.debt, CTX)?,
        checked_mul(inputs.collateral, market.oracle_price, CTX)?,
        CTX,
    )?;
    // Oracle value of the collateral bought per unit of debt borrowed.
    let bought_per_debt = checked_div(
        checked_mul(net_of_fee, market.oracle_price, CTX)?,
        price_with_slippage,
        "increase execution price",
    )?;
    let borrow_cost = checked_mul(
        inputs.target_ratio,
        checked_add(one, market.flash_loan_fee, CTX)?,
        CTX,
    )?;
    let denominator = checked_sub(bought_per_debt, borrow_cost, CTX)?;

    let debt = checked_div(value_gap, denominator, "increase solver denominator")?;
    let collateral = checked_div(
        checked_mul(debt, net_of_fee, CTX)?,
        price_with_slippage,
        "increase execution price",
    )?;

    let solved = SolvedDeltas {
        debt,
        collateral,
        oazo_fee: checked_mul(debt, market.oazo_fee, CTX)?,
        loan_fee: checked_mul(debt, market.flash_loan_fee, CTX)?,
    };

    debug!(
        collateral = %inputs.collateral,
        debt = %inputs.debt,
        provided_debt = %inputs.provided_debt,
        target_ratio = %inputs.target_ratio,
        flash_loan_fee = %market.flash_loan_fee,
        debt_delta = %solved.debt,
        collateral_delta = %solved.collateral,
        oazo_fee = %solved.oazo_fee,
        loan_fee = %solved.loan_fee,
        "solved increase"
    );

    Ok(solved)
}

/// Solve for the debt to repay and collateral to sell.
pub fn solve_decrease(
    market: &MarketParams,
    inputs: &SolverInputs,
) -> Result<SolvedDeltas, MultiplyError> {
    const CTX: &str = "decrease solver";
    let one = Decimal::ONE;
    let price_with_slippage = checked_mul(
        market.market_price,
        checked_sub(one, market.slippage, CTX)?,
        CTX,
    )?;
    let loan_factor = checked_add(one, market.flash_loan_fee, CTX)?;
    let fee_factor = checked_mul(checked_add(one, market.oazo_fee, CTX)?, loan_factor, CTX)?;

    // C·P − r·D: collateral value in excess of the target.
    let value_gap = checked_sub(
        checked_mul(inputs.collateral, market.oracle_price, CTX)?,
        checked_mul(inputs.target_ratio, inputs.debt, CTX)?,
        CTX,
    )?;
    // Oracle value of the collateral sold per unit of debt repaid.
    let sold_per_debt = checked_div(
        checked_mul(fee_factor, market.oracle_price, CTX)?,
        price_with_slippage,
        "decrease execution price",
    )?;
    let denominator = checked_sub(sold_per_debt, inputs.target_ratio, CTX)?;

    let debt = checked_div(value_gap, denominator, "decrease solver denominator")?;
    let collateral = checked_div(
        checked_mul(debt, fee_factor, CTX)?,
        price_with_slippage,
        "decrease execution price",
    )?;

    // The sale grosses X·(1+FF) for the flash loan plus OF on top of that.
    let solved = SolvedDeltas {
        debt,
        collateral,
        oazo_fee: checked_mul(checked_mul(debt, loan_factor, CTX)?, market.oazo_fee, CTX)?,
        loan_fee: checked_mul(debt, market.flash_loan_fee, CTX)?,
    };

    debug!(
        collateral = %inputs.collateral,
        debt = %inputs.debt,
        target_ratio = %inputs.target_ratio,
        flash_loan_fee = %market.flash_loan_fee,
        debt_delta = %solved.debt,
        collateral_delta = %solved.collateral,
        oazo_fee = %solved.oazo_fee,
        loan_fee = %solved.loan_fee,
        "solved decrease"
    );

    Ok(solved)
}
