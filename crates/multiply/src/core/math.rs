//! Checked decimal helpers shared by the solver, skip heuristic and closer.

use rust_decimal::Decimal;

use crate::errors::MultiplyError;

/// Divide, refusing a zero divisor.
///
/// A quotient too large for `Decimal` is reported the same way: it only
/// happens when the divisor is vanishingly small relative to the numerator.
pub fn checked_div(
    numerator: Decimal,
    denominator: Decimal,
    context: &'static str,
) -> Result<Decimal, MultiplyError> {
    if denominator.is_zero() {
        return Err(MultiplyError::DivisionBySingularity { context });
    }
    numerator
        .checked_div(denominator)
        .ok_or(MultiplyError::DivisionBySingularity { context })
}

/// Multiply, reporting a product outside the `Decimal` range.
pub fn checked_mul(a: Decimal, b: Decimal, context: &'static str) -> Result<Decimal, MultiplyError> {
    a.checked_mul(b)
        .ok_or(MultiplyError::ArithmeticOverflow { context })
}

pub fn checked_add(a: Decimal, b: Decimal, context: &'static str) -> Result<Decimal, MultiplyError> {
    a.checked_add(b)
        .ok_or(MultiplyError::ArithmeticOverflow { context })
}

pub fn checked_sub(a: Decimal, b: Decimal, context: &'static str) -> Result<Decimal, MultiplyError> {
    a.checked_sub(b)
        .ok_or(MultiplyError::ArithmeticOverflow { context })
}

/// Collateralization ratio: collateral value over debt, both in debt-asset units.
pub fn collateralization_ratio(
    collateral_value: Decimal,
    debt: Decimal,
    context: &'static str,
) -> Result<Decimal, MultiplyError> {
    checked_div(collateral_value, debt, context)
}

/// Reject a negative solved magnitude.
pub fn ensure_feasible(quantity: &'static str, value: Decimal) -> Result<Decimal, MultiplyError> {
    if value < Decimal::ZERO {
        return Err(MultiplyError::InfeasibleSolution { quantity, value });
    }
    Ok(value)
}
