use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unsigned output of one Delta Solver invocation.
///
/// `debt` and `collateral` are magnitudes; the dispatcher decides the sign.
/// Both fees are denominated in debt-asset units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolvedDeltas {
    pub debt: Decimal,
    pub collateral: Decimal,
    pub oazo_fee: Decimal,
    pub loan_fee: Decimal,
}

/// Final answer of `get_multiply_params`.
///
/// Deltas are signed: positive means the position grows (debt borrowed,
/// collateral bought), negative means it shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplyResult {
    #[serde(with = "rust_decimal::serde::str")]
    pub debt_delta: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub collateral_delta: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub oazo_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub loan_fee: Decimal,
    #[serde(rename = "skip_fl")]
    pub skip_flash_loan: bool,
}
