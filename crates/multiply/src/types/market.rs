//! Caller-supplied value objects: prices and fees, the vault snapshot, and
//! the desired end state.
//!
//! All three are immutable inputs to a single calculation. Each carries a
//! `validate` method that the public operations call before any arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::MultiplyError;

/// Prices and fee rates for one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketParams {
    /// Protocol-reported collateral price, in debt-asset units.
    #[serde(with = "rust_decimal::serde::str")]
    pub oracle_price: Decimal,
    /// Executable swap price, in debt-asset units.
    #[serde(with = "rust_decimal::serde::str")]
    pub market_price: Decimal,
    /// Protocol fee rate charged on swap notional (`OF`).
    #[serde(with = "rust_decimal::serde::str", alias = "OF")]
    pub oazo_fee: Decimal,
    /// Flash-loan fee rate charged on borrowed notional (`FF`).
    #[serde(with = "rust_decimal::serde::str", alias = "FF")]
    pub flash_loan_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub slippage: Decimal,
}

impl MarketParams {
    pub fn new(
        oracle_price: Decimal,
        market_price: Decimal,
        oazo_fee: Decimal,
        flash_loan_fee: Decimal,
        slippage: Decimal,
    ) -> Self {
        Self {
            oracle_price,
            market_price,
            oazo_fee,
            flash_loan_fee,
            slippage,
        }
    }

    /// Copy of these params with the flash-loan fee forced to zero.
    pub fn without_flash_loan_fee(&self) -> Self {
        Self {
            flash_loan_fee: Decimal::ZERO,
            ..*self
        }
    }

    pub fn validate(&self) -> Result<(), MultiplyError> {
        ensure_positive("oracle_price", self.oracle_price)?;
        ensure_positive("market_price", self.market_price)?;
        ensure_non_negative("oazo_fee", self.oazo_fee)?;
        ensure_non_negative("flash_loan_fee", self.flash_loan_fee)?;
        ensure_non_negative("slippage", self.slippage)
    }
}

/// Snapshot of the position before the requested adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultInfo {
    #[serde(with = "rust_decimal::serde::str")]
    pub current_collateral: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub current_debt: Decimal,
    /// Liquidation threshold ratio mandated by the protocol.
    #[serde(with = "rust_decimal::serde::str")]
    pub min_coll_ratio: Decimal,
}

impl VaultInfo {
    pub fn new(current_collateral: Decimal, current_debt: Decimal, min_coll_ratio: Decimal) -> Self {
        Self {
            current_collateral,
            current_debt,
            min_coll_ratio,
        }
    }

    /// Collateral value in debt-asset units at the oracle price.
    pub fn collateral_value(&self, oracle_price: Decimal) -> Result<Decimal, MultiplyError> {
        self.current_collateral
            .checked_mul(oracle_price)
            .ok_or(MultiplyError::ArithmeticOverflow {
                context: "collateral value",
            })
    }

    pub fn validate(&self) -> Result<(), MultiplyError> {
        ensure_non_negative("current_collateral", self.current_collateral)?;
        ensure_non_negative("current_debt", self.current_debt)?;
        ensure_positive("min_coll_ratio", self.min_coll_ratio)
    }
}

/// What the caller wants the position to look like after the adjustment.
///
/// The adjustment mode is inferred from which amounts are non-zero; see
/// [`crate::core::multiply::AdjustMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredCdpState {
    #[serde(with = "rust_decimal::serde::str")]
    pub required_coll_ratio: Decimal,
    #[serde(with = "rust_decimal::serde::str", default)]
    pub provided_collateral: Decimal,
    #[serde(with = "rust_decimal::serde::str", default, alias = "provided_dai")]
    pub provided_debt: Decimal,
    #[serde(with = "rust_decimal::serde::str", default, alias = "withdraw_coll")]
    pub withdraw_collateral: Decimal,
    #[serde(with = "rust_decimal::serde::str", default, alias = "withdraw_dai")]
    pub withdraw_debt: Decimal,
}

impl DesiredCdpState {
    /// Pure ratio rebalance: nothing deposited, nothing withdrawn.
    pub fn with_ratio(required_coll_ratio: Decimal) -> Self {
        Self {
            required_coll_ratio,
            provided_collateral: Decimal::ZERO,
            provided_debt: Decimal::ZERO,
            withdraw_collateral: Decimal::ZERO,
            withdraw_debt: Decimal::ZERO,
        }
    }

    pub fn providing(self, collateral: Decimal, debt: Decimal) -> Self {
        Self {
            provided_collateral: collateral,
            provided_debt: debt,
            ..self
        }
    }

    pub fn withdrawing(self, collateral: Decimal, debt: Decimal) -> Self {
        Self {
            withdraw_collateral: collateral,
            withdraw_debt: debt,
            ..self
        }
    }

    pub fn is_withdrawal(&self) -> bool {
        self.withdraw_collateral > Decimal::ZERO || self.withdraw_debt > Decimal::ZERO
    }

    pub fn is_deposit(&self) -> bool {
        self.provided_debt > Decimal::ZERO || self.provided_collateral > Decimal::ZERO
    }

    pub fn validate(&self) -> Result<(), MultiplyError> {
        ensure_positive("required_coll_ratio", self.required_coll_ratio)?;
        ensure_non_negative("provided_collateral", self.provided_collateral)?;
        ensure_non_negative("provided_debt", self.provided_debt)?;
        ensure_non_negative("withdraw_collateral", self.withdraw_collateral)?;
        ensure_non_negative("withdraw_debt", self.withdraw_debt)
    }
}

fn ensure_positive(field: &str, value: Decimal) -> Result<(), MultiplyError> {
    if value <= Decimal::ZERO {
        return Err(MultiplyError::InvalidInput {
            reason: format!("{field} must be > 0, got {value}"),
        });
    }
    Ok(())
}

fn ensure_non_negative(field: &str, value: Decimal) -> Result<(), MultiplyError> {
    if value < Decimal::ZERO {
        return Err(MultiplyError::InvalidInput {
            reason: format!("{field} must be >= 0, got {value}"),
        });
    }
    Ok(())
}
