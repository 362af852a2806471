use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the close-to-debt-asset sale accounts for the protocol fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseToDebtFees {
    /// The swap deducts `OF` from the sale proceeds.
    #[default]
    SwapDeducted,
    /// Plain sale at market price; `OF` is not charged.
    SaleOnly,
}

impl CloseToDebtFees {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SwapDeducted => "swap_deducted",
            Self::SaleOnly => "sale_only",
        }
    }
}

impl FromStr for CloseToDebtFees {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "swap_deducted" => Ok(Self::SwapDeducted),
            "sale_only" => Ok(Self::SaleOnly),
            other => Err(format!("unknown close-to-debt fee mode: {other}")),
        }
    }
}

/// Amounts needed to fully exit a position in a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseParams {
    /// Amount of the sold token going into the swap.
    #[serde(with = "rust_decimal::serde::str")]
    pub from_token_amount: Decimal,
    /// Expected swap output.
    #[serde(with = "rust_decimal::serde::str")]
    pub to_token_amount: Decimal,
    /// Lowest swap output the transaction accepts.
    #[serde(with = "rust_decimal::serde::str")]
    pub min_to_token_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub borrow_collateral: Decimal,
    /// Debt asset to flash-borrow. Zero when the flash loan is skipped.
    #[serde(with = "rust_decimal::serde::str")]
    pub required_debt: Decimal,
    /// Collateral left over for the owner after the debt is covered.
    #[serde(with = "rust_decimal::serde::str")]
    pub withdraw_collateral: Decimal,
    #[serde(rename = "skip_fl")]
    pub skip_flash_loan: bool,
}
