//! Flash-loan skip heuristic.
//!
//! Each direction is solved once with the real flash-loan fee. If the vault's
//! own collateral would already sit above the liquidation threshold against
//! the post-trade debt, the flash loan is unnecessary: the first candidate is
//! discarded and the adjustment is re-solved with `FF = 0`. Never more than
//! two solver passes.

use tracing::info;

use crate::errors::MultiplyError;
use crate::types::{DesiredCdpState, MarketParams, SolvedDeltas, VaultInfo};

use super::math::{checked_add, checked_mul, checked_sub, collateralization_ratio};
use super::solver::{solve_decrease, solve_increase, SolverInputs};

/// Solver output together with the skip decision that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashLoanPlan {
    pub deltas: SolvedDeltas,
    pub skip_flash_loan: bool,
}

/// Increase leverage, dropping the flash loan when the existing collateral
/// covers the new debt at `min_coll_ratio`.
pub fn plan_increase(
    market: &MarketParams,
    vault: &VaultInfo,
    desired: &DesiredCdpState,
) -> Result<FlashLoanPlan, MultiplyError> {
    const CTX: &str = "increase skip check";
    let inputs = SolverInputs {
        collateral: checked_add(vault.current_collateral, desired.provided_collateral, CTX)?,
        debt: checked_sub(vault.current_debt, desired.provided_debt, CTX)?,
        target_ratio: desired.required_coll_ratio,
        provided_debt: desired.provided_debt,
    };

    let candidate = solve_increase(market, &inputs)?;

    let ratio_without_loan = collateralization_ratio(
        vault.collateral_value(market.oracle_price)?,
        checked_add(vault.current_debt, candidate.debt, CTX)?,
        "increase skip check: post-trade debt",
    )?;

    if ratio_without_loan > vault.min_coll_ratio {
        info!(
            ratio = %ratio_without_loan,
            min_coll_ratio = %vault.min_coll_ratio,
            "existing collateral covers new debt, skipping flash loan"
        );
        let deltas = solve_increase(&market.without_flash_loan_fee(), &inputs)?;
        return Ok(FlashLoanPlan {
            deltas,
            skip_flash_loan: true,
        });
    }

    Ok(FlashLoanPlan {
        deltas: candidate,
        skip_flash_loan: false,
    })
}

/// Decrease leverage, dropping the flash loan when the collateral left after
/// the sale still covers the current debt at `min_coll_ratio`.
///
/// Comparing against the pre-repayment debt is stricter than necessary, so a
/// few borderline adjustments keep a flash loan they could have done without.
pub fn plan_decrease(
    market: &MarketParams,
    vault: &VaultInfo,
    desired: &DesiredCdpState,
) -> Result<FlashLoanPlan, MultiplyError> {
    const CTX: &str = "decrease skip check";
    let inputs = SolverInputs {
        collateral: checked_sub(vault.current_collateral, desired.withdraw_collateral, CTX)?,
        debt: checked_add(vault.current_debt, desired.withdraw_debt, CTX)?,
        target_ratio: desired.required_coll_ratio,
        provided_debt: desired.provided_debt,
    };

    let candidate = solve_decrease(market, &inputs)?;

    let collateral_left = checked_sub(vault.current_collateral, candidate.collateral, CTX)?;
    let ratio_without_loan = collateralization_ratio(
        checked_mul(collateral_left, market.oracle_price, CTX)?,
        vault.current_debt,
        "decrease skip check: current debt",
    )?;

    if ratio_without_loan > vault.min_coll_ratio {
        info!(
            ratio = %ratio_without_loan,
            min_coll_ratio = %vault.min_coll_ratio,
            "remaining collateral covers current debt, skipping flash loan"
        );
        let deltas = solve_decrease(&market.without_flash_loan_fee(), &inputs)?;
        return Ok(FlashLoanPlan {
            deltas,
            skip_flash_loan: true,
        });
    }

    Ok(FlashLoanPlan {
        deltas: candidate,
        skip_flash_loan: false,
    })
}
