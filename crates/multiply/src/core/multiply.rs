//! Position adjustment dispatcher.
//!
//! Infers the adjustment mode from the desired state, routes it through the
//! flash-loan skip heuristic in the matching direction, rejects infeasible
//! magnitudes and applies the sign convention.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::errors::MultiplyError;
use crate::types::{DesiredCdpState, MarketParams, MultiplyResult, VaultInfo};

use super::flash_loan::{plan_decrease, plan_increase, FlashLoanPlan};
use super::math::{collateralization_ratio, ensure_feasible};

/// Which of the four mutually exclusive branches a request falls into,
/// in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustMode {
    /// Collateral or debt asset is being taken out.
    Withdraw,
    /// Collateral or debt asset is being put in.
    Deposit,
    /// Ratio-only request above the current ratio.
    RaiseRatio,
    /// Ratio-only request at or below the current ratio.
    LowerRatio,
}

impl AdjustMode {
    pub fn direction(self) -> AdjustDirection {
        match self {
            Self::Withdraw | Self::RaiseRatio => AdjustDirection::Decrease,
            Self::Deposit | Self::LowerRatio => AdjustDirection::Increase,
        }
    }
}

/// Direction of the solve. Owns the sign convention so the solver only ever
/// deals in magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustDirection {
    Increase,
    Decrease,
}

impl AdjustDirection {
    fn plan(
        self,
        market: &MarketParams,
        vault: &VaultInfo,
        desired: &DesiredCdpState,
    ) -> Result<FlashLoanPlan, MultiplyError> {
        match self {
            Self::Increase => plan_increase(market, vault, desired),
            Self::Decrease => plan_decrease(market, vault, desired),
        }
    }

    /// Attach this direction's sign to a solved magnitude.
    pub fn signed(self, magnitude: Decimal) -> Decimal {
        match self {
            Self::Increase => magnitude,
            Self::Decrease => -magnitude,
        }
    }
}

/// Collateral value over debt at the oracle price.
pub fn current_coll_ratio(
    market: &MarketParams,
    vault: &VaultInfo,
) -> Result<Decimal, MultiplyError> {
    collateralization_ratio(
        vault.collateral_value(market.oracle_price)?,
        vault.current_debt,
        "current collateralization ratio: zero debt",
    )
}

/// Pick the branch for this request. Only the ratio-only branches need the
/// current ratio, so a zero-debt vault can still deposit or withdraw.
pub fn select_mode(
    market: &MarketParams,
    vault: &VaultInfo,
    desired: &DesiredCdpState,
) -> Result<AdjustMode, MultiplyError> {
    if desired.is_withdrawal() {
        return Ok(AdjustMode::Withdraw);
    }
    if desired.is_deposit() {
        return Ok(AdjustMode::Deposit);
    }

    let current = current_coll_ratio(market, vault)?;
    if current < desired.required_coll_ratio {
        Ok(AdjustMode::RaiseRatio)
    } else {
        Ok(AdjustMode::LowerRatio)
    }
}

/// Size the debt and collateral movements that take `vault` to `desired`.
pub fn get_multiply_params(
    market: &MarketParams,
    vault: &VaultInfo,
    desired: &DesiredCdpState,
) -> Result<MultiplyResult, MultiplyError> {
    market.validate()?;
    vault.validate()?;
    desired.validate()?;

    let mode = select_mode(market, vault, desired)?;
    let direction = mode.direction();
    debug!(?mode, ?direction, target = %desired.required_coll_ratio, "adjusting position");

    let plan = direction.plan(market, vault, desired)?;
    let debt = ensure_feasible("debt_delta", plan.deltas.debt).inspect_err(|e| {
        warn!(?mode, error = %e, "no feasible adjustment for requested target");
    })?;
    let collateral = ensure_feasible("collateral_delta", plan.deltas.collateral).inspect_err(|e| {
        warn!(?mode, error = %e, "no feasible adjustment for requested target");
    })?;

    Ok(MultiplyResult {
        debt_delta: direction.signed(debt),
        collateral_delta: direction.signed(collateral),
        oazo_fee: plan.deltas.oazo_fee,
        loan_fee: plan.deltas.loan_fee,
        skip_flash_loan: plan.skip_flash_loan,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn market() -> MarketParams {
        MarketParams::new(dec!(3000), dec!(3000), dec!(0), dec!(0.5), dec!(0))
    }

    fn vault() -> VaultInfo {
        VaultInfo::new(dec!(10), dec!(10000), dec!(1.5))
    }

    // -----------------------------------------------------------------------
    // Reference scenarios
    // -----------------------------------------------------------------------

    #[test]
    fn test_increase_pays_flash_loan_fee() {
        let result =
            get_multiply_params(&market(), &vault(), &DesiredCdpState::with_ratio(dec!(1.5)))
                .unwrap();
        assert_eq!(result.oazo_fee, Decimal::ZERO);
        assert_eq!(result.loan_fee, dec!(6000));
        assert!(!result.skip_flash_loan);
        assert_eq!(result.debt_delta, dec!(12000));
        assert_eq!(result.collateral_delta, dec!(4));
    }

    #[test]
    fn test_increase_skips_flash_loan() {
        let result =
            get_multiply_params(&market(), &vault(), &DesiredCdpState::with_ratio(dec!(2.5)))
                .unwrap();
        assert_eq!(result.oazo_fee, Decimal::ZERO);
        assert_eq!(result.loan_fee, Decimal::ZERO);
        assert!(result.skip_flash_loan);
    }

    #[test]
    fn test_ratio_above_current_selects_decrease() {
        let desired = DesiredCdpState::with_ratio(dec!(5));
        assert_eq!(
            select_mode(&market(), &vault(), &desired).unwrap(),
            AdjustMode::RaiseRatio
        );

        let result = get_multiply_params(&market(), &vault(), &desired).unwrap();
        assert!(result.debt_delta <= Decimal::ZERO);
        assert!(result.collateral_delta <= Decimal::ZERO);
        assert_eq!(result.oazo_fee, Decimal::ZERO);
        assert_ne!(result.loan_fee, dec!(2500));
        assert_eq!(result.debt_delta, dec!(-5000));
    }

    #[test]
    fn test_zero_debt_current_ratio_is_singular() {
        let empty = VaultInfo::new(dec!(10), Decimal::ZERO, dec!(1.5));
        let err = current_coll_ratio(&market(), &empty).unwrap_err();
        assert!(matches!(err, MultiplyError::DivisionBySingularity { .. }));

        let err = get_multiply_params(&market(), &empty, &DesiredCdpState::with_ratio(dec!(2)))
            .unwrap_err();
        assert!(matches!(err, MultiplyError::DivisionBySingularity { .. }));
    }

    // -----------------------------------------------------------------------
    // Mode selection
    // -----------------------------------------------------------------------

    #[test]
    fn test_withdraw_takes_precedence_over_deposit() {
        let desired = DesiredCdpState::with_ratio(dec!(2))
            .providing(dec!(1), Decimal::ZERO)
            .withdrawing(Decimal::ZERO, dec!(100));
        assert_eq!(
            select_mode(&market(), &vault(), &desired).unwrap(),
            AdjustMode::Withdraw
        );
    }

    #[test]
    fn test_deposit_mode_on_zero_debt_vault() {
        let empty = VaultInfo::new(dec!(10), Decimal::ZERO, dec!(1.5));
        let desired = DesiredCdpState::with_ratio(dec!(2)).providing(dec!(1), Decimal::ZERO);
        assert_eq!(
            select_mode(&market(), &empty, &desired).unwrap(),
            AdjustMode::Deposit
        );
        let result = get_multiply_params(&market(), &empty, &desired).unwrap();
        assert!(result.debt_delta > Decimal::ZERO);
        assert!(result.collateral_delta > Decimal::ZERO);
    }

    #[test]
    fn test_equal_ratio_selects_increase() {
        let desired = DesiredCdpState::with_ratio(dec!(3));
        assert_eq!(
            select_mode(&market(), &vault(), &desired).unwrap(),
            AdjustMode::LowerRatio
        );
        let result = get_multiply_params(&market(), &vault(), &desired).unwrap();
        assert_eq!(result.debt_delta, Decimal::ZERO);
        assert_eq!(result.collateral_delta, Decimal::ZERO);
    }

    #[test]
    fn test_withdraw_negates_deltas() {
        let desired = DesiredCdpState::with_ratio(dec!(3)).withdrawing(dec!(1), Decimal::ZERO);
        let result = get_multiply_params(&market(), &vault(), &desired).unwrap();
        assert!(result.debt_delta < Decimal::ZERO);
        assert!(result.collateral_delta < Decimal::ZERO);
        assert!(result.oazo_fee >= Decimal::ZERO);
        assert!(result.loan_fee >= Decimal::ZERO);
    }

    #[test]
    fn test_direction_sign_convention() {
        assert_eq!(AdjustDirection::Increase.signed(dec!(2)), dec!(2));
        assert_eq!(AdjustDirection::Decrease.signed(dec!(2)), dec!(-2));
        assert_eq!(AdjustMode::Withdraw.direction(), AdjustDirection::Decrease);
        assert_eq!(AdjustMode::Deposit.direction(), AdjustDirection::Increase);
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    #[test]
    fn test_unreachable_deposit_target_is_infeasible() {
        let desired = DesiredCdpState::with_ratio(dec!(5)).providing(dec!(1), Decimal::ZERO);
        let err = get_multiply_params(&market(), &vault(), &desired).unwrap_err();
        assert!(matches!(
            err,
            MultiplyError::InfeasibleSolution {
                quantity: "debt_delta",
                ..
            }
        ));
        assert!(err.is_computation_error());
    }

    /// 18-decimal base units: 100k collateral tokens against 150M debt tokens.
    fn base_units(tokens: i128) -> Decimal {
        Decimal::from_i128_with_scale(tokens * 10i128.pow(18), 0)
    }

    #[test]
    fn test_base_unit_amounts_solve_without_overflow() {
        let market = MarketParams::new(dec!(3000), dec!(3000), dec!(0.002), dec!(0.0009), dec!(0.01));
        let vault = VaultInfo::new(base_units(100_000), base_units(150_000_000), dec!(1.5));
        let desired = DesiredCdpState::with_ratio(dec!(1.7));

        let result = get_multiply_params(&market, &vault, &desired).unwrap();
        assert!(result.debt_delta > Decimal::ZERO);
        assert!(!result.skip_flash_loan);

        let final_value = (vault.current_collateral + result.collateral_delta) * market.oracle_price;
        let final_debt = vault.current_debt + result.debt_delta + result.loan_fee;
        assert!((final_value / final_debt - dec!(1.7)).abs() < dec!(0.000000001));
    }

    #[test]
    fn test_amounts_beyond_decimal_range_return_error() {
        // 1e26 collateral at 3000 is worth 3e29, past Decimal::MAX (~7.9e28).
        let market = MarketParams::new(dec!(3000), dec!(3000), dec!(0.002), dec!(0.0009), dec!(0.01));
        let vault = VaultInfo::new(base_units(100_000_000), base_units(150_000_000), dec!(1.5));

        let err = get_multiply_params(&market, &vault, &DesiredCdpState::with_ratio(dec!(1.7)))
            .unwrap_err();
        assert!(matches!(err, MultiplyError::ArithmeticOverflow { .. }));
        assert!(err.is_computation_error());

        let desired = DesiredCdpState::with_ratio(dec!(1.7)).providing(dec!(1), Decimal::ZERO);
        let err = get_multiply_params(&market, &vault, &desired).unwrap_err();
        assert!(matches!(err, MultiplyError::ArithmeticOverflow { .. }));
    }

    #[test]
    fn test_invalid_market_rejected_before_solving() {
        let bad = MarketParams {
            oracle_price: Decimal::ZERO,
            ..market()
        };
        let err = get_multiply_params(&bad, &vault(), &DesiredCdpState::with_ratio(dec!(2)))
            .unwrap_err();
        assert!(matches!(err, MultiplyError::InvalidInput { .. }));
        assert!(!err.is_computation_error());
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    #[test]
    fn test_skip_flag_flips_once_as_target_rises() {
        let mut seen_skip = false;
        let mut target = dec!(1.5);
        while target < dec!(3) {
            let result =
                get_multiply_params(&market(), &vault(), &DesiredCdpState::with_ratio(target))
                    .unwrap();
            if seen_skip {
                assert!(result.skip_flash_loan, "skip flipped back at target {target}");
            }
            seen_skip |= result.skip_flash_loan;
            target += dec!(0.05);
        }
        assert!(seen_skip);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let market = MarketParams::new(dec!(1850.5), dec!(1852), dec!(0.002), dec!(0.0009), dec!(0.005));
        let vault = VaultInfo::new(dec!(42.5), dec!(31000), dec!(1.45));
        let desired = DesiredCdpState::with_ratio(dec!(1.8));
        let a = get_multiply_params(&market, &vault, &desired).unwrap();
        let b = get_multiply_params(&market, &vault, &desired).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.debt_delta.serialize(), b.debt_delta.serialize());
    }

    proptest! {
        #[test]
        fn fees_non_negative_and_zero_loan_fee_when_skipped(
            collateral in 1u64..1_000u64,
            debt in 100u64..1_000_000u64,
            price in 100u64..10_000u64,
            target_bps in 11_000u32..60_000u32,
            oazo_bps in 0u32..100u32,
            flash_bps in 0u32..100u32,
            slippage_bps in 0u32..300u32,
        ) {
            let market = MarketParams::new(
                Decimal::from(price),
                Decimal::from(price),
                Decimal::from(oazo_bps) / dec!(10000),
                Decimal::from(flash_bps) / dec!(10000),
                Decimal::from(slippage_bps) / dec!(10000),
            );
            let vault = VaultInfo::new(Decimal::from(collateral), Decimal::from(debt), dec!(1.1));
            let desired = DesiredCdpState::with_ratio(Decimal::from(target_bps) / dec!(10000));

            if let Ok(result) = get_multiply_params(&market, &vault, &desired) {
                prop_assert!(result.oazo_fee >= Decimal::ZERO);
                prop_assert!(result.loan_fee >= Decimal::ZERO);
                if result.skip_flash_loan {
                    prop_assert_eq!(result.loan_fee, Decimal::ZERO);
                }
            }
        }

        #[test]
        fn increase_lands_on_target_ratio(
            collateral in 1u64..1_000u64,
            price in 100u64..10_000u64,
            current_ratio_bps in 20_000u32..50_000u32,
            target_bps in 12_000u32..19_999u32,
            oazo_bps in 0u32..50u32,
            flash_bps in 0u32..50u32,
            slippage_bps in 0u32..200u32,
        ) {
            let oracle_price = Decimal::from(price);
            let market = MarketParams::new(
                oracle_price,
                oracle_price,
                Decimal::from(oazo_bps) / dec!(10000),
                Decimal::from(flash_bps) / dec!(10000),
                Decimal::from(slippage_bps) / dec!(10000),
            );
            let collateral = Decimal::from(collateral);
            let debt = collateral * oracle_price * dec!(10000) / Decimal::from(current_ratio_bps);
            let vault = VaultInfo::new(collateral, debt, dec!(1.1));
            let target = Decimal::from(target_bps) / dec!(10000);

            let result = get_multiply_params(&market, &vault, &DesiredCdpState::with_ratio(target)).unwrap();
            prop_assert!(result.debt_delta > Decimal::ZERO);

            let final_value = (collateral + result.collateral_delta) * oracle_price;
            let final_debt = debt + result.debt_delta + result.loan_fee;
            let achieved = final_value / final_debt;
            prop_assert!((achieved - target).abs() < dec!(0.000000001), "achieved {} vs target {}", achieved, target);
        }
    }
}
