use rust_decimal::Decimal;
use thiserror::Error;

/// Typed error hierarchy for the multiply calculator.
///
/// Computation errors use specific variants; the binary and config loader
/// wrap with `anyhow::Context` for propagation.
#[derive(Error, Debug)]
pub enum MultiplyError {
    // -- Computation --------------------------------------------------------
    /// A solved debt or collateral magnitude came out negative: no
    /// forward-direction adjustment reaches the target for these inputs.
    #[error("infeasible solution: {quantity} solved to {value}")]
    InfeasibleSolution { quantity: &'static str, value: Decimal },

    #[error("division by zero: {context}")]
    DivisionBySingularity { context: &'static str },

    /// An intermediate product or sum left the `Decimal` range.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow { context: &'static str },

    #[error("operation not implemented in this configuration: {operation}")]
    NotImplemented { operation: &'static str },

    // -- Inputs -------------------------------------------------------------
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl MultiplyError {
    /// Whether this error comes from the arithmetic itself rather than from
    /// malformed inputs or configuration.
    pub fn is_computation_error(&self) -> bool {
        matches!(
            self,
            Self::InfeasibleSolution { .. }
                | Self::DivisionBySingularity { .. }
                | Self::ArithmeticOverflow { .. }
        )
    }
}
