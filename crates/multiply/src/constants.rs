use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Close-out
// ---------------------------------------------------------------------------

/// Headroom applied to outstanding debt when closing, so that a debt figure
/// read a few blocks ago still gets fully repaid.
pub const DEFAULT_CLOSE_PRICE_BUFFER: Decimal = dec!(1.00001);

pub const DEFAULT_CLOSE_TO_COLLATERAL_ENABLED: bool = true;

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

pub const DEFAULT_LOG_DIR: &str = "logs";

pub const DEFAULT_LOG_FILE_PREFIX: &str = "multiply.log";

/// Default `EnvFilter` directive when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "multiply_calc=info,warn";
