use rust_decimal::Decimal;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_CLOSE_PRICE_BUFFER, DEFAULT_CLOSE_TO_COLLATERAL_ENABLED, DEFAULT_LOG_DIR,
    DEFAULT_LOG_FILE_PREFIX,
};
use crate::types::CloseToDebtFees;

// ---------------------------------------------------------------------------
// Top-level aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MultiplyConfig {
    pub app: AppConfig,
    pub engine: EngineConfig,
    /// Env vars that overrode a file value, in the order they were applied.
    /// Reported once tracing is up, since loading happens before it.
    #[serde(skip)]
    pub env_overrides: Vec<&'static str>,
}

// ---------------------------------------------------------------------------
// app.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: String,
    /// Prefix of the daily-rotated JSON log files.
    pub file_prefix: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: DEFAULT_LOG_DIR.to_string(),
            file_prefix: DEFAULT_LOG_FILE_PREFIX.to_string(),
            filter: None,
        }
    }
}

// ---------------------------------------------------------------------------
// multiply.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    #[serde(with = "rust_decimal::serde::str")]
    pub close_price_buffer: Decimal,
    pub close_to_collateral_enabled: bool,
    pub close_to_debt_fees: CloseToDebtFees,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            close_price_buffer: DEFAULT_CLOSE_PRICE_BUFFER,
            close_to_collateral_enabled: DEFAULT_CLOSE_TO_COLLATERAL_ENABLED,
            close_to_debt_fees: CloseToDebtFees::default(),
        }
    }
}
