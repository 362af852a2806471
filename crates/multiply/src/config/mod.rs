pub mod types;
pub mod validate;

pub use types::*;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::types::CloseToDebtFees;

/// Load and merge the config JSON files into a single [`MultiplyConfig`],
/// then apply environment variable overrides and validate.
///
/// Expected directory layout:
/// ```text
/// config/
///   app.json
///   multiply.json   (optional, engine defaults otherwise)
/// ```
///
/// # Environment variable overrides
///
/// | Env Var                                 | Config Field                         |
/// |-----------------------------------------|--------------------------------------|
/// | `MULTIPLY_CLOSE_PRICE_BUFFER`           | `engine.close_price_buffer`          |
/// | `MULTIPLY_CLOSE_TO_COLLATERAL_ENABLED`  | `engine.close_to_collateral_enabled` |
/// | `MULTIPLY_CLOSE_TO_DEBT_FEES`           | `engine.close_to_debt_fees`          |
/// | `MULTIPLY_LOG_DIR`                      | `app.logging.log_dir`                |
pub fn load_config(config_dir: &Path) -> Result<MultiplyConfig> {
    let read = |name: &str| -> Result<String> {
        let path = config_dir.join(name);
        std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))
    };

    let app: AppConfig =
        serde_json::from_str(&read("app.json")?).context("parsing app.json")?;

    // Engine config is optional.
    let engine: EngineConfig = match read("multiply.json") {
        Ok(contents) => serde_json::from_str(&contents).context("parsing multiply.json")?,
        Err(_) => EngineConfig::default(),
    };

    let mut config = MultiplyConfig {
        app,
        engine,
        env_overrides: Vec::new(),
    };

    apply_env_overrides(&mut config);
    validate::validate_config(&config)?;

    Ok(config)
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides to the loaded config.
///
/// Only non-empty env vars take effect. Parse failures are skipped (the JSON
/// value remains). Applied keys are recorded in `env_overrides`.
fn apply_env_overrides(config: &mut MultiplyConfig) {
    if let Some(val) = env_decimal("MULTIPLY_CLOSE_PRICE_BUFFER") {
        config.engine.close_price_buffer = val;
        config.env_overrides.push("MULTIPLY_CLOSE_PRICE_BUFFER");
    }

    if let Some(val) = env_bool("MULTIPLY_CLOSE_TO_COLLATERAL_ENABLED") {
        config.engine.close_to_collateral_enabled = val;
        config.env_overrides.push("MULTIPLY_CLOSE_TO_COLLATERAL_ENABLED");
    }

    if let Some(val) = env_parse::<CloseToDebtFees>("MULTIPLY_CLOSE_TO_DEBT_FEES") {
        config.engine.close_to_debt_fees = val;
        config.env_overrides.push("MULTIPLY_CLOSE_TO_DEBT_FEES");
    }

    if let Some(val) = env_string("MULTIPLY_LOG_DIR") {
        config.app.logging.log_dir = val;
        config.env_overrides.push("MULTIPLY_LOG_DIR");
    }
}

/// Read a non-empty env var as a `String`.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Read a non-empty env var as a bool (`true`, `1`, `yes` → true).
fn env_bool(key: &str) -> Option<bool> {
    env_string(key).map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
}

/// Read a non-empty env var and parse it as `T`.
fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|v| v.parse().ok())
}

/// Read a non-empty env var and parse it as `Decimal`.
fn env_decimal(key: &str) -> Option<Decimal> {
    env_string(key).and_then(|v| Decimal::from_str(&v).ok())
}
