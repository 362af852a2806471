use anyhow::{bail, Result};
use rust_decimal::Decimal;

use super::types::MultiplyConfig;

/// Validate invariants across the merged config that serde alone cannot enforce.
///
/// Called automatically by [`super::load_config`]. Every problem is collected
/// before failing so one run reports them all.
pub fn validate_config(config: &MultiplyConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    validate_app_config(config, &mut errors);
    validate_engine_config(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        let msg = format!(
            "Configuration validation failed ({} error{}):\n  - {}",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" },
            errors.join("\n  - ")
        );
        bail!("{msg}");
    }
}

fn validate_app_config(config: &MultiplyConfig, errors: &mut Vec<String>) {
    if config.app.logging.log_dir.trim().is_empty() {
        errors.push("app.logging: log_dir is empty".into());
    }
    if config.app.logging.file_prefix.trim().is_empty() {
        errors.push("app.logging: file_prefix is empty".into());
    }
}

fn validate_engine_config(config: &MultiplyConfig, errors: &mut Vec<String>) {
    let engine = &config.engine;

    // A buffer below 1 would under-repay the debt it is meant to cover.
    if engine.close_price_buffer < Decimal::ONE {
        errors.push(format!(
            "engine: close_price_buffer ({}) must be >= 1",
            engine.close_price_buffer
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&MultiplyConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = MultiplyConfig::default();
        config.app.logging.log_dir = "  ".into();
        config.app.logging.file_prefix = String::new();
        config.engine.close_price_buffer = dec!(0.999);

        let msg = validate_config(&config).unwrap_err().to_string();
        assert!(msg.contains("3 errors"));
        assert!(msg.contains("file_prefix"));
        assert!(msg.contains("log_dir"));
        assert!(msg.contains("close_price_buffer"));
    }
}
