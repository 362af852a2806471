use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{error, info};

use multiply_calc::config;
use multiply_calc::logging;
use multiply_calc::{DesiredCdpState, MarketParams, MultiplyCalculator, VaultInfo};

/// One calculation read from the request file.
#[derive(Debug, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
enum Request {
    Multiply {
        market: MarketParams,
        vault: VaultInfo,
        desired: DesiredCdpState,
    },
    CloseToDai {
        market: MarketParams,
        vault: VaultInfo,
    },
    CloseToCollateral {
        market: MarketParams,
        vault: VaultInfo,
    },
}

fn main() -> Result<()> {
    // Load .env file (ignore if missing).
    let _ = dotenvy::dotenv();

    let request_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: multiply-calc <request.json>")?;

    // Config directory defaults to `./config`.
    let config_dir = std::env::var("MULTIPLY_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    let config = config::load_config(&config_dir)?;

    // Hold the guard for the process lifetime.
    let _guard = logging::init_tracing(&config.app.logging)?;

    for key in &config.env_overrides {
        info!(key = *key, "env override applied");
    }

    info!(
        close_price_buffer = %config.engine.close_price_buffer,
        close_to_collateral_enabled = config.engine.close_to_collateral_enabled,
        close_to_debt_fees = config.engine.close_to_debt_fees.as_str(),
        "configuration loaded"
    );

    let contents = std::fs::read_to_string(&request_path)
        .with_context(|| format!("failed to read request: {}", request_path.display()))?;
    let request: Request = serde_json::from_str(&contents).context("parsing request")?;

    let calculator = MultiplyCalculator::new(config.engine);
    let output = match &request {
        Request::Multiply {
            market,
            vault,
            desired,
        } => calculator
            .get_multiply_params(market, vault, desired)
            .map(serde_json::to_value),
        Request::CloseToDai { market, vault } => calculator
            .get_close_to_dai_params(market, vault)
            .map(serde_json::to_value),
        Request::CloseToCollateral { market, vault } => calculator
            .get_close_to_collateral_params(market, vault)
            .map(serde_json::to_value),
    };

    let value = match output {
        Ok(value) => value?,
        Err(e) => {
            error!(
                error = %e,
                computation = e.is_computation_error(),
                "calculation failed"
            );
            return Err(e).context("calculation failed");
        }
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
