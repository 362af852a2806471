use tracing::warn;

use crate::config::EngineConfig;
use crate::errors::MultiplyError;
use crate::types::{CloseParams, DesiredCdpState, MarketParams, MultiplyResult, VaultInfo};

use super::{close, multiply};

/// Entry point carrying the engine options. Holds no position state: every
/// call is independent of every other.
#[derive(Debug, Clone, Default)]
pub struct MultiplyCalculator {
    config: EngineConfig,
}

impl MultiplyCalculator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn get_multiply_params(
        &self,
        market: &MarketParams,
        vault: &VaultInfo,
        desired: &DesiredCdpState,
    ) -> Result<MultiplyResult, MultiplyError> {
        multiply::get_multiply_params(market, vault, desired)
    }

    pub fn get_close_to_dai_params(
        &self,
        market: &MarketParams,
        vault: &VaultInfo,
    ) -> Result<CloseParams, MultiplyError> {
        close::get_close_to_dai_params(market, vault, self.config.close_to_debt_fees)
    }

    /// Fails with [`MultiplyError::NotImplemented`] when close-to-collateral
    /// is disabled in the engine config.
    pub fn get_close_to_collateral_params(
        &self,
        market: &MarketParams,
        vault: &VaultInfo,
    ) -> Result<CloseParams, MultiplyError> {
        if !self.config.close_to_collateral_enabled {
            warn!("close to collateral requested but disabled in config");
            return Err(MultiplyError::NotImplemented {
                operation: "get_close_to_collateral_params",
            });
        }
        close::get_close_to_collateral_params(market, vault, self.config.close_price_buffer)
    }
}
