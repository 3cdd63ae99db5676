//! Runtime context
//!
//! Wires configuration into the pieces every command needs: the contract
//! registry, the executor (prepare or execute, decided once here), the
//! read-only query client and the market data APIs. Protocol adapters
//! borrow from the context instead of owning connections themselves.

use std::time::Duration;

use crate::codec::AccountId;
use crate::config::Config;
use crate::error::{Error, Result, ValidationError};
use crate::executor::{Executor, ReadQuery};
use crate::market::{BonzoApi, SaucerSwapApi};
use crate::protocols::{
    FarmAdapter, HeliswapAdapter, LendingAdapter, RouterAdapter, StakingAdapter,
};
use crate::registry::ContractRegistry;

#[derive(Debug)]
pub struct RuntimeContext {
    pub config: Config,
    pub registry: ContractRegistry,
    pub executor: Executor,
    pub query: ReadQuery,
    saucerswap: Option<SaucerSwapApi>,
    bonzo: BonzoApi,
}

impl RuntimeContext {
    /// Build a context from configuration. Execute mode fails here,
    /// before any command runs, if the signing key is missing or bad.
    pub fn from_config(config: Config) -> Result<Self> {
        let operator: AccountId = config
            .operator_id
            .as_deref()
            .ok_or_else(|| {
                Error::Validation(ValidationError::InvalidAccountId("(unset)".to_string()))
            })?
            .parse()
            .map_err(Error::Validation)?;

        let registry = ContractRegistry::new(config.network);
        let chain_id = config.network.chain_id();

        let executor = if config.execute_tx {
            let key = config.operator_key.as_deref().unwrap_or("");
            Executor::with_signing(operator, key, config.rpc_url.clone(), chain_id)?
        } else {
            Executor::prepare(operator, config.rpc_url.clone(), chain_id)
        };

        let timeout = Duration::from_secs(config.rest_timeout_secs);
        let saucerswap = match &config.saucerswap_api_key {
            Some(key) => Some(SaucerSwapApi::new(key.clone(), config.network, timeout)?),
            None => None,
        };
        let bonzo = BonzoApi::new(config.network, timeout)?;

        Ok(Self {
            query: ReadQuery::new(config.rpc_url.clone()),
            config,
            registry,
            executor,
            saucerswap,
            bonzo,
        })
    }

    // ============================================
    // PROTOCOL ADAPTERS
    // ============================================

    pub fn lending(&self) -> LendingAdapter<'_> {
        LendingAdapter::new(self.registry, &self.executor, &self.query)
    }

    pub fn router(&self) -> RouterAdapter<'_> {
        RouterAdapter::new(self.registry, &self.executor, &self.query)
    }

    pub fn staking(&self) -> StakingAdapter<'_> {
        StakingAdapter::new(self.registry, &self.executor, &self.query)
    }

    pub fn farm(&self) -> FarmAdapter<'_> {
        FarmAdapter::new(self.registry, &self.executor)
    }

    pub fn heliswap(&self) -> HeliswapAdapter<'_> {
        HeliswapAdapter::new(self.registry, &self.query)
    }

    // ============================================
    // MARKET DATA
    // ============================================

    /// SaucerSwap REST client, or an error if no API key is configured.
    pub fn saucerswap(&self) -> Result<&SaucerSwapApi> {
        self.saucerswap.as_ref().ok_or_else(|| Error::Network {
            endpoint: "saucerswap".to_string(),
            message: "SAUCERSWAP_API_KEY is not configured".to_string(),
        })
    }

    pub fn bonzo(&self) -> &BonzoApi {
        &self.bonzo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModeError;
    use crate::registry::Network;

    fn base_config() -> Config {
        let mut config = Config::default();
        config.operator_id = Some("0.0.5792673".to_string());
        config
    }

    #[test]
    fn test_prepare_context_needs_no_key() {
        let ctx = RuntimeContext::from_config(base_config()).unwrap();
        assert!(!ctx.executor.is_execute());
        assert_eq!(ctx.registry.network(), Network::Testnet);
        assert!(ctx.saucerswap().is_err());
    }

    #[test]
    fn test_execute_context_without_key_fails() {
        let mut config = base_config();
        config.execute_tx = true;
        let err = RuntimeContext::from_config(config).unwrap_err();
        assert!(matches!(
            err,
            Error::Mode(ModeError::MissingSigningContext(_))
        ));
    }

    #[test]
    fn test_missing_operator_id_fails() {
        let config = Config::default();
        assert!(RuntimeContext::from_config(config).is_err());
    }
}
