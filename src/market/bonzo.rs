//! Bonzo Finance REST API (reserves, account dashboards, liquidations)

use crate::error::Result;
use crate::registry::Network;
use serde_json::Value;
use std::time::Duration;

use super::{get_json, http_client};

#[derive(Debug)]
pub struct BonzoApi {
    client: reqwest::Client,
    base_url: String,
}

impl BonzoApi {
    pub fn new(network: Network, timeout: Duration) -> Result<Self> {
        let base_url = match network {
            Network::Mainnet => "https://api.bonzo.finance/v1",
            Network::Testnet => "https://test-api.bonzo.finance/v1",
        };
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        get_json(&self.client, &url, &[], &[]).await
    }

    /// All lending/borrowing reserves.
    pub async fn reserves(&self) -> Result<Value> {
        self.get("/reserves").await
    }

    /// Positions for one account.
    pub async fn account_dashboard(&self, account_id: &str) -> Result<Value> {
        self.get(&format!("/accounts/{account_id}")).await
    }

    /// Accounts with outstanding debt eligible for liquidation.
    pub async fn liquidation_candidates(&self) -> Result<Value> {
        self.get("/accounts/debt").await
    }

    /// Protocol-level configuration.
    pub async fn protocol_config(&self) -> Result<Value> {
        self.get("/protocol").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::DEFAULT_REST_TIMEOUT;

    #[test]
    fn test_base_url_follows_network() {
        let main = BonzoApi::new(Network::Mainnet, DEFAULT_REST_TIMEOUT).unwrap();
        assert_eq!(main.base_url(), "https://api.bonzo.finance/v1");

        let test = BonzoApi::new(Network::Testnet, DEFAULT_REST_TIMEOUT).unwrap();
        assert_eq!(test.base_url(), "https://test-api.bonzo.finance/v1");
    }
}
