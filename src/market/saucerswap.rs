//! SaucerSwap REST API (token lists, platform stats, pools, farms)

use crate::error::Result;
use crate::registry::Network;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use super::{get_json, http_client};

/// Bucket width for historical platform data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformInterval {
    Hour,
    Day,
    Week,
}

impl PlatformInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformInterval::Hour => "HOUR",
            PlatformInterval::Day => "DAY",
            PlatformInterval::Week => "WEEK",
        }
    }
}

/// Which platform series to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformField {
    Liquidity,
    Volume,
}

impl PlatformField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformField::Liquidity => "LIQUIDITY",
            PlatformField::Volume => "VOLUME",
        }
    }
}

pub struct SaucerSwapApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for SaucerSwapApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never expose the API key
        f.debug_struct("SaucerSwapApi")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl SaucerSwapApi {
    pub fn new(api_key: String, network: Network, timeout: Duration) -> Result<Self> {
        let base_url = match network {
            Network::Mainnet => "https://api.saucerswap.finance",
            Network::Testnet => "https://test-api.saucerswap.finance",
        };
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        get_json(&self.client, &url, &[("x-api-key", &self.api_key)], query).await
    }

    /// All tokens with prices and metadata.
    pub async fn tokens(&self) -> Result<Value> {
        self.get("/tokens", &[]).await
    }

    /// Platform statistics: TVL, volume, SAUCE circulation.
    pub async fn stats(&self) -> Result<Value> {
        self.get("/stats", &[]).await
    }

    /// Single-sided staking statistics and the SAUCE/xSAUCE ratio.
    pub async fn sss_stats(&self) -> Result<Value> {
        self.get("/stats/sss", &[]).await
    }

    /// Historical HBAR prices between two Unix-second timestamps.
    pub async fn hbar_prices(&self, from_seconds: u64, to_seconds: u64) -> Result<Value> {
        self.get(
            "/tokens/prices/hbar",
            &[
                ("from", from_seconds.to_string()),
                ("to", to_seconds.to_string()),
            ],
        )
        .await
    }

    /// Active yield farms.
    pub async fn farms(&self) -> Result<Value> {
        self.get("/farms", &[]).await
    }

    /// V1 liquidity pools with reserves.
    pub async fn pools(&self) -> Result<Value> {
        self.get("/pools", &[]).await
    }

    /// V2 pools with fee/tick/liquidity metrics.
    pub async fn v2_pools(&self) -> Result<Value> {
        self.get("/v2/pools", &[]).await
    }

    /// Historical platform liquidity or volume series.
    pub async fn platform_data(
        &self,
        from_seconds: u64,
        to_seconds: u64,
        interval: PlatformInterval,
        field: PlatformField,
    ) -> Result<Value> {
        self.get(
            "/stats/platformData",
            &[
                ("from", from_seconds.to_string()),
                ("to", to_seconds.to_string()),
                ("interval", interval.as_str().to_string()),
                ("field", field.as_str().to_string()),
            ],
        )
        .await
    }

    /// Farm positions held by one account.
    pub async fn account_farms(&self, account_id: &str) -> Result<Value> {
        self.get(&format!("/farms/{account_id}"), &[]).await
    }

    /// The curated default token list.
    pub async fn default_tokens(&self) -> Result<Value> {
        self.get("/tokens/default", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::DEFAULT_REST_TIMEOUT;

    #[test]
    fn test_base_url_follows_network() {
        let main =
            SaucerSwapApi::new("key".into(), Network::Mainnet, DEFAULT_REST_TIMEOUT).unwrap();
        assert_eq!(main.base_url(), "https://api.saucerswap.finance");

        let test =
            SaucerSwapApi::new("key".into(), Network::Testnet, DEFAULT_REST_TIMEOUT).unwrap();
        assert_eq!(test.base_url(), "https://test-api.saucerswap.finance");
    }

    #[test]
    fn test_platform_series_wire_values() {
        assert_eq!(PlatformInterval::Hour.as_str(), "HOUR");
        assert_eq!(PlatformInterval::Week.as_str(), "WEEK");
        assert_eq!(PlatformField::Liquidity.as_str(), "LIQUIDITY");
        assert_eq!(PlatformField::Volume.as_str(), "VOLUME");
    }

    #[test]
    fn test_debug_never_leaks_api_key() {
        let api = SaucerSwapApi::new(
            "super-secret".into(),
            Network::Mainnet,
            DEFAULT_REST_TIMEOUT,
        )
        .unwrap();
        assert!(!format!("{api:?}").contains("super-secret"));
    }
}
