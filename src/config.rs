//! Runtime configuration
//!
//! Settings are loaded from environment variables (with `.env` support)
//! or from a TOML file. The same configuration drives both prepare-only
//! and execute sessions; the only switch between them is `execute_tx`
//! plus the presence of operator credentials.

use crate::codec::AccountId;
use crate::registry::Network;
use eyre::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

// ============================================
// MAIN CONFIGURATION
// ============================================

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // ========== Network Settings ==========
    /// Target Hedera network
    pub network: Network,

    /// JSON-RPC relay URL (defaults to the public Hashio relay)
    pub rpc_url: String,

    // ========== Operator Settings ==========
    /// Operator account in dotted `shard.realm.num` form
    pub operator_id: Option<String>,

    /// ECDSA private key for the operator (hex, with or without 0x)
    /// KEEP SECRET - never logged, skipped on serialization
    #[serde(skip_serializing, default)]
    pub operator_key: Option<String>,

    // ========== Execution Settings ==========
    /// When false (the default) every write operation returns a prepared
    /// transaction instead of submitting it
    pub execute_tx: bool,

    // ========== API Keys ==========
    /// SaucerSwap REST API key (market data endpoints require it)
    pub saucerswap_api_key: Option<String>,

    // ========== REST Settings ==========
    /// Timeout for market data REST calls, in seconds
    pub rest_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let network = match env::var("HEDERA_NETWORK")
            .unwrap_or_else(|_| "testnet".to_string())
            .to_lowercase()
            .as_str()
        {
            "mainnet" => Network::Mainnet,
            _ => Network::Testnet,
        };

        // Operator credentials are per-network so a single .env can hold both
        let (id_var, key_var) = match network {
            Network::Mainnet => ("MAINNET_OPERATOR_ID", "MAINNET_OPERATOR_KEY"),
            Network::Testnet => ("TESTNET_OPERATOR_ID", "TESTNET_OPERATOR_KEY"),
        };

        Ok(Self {
            network,
            rpc_url: env::var("RPC_URL").unwrap_or_else(|_| network.default_rpc_url().to_string()),
            operator_id: env::var(id_var).ok(),
            operator_key: env::var(key_var).ok(),
            execute_tx: env::var("EXECUTE_TX")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            saucerswap_api_key: env::var("SAUCERSWAP_API_KEY").ok(),
            rest_timeout_secs: env::var("REST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "12".to_string())
                .parse()
                .unwrap_or(12),
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file (operator key is never written)
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration before building a session
    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.is_empty() {
            return Err(eyre::eyre!("RPC_URL must not be empty"));
        }

        if let Some(id) = &self.operator_id {
            id.parse::<AccountId>()
                .map_err(|e| eyre::eyre!("invalid operator id {:?}: {}", id, e))?;
        }

        // Execute mode needs full credentials; prepare mode needs only the id
        if self.execute_tx {
            if self.operator_id.is_none() {
                return Err(eyre::eyre!("EXECUTE_TX=true requires an operator id"));
            }
            if self.operator_key.is_none() {
                return Err(eyre::eyre!("EXECUTE_TX=true requires an operator key"));
            }
        }

        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════╗");
        println!("║                HASHFI - CONFIGURATION                  ║");
        println!("╠════════════════════════════════════════════════════════╣");
        println!("║ Network:        {:^38} ║", format!("{:?}", self.network));
        println!("║ Chain ID:       {:^38} ║", self.network.chain_id());
        println!(
            "║ Mode:           {:^38} ║",
            if self.execute_tx { "EXECUTE" } else { "PREPARE" }
        );
        println!(
            "║ Operator:       {:^38} ║",
            self.operator_id.as_deref().unwrap_or("✗ Not Set")
        );
        println!(
            "║ Operator Key:   {:^38} ║",
            if self.operator_key.is_some() { "✓ Configured" } else { "✗ Not Set" }
        );
        println!(
            "║ SaucerSwap API: {:^38} ║",
            if self.saucerswap_api_key.is_some() { "✓ Configured" } else { "✗ Not Set" }
        );
        println!("╚════════════════════════════════════════════════════════╝");
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            rpc_url: Network::Testnet.default_rpc_url().to_string(),
            operator_id: None,
            operator_key: None,
            execute_tx: false,
            saucerswap_api_key: None,
            rest_timeout_secs: 12,
        }
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.network, Network::Testnet);
        assert!(!config.execute_tx);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_execute_requires_credentials() {
        let mut config = Config::default();
        config.execute_tx = true;
        assert!(config.validate().is_err());

        config.operator_id = Some("0.0.5792673".to_string());
        assert!(config.validate().is_err());

        config.operator_key = Some("abc123".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_operator_id_rejected() {
        let mut config = Config::default();
        config.operator_id = Some("not-an-account".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_key_never_serialized() {
        let mut config = Config::default();
        config.operator_key = Some("deadbeef".to_string());
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(!toml.contains("deadbeef"));
    }
}
