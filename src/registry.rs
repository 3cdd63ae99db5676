//! Per-network contract registry
//!
//! Fixed tables mapping each protocol to the contracts an operation needs,
//! one table per network, built once and never mutated afterwards. Some
//! protocols simply do not exist on testnet - that is a permanent condition
//! surfaced as `UnavailableOnNetwork`, not a transient error. No network I/O
//! happens here.

use crate::codec::AccountId;
use crate::error::ModeError;
use alloy_primitives::Address;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================
// NETWORK / PROTOCOL TAGS
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// Hedera JSON-RPC relay endpoint for this network.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://mainnet.hashio.io/api",
            Network::Testnet => "https://testnet.hashio.io/api",
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => 295,
            Network::Testnet => 296,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Protocol {
    /// Bonzo Finance - Aave-style lending pool
    Lending,
    /// SaucerSwap V2 - concentrated-liquidity router + quoter
    Amm,
    /// Stader - HBAR liquid staking vault
    LiquidStaking,
    /// SaucerSwap Mothership + MasterChef - SAUCE staking and LP farms
    Farm,
    /// HeliSwap - V2-style constant-product pairs, read-only surface
    Heliswap,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Lending => write!(f, "lending"),
            Protocol::Amm => write!(f, "amm"),
            Protocol::LiquidStaking => write!(f, "liquid-staking"),
            Protocol::Farm => write!(f, "farm"),
            Protocol::Heliswap => write!(f, "heliswap"),
        }
    }
}

// ============================================
// CONTRACT ENTRIES
// ============================================

/// A deployed contract: dotted entity id plus its long-zero EVM address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contract {
    pub id: AccountId,
    pub address: Address,
}

impl Contract {
    fn new(num: u64) -> Self {
        let id = AccountId::new(0, 0, num);
        Self {
            id,
            address: id.to_evm_address(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LendingContracts {
    pub pool: Contract,
    pub oracle: Contract,
}

#[derive(Debug, Clone, Copy)]
pub struct AmmContracts {
    pub router: Contract,
    pub quoter: Contract,
    pub factory: Contract,
    /// Wrapped-HBAR token, the native-currency hop for router swaps.
    pub whbar: Contract,
}

#[derive(Debug, Clone, Copy)]
pub struct LiquidStakingContracts {
    pub vault: Contract,
}

#[derive(Debug, Clone, Copy)]
pub struct FarmContracts {
    /// Single-sided SAUCE staking (enter/leave).
    pub mothership: Contract,
    /// LP farm vault (deposit/withdraw by pool id).
    pub masterchef: Contract,
    pub sauce: Contract,
    pub xsauce: Contract,
}

#[derive(Debug, Clone, Copy)]
pub struct HeliswapContracts {
    pub factory: Contract,
    pub router: Contract,
}

/// Every contract role a network may carry. Roles absent on a network
/// stay `None` forever.
#[derive(Debug, Clone, Copy)]
pub struct NetworkContracts {
    pub lending: Option<LendingContracts>,
    pub amm: Option<AmmContracts>,
    pub liquid_staking: Option<LiquidStakingContracts>,
    pub farm: Option<FarmContracts>,
    pub heliswap: Option<HeliswapContracts>,
}

lazy_static! {
    static ref MAINNET: NetworkContracts = NetworkContracts {
        lending: Some(LendingContracts {
            pool: Contract::new(7243132),
            oracle: Contract::new(7243144),
        }),
        amm: Some(AmmContracts {
            router: Contract::new(3949434),
            quoter: Contract::new(3949424),
            factory: Contract::new(3946833),
            whbar: Contract::new(1456986),
        }),
        liquid_staking: Some(LiquidStakingContracts {
            vault: Contract::new(1027588),
        }),
        farm: Some(FarmContracts {
            mothership: Contract::new(1460199),
            masterchef: Contract::new(1077627),
            sauce: Contract::new(731861),
            xsauce: Contract::new(1460200),
        }),
        heliswap: Some(HeliswapContracts {
            factory: Contract::new(1262116),
            router: Contract::new(1262126),
        }),
    };
    static ref TESTNET: NetworkContracts = NetworkContracts {
        lending: Some(LendingContracts {
            pool: Contract::new(4810618),
            oracle: Contract::new(4810630),
        }),
        amm: Some(AmmContracts {
            router: Contract::new(1414040),
            quoter: Contract::new(1390002),
            factory: Contract::new(1197038),
            whbar: Contract::new(15058),
        }),
        // Stader has never deployed to testnet
        liquid_staking: None,
        farm: Some(FarmContracts {
            mothership: Contract::new(1418650),
            masterchef: Contract::new(1418706),
            sauce: Contract::new(1183558),
            xsauce: Contract::new(1418651),
        }),
        // HeliSwap has never deployed to testnet
        heliswap: None,
    };
}

// ============================================
// REGISTRY
// ============================================

/// Pure lookup over the static per-network tables.
#[derive(Debug, Clone, Copy)]
pub struct ContractRegistry {
    network: Network,
}

impl ContractRegistry {
    pub fn new(network: Network) -> Self {
        Self { network }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    fn table(&self) -> &'static NetworkContracts {
        match self.network {
            Network::Mainnet => &MAINNET,
            Network::Testnet => &TESTNET,
        }
    }

    fn unavailable(&self, protocol: Protocol) -> ModeError {
        ModeError::UnavailableOnNetwork {
            protocol,
            network: self.network,
        }
    }

    pub fn lending(&self) -> Result<&'static LendingContracts, ModeError> {
        self.table()
            .lending
            .as_ref()
            .ok_or_else(|| self.unavailable(Protocol::Lending))
    }

    pub fn amm(&self) -> Result<&'static AmmContracts, ModeError> {
        self.table()
            .amm
            .as_ref()
            .ok_or_else(|| self.unavailable(Protocol::Amm))
    }

    pub fn liquid_staking(&self) -> Result<&'static LiquidStakingContracts, ModeError> {
        self.table()
            .liquid_staking
            .as_ref()
            .ok_or_else(|| self.unavailable(Protocol::LiquidStaking))
    }

    pub fn farm(&self) -> Result<&'static FarmContracts, ModeError> {
        self.table()
            .farm
            .as_ref()
            .ok_or_else(|| self.unavailable(Protocol::Farm))
    }

    pub fn heliswap(&self) -> Result<&'static HeliswapContracts, ModeError> {
        self.table()
            .heliswap
            .as_ref()
            .ok_or_else(|| self.unavailable(Protocol::Heliswap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_and_testnet_never_share_addresses() {
        let main = ContractRegistry::new(Network::Mainnet);
        let test = ContractRegistry::new(Network::Testnet);

        let main_amm = main.amm().unwrap();
        let test_amm = test.amm().unwrap();

        assert_ne!(main_amm.router.address, test_amm.router.address);
        assert_ne!(main_amm.quoter.address, test_amm.quoter.address);
        assert_ne!(main_amm.whbar.address, test_amm.whbar.address);
        assert_ne!(
            main.lending().unwrap().pool.address,
            test.lending().unwrap().pool.address
        );
    }

    #[test]
    fn test_liquid_staking_is_mainnet_only() {
        let main = ContractRegistry::new(Network::Mainnet);
        assert!(main.liquid_staking().is_ok());

        let test = ContractRegistry::new(Network::Testnet);
        assert_eq!(
            test.liquid_staking().unwrap_err(),
            ModeError::UnavailableOnNetwork {
                protocol: Protocol::LiquidStaking,
                network: Network::Testnet,
            }
        );
    }

    #[test]
    fn test_entries_carry_matching_id_and_address() {
        let amm = ContractRegistry::new(Network::Mainnet).amm().unwrap();
        assert_eq!(amm.router.id.to_evm_address(), amm.router.address);
        assert_eq!(amm.router.id.to_string(), "0.0.3949434");
    }

    #[test]
    fn test_heliswap_is_mainnet_only() {
        let heliswap = ContractRegistry::new(Network::Mainnet).heliswap().unwrap();
        assert_eq!(heliswap.factory.id.to_string(), "0.0.1262116");
        assert_eq!(
            format!("{:?}", heliswap.factory.address).to_lowercase(),
            "0x0000000000000000000000000000000000134224"
        );
        assert_eq!(heliswap.router.id.to_string(), "0.0.1262126");

        assert_eq!(
            ContractRegistry::new(Network::Testnet).heliswap().unwrap_err(),
            ModeError::UnavailableOnNetwork {
                protocol: Protocol::Heliswap,
                network: Network::Testnet,
            }
        );
    }
}
