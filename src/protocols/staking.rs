//! Stader adapter - HBAR liquid-staking vault (mainnet only)
//!
//! `stake()` is payable and carries the HBAR as the call value; `unstake`
//! burns HBARX. The exchange-rate view is three scalar calls, matching the
//! vault's contract surface.

use crate::error::{Error, Result};
use crate::executor::{gas, ActionParams, ContractCallSpec, Executor, ReadQuery, TxOutcome};
use crate::registry::ContractRegistry;
use alloy_primitives::{Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use serde::Serialize;

use super::parse_amount;

sol! {
    interface IStakePool {
        function stake() external payable returns (uint256);
        function unstake(uint256 hbarxAmount) external returns (uint256);
        function getExchangeRate() external view returns (uint256);
        function getTotalPooledHbar() external view returns (uint256);
        function getHbarxSupply() external view returns (uint256);
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub rate: String,
    pub total_hbar: String,
    pub hbarx_supply: String,
}

pub struct StakingAdapter<'a> {
    registry: ContractRegistry,
    executor: &'a Executor,
    query: &'a ReadQuery,
}

impl<'a> StakingAdapter<'a> {
    pub fn new(registry: ContractRegistry, executor: &'a Executor, query: &'a ReadQuery) -> Self {
        Self {
            registry,
            executor,
            query,
        }
    }

    /// Stake HBAR (tinybars) for HBARX.
    pub async fn stake(&self, amount_tinybar: &str) -> Result<TxOutcome> {
        let amount = parse_amount(amount_tinybar)?;
        let vault = self.registry.liquid_staking()?.vault;

        self.executor
            .run(ContractCallSpec {
                contract: vault,
                function: "stake()",
                function_name: "stake",
                calldata: Bytes::from(IStakePool::stakeCall {}.abi_encode()),
                params: ActionParams::Stake {},
                description: format!("Stake {amount_tinybar} tinybar of HBAR for HBARX"),
                gas: gas::STAKE,
                payable_tinybar: amount,
            })
            .await
    }

    /// Unstake HBARX (smallest units) back to HBAR.
    pub async fn unstake(&self, amount_hbarx: &str) -> Result<TxOutcome> {
        let amount = parse_amount(amount_hbarx)?;
        let vault = self.registry.liquid_staking()?.vault;

        let call = IStakePool::unstakeCall {
            hbarxAmount: amount,
        };

        self.executor
            .run(ContractCallSpec {
                contract: vault,
                function: "unstake(uint256)",
                function_name: "unstake",
                calldata: Bytes::from(call.abi_encode()),
                params: ActionParams::Unstake {
                    amount: amount_hbarx.to_string(),
                },
                description: format!("Unstake {amount_hbarx} HBARX for HBAR"),
                gas: gas::UNSTAKE,
                payable_tinybar: U256::ZERO,
            })
            .await
    }

    /// Current HBAR/HBARX exchange rate plus pool totals.
    pub async fn exchange_rate(&self) -> Result<ExchangeRate> {
        let vault = self.registry.liquid_staking()?.vault;

        let rate = self.scalar_query(vault.address, IStakePool::getExchangeRateCall {}.abi_encode(), "getExchangeRate").await?;
        let total_hbar = self.scalar_query(vault.address, IStakePool::getTotalPooledHbarCall {}.abi_encode(), "getTotalPooledHbar").await?;
        let supply = self.scalar_query(vault.address, IStakePool::getHbarxSupplyCall {}.abi_encode(), "getHbarxSupply").await?;

        Ok(ExchangeRate {
            rate: rate.to_string(),
            total_hbar: total_hbar.to_string(),
            hbarx_supply: supply.to_string(),
        })
    }

    async fn scalar_query(
        &self,
        to: alloy_primitives::Address,
        calldata: Vec<u8>,
        name: &str,
    ) -> Result<U256> {
        let output = self.query.call(to, calldata).await?;
        // All three views return a single uint256
        IStakePool::getExchangeRateCall::abi_decode_returns(&output)
            .map_err(|e| Error::contract_call(format!("failed to decode {name}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModeError;
    use crate::registry::Network;

    fn setup(network: Network) -> (ContractRegistry, Executor, ReadQuery) {
        let registry = ContractRegistry::new(network);
        let executor = Executor::prepare(
            "0.0.123456".parse().unwrap(),
            "http://localhost".into(),
            network.chain_id(),
        );
        let query = ReadQuery::new("http://localhost".into());
        (registry, executor, query)
    }

    #[tokio::test]
    async fn test_stake_is_payable_with_no_abi_params() {
        let (registry, executor, query) = setup(Network::Mainnet);
        let adapter = StakingAdapter::new(registry, &executor, &query);

        let outcome = adapter.stake("5000000000").await.unwrap();
        let descriptor = outcome.as_prepared().unwrap();

        assert_eq!(descriptor.value, "5000000000");
        assert_eq!(descriptor.gas, gas::STAKE);
        assert_eq!(descriptor.params, ActionParams::Stake {});
        assert_eq!(descriptor.unsigned.payable_amount, "5000000000");
        // stake() encodes to just the 4-byte selector
        assert_eq!(descriptor.unsigned.function_params.len(), 2 + 8);
    }

    #[tokio::test]
    async fn test_unstake_encodes_amount() {
        let (registry, executor, query) = setup(Network::Mainnet);
        let adapter = StakingAdapter::new(registry, &executor, &query);

        let outcome = adapter.unstake("123456789").await.unwrap();
        let descriptor = outcome.as_prepared().unwrap();

        let expected = IStakePool::unstakeCall {
            hbarxAmount: U256::from(123_456_789u64),
        }
        .abi_encode();
        assert_eq!(
            descriptor.unsigned.function_params,
            format!("0x{}", hex::encode(expected))
        );
        assert_eq!(descriptor.value, "0");
    }

    #[tokio::test]
    async fn test_unavailable_on_testnet_before_any_network_call() {
        let (registry, executor, query) = setup(Network::Testnet);
        let adapter = StakingAdapter::new(registry, &executor, &query);

        let err = adapter.stake("100").await.unwrap_err();
        match err {
            crate::error::Error::Mode(ModeError::UnavailableOnNetwork { network, .. }) => {
                assert_eq!(network, Network::Testnet)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
