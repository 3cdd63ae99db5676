//! SaucerSwap staking/farm adapter
//!
//! Two vaults: the Mothership for single-sided SAUCE staking
//! (enter/leave), and the MasterChef-style farm for LP tokens, whose
//! deposit takes the farm's HBAR deposit fee as the call value.

use crate::error::Result;
use crate::executor::{gas, ActionParams, ContractCallSpec, Executor, TxOutcome};
use crate::registry::ContractRegistry;
use alloy_primitives::{Bytes, U256};
use alloy_sol_types::{sol, SolCall};

use super::parse_amount;

sol! {
    /// Single-sided SAUCE staking.
    interface IMothership {
        function enter(uint256 amount) external;
        function leave(uint256 share) external;
    }

    /// LP farm vault.
    interface IMasterChef {
        function deposit(uint256 pid, uint256 amount) external payable;
        function withdraw(uint256 pid, uint256 amount) external;
    }
}

pub struct FarmAdapter<'a> {
    registry: ContractRegistry,
    executor: &'a Executor,
}

impl<'a> FarmAdapter<'a> {
    pub fn new(registry: ContractRegistry, executor: &'a Executor) -> Self {
        Self { registry, executor }
    }

    /// Stake SAUCE for xSAUCE.
    pub async fn stake_sauce(&self, amount: &str) -> Result<TxOutcome> {
        let amount_raw = parse_amount(amount)?;
        let farm = self.registry.farm()?;

        let call = IMothership::enterCall { amount: amount_raw };

        self.executor
            .run(ContractCallSpec {
                contract: farm.mothership,
                function: "enter(uint256)",
                function_name: "enter",
                calldata: Bytes::from(call.abi_encode()),
                params: ActionParams::StakeSauce {
                    amount: amount.to_string(),
                },
                description: format!("Stake {amount} SAUCE for xSAUCE"),
                gas: gas::SAUCE_STAKE,
                payable_tinybar: U256::ZERO,
            })
            .await
    }

    /// Unstake xSAUCE back to SAUCE.
    pub async fn unstake_xsauce(&self, amount: &str) -> Result<TxOutcome> {
        let amount_raw = parse_amount(amount)?;
        let farm = self.registry.farm()?;

        let call = IMothership::leaveCall { share: amount_raw };

        self.executor
            .run(ContractCallSpec {
                contract: farm.mothership,
                function: "leave(uint256)",
                function_name: "leave",
                calldata: Bytes::from(call.abi_encode()),
                params: ActionParams::UnstakeXsauce {
                    amount: amount.to_string(),
                },
                description: format!("Unstake {amount} xSAUCE for SAUCE"),
                gas: gas::SAUCE_STAKE,
                payable_tinybar: U256::ZERO,
            })
            .await
    }

    /// Deposit LP tokens into a farm pool. The farm charges a fixed HBAR
    /// deposit fee, attached as the call value.
    pub async fn farm_deposit(
        &self,
        pool_id: u64,
        amount: &str,
        deposit_fee_tinybar: &str,
    ) -> Result<TxOutcome> {
        let amount_raw = parse_amount(amount)?;
        let fee = parse_amount(deposit_fee_tinybar)?;
        let farm = self.registry.farm()?;

        let call = IMasterChef::depositCall {
            pid: U256::from(pool_id),
            amount: amount_raw,
        };

        self.executor
            .run(ContractCallSpec {
                contract: farm.masterchef,
                function: "deposit(uint256,uint256)",
                function_name: "deposit",
                calldata: Bytes::from(call.abi_encode()),
                params: ActionParams::FarmDeposit {
                    pool_id,
                    amount: amount.to_string(),
                    deposit_fee: deposit_fee_tinybar.to_string(),
                },
                description: format!("Deposit {amount} LP tokens into farm pool {pool_id}"),
                gas: gas::FARM,
                payable_tinybar: fee,
            })
            .await
    }

    /// Withdraw LP tokens from a farm pool.
    pub async fn farm_withdraw(&self, pool_id: u64, amount: &str) -> Result<TxOutcome> {
        let amount_raw = parse_amount(amount)?;
        let farm = self.registry.farm()?;

        let call = IMasterChef::withdrawCall {
            pid: U256::from(pool_id),
            amount: amount_raw,
        };

        self.executor
            .run(ContractCallSpec {
                contract: farm.masterchef,
                function: "withdraw(uint256,uint256)",
                function_name: "withdraw",
                calldata: Bytes::from(call.abi_encode()),
                params: ActionParams::FarmWithdraw {
                    pool_id,
                    amount: amount.to_string(),
                },
                description: format!("Withdraw {amount} LP tokens from farm pool {pool_id}"),
                gas: gas::FARM,
                payable_tinybar: U256::ZERO,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Network;

    fn setup() -> (ContractRegistry, Executor) {
        let registry = ContractRegistry::new(Network::Mainnet);
        let executor = Executor::prepare(
            "0.0.123456".parse().unwrap(),
            "http://localhost".into(),
            295,
        );
        (registry, executor)
    }

    #[tokio::test]
    async fn test_farm_deposit_attaches_fee_as_value() {
        let (registry, executor) = setup();
        let adapter = FarmAdapter::new(registry, &executor);

        let outcome = adapter.farm_deposit(7, "1000", "50000000").await.unwrap();
        let descriptor = outcome.as_prepared().unwrap();

        assert_eq!(descriptor.value, "50000000");
        assert_eq!(descriptor.to, registry.farm().unwrap().masterchef.id.to_string());
        assert_eq!(
            descriptor.params,
            ActionParams::FarmDeposit {
                pool_id: 7,
                amount: "1000".to_string(),
                deposit_fee: "50000000".to_string(),
            }
        );

        let expected = IMasterChef::depositCall {
            pid: U256::from(7u64),
            amount: U256::from(1000u64),
        }
        .abi_encode();
        assert_eq!(
            descriptor.unsigned.function_params,
            format!("0x{}", hex::encode(expected))
        );
    }

    #[tokio::test]
    async fn test_sauce_staking_targets_mothership() {
        let (registry, executor) = setup();
        let adapter = FarmAdapter::new(registry, &executor);

        let outcome = adapter.stake_sauce("250000").await.unwrap();
        let descriptor = outcome.as_prepared().unwrap();
        assert_eq!(
            descriptor.to,
            registry.farm().unwrap().mothership.id.to_string()
        );
        assert_eq!(descriptor.function, "enter(uint256)");
        assert_eq!(descriptor.value, "0");

        let outcome = adapter.unstake_xsauce("250000").await.unwrap();
        assert_eq!(
            outcome.as_prepared().unwrap().function,
            "leave(uint256)"
        );
    }

    #[tokio::test]
    async fn test_farm_withdraw_rejects_bad_amount() {
        let (registry, executor) = setup();
        let adapter = FarmAdapter::new(registry, &executor);
        assert!(adapter.farm_withdraw(1, "12x").await.is_err());
    }
}
