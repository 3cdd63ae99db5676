//! Bonzo Finance adapter - Aave-style lending pool
//!
//! Deposit, withdraw, borrow, repay and collateral toggling against the
//! pool contract, plus the read-only account health query.

use crate::codec;
use crate::error::Result;
use crate::executor::{gas, ActionParams, ContractCallSpec, Executor, ReadQuery, TxOutcome};
use crate::registry::ContractRegistry;
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use serde::Serialize;

use super::{parse_amount, RateMode};

sol! {
    /// Aave V2-style pool interface as deployed by Bonzo on Hedera.
    interface ILendingPool {
        function deposit(address asset, uint256 amount, address onBehalfOf, uint16 referralCode) external;
        function withdraw(address asset, uint256 amount, address to) external returns (uint256);
        function borrow(address asset, uint256 amount, uint256 interestRateMode, uint16 referralCode, address onBehalfOf) external;
        function repay(address asset, uint256 amount, uint256 rateMode, address onBehalfOf) external returns (uint256);
        function setUserUseReserveAsCollateral(address asset, bool useAsCollateral) external;
        function getUserAccountData(address user) external view returns (
            uint256 totalCollateral,
            uint256 totalDebt,
            uint256 availableBorrows,
            uint256 currentLiquidationThreshold,
            uint256 ltv,
            uint256 healthFactor
        );
    }
}

/// Decoded `getUserAccountData` tuple, positionally ordered, with
/// full-width integers preserved as decimal strings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountHealth {
    pub total_collateral: String,
    pub total_debt: String,
    pub available_borrows: String,
    pub liquidation_threshold: String,
    pub ltv: String,
    pub health_factor: String,
}

pub struct LendingAdapter<'a> {
    registry: ContractRegistry,
    executor: &'a Executor,
    query: &'a ReadQuery,
}

impl<'a> LendingAdapter<'a> {
    pub fn new(registry: ContractRegistry, executor: &'a Executor, query: &'a ReadQuery) -> Self {
        Self {
            registry,
            executor,
            query,
        }
    }

    fn recipient_or_operator(&self, recipient: Option<&str>) -> Result<Address> {
        Ok(match recipient {
            Some(r) => codec::to_evm_address(r)?,
            None => self.executor.operator_address(),
        })
    }

    pub async fn deposit(
        &self,
        asset: &str,
        amount: &str,
        on_behalf_of: Option<&str>,
    ) -> Result<TxOutcome> {
        let asset_addr = codec::to_evm_address(asset)?;
        let amount_raw = parse_amount(amount)?;
        let on_behalf = self.recipient_or_operator(on_behalf_of)?;
        let pool = self.registry.lending()?.pool;

        let call = ILendingPool::depositCall {
            asset: asset_addr,
            amount: amount_raw,
            onBehalfOf: on_behalf,
            referralCode: 0,
        };

        self.executor
            .run(ContractCallSpec {
                contract: pool,
                function: "deposit(address,uint256,address,uint16)",
                function_name: "deposit",
                calldata: Bytes::from(call.abi_encode()),
                params: ActionParams::Deposit {
                    asset: asset_addr.to_string(),
                    amount: amount.to_string(),
                    on_behalf_of: on_behalf.to_string(),
                    referral_code: 0,
                },
                description: format!("Deposit {amount} of {asset_addr} into the lending pool"),
                gas: gas::LENDING,
                payable_tinybar: U256::ZERO,
            })
            .await
    }

    pub async fn withdraw(&self, asset: &str, amount: &str, to: Option<&str>) -> Result<TxOutcome> {
        let asset_addr = codec::to_evm_address(asset)?;
        let amount_raw = parse_amount(amount)?;
        let to_addr = self.recipient_or_operator(to)?;
        let pool = self.registry.lending()?.pool;

        let call = ILendingPool::withdrawCall {
            asset: asset_addr,
            amount: amount_raw,
            to: to_addr,
        };

        self.executor
            .run(ContractCallSpec {
                contract: pool,
                function: "withdraw(address,uint256,address)",
                function_name: "withdraw",
                calldata: Bytes::from(call.abi_encode()),
                params: ActionParams::Withdraw {
                    asset: asset_addr.to_string(),
                    amount: amount.to_string(),
                    to: to_addr.to_string(),
                },
                description: format!("Withdraw {amount} of {asset_addr} from the lending pool"),
                gas: gas::LENDING,
                payable_tinybar: U256::ZERO,
            })
            .await
    }

    pub async fn borrow(
        &self,
        asset: &str,
        amount: &str,
        rate_mode: RateMode,
        on_behalf_of: Option<&str>,
    ) -> Result<TxOutcome> {
        let asset_addr = codec::to_evm_address(asset)?;
        let amount_raw = parse_amount(amount)?;
        let on_behalf = self.recipient_or_operator(on_behalf_of)?;
        let pool = self.registry.lending()?.pool;

        let call = ILendingPool::borrowCall {
            asset: asset_addr,
            amount: amount_raw,
            interestRateMode: U256::from(rate_mode.as_u8()),
            referralCode: 0,
            onBehalfOf: on_behalf,
        };

        self.executor
            .run(ContractCallSpec {
                contract: pool,
                function: "borrow(address,uint256,uint256,uint16,address)",
                function_name: "borrow",
                calldata: Bytes::from(call.abi_encode()),
                params: ActionParams::Borrow {
                    asset: asset_addr.to_string(),
                    amount: amount.to_string(),
                    rate_mode: rate_mode.as_u8(),
                    referral_code: 0,
                    on_behalf_of: on_behalf.to_string(),
                },
                description: format!("Borrow {amount} of {asset_addr} from the lending pool"),
                gas: gas::LENDING,
                payable_tinybar: U256::ZERO,
            })
            .await
    }

    pub async fn repay(
        &self,
        asset: &str,
        amount: &str,
        rate_mode: RateMode,
        on_behalf_of: Option<&str>,
    ) -> Result<TxOutcome> {
        let asset_addr = codec::to_evm_address(asset)?;
        let amount_raw = parse_amount(amount)?;
        let on_behalf = self.recipient_or_operator(on_behalf_of)?;
        let pool = self.registry.lending()?.pool;

        let call = ILendingPool::repayCall {
            asset: asset_addr,
            amount: amount_raw,
            rateMode: U256::from(rate_mode.as_u8()),
            onBehalfOf: on_behalf,
        };

        self.executor
            .run(ContractCallSpec {
                contract: pool,
                function: "repay(address,uint256,uint256,address)",
                function_name: "repay",
                calldata: Bytes::from(call.abi_encode()),
                params: ActionParams::Repay {
                    asset: asset_addr.to_string(),
                    amount: amount.to_string(),
                    rate_mode: rate_mode.as_u8(),
                    on_behalf_of: on_behalf.to_string(),
                },
                description: format!("Repay {amount} of {asset_addr} to the lending pool"),
                gas: gas::LENDING,
                payable_tinybar: U256::ZERO,
            })
            .await
    }

    pub async fn set_collateral(&self, asset: &str, use_as_collateral: bool) -> Result<TxOutcome> {
        let asset_addr = codec::to_evm_address(asset)?;
        let pool = self.registry.lending()?.pool;

        let call = ILendingPool::setUserUseReserveAsCollateralCall {
            asset: asset_addr,
            useAsCollateral: use_as_collateral,
        };

        self.executor
            .run(ContractCallSpec {
                contract: pool,
                function: "setUserUseReserveAsCollateral(address,bool)",
                function_name: "setUserUseReserveAsCollateral",
                calldata: Bytes::from(call.abi_encode()),
                params: ActionParams::SetCollateral {
                    asset: asset_addr.to_string(),
                    use_as_collateral,
                },
                description: format!(
                    "{} {asset_addr} as collateral",
                    if use_as_collateral { "Enable" } else { "Disable" }
                ),
                gas: gas::COLLATERAL,
                payable_tinybar: U256::ZERO,
            })
            .await
    }

    /// Account health for any ledger account, decoded positionally from
    /// the pool's `getUserAccountData` return tuple.
    pub async fn account_data(&self, account: &str) -> Result<AccountHealth> {
        let user = codec::to_evm_address(account)?;
        let pool = self.registry.lending()?.pool;

        let calldata = ILendingPool::getUserAccountDataCall { user }.abi_encode();
        let output = self.query.call(pool.address, calldata).await?;

        let decoded = ILendingPool::getUserAccountDataCall::abi_decode_returns(&output)
            .map_err(|e| crate::error::Error::contract_call(format!(
                "failed to decode getUserAccountData: {e}"
            )))?;

        Ok(AccountHealth {
            total_collateral: decoded.totalCollateral.to_string(),
            total_debt: decoded.totalDebt.to_string(),
            available_borrows: decoded.availableBorrows.to_string(),
            liquidation_threshold: decoded.currentLiquidationThreshold.to_string(),
            ltv: decoded.ltv.to_string(),
            health_factor: decoded.healthFactor.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ValidationError};
    use crate::registry::Network;

    fn setup() -> (ContractRegistry, Executor, ReadQuery) {
        let registry = ContractRegistry::new(Network::Mainnet);
        let executor = Executor::prepare(
            "0.0.123456".parse().unwrap(),
            "http://localhost".into(),
            295,
        );
        let query = ReadQuery::new("http://localhost".into());
        (registry, executor, query)
    }

    #[tokio::test]
    async fn test_deposit_prepare_end_to_end() {
        let (registry, executor, query) = setup();
        let adapter = LendingAdapter::new(registry, &executor, &query);

        let asset = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA1";
        let outcome = adapter.deposit(asset, "1000000", None).await.unwrap();
        let descriptor = outcome.as_prepared().unwrap();

        let pool = registry.lending().unwrap().pool;
        assert_eq!(descriptor.to, pool.id.to_string());
        assert_eq!(descriptor.value, "0");
        assert_eq!(descriptor.function, "deposit(address,uint256,address,uint16)");

        let caller = executor.operator_address();
        assert_eq!(
            descriptor.params,
            ActionParams::Deposit {
                asset: codec::to_evm_address(asset).unwrap().to_string(),
                amount: "1000000".to_string(),
                on_behalf_of: caller.to_string(),
                referral_code: 0,
            }
        );

        // The encoded call in the descriptor is exactly what execute mode
        // would submit for the same intent.
        let expected = ILendingPool::depositCall {
            asset: codec::to_evm_address(asset).unwrap(),
            amount: U256::from(1_000_000u64),
            onBehalfOf: caller,
            referralCode: 0,
        }
        .abi_encode();
        assert_eq!(
            descriptor.unsigned.function_params,
            format!("0x{}", hex::encode(expected))
        );
    }

    #[tokio::test]
    async fn test_deposit_rejects_bad_amount_before_network() {
        let (registry, executor, query) = setup();
        let adapter = LendingAdapter::new(registry, &executor, &query);

        let err = adapter
            .deposit("0.0.731861", "10.5", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidAmount(_))
        ));
    }

    #[tokio::test]
    async fn test_borrow_encodes_rate_mode() {
        let (registry, executor, query) = setup();
        let adapter = LendingAdapter::new(registry, &executor, &query);

        let outcome = adapter
            .borrow("0.0.731861", "500", RateMode::Variable, None)
            .await
            .unwrap();
        let descriptor = outcome.as_prepared().unwrap();
        match &descriptor.params {
            ActionParams::Borrow { rate_mode, .. } => assert_eq!(*rate_mode, 2),
            other => panic!("unexpected params: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_same_intent_encodes_identically() {
        let (registry, executor, query) = setup();
        let adapter = LendingAdapter::new(registry, &executor, &query);

        let a = adapter.deposit("0.0.731861", "42", None).await.unwrap();
        let b = adapter.deposit("0.0.731861", "42", None).await.unwrap();
        assert_eq!(
            a.as_prepared().unwrap().unsigned.function_params,
            b.as_prepared().unwrap().unsigned.function_params
        );
    }
}
