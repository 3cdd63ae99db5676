//! HeliSwap adapter - V2-style constant-product pairs (mainnet only)
//!
//! Read-only surface: the factory resolves a pair for two tokens, the pair
//! exposes reserves and LP supply. A zero pair address from the factory
//! means the pair was never created - that is `None`, not an error.

use crate::error::{Error, Result};
use crate::executor::ReadQuery;
use crate::registry::ContractRegistry;
use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use serde::Serialize;

use super::parse_amount;

sol! {
    interface IHeliswapFactory {
        function getPair(address tokenA, address tokenB) external view returns (address pair);
    }

    interface IHeliswapPair {
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
        function token0() external view returns (address);
        function token1() external view returns (address);
        function totalSupply() external view returns (uint256);
    }

    interface IHeliswapRouter {
        function getAmountOut(uint256 amountIn, uint256 reserveIn, uint256 reserveOut) external pure returns (uint256 amountOut);
    }
}

/// A live pair: its address, canonical token ordering and pool state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairInfo {
    pub pair_address: String,
    pub token0: String,
    pub token1: String,
    pub reserve0: String,
    pub reserve1: String,
    pub total_supply: String,
}

pub struct HeliswapAdapter<'a> {
    registry: ContractRegistry,
    query: &'a ReadQuery,
}

impl<'a> HeliswapAdapter<'a> {
    pub fn new(registry: ContractRegistry, query: &'a ReadQuery) -> Self {
        Self { registry, query }
    }

    /// Resolve the pair contract for two tokens, `None` if it was never
    /// created.
    pub async fn pair_address(
        &self,
        token_a: Address,
        token_b: Address,
    ) -> Result<Option<Address>> {
        let factory = self.registry.heliswap()?.factory;

        let call = IHeliswapFactory::getPairCall {
            tokenA: token_a,
            tokenB: token_b,
        };
        let output = self.query.call(factory.address, call.abi_encode()).await?;
        let pair = IHeliswapFactory::getPairCall::abi_decode_returns(&output)
            .map_err(|e| Error::contract_call(format!("failed to decode getPair: {e}")))?;

        Ok((pair != Address::ZERO).then_some(pair))
    }

    /// Full pair snapshot: canonical token order, reserves, LP supply.
    pub async fn pair_info(&self, token_a: Address, token_b: Address) -> Result<Option<PairInfo>> {
        let Some(pair) = self.pair_address(token_a, token_b).await? else {
            return Ok(None);
        };

        let reserves_blob = self
            .query
            .call(pair, IHeliswapPair::getReservesCall {}.abi_encode())
            .await?;
        let reserves = IHeliswapPair::getReservesCall::abi_decode_returns(&reserves_blob)
            .map_err(|e| Error::contract_call(format!("failed to decode getReserves: {e}")))?;

        let token0_blob = self
            .query
            .call(pair, IHeliswapPair::token0Call {}.abi_encode())
            .await?;
        let token0 = IHeliswapPair::token0Call::abi_decode_returns(&token0_blob)
            .map_err(|e| Error::contract_call(format!("failed to decode token0: {e}")))?;

        let token1_blob = self
            .query
            .call(pair, IHeliswapPair::token1Call {}.abi_encode())
            .await?;
        let token1 = IHeliswapPair::token1Call::abi_decode_returns(&token1_blob)
            .map_err(|e| Error::contract_call(format!("failed to decode token1: {e}")))?;

        let supply_blob = self
            .query
            .call(pair, IHeliswapPair::totalSupplyCall {}.abi_encode())
            .await?;
        let total_supply = IHeliswapPair::totalSupplyCall::abi_decode_returns(&supply_blob)
            .map_err(|e| Error::contract_call(format!("failed to decode totalSupply: {e}")))?;

        Ok(Some(PairInfo {
            pair_address: format!("{pair:?}"),
            token0: format!("{token0:?}"),
            token1: format!("{token1:?}"),
            reserve0: reserves.reserve0.to_string(),
            reserve1: reserves.reserve1.to_string(),
            total_supply: total_supply.to_string(),
        }))
    }

    /// Constant-product output for an input amount against given reserves.
    pub async fn amount_out(
        &self,
        amount_in: &str,
        reserve_in: &str,
        reserve_out: &str,
    ) -> Result<String> {
        let router = self.registry.heliswap()?.router;

        let call = IHeliswapRouter::getAmountOutCall {
            amountIn: parse_amount(amount_in)?,
            reserveIn: parse_amount(reserve_in)?,
            reserveOut: parse_amount(reserve_out)?,
        };
        let output = self.query.call(router.address, call.abi_encode()).await?;
        let amount: U256 = IHeliswapRouter::getAmountOutCall::abi_decode_returns(&output)
            .map_err(|e| Error::contract_call(format!("failed to decode getAmountOut: {e}")))?;

        Ok(amount.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModeError;
    use crate::registry::Network;

    #[tokio::test]
    async fn test_unavailable_on_testnet_before_any_network_call() {
        let registry = ContractRegistry::new(Network::Testnet);
        let query = ReadQuery::new("http://localhost".into());
        let adapter = HeliswapAdapter::new(registry, &query);

        let err = adapter
            .pair_address(Address::ZERO, Address::ZERO)
            .await
            .unwrap_err();
        match err {
            Error::Mode(ModeError::UnavailableOnNetwork { network, .. }) => {
                assert_eq!(network, Network::Testnet)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_get_pair_encodes_both_tokens() {
        let a = Address::from_slice(&[0xAA; 20]);
        let b = Address::from_slice(&[0xBB; 20]);
        let encoded = IHeliswapFactory::getPairCall {
            tokenA: a,
            tokenB: b,
        }
        .abi_encode();

        // selector + two 32-byte padded addresses
        assert_eq!(encoded.len(), 4 + 64);
        assert_eq!(&encoded[16..36], a.as_slice());
        assert_eq!(&encoded[48..68], b.as_slice());
    }
}
