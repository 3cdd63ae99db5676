//! SaucerSwap V2 adapter - concentrated-liquidity router and quoter
//!
//! Swaps are router `exactInput`/`exactOutput` calls over the compact path
//! blob. The native-currency rules:
//! - HBAR -> token routes through WHBAR as the first hop and attaches the
//!   input amount as the call's payable value, with a `refundETH` sub-call
//!   batched behind the swap to return dust.
//! - token -> HBAR makes the router itself the swap recipient and batches
//!   an `unwrapWHBAR` sub-call targeting the caller's real address, so the
//!   router (not the caller) holds the wrapped intermediate token.
//!
//! Both batchings go through the router's `multicall`, keeping the chained
//! effects atomic in one ledger transaction.

use crate::codec;
use crate::error::{Error, Result};
use crate::executor::{gas, ActionParams, ContractCallSpec, Executor, ReadQuery, TxOutcome};
use crate::path::{encode_path, encode_reversed_path};
use crate::registry::ContractRegistry;
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use serde::Serialize;
use tracing::debug;

use super::{default_deadline, parse_amount};

sol! {
    /// SaucerSwap V2 SwapRouter (Uniswap V3 periphery layout).
    interface ISwapRouter {
        struct ExactInputParams {
            bytes path;
            address recipient;
            uint256 deadline;
            uint256 amountIn;
            uint256 amountOutMinimum;
        }

        struct ExactOutputParams {
            bytes path;
            address recipient;
            uint256 deadline;
            uint256 amountOut;
            uint256 amountInMaximum;
        }

        function exactInput(ExactInputParams calldata params) external payable returns (uint256 amountOut);
        function exactOutput(ExactOutputParams calldata params) external payable returns (uint256 amountIn);
        function multicall(bytes[] calldata data) external payable returns (bytes[] memory results);
        function refundETH() external payable;
        function unwrapWHBAR(uint256 amountMinimum, address recipient) external payable;
    }

    /// SaucerSwap V2 QuoterV2.
    interface IQuoter {
        function quoteExactInput(bytes memory path, uint256 amountIn)
            external
            returns (
                uint256 amountOut,
                uint160[] memory sqrtPriceX96AfterList,
                uint32[] memory initializedTicksCrossedList,
                uint256 gasEstimate
            );

        function quoteExactOutput(bytes memory path, uint256 amountOut)
            external
            returns (
                uint256 amountIn,
                uint160[] memory sqrtPriceX96AfterList,
                uint32[] memory initializedTicksCrossedList,
                uint256 gasEstimate
            );
    }
}

/// Full quoter return, including the per-hop dynamic arrays.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    pub amount: String,
    pub sqrt_price_x96_after: Vec<String>,
    pub initialized_ticks_crossed: Vec<u32>,
    pub gas_estimate: String,
}

pub struct RouterAdapter<'a> {
    registry: ContractRegistry,
    executor: &'a Executor,
    query: &'a ReadQuery,
}

impl<'a> RouterAdapter<'a> {
    pub fn new(registry: ContractRegistry, executor: &'a Executor, query: &'a ReadQuery) -> Self {
        Self {
            registry,
            executor,
            query,
        }
    }

    fn resolve_tokens(tokens: &[String]) -> Result<Vec<Address>> {
        tokens
            .iter()
            .map(|t| codec::to_evm_address(t).map_err(Into::into))
            .collect()
    }

    fn recipient_or_operator(&self, recipient: Option<&str>) -> Result<Address> {
        Ok(match recipient {
            Some(r) => codec::to_evm_address(r)?,
            None => self.executor.operator_address(),
        })
    }

    // ========== Swaps ==========

    /// Swap an exact token input along an arbitrary multi-hop path.
    pub async fn swap_exact_input(
        &self,
        tokens: &[String],
        fees: &[u32],
        amount_in: &str,
        amount_out_minimum: &str,
        recipient: Option<&str>,
        deadline: Option<u64>,
    ) -> Result<TxOutcome> {
        let addrs = Self::resolve_tokens(tokens)?;
        let path = encode_path(&addrs, fees)?;
        let amount = parse_amount(amount_in)?;
        let min_out = parse_amount(amount_out_minimum)?;
        let recipient_addr = self.recipient_or_operator(recipient)?;
        let deadline = deadline.unwrap_or_else(default_deadline);
        let router = self.registry.amm()?.router;

        let call = ISwapRouter::exactInputCall {
            params: ISwapRouter::ExactInputParams {
                path: path.clone(),
                recipient: recipient_addr,
                deadline: U256::from(deadline),
                amountIn: amount,
                amountOutMinimum: min_out,
            },
        };

        self.executor
            .run(ContractCallSpec {
                contract: router,
                function: "exactInput((bytes,address,uint256,uint256,uint256))",
                function_name: "exactInput",
                calldata: Bytes::from(call.abi_encode()),
                params: ActionParams::SwapExactInput {
                    path: format!("0x{}", hex::encode(&path)),
                    recipient: recipient_addr.to_string(),
                    deadline,
                    amount_in: amount_in.to_string(),
                    amount_out_minimum: amount_out_minimum.to_string(),
                },
                description: format!(
                    "Swap exactly {amount_in} of {} for at least {amount_out_minimum} of {}",
                    addrs[0],
                    addrs[addrs.len() - 1]
                ),
                gas: gas::SWAP,
                payable_tinybar: U256::ZERO,
            })
            .await
    }

    /// Swap for an exact token output. The route is reversed (lists, not
    /// bytes) before encoding, as the router expects for exact-output.
    pub async fn swap_exact_output(
        &self,
        tokens: &[String],
        fees: &[u32],
        amount_out: &str,
        amount_in_maximum: &str,
        recipient: Option<&str>,
        deadline: Option<u64>,
    ) -> Result<TxOutcome> {
        let addrs = Self::resolve_tokens(tokens)?;
        let path = encode_reversed_path(&addrs, fees)?;
        let amount = parse_amount(amount_out)?;
        let max_in = parse_amount(amount_in_maximum)?;
        let recipient_addr = self.recipient_or_operator(recipient)?;
        let deadline = deadline.unwrap_or_else(default_deadline);
        let router = self.registry.amm()?.router;

        let call = ISwapRouter::exactOutputCall {
            params: ISwapRouter::ExactOutputParams {
                path: path.clone(),
                recipient: recipient_addr,
                deadline: U256::from(deadline),
                amountOut: amount,
                amountInMaximum: max_in,
            },
        };

        self.executor
            .run(ContractCallSpec {
                contract: router,
                function: "exactOutput((bytes,address,uint256,uint256,uint256))",
                function_name: "exactOutput",
                calldata: Bytes::from(call.abi_encode()),
                params: ActionParams::SwapExactOutput {
                    path: format!("0x{}", hex::encode(&path)),
                    recipient: recipient_addr.to_string(),
                    deadline,
                    amount_out: amount_out.to_string(),
                    amount_in_maximum: amount_in_maximum.to_string(),
                },
                description: format!(
                    "Swap at most {amount_in_maximum} of {} for exactly {amount_out} of {}",
                    addrs[0],
                    addrs[addrs.len() - 1]
                ),
                gas: gas::SWAP,
                payable_tinybar: U256::ZERO,
            })
            .await
    }

    /// Swap exact HBAR for tokens: WHBAR is the first hop, the input HBAR
    /// rides as the payable value, and leftover wrapped dust is refunded.
    pub async fn swap_hbar_for_tokens(
        &self,
        output_token: &str,
        fee: u32,
        amount_in_tinybar: &str,
        amount_out_minimum: &str,
        recipient: Option<&str>,
        deadline: Option<u64>,
    ) -> Result<TxOutcome> {
        let amm = self.registry.amm()?;
        let out_addr = codec::to_evm_address(output_token)?;
        let amount = parse_amount(amount_in_tinybar)?;
        let min_out = parse_amount(amount_out_minimum)?;
        let recipient_addr = self.recipient_or_operator(recipient)?;
        let deadline = deadline.unwrap_or_else(default_deadline);

        let path = encode_path(&[amm.whbar.address, out_addr], &[fee])?;

        let swap = ISwapRouter::exactInputCall {
            params: ISwapRouter::ExactInputParams {
                path: path.clone(),
                recipient: recipient_addr,
                deadline: U256::from(deadline),
                amountIn: amount,
                amountOutMinimum: min_out,
            },
        };
        let refund = ISwapRouter::refundETHCall {};

        let batch = ISwapRouter::multicallCall {
            data: vec![
                Bytes::from(swap.abi_encode()),
                Bytes::from(refund.abi_encode()),
            ],
        };

        debug!(fee, %out_addr, "HBAR -> token swap batched with refund");

        self.executor
            .run(ContractCallSpec {
                contract: amm.router,
                function: "multicall(bytes[])",
                function_name: "multicall",
                calldata: Bytes::from(batch.abi_encode()),
                params: ActionParams::SwapExactInput {
                    path: format!("0x{}", hex::encode(&path)),
                    recipient: recipient_addr.to_string(),
                    deadline,
                    amount_in: amount_in_tinybar.to_string(),
                    amount_out_minimum: amount_out_minimum.to_string(),
                },
                description: format!(
                    "Swap exactly {amount_in_tinybar} tinybar of HBAR for at least {amount_out_minimum} of {out_addr}"
                ),
                gas: gas::SWAP,
                payable_tinybar: amount,
            })
            .await
    }

    /// Swap exact tokens for HBAR: the router receives the wrapped output
    /// and an `unwrapWHBAR` sub-call delivers native HBAR to the caller.
    pub async fn swap_tokens_for_hbar(
        &self,
        input_token: &str,
        fee: u32,
        amount_in: &str,
        amount_out_minimum: &str,
        recipient: Option<&str>,
        deadline: Option<u64>,
    ) -> Result<TxOutcome> {
        let amm = self.registry.amm()?;
        let in_addr = codec::to_evm_address(input_token)?;
        let amount = parse_amount(amount_in)?;
        let min_out = parse_amount(amount_out_minimum)?;
        let recipient_addr = self.recipient_or_operator(recipient)?;
        let deadline = deadline.unwrap_or_else(default_deadline);

        let path = encode_path(&[in_addr, amm.whbar.address], &[fee])?;

        // The router must hold the WHBAR so the unwrap step can burn it.
        let swap = ISwapRouter::exactInputCall {
            params: ISwapRouter::ExactInputParams {
                path: path.clone(),
                recipient: amm.router.address,
                deadline: U256::from(deadline),
                amountIn: amount,
                amountOutMinimum: min_out,
            },
        };
        let unwrap = ISwapRouter::unwrapWHBARCall {
            amountMinimum: min_out,
            recipient: recipient_addr,
        };

        let batch = ISwapRouter::multicallCall {
            data: vec![
                Bytes::from(swap.abi_encode()),
                Bytes::from(unwrap.abi_encode()),
            ],
        };

        debug!(fee, %in_addr, "token -> HBAR swap batched with unwrap");

        self.executor
            .run(ContractCallSpec {
                contract: amm.router,
                function: "multicall(bytes[])",
                function_name: "multicall",
                calldata: Bytes::from(batch.abi_encode()),
                params: ActionParams::SwapExactInput {
                    path: format!("0x{}", hex::encode(&path)),
                    recipient: recipient_addr.to_string(),
                    deadline,
                    amount_in: amount_in.to_string(),
                    amount_out_minimum: amount_out_minimum.to_string(),
                },
                description: format!(
                    "Swap exactly {amount_in} of {in_addr} for at least {amount_out_minimum} tinybar of HBAR"
                ),
                gas: gas::SWAP,
                payable_tinybar: U256::ZERO,
            })
            .await
    }

    // ========== Quotes ==========

    /// Simulate a swap's output through the quoter contract.
    pub async fn quote_exact_input(
        &self,
        tokens: &[String],
        fees: &[u32],
        amount_in: &str,
    ) -> Result<SwapQuote> {
        let addrs = Self::resolve_tokens(tokens)?;
        let path = encode_path(&addrs, fees)?;
        let amount = parse_amount(amount_in)?;
        let quoter = self.registry.amm()?.quoter;

        let calldata = IQuoter::quoteExactInputCall {
            path,
            amountIn: amount,
        }
        .abi_encode();

        let output = self.query.call(quoter.address, calldata).await?;
        let decoded = IQuoter::quoteExactInputCall::abi_decode_returns(&output)
            .map_err(|e| Error::contract_call(format!("failed to decode quoteExactInput: {e}")))?;

        Ok(SwapQuote {
            amount: decoded.amountOut.to_string(),
            sqrt_price_x96_after: decoded
                .sqrtPriceX96AfterList
                .iter()
                .map(|p| p.to_string())
                .collect(),
            initialized_ticks_crossed: decoded.initializedTicksCrossedList,
            gas_estimate: decoded.gasEstimate.to_string(),
        })
    }

    /// Simulate the input needed for an exact output. The route is
    /// reversed before encoding.
    pub async fn quote_exact_output(
        &self,
        tokens: &[String],
        fees: &[u32],
        amount_out: &str,
    ) -> Result<SwapQuote> {
        let addrs = Self::resolve_tokens(tokens)?;
        let path = encode_reversed_path(&addrs, fees)?;
        let amount = parse_amount(amount_out)?;
        let quoter = self.registry.amm()?.quoter;

        let calldata = IQuoter::quoteExactOutputCall {
            path,
            amountOut: amount,
        }
        .abi_encode();

        let output = self.query.call(quoter.address, calldata).await?;
        let decoded = IQuoter::quoteExactOutputCall::abi_decode_returns(&output)
            .map_err(|e| Error::contract_call(format!("failed to decode quoteExactOutput: {e}")))?;

        Ok(SwapQuote {
            amount: decoded.amountIn.to_string(),
            sqrt_price_x96_after: decoded
                .sqrtPriceX96AfterList
                .iter()
                .map(|p| p.to_string())
                .collect(),
            initialized_ticks_crossed: decoded.initializedTicksCrossedList,
            gas_estimate: decoded.gasEstimate.to_string(),
        })
    }
}
