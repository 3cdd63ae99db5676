//! Read-only contract queries
//!
//! Sibling of the executor for pure view calls. Never mutates state and
//! never produces a descriptor - just `eth_call` against the relay, with
//! the return blob handed back for positional decoding at the adapter.

use crate::error::{Error, Result};
use alloy_primitives::Address;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ReadQuery {
    rpc_url: String,
}

impl ReadQuery {
    pub fn new(rpc_url: String) -> Self {
        Self { rpc_url }
    }

    /// Perform a non-mutating contract call and return the raw ABI blob.
    pub async fn call(&self, to: Address, calldata: Vec<u8>) -> Result<Vec<u8>> {
        let provider = ProviderBuilder::new().connect_http(
            self.rpc_url
                .parse()
                .map_err(|e| Error::network(&self.rpc_url, e))?,
        );

        let tx = TransactionRequest::default().to(to).input(calldata.into());

        debug!(to = ?to, "view call");
        let result = provider
            .call(tx)
            .await
            .map_err(|e| Error::contract_call(format!("eth_call to {to:?} failed: {e}")))?;

        Ok(result.to_vec())
    }
}
