//! Executor - the dual-mode core
//!
//! An `Executor` is constructed in exactly one of two modes:
//! - `Prepare`: `run` returns an unsigned `TransactionDescriptor` built
//!   purely from the call spec and the operator account. No network
//!   mutation, no private key involved.
//! - `Execute(SigningContext)`: `run` signs the spec as an EIP-1559
//!   transaction, submits it through the JSON-RPC relay, waits for the
//!   finality receipt and maps its status. A non-success status becomes
//!   `TransactionFailed` and is never retried - resubmitting a
//!   state-changing call risks double execution.
//!
//! Because both arms consume the same `ContractCallSpec`, the encoded
//! function and parameters in a prepared descriptor are byte-for-byte what
//! an execute would submit.

mod query;
mod spec;

pub use query::ReadQuery;
pub use spec::{
    gas, ActionParams, ContractCallSpec, SettlementOutcome, TransactionDescriptor, TxOutcome,
    UnsignedCall,
};

use crate::codec::AccountId;
use crate::error::{Error, ModeError, Result, ValidationError};
use alloy_consensus::{SignableTransaction, TxEip1559};
use alloy_primitives::{Address, B256, TxKind, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Hedera's relay expresses native value in weibars; the ledger itself, and
/// every caller-facing amount, uses tinybars. 1 tinybar = 10^10 weibars.
const TINYBAR_TO_WEIBAR: u64 = 10_000_000_000;

/// How long to poll for a finality receipt before giving up.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const RECEIPT_POLL_ATTEMPTS: u32 = 30;

/// Scale a tinybar amount into the weibar value the relay expects.
fn weibar_value(tinybar: U256) -> Result<U256> {
    tinybar
        .checked_mul(U256::from(TINYBAR_TO_WEIBAR))
        .ok_or_else(|| {
            Error::Validation(ValidationError::InvalidAmount(format!(
                "{tinybar} tinybar overflows the weibar conversion"
            )))
        })
}

// ============================================
// SIGNING CONTEXT / MODE
// ============================================

/// Operator identity plus signing key. Only exists in execute mode.
pub struct SigningContext {
    signer: PrivateKeySigner,
}

impl SigningContext {
    /// Parse an operator key. A missing or malformed key is a
    /// construction-time error, never a per-call one.
    pub fn new(operator_key: &str) -> std::result::Result<Self, ModeError> {
        let trimmed = operator_key.trim().trim_start_matches("0x");
        if trimmed.is_empty() {
            return Err(ModeError::MissingSigningContext(
                "operator key is empty".to_string(),
            ));
        }
        let signer = PrivateKeySigner::from_str(trimmed)
            .map_err(|e| ModeError::MissingSigningContext(format!("unparseable key: {e}")))?;
        Ok(Self { signer })
    }

    pub fn signer_address(&self) -> Address {
        self.signer.address()
    }
}

impl std::fmt::Debug for SigningContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose key material
        f.debug_struct("SigningContext")
            .field("address", &self.signer.address())
            .finish()
    }
}

/// Fixed at construction; call sites never see or branch on this -
/// only `Executor::run` does.
#[derive(Debug)]
pub enum Mode {
    Prepare,
    Execute(SigningContext),
}

// ============================================
// EXECUTOR
// ============================================

#[derive(Debug)]
pub struct Executor {
    mode: Mode,
    operator: AccountId,
    rpc_url: String,
    chain_id: u64,
}

impl Executor {
    /// Prepare-only executor. This path must never require a private key.
    pub fn prepare(operator: AccountId, rpc_url: String, chain_id: u64) -> Self {
        Self {
            mode: Mode::Prepare,
            operator,
            rpc_url,
            chain_id,
        }
    }

    /// Execute-capable executor. Fails up front if no usable signing key
    /// is supplied.
    pub fn with_signing(
        operator: AccountId,
        operator_key: &str,
        rpc_url: String,
        chain_id: u64,
    ) -> std::result::Result<Self, ModeError> {
        let ctx = SigningContext::new(operator_key)?;
        info!("execute mode enabled for operator {}", operator);
        Ok(Self {
            mode: Mode::Execute(ctx),
            operator,
            rpc_url,
            chain_id,
        })
    }

    pub fn operator(&self) -> AccountId {
        self.operator
    }

    /// The operator's long-zero address, used as the default recipient and
    /// on-behalf-of value across adapters.
    pub fn operator_address(&self) -> Address {
        self.operator.to_evm_address()
    }

    pub fn is_execute(&self) -> bool {
        matches!(self.mode, Mode::Execute(_))
    }

    /// The dual-mode entry point: a descriptor in prepare mode, a
    /// settlement outcome in execute mode.
    pub async fn run(&self, spec: ContractCallSpec) -> Result<TxOutcome> {
        match &self.mode {
            Mode::Prepare => {
                debug!(function = spec.function, to = %spec.contract.id, "prepared call");
                Ok(TxOutcome::Prepared(TransactionDescriptor::from_spec(
                    &spec,
                    self.operator,
                )))
            }
            Mode::Execute(ctx) => self.submit(ctx, spec).await.map(TxOutcome::Executed),
        }
    }

    async fn submit(
        &self,
        ctx: &SigningContext,
        spec: ContractCallSpec,
    ) -> Result<SettlementOutcome> {
        let provider = ProviderBuilder::new().connect_http(
            self.rpc_url
                .parse()
                .map_err(|e| Error::network(&self.rpc_url, e))?,
        );

        let from = ctx.signer.address();
        let nonce = provider
            .get_transaction_count(from)
            .await
            .map_err(|e| Error::network(&self.rpc_url, e))?;
        let gas_price = provider
            .get_gas_price()
            .await
            .map_err(|e| Error::network(&self.rpc_url, e))?;

        let value_weibar = weibar_value(spec.payable_tinybar)?;

        let tx = TxEip1559 {
            chain_id: self.chain_id,
            nonce,
            gas_limit: spec.gas,
            max_fee_per_gas: gas_price.saturating_mul(2),
            max_priority_fee_per_gas: 0,
            to: TxKind::Call(spec.contract.address),
            value: value_weibar,
            input: spec.calldata.clone(),
            access_list: Default::default(),
        };

        let sig_hash = tx.signature_hash();
        let signature = ctx
            .signer
            .sign_hash(&sig_hash)
            .await
            .map_err(|e| Error::ContractCall(format!("signing failed: {e}")))?;

        let signed = alloy_consensus::TxEnvelope::Eip1559(alloy_consensus::Signed::new_unchecked(
            tx,
            signature,
            B256::from(from.into_word()),
        ));

        let mut encoded = Vec::new();
        alloy_rlp::Encodable::encode(&signed, &mut encoded);

        debug!(
            function = spec.function,
            to = %spec.contract.id,
            gas = spec.gas,
            "submitting signed transaction"
        );

        let pending = provider
            .send_raw_transaction(&encoded)
            .await
            .map_err(|e| Error::network(&self.rpc_url, e))?;
        let tx_hash = *pending.tx_hash();

        let receipt = self.await_receipt(&provider, tx_hash).await?;
        let transaction_id = format!("{tx_hash:?}");

        if receipt.status() {
            info!(%transaction_id, "transaction settled successfully");
            Ok(SettlementOutcome {
                kind: "executed",
                transaction_id,
                status: "success".to_string(),
            })
        } else {
            warn!(%transaction_id, "transaction reverted on ledger");
            Err(Error::TransactionFailed {
                transaction_id,
                status: 0,
            })
        }
    }

    async fn await_receipt<P: Provider>(
        &self,
        provider: &P,
        tx_hash: B256,
    ) -> Result<alloy_rpc_types::TransactionReceipt> {
        for _ in 0..RECEIPT_POLL_ATTEMPTS {
            if let Some(receipt) = provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| Error::network(&self.rpc_url, e))?
            {
                return Ok(receipt);
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
        Err(Error::network(
            &self.rpc_url,
            format!("no finality receipt for {tx_hash:?} after {RECEIPT_POLL_ATTEMPTS} polls"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ContractRegistry, Network};
    use alloy_primitives::Bytes;

    fn prepare_executor() -> Executor {
        Executor::prepare("0.0.123456".parse().unwrap(), "http://localhost".into(), 295)
    }

    fn dummy_spec() -> ContractCallSpec {
        let amm = ContractRegistry::new(Network::Mainnet).amm().unwrap();
        ContractCallSpec {
            contract: amm.router,
            function: "refundETH()",
            function_name: "refundETH",
            calldata: Bytes::from(vec![0x12, 0x34, 0x56, 0x78]),
            params: ActionParams::Stake {},
            description: "test call".to_string(),
            gas: gas::SWAP,
            payable_tinybar: U256::ZERO,
        }
    }

    #[tokio::test]
    async fn test_prepare_builds_descriptor_without_network() {
        // rpc_url is unroutable on purpose: prepare must not touch it
        let executor = prepare_executor();
        let outcome = executor.run(dummy_spec()).await.unwrap();

        let descriptor = outcome.as_prepared().expect("prepare mode yields descriptor");
        assert_eq!(descriptor.kind, "prepared");
        assert_eq!(descriptor.from, "0.0.123456");
        assert_eq!(descriptor.to, "0.0.3949434");
        assert_eq!(descriptor.unsigned.function_params, "0x12345678");
        assert_eq!(descriptor.value, "0");
    }

    #[test]
    fn test_missing_signing_context_is_construction_error() {
        let operator: AccountId = "0.0.123456".parse().unwrap();
        let err = Executor::with_signing(operator, "", "http://localhost".into(), 295)
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, ModeError::MissingSigningContext(_)));

        let err = Executor::with_signing(operator, "not-a-key", "http://localhost".into(), 295)
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, ModeError::MissingSigningContext(_)));
    }

    #[test]
    fn test_tinybar_to_weibar_scale() {
        // descriptors keep tinybars; only the wire transaction scales up
        let five_hbar_in_tinybar = U256::from(500_000_000u64);
        let weibar = weibar_value(five_hbar_in_tinybar).unwrap();
        assert_eq!(weibar, U256::from(5_000_000_000_000_000_000u64));
    }

    #[test]
    fn test_weibar_conversion_rejects_overflow() {
        assert!(matches!(
            weibar_value(U256::MAX),
            Err(Error::Validation(ValidationError::InvalidAmount(_)))
        ));
    }

    #[test]
    fn test_descriptor_params_are_byte_identical_to_spec() {
        let spec = dummy_spec();
        let descriptor = TransactionDescriptor::from_spec(&spec, "0.0.123456".parse().unwrap());
        assert_eq!(
            descriptor.unsigned.function_params,
            format!("0x{}", hex::encode(&spec.calldata))
        );
        assert_eq!(descriptor.unsigned.function_name, spec.function_name);
    }
}
