//! Call specs and dual-mode result types
//!
//! A `ContractCallSpec` is built fresh for every operation and never cached,
//! so prepare and execute always derive from the same encoding. The two
//! caller-visible shapes are `TransactionDescriptor` (prepare) and
//! `SettlementOutcome` (execute).

use crate::codec::AccountId;
use crate::registry::Contract;
use alloy_primitives::{Bytes, U256};
use serde::Serialize;

// ============================================
// PER-ACTION GAS CEILINGS
// ============================================

/// Fixed gas limits per action type. These are deliberate constants, not
/// simulation-derived values - one ceiling per action keeps prepare mode
/// free of network round trips.
pub mod gas {
    pub const LENDING: u64 = 800_000;
    pub const COLLATERAL: u64 = 300_000;
    pub const SWAP: u64 = 1_200_000;
    pub const STAKE: u64 = 200_000;
    pub const UNSTAKE: u64 = 200_000;
    pub const SAUCE_STAKE: u64 = 250_000;
    pub const FARM: u64 = 450_000;
    pub const QUERY: u64 = 100_000;
}

// ============================================
// TYPED PER-ACTION PARAMETERS
// ============================================

/// Closed set of parameter shapes, one variant per action, so every
/// descriptor's `params` field is statically known and testable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionParams {
    #[serde(rename_all = "camelCase")]
    Deposit {
        asset: String,
        amount: String,
        on_behalf_of: String,
        referral_code: u16,
    },
    Withdraw {
        asset: String,
        amount: String,
        to: String,
    },
    #[serde(rename_all = "camelCase")]
    Borrow {
        asset: String,
        amount: String,
        rate_mode: u8,
        referral_code: u16,
        on_behalf_of: String,
    },
    #[serde(rename_all = "camelCase")]
    Repay {
        asset: String,
        amount: String,
        rate_mode: u8,
        on_behalf_of: String,
    },
    #[serde(rename_all = "camelCase")]
    SetCollateral {
        asset: String,
        use_as_collateral: bool,
    },
    #[serde(rename_all = "camelCase")]
    SwapExactInput {
        path: String,
        recipient: String,
        deadline: u64,
        amount_in: String,
        amount_out_minimum: String,
    },
    #[serde(rename_all = "camelCase")]
    SwapExactOutput {
        path: String,
        recipient: String,
        deadline: u64,
        amount_out: String,
        amount_in_maximum: String,
    },
    /// Payable `stake()` carries no ABI parameters.
    Stake {},
    Unstake {
        amount: String,
    },
    StakeSauce {
        amount: String,
    },
    UnstakeXsauce {
        amount: String,
    },
    #[serde(rename_all = "camelCase")]
    FarmDeposit {
        pool_id: u64,
        amount: String,
        deposit_fee: String,
    },
    #[serde(rename_all = "camelCase")]
    FarmWithdraw {
        pool_id: u64,
        amount: String,
    },
}

// ============================================
// CONTRACT CALL SPEC
// ============================================

/// A fully resolved, fully encoded contract call. Immutable once built;
/// both prepare and execute consume it unchanged, which is what makes the
/// two modes byte-equivalent.
#[derive(Debug, Clone)]
pub struct ContractCallSpec {
    pub contract: Contract,
    /// Full Solidity signature, e.g. `deposit(address,uint256,address,uint16)`.
    pub function: &'static str,
    pub function_name: &'static str,
    /// Selector + ABI-encoded arguments.
    pub calldata: Bytes,
    pub params: ActionParams,
    pub description: String,
    pub gas: u64,
    /// Native value attached to the call, in tinybars. Zero unless the
    /// action transfers HBAR.
    pub payable_tinybar: U256,
}

// ============================================
// RESULT SHAPES
// ============================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedCall {
    pub contract_id: String,
    pub function_name: String,
    /// Raw encoded call (selector + arguments) for external signing.
    pub function_params: String,
    pub payable_amount: String,
}

/// Prepare-mode result: an unsigned, fully specified contract call.
/// Carries no signature and triggers no network mutation.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionDescriptor {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: String,
    pub from: String,
    pub to: String,
    pub function: String,
    pub params: ActionParams,
    pub value: String,
    pub gas: u64,
    pub unsigned: UnsignedCall,
}

impl TransactionDescriptor {
    pub fn from_spec(spec: &ContractCallSpec, operator: AccountId) -> Self {
        Self {
            kind: "prepared",
            description: spec.description.clone(),
            from: operator.to_string(),
            to: spec.contract.id.to_string(),
            function: spec.function.to_string(),
            params: spec.params.clone(),
            value: spec.payable_tinybar.to_string(),
            gas: spec.gas,
            unsigned: UnsignedCall {
                contract_id: spec.contract.id.to_string(),
                function_name: spec.function_name.to_string(),
                function_params: format!("0x{}", hex::encode(&spec.calldata)),
                payable_amount: spec.payable_tinybar.to_string(),
            },
        }
    }
}

/// Execute-mode result, produced only after the ledger finalized the
/// transaction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementOutcome {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub transaction_id: String,
    pub status: String,
}

/// What `Executor::run` hands back: one of the two canonical shapes.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TxOutcome {
    Prepared(TransactionDescriptor),
    Executed(SettlementOutcome),
}

impl TxOutcome {
    pub fn as_prepared(&self) -> Option<&TransactionDescriptor> {
        match self {
            TxOutcome::Prepared(d) => Some(d),
            TxOutcome::Executed(_) => None,
        }
    }
}
