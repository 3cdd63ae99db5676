//! Error taxonomy for hashfi
//!
//! Every fallible path in the library maps onto exactly one of these
//! categories, so the binary boundary can turn any failure into a single
//! caller-visible message without inspecting internals:
//! - Validation: malformed arguments, raised before any network access
//! - Mode: missing signing context or protocol absent on the network,
//!   raised before any network access
//! - Network: a REST call failed or timed out (carries the endpoint)
//! - ContractCall: a view call reverted or returned undecodable data
//! - TransactionFailed: the ledger finalized a submitted transaction
//!   with a non-success status (never retried automatically)

use crate::registry::{Network, Protocol};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Mode(#[from] ModeError),

    #[error("request to {endpoint} failed: {message}")]
    Network { endpoint: String, message: String },

    #[error("contract call failed: {0}")]
    ContractCall(String),

    #[error("transaction {transaction_id} failed with status {status}")]
    TransactionFailed { transaction_id: String, status: u64 },
}

/// Malformed caller arguments. Always raised before touching the network.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid account id `{0}` - expected dotted form like 0.0.123456")]
    InvalidAccountId(String),

    #[error("invalid swap path: {0}")]
    InvalidPath(String),

    #[error("invalid amount `{0}` - expected a base-10 integer string of smallest units")]
    InvalidAmount(String),

    #[error("invalid rate mode `{0}` - expected `stable` or `variable`")]
    InvalidRateMode(String),
}

/// Capability errors decided at construction or resolution time,
/// before any network access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModeError {
    #[error("execute mode requires an operator signing key ({0})")]
    MissingSigningContext(String),

    #[error("{protocol} has no deployment on {network}")]
    UnavailableOnNetwork { protocol: Protocol, network: Network },
}

impl Error {
    /// Network failures carry the originating endpoint for diagnosis.
    pub fn network(endpoint: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Error::Network {
            endpoint: endpoint.into(),
            message: err.to_string(),
        }
    }

    pub fn contract_call(err: impl std::fmt::Display) -> Self {
        Error::ContractCall(err.to_string())
    }
}
