//! Protocol adapters
//!
//! One adapter per protocol, each following the same template:
//! validate arguments, resolve contracts through the registry, encode the
//! call, delegate the resulting spec to the executor. Adapters never branch
//! on the executor's mode - they only ever see `TxOutcome`.

pub mod farm;
pub mod heliswap;
pub mod lending;
pub mod router;
pub mod staking;

pub use farm::FarmAdapter;
pub use heliswap::{HeliswapAdapter, PairInfo};
pub use lending::{AccountHealth, LendingAdapter};
pub use router::{RouterAdapter, SwapQuote};
pub use staking::{ExchangeRate, StakingAdapter};

use crate::error::ValidationError;
use alloy_primitives::U256;

/// Parse a smallest-unit amount. Amounts are always non-negative base-10
/// integer strings - never floating point.
pub(crate) fn parse_amount(s: &str) -> Result<U256, ValidationError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidAmount(s.to_string()));
    }
    U256::from_str_radix(s, 10).map_err(|_| ValidationError::InvalidAmount(s.to_string()))
}

/// Aave-style interest rate mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateMode {
    Stable,
    Variable,
}

impl RateMode {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.to_lowercase().as_str() {
            "stable" | "1" => Ok(RateMode::Stable),
            "variable" | "2" => Ok(RateMode::Variable),
            _ => Err(ValidationError::InvalidRateMode(s.to_string())),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            RateMode::Stable => 1,
            RateMode::Variable => 2,
        }
    }
}

/// Default swap deadline: now plus three minutes.
pub(crate) fn default_deadline() -> u64 {
    chrono::Utc::now().timestamp() as u64 + 180
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_accepts_full_width_integers() {
        assert_eq!(parse_amount("0").unwrap(), U256::ZERO);
        assert_eq!(parse_amount("1000000").unwrap(), U256::from(1_000_000u64));
        // wider than u128
        let big = "340282366920938463463374607431768211457";
        assert!(parse_amount(big).unwrap() > U256::from(u128::MAX));
    }

    #[test]
    fn test_parse_amount_rejects_non_integers() {
        for bad in ["", "-1", "1.5", "1e6", " 100", "0x10"] {
            assert!(matches!(
                parse_amount(bad),
                Err(ValidationError::InvalidAmount(_))
            ));
        }
    }

    #[test]
    fn test_rate_mode_parse() {
        assert_eq!(RateMode::parse("stable").unwrap(), RateMode::Stable);
        assert_eq!(RateMode::parse("Variable").unwrap(), RateMode::Variable);
        assert_eq!(RateMode::parse("2").unwrap().as_u8(), 2);
        assert!(RateMode::parse("fixed").is_err());
    }
}
