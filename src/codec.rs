//! Account/contract address codec
//!
//! Hedera identifies accounts and contracts with dotted numeric ids
//! (`shard.realm.num`), while ABI encoding wants 20-byte EVM addresses.
//! The bridge is the "long-zero" form: shard as 4 bytes, realm as 8 bytes,
//! num as 8 bytes, packed big-endian into the address. The mapping is pure
//! and injective, so distinct ids never collide and the reverse direction
//! is exact for any long-zero address.

use crate::error::ValidationError;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Hedera entity id in `shard.realm.num` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl AccountId {
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }

    /// Long-zero EVM address for this id.
    pub fn to_evm_address(&self) -> Address {
        let mut buf = [0u8; 20];
        buf[0..4].copy_from_slice(&(self.shard as u32).to_be_bytes());
        buf[4..12].copy_from_slice(&self.realm.to_be_bytes());
        buf[12..20].copy_from_slice(&self.num.to_be_bytes());
        Address::from(buf)
    }

    /// Recover the dotted id from a long-zero address.
    pub fn from_evm_address(address: &Address) -> Self {
        let bytes = address.as_slice();
        let shard = u32::from_be_bytes(bytes[0..4].try_into().unwrap()) as u64;
        let realm = u64::from_be_bytes(bytes[4..12].try_into().unwrap());
        let num = u64::from_be_bytes(bytes[12..20].try_into().unwrap());
        Self { shard, realm, num }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for AccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ValidationError::InvalidAccountId(s.to_string());
        let mut parts = s.split('.');
        let shard = parts.next().ok_or_else(bad)?;
        let realm = parts.next().ok_or_else(bad)?;
        let num = parts.next().ok_or_else(bad)?;
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok(Self {
            shard: shard.parse().map_err(|_| bad())?,
            realm: realm.parse().map_err(|_| bad())?,
            num: num.parse().map_err(|_| bad())?,
        })
    }
}

/// Convert a ledger account identifier into the 20-byte contract-call
/// address form. Inputs already in `0x` address form pass through unchanged.
pub fn to_evm_address(id: &str) -> Result<Address, ValidationError> {
    if let Some(hex_part) = id.strip_prefix("0x") {
        if hex_part.len() == 40 {
            return Address::from_str(id)
                .map_err(|_| ValidationError::InvalidAccountId(id.to_string()));
        }
        return Err(ValidationError::InvalidAccountId(id.to_string()));
    }
    Ok(id.parse::<AccountId>()?.to_evm_address())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_zero_padding() {
        let addr = to_evm_address("0.0.1").unwrap();
        assert_eq!(
            format!("{addr:?}").to_lowercase(),
            "0x0000000000000000000000000000000000000001"
        );

        let addr = to_evm_address("0.0.1460199").unwrap();
        // 1460199 = 0x1647e7, right-aligned in the 20-byte address
        assert_eq!(
            format!("{addr:?}").to_lowercase(),
            "0x00000000000000000000000000000000001647e7"
        );
    }

    #[test]
    fn test_injective_over_distinct_ids() {
        let ids = ["0.0.1", "0.0.2", "0.0.1460199", "0.0.731861", "1.0.1"];
        let mut seen = std::collections::HashSet::new();
        for id in ids {
            assert!(seen.insert(to_evm_address(id).unwrap()), "collision for {id}");
        }
    }

    #[test]
    fn test_idempotent_on_address_form() {
        let already = "0x00000000000000000000000000000000002cc9B2";
        let addr = to_evm_address(already).unwrap();
        assert_eq!(addr, Address::from_str(already).unwrap());
    }

    #[test]
    fn test_rejects_malformed_ids() {
        for bad in ["", "0.0", "0.0.0.0", "0.0.abc", "hello", "0xzz", "0x1234"] {
            assert!(matches!(
                to_evm_address(bad),
                Err(ValidationError::InvalidAccountId(_))
            ));
        }
    }

    #[test]
    fn test_dotted_round_trip() {
        let id: AccountId = "0.0.3949434".parse().unwrap();
        let back = AccountId::from_evm_address(&id.to_evm_address());
        assert_eq!(id, back);
        assert_eq!(back.to_string(), "0.0.3949434");
    }
}
