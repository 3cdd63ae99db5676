//! Multi-hop swap path codec
//!
//! SaucerSwap V2 routers (Uniswap V3 layout) consume a compact byte path:
//! token (20B), then per hop a fee tier as a 3-byte big-endian integer
//! followed by the next token (20B). No padding beyond the fixed widths.
//!
//! Exact-output quoting wants the reversed route; that is done by reversing
//! both input lists before encoding, never by reversing the encoded bytes.

use crate::error::ValidationError;
use alloy_primitives::{Address, Bytes};

const ADDR_LEN: usize = 20;
const FEE_LEN: usize = 3;

/// Largest fee tier representable in the 3-byte wire field.
const MAX_FEE: u32 = 0xFF_FFFF;

/// Encode a token/fee route into the router's path blob.
///
/// Requires `tokens.len() == fees.len() + 1` and at least two tokens.
pub fn encode_path(tokens: &[Address], fees: &[u32]) -> Result<Bytes, ValidationError> {
    if tokens.len() < 2 {
        return Err(ValidationError::InvalidPath(format!(
            "need at least 2 tokens, got {}",
            tokens.len()
        )));
    }
    if tokens.len() != fees.len() + 1 {
        return Err(ValidationError::InvalidPath(format!(
            "{} tokens require {} fees, got {}",
            tokens.len(),
            tokens.len() - 1,
            fees.len()
        )));
    }

    if let Some(fee) = fees.iter().find(|f| **f > MAX_FEE) {
        return Err(ValidationError::InvalidPath(format!(
            "fee tier {fee} exceeds the 3-byte maximum {MAX_FEE}"
        )));
    }

    let mut out = Vec::with_capacity(tokens.len() * ADDR_LEN + fees.len() * FEE_LEN);
    out.extend_from_slice(tokens[0].as_slice());
    for (fee, token) in fees.iter().zip(&tokens[1..]) {
        out.extend_from_slice(&fee.to_be_bytes()[1..4]);
        out.extend_from_slice(token.as_slice());
    }
    Ok(Bytes::from(out))
}

/// Decode a path blob back into its token and fee sequences.
pub fn decode_path(path: &[u8]) -> Result<(Vec<Address>, Vec<u32>), ValidationError> {
    let hop = ADDR_LEN + FEE_LEN;
    if path.len() < ADDR_LEN + hop || (path.len() - ADDR_LEN) % hop != 0 {
        return Err(ValidationError::InvalidPath(format!(
            "path blob has invalid length {}",
            path.len()
        )));
    }

    let mut tokens = vec![Address::from_slice(&path[..ADDR_LEN])];
    let mut fees = Vec::new();
    let mut offset = ADDR_LEN;
    while offset < path.len() {
        let fee = u32::from_be_bytes([0, path[offset], path[offset + 1], path[offset + 2]]);
        fees.push(fee);
        offset += FEE_LEN;
        tokens.push(Address::from_slice(&path[offset..offset + ADDR_LEN]));
        offset += ADDR_LEN;
    }
    Ok((tokens, fees))
}

/// Encode the route reversed, for exact-output quoting and swapping.
pub fn encode_reversed_path(tokens: &[Address], fees: &[u32]) -> Result<Bytes, ValidationError> {
    let mut rev_tokens = tokens.to_vec();
    let mut rev_fees = fees.to_vec();
    rev_tokens.reverse();
    rev_fees.reverse();
    encode_path(&rev_tokens, &rev_fees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn token(n: u8) -> Address {
        let mut buf = [0u8; 20];
        buf[19] = n;
        Address::from(buf)
    }

    #[test]
    fn test_exact_single_hop_layout() {
        let a = Address::from_str("0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").unwrap();
        let b = Address::from_str("0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB").unwrap();

        let path = encode_path(&[a, b], &[3000]).unwrap();
        assert_eq!(path.len(), 43);
        assert_eq!(&path[..20], a.as_slice());
        // 3000 decimal = 0x000bb8
        assert_eq!(&path[20..23], &[0x00, 0x0b, 0xb8]);
        assert_eq!(&path[23..], b.as_slice());
    }

    #[test]
    fn test_round_trip_multi_hop() {
        let tokens = vec![token(1), token(2), token(3), token(4)];
        let fees = vec![500, 1500, 10000];

        let encoded = encode_path(&tokens, &fees).unwrap();
        let (t, f) = decode_path(&encoded).unwrap();
        assert_eq!(t, tokens);
        assert_eq!(f, fees);
    }

    #[test]
    fn test_length_invariants() {
        assert!(matches!(
            encode_path(&[token(1)], &[]),
            Err(ValidationError::InvalidPath(_))
        ));
        assert!(matches!(
            encode_path(&[token(1), token(2)], &[3000, 500]),
            Err(ValidationError::InvalidPath(_))
        ));
        assert!(matches!(
            encode_path(&[token(1), token(2), token(3)], &[3000]),
            Err(ValidationError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_reversed_is_list_reversal_not_byte_reversal() {
        let tokens = vec![token(1), token(2), token(3)];
        let fees = vec![500, 3000];

        let reversed = encode_reversed_path(&tokens, &fees).unwrap();
        let (t, f) = decode_path(&reversed).unwrap();
        assert_eq!(t, vec![token(3), token(2), token(1)]);
        assert_eq!(f, vec![3000, 500]);
    }

    #[test]
    fn test_oversized_fee_is_rejected_not_truncated() {
        // 16_780_216 = 0x0100_0bb8; keeping only the low 3 bytes would
        // silently turn it into the 3000 tier.
        assert!(matches!(
            encode_path(&[token(1), token(2)], &[16_780_216]),
            Err(ValidationError::InvalidPath(_))
        ));

        let encoded = encode_path(&[token(1), token(2)], &[MAX_FEE]).unwrap();
        let (_, fees) = decode_path(&encoded).unwrap();
        assert_eq!(fees, vec![MAX_FEE]);
    }

    #[test]
    fn test_decode_rejects_truncated_blob() {
        let tokens = vec![token(1), token(2)];
        let encoded = encode_path(&tokens, &[3000]).unwrap();
        assert!(decode_path(&encoded[..encoded.len() - 1]).is_err());
        assert!(decode_path(&encoded[..20]).is_err());
    }
}
