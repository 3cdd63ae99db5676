//! Well-known Hedera token definitions
//!
//! Static symbol/decimals table for the tokens the adapters touch most,
//! used for CLI display. Anything not listed here is shown by address.

use crate::codec::AccountId;
use crate::registry::Network;
use alloy_primitives::Address;

#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub symbol: &'static str,
    pub id: AccountId,
    pub decimals: u8,
}

const fn token(symbol: &'static str, num: u64, decimals: u8) -> Token {
    Token {
        symbol,
        id: AccountId::new(0, 0, num),
        decimals,
    }
}

const MAINNET_TOKENS: &[Token] = &[
    token("WHBAR", 1456986, 8),
    token("SAUCE", 731861, 6),
    token("xSAUCE", 1460200, 6),
    token("HBARX", 834116, 8),
    token("USDC", 456858, 6),
    token("USDT", 749738, 6),
    token("DAI", 1055472, 8),
    token("WBTC", 1055477, 8),
    token("WETH", 541564, 8),
    token("DOVU", 3716059, 8),
    token("GRELF", 1159074, 8),
];

const TESTNET_TOKENS: &[Token] = &[
    token("WHBAR", 15058, 8),
    token("SAUCE", 1183558, 6),
    token("xSAUCE", 1418651, 6),
    token("USDC", 429274, 6),
];

pub fn known_tokens(network: Network) -> &'static [Token] {
    match network {
        Network::Mainnet => MAINNET_TOKENS,
        Network::Testnet => TESTNET_TOKENS,
    }
}

/// Symbol for a long-zero token address, if we know it.
pub fn lookup_symbol(network: Network, address: &Address) -> Option<&'static str> {
    known_tokens(network)
        .iter()
        .find(|t| t.id.to_evm_address() == *address)
        .map(|t| t.symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_address() {
        let sauce = AccountId::new(0, 0, 731861).to_evm_address();
        assert_eq!(lookup_symbol(Network::Mainnet, &sauce), Some("SAUCE"));
        // SAUCE has a different id on testnet
        assert_eq!(lookup_symbol(Network::Testnet, &sauce), None);
    }

    #[test]
    fn test_no_duplicate_ids() {
        let mut seen = std::collections::HashSet::new();
        for t in known_tokens(Network::Mainnet) {
            assert!(seen.insert(t.id), "duplicate token id {}", t.id);
        }
    }
}
