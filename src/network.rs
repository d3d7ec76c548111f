use std::fmt;

/// Peercoin-family chains the deck protocol runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Peercoin,
    PeercoinTestnet,
}

impl Network {
    /// Base units per coin.
    pub const COIN: u64 = 1_000_000;

    pub fn shortname(&self) -> &'static str {
        match self {
            Network::Peercoin => "ppc",
            Network::PeercoinTestnet => "tppc",
        }
    }

    pub fn p2pkh_prefix(&self) -> u8 {
        match self {
            Network::Peercoin => 0x37,
            Network::PeercoinTestnet => 0x6f,
        }
    }

    pub fn wif_prefix(&self) -> u8 {
        match self {
            Network::Peercoin => 0xb7,
            Network::PeercoinTestnet => 0xef,
        }
    }

    /// Amount paid to a p2th address to tag a protocol transaction.
    pub fn p2th_fee(&self) -> u64 {
        Self::COIN / 100
    }

    pub fn min_tx_fee(&self) -> u64 {
        Self::COIN / 100
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shortname())
    }
}

/// Parse a network name. Unknown names are rejected so a typo never selects
/// the wrong key prefixes.
pub fn parse_network(s: &str) -> Result<Network, String> {
    match s.to_lowercase().as_str() {
        "ppc" | "peercoin" | "mainnet" => Ok(Network::Peercoin),
        "tppc" | "testnet" => Ok(Network::PeercoinTestnet),
        other => Err(format!("unknown network '{other}', expected ppc or tppc")),
    }
}

/// Convert an RPC coin amount to base units, rounding to the nearest unit.
pub fn to_units(coins: f64) -> u64 {
    if coins <= 0.0 {
        return 0;
    }
    (coins * Network::COIN as f64).round() as u64
}

pub fn to_coins(units: u64) -> f64 {
    units as f64 / Network::COIN as f64
}
