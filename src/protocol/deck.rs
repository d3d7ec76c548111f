use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::p2th::P2thKey;
use crate::context::Context;
use crate::error::DeckError;
use crate::network::Network;

/// Policy for how a deck's issuer may create cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum IssueMode {
    None = 0x00,
    Custom = 0x01,
    Once = 0x02,
    Multi = 0x04,
    Mono = 0x08,
    Singlet = 0x0a,
    Unflushable = 0x10,
    Subscription = 0x34,
}

impl IssueMode {
    pub fn name(&self) -> &'static str {
        match self {
            IssueMode::None => "NONE",
            IssueMode::Custom => "CUSTOM",
            IssueMode::Once => "ONCE",
            IssueMode::Multi => "MULTI",
            IssueMode::Mono => "MONO",
            IssueMode::Singlet => "SINGLET",
            IssueMode::Unflushable => "UNFLUSHABLE",
            IssueMode::Subscription => "SUBSCRIPTION",
        }
    }
}

impl TryFrom<u8> for IssueMode {
    type Error = DeckError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(IssueMode::None),
            0x01 => Ok(IssueMode::Custom),
            0x02 => Ok(IssueMode::Once),
            0x04 => Ok(IssueMode::Multi),
            0x08 => Ok(IssueMode::Mono),
            0x0a => Ok(IssueMode::Singlet),
            0x10 => Ok(IssueMode::Unflushable),
            0x34 => Ok(IssueMode::Subscription),
            other => Err(DeckError::InvalidPayload(format!(
                "unknown issue mode {other:#04x}"
            ))),
        }
    }
}

impl FromStr for IssueMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_uppercase()))
            .map_err(|_| format!("unknown issue mode: {s}"))
    }
}

impl fmt::Display for IssueMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token definition spawned on chain. Read-only once decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub asset_id: String,
    pub name: String,
    pub issuer: String,
    pub issue_mode: IssueMode,
    pub number_of_decimals: u8,
    pub issue_time: Option<i64>,
    pub network: Network,
    pub production: bool,
    pub version: u8,
    pub asset_specific_data: Vec<u8>,
}

impl Deck {
    pub const SHORT_ID_LEN: usize = 20;

    /// Display-only prefix of the asset id.
    pub fn short_id(&self) -> &str {
        self.asset_id
            .get(..Self::SHORT_ID_LEN)
            .unwrap_or(&self.asset_id)
    }

    /// String-valued fields a search key may equal exactly.
    pub fn field_values(&self) -> [&str; 6] {
        [
            self.asset_id.as_str(),
            self.short_id(),
            self.name.as_str(),
            self.issuer.as_str(),
            self.issue_mode.name(),
            self.network.shortname(),
        ]
    }

    pub fn p2th(&self) -> Result<P2thKey, DeckError> {
        P2thKey::for_deck(&self.asset_id, self.network)
    }
}

/// User-supplied description of a deck to spawn.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeckSpawnRequest {
    pub name: String,
    pub number_of_decimals: u8,
    pub issue_mode: IssueMode,
    #[serde(default)]
    pub asset_specific_data: Option<String>,
}

impl DeckSpawnRequest {
    pub const MAX_DECIMALS: u8 = 18;
    pub const MAX_NAME_LEN: usize = u8::MAX as usize;

    pub fn from_json(input: &str) -> Result<Self, DeckError> {
        use serde::de::Error as _;

        let request: Self = serde_json::from_str(input)?;
        if request.number_of_decimals > Self::MAX_DECIMALS {
            return Err(serde_json::Error::custom(format!(
                "number_of_decimals must be at most {}",
                Self::MAX_DECIMALS
            ))
            .into());
        }
        if request.name.len() > Self::MAX_NAME_LEN {
            return Err(serde_json::Error::custom(format!(
                "name must be at most {} bytes",
                Self::MAX_NAME_LEN
            ))
            .into());
        }
        Ok(request)
    }

    /// Attach the network, registry and version this process runs with.
    pub fn with_context(self, ctx: &Context) -> DeckSpawn {
        DeckSpawn {
            name: self.name,
            number_of_decimals: self.number_of_decimals,
            issue_mode: self.issue_mode,
            asset_specific_data: self
                .asset_specific_data
                .map(String::into_bytes)
                .unwrap_or_default(),
            network: ctx.network,
            production: ctx.production,
            version: ctx.deck_version,
        }
    }
}

/// A deck ready to be encoded into a spawn transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSpawn {
    pub name: String,
    pub number_of_decimals: u8,
    pub issue_mode: IssueMode,
    pub asset_specific_data: Vec<u8>,
    pub network: Network,
    pub production: bool,
    pub version: u8,
}

impl DeckSpawn {
    /// The deck this spawn becomes once mined as `asset_id`.
    pub fn into_deck(self, asset_id: String, issuer: String) -> Deck {
        Deck {
            asset_id,
            name: self.name,
            issuer,
            issue_mode: self.issue_mode,
            number_of_decimals: self.number_of_decimals,
            issue_time: None,
            network: self.network,
            production: self.production,
            version: self.version,
            asset_specific_data: self.asset_specific_data,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_deck(asset_id: &str, name: &str) -> Deck {
    Deck {
        asset_id: asset_id.to_string(),
        name: name.to_string(),
        issuer: "mIssuerAddress".to_string(),
        issue_mode: IssueMode::Once,
        number_of_decimals: 2,
        issue_time: Some(1_500_000_000),
        network: Network::PeercoinTestnet,
        production: true,
        version: 1,
        asset_specific_data: Vec::new(),
    }
}
