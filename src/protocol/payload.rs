//! OP_RETURN payloads of deck spawns and card transfers.
//!
//! Deck spawn: `[version][decimals][issue_mode][name_len][name][asset_specific_data..]`
//! Card transfer: `[version][decimals][count][count x LEB128 amount]`

use bitcoin::blockdata::script::Instruction;
use bitcoin::opcodes;
use bitcoin::ScriptBuf;

use super::deck::{DeckSpawn, IssueMode};
use super::varint;
use crate::error::DeckError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSpawnPayload {
    pub version: u8,
    pub number_of_decimals: u8,
    pub issue_mode: IssueMode,
    pub name: String,
    pub asset_specific_data: Vec<u8>,
}

impl DeckSpawnPayload {
    pub const HEADER_LEN: usize = 4;

    pub fn encode(&self) -> Result<Vec<u8>, DeckError> {
        let name_len = u8::try_from(self.name.len())
            .map_err(|_| DeckError::InvalidPayload("deck name too long".into()))?;
        let mut out =
            Vec::with_capacity(Self::HEADER_LEN + self.name.len() + self.asset_specific_data.len());
        out.push(self.version);
        out.push(self.number_of_decimals);
        out.push(self.issue_mode as u8);
        out.push(name_len);
        out.extend_from_slice(self.name.as_bytes());
        out.extend_from_slice(&self.asset_specific_data);
        Ok(out)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DeckError> {
        if bytes.len() < Self::HEADER_LEN {
            return Err(DeckError::InvalidPayload(format!(
                "deck spawn payload too short: {} bytes",
                bytes.len()
            )));
        }
        let issue_mode = IssueMode::try_from(bytes[2])?;
        let name_end = Self::HEADER_LEN + bytes[3] as usize;
        let name = bytes
            .get(Self::HEADER_LEN..name_end)
            .ok_or_else(|| DeckError::InvalidPayload("deck name truncated".into()))?;
        let name = String::from_utf8(name.to_vec())
            .map_err(|_| DeckError::InvalidPayload("deck name is not utf-8".into()))?;
        Ok(Self {
            version: bytes[0],
            number_of_decimals: bytes[1],
            issue_mode,
            name,
            asset_specific_data: bytes[name_end..].to_vec(),
        })
    }
}

impl From<&DeckSpawn> for DeckSpawnPayload {
    fn from(spawn: &DeckSpawn) -> Self {
        Self {
            version: spawn.version,
            number_of_decimals: spawn.number_of_decimals,
            issue_mode: spawn.issue_mode,
            name: spawn.name.clone(),
            asset_specific_data: spawn.asset_specific_data.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTransferPayload {
    pub version: u8,
    pub number_of_decimals: u8,
    pub amounts: Vec<u64>,
}

impl CardTransferPayload {
    #[cfg(test)]
    pub fn encode(&self) -> Result<Vec<u8>, DeckError> {
        let count = u8::try_from(self.amounts.len())
            .map_err(|_| DeckError::InvalidPayload("too many receivers".into()))?;
        let mut out = vec![self.version, self.number_of_decimals, count];
        for amount in &self.amounts {
            varint::encode_into(*amount, &mut out);
        }
        Ok(out)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DeckError> {
        let [version, number_of_decimals, count, rest @ ..] = bytes else {
            return Err(DeckError::InvalidPayload(format!(
                "card transfer payload too short: {} bytes",
                bytes.len()
            )));
        };
        if *count == 0 {
            return Err(DeckError::InvalidPayload("card transfer without receivers".into()));
        }
        let mut amounts = Vec::with_capacity(*count as usize);
        let mut offset = 0;
        for _ in 0..*count {
            let (amount, used) = varint::decode(&rest[offset..])?;
            amounts.push(amount);
            offset += used;
        }
        if offset != rest.len() {
            return Err(DeckError::InvalidPayload(format!(
                "{} trailing bytes after amounts",
                rest.len() - offset
            )));
        }
        Ok(Self {
            version: *version,
            number_of_decimals: *number_of_decimals,
            amounts,
        })
    }
}

/// Data pushed by an `OP_RETURN <push>` script given as hex.
pub fn op_return_data(script_hex: &str) -> Option<Vec<u8>> {
    let script = ScriptBuf::from_bytes(hex::decode(script_hex).ok()?);
    let mut instructions = script.instructions();
    match instructions.next()? {
        Ok(Instruction::Op(opcodes::all::OP_RETURN)) => {}
        _ => return None,
    }
    match instructions.next()? {
        Ok(Instruction::PushBytes(bytes)) => Some(bytes.as_bytes().to_vec()),
        _ => None,
    }
}
