use super::payload::{op_return_data, CardTransferPayload};
use crate::error::DeckError;
use crate::provider::RawTransaction;

/// A movement of deck units from one sender to one or more receivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTransfer {
    pub txid: String,
    pub sender: String,
    pub receivers: Vec<(String, u64)>,
    pub number_of_decimals: u8,
}

impl CardTransfer {
    /// Decode `tx` as a card transfer tagged with `p2th_address`.
    ///
    /// Layout: vout0 pays the p2th, vout1 carries the payload, receivers follow.
    pub fn from_transaction(
        tx: &RawTransaction,
        p2th_address: &str,
        sender: String,
    ) -> Result<Self, DeckError> {
        let tag = tx.vout.first().and_then(|o| o.script_pub_key.address());
        if tag != Some(p2th_address) {
            return Err(DeckError::InvalidPayload(format!(
                "{} does not pay the deck p2th in vout 0",
                tx.txid
            )));
        }
        let data = tx
            .vout
            .get(1)
            .and_then(|o| op_return_data(&o.script_pub_key.hex))
            .ok_or_else(|| DeckError::InvalidPayload(format!("{} has no card payload", tx.txid)))?;
        let payload = CardTransferPayload::decode(&data)?;

        let outputs = tx.vout.get(2..).unwrap_or_default();
        if outputs.len() < payload.amounts.len() {
            return Err(DeckError::InvalidPayload(format!(
                "{} lists {} amounts for {} outputs",
                tx.txid,
                payload.amounts.len(),
                outputs.len()
            )));
        }
        let receivers = outputs
            .iter()
            .zip(&payload.amounts)
            .map(|(out, amount)| {
                out.script_pub_key
                    .address()
                    .map(|a| (a.to_string(), *amount))
                    .ok_or_else(|| {
                        DeckError::InvalidPayload(format!(
                            "{} vout {} has no address",
                            tx.txid, out.n
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            txid: tx.txid.clone(),
            sender,
            receivers,
            number_of_decimals: payload.number_of_decimals,
        })
    }

    pub fn total(&self) -> Option<u64> {
        self.receivers
            .iter()
            .try_fold(0u64, |acc, (_, amount)| acc.checked_add(*amount))
    }
}
