use std::collections::HashSet;

use super::card::CardTransfer;
use super::deck::{Deck, DeckSpawn};
use super::p2th::{registry_label, P2thKey};
use super::payload::{op_return_data, DeckSpawnPayload};
use super::TokenProtocol;
use crate::error::DeckError;
use crate::network::Network;
use crate::provider::{ChainProvider, RawTransaction, SelectedInputs, TxOutput};

/// PeerAssets decks read and written through a node that tracks p2th keys.
pub struct PeerAssets<'a, C: ChainProvider> {
    provider: &'a C,
    network: Network,
}

impl<'a, C: ChainProvider> PeerAssets<'a, C> {
    pub fn new(provider: &'a C, network: Network) -> Self {
        Self { provider, network }
    }

    /// Confirmed txids under `account`, oldest first, each once.
    fn ordered_txids(&self, account: &str) -> Result<Vec<String>, DeckError> {
        let mut txs: Vec<_> = self
            .provider
            .list_transactions(account)?
            .into_iter()
            .filter(|tx| tx.confirmations > 0)
            .collect();
        txs.sort_by(|a, b| {
            b.confirmations
                .cmp(&a.confirmations)
                .then(a.blockindex.cmp(&b.blockindex))
                .then_with(|| a.txid.cmp(&b.txid))
        });
        let mut seen = HashSet::new();
        Ok(txs
            .into_iter()
            .filter(|tx| seen.insert(tx.txid.clone()))
            .map(|tx| tx.txid)
            .collect())
    }

    /// Address that funded the first input of `tx`.
    fn sender_of(&self, tx: &RawTransaction) -> Result<String, DeckError> {
        let input = tx
            .vin
            .first()
            .ok_or_else(|| DeckError::InvalidPayload(format!("{} has no inputs", tx.txid)))?;
        let (Some(prev_txid), Some(prev_vout)) = (&input.txid, input.vout) else {
            return Err(DeckError::InvalidPayload(format!("{} is a coinbase", tx.txid)));
        };
        let prev = self.provider.get_raw_transaction(prev_txid)?;
        prev.vout
            .iter()
            .find(|o| o.n == prev_vout)
            .and_then(|o| o.script_pub_key.address())
            .map(str::to_string)
            .ok_or_else(|| {
                DeckError::InvalidPayload(format!("{prev_txid}:{prev_vout} has no address"))
            })
    }

    fn decode_deck(
        &self,
        tx: &RawTransaction,
        registry: &P2thKey,
        production: bool,
    ) -> Result<Deck, DeckError> {
        let registry_address = registry.address();
        let tag = tx.vout.first().and_then(|o| o.script_pub_key.address());
        if tag != Some(registry_address.as_str()) {
            return Err(DeckError::InvalidPayload(format!(
                "{} does not pay the registry p2th in vout 0",
                tx.txid
            )));
        }
        let data = tx
            .vout
            .get(1)
            .and_then(|o| op_return_data(&o.script_pub_key.hex))
            .ok_or_else(|| DeckError::InvalidPayload(format!("{} has no deck payload", tx.txid)))?;
        let payload = DeckSpawnPayload::decode(&data)?;
        let issuer = self.sender_of(tx)?;

        Ok(Deck {
            asset_id: tx.txid.clone(),
            name: payload.name,
            issuer,
            issue_mode: payload.issue_mode,
            number_of_decimals: payload.number_of_decimals,
            issue_time: tx.blocktime,
            network: self.network,
            production,
            version: payload.version,
            asset_specific_data: payload.asset_specific_data,
        })
    }

    fn is_tracked(&self, key: &P2thKey, label: &str) -> Result<bool, DeckError> {
        let address = key.address();
        Ok(self
            .provider
            .addresses_by_account(label)?
            .iter()
            .any(|a| *a == address))
    }

    /// Import `key` under `label` unless the node already tracks its address.
    fn import_p2th(&self, key: &P2thKey, label: &str) -> Result<bool, DeckError> {
        if self.is_tracked(key, label)? {
            log::debug!("p2th {} already loaded as {}", key.address(), label);
            return Ok(false);
        }
        log::info!("loading p2th {} into node as {}", key.address(), label);
        self.provider.import_private_key(&key.wif(), label, true)?;
        Ok(true)
    }
}

impl<C: ChainProvider> TokenProtocol for PeerAssets<'_, C> {
    fn find_all_valid_decks(
        &self,
        deck_version: u8,
        production: bool,
    ) -> Result<Vec<Deck>, DeckError> {
        let registry = P2thKey::registry(self.network, production);
        let label = registry_label(production);
        if !self.is_tracked(&registry, label)? {
            return Err(DeckError::RegistryNotLoaded {
                label: label.to_string(),
            });
        }

        let mut decks = Vec::new();
        for txid in self.ordered_txids(label)? {
            let tx = self.provider.get_raw_transaction(&txid)?;
            match self.decode_deck(&tx, &registry, production) {
                Ok(deck) if deck.version == deck_version => decks.push(deck),
                Ok(deck) => log::debug!("skipping deck {} of version {}", txid, deck.version),
                Err(DeckError::InvalidPayload(reason)) => {
                    log::debug!("skipping spawn {}: {}", txid, reason)
                }
                Err(e) => return Err(e),
            }
        }
        log::debug!("found {} decks", decks.len());
        Ok(decks)
    }

    fn find_card_transfers(&self, deck: &Deck) -> Result<Vec<CardTransfer>, DeckError> {
        let p2th_address = deck.p2th()?.address();
        let mut cards = Vec::new();
        for txid in self.ordered_txids(&deck.asset_id)? {
            let tx = self.provider.get_raw_transaction(&txid)?;
            let decoded = self
                .sender_of(&tx)
                .and_then(|sender| CardTransfer::from_transaction(&tx, &p2th_address, sender));
            match decoded {
                Ok(card) => cards.push(card),
                Err(DeckError::InvalidPayload(reason)) => {
                    log::debug!("skipping card {}: {}", txid, reason)
                }
                Err(e) => return Err(e),
            }
        }
        Ok(cards)
    }

    fn load_deck_p2th_into_local_node(&self, deck: &Deck) -> Result<(), DeckError> {
        self.import_p2th(&deck.p2th()?, &deck.asset_id)?;
        Ok(())
    }

    fn load_registry_into_local_node(&self, production: bool) -> Result<(), DeckError> {
        let registry = P2thKey::registry(self.network, production);
        self.import_p2th(&registry, registry_label(production))?;
        Ok(())
    }

    fn deck_spawn(
        &self,
        deck: &DeckSpawn,
        inputs: &SelectedInputs,
        change_address: &str,
    ) -> Result<String, DeckError> {
        let p2th_fee = self.network.p2th_fee();
        let spend = p2th_fee + self.network.min_tx_fee();
        let change = inputs
            .total
            .checked_sub(spend)
            .ok_or_else(|| DeckError::InsufficientFunds {
                address: change_address.to_string(),
                needed: spend,
                available: inputs.total,
            })?;

        let registry = P2thKey::registry(deck.network, deck.production);
        let mut outputs = vec![
            TxOutput::Address {
                address: registry.address(),
                amount: p2th_fee,
            },
            TxOutput::Data(DeckSpawnPayload::from(deck).encode()?),
        ];
        if change > 0 {
            outputs.push(TxOutput::Address {
                address: change_address.to_string(),
                amount: change,
            });
        }
        self.provider.create_raw_transaction(&inputs.utxos, &outputs)
    }
}
