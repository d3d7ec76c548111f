mod card;
mod deck;
mod p2th;
mod payload;
mod peerassets;
mod state;
mod varint;

pub use card::CardTransfer;
pub use deck::{Deck, DeckSpawn, DeckSpawnRequest};
pub use p2th::registry_label;
pub use peerassets::PeerAssets;
pub use state::DeckState;

#[cfg(test)]
pub(crate) use card::fixtures;
#[cfg(test)]
pub(crate) use deck::{sample_deck, IssueMode};
#[cfg(test)]
pub(crate) use p2th::P2thKey;

use crate::error::DeckError;
use crate::provider::SelectedInputs;

/// Deck discovery, card lookup and spawn construction.
pub trait TokenProtocol {
    /// Decks of the given version in the production or test registry, in chain order.
    fn find_all_valid_decks(
        &self,
        deck_version: u8,
        production: bool,
    ) -> Result<Vec<Deck>, DeckError>;

    /// Card transfers of `deck` known to the node, in chain order.
    fn find_card_transfers(&self, deck: &Deck) -> Result<Vec<CardTransfer>, DeckError>;

    /// Make the node track the deck's p2th address. Safe to repeat.
    fn load_deck_p2th_into_local_node(&self, deck: &Deck) -> Result<(), DeckError>;

    /// Make the node track the deck-spawn registry p2th. Safe to repeat.
    fn load_registry_into_local_node(&self, production: bool) -> Result<(), DeckError>;

    /// Unsigned deck-spawn transaction as hex.
    fn deck_spawn(
        &self,
        deck: &DeckSpawn,
        inputs: &SelectedInputs,
        change_address: &str,
    ) -> Result<String, DeckError>;
}
