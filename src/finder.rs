use crate::context::Context;
use crate::error::DeckError;
use crate::protocol::{Deck, TokenProtocol};

/// True when `key` is part of the asset id or equals one of the deck's fields.
pub fn matches(deck: &Deck, key: &str) -> bool {
    deck.asset_id.contains(key) || deck.field_values().contains(&key)
}

/// Every deck matching `key`, in the order the protocol enumerates them.
pub fn search_decks<P: TokenProtocol + ?Sized>(
    protocol: &P,
    ctx: &Context,
    key: &str,
) -> Result<Vec<Deck>, DeckError> {
    let decks = protocol.find_all_valid_decks(ctx.deck_version, ctx.production)?;
    Ok(decks.into_iter().filter(|d| matches(d, key)).collect())
}

/// First deck matching `key`.
pub fn find_deck<P: TokenProtocol + ?Sized>(
    protocol: &P,
    ctx: &Context,
    key: &str,
) -> Result<Deck, DeckError> {
    search_decks(protocol, ctx, key)?
        .into_iter()
        .next()
        .ok_or_else(|| DeckError::DeckNotFound(key.to_string()))
}
