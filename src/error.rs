use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("Deck not found: {0}")]
    DeckNotFound(String),
    #[error("No cards on this deck.")]
    NoCards,
    #[error("invalid deck json: {0}")]
    InvalidDeckJson(#[from] serde_json::Error),
    #[error("RPC error: {0}")]
    Rpc(#[from] bitcoincore_rpc::Error),
    #[error("insufficient funds at {address}: need {needed} units, have {available}")]
    InsufficientFunds {
        address: String,
        needed: u64,
        available: u64,
    },
    #[error("node could not fully sign the transaction")]
    IncompleteSignature,
    #[error("unexpected RPC response: {0}")]
    UnexpectedResponse(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("invalid key material: {0}")]
    InvalidKey(String),
    #[error("deck registry {label} is not loaded in the node; run `pacli deck list --load-registry` once")]
    RegistryNotLoaded { label: String },
}
