//! Pay-to-tag-hash keys.
//!
//! A p2th key is a private key everybody can derive. Importing it into the
//! node makes the node index every transaction paying its address, which is
//! how deck spawns and card transfers are discovered.

use bitcoin::base58;
use bitcoin::hashes::{hash160, Hash};
use bitcoin::secp256k1::{PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};

use crate::error::DeckError;
use crate::network::Network;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct P2thKey {
    secret: SecretKey,
    network: Network,
}

impl P2thKey {
    pub fn from_secret_bytes(bytes: &[u8], network: Network) -> Result<Self, DeckError> {
        let secret =
            SecretKey::from_slice(bytes).map_err(|e| DeckError::InvalidKey(e.to_string()))?;
        Ok(Self { secret, network })
    }

    /// Key tagging a deck's card transfers: the deck's asset id as secret.
    pub fn for_deck(asset_id: &str, network: Network) -> Result<Self, DeckError> {
        let bytes = hex::decode(asset_id)
            .map_err(|e| DeckError::InvalidKey(format!("asset id {asset_id}: {e}")))?;
        if bytes.len() != 32 {
            return Err(DeckError::InvalidKey(format!(
                "asset id {asset_id}: expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        Self::from_secret_bytes(&bytes, network)
    }

    /// Key tagging deck spawns of the production or test registry.
    pub fn registry(network: Network, production: bool) -> Self {
        let seed = format!("{}:{}", network.shortname(), registry_label(production));
        let digest = Sha256::digest(seed.as_bytes());
        // A sha256 digest is a valid secp256k1 scalar with overwhelming probability;
        // rehash on the off chance it is not.
        let mut bytes: [u8; 32] = digest.into();
        loop {
            if let Ok(secret) = SecretKey::from_slice(&bytes) {
                return Self { secret, network };
            }
            bytes = Sha256::digest(bytes).into();
        }
    }

    pub fn wif(&self) -> String {
        let mut data = Vec::with_capacity(34);
        data.push(self.network.wif_prefix());
        data.extend_from_slice(&self.secret.secret_bytes());
        data.push(0x01);
        base58::encode_check(&data)
    }

    pub fn address(&self) -> String {
        let secp = Secp256k1::signing_only();
        let public = PublicKey::from_secret_key(&secp, &self.secret);
        let hash = hash160::Hash::hash(&public.serialize());
        let mut data = Vec::with_capacity(21);
        data.push(self.network.p2pkh_prefix());
        data.extend_from_slice(hash.as_byte_array());
        base58::encode_check(&data)
    }
}

/// Node account label the deck-spawn registry is imported under.
pub fn registry_label(production: bool) -> &'static str {
    if production {
        "PAPROD"
    } else {
        "PATEST"
    }
}
