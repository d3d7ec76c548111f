use serde::Deserialize;

/// Spendable output at a single address, amount in base units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    pub txid: String,
    pub vout: u32,
    pub address: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedInputs {
    pub utxos: Vec<Utxo>,
    pub total: u64,
}

impl SelectedInputs {
    /// Change goes back to the address that funded the first input.
    pub fn change_address(&self) -> Option<&str> {
        self.utxos.first().map(|u| u.address.as_str())
    }
}

/// One output of a transaction handed to `createrawtransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxOutput {
    Address { address: String, amount: u64 },
    Data(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignedTransaction {
    pub hex: String,
    pub complete: bool,
}

/// Entry of `listtransactions`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WalletTx {
    pub txid: String,
    #[serde(default)]
    pub confirmations: i64,
    #[serde(default)]
    pub blockindex: Option<u32>,
}

/// Verbose `getrawtransaction` result, reduced to what deck decoding reads.
/// Coinbase inputs carry neither `txid` nor `vout`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawTransaction {
    pub txid: String,
    pub vin: Vec<RawInput>,
    pub vout: Vec<RawOutput>,
    #[serde(default)]
    pub blocktime: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawInput {
    #[serde(default)]
    pub txid: Option<String>,
    #[serde(default)]
    pub vout: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawOutput {
    pub n: u32,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKey,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptPubKey {
    pub hex: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub addresses: Option<Vec<String>>,
}

impl ScriptPubKey {
    /// Nodes report either `address` or the older `addresses` list.
    pub fn address(&self) -> Option<&str> {
        self.address
            .as_deref()
            .or_else(|| self.addresses.as_ref()?.first().map(String::as_str))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UnspentEntry {
    pub txid: String,
    pub vout: u32,
    #[serde(default)]
    pub address: Option<String>,
    pub amount: f64,
}
