use bitcoincore_rpc::{Client, RpcApi};
use serde_json::{json, Map, Value};

use super::types::UnspentEntry;
use super::{ChainProvider, RawTransaction, SignedTransaction, TxOutput, Utxo, WalletTx};
use crate::error::DeckError;
use crate::network::{to_coins, to_units};

// Raw `call`s keep legacy account RPCs and Peercoin address formats opaque
// to the Bitcoin-typed helpers of `RpcApi`.
impl ChainProvider for Client {
    fn list_accounts(&self) -> Result<Vec<String>, DeckError> {
        let accounts: Map<String, Value> = self.call("listaccounts", &[])?;
        Ok(accounts.into_iter().map(|(name, _)| name).collect())
    }

    fn addresses_by_account(&self, account: &str) -> Result<Vec<String>, DeckError> {
        Ok(self.call("getaddressesbyaccount", &[json!(account)])?)
    }

    fn list_unspent(&self, address: &str) -> Result<Vec<Utxo>, DeckError> {
        let entries: Vec<UnspentEntry> =
            self.call("listunspent", &[json!(1), json!(9_999_999), json!([address])])?;
        Ok(entries
            .into_iter()
            .map(|e| Utxo {
                txid: e.txid,
                vout: e.vout,
                address: e.address.unwrap_or_else(|| address.to_string()),
                amount: to_units(e.amount),
            })
            .collect())
    }

    fn create_raw_transaction(
        &self,
        inputs: &[Utxo],
        outputs: &[TxOutput],
    ) -> Result<String, DeckError> {
        let ins: Vec<Value> = inputs
            .iter()
            .map(|u| json!({ "txid": u.txid, "vout": u.vout }))
            .collect();
        // Array form keeps output order, which fixes the vout positions.
        let outs: Vec<Value> = outputs
            .iter()
            .map(|o| match o {
                TxOutput::Address { address, amount } => {
                    json!({ address.as_str(): to_coins(*amount) })
                }
                TxOutput::Data(bytes) => json!({ "data": hex::encode(bytes) }),
            })
            .collect();
        Ok(self.call("createrawtransaction", &[json!(ins), json!(outs)])?)
    }

    fn sign_raw_transaction(&self, hex: &str) -> Result<SignedTransaction, DeckError> {
        Ok(self.call("signrawtransaction", &[json!(hex)])?)
    }

    fn send_raw_transaction(&self, hex: &str) -> Result<String, DeckError> {
        Ok(self.call("sendrawtransaction", &[json!(hex)])?)
    }

    fn import_private_key(&self, wif: &str, label: &str, rescan: bool) -> Result<(), DeckError> {
        let _: Value = self.call("importprivkey", &[json!(wif), json!(label), json!(rescan)])?;
        Ok(())
    }

    fn list_transactions(&self, account: &str) -> Result<Vec<WalletTx>, DeckError> {
        Ok(self.call(
            "listtransactions",
            &[json!(account), json!(999_999), json!(0), json!(true)],
        )?)
    }

    fn get_raw_transaction(&self, txid: &str) -> Result<RawTransaction, DeckError> {
        Ok(self.call("getrawtransaction", &[json!(txid), json!(1)])?)
    }
}
