mod rpc;
mod types;

pub use types::{RawTransaction, SelectedInputs, SignedTransaction, TxOutput, Utxo, WalletTx};

#[cfg(test)]
pub(crate) use types::{RawInput, RawOutput, ScriptPubKey};

use crate::error::DeckError;

/// Node operations the CLI relies on. Amounts are base units.
pub trait ChainProvider {
    fn list_accounts(&self) -> Result<Vec<String>, DeckError>;
    fn addresses_by_account(&self, account: &str) -> Result<Vec<String>, DeckError>;
    fn list_unspent(&self, address: &str) -> Result<Vec<Utxo>, DeckError>;
    fn create_raw_transaction(
        &self,
        inputs: &[Utxo],
        outputs: &[TxOutput],
    ) -> Result<String, DeckError>;
    fn sign_raw_transaction(&self, hex: &str) -> Result<SignedTransaction, DeckError>;
    fn send_raw_transaction(&self, hex: &str) -> Result<String, DeckError>;
    fn import_private_key(&self, wif: &str, label: &str, rescan: bool) -> Result<(), DeckError>;
    fn list_transactions(&self, account: &str) -> Result<Vec<WalletTx>, DeckError>;
    fn get_raw_transaction(&self, txid: &str) -> Result<RawTransaction, DeckError>;

    /// Pick unspent outputs of `address`, in node order, until `amount` is covered.
    fn select_inputs(&self, amount: u64, address: &str) -> Result<SelectedInputs, DeckError> {
        let mut utxos = Vec::new();
        let mut total = 0u64;
        for utxo in self.list_unspent(address)? {
            if total >= amount {
                break;
            }
            total = total.saturating_add(utxo.amount);
            utxos.push(utxo);
        }
        if total < amount || utxos.is_empty() {
            return Err(DeckError::InsufficientFunds {
                address: address.to_string(),
                needed: amount,
                available: total,
            });
        }
        Ok(SelectedInputs { utxos, total })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory node. Every call is appended to `calls` by method name.
    #[derive(Default)]
    pub struct DummyProvider {
        pub accounts: HashMap<String, Vec<String>>,
        pub unspent: HashMap<String, Vec<Utxo>>,
        pub wallet_txs: HashMap<String, Vec<WalletTx>>,
        pub raw_txs: HashMap<String, RawTransaction>,
        pub sign_complete: bool,
        pub send_result: Option<String>,
        pub calls: RefCell<Vec<String>>,
        pub created_outputs: RefCell<Vec<Vec<TxOutput>>>,
        pub imported: RefCell<Vec<(String, String)>>,
    }

    impl DummyProvider {
        pub fn new() -> Self {
            Self {
                sign_complete: true,
                send_result: Some("f".repeat(64)),
                ..Default::default()
            }
        }

        pub fn with_account(mut self, account: &str, addresses: &[&str]) -> Self {
            self.accounts.insert(
                account.to_string(),
                addresses.iter().map(|a| a.to_string()).collect(),
            );
            self
        }

        pub fn with_unspent(mut self, address: &str, amounts: &[u64]) -> Self {
            let utxos = amounts
                .iter()
                .enumerate()
                .map(|(i, amount)| Utxo {
                    txid: format!("{:064x}", i + 1),
                    vout: i as u32,
                    address: address.to_string(),
                    amount: *amount,
                })
                .collect();
            self.unspent.insert(address.to_string(), utxos);
            self
        }

        pub fn with_wallet_txs(mut self, account: &str, txs: Vec<WalletTx>) -> Self {
            self.wallet_txs.insert(account.to_string(), txs);
            self
        }

        pub fn with_raw_tx(mut self, tx: RawTransaction) -> Self {
            self.raw_txs.insert(tx.txid.clone(), tx);
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        pub fn count(&self, name: &str) -> usize {
            self.calls.borrow().iter().filter(|c| *c == name).count()
        }

        fn record(&self, name: &str) {
            self.calls.borrow_mut().push(name.to_string());
        }
    }

    impl ChainProvider for DummyProvider {
        fn list_accounts(&self) -> Result<Vec<String>, DeckError> {
            self.record("listaccounts");
            let mut names: Vec<String> = self.accounts.keys().cloned().collect();
            names.sort();
            Ok(names)
        }

        fn addresses_by_account(&self, account: &str) -> Result<Vec<String>, DeckError> {
            self.record("getaddressesbyaccount");
            Ok(self.accounts.get(account).cloned().unwrap_or_default())
        }

        fn list_unspent(&self, address: &str) -> Result<Vec<Utxo>, DeckError> {
            self.record("listunspent");
            Ok(self.unspent.get(address).cloned().unwrap_or_default())
        }

        fn create_raw_transaction(
            &self,
            _inputs: &[Utxo],
            outputs: &[TxOutput],
        ) -> Result<String, DeckError> {
            self.record("createrawtransaction");
            self.created_outputs.borrow_mut().push(outputs.to_vec());
            Ok("0100raw".to_string())
        }

        fn sign_raw_transaction(&self, hex: &str) -> Result<SignedTransaction, DeckError> {
            self.record("signrawtransaction");
            Ok(SignedTransaction {
                hex: format!("{hex}signed"),
                complete: self.sign_complete,
            })
        }

        fn send_raw_transaction(&self, _hex: &str) -> Result<String, DeckError> {
            self.record("sendrawtransaction");
            self.send_result
                .clone()
                .ok_or_else(|| DeckError::UnexpectedResponse("rejected".into()))
        }

        fn import_private_key(
            &self,
            wif: &str,
            label: &str,
            _rescan: bool,
        ) -> Result<(), DeckError> {
            self.record("importprivkey");
            self.imported
                .borrow_mut()
                .push((wif.to_string(), label.to_string()));
            Ok(())
        }

        fn list_transactions(&self, account: &str) -> Result<Vec<WalletTx>, DeckError> {
            self.record("listtransactions");
            Ok(self.wallet_txs.get(account).cloned().unwrap_or_default())
        }

        fn get_raw_transaction(&self, txid: &str) -> Result<RawTransaction, DeckError> {
            self.record("getrawtransaction");
            self.raw_txs
                .get(txid)
                .cloned()
                .ok_or_else(|| DeckError::UnexpectedResponse(format!("unknown tx {txid}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::DummyProvider;
    use super::*;

    #[test]
    fn select_inputs_accumulates_until_covered() {
        let provider = DummyProvider::new().with_unspent("addr", &[5_000, 10_000, 20_000, 1]);
        let selected = provider.select_inputs(12_000, "addr").unwrap();
        assert_eq!(selected.utxos.len(), 2);
        assert_eq!(selected.total, 15_000);
    }

    #[test]
    fn select_inputs_reports_shortfall() {
        let provider = DummyProvider::new().with_unspent("addr", &[5_000]);
        match provider.select_inputs(20_000, "addr") {
            Err(DeckError::InsufficientFunds {
                needed, available, ..
            }) => {
                assert_eq!(needed, 20_000);
                assert_eq!(available, 5_000);
            }
            other => panic!("expected InsufficientFunds, got {:?}", other),
        }
    }

    #[test]
    fn select_inputs_on_empty_address_fails() {
        let provider = DummyProvider::new();
        assert!(matches!(
            provider.select_inputs(0, "addr"),
            Err(DeckError::InsufficientFunds { .. })
        ));
    }
}
