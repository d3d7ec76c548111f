use std::fmt;

use crate::context::Context;
use crate::error::DeckError;
use crate::network::Network;
use crate::protocol::{DeckSpawnRequest, TokenProtocol};
use crate::provider::{ChainProvider, SelectedInputs};

/// Funds a deck spawn needs: the p2th tag plus the transaction fee.
pub const DECK_SPAWN_FUNDING: u64 = Network::COIN / 50;

/// What the user has to do before a deck can be spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundingInstruction {
    CreateAccount { account: String },
    FundAddresses { addresses: Vec<String> },
}

impl fmt::Display for FundingInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FundingInstruction::CreateAccount { account } => write!(
                f,
                "No '{account}' account in the node. Create an address with `getnewaddress {account}` and fund it."
            ),
            FundingInstruction::FundAddresses { addresses } if addresses.len() == 1 => {
                write!(f, "Please fund this address: {}", addresses[0])
            }
            FundingInstruction::FundAddresses { addresses } => write!(
                f,
                "Please fund one of the following addresses: {}",
                addresses.join(", ")
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnOutcome {
    FundingRequired(FundingInstruction),
    Signed {
        hex: String,
    },
    /// The transaction is on the network. `subscribe_error` is set when the
    /// node could not be told to track the new deck afterwards.
    Broadcast {
        txid: String,
        subscribe_error: Option<String>,
    },
}

pub enum Funding {
    Selected(SelectedInputs),
    Required(FundingInstruction),
}

/// Find an address of the funding account holding at least `amount`.
pub fn default_account_inputs<C: ChainProvider + ?Sized>(
    provider: &C,
    account: &str,
    amount: u64,
) -> Result<Funding, DeckError> {
    if !provider.list_accounts()?.iter().any(|a| a == account) {
        return Ok(Funding::Required(FundingInstruction::CreateAccount {
            account: account.to_string(),
        }));
    }

    let addresses = provider.addresses_by_account(account)?;
    for address in &addresses {
        match provider.select_inputs(amount, address) {
            Ok(inputs) => return Ok(Funding::Selected(inputs)),
            Err(DeckError::InsufficientFunds { available, .. }) => {
                log::debug!("{} holds {} units, skipping", address, available)
            }
            Err(e) => return Err(e),
        }
    }

    if addresses.is_empty() {
        return Ok(Funding::Required(FundingInstruction::CreateAccount {
            account: account.to_string(),
        }));
    }
    Ok(Funding::Required(FundingInstruction::FundAddresses { addresses }))
}

/// Build, sign and optionally broadcast a deck spawn described by `deck_json`.
pub fn spawn_deck<C, P>(
    provider: &C,
    protocol: &P,
    ctx: &Context,
    deck_json: &str,
    broadcast: bool,
) -> Result<SpawnOutcome, DeckError>
where
    C: ChainProvider + ?Sized,
    P: TokenProtocol + ?Sized,
{
    let spawn = DeckSpawnRequest::from_json(deck_json)?.with_context(ctx);

    let inputs = match default_account_inputs(provider, &ctx.funding_account, DECK_SPAWN_FUNDING)? {
        Funding::Selected(inputs) => inputs,
        Funding::Required(instruction) => return Ok(SpawnOutcome::FundingRequired(instruction)),
    };
    let change_address = inputs
        .change_address()
        .ok_or_else(|| DeckError::UnexpectedResponse("no inputs selected".into()))?
        .to_string();

    let raw = protocol.deck_spawn(&spawn, &inputs, &change_address)?;
    let signed = provider.sign_raw_transaction(&raw)?;
    if !signed.complete {
        return Err(DeckError::IncompleteSignature);
    }

    if !broadcast {
        return Ok(SpawnOutcome::Signed { hex: signed.hex });
    }

    let txid = provider.send_raw_transaction(&signed.hex)?;
    log::info!("deck spawn broadcast as {}", txid);
    let deck = spawn.into_deck(txid.clone(), change_address);
    let subscribe_error = match protocol.load_deck_p2th_into_local_node(&deck) {
        Ok(()) => None,
        Err(e) => {
            log::warn!("deck {} broadcast but not subscribed: {}", txid, e);
            Some(e.to_string())
        }
    };
    Ok(SpawnOutcome::Broadcast {
        txid,
        subscribe_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::testing::DummyProtocol;
    use crate::protocol::IssueMode;
    use crate::provider::testing::DummyProvider;

    const DECK_JSON: &str = r#"{"name":"X","number_of_decimals":0,"issue_mode":"ONCE"}"#;

    const MUTATIONS: [&str; 3] = ["createrawtransaction", "sendrawtransaction", "importprivkey"];

    fn funded() -> DummyProvider {
        DummyProvider::new()
            .with_account("PACLI", &["mEmpty", "mFunded"])
            .with_unspent("mFunded", &[50_000])
    }

    #[test]
    fn no_account_yields_instruction_without_mutation() {
        let provider = DummyProvider::new();
        let protocol = DummyProtocol::default();
        let outcome =
            spawn_deck(&provider, &protocol, &Context::for_tests(), DECK_JSON, true).unwrap();

        assert_eq!(
            outcome,
            SpawnOutcome::FundingRequired(FundingInstruction::CreateAccount {
                account: "PACLI".into()
            })
        );
        for call in MUTATIONS {
            assert_eq!(provider.count(call), 0, "{call}");
        }
        assert!(protocol.spawned.borrow().is_empty());
        assert!(protocol.subscribed.borrow().is_empty());
    }

    #[test]
    fn unfunded_addresses_are_listed() {
        let provider = DummyProvider::new()
            .with_account("PACLI", &["mA", "mB"])
            .with_unspent("mA", &[1_000]);
        let protocol = DummyProtocol::default();
        let outcome =
            spawn_deck(&provider, &protocol, &Context::for_tests(), DECK_JSON, false).unwrap();

        match outcome {
            SpawnOutcome::FundingRequired(instruction) => {
                assert_eq!(
                    instruction.to_string(),
                    "Please fund one of the following addresses: mA, mB"
                );
            }
            other => panic!("expected funding instruction, got {:?}", other),
        }
        assert_eq!(provider.count("signrawtransaction"), 0);
    }

    #[test]
    fn no_broadcast_never_submits_or_subscribes() {
        let provider = funded();
        let protocol = DummyProtocol::default();
        let outcome =
            spawn_deck(&provider, &protocol, &Context::for_tests(), DECK_JSON, false).unwrap();

        assert_eq!(
            outcome,
            SpawnOutcome::Signed {
                hex: "00deadbeefsigned".into()
            }
        );
        assert_eq!(provider.count("sendrawtransaction"), 0);
        assert!(protocol.subscribed.borrow().is_empty());

        let spawned = protocol.spawned.borrow();
        assert_eq!(spawned[0].1, "mFunded");
        assert_eq!(spawned[0].0.issue_mode, IssueMode::Once);
        assert_eq!(spawned[0].0.network, Context::for_tests().network);
    }

    #[test]
    fn broadcast_submits_once_then_subscribes_new_deck() {
        let provider = funded();
        let protocol = DummyProtocol::default();
        let outcome =
            spawn_deck(&provider, &protocol, &Context::for_tests(), DECK_JSON, true).unwrap();

        let txid = "f".repeat(64);
        assert_eq!(
            outcome,
            SpawnOutcome::Broadcast {
                txid: txid.clone(),
                subscribe_error: None,
            }
        );
        assert_eq!(provider.count("sendrawtransaction"), 1);
        assert_eq!(protocol.subscribed.borrow().as_slice(), &[txid]);

        let calls = provider.calls();
        let sign = calls.iter().position(|c| c == "signrawtransaction").unwrap();
        let send = calls.iter().position(|c| c == "sendrawtransaction").unwrap();
        assert!(sign < send);
    }

    #[test]
    fn failed_subscribe_still_reports_broadcast_txid() {
        let provider = funded();
        let protocol = DummyProtocol {
            fail_subscribe: true,
            ..Default::default()
        };
        let outcome =
            spawn_deck(&provider, &protocol, &Context::for_tests(), DECK_JSON, true).unwrap();

        match outcome {
            SpawnOutcome::Broadcast {
                txid,
                subscribe_error: Some(reason),
            } => {
                assert_eq!(txid, "f".repeat(64));
                assert!(reason.contains("importprivkey timed out"), "{reason}");
            }
            other => panic!("expected broadcast with subscribe error, got {:?}", other),
        }
        assert_eq!(provider.count("sendrawtransaction"), 1);
    }

    #[test]
    fn rejected_broadcast_does_not_subscribe() {
        let mut provider = funded();
        provider.send_result = None;
        let protocol = DummyProtocol::default();
        let result = spawn_deck(&provider, &protocol, &Context::for_tests(), DECK_JSON, true);

        assert!(result.is_err());
        assert!(protocol.subscribed.borrow().is_empty());
    }

    #[test]
    fn incomplete_signature_is_an_error() {
        let mut provider = funded();
        provider.sign_complete = false;
        let protocol = DummyProtocol::default();
        let result = spawn_deck(&provider, &protocol, &Context::for_tests(), DECK_JSON, true);

        assert!(matches!(result, Err(DeckError::IncompleteSignature)));
        assert_eq!(provider.count("sendrawtransaction"), 0);
    }

    #[test]
    fn malformed_json_fails_before_any_rpc() {
        let provider = funded();
        let protocol = DummyProtocol::default();
        let result = spawn_deck(&provider, &protocol, &Context::for_tests(), "{nope", true);

        assert!(matches!(result, Err(DeckError::InvalidDeckJson(_))));
        assert!(provider.calls().is_empty());
    }
}
