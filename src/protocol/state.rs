use std::collections::BTreeMap;

use super::card::CardTransfer;
use super::deck::{Deck, IssueMode};

/// Balances of a deck rebuilt by replaying its card transfers in order.
///
/// The issuer's balance goes negative as it issues cards, so a consistent
/// state always sums to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckState {
    balances: BTreeMap<String, i64>,
    valid_cards: Vec<String>,
    rejected_cards: Vec<String>,
    pub checksum: bool,
}

impl DeckState {
    pub fn new(deck: &Deck, cards: &[CardTransfer]) -> Self {
        let mut state = Self {
            balances: BTreeMap::new(),
            valid_cards: Vec::new(),
            rejected_cards: Vec::new(),
            checksum: false,
        };
        let mut issued = false;

        for card in cards {
            match state.apply(deck, card, issued) {
                Ok(is_issue) => {
                    issued |= is_issue;
                    state.valid_cards.push(card.txid.clone());
                }
                Err(reason) => {
                    log::debug!("rejecting card {}: {}", card.txid, reason);
                    state.rejected_cards.push(card.txid.clone());
                }
            }
        }

        let sum: i128 = state.balances.values().map(|b| i128::from(*b)).sum();
        state.checksum = sum == 0;
        state
    }

    /// Apply one card, returning whether it was an issuance.
    fn apply(&mut self, deck: &Deck, card: &CardTransfer, issued: bool) -> Result<bool, String> {
        if card.number_of_decimals != deck.number_of_decimals {
            return Err(format!(
                "declares {} decimals, deck has {}",
                card.number_of_decimals, deck.number_of_decimals
            ));
        }
        let total = card
            .total()
            .and_then(|t| i64::try_from(t).ok())
            .ok_or("amount overflow")?;
        let is_issue = card.sender == deck.issuer;

        if is_issue {
            check_issue_mode(deck, card, issued)?;
        } else {
            let balance = self.balances.get(&card.sender).copied().unwrap_or(0);
            if balance < total {
                return Err(format!("sender holds {balance}, sends {total}"));
            }
        }

        let mut next = self.balances.clone();
        let sender = next.entry(card.sender.clone()).or_insert(0);
        *sender = sender.checked_sub(total).ok_or("balance underflow")?;
        for (receiver, amount) in &card.receivers {
            let amount = i64::try_from(*amount).map_err(|_| "amount overflow")?;
            let entry = next.entry(receiver.clone()).or_insert(0);
            *entry = entry.checked_add(amount).ok_or("balance overflow")?;
        }
        self.balances = next;
        Ok(is_issue)
    }

    pub fn balances(&self) -> &BTreeMap<String, i64> {
        &self.balances
    }

    /// Txids of accepted cards, in replay order.
    pub fn valid_cards(&self) -> &[String] {
        &self.valid_cards
    }

    pub fn rejected_cards(&self) -> &[String] {
        &self.rejected_cards
    }
}

fn check_issue_mode(deck: &Deck, card: &CardTransfer, issued: bool) -> Result<(), String> {
    let one = 10u64
        .checked_pow(u32::from(deck.number_of_decimals))
        .ok_or("decimals overflow")?;
    match deck.issue_mode {
        IssueMode::None => Err("deck does not allow issuance".into()),
        IssueMode::Once if issued => Err("deck allows a single issuance".into()),
        IssueMode::Singlet if issued => Err("deck allows a single issuance".into()),
        IssueMode::Singlet if card.receivers.len() != 1 || card.total() != Some(one) => {
            Err("singlet deck issues exactly one card".into())
        }
        IssueMode::Mono if card.receivers.iter().any(|(_, a)| *a != one) => {
            Err("mono deck issues whole single cards".into())
        }
        _ => Ok(()),
    }
}
