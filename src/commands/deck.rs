use std::io::{self, Write};

use anyhow::{bail, Context as AnyhowContext, Result};
use bitcoincore_rpc::Client;

use super::CommandRunner;
use crate::cli::{DeckArgs, DeckCmd, FindArgs, ListArgs, NewArgs};
use crate::context::Context;
use crate::error::DeckError;
use crate::protocol::{registry_label, Deck, DeckState, PeerAssets, TokenProtocol};
use crate::provider::ChainProvider;
use crate::spawn::{self, SpawnOutcome};
use crate::{display, finder};

/// Per-deck operations selectable on `deck find`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckOperation {
    Info,
    Balances,
    Subscribe,
    Checksum,
}

/// Balances of `deck`; a deck without card transfers has none.
pub fn get_state<P: TokenProtocol + ?Sized>(
    protocol: &P,
    deck: &Deck,
) -> Result<DeckState, DeckError> {
    let cards = protocol.find_card_transfers(deck)?;
    if cards.is_empty() {
        return Err(DeckError::NoCards);
    }
    let state = DeckState::new(deck, &cards);
    log::debug!(
        "deck {}: {} valid cards, {} rejected",
        deck.asset_id,
        state.valid_cards().len(),
        state.rejected_cards().len()
    );
    Ok(state)
}

/// A deck resolved from a user key, ready for per-deck operations.
pub struct SingleDeck<'a, P: TokenProtocol + ?Sized> {
    protocol: &'a P,
    deck: Deck,
}

impl<'a, P: TokenProtocol + ?Sized> SingleDeck<'a, P> {
    pub fn resolve(protocol: &'a P, ctx: &Context, key: &str) -> Result<Self, DeckError> {
        let deck = finder::find_deck(protocol, ctx, key)?;
        log::debug!(
            "resolved {} to deck {} (v{}, {}, {} bytes of asset data)",
            key,
            deck.asset_id,
            deck.version,
            registry_label(deck.production),
            deck.asset_specific_data.len()
        );
        Ok(Self { protocol, deck })
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn run(&self, op: DeckOperation, out: &mut dyn Write) -> Result<()> {
        match op {
            DeckOperation::Info => self.info(out),
            DeckOperation::Balances => self.balances(out),
            DeckOperation::Subscribe => self.subscribe(out),
            DeckOperation::Checksum => self.checksum(out),
        }
    }

    fn info(&self, out: &mut dyn Write) -> Result<()> {
        write!(out, "{}", display::deck_info_table(&self.deck))?;
        Ok(())
    }

    fn balances(&self, out: &mut dyn Write) -> Result<()> {
        let state = get_state(self.protocol, &self.deck)?;
        let table = display::deck_balances_table(&self.deck, state.balances());
        write!(out, "{}", table)?;
        Ok(())
    }

    fn subscribe(&self, out: &mut dyn Write) -> Result<()> {
        self.protocol
            .load_deck_p2th_into_local_node(&self.deck)
            .with_context(|| format!("subscribing to deck {}", self.deck.asset_id))?;
        writeln!(out, "subscribed to deck {}", self.deck.asset_id)?;
        Ok(())
    }

    fn checksum(&self, out: &mut dyn Write) -> Result<()> {
        let state = get_state(self.protocol, &self.deck)?;
        if state.checksum {
            writeln!(out, "Deck checksum is correct.")?;
        } else {
            writeln!(out, "Deck checksum is incorrect.")?;
        }
        Ok(())
    }
}

pub fn find<P: TokenProtocol + ?Sized>(
    protocol: &P,
    ctx: &Context,
    args: &FindArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let key = args.deck_id.as_deref().context("missing DECK_ID")?;
    let deck = SingleDeck::resolve(protocol, ctx, key)?;
    for op in args.operations() {
        log::debug!("running {:?} on deck {}", op, deck.deck().asset_id);
        deck.run(op, out)?;
    }
    Ok(())
}

pub fn search<P: TokenProtocol + ?Sized>(
    protocol: &P,
    ctx: &Context,
    key: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let decks = finder::search_decks(protocol, ctx, key)?;
    write!(out, "{}", display::deck_list_table(&decks))?;
    Ok(())
}

pub fn list<P: TokenProtocol + ?Sized>(
    protocol: &P,
    ctx: &Context,
    args: &ListArgs,
    out: &mut dyn Write,
) -> Result<()> {
    if args.load_registry {
        protocol
            .load_registry_into_local_node(ctx.production)
            .context("loading deck registry")?;
    }
    let decks = protocol
        .find_all_valid_decks(ctx.deck_version, ctx.production)
        .context("listing decks")?;
    write!(out, "{}", display::deck_list_table(&decks))?;
    Ok(())
}

pub fn new_deck<C, P>(
    provider: &C,
    protocol: &P,
    ctx: &Context,
    args: &NewArgs,
    out: &mut dyn Write,
) -> Result<()>
where
    C: ChainProvider + ?Sized,
    P: TokenProtocol + ?Sized,
{
    let outcome = spawn::spawn_deck(provider, protocol, ctx, &args.deck, args.should_broadcast())?;
    match outcome {
        SpawnOutcome::FundingRequired(instruction) => writeln!(out, "\n {}", instruction)?,
        SpawnOutcome::Signed { hex } => writeln!(out, "\nraw transaction:\n {}\n", hex)?,
        SpawnOutcome::Broadcast {
            txid,
            subscribe_error,
        } => {
            writeln!(out, "\n {}\n", txid)?;
            out.flush()?;
            if let Some(reason) = subscribe_error {
                bail!("deck {txid} was broadcast but subscribing to it failed: {reason}");
            }
        }
    }
    Ok(())
}

pub fn dispatch<C, P>(
    cmd: &DeckCmd,
    provider: &C,
    protocol: &P,
    ctx: &Context,
    out: &mut dyn Write,
) -> Result<()>
where
    C: ChainProvider + ?Sized,
    P: TokenProtocol + ?Sized,
{
    match cmd {
        DeckCmd::Find(args) => find(protocol, ctx, args, out),
        DeckCmd::Search { deck_id } => search(protocol, ctx, deck_id, out),
        DeckCmd::List(args) => list(protocol, ctx, args, out),
        DeckCmd::New(args) => new_deck(provider, protocol, ctx, args, out),
    }
}

impl CommandRunner for DeckArgs {
    fn run(&self, ctx: &Context) -> Result<()> {
        let cmd = self.command()?;
        let client = Client::new(ctx.rpc_url.as_ref(), ctx.auth.clone())
            .context("failed to create RPC client")?;
        let protocol = PeerAssets::new(&client, ctx.network);

        let stdout = io::stdout();
        let mut out = stdout.lock();
        dispatch(&cmd, &client, &protocol, ctx, &mut out)?;
        out.flush()?;
        Ok(())
    }
}
