use clap::{Args, Subcommand};

use crate::commands::deck::DeckOperation;

/// `deck` group. Subcommands win; otherwise the positional id runs `find`.
#[derive(Args, Debug, Clone)]
#[command(args_conflicts_with_subcommands = true)]
pub struct DeckArgs {
    #[command(subcommand)]
    pub cmd: Option<DeckCmd>,

    #[command(flatten)]
    pub find: FindArgs,
}

impl DeckArgs {
    /// Resolve the implicit `find` when no subcommand was given.
    pub fn command(&self) -> anyhow::Result<DeckCmd> {
        match &self.cmd {
            Some(cmd) => Ok(cmd.clone()),
            None if self.find.deck_id.is_some() => Ok(DeckCmd::Find(self.find.clone())),
            None => anyhow::bail!("missing DECK_ID; try `deck find <DECK_ID>`"),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum DeckCmd {
    #[command(
        about = "Show a single deck",
        long_about = "Resolve DECK_ID to a deck and run the selected operations in the order info, balances, subscribe, checksum. Shows info when no operation is selected."
    )]
    Find(FindArgs),
    #[command(
        about = "Search decks by <DECK_ID>",
        long_about = "List every deck whose asset id contains DECK_ID, or one of whose fields equals DECK_ID."
    )]
    Search {
        #[arg(value_name = "DECK_ID", help = "Asset id fragment or exact field value")]
        deck_id: String,
    },
    #[command(
        about = "List decks",
        long_about = "List every valid deck in the registry. The node must track the registry p2th; pass --load-registry once to import it."
    )]
    List(ListArgs),
    #[command(
        about = "Spawn a new deck",
        long_about = "Spawn a new PeerAssets deck from a JSON description, e.g. '{\"name\": \"test\", \"number_of_decimals\": 1, \"issue_mode\": \"ONCE\"}'. Prints the signed transaction, or the txid when broadcasting."
    )]
    New(NewArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[arg(
        long = "load-registry",
        help = "Import the deck registry p2th into the node first (rescans the chain)"
    )]
    pub load_registry: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FindArgs {
    #[arg(value_name = "DECK_ID", help = "Asset id fragment or exact field value")]
    pub deck_id: Option<String>,
    #[arg(long, help = "Show full deck details")]
    pub info: bool,
    #[arg(long, help = "Show deck balances")]
    pub balances: bool,
    #[arg(long, help = "Load the deck p2th into the local node")]
    pub subscribe: bool,
    #[arg(long, help = "Verify the deck checksum")]
    pub checksum: bool,
}

impl FindArgs {
    /// Selected operations in declaration order, `info` when none is set.
    pub fn operations(&self) -> Vec<DeckOperation> {
        let selected: Vec<DeckOperation> = [
            (self.info, DeckOperation::Info),
            (self.balances, DeckOperation::Balances),
            (self.subscribe, DeckOperation::Subscribe),
            (self.checksum, DeckOperation::Checksum),
        ]
        .into_iter()
        .filter_map(|(on, op)| on.then_some(op))
        .collect();

        if selected.is_empty() {
            vec![DeckOperation::Info]
        } else {
            selected
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct NewArgs {
    #[arg(value_name = "DECK_JSON", help = "Deck description json")]
    pub deck: String,
    #[arg(
        long,
        overrides_with = "no_broadcast",
        help = "Broadcast the resulting transaction"
    )]
    pub broadcast: bool,
    #[arg(
        long = "no-broadcast",
        overrides_with = "broadcast",
        help = "Only print the signed transaction (default)"
    )]
    pub no_broadcast: bool,
}

impl NewArgs {
    pub fn should_broadcast(&self) -> bool {
        self.broadcast && !self.no_broadcast
    }
}
