use clap::Subcommand;

use crate::cli::deck_cmd::DeckArgs;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Deck management commands",
        long_about = "Find, search, list and spawn decks. A bare `deck <DECK_ID>` is shorthand for `deck find <DECK_ID>`."
    )]
    Deck(DeckArgs),
}
