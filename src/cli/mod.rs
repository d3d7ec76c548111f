mod args;
mod command;
mod deck_cmd;

pub use args::Cli;
pub use command::Command;
pub use deck_cmd::{DeckArgs, DeckCmd, FindArgs, ListArgs, NewArgs};

pub use args::parse;
