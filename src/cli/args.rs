use clap::Parser;
use std::env;

use crate::cli::command::Command;
use crate::network::{parse_network, Network};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Manage PeerAssets decks through a Peercoin node",
    long_about = "Inspect, subscribe to and spawn PeerAssets decks. All chain access goes through the node's JSON-RPC interface."
)]
pub struct Cli {
    #[arg(
        long,
        env = "PACLI_RPC_URL",
        default_value = "http://127.0.0.1:9904",
        value_name = "URL",
        help = "Node RPC URL"
    )]
    pub rpc_url: url::Url,

    #[arg(
        long,
        env = "PACLI_RPC_USER",
        value_name = "USER",
        help = "RPC username (user/pass auth)"
    )]
    pub rpc_user: Option<String>,

    #[arg(
        long,
        env = "PACLI_RPC_PASS",
        value_name = "PASS",
        help = "RPC password (user/pass auth)"
    )]
    pub rpc_pass: Option<String>,

    #[arg(
        long,
        env = "PACLI_NETWORK",
        default_value = "tppc",
        value_name = "NETWORK",
        value_parser = parse_network,
        help = "Chain the node runs on (ppc or tppc)"
    )]
    pub network: Network,

    #[arg(
        long,
        env = "PACLI_TESTING",
        default_value_t = false,
        help = "Use the test deck registry instead of the production one"
    )]
    pub testing: bool,

    #[arg(
        long = "deck-version",
        env = "PACLI_DECK_VERSION",
        default_value_t = 1u8,
        value_name = "VERSION",
        help = "Protocol version of decks to list and spawn"
    )]
    pub deck_version: u8,

    #[arg(
        long = "funding-account",
        env = "PACLI_FUNDING_ACCOUNT",
        default_value = "PACLI",
        value_name = "ACCOUNT",
        help = "Node account whose addresses fund deck spawns"
    )]
    pub funding_account: String,

    #[arg(
        long = "log-file",
        env = "PACLI_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    if dotenvy::from_filename(&dotenv_path).is_ok() {
        log::debug!("Loaded env from {}", dotenv_path);
    }
    Cli::parse()
}
