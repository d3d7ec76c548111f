use std::path::PathBuf;

use bitcoincore_rpc::Auth;
use url::Url;

use crate::network::Network;

/// Process-wide settings, built once from the command line and passed by
/// reference to every operation that needs them.
#[derive(Clone, Debug)]
pub struct Context {
    pub rpc_url: Url,
    pub auth: Auth,
    pub network: Network,
    pub production: bool,
    pub deck_version: u8,
    pub funding_account: String,
    pub log_file: Option<PathBuf>,
}

impl Context {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        Self {
            rpc_url: cli.rpc_url.clone(),
            auth: match (&cli.rpc_user, &cli.rpc_pass) {
                (Some(user), Some(pass)) => Auth::UserPass(user.clone(), pass.clone()),
                _ => Auth::None,
            },
            network: cli.network,
            production: !cli.testing,
            deck_version: cli.deck_version,
            funding_account: cli.funding_account.clone(),
            log_file: cli.log_file.clone().map(PathBuf::from),
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            rpc_url: Url::parse("http://127.0.0.1:9904").unwrap(),
            auth: Auth::None,
            network: Network::PeercoinTestnet,
            production: true,
            deck_version: 1,
            funding_account: "PACLI".to_string(),
            log_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn from_cli_maps_testing_flag_to_production() {
        let cli = crate::cli::Cli::try_parse_from([
            "pacli",
            "--network",
            "ppc",
            "--testing",
            "--rpc-user",
            "u",
            "--rpc-pass",
            "p",
            "deck",
            "list",
        ])
        .unwrap();
        let ctx = Context::from_cli(&cli);
        assert_eq!(ctx.network, Network::Peercoin);
        assert!(!ctx.production);
        assert_eq!(ctx.auth, Auth::UserPass("u".into(), "p".into()));
        assert_eq!(ctx.funding_account, "PACLI");
    }

    #[test]
    fn from_cli_without_credentials_uses_no_auth() {
        let cli = crate::cli::Cli::try_parse_from(["pacli", "deck", "list"]).unwrap();
        let ctx = Context::from_cli(&cli);
        assert_eq!(ctx.auth, Auth::None);
        assert!(ctx.production);
        assert_eq!(ctx.deck_version, 1);
    }

    #[test]
    fn unknown_network_is_a_usage_error() {
        let err = crate::cli::Cli::try_parse_from(["pacli", "--network", "pcc", "deck", "list"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("unknown network 'pcc'"));
    }
}
