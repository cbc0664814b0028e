//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the appropriate
//! action, such as starting the API server with its full configuration state.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::token;
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let token_opts = token::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        token_secret: token_opts.secret,
        token_ttl_seconds: token_opts.ttl_seconds,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_builds_server_action() {
        temp_env::with_vars(
            [
                ("KONEKTI_DSN", None::<&str>),
                ("KONEKTI_TOKEN_SECRET", None::<&str>),
                ("KONEKTI_PORT", None::<&str>),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec![
                    "konekti",
                    "--dsn",
                    "postgres://user@localhost:5432/konekti",
                    "--token-secret",
                    "sekreto",
                    "--token-ttl-seconds",
                    "600",
                ]);
                let action = handler(&matches);
                assert!(action.is_ok());
                if let Ok(Action::Server(args)) = action {
                    assert_eq!(args.port, 8080);
                    assert_eq!(args.dsn, "postgres://user@localhost:5432/konekti");
                    assert_eq!(args.token_ttl_seconds, 600);
                }
            },
        );
    }
}
