use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

use crate::token::DEFAULT_TOKEN_TTL_SECONDS;

pub const ARG_TOKEN_SECRET: &str = "token-secret";
pub const ARG_TOKEN_TTL: &str = "token-ttl-seconds";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_TOKEN_SECRET)
                .long(ARG_TOKEN_SECRET)
                .help("Secret used to sign and verify bearer tokens")
                .env("KONEKTI_TOKEN_SECRET")
                .required(true),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL)
                .long(ARG_TOKEN_TTL)
                .help("Bearer token lifetime in seconds")
                .env("KONEKTI_TOKEN_TTL_SECONDS")
                .default_value("360000")
                .value_parser(clap::value_parser!(i64)),
        )
}

/// Token options extracted from CLI matches.
pub struct Options {
    pub secret: SecretString,
    pub ttl_seconds: i64,
}

impl Options {
    /// # Errors
    /// Returns an error if the token secret is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let secret = matches
            .get_one::<String>(ARG_TOKEN_SECRET)
            .cloned()
            .context("missing required argument: --token-secret")?;

        let ttl_seconds = matches
            .get_one::<i64>(ARG_TOKEN_TTL)
            .copied()
            .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);

        Ok(Self {
            secret: SecretString::from(secret),
            ttl_seconds,
        })
    }
}
