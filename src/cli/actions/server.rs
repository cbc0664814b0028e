use crate::{api, token::TokenSigner};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub token_secret: SecretString,
    pub token_ttl_seconds: i64,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("port", &self.port)
            .field("dsn", &self.dsn)
            .field("token_secret", &"***")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let signer = TokenSigner::new(args.token_secret.expose_secret(), args.token_ttl_seconds);

    api::new(args.port, args.dsn, Arc::new(signer)).await
}
