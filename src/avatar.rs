//! Gravatar URL derivation.

use md5::{Digest, Md5};

/// Derive a deterministic gravatar URL from an email address.
///
/// The hash is computed over the trimmed, lowercased email so equal addresses
/// always map to the same avatar. Size 200, PG rating, "mystery man" fallback.
#[must_use]
pub fn gravatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = Md5::digest(normalized.as_bytes());

    format!(
        "https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm",
        hex::encode(digest)
    )
}
