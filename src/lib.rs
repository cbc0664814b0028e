//! # Konekti (Developer Profiles API)
//!
//! `konekti` is a REST backend for developer profiles: account registration,
//! bearer-token authentication, and a per-user profile aggregate with embedded
//! experience and education collections.
//!
//! ## Accounts & Authentication
//!
//! Accounts are identified by email (unique, enforced by the store). Passwords
//! are stored as Argon2 hashes with a per-user salt. Login issues an HS256
//! signed bearer token carrying the user id; protected routes verify the token
//! offline, with expiry as the only invalidation mechanism.
//!
//! ## Profile Aggregate
//!
//! Each account owns at most one profile (schema-enforced). Experience and
//! education entries are embedded ordered collections, newest first, each with
//! a stable id so individual entries can be removed later.

pub mod api;
pub mod avatar;
pub mod cli;
pub mod password;
pub mod token;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
