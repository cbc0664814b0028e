//! Password hashing with Argon2 and a freshly generated per-user salt.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;

/// Hash a plaintext password with a random salt.
///
/// # Errors
/// Returns an error if hashing fails.
pub fn hash(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Compare a plaintext password against a stored hash.
///
/// Unparseable stored hashes count as a mismatch rather than an error so the
/// caller can keep its single credential-failure path.
#[must_use]
pub fn verify(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_never_plaintext() -> Result<(), argon2::password_hash::Error> {
        let hashed = hash("hunter2!")?;
        assert_ne!(hashed, "hunter2!");
        assert!(hashed.starts_with("$argon2"));
        Ok(())
    }

    #[test]
    fn verify_accepts_matching_password() -> Result<(), argon2::password_hash::Error> {
        let hashed = hash("correct horse battery staple")?;
        assert!(verify("correct horse battery staple", &hashed));
        Ok(())
    }

    #[test]
    fn verify_rejects_wrong_password() -> Result<(), argon2::password_hash::Error> {
        let hashed = hash("correct horse battery staple")?;
        assert!(!verify("incorrect horse", &hashed));
        Ok(())
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify("anything", "not-a-phc-string"));
    }

    #[test]
    fn salts_differ_between_hashes() -> Result<(), argon2::password_hash::Error> {
        let first = hash("same password")?;
        let second = hash("same password")?;
        assert_ne!(first, second);
        Ok(())
    }
}
