//! Credential primitives: password hashing and opaque session tokens.
//!
//! Passwords are stored as Argon2id PHC strings, so each hash carries its own
//! salt and parameters. Session tokens are random and only their SHA-256
//! digest is persisted.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("stored password hash is malformed: {0}")]
    InvalidHash(String),

    #[error("failed to verify password: {0}")]
    Verify(String),
}

/// Hashes a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CredentialError::Hash(err.to_string()))
}

/// Checks `candidate` against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; only a corrupt hash or an internal hashing
/// failure is an error.
pub fn verify_password(candidate: &str, stored_hash: &str) -> Result<bool, CredentialError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|err| CredentialError::InvalidHash(err.to_string()))?;

    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(CredentialError::Verify(err.to_string())),
    }
}

/// Generates an opaque session token (32 random bytes, URL-safe base64).
pub fn generate_session_token() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Digest under which a session token is stored and looked up.
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    URL_SAFE_NO_PAD.encode(&digest[..])
}
