use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::Rng;

use crate::PersistenceError;

fn salt() -> Result<SaltString, PersistenceError> {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    SaltString::encode_b64(&bytes).map_err(|e| PersistenceError::PasswordHash(e.to_string()))
}

pub fn hash(password: &str) -> Result<String, PersistenceError> {
    Argon2::default()
        .hash_password(password.as_bytes(), &salt()?)
        .map(|h| h.to_string())
        .map_err(|e| PersistenceError::PasswordHash(e.to_string()))
}

pub fn verify(password: &str, hashword: &str) -> bool {
    PasswordHash::new(hashword)
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok()
        })
        .unwrap_or(false)
}
