//!
//! Password hashing for staff accounts.
//!
//! Encoded layout (hex): `version (1) || salt (16) || argon2id output (32)`.
//!

use anyhow::{anyhow, ensure, Result};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use subtle::ConstantTimeEq;

/// Current version of the encoded hash format.
pub const HASH_VERSION: u8 = 0x01;

pub const SALT_SIZE: usize = 16;

pub const HASH_SIZE: usize = 32;

/// Total size of the decoded hash (version + salt + hash).
pub const ENCODED_SIZE: usize = 1 + SALT_SIZE + HASH_SIZE;

fn argon_params() -> Result<Params> {
    Params::new(19456, 2, 1, Some(HASH_SIZE)).map_err(|e| anyhow!("invalid argon2 params: {e}"))
}

/// Hash a password with Argon2id and a random salt, returning a hex string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = generate_salt();
    let hash = argon2id_hash(password, &salt)?;

    let mut encoded = Vec::with_capacity(ENCODED_SIZE);
    encoded.push(HASH_VERSION);
    encoded.extend_from_slice(&salt);
    encoded.extend_from_slice(&hash);
    Ok(hex::encode(encoded))
}

/// Verify a password against a value produced by [`hash_password`].
pub fn verify_password(password: &str, encoded_hex: &str) -> Result<bool> {
    let encoded = hex::decode(encoded_hex).map_err(|e| anyhow!("password hash is not hex: {e}"))?;
    ensure!(
        encoded.len() == ENCODED_SIZE,
        "Invalid encoded hash length: expected {}, got {}",
        ENCODED_SIZE,
        encoded.len()
    );
    ensure!(
        encoded[0] == HASH_VERSION,
        "Unsupported hash version: {} (supported: {})",
        encoded[0],
        HASH_VERSION
    );

    let mut salt = [0u8; SALT_SIZE];
    salt.copy_from_slice(&encoded[1..1 + SALT_SIZE]);

    let computed = argon2id_hash(password, &salt)?;
    Ok(computed.ct_eq(&encoded[1 + SALT_SIZE..]).into())
}

fn generate_salt() -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    rand::rng().fill_bytes(&mut salt);
    salt
}

fn argon2id_hash(password: &str, salt: &[u8; SALT_SIZE]) -> Result<[u8; HASH_SIZE]> {
    let mut output = [0u8; HASH_SIZE];
    let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params()?);
    argon
        .hash_password_into(password.as_bytes(), salt, &mut output)
        .map_err(|e| anyhow!("Argon2id hashing failed: {e}"))?;
    Ok(output)
}
