// src/auth/password.rs

use anyhow::{anyhow, Result};
use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn hash_password(password: &str) -> Result<String> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(anyhow!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    hash(password, DEFAULT_COST).map_err(|e: BcryptError| anyhow!("Failed to hash password: {}", e))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    verify(password, hash).map_err(|e: BcryptError| anyhow!("Failed to verify password: {}", e))
}
