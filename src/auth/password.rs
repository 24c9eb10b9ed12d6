use anyhow::Context;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

use crate::error::{AppError, AppResult};

#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("password must not be empty")]
    Empty,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("stored password hash is malformed: {0}")]
    Malformed(String),
}

impl From<HashError> for AppError {
    fn from(e: HashError) -> Self {
        match e {
            HashError::Empty => AppError::Validation(e.to_string()),
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

pub fn hash_password(plain: &str) -> Result<String, HashError> {
    if plain.is_empty() {
        return Err(HashError::Empty);
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            HashError::Hash(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> Result<bool, HashError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        HashError::Malformed(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Runs [`hash_password`] on the blocking pool.
pub async fn hash_in_background(plain: String) -> AppResult<String> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("password hashing task")??;
    Ok(hash)
}

/// Runs [`verify_password`] on the blocking pool.
pub async fn verify_in_background(plain: String, hash: String) -> AppResult<bool> {
    let ok = tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .context("password verification task")??;
    Ok(ok)
}

lazy_static! {
    static ref DUMMY_HASH: Option<String> = hash_password("jobboard-dummy-password").ok();
}

/// Verifies against a throwaway hash and discards the result, so that a sign-in for an
/// unknown email costs as much as one with a wrong password.
pub async fn verify_dummy_in_background(plain: String) -> AppResult<()> {
    tokio::task::spawn_blocking(move || match DUMMY_HASH.as_deref() {
        Some(hash) => verify_password(&plain, hash).map(drop),
        None => Ok(()),
    })
    .await
    .context("dummy password verification task")??;
    Ok(())
}
