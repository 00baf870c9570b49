//! Session-token helpers
//!
//! Tokens are opaque 32-byte random values handed to the client at login.
//! The database stores only the SHA-256 of the token, so a leaked database
//! does not leak usable credentials. Password mechanics are out of scope;
//! the contract is simply "token maps to owner".

use sha2::{Digest, Sha256};

#[cfg(feature = "sqlx")]
use crate::{time, Error, Result};
#[cfg(feature = "sqlx")]
use sqlx::SqlitePool;
#[cfg(feature = "sqlx")]
use uuid::Uuid;

/// Hash a session token for storage/lookup (64 hex chars)
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Generate a fresh random token (64 hex chars)
pub fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Look up an existing user by name, creating one on first login
#[cfg(feature = "sqlx")]
pub async fn get_or_create_user(db: &SqlitePool, name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("User name must not be blank".to_string()));
    }

    let existing: Option<(String,)> =
        sqlx::query_as("SELECT guid FROM users WHERE name = ?")
            .bind(name)
            .fetch_optional(db)
            .await?;

    if let Some((guid,)) = existing {
        return Ok(guid);
    }

    let guid = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO users (guid, name, created_at) VALUES (?, ?, ?)")
        .bind(&guid)
        .bind(name)
        .bind(time::now_rfc3339())
        .execute(db)
        .await?;

    Ok(guid)
}

/// Issue a new session token for `user_guid`
///
/// Returns the plaintext token; only its hash is persisted.
#[cfg(feature = "sqlx")]
pub async fn issue_session(db: &SqlitePool, user_guid: &str) -> Result<String> {
    let token = generate_token();
    sqlx::query("INSERT INTO sessions (token_hash, user_guid, created_at) VALUES (?, ?, ?)")
        .bind(hash_token(&token))
        .bind(user_guid)
        .bind(time::now_rfc3339())
        .execute(db)
        .await?;
    Ok(token)
}

/// Resolve a presented token to its owning user, if the session exists
#[cfg(feature = "sqlx")]
pub async fn lookup_session(db: &SqlitePool, token: &str) -> Result<Option<String>> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT user_guid FROM sessions WHERE token_hash = ?")
            .bind(hash_token(token))
            .fetch_optional(db)
            .await?;
    Ok(row.map(|(guid,)| guid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_deterministic() {
        let a = hash_token("secret");
        let b = hash_token("secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(hash_token("other"), a);
    }

    #[test]
    fn test_generate_token_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[cfg(feature = "sqlx")]
    async fn memory_pool() -> SqlitePool {
        // Single connection: each sqlite::memory: connection is its own database
        sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[cfg(feature = "sqlx")]
    #[tokio::test]
    async fn test_session_round_trip() {
        let pool = memory_pool().await;
        crate::db::create_tables(&pool).await.unwrap();

        let user = get_or_create_user(&pool, "alice").await.unwrap();
        // Second login resolves to the same account
        let again = get_or_create_user(&pool, "alice").await.unwrap();
        assert_eq!(user, again);

        let token = issue_session(&pool, &user).await.unwrap();
        assert_eq!(lookup_session(&pool, &token).await.unwrap(), Some(user));
        assert_eq!(lookup_session(&pool, "bogus").await.unwrap(), None);
    }

    #[cfg(feature = "sqlx")]
    #[tokio::test]
    async fn test_blank_user_name_rejected() {
        let pool = memory_pool().await;
        crate::db::create_tables(&pool).await.unwrap();
        assert!(get_or_create_user(&pool, "   ").await.is_err());
    }
}
