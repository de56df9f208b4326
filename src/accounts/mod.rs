use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use rand::Rng;

use crate::config::Config;
use crate::db::{self, User};
use crate::error::AppError;
use crate::state::AppState;

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_REVIEWER: &str = "REVIEWER";
pub const ROLE_SUPPLIER: &str = "SUPPLIER";

const TEMP_PASSWORD_LEN: usize = 12;
const TEMP_PASSWORD_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("password hashing failed: {e}")))
}

pub fn verify_password(hash: &str, password: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Temporary password handed out when an approval creates the supplier's
/// account; the user must change it on first login.
pub fn generate_temp_password() -> String {
    let mut rng = rand::thread_rng();
    (0..TEMP_PASSWORD_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..TEMP_PASSWORD_ALPHABET.len());
            TEMP_PASSWORD_ALPHABET[idx] as char
        })
        .collect()
}

pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}

pub async fn start_session(
    pool: &sqlx::PgPool,
    config: &Config,
    user: &User,
) -> Result<String, AppError> {
    if let Ok(purged) = db::accounts::delete_expired_sessions(pool).await {
        if purged > 0 {
            tracing::debug!("purged {purged} expired sessions");
        }
    }

    let token = generate_session_token();
    let expires_at = Utc::now() + Duration::hours(config.session_ttl_hours);
    db::accounts::insert_session(pool, &token, user.id, expires_at).await?;
    Ok(token)
}

/// Create the first admin account from the environment when the user table
/// has none, so a fresh deployment can be logged into.
pub async fn ensure_bootstrap_admin(pool: &sqlx::PgPool, config: &Config) -> Result<(), AppError> {
    let (Some(email), Some(password)) = (
        config.bootstrap_admin_email.as_deref(),
        config.bootstrap_admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    if db::accounts::any_admin_exists(pool).await? {
        return Ok(());
    }

    let hash = hash_password(password)?;
    db::accounts::insert_user(pool, email, "Portal Administrator", "", ROLE_ADMIN, &hash, false)
        .await?;
    tracing::info!("bootstrap admin account created for {email}");
    Ok(())
}

async fn user_from_bearer(parts: &Parts, state: &Arc<AppState>) -> Result<User, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthorized)?;
    let token = header.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;

    db::accounts::session_user(state.pool.as_ref(), token)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Any authenticated user.
pub struct AuthUser(pub User);

/// A back-office user (admin or reviewer).
pub struct StaffUser(pub User);

/// An approved supplier.
pub struct SupplierUser(pub User);

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        user_from_bearer(parts, state).await.map(AuthUser)
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = user_from_bearer(parts, state).await?;
        if user.is_staff() {
            Ok(StaffUser(user))
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for SupplierUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = user_from_bearer(parts, state).await?;
        if user.is_supplier() {
            Ok(SupplierUser(user))
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_password_shape() {
        let password = generate_temp_password();
        assert_eq!(password.len(), TEMP_PASSWORD_LEN);
        assert!(password
            .bytes()
            .all(|b| TEMP_PASSWORD_ALPHABET.contains(&b)));
    }

    #[test]
    fn session_tokens_are_unique_hex() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("correct horse").expect("hashing succeeds");
        assert!(verify_password(&hash, "correct horse"));
        assert!(!verify_password(&hash, "wrong horse"));
        assert!(!verify_password("not-a-phc-string", "anything"));
    }
}
