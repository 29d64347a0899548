//! Email/password authentication and HMAC-signed session tokens.
//!
//! Passwords are stored as `"{salt_hex}${sha256(salt || password)_hex}"`.
//! Session tokens are a colon-joined claim set signed with HMAC-SHA256:
//! `"{user_id}:{role}:{expires_rfc3339}:{hmac_hex}"`. Verification checks
//! the signature before the expiry. There is no refresh or revocation.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::path::Path;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

// ─── Password hashing ─────────────────────────────────────────────────────────

pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = salted_digest(&salt, password);
    format!("{}${}", hex::encode(salt), hex::encode(digest))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(expected) = hex::decode(digest_hex) else {
        return false;
    };
    salted_digest(&salt, password).as_slice() == expected.as_slice()
}

fn salted_digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

// ─── Session tokens ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub user_id: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

/// Sign a time-limited claim set for `user_id`.
pub fn issue_token(user_id: &str, role: &str, ttl_hours: i64, secret: &str) -> Result<String> {
    let expires_at = (Utc::now() + Duration::hours(ttl_hours)).to_rfc3339();
    let payload = format!("{user_id}:{role}:{expires_at}");
    let sig = sign(&payload, secret)?;
    Ok(format!("{payload}:{sig}"))
}

/// Verify signature and expiry; returns the claims on success.
pub fn verify_token(raw: &str, secret: &str) -> Result<SessionClaims> {
    // rsplitn: the expiry timestamp itself contains ':'.
    let mut parts = raw.rsplitn(2, ':');
    let sig_hex = parts.next().ok_or_else(|| anyhow!("malformed token"))?;
    let payload = parts.next().ok_or_else(|| anyhow!("malformed token"))?;

    let expected = sign(payload, secret)?;
    let sig = hex::decode(sig_hex).map_err(|_| anyhow!("invalid token signature hex"))?;
    let expected_bytes = hex::decode(&expected)?;
    if sig != expected_bytes {
        return Err(anyhow!("token signature invalid"));
    }

    let fields: Vec<&str> = payload.splitn(3, ':').collect();
    if fields.len() != 3 {
        return Err(anyhow!("malformed token payload"));
    }
    let expires_at = DateTime::parse_from_rfc3339(fields[2])
        .map_err(|_| anyhow!("invalid token expiry timestamp"))?
        .with_timezone(&Utc);
    if expires_at <= Utc::now() {
        return Err(anyhow!("token expired"));
    }

    Ok(SessionClaims {
        user_id: fields[0].to_string(),
        role: fields[1].to_string(),
        expires_at,
    })
}

/// Extract the token from a `Bearer <token>` authorization header value.
pub fn strip_bearer(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ")
}

fn sign(payload: &str, secret: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

// ─── Secret persistence ───────────────────────────────────────────────────────

/// Return the signing secret for this daemon instance.
///
/// On first call, generates a random 32-character hex secret and writes it to
/// `{data_dir}/auth_secret` with user-only permissions (mode 0600 on Unix).
/// On subsequent calls, reads and returns the existing secret.
pub fn get_or_create_secret(data_dir: &Path) -> Result<String> {
    let path = data_dir.join("auth_secret");

    if path.exists() {
        let secret = std::fs::read_to_string(&path)?.trim().to_string();
        if !secret.is_empty() {
            return Ok(secret);
        }
    }

    let secret = Uuid::new_v4().to_string().replace('-', "");

    std::fs::create_dir_all(data_dir)?;
    std::fs::write(&path, &secret)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(secret)
}
