//! Bearer tokens and password hashing

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// User id
    pub sub: String,
    pub exp: usize,
}

/// Signs and checks HS256 user tokens
#[derive(Clone)]
pub struct TokenKeys {
    secret: String,
    ttl_minutes: i64,
}

impl TokenKeys {
    pub fn new(secret: impl Into<String>, ttl_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_minutes,
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<String, String> {
        let exp = (Utc::now() + Duration::minutes(self.ttl_minutes)).timestamp() as usize;
        let claims = UserClaims {
            sub: user_id.to_string(),
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|err| format!("Failed to sign user JWT: {}", err))
    }

    pub fn verify(&self, token: &str) -> Result<UserClaims, String> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<UserClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|decoded| decoded.claims)
        .map_err(|err| format!("Invalid user JWT: {}", err))
    }
}

/// Salted SHA-256, stored as `v1$salt$digest`
pub fn hash_password(password: &str) -> String {
    let mut salt = [0_u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();

    format!(
        "v1${}${}",
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(digest)
    )
}

pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    let mut parts = stored_hash.split('$');
    let (Some("v1"), Some(encoded_salt), Some(encoded_digest), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    let (Ok(salt), Ok(expected_digest)) = (
        URL_SAFE_NO_PAD.decode(encoded_salt),
        URL_SAFE_NO_PAD.decode(encoded_digest),
    ) else {
        return false;
    };

    let mut hasher = Sha256::new();
    hasher.update(&salt);
    hasher.update(password.as_bytes());
    expected_digest == hasher.finalize().as_slice()
}
