//! Anti-forgery tokens
//!
//! Tokens are an HMAC-SHA256 over the time tick, the action name and the
//! editor id, truncated to `TOKEN_BYTES`. A token stays valid for the tick it
//! was issued in and the one after, i.e. between half and one full lifetime.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::entities::EditorId;
use crate::error::DomainError;

type HmacSha256 = Hmac<Sha256>;

/// Action bound into tokens for the publish trigger
pub const PUBLISH_ACTION: &str = "post_to_facebook";

/// Default token lifetime: one day
pub const DEFAULT_LIFETIME_SECS: i64 = 24 * 60 * 60;

const TOKEN_BYTES: usize = 10;

pub struct NonceService {
    mac: HmacSha256,
    lifetime_secs: i64,
}

impl NonceService {
    pub fn new(secret: &str) -> Result<Self, DomainError> {
        Self::with_lifetime(secret, DEFAULT_LIFETIME_SECS)
    }

    pub fn with_lifetime(secret: &str, lifetime_secs: i64) -> Result<Self, DomainError> {
        if secret.is_empty() {
            return Err(DomainError::Validation(
                "nonce secret must not be empty".to_string(),
            ));
        }
        if lifetime_secs < 2 {
            return Err(DomainError::Validation(
                "nonce lifetime must be at least two seconds".to_string(),
            ));
        }
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| DomainError::Validation(format!("invalid nonce secret: {}", e)))?;
        Ok(Self { mac, lifetime_secs })
    }

    /// Issue a token for `action` on behalf of `editor`
    pub fn issue(&self, action: &str, editor: EditorId) -> String {
        self.issue_at(action, editor, Utc::now())
    }

    pub fn issue_at(&self, action: &str, editor: EditorId, now: DateTime<Utc>) -> String {
        let tag = self.tag(self.tick(now), action, editor);
        hex::encode(&tag[..TOKEN_BYTES])
    }

    /// Check a token against the current and the previous tick
    pub fn verify(&self, token: &str, action: &str, editor: EditorId) -> bool {
        self.verify_at(token, action, editor, Utc::now())
    }

    pub fn verify_at(
        &self,
        token: &str,
        action: &str,
        editor: EditorId,
        now: DateTime<Utc>,
    ) -> bool {
        let Ok(bytes) = hex::decode(token.trim()) else {
            return false;
        };
        if bytes.len() != TOKEN_BYTES {
            return false;
        }

        let tick = self.tick(now);
        [tick, tick - 1].into_iter().any(|t| {
            let mut mac = self.mac.clone();
            mac.update(message(t, action, editor).as_bytes());
            mac.verify_truncated_left(&bytes).is_ok()
        })
    }

    fn tick(&self, now: DateTime<Utc>) -> i64 {
        let half = self.lifetime_secs / 2;
        (now.timestamp() + half - 1).div_euclid(half)
    }

    fn tag(&self, tick: i64, action: &str, editor: EditorId) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(message(tick, action, editor).as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

fn message(tick: i64, action: &str, editor: EditorId) -> String {
    format!("{}|{}|{}", tick, action, editor)
}
