//! Per-page request tokens
//!
//! A nonce is bound to an action name and a time tick. Each tick lasts half
//! the configured lifetime, and a nonce verifies during the tick it was
//! issued in and the one after, so a page stays usable for at least half a
//! lifetime and at most a full one.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::time::Duration;

/// Action name the chat proxy binds its nonces to
pub const QUERY_ACTION: &str = "rag-chatbot-nonce";

const NONCE_LEN: usize = 10;

/// Age of a nonce that passed verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceAge {
    /// Issued during the current tick
    Fresh,
    /// Issued during the previous tick
    Aging,
}

/// Issues and verifies nonces with a process-wide secret
#[derive(Clone)]
pub struct NonceService {
    secret: Vec<u8>,
    lifetime: Duration,
}

impl std::fmt::Debug for NonceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceService")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl NonceService {
    pub fn new(secret: impl Into<Vec<u8>>, lifetime: Duration) -> Self {
        Self {
            secret: secret.into(),
            lifetime,
        }
    }

    /// Build a service keyed with 32 random bytes. Nonces do not survive a
    /// restart.
    pub fn with_random_secret(lifetime: Duration) -> Self {
        let mut secret = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        Self::new(secret, lifetime)
    }

    pub fn issue(&self, action: &str) -> String {
        self.issue_at(action, chrono::Utc::now().timestamp())
    }

    pub fn verify(&self, nonce: &str, action: &str) -> Option<NonceAge> {
        self.verify_at(nonce, action, chrono::Utc::now().timestamp())
    }

    fn issue_at(&self, action: &str, now: i64) -> String {
        self.token(self.tick(now), action)
    }

    fn verify_at(&self, nonce: &str, action: &str, now: i64) -> Option<NonceAge> {
        if nonce.is_empty() {
            return None;
        }
        let tick = self.tick(now);
        if constant_time_eq(nonce.as_bytes(), self.token(tick, action).as_bytes()) {
            return Some(NonceAge::Fresh);
        }
        let previous = self.token(tick.saturating_sub(1), action);
        if constant_time_eq(nonce.as_bytes(), previous.as_bytes()) {
            return Some(NonceAge::Aging);
        }
        None
    }

    fn tick(&self, now: i64) -> i64 {
        let half = i64::try_from(self.lifetime.as_secs() / 2).unwrap_or(i64::MAX).max(1);
        // Ceiling division, matching the host CMS tick arithmetic
        now.div_euclid(half) + i64::from(now.rem_euclid(half) != 0)
    }

    fn token(&self, tick: i64, action: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(tick.to_string().as_bytes());
        hasher.update(b"|");
        hasher.update(action.as_bytes());
        let encoded = URL_SAFE_NO_PAD.encode(hasher.finalize());
        encoded.chars().take(NONCE_LEN).collect()
    }
}

pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
