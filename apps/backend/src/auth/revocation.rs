//! Revoked-token store backing logout.
//!
//! A token stays revoked until its own expiry; after that the signature check
//! rejects it anyway, so the entry is dead weight and the sweeper drops it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Revoke `token` until `expiry`.
    async fn revoke(&self, token: &str, expiry: OffsetDateTime);

    /// `true` while the token is revoked and `now <= expiry`.
    async fn is_revoked(&self, token: &str) -> bool;

    /// Drop entries past their expiry; returns how many were removed.
    async fn purge_expired(&self) -> usize;
}

/// Process-local store keyed by the SHA-256 of the token.
#[derive(Debug, Default)]
pub struct InMemoryRevocationStore {
    entries: DashMap<String, OffsetDateTime>,
}

fn token_key(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_revoked_at(&self, token: &str, now: OffsetDateTime) -> bool {
        self.entries
            .get(&token_key(token))
            .is_some_and(|expiry| now <= *expiry)
    }

    pub fn purge_expired_at(&self, now: OffsetDateTime) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, expiry| now <= *expiry);
        before.saturating_sub(self.entries.len())
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(&self, token: &str, expiry: OffsetDateTime) {
        self.entries
            .entry(token_key(token))
            .and_modify(|existing| {
                if expiry > *existing {
                    *existing = expiry;
                }
            })
            .or_insert(expiry);
    }

    async fn is_revoked(&self, token: &str) -> bool {
        self.is_revoked_at(token, OffsetDateTime::now_utc())
    }

    async fn purge_expired(&self) -> usize {
        self.purge_expired_at(OffsetDateTime::now_utc())
    }
}

/// Run `purge_expired` every `every` until the runtime shuts down.
pub fn spawn_sweeper(store: Arc<dyn RevocationStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // first tick fires immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = store.purge_expired().await;
            debug!(removed, "revocation sweep");
        }
    })
}
