//! In-memory one-time password store.
//!
//! At most one live code per email; a new request overwrites the previous
//! entry. Expiry is evaluated lazily at lookup time, and `consume` is the
//! serialization point for single-use semantics: under concurrent submissions
//! of the same valid code, exactly one caller wins and the loser observes
//! `NotFound`.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Clone, Debug)]
pub struct OtpEntry {
    pub code: String,
    pub expires_at: Instant,
}

/// Why a submitted code was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OtpConsumeError {
    NotFound,
    Expired,
    Mismatch,
}

pub struct OtpStore {
    ttl: Duration,
    entries: Mutex<HashMap<String, OtpEntry>>,
}

impl OtpStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Record a fresh code for `email`, replacing any previous entry.
    ///
    /// Entries whose expiry has passed are pruned on the way in so abandoned
    /// signups do not grow the map without bound.
    pub async fn put(&self, email: &str, code: String) {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            email.to_string(),
            OtpEntry {
                code,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Non-mutating lookup; expired entries are returned as-is, the caller
    /// decides how to treat them.
    pub async fn get(&self, email: &str) -> Option<OtpEntry> {
        let entries = self.entries.lock().await;
        entries.get(email).cloned()
    }

    /// Explicit invalidation.
    pub async fn remove(&self, email: &str) {
        let mut entries = self.entries.lock().await;
        entries.remove(email);
    }

    /// Validate and consume a code in one step.
    ///
    /// The entry is removed only on a successful match, so a wrong or
    /// expired submission does not invalidate the code that was mailed out.
    pub async fn consume(&self, email: &str, code: &str) -> Result<(), OtpConsumeError> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get(email).ok_or(OtpConsumeError::NotFound)?;

        if Instant::now() > entry.expires_at {
            return Err(OtpConsumeError::Expired);
        }

        if entry.code != code {
            return Err(OtpConsumeError::Mismatch);
        }

        entries.remove(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn put_then_get_returns_entry_with_full_ttl() {
        let store = OtpStore::new(Duration::from_secs(300));
        let before = Instant::now();
        store.put("alice@walchandsangli.ac.in", "123456".to_string()).await;

        let entry = store
            .get("alice@walchandsangli.ac.in")
            .await
            .expect("entry should exist");
        assert_eq!(entry.code, "123456");

        // `before` was taken before `put`, so the measured window is the full
        // TTL plus whatever time elapsed inside `put`.
        let remaining = entry.expires_at.duration_since(before);
        assert!(remaining >= Duration::from_secs(300));
        assert!(remaining <= Duration::from_secs(305));
    }

    #[tokio::test]
    async fn get_missing_email_is_none() {
        let store = OtpStore::new(Duration::from_secs(300));
        assert!(store.get("nobody@walchandsangli.ac.in").await.is_none());
    }

    #[tokio::test]
    async fn put_overwrites_previous_code() {
        let store = OtpStore::new(Duration::from_secs(300));
        store.put("carol@walchandsangli.ac.in", "111111".to_string()).await;
        store.put("carol@walchandsangli.ac.in", "222222".to_string()).await;

        // The first code is no longer usable, the second is.
        assert_eq!(
            store.consume("carol@walchandsangli.ac.in", "111111").await,
            Err(OtpConsumeError::Mismatch)
        );
        assert_eq!(
            store.consume("carol@walchandsangli.ac.in", "222222").await,
            Ok(())
        );
    }

    #[tokio::test]
    async fn consume_is_single_use() {
        let store = OtpStore::new(Duration::from_secs(300));
        store.put("alice@walchandsangli.ac.in", "123456".to_string()).await;

        assert_eq!(
            store.consume("alice@walchandsangli.ac.in", "123456").await,
            Ok(())
        );
        // Replay of the consumed code fails and the slot is empty.
        assert_eq!(
            store.consume("alice@walchandsangli.ac.in", "123456").await,
            Err(OtpConsumeError::NotFound)
        );
        assert!(store.get("alice@walchandsangli.ac.in").await.is_none());
    }

    #[tokio::test]
    async fn consume_rejects_wrong_code_and_keeps_entry() {
        let store = OtpStore::new(Duration::from_secs(300));
        store.put("bob@walchandsangli.ac.in", "654321".to_string()).await;

        assert_eq!(
            store.consume("bob@walchandsangli.ac.in", "000000").await,
            Err(OtpConsumeError::Mismatch)
        );
        // A mismatch must not burn the mailed code.
        assert_eq!(
            store.consume("bob@walchandsangli.ac.in", "654321").await,
            Ok(())
        );
    }

    #[tokio::test]
    async fn consume_rejects_expired_entry() {
        let store = OtpStore::new(Duration::from_millis(20));
        store.put("alice@walchandsangli.ac.in", "123456".to_string()).await;

        sleep(Duration::from_millis(40)).await;

        assert_eq!(
            store.consume("alice@walchandsangli.ac.in", "123456").await,
            Err(OtpConsumeError::Expired)
        );
        // Stale entries are not purged by lookups, only by a fresh put.
        assert!(store.get("alice@walchandsangli.ac.in").await.is_some());
    }

    #[tokio::test]
    async fn put_prunes_expired_entries() {
        let store = OtpStore::new(Duration::from_millis(20));
        store.put("alice@walchandsangli.ac.in", "123456".to_string()).await;

        sleep(Duration::from_millis(40)).await;

        store.put("bob@walchandsangli.ac.in", "654321".to_string()).await;
        assert!(store.get("alice@walchandsangli.ac.in").await.is_none());
        assert!(store.get("bob@walchandsangli.ac.in").await.is_some());
    }

    #[tokio::test]
    async fn remove_deletes_entry() {
        let store = OtpStore::new(Duration::from_secs(300));
        store.put("alice@walchandsangli.ac.in", "123456".to_string()).await;
        store.remove("alice@walchandsangli.ac.in").await;
        assert!(store.get("alice@walchandsangli.ac.in").await.is_none());
    }

    #[tokio::test]
    async fn concurrent_consume_has_exactly_one_winner() {
        use std::sync::Arc;

        let store = Arc::new(OtpStore::new(Duration::from_secs(300)));
        store.put("alice@walchandsangli.ac.in", "123456".to_string()).await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.consume("alice@walchandsangli.ac.in", "123456").await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.expect("task should not panic").is_ok() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
