//! Process-local lookup cache.
//!
//! Keyed by the normalized identifier. Entries expire after the TTL. A read
//! that finds an expired entry reports it as [`CacheLookup::Expired`] and
//! leaves it in place, so every lookup during a registry outage can fall
//! back to it until a successful lookup replaces it. No background sweep
//! runs; [`LookupCache::purge_expired`] exists for hosts that want one.
//!
//! Expiry uses `tokio::time::Instant`, so paused-clock tests can advance
//! past the TTL deterministically.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::Instant;

use crate::types::MappedDocumentRecord;

/// A cached lookup.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The record as mapped at lookup time.
    pub data: MappedDocumentRecord,
    /// Wall-clock insertion time.
    pub created_at: DateTime<Utc>,
    /// Wall-clock time after which the entry no longer counts as a hit.
    pub expires_at: DateTime<Utc>,
    deadline: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.deadline
    }
}

/// Result of a cache read.
#[derive(Debug, Clone)]
pub enum CacheLookup {
    /// Within its TTL.
    Fresh(CacheEntry),
    /// The entry is past its TTL. It stays stored as a fallback.
    Expired(CacheEntry),
    /// Nothing stored for the key.
    Miss,
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Entries currently stored, expired or not.
    pub entries: usize,
    /// Stored entries already past their TTL.
    pub expired: usize,
    /// Reads that found a fresh entry.
    pub hits: u64,
    /// Reads that found nothing or an expired entry.
    pub misses: u64,
    /// Lookups currently on the wire.
    pub in_flight: usize,
}

/// TTL cache of mapped records, shared by every lookup in a service.
#[derive(Debug)]
pub struct LookupCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LookupCache {
    /// Empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Configured entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read an entry. Expired entries count as misses. Counts hits and misses.
    pub fn lookup(&self, key: &str) -> CacheLookup {
        let now = Instant::now();
        let entries = self.entries.lock();
        match entries.get(key) {
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                CacheLookup::Miss
            }
            Some(entry) if entry.is_expired(now) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                CacheLookup::Expired(entry.clone())
            }
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                CacheLookup::Fresh(entry.clone())
            }
        }
    }

    /// Any stored entry, expired or not, without touching counters.
    pub fn peek(&self, key: &str) -> Option<CacheEntry> {
        self.entries.lock().get(key).cloned()
    }

    /// Store a record with a fresh TTL, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, data: MappedDocumentRecord) {
        let created_at = Utc::now();
        let expires_at = created_at
            + chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::zero());
        let entry = CacheEntry {
            data,
            created_at,
            expires_at,
            deadline: Instant::now() + self.ttl,
        };
        self.entries.lock().insert(key.into(), entry);
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Remove expired entries, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Counter snapshot. `in_flight` is filled by the service.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.lock();
        CacheStats {
            entries: entries.len(),
            expired: entries.values().filter(|e| e.is_expired(now)).count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            in_flight: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padron_core::{DocumentKind, EntityKind};

    fn record(number: &str) -> MappedDocumentRecord {
        MappedDocumentRecord {
            legal_name: "PEREZ QUISPE JUAN".into(),
            document_number: number.into(),
            identifier_kind: DocumentKind::Dni,
            entity_kind: EntityKind::NaturalPerson,
            status: String::new(),
            condition: String::new(),
            raw_address: String::new(),
            street_address: String::new(),
            formatted_address: String::new(),
            district: String::new(),
            province: String::new(),
            department: String::new(),
            ubigeo_code: None,
            is_withholding_agent: false,
            is_good_taxpayer: false,
            is_active: false,
            given_names: None,
            paternal_surname: None,
            maternal_surname: None,
            fetched_at: Utc::now(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_entry_is_a_hit() {
        let cache = LookupCache::new(Duration::from_secs(300));
        cache.insert("87654321", record("87654321"));
        assert!(matches!(cache.lookup("87654321"), CacheLookup::Fresh(_)));
        assert!(matches!(cache.lookup("12345678"), CacheLookup::Miss));
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_stays_until_replaced() {
        let cache = LookupCache::new(Duration::from_secs(300));
        cache.insert("87654321", record("87654321"));
        tokio::time::advance(Duration::from_secs(301)).await;
        assert_eq!(cache.stats().expired, 1);

        for _ in 0..2 {
            match cache.lookup("87654321") {
                CacheLookup::Expired(entry) => assert_eq!(entry.data.document_number, "87654321"),
                other => panic!("expected expired entry, got {other:?}"),
            }
        }
        let stats = cache.stats();
        assert_eq!((stats.entries, stats.misses, stats.hits), (1, 2, 0));

        cache.insert("87654321", record("87654321"));
        assert!(matches!(cache.lookup("87654321"), CacheLookup::Fresh(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn purge_removes_only_expired() {
        let cache = LookupCache::new(Duration::from_secs(60));
        cache.insert("87654321", record("87654321"));
        tokio::time::advance(Duration::from_secs(61)).await;
        cache.insert("12345678", record("12345678"));
        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.peek("12345678").is_some());
        assert!(cache.peek("87654321").is_none());
    }

    #[tokio::test]
    async fn expiry_timestamps_follow_ttl() {
        let cache = LookupCache::new(Duration::from_secs(300));
        cache.insert("87654321", record("87654321"));
        let entry = cache.peek("87654321").expect("stored");
        assert_eq!(
            entry.expires_at - entry.created_at,
            chrono::Duration::seconds(300)
        );
    }
}
