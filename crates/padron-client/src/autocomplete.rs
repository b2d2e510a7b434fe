//! # Autocomplete Service
//!
//! Orchestrates registry lookups for form autocompletion.
//!
//! ## Lookup flow
//!
//! ```text
//! input ──validate──► cache ──fresh──► result (cached: true)
//!                       │
//!                       ├─ expired: kept until replaced, used as fallback
//!                       ▼
//!                 in-flight map ──present──► await shared future
//!                       │
//!                       ▼
//!          provider.fetch × (retries + 1), per-attempt timeout,
//!          linear backoff, 5xx/network only
//!                       │
//!           ok ─► map ─► cache insert ─► result
//!           transient failure ─► stale record? ─► result + warning
//!           other failure ─► error
//! ```
//!
//! ## Concurrency
//!
//! At most one network lookup per identifier is outstanding at any time.
//! The lookup future is wrapped in [`futures::future::Shared`], so a second
//! caller for the same identifier awaits the first caller's outcome instead
//! of issuing a request. The shared future is also [`Abortable`]:
//! [`AutocompleteService::cancel_request`] aborts it and every waiter
//! resolves with `CANCELLED`.
//!
//! The service is a cheap `Clone` over shared state. Construct one per
//! process at the composition root and pass it down; tests build fresh
//! instances for isolation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::future::{AbortHandle, Abortable, BoxFuture, FutureExt, Shared};
use padron_core::{clean_digits, Identifier};
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::cache::{CacheLookup, CacheStats, LookupCache};
use crate::config::{AutocompleteOptions, ClientConfig, ConfigError};
use crate::error::LookupError;
use crate::mapping::map_payload;
use crate::provider::{DocumentProvider, HttpDocumentProvider};
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::types::{AutocompleteResult, MappedDocumentRecord};

/// Warning attached when a stale cache entry stands in for a failed lookup.
pub const STALE_CACHE_WARNING: &str =
    "Servicio no disponible, se muestran datos almacenados en caché";

#[derive(Debug, Clone)]
struct Fetched {
    record: MappedDocumentRecord,
    warnings: Vec<String>,
    stale: bool,
}

type Outcome = Result<Fetched, LookupError>;
type SharedLookup = Shared<BoxFuture<'static, Outcome>>;
type InFlightMap = Mutex<HashMap<String, InFlight>>;

struct InFlight {
    id: u64,
    future: SharedLookup,
    abort: AbortHandle,
}

struct Inner {
    provider: Arc<dyn DocumentProvider>,
    cache: Arc<LookupCache>,
    in_flight: Arc<InFlightMap>,
    defaults: AutocompleteOptions,
    next_id: AtomicU64,
}

/// Registry lookup orchestrator.
#[derive(Clone)]
pub struct AutocompleteService {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for AutocompleteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutocompleteService")
            .field("defaults", &self.inner.defaults)
            .field("cache_ttl", &self.inner.cache.ttl())
            .field("in_flight", &self.inner.in_flight.lock().len())
            .finish()
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl AutocompleteService {
    /// Service over `provider`, with defaults and TTL taken from `config`.
    pub fn new(provider: Arc<dyn DocumentProvider>, config: &ClientConfig) -> Self {
        Self::with_options(provider, config.autocomplete_options(), config.cache_ttl())
    }

    /// Service with explicit per-call defaults and cache TTL.
    pub fn with_options(
        provider: Arc<dyn DocumentProvider>,
        defaults: AutocompleteOptions,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                cache: Arc::new(LookupCache::new(cache_ttl)),
                in_flight: Arc::new(Mutex::new(HashMap::new())),
                defaults,
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Service over the HTTP registry gateway described by `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let provider = HttpDocumentProvider::new(config)?;
        Ok(Self::new(Arc::new(provider), config))
    }

    /// Per-call defaults.
    pub fn defaults(&self) -> AutocompleteOptions {
        self.inner.defaults
    }

    /// Look up `input` with the service defaults.
    pub async fn autocomplete(&self, input: &str) -> AutocompleteResult {
        self.autocomplete_with(input, self.inner.defaults).await
    }

    /// Look up `input`. Never fails: every error becomes
    /// `AutocompleteResult { success: false, error, error_code }`.
    pub async fn autocomplete_with(
        &self,
        input: &str,
        options: AutocompleteOptions,
    ) -> AutocompleteResult {
        let started = Instant::now();

        let identifier = match Identifier::parse(input, options.kind) {
            Ok(identifier) => identifier,
            Err(e) => {
                tracing::debug!(input, code = e.code(), "identifier rejected before lookup");
                return AutocompleteResult::failure(&LookupError::from(e))
                    .timed(elapsed_ms(started));
            }
        };

        let mut stale = None;
        if options.use_cache {
            match self.inner.cache.lookup(identifier.as_str()) {
                CacheLookup::Fresh(entry) => {
                    tracing::debug!(identifier = identifier.as_str(), "cache hit");
                    return AutocompleteResult::success(entry.data, Vec::new(), true)
                        .timed(elapsed_ms(started));
                }
                CacheLookup::Expired(entry) => stale = Some(entry.data),
                CacheLookup::Miss => {}
            }
        }

        let lookup = self.join_or_start(identifier, options, stale);
        let result = match lookup.await {
            Ok(fetched) => {
                AutocompleteResult::success(fetched.record, fetched.warnings, fetched.stale)
            }
            Err(e) => AutocompleteResult::failure(&e),
        };
        result.timed(elapsed_ms(started))
    }

    /// The in-flight lookup for `identifier`, started if absent.
    fn join_or_start(
        &self,
        identifier: Identifier,
        options: AutocompleteOptions,
        stale: Option<MappedDocumentRecord>,
    ) -> SharedLookup {
        let key = identifier.as_str().to_string();
        let mut in_flight = self.inner.in_flight.lock();
        if let Some(existing) = in_flight.get(&key) {
            tracing::debug!(identifier = %key, "joining in-flight lookup");
            return existing.future.clone();
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let lookup = run_lookup(
            Arc::clone(&self.inner.provider),
            Arc::clone(&self.inner.cache),
            identifier,
            options,
            stale,
        );
        let (abortable, abort) = futures::future::abortable(lookup);
        let future = settle(
            abortable,
            Arc::downgrade(&self.inner.in_flight),
            key.clone(),
            id,
        )
        .boxed()
        .shared();

        in_flight.insert(
            key,
            InFlight {
                id,
                future: future.clone(),
                abort,
            },
        );
        future
    }

    /// Abort the in-flight lookup for `identifier`. Waiters resolve with
    /// `CANCELLED`; the next call starts a fresh request.
    ///
    /// Returns whether a lookup was pending.
    pub fn cancel_request(&self, identifier: &str) -> bool {
        let key = clean_digits(identifier);
        let removed = self.inner.in_flight.lock().remove(&key);
        match removed {
            Some(pending) => {
                pending.abort.abort();
                tracing::info!(identifier = %key, "lookup cancelled");
                true
            }
            None => false,
        }
    }

    /// Drop every cached record. In-flight lookups are unaffected.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
        tracing::debug!("lookup cache cleared");
    }

    /// Cache counters plus the number of lookups on the wire.
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            in_flight: self.inner.in_flight.lock().len(),
            ..self.inner.cache.stats()
        }
    }

    /// Drop expired cache entries now instead of on next read.
    pub fn purge_expired(&self) -> usize {
        self.inner.cache.purge_expired()
    }

    /// Warm the cache for `identifiers` concurrently. Individual failures
    /// are logged and skipped. Returns how many lookups succeeded.
    pub async fn preload_data<S: AsRef<str>>(&self, identifiers: &[S]) -> usize {
        let lookups = identifiers.iter().map(|id| self.autocomplete(id.as_ref()));
        let results = futures::future::join_all(lookups).await;
        let loaded = results.iter().filter(|r| r.success).count();
        for (id, result) in identifiers.iter().zip(&results) {
            if !result.success {
                tracing::debug!(
                    identifier = id.as_ref(),
                    code = result.error_code.as_deref().unwrap_or_default(),
                    "preload skipped"
                );
            }
        }
        tracing::info!(requested = identifiers.len(), loaded, "preload finished");
        loaded
    }
}

/// Resolve an aborted lookup as `Cancelled` and drop the in-flight entry.
/// The entry is only removed if it still belongs to this lookup.
async fn settle(
    lookup: Abortable<BoxFuture<'static, Outcome>>,
    in_flight: Weak<InFlightMap>,
    key: String,
    id: u64,
) -> Outcome {
    let outcome = lookup.await.unwrap_or(Err(LookupError::Cancelled));
    if let Some(map) = in_flight.upgrade() {
        let mut map = map.lock();
        if map.get(&key).map_or(false, |entry| entry.id == id) {
            map.remove(&key);
        }
    }
    outcome
}

fn run_lookup(
    provider: Arc<dyn DocumentProvider>,
    cache: Arc<LookupCache>,
    identifier: Identifier,
    options: AutocompleteOptions,
    stale: Option<MappedDocumentRecord>,
) -> BoxFuture<'static, Outcome> {
    async move {
        let started = Instant::now();
        let policy = RetryPolicy {
            retries: options.retries,
            delay: options.retry_delay,
            timeout: options.timeout,
        };

        let fetched =
            retry_with_backoff(identifier.as_str(), policy, || provider.fetch(&identifier)).await;
        match fetched.and_then(|payload| map_payload(payload, &identifier)) {
            Ok(mapped) => {
                cache.insert(identifier.as_str(), mapped.record.clone());
                tracing::info!(
                    identifier = identifier.as_str(),
                    kind = %identifier.kind(),
                    elapsed_ms = elapsed_ms(started),
                    warnings = mapped.warnings.len(),
                    "registry lookup completed"
                );
                Ok(Fetched {
                    record: mapped.record,
                    warnings: mapped.warnings,
                    stale: false,
                })
            }
            Err(e) if e.is_retryable() => {
                let fallback =
                    stale.or_else(|| cache.peek(identifier.as_str()).map(|entry| entry.data));
                match fallback {
                    Some(record) => {
                        tracing::warn!(
                            identifier = identifier.as_str(),
                            code = e.code(),
                            "service unavailable, returning cached data"
                        );
                        Ok(Fetched {
                            record,
                            warnings: vec![STALE_CACHE_WARNING.to_string()],
                            stale: true,
                        })
                    }
                    None => {
                        tracing::warn!(
                            identifier = identifier.as_str(),
                            code = e.code(),
                            elapsed_ms = elapsed_ms(started),
                            "registry lookup failed: {e}"
                        );
                        Err(e)
                    }
                }
            }
            Err(e) => {
                tracing::info!(
                    identifier = identifier.as_str(),
                    code = e.code(),
                    "registry lookup failed: {e}"
                );
                Err(e)
            }
        }
    }
    .boxed()
}
