//! Short-lived result cache keyed by `"<category>-<query>"`.
//!
//! [`CacheStore`] is the seam the aggregator is generic over. Two stores are
//! provided:
//!
//! - [`MokaStore`], backed by [`moka`], used in production. Entries become
//!   invisible once their TTL elapses; there is no capacity bound.
//! - [`TtlStore`], a plain map of `(payload, stored_at)` pairs with lazy
//!   expiry-on-read against an injectable [`Clock`], so tests can step time
//!   deterministically.
//!
//! Neither store distinguishes "never cached" from "expired": both read as
//! absent.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

use moka::future::Cache;

use crate::types::ResultRecord;

/// A key → payload store with time-based staleness.
pub trait CacheStore: Send + Sync {
    /// Return the payload stored under `key` if present and unexpired.
    fn get(&self, key: &str) -> impl Future<Output = Option<Vec<ResultRecord>>> + Send;

    /// Store `payload` under `key`, overwriting any previous entry and
    /// stamping the current time.
    fn set(&self, key: String, payload: Vec<ResultRecord>) -> impl Future<Output = ()> + Send;
}

/// Process-wide store used by [`crate::search`].
///
/// Lazily initialised on first access. TTL is set when first created and
/// cannot be changed after initialisation.
static GLOBAL: OnceLock<MokaStore> = OnceLock::new();

/// Get or initialise the process-wide store.
///
/// The TTL is only used on the **first** call; subsequent calls share the
/// existing store regardless of the TTL argument.
pub fn global(ttl: Duration) -> MokaStore {
    GLOBAL.get_or_init(|| MokaStore::new(ttl)).clone()
}

// ── Moka-backed store ────────────────────────────────────────────────────

/// Production store on top of [`moka::future::Cache`].
///
/// Cloning is cheap and clones share the same underlying entries.
#[derive(Clone)]
pub struct MokaStore {
    inner: Cache<String, Vec<ResultRecord>>,
}

impl MokaStore {
    /// Create a store whose entries expire `ttl` after being written.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder().time_to_live(ttl).build(),
        }
    }
}

impl CacheStore for MokaStore {
    async fn get(&self, key: &str) -> Option<Vec<ResultRecord>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: String, payload: Vec<ResultRecord>) {
        self.inner.insert(key, payload).await;
    }
}

// ── Clock-driven store ───────────────────────────────────────────────────

/// Source of the current time for [`TtlStore`].
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    /// Start the clock at the current instant.
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<C: Clock> Clock for std::sync::Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

#[derive(Debug, Clone)]
struct Entry {
    payload: Vec<ResultRecord>,
    stored_at: Instant,
}

/// Map-backed store with lazy expiry against an injectable [`Clock`].
///
/// Expired entries are never removed; they are ignored on read and replaced
/// by the next `set` for the same key.
#[derive(Debug)]
pub struct TtlStore<C: Clock = SystemClock> {
    ttl: Duration,
    clock: C,
    entries: Mutex<HashMap<String, Entry>>,
}

impl TtlStore<SystemClock> {
    /// Create a store driven by the wall clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<C: Clock> TtlStore<C> {
    /// Create a store driven by `clock`.
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has ever been stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        // A poisoned map is still a consistent map: every write is a single insert.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lookup(&self, key: &str) -> Option<Vec<ResultRecord>> {
        let now = self.clock.now();
        let entries = self.lock();
        let entry = entries.get(key)?;
        if now.saturating_duration_since(entry.stored_at) < self.ttl {
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    fn store(&self, key: String, payload: Vec<ResultRecord>) {
        let stored_at = self.clock.now();
        self.lock().insert(key, Entry { payload, stored_at });
    }
}

impl<C: Clock> CacheStore for TtlStore<C> {
    async fn get(&self, key: &str) -> Option<Vec<ResultRecord>> {
        self.lookup(key)
    }

    async fn set(&self, key: String, payload: Vec<ResultRecord>) {
        self.store(key, payload);
    }
}

impl<S: CacheStore> CacheStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> impl Future<Output = Option<Vec<ResultRecord>>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: String, payload: Vec<ResultRecord>) -> impl Future<Output = ()> + Send {
        (**self).set(key, payload)
    }
}
