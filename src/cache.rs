use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Source of the current time for expiry decisions.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Used to simulate expiry in tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[derive(Debug, Clone)]
struct StoredEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// In-memory key/value store where every entry carries an absolute expiry.
///
/// Expired entries are dropped lazily by the lookup that finds them; nothing
/// runs in the background. The check-and-remove in [`TtlCache::get`] and the
/// insert in [`TtlCache::set`] happen under the same lock, so an expired read
/// can never delete a value that a concurrent `set` just stored.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, StoredEntry<V>>>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Stores a value with a time-to-live. A zero or negative TTL stores nothing.
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub fn set(&self, key: &str, value: V, ttl: TimeDelta) {
        if ttl <= TimeDelta::zero() {
            tracing::debug!("Non-positive TTL, not caching");
            return;
        }
        let Some(expires_at) = self.clock.now().checked_add_signed(ttl) else {
            tracing::debug!("TTL overflow, not caching");
            return;
        };

        self.entries
            .lock()
            .insert(key.to_string(), StoredEntry { value, expires_at });
    }

    /// Retrieves a value if it exists and has not expired.
    /// An entry whose expiry is at or before now is removed and reported as a miss.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        match entries.get(key) {
            Some(entry) if now < entry.expires_at => {
                tracing::debug!("Key found and still fresh");
                Some(entry.value.clone())
            }
            Some(_) => {
                tracing::debug!("Key found but expired");
                entries.remove(key);
                None
            }
            None => {
                tracing::debug!("Key not found");
                None
            }
        }
    }

    /// Number of stored entries, including expired ones not yet looked up.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
