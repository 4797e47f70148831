//! Disk-backed session cache.
//!
//! The store is one JSON object: a reserved `__cache__` key holding the epoch
//! millisecond of the last sweep, and one key per [`CacheKey`] mapping to a
//! [`CacheEntry`]. Every access loads and rewrites the whole file. There is no
//! cross-process locking; concurrent writers race and the last one wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data::{CacheConfig, CacheEntry, CacheKey, Session};
use crate::error::CacheError;

/// Added to `now` before comparing with the last sweep time.
///
/// The comparison `now + SWEEP_OFFSET_MS > last_sweep` holds on almost every
/// write once a sweep has happened, so in practice every write sweeps.
const SWEEP_OFFSET_MS: u64 = 100_000;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheStore {
    #[serde(rename = "__cache__", default, skip_serializing_if = "Option::is_none")]
    last_sweep: Option<u64>,
    #[serde(flatten)]
    entries:    BTreeMap<String, CacheEntry>,
}

impl CacheStore {
    fn fresh(now: u64) -> Self {
        Self {
            last_sweep: Some(now),
            entries:    BTreeMap::new(),
        }
    }

    fn sweep_due(&self, now: u64) -> bool {
        self.last_sweep
            .is_some_and(|last| now.saturating_add(SWEEP_OFFSET_MS) > last)
    }

    fn sweep(&mut self, now: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        self.last_sweep = Some(now);
        before - self.entries.len()
    }
}

#[derive(Debug, Clone)]
pub struct SessionCache {
    path: PathBuf,
    ttl:  Duration,
}

impl SessionCache {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
        }
    }

    /// `None` when caching is disabled.
    pub fn from_config(config: &CacheConfig) -> Option<Self> {
        match config {
            CacheConfig::Enabled { ttl_secs, path } => {
                Some(Self::new(path.clone(), Duration::from_secs(*ttl_secs)))
            }
            CacheConfig::Disabled => None,
        }
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn ttl(&self) -> Duration { self.ttl }

    /// Look up an unexpired entry.
    ///
    /// An expired entry is removed from the store before reporting a miss. A
    /// missing or unreadable store is rewritten empty and also reported as a
    /// miss.
    pub fn read(&self, key: &CacheKey) -> Option<CacheEntry> { self.read_at(key, now_millis()) }

    /// Store `session` under `key`, expiring `ttl` from now.
    pub fn write(&self, key: &CacheKey, session: &Session) -> Result<CacheEntry, CacheError> {
        self.write_at(key, session, now_millis())
    }

    /// Drop every expired entry and stamp the sweep time. Returns how many
    /// entries were removed.
    pub fn clean(&self) -> Result<usize, CacheError> { self.clean_at(now_millis()) }

    fn read_at(&self, key: &CacheKey, now: u64) -> Option<CacheEntry> {
        let mut store = match self.load() {
            Ok(Some(store)) => store,
            Ok(None) => {
                debug!(path = %self.path.display(), "session cache absent, initializing");
                self.reinitialize(now);
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "session cache unreadable, reinitializing");
                self.reinitialize(now);
                return None;
            }
        };

        let entry = store.entries.get(key.as_str())?;
        if entry.is_fresh_at(now) {
            debug!(key = %key, "session cache hit");
            return Some(entry.clone());
        }

        debug!(key = %key, "session cache entry expired");
        store.entries.remove(key.as_str());
        if let Err(e) = self.persist(&store) {
            warn!(path = %self.path.display(), error = %e, "failed to drop expired session");
        }
        None
    }

    fn write_at(&self, key: &CacheKey, session: &Session, now: u64) -> Result<CacheEntry, CacheError> {
        let mut store = match self.load() {
            Ok(Some(store)) => store,
            Ok(None) => CacheStore::fresh(now),
            Err(CacheError::Decode(e)) => {
                warn!(path = %self.path.display(), error = %e, "session cache corrupt, starting over");
                CacheStore::fresh(now)
            }
            Err(e) => return Err(e),
        };

        let ttl_ms = u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX);
        let entry = CacheEntry {
            token:       session.token.clone(),
            storage_url: session.storage_url.clone(),
            expires_at:  now.saturating_add(ttl_ms),
        };
        store.entries.insert(key.as_str().to_string(), entry.clone());

        if store.sweep_due(now) {
            let purged = store.sweep(now);
            debug!(purged, "swept session cache");
        }

        self.persist(&store)?;
        Ok(entry)
    }

    fn clean_at(&self, now: u64) -> Result<usize, CacheError> {
        let mut store = match self.load() {
            Ok(Some(store)) => store,
            Ok(None) | Err(CacheError::Decode(_)) => CacheStore::default(),
            Err(e) => return Err(e),
        };
        let purged = store.sweep(now);
        self.persist(&store)?;
        Ok(purged)
    }

    fn load(&self) -> Result<Option<CacheStore>, CacheError> {
        match swift_fs::read_optional(&self.path)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn persist(&self, store: &CacheStore) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec_pretty(store)?;
        let options = swift_fs::Options::new().permissions(0o600).sync(true);
        swift_fs::atomic_write(&self.path, &bytes, options)?;
        Ok(())
    }

    fn reinitialize(&self, now: u64) {
        if let Err(e) = self.persist(&CacheStore::fresh(now)) {
            warn!(path = %self.path.display(), error = %e, "failed to reinitialize session cache");
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
