//! Cache backends for fetched JSON values.
//!
//! The client keys its cache by canonical URL. Two interchangeable
//! backends are provided: [`InMemoryCache`] for pure in-process caching
//! and [`FilesystemCache`] for caching that survives process restarts.
//!
//! Neither backend locks internally; the client serializes access to the
//! one it owns. A cached `Value::Null` is a confirmed "not found" and is
//! distinct from a miss.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use serde_json::Value;

/// Default entry capacity for the in-memory backend.
pub const DEFAULT_MAX_ENTRIES: usize = 100;
/// Default TTL for the in-memory backend.
pub const DEFAULT_MEMORY_TTL: Duration = Duration::from_secs(60);
/// Default TTL for the filesystem backend.
pub const DEFAULT_DISK_TTL: Duration = Duration::from_secs(3600);

const CACHE_FILE_EXT: &str = ".json";

/// Key/value store with TTL-based expiry.
///
/// Keys are canonical URL strings, values raw JSON. Entries past their TTL
/// are treated as absent. Enumeration, length and bulk-clear are
/// deliberately not part of the contract: the filesystem backend could
/// only honor them for its in-memory subset, and a partially correct
/// operation is worse than none.
pub trait Cache: Send {
    /// Returns the cached value for `key`, or `None` on a miss.
    fn get(&mut self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, replacing any previous entry.
    fn set(&mut self, key: &str, value: Value);

    /// Returns `true` if `key` has an unexpired entry.
    fn contains(&mut self, key: &str) -> bool;
}

struct Entry {
    value: Value,
    inserted: Instant,
    last_used: Instant,
}

/// Bounded, time-expiring in-process cache.
///
/// Lookups of entries older than the TTL miss even while the entry is
/// still resident; inserting beyond capacity evicts the least-recently
/// used entry.
///
/// # Example
///
/// ```rust
/// use lazylink::cache::{Cache, InMemoryCache};
/// use serde_json::json;
///
/// let mut cache = InMemoryCache::new();
/// cache.set("http://api.example/api/v2/x", json!({"id": 1}));
/// assert!(cache.contains("http://api.example/api/v2/x"));
/// ```
pub struct InMemoryCache {
    max_entries: usize,
    ttl: Duration,
    entries: HashMap<String, Entry>,
}

impl InMemoryCache {
    /// Creates a cache with the default capacity and TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_ENTRIES, DEFAULT_MEMORY_TTL)
    }

    /// Creates a cache with an explicit capacity and TTL.
    #[must_use]
    pub fn with_limits(max_entries: usize, ttl: Duration) -> Self {
        Self {
            max_entries: max_entries.max(1),
            ttl,
            entries: HashMap::new(),
        }
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache for InMemoryCache {
    fn get(&mut self, key: &str) -> Option<Value> {
        let expired = match self.entries.get_mut(key) {
            Some(entry) if entry.inserted.elapsed() < self.ttl => {
                entry.last_used = Instant::now();
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    fn set(&mut self, key: &str, value: Value) {
        if !self.entries.contains_key(key) && self.entries.len() >= self.max_entries {
            self.evict_lru();
        }
        let now = Instant::now();
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                inserted: now,
                last_used: now,
            },
        );
    }

    fn contains(&mut self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.inserted.elapsed() < self.ttl)
    }
}

/// Disk-persisted cache: an [`InMemoryCache`] layer plus one file per key.
///
/// The filename is the percent-encoded key with a `.json` extension; the
/// file body is the JSON value as received, and the filesystem
/// modification time carries the TTL. A corrupt or unreadable file is a
/// miss, never an error; the higher layer simply re-fetches. Eviction from
/// the memory layer leaves the file in place until its TTL runs out.
pub struct FilesystemCache {
    memory: InMemoryCache,
    cache_dir: PathBuf,
    ttl: Duration,
}

impl FilesystemCache {
    /// Creates a cache rooted at `cache_dir` with default limits,
    /// creating the directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(cache_dir: impl Into<PathBuf>) -> io::Result<Self> {
        Self::with_limits(cache_dir, DEFAULT_MAX_ENTRIES, DEFAULT_DISK_TTL)
    }

    /// Creates a cache with an explicit capacity and TTL.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn with_limits(
        cache_dir: impl Into<PathBuf>,
        max_entries: usize,
        ttl: Duration,
    ) -> io::Result<Self> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir)?;
        Ok(Self {
            memory: InMemoryCache::with_limits(max_entries, ttl),
            cache_dir,
            ttl,
        })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        let name = format!("{}{CACHE_FILE_EXT}", urlencoding::encode(key));
        self.cache_dir.join(name)
    }

    fn disk_fresh(&self, path: &Path) -> bool {
        let Ok(modified) = fs::metadata(path).and_then(|meta| meta.modified()) else {
            return false;
        };
        SystemTime::now()
            .duration_since(modified)
            .map_or(true, |age| age < self.ttl)
    }

    fn read_disk(&self, path: &Path) -> Option<Value> {
        if !self.disk_fresh(path) {
            return None;
        }
        let bytes = fs::read(path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

impl Cache for FilesystemCache {
    fn get(&mut self, key: &str) -> Option<Value> {
        if let Some(value) = self.memory.get(key) {
            return Some(value);
        }
        let value = self.read_disk(&self.file_path(key))?;
        self.memory.set(key, value.clone());
        Some(value)
    }

    fn set(&mut self, key: &str, value: Value) {
        let path = self.file_path(key);
        match serde_json::to_vec(&value) {
            Ok(bytes) => {
                if let Err(err) = fs::write(&path, bytes) {
                    tracing::warn!(path = %path.display(), %err, "could not persist cache entry");
                }
            }
            Err(err) => {
                tracing::warn!(key, %err, "could not serialize cache entry");
            }
        }
        self.memory.set(key, value);
    }

    fn contains(&mut self, key: &str) -> bool {
        self.memory.contains(key) || self.disk_fresh(&self.file_path(key))
    }
}
