//! Channel metadata cache.
//!
//! Maps a [`VideoKey`] to the metadata fetched for it, or to the fact that
//! the lookup failed. The file backing keeps the list layout earlier versions
//! of the tool wrote:
//!
//! ```json
//! [{"id": "dQw4w9WgXcQ", "data": {"author_name": "...", "author_url": "@handle"}},
//!  {"id": "aaaaaaaaaaa", "data": null}]
//! ```
//!
//! Lifecycle: [`JsonFileCache::load`] at the start of a run, `get`/`put`
//! during enrichment, [`MetadataStore::flush`] once at the end.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::models::VideoKey;
use crate::error::Result;

/// What is known about one key.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    /// Metadata fetched successfully
    Resolved(Value),
    /// A lookup was made and failed
    Unavailable,
}

impl CacheEntry {
    /// Metadata to assign to an aggregate, if any.
    pub fn metadata(&self) -> Option<&Value> {
        match self {
            CacheEntry::Resolved(value) => Some(value),
            CacheEntry::Unavailable => None,
        }
    }

    pub fn into_metadata(self) -> Option<Value> {
        match self {
            CacheEntry::Resolved(value) => Some(value),
            CacheEntry::Unavailable => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, CacheEntry::Resolved(_))
    }
}

impl From<Option<Value>> for CacheEntry {
    fn from(value: Option<Value>) -> Self {
        match value {
            Some(Value::Null) | None => CacheEntry::Unavailable,
            Some(value) => CacheEntry::Resolved(value),
        }
    }
}

/// Key/value store for channel metadata.
///
/// Implementations must allow `put` from several lookups at once.
pub trait MetadataStore: Send + Sync {
    fn get(&self, key: &VideoKey) -> Option<CacheEntry>;

    /// Stores `entry`, replacing any previous value for `key`.
    fn put(&self, key: &VideoKey, entry: CacheEntry);

    /// Persists the current contents. No-op for in-memory stores.
    fn flush(&self) -> Result<()>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Persisted item layout.
#[derive(Debug, Serialize, Deserialize)]
struct StoredItem {
    id: VideoKey,
    #[serde(default)]
    data: Option<Value>,
}

/// In-memory store, never persisted.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<BTreeMap<VideoKey, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the cache with entries.
    pub fn with_entries(entries: impl IntoIterator<Item = (VideoKey, CacheEntry)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }
}

impl MetadataStore for MemoryCache {
    fn get(&self, key: &VideoKey) -> Option<CacheEntry> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: &VideoKey, entry: CacheEntry) {
        self.entries.write().insert(key.clone(), entry);
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

/// Store backed by a JSON file, rewritten atomically on flush.
#[derive(Debug)]
pub struct JsonFileCache {
    path: PathBuf,
    entries: RwLock<BTreeMap<VideoKey, CacheEntry>>,
}

impl JsonFileCache {
    /// Loads the cache at `path`.
    ///
    /// A missing or unreadable file gives an empty cache. Items that don't
    /// have the `{"id", "data"}` shape are dropped.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        debug!(path = %path.display(), entries = entries.len(), "loaded metadata cache");
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn snapshot(&self) -> Vec<StoredItem> {
        self.entries
            .read()
            .iter()
            .map(|(key, entry)| StoredItem {
                id: key.clone(),
                data: entry.metadata().cloned(),
            })
            .collect()
    }
}

fn read_entries(path: &Path) -> BTreeMap<VideoKey, CacheEntry> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read cache, starting empty");
            return BTreeMap::new();
        }
    };

    let items: Vec<Value> = match serde_json::from_str(&content) {
        Ok(items) => items,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt cache, starting empty");
            return BTreeMap::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<StoredItem>(item).ok())
        .map(|item| (item.id, CacheEntry::from(item.data)))
        .collect()
}

impl MetadataStore for JsonFileCache {
    fn get(&self, key: &VideoKey) -> Option<CacheEntry> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: &VideoKey, entry: CacheEntry) {
        self.entries.write().insert(key.clone(), entry);
    }

    /// Writes to `<path>.tmp` and renames it over `path`.
    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let items = self.snapshot();
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &items)?;
        writer.flush()?;
        drop(writer);

        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), entries = items.len(), "flushed metadata cache");
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}
