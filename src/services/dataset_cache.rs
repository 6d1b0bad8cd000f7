use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::errors::AppError;
use crate::models::{FinancialSeries, GeneratorParams, SeriesSource};

/// What a cached dataset was loaded from.
///
/// Every input that can change the loaded data is part of the key, so a new
/// file mtime, new params or new upload bytes miss the cache instead of
/// returning stale data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DatasetKey {
    SampleFile {
        path: PathBuf,
        modified: Option<SystemTime>,
    },
    Generated(GeneratorParams),
    Upload {
        content_hash: String,
    },
}

#[derive(Debug, Clone)]
pub struct CachedDataset {
    pub source: SeriesSource,
    pub series: Arc<FinancialSeries>,
    pub loaded_at: DateTime<Utc>,
}

pub const DEFAULT_CAPACITY: usize = 64;

/// Memo cache for loaded or generated series, shared through app state.
///
/// Holds at most `capacity` datasets; the one loaded longest ago is evicted
/// first. Only the newest version of each sample file is kept.
#[derive(Clone)]
pub struct DatasetCache {
    entries: Arc<DashMap<DatasetKey, CachedDataset>>,
    capacity: usize,
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Return the entry for `key`, running `load` only on a miss.
    /// A failed load leaves the cache untouched.
    pub fn get_or_try_load<F>(&self, key: DatasetKey, load: F) -> Result<CachedDataset, AppError>
    where
        F: FnOnce() -> Result<(SeriesSource, FinancialSeries), AppError>,
    {
        if let Some(entry) = self.entries.get(&key) {
            debug!("Dataset cache hit for {:?}", key);
            return Ok(entry.value().clone());
        }

        let (source, series) = load()?;
        let dataset = CachedDataset {
            source,
            series: Arc::new(series),
            loaded_at: Utc::now(),
        };
        self.insert(key, dataset.clone());
        Ok(dataset)
    }

    fn insert(&self, key: DatasetKey, dataset: CachedDataset) {
        // a new mtime supersedes every older load of the same file
        if let DatasetKey::SampleFile { path, .. } = &key {
            self.entries.retain(|k, _| match k {
                DatasetKey::SampleFile { path: cached, .. } => cached != path,
                _ => true,
            });
        }

        while self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().loaded_at)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(old) => {
                    debug!("Dataset cache full, evicting {:?}", old);
                    self.entries.remove(&old);
                }
                None => break,
            }
        }

        self.entries.insert(key, dataset);
    }

    pub fn invalidate(&self, key: &DatasetKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// SHA-256 of the raw upload bytes.
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}
