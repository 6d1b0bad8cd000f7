use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::dataset_cache::DatasetCache;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub dataset_cache: DatasetCache,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let dataset_cache = DatasetCache::with_capacity(config.dataset_cache_capacity);
        Self {
            config: Arc::new(config),
            dataset_cache,
        }
    }
}
