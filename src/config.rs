use std::net::SocketAddr;
use std::path::PathBuf;

use crate::models::{GeneratorParams, Period};
use crate::services::dataset_cache::DEFAULT_CAPACITY;
use crate::services::generator_service::MAX_NUM_QUARTERS;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_SAMPLE_PATH: &str = "financial_data.xlsx";

/// Runtime settings, read once from the environment (and `.env`) at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub sample_data_path: PathBuf,
    pub sample_params: GeneratorParams,
    pub max_upload_bytes: usize,
    pub dataset_cache_capacity: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = GeneratorParams::default();

        let config = Self {
            bind_addr: env_or("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            sample_data_path: std::env::var("SAMPLE_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SAMPLE_PATH)),
            sample_params: GeneratorParams {
                num_quarters: env_or("SAMPLE_NUM_QUARTERS", defaults.num_quarters)?,
                start_year: env_or("SAMPLE_START_YEAR", defaults.start_year)?,
                seed: env_or("SAMPLE_SEED", defaults.seed)?,
            },
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            dataset_cache_capacity: env_or("DATASET_CACHE_CAPACITY", DEFAULT_CAPACITY)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let params = &self.sample_params;
        if params.num_quarters == 0 {
            return Err("SAMPLE_NUM_QUARTERS must be at least 1".to_string());
        }
        if params.num_quarters > MAX_NUM_QUARTERS {
            return Err(format!("SAMPLE_NUM_QUARTERS must be at most {}", MAX_NUM_QUARTERS));
        }
        if Period::from_index(params.num_quarters - 1, params.start_year).is_none() {
            return Err(format!(
                "SAMPLE_START_YEAR {} overflows after {} quarters",
                params.start_year, params.num_quarters
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err("MAX_UPLOAD_BYTES must be positive".to_string());
        }
        if self.dataset_cache_capacity == 0 {
            return Err("DATASET_CACHE_CAPACITY must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            sample_data_path: PathBuf::from(DEFAULT_SAMPLE_PATH),
            sample_params: GeneratorParams::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            dataset_cache_capacity: DEFAULT_CAPACITY,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("Invalid value for {}: {} ({})", key, raw, e)),
        Err(_) => Ok(default),
    }
}
