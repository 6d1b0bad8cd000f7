use std::path::Path;

use tracing::info;

use crate::errors::AppError;
use crate::models::{DashboardResponse, FinancialSeries, GeneratorParams, SeriesSource};
use crate::services::dataset_cache::{content_hash, CachedDataset, DatasetCache, DatasetKey};
use crate::services::generator_service::generate_series;
use crate::services::ratio_service;
use crate::services::sample_data_service::{resolve_sample_series, sample_cache_key};
use crate::services::spreadsheet_service::parse_series_file;

/// Assemble everything the dashboard shows. Derived values are recomputed on every call.
pub fn build_dashboard(source: SeriesSource, series: &FinancialSeries) -> DashboardResponse {
    let ratios = ratio_service::ratio_table(series);
    let charts = ratio_service::chart_series(series, &ratios);

    DashboardResponse {
        source,
        headline: ratio_service::headline_metrics(series),
        charts,
        ratios,
        summary: ratio_service::summarize(series),
        records: series.clone(),
    }
}

pub fn load_sample(
    cache: &DatasetCache,
    path: &Path,
    params: &GeneratorParams,
) -> Result<CachedDataset, AppError> {
    cache.get_or_try_load(sample_cache_key(path), || {
        let resolved = resolve_sample_series(path, params)?;
        Ok((resolved.source, resolved.series))
    })
}

pub fn load_generated(
    cache: &DatasetCache,
    params: &GeneratorParams,
) -> Result<CachedDataset, AppError> {
    cache.get_or_try_load(DatasetKey::Generated(*params), || {
        info!(
            "Generating {} quarters from {} with seed {}",
            params.num_quarters, params.start_year, params.seed
        );
        let series = generate_series(params)?;
        Ok((SeriesSource::Generated { params: *params }, series))
    })
}

pub fn load_upload(cache: &DatasetCache, content: &[u8]) -> Result<CachedDataset, AppError> {
    if content.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::FileReadFailure("uploaded file is empty".to_string()));
    }

    let hash = content_hash(content);
    cache.get_or_try_load(
        DatasetKey::Upload {
            content_hash: hash.clone(),
        },
        || {
            let series = parse_series_file(content)?;
            info!("📥 Parsed upload {} with {} quarters", &hash[..12], series.len());
            Ok((SeriesSource::Upload { content_hash: hash.clone() }, series))
        },
    )
}
