use std::io::ErrorKind;
use std::path::Path;

use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{FinancialSeries, GeneratorParams, SeriesSource};
use crate::services::dataset_cache::DatasetKey;
use crate::services::generator_service::generate_series;
use crate::services::spreadsheet_service::parse_series_file;

/// A series together with where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedSeries {
    pub source: SeriesSource,
    pub series: FinancialSeries,
}

/// Read the sample cache file (`.xlsx` or CSV); when it does not exist,
/// generate the sample instead.
///
/// Only `NotFound` falls through to generation. A file that exists but cannot
/// be read or parsed is an error, not a reason to silently substitute data.
pub fn resolve_sample_series(
    path: &Path,
    params: &GeneratorParams,
) -> Result<ResolvedSeries, AppError> {
    match std::fs::read(path) {
        Ok(content) => {
            let series = parse_series_file(&content)?;
            info!(
                "📂 Loaded {} quarters of sample data from {}",
                series.len(),
                path.display()
            );
            Ok(ResolvedSeries {
                source: SeriesSource::CacheFile {
                    path: path.to_path_buf(),
                },
                series,
            })
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(
                "No sample file at {}, generating {} quarters on the fly",
                path.display(),
                params.num_quarters
            );
            let series = generate_series(params)?;
            Ok(ResolvedSeries {
                source: SeriesSource::Generated { params: *params },
                series,
            })
        }
        Err(e) => {
            error!("Failed to read sample file {}: {}", path.display(), e);
            Err(AppError::FileReadFailure(format!("{}: {}", path.display(), e)))
        }
    }
}

/// Cache key for the sample file, stamped with its current modification time.
pub fn sample_cache_key(path: &Path) -> DatasetKey {
    DatasetKey::SampleFile {
        path: path.to_path_buf(),
        modified: std::fs::metadata(path).and_then(|m| m.modified()).ok(),
    }
}
