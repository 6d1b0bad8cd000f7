use std::f64::consts::PI;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::errors::AppError;
use crate::models::{FinancialRecord, FinancialSeries, GeneratorParams, Period};

pub const BASE_REVENUE: f64 = 1_000_000.0;
pub const GROWTH_RATE: f64 = 0.05;

/// One hundred years of quarters.
pub const MAX_NUM_QUARTERS: usize = 400;

/// Generate a synthetic quarterly series seeded from `params.seed`.
///
/// The same params always produce the same series.
pub fn generate_series(params: &GeneratorParams) -> Result<FinancialSeries, AppError> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    generate_series_with_rng(params, &mut rng)
}

/// Generate a series drawing from the supplied random stream.
///
/// Per quarter, draws happen in this order: revenue noise, expense share,
/// profit share, asset multiple, current-asset share, current-liability share,
/// total-liability share.
pub fn generate_series_with_rng<R: Rng>(
    params: &GeneratorParams,
    rng: &mut R,
) -> Result<FinancialSeries, AppError> {
    if params.num_quarters < 1 {
        return Err(AppError::InvalidInput(format!(
            "num_quarters must be at least 1, got {}",
            params.num_quarters
        )));
    }
    if params.num_quarters > MAX_NUM_QUARTERS {
        return Err(AppError::InvalidInput(format!(
            "num_quarters must be at most {}, got {}",
            MAX_NUM_QUARTERS, params.num_quarters
        )));
    }
    if Period::from_index(params.num_quarters - 1, params.start_year).is_none() {
        return Err(AppError::InvalidInput(format!(
            "start_year {} leaves no room for {} quarters",
            params.start_year, params.num_quarters
        )));
    }

    let records = (0..params.num_quarters)
        .map(|i| generate_quarter(i, params.start_year, rng))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Generated {} synthetic quarters from {} (seed {})",
        records.len(),
        params.start_year,
        params.seed
    );

    FinancialSeries::new(records)
}

fn generate_quarter<R: Rng>(
    index: usize,
    start_year: i32,
    rng: &mut R,
) -> Result<FinancialRecord, AppError> {
    let period = Period::from_index(index, start_year).ok_or_else(|| {
        AppError::InvalidInput(format!("quarter {} overflows year {}", index, start_year))
    })?;
    let i = index as f64;

    // 4-quarter cycle
    let seasonal_factor = 1.0 + 0.1 * (i * PI / 2.0).sin();
    let revenue = BASE_REVENUE
        * (1.0 + GROWTH_RATE).powi(index as i32)
        * seasonal_factor
        * rng.random_range(0.95..1.05);

    let operating_expenses = revenue * rng.random_range(0.60..0.70);
    let net_profit = (revenue - operating_expenses) * rng.random_range(0.60..0.75);

    let total_assets = revenue * rng.random_range(2.5..3.5);
    let current_assets = total_assets * rng.random_range(0.35..0.45);
    let current_liabilities = current_assets * rng.random_range(0.40..0.60);
    let total_liabilities = total_assets * rng.random_range(0.45..0.55);

    let total_assets = cents(total_assets)?;
    let total_liabilities = cents(total_liabilities)?;

    Ok(FinancialRecord {
        period: period.to_string(),
        revenue: cents(revenue)?,
        operating_expenses: cents(operating_expenses)?,
        net_profit: cents(net_profit)?,
        // exact decimal difference of two cent amounts
        equity: &total_assets - &total_liabilities,
        total_assets,
        current_assets: cents(current_assets)?,
        current_liabilities: cents(current_liabilities)?,
        total_liabilities,
    })
}

/// Round a generated amount to whole cents.
pub fn cents(value: f64) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(&format!("{:.2}", value)).map_err(|e| {
        AppError::Internal(format!("Generated amount {} is not a number: {}", value, e))
    })
}
