use tracing::debug;

use crate::errors::AppError;
use crate::models::{
    amount, ChartPoint, ChartSeries, DashboardCharts, FinancialRecord, FinancialSeries,
    HeadlineMetrics, RatioRow, ReferenceLine, SeriesSummary,
};

/// Share of current assets presumed to be inventory and excluded from the quick ratio.
pub const INVENTORY_SHARE: f64 = 0.3;

pub const HEALTHY_CURRENT_RATIO: f64 = 2.0;
pub const HEALTHY_QUICK_RATIO: f64 = 1.0;

/// Division that refuses zero (or non-finite) outcomes instead of producing inf/NaN.
pub fn checked_div(numerator: f64, denominator: f64) -> Result<f64, AppError> {
    if denominator == 0.0 {
        return Err(AppError::DivisionUndefined);
    }
    let value = numerator / denominator;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AppError::DivisionUndefined)
    }
}

/// Recover a zero-denominator locally: the cell becomes undefined, the row survives.
fn ratio(period: &str, name: &str, result: Result<f64, AppError>) -> Option<f64> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            debug!("{} undefined for {}: {}", name, period, e);
            None
        }
    }
}

fn percent(result: Result<f64, AppError>) -> Result<f64, AppError> {
    result.map(|v| v * 100.0)
}

pub fn compute_ratios(record: &FinancialRecord) -> RatioRow {
    let p = record.period.as_str();
    let revenue = amount(&record.revenue);
    let net_profit = amount(&record.net_profit);
    let total_assets = amount(&record.total_assets);
    let current_assets = amount(&record.current_assets);
    let current_liabilities = amount(&record.current_liabilities);
    let equity = amount(&record.equity);

    RatioRow {
        period: record.period.clone(),
        profit_margin: ratio(p, "profit_margin", percent(checked_div(net_profit, revenue))),
        return_on_assets: ratio(
            p,
            "return_on_assets",
            percent(checked_div(net_profit, total_assets)),
        ),
        return_on_equity: ratio(p, "return_on_equity", percent(checked_div(net_profit, equity))),
        current_ratio: ratio(
            p,
            "current_ratio",
            checked_div(current_assets, current_liabilities),
        ),
        quick_ratio: ratio(
            p,
            "quick_ratio",
            checked_div(
                current_assets - current_assets * INVENTORY_SHARE,
                current_liabilities,
            ),
        ),
        debt_to_equity: ratio(
            p,
            "debt_to_equity",
            checked_div(total_assets, equity).map(|v| v - 1.0),
        ),
    }
}

pub fn ratio_table(series: &FinancialSeries) -> Vec<RatioRow> {
    series.iter().map(compute_ratios).collect()
}

/// Percent change from `previous` to `latest`; `None` when `previous` is zero.
pub fn percent_change(latest: f64, previous: f64) -> Option<f64> {
    checked_div(latest - previous, previous).ok().map(|v| v * 100.0)
}

pub fn headline_metrics(series: &FinancialSeries) -> HeadlineMetrics {
    let latest = series.latest();
    let previous = series.previous();
    let latest_ratios = compute_ratios(latest);

    HeadlineMetrics {
        latest_period: latest.period.clone(),
        previous_period: previous.period.clone(),
        latest_revenue: latest.revenue.clone(),
        latest_net_profit: latest.net_profit.clone(),
        revenue_change_pct: percent_change(amount(&latest.revenue), amount(&previous.revenue)),
        net_profit_change_pct: percent_change(
            amount(&latest.net_profit),
            amount(&previous.net_profit),
        ),
        profit_margin: latest_ratios.profit_margin,
        return_on_equity: latest_ratios.return_on_equity,
    }
}

fn record_chart<F>(name: &str, series: &FinancialSeries, value: F) -> ChartSeries
where
    F: Fn(&FinancialRecord) -> f64,
{
    ChartSeries {
        name: name.to_string(),
        points: series
            .iter()
            .map(|r| ChartPoint {
                period: r.period.clone(),
                value: Some(value(r)),
            })
            .collect(),
        reference: None,
    }
}

fn ratio_chart<F>(name: &str, rows: &[RatioRow], value: F) -> ChartSeries
where
    F: Fn(&RatioRow) -> Option<f64>,
{
    ChartSeries {
        name: name.to_string(),
        points: rows
            .iter()
            .map(|r| ChartPoint {
                period: r.period.clone(),
                value: value(r),
            })
            .collect(),
        reference: None,
    }
}

fn healthy_level(value: f64) -> Option<ReferenceLine> {
    Some(ReferenceLine {
        value,
        label: "Healthy Level".to_string(),
    })
}

/// Chart-ready time series, grouped the way the dashboard tabs present them.
pub fn chart_series(series: &FinancialSeries, rows: &[RatioRow]) -> DashboardCharts {
    DashboardCharts {
        trends: vec![
            record_chart("Revenue", series, |r| amount(&r.revenue)),
            record_chart("Net Profit", series, |r| amount(&r.net_profit)),
            record_chart("Operating Expenses", series, |r| amount(&r.operating_expenses)),
        ],
        profitability: vec![
            ratio_chart("Profit Margin (%)", rows, |r| r.profit_margin),
            ratio_chart("ROA (%)", rows, |r| r.return_on_assets),
            ratio_chart("ROE (%)", rows, |r| r.return_on_equity),
        ],
        liquidity: vec![
            ChartSeries {
                reference: healthy_level(HEALTHY_CURRENT_RATIO),
                ..ratio_chart("Current Ratio", rows, |r| r.current_ratio)
            },
            ChartSeries {
                reference: healthy_level(HEALTHY_QUICK_RATIO),
                ..ratio_chart("Quick Ratio", rows, |r| r.quick_ratio)
            },
        ],
    }
}

pub fn summarize(series: &FinancialSeries) -> SeriesSummary {
    let n = series.len() as f64;
    let margins: Vec<f64> = series
        .iter()
        .filter_map(|r| checked_div(amount(&r.net_profit), amount(&r.revenue)).ok())
        .map(|m| m * 100.0)
        .collect();

    SeriesSummary {
        quarters: series.len(),
        average_revenue: series.iter().map(|r| amount(&r.revenue)).sum::<f64>() / n,
        average_net_profit: series.iter().map(|r| amount(&r.net_profit)).sum::<f64>() / n,
        average_profit_margin: if margins.is_empty() {
            None
        } else {
            Some(margins.iter().sum::<f64>() / margins.len() as f64)
        },
    }
}
