use std::path::PathBuf;

use bigdecimal::BigDecimal;
use serde::Serialize;

use super::{FinancialSeries, GeneratorParams};

/// Derived ratios for one quarter. `None` marks a ratio whose denominator was zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioRow {
    pub period: String,
    pub profit_margin: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineMetrics {
    pub latest_period: String,
    pub previous_period: String,
    pub latest_revenue: BigDecimal,
    pub latest_net_profit: BigDecimal,
    pub revenue_change_pct: Option<f64>,
    pub net_profit_change_pct: Option<f64>,
    pub profit_margin: Option<f64>,
    pub return_on_equity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub period: String,
    pub value: Option<f64>,
}

/// Horizontal guide drawn across a chart, e.g. a "healthy" liquidity level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<ChartPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCharts {
    pub trends: Vec<ChartSeries>,
    pub profitability: Vec<ChartSeries>,
    pub liquidity: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub quarters: usize,
    pub average_revenue: f64,
    pub average_net_profit: f64,
    pub average_profit_margin: Option<f64>,
}

/// Where a series was loaded from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesSource {
    CacheFile { path: PathBuf },
    Generated { params: GeneratorParams },
    Upload { content_hash: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub source: SeriesSource,
    pub headline: HeadlineMetrics,
    pub charts: DashboardCharts,
    pub ratios: Vec<RatioRow>,
    pub summary: SeriesSummary,
    pub records: FinancialSeries,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}
