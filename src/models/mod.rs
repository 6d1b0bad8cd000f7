mod dashboard;
mod financial;
mod generator;

pub use dashboard::{
    ChartPoint, ChartSeries, ColumnSpec, DashboardCharts, DashboardResponse, HeadlineMetrics,
    RatioRow, ReferenceLine, SeriesSource, SeriesSummary,
};
pub use financial::{amount, FinancialRecord, FinancialSeries, Period};
pub use generator::GeneratorParams;
