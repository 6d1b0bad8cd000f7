use std::path::Path;

use chrono::NaiveDate;
use csv::WriterBuilder;

use crate::errors::AppError;
use crate::models::{FinancialSeries, RatioRow};
use crate::services::csv_import_service::{REQUIRED_COLUMNS, TOTAL_LIABILITIES_COLUMN};

pub const RATIO_HEADERS: [&str; 7] = [
    "Quarter",
    "Profit Margin (%)",
    "ROA (%)",
    "ROE (%)",
    "Current Ratio",
    "Quick Ratio",
    "Debt to Equity",
];

pub const UNDEFINED_MARKER: &str = "undefined";

fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => UNDEFINED_MARKER.to_string(),
    }
}

/// Render the ratio summary as CSV: header row, then one row per quarter.
pub fn export_ratio_csv(rows: &[RatioRow]) -> Result<String, AppError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(RATIO_HEADERS)?;

    for row in rows {
        writer.write_record([
            row.period.clone(),
            format_ratio(row.profit_margin),
            format_ratio(row.return_on_assets),
            format_ratio(row.return_on_equity),
            format_ratio(row.current_ratio),
            format_ratio(row.quick_ratio),
            format_ratio(row.debt_to_equity),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush CSV export: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(e.to_string()))
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("financial_analysis_{}.csv", date.format("%Y%m%d"))
}

/// Write a series in the upload format (plus `Total_Liabilities`) so it can be
/// read back as sample data.
pub fn write_series_csv(path: &Path, series: &FinancialSeries) -> Result<(), AppError> {
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .map_err(|e| AppError::Internal(format!("Failed to write {}: {}", path.display(), e)))?;

    let mut header: Vec<&str> = REQUIRED_COLUMNS.to_vec();
    header.push(TOTAL_LIABILITIES_COLUMN);
    writer.write_record(&header)?;

    for r in series {
        writer.write_record([
            r.period.clone(),
            r.revenue.to_string(),
            r.operating_expenses.to_string(),
            r.net_profit.to_string(),
            r.total_assets.to_string(),
            r.current_assets.to_string(),
            r.current_liabilities.to_string(),
            r.equity.to_string(),
            r.total_liabilities.to_string(),
        ])?;
    }

    writer
        .flush()
        .map_err(|e| AppError::Internal(format!("Failed to write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(period: &str) -> RatioRow {
        RatioRow {
            period: period.to_string(),
            profit_margin: Some(10.0),
            return_on_assets: Some(3.3333333),
            return_on_equity: Some(6.666666),
            current_ratio: Some(2.126),
            quick_ratio: Some(1.4876),
            debt_to_equity: Some(1.0),
        }
    }

    #[test]
    fn test_export_header_and_formatting() {
        let csv = export_ratio_csv(&[row("Q1 2024")]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Quarter,Profit Margin (%),ROA (%),ROE (%),Current Ratio,Quick Ratio,Debt to Equity"
        );
        assert_eq!(lines[1], "Q1 2024,10.00,3.33,6.67,2.13,1.49,1.00");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_export_marks_undefined_cells() {
        let mut r = row("Q2 2024");
        r.current_ratio = None;
        r.quick_ratio = None;
        let csv = export_ratio_csv(&[r]).unwrap();
        assert!(csv.contains("Q2 2024,10.00,3.33,6.67,undefined,undefined,1.00"));
    }

    #[test]
    fn test_export_of_empty_table_is_header_only() {
        let csv = export_ratio_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_export_filename_embeds_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(export_filename(date), "financial_analysis_20260307.csv");
    }
}
