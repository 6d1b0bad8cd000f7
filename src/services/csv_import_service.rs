use std::str::FromStr;

use bigdecimal::BigDecimal;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{ColumnSpec, FinancialRecord, FinancialSeries};

pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Quarter",
    "Revenue",
    "Operating_Expenses",
    "Net_Profit",
    "Total_Assets",
    "Current_Assets",
    "Current_Liabilities",
    "Equity",
];

pub const TOTAL_LIABILITIES_COLUMN: &str = "Total_Liabilities";

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Quarter")]
    quarter: String,
    #[serde(rename = "Revenue")]
    revenue: String,
    #[serde(rename = "Operating_Expenses")]
    operating_expenses: String,
    #[serde(rename = "Net_Profit")]
    net_profit: String,
    #[serde(rename = "Total_Assets")]
    total_assets: String,
    #[serde(rename = "Current_Assets")]
    current_assets: String,
    #[serde(rename = "Current_Liabilities")]
    current_liabilities: String,
    #[serde(rename = "Total_Liabilities", default)]
    total_liabilities: Option<String>,
    #[serde(rename = "Equity")]
    equity: String,
}

/// Column help shown to users preparing an upload.
pub fn expected_format() -> Vec<ColumnSpec> {
    let required = |name, description| ColumnSpec {
        name,
        description,
        required: true,
    };

    vec![
        required("Quarter", "Period identifier (e.g., Q1 2024)"),
        required("Revenue", "Total revenue"),
        required("Operating_Expenses", "Operating costs"),
        required("Net_Profit", "Net profit after taxes"),
        required("Total_Assets", "Total company assets"),
        required("Current_Assets", "Short-term assets"),
        required("Current_Liabilities", "Short-term liabilities"),
        required("Equity", "Shareholders' equity"),
        ColumnSpec {
            name: TOTAL_LIABILITIES_COLUMN,
            description: "Total liabilities (derived as Total_Assets - Equity when absent)",
            required: false,
        },
    ]
}

fn parse_money_string(s: &str) -> Result<BigDecimal, String> {
    let cleaned = s
        .replace("$", "")
        .replace(",", "")
        .trim()
        .to_string();

    if cleaned.is_empty() || cleaned == "-" {
        return Ok(BigDecimal::from(0));
    }

    BigDecimal::from_str(&cleaned).map_err(|_| format!("Failed to parse amount: {}", s))
}

/// Parse an uploaded or cached CSV into a series, keeping file order.
///
/// The header row is checked before any data row is read so that a file
/// lacking required columns is reported as a whole, not row by row.
pub fn parse_series_csv(content: &[u8]) -> Result<FinancialSeries, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(content);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    for (line_num, result) in reader.deserialize::<CsvRow>().enumerate() {
        let line = line_num + 2;
        let row = result.map_err(|e| {
            AppError::FileReadFailure(format!("Line {}: Failed to parse CSV row: {}", line, e))
        })?;
        let record = to_record(row)
            .map_err(|e| AppError::FileReadFailure(format!("Line {}: {}", line, e)))?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(AppError::InvalidInput("file contains no data rows".to_string()));
    }

    FinancialSeries::new(records)
}

fn to_record(row: CsvRow) -> Result<FinancialRecord, String> {
    let total_assets = parse_money_string(&row.total_assets)?;
    let equity = parse_money_string(&row.equity)?;
    let total_liabilities = match row.total_liabilities.as_deref() {
        Some(raw) if !raw.trim().is_empty() => parse_money_string(raw)?,
        _ => &total_assets - &equity,
    };

    Ok(FinancialRecord {
        period: row.quarter,
        revenue: parse_money_string(&row.revenue)?,
        operating_expenses: parse_money_string(&row.operating_expenses)?,
        net_profit: parse_money_string(&row.net_profit)?,
        total_assets,
        current_assets: parse_money_string(&row.current_assets)?,
        current_liabilities: parse_money_string(&row.current_liabilities)?,
        total_liabilities,
        equity,
    })
}
