use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use csv::WriterBuilder;
use rust_xlsxwriter::Workbook;

use crate::errors::AppError;
use crate::models::{amount, FinancialSeries};
use crate::services::csv_import_service::{
    parse_series_csv, REQUIRED_COLUMNS, TOTAL_LIABILITIES_COLUMN,
};

pub const SHEET_NAME: &str = "Financial Data";

/// Local file header of a zip archive, which every `.xlsx` workbook is.
const XLSX_MAGIC: &[u8] = b"PK\x03\x04";
/// Compound document header used by legacy `.xls` workbooks.
const XLS_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

pub fn is_xlsx(content: &[u8]) -> bool {
    content.starts_with(XLSX_MAGIC)
}

/// Parse an upload or sample file, telling workbooks from CSV by their leading bytes.
pub fn parse_series_file(content: &[u8]) -> Result<FinancialSeries, AppError> {
    if is_xlsx(content) {
        parse_series_xlsx(content)
    } else if content.starts_with(XLS_MAGIC) {
        Err(AppError::FileReadFailure(
            "legacy .xls workbooks are not supported, save as .xlsx or .csv".to_string(),
        ))
    } else {
        parse_series_csv(content)
    }
}

/// Read the first worksheet of an `.xlsx` workbook.
///
/// Cells are flattened to CSV text and handed to the CSV parser, so both
/// formats share one header check and one set of row errors.
pub fn parse_series_xlsx(content: &[u8]) -> Result<FinancialSeries, AppError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(content))
        .map_err(|e| AppError::FileReadFailure(format!("Invalid workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::FileReadFailure("workbook has no sheets".to_string()))?
        .map_err(|e| AppError::FileReadFailure(format!("Invalid worksheet: {}", e)))?;

    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    for (row_num, row) in range.rows().enumerate() {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let fields = row
            .iter()
            .map(cell_text)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::FileReadFailure(format!("Row {}: {}", row_num + 1, e)))?;
        writer.write_record(&fields)?;
    }

    let csv = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush worksheet rows: {}", e)))?;
    parse_series_csv(&csv)
}

fn cell_text(cell: &Data) -> Result<String, String> {
    match cell {
        Data::Empty => Ok(String::new()),
        Data::String(s) => Ok(s.clone()),
        Data::Int(i) => Ok(i.to_string()),
        Data::Float(f) => Ok(f.to_string()),
        Data::Bool(b) => Ok(b.to_string()),
        Data::Error(e) => Err(format!("cell error {:?}", e)),
        other => Ok(other.to_string()),
    }
}

/// Render a series as a single-sheet workbook in the upload layout.
pub fn series_to_xlsx(series: &FinancialSeries) -> Result<Vec<u8>, AppError> {
    let mut workbook = build_workbook(series)?;
    workbook
        .save_to_buffer()
        .map_err(|e| AppError::Internal(format!("Failed to build workbook: {}", e)))
}

pub fn write_series_xlsx(path: &Path, series: &FinancialSeries) -> Result<(), AppError> {
    let mut workbook = build_workbook(series)?;
    workbook
        .save(path)
        .map_err(|e| AppError::Internal(format!("Failed to write {}: {}", path.display(), e)))
}

fn build_workbook(series: &FinancialSeries) -> Result<Workbook, AppError> {
    let xlsx_err = |e: rust_xlsxwriter::XlsxError| AppError::Internal(e.to_string());

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME).map_err(xlsx_err)?;

    let header = REQUIRED_COLUMNS
        .iter()
        .copied()
        .chain(std::iter::once(TOTAL_LIABILITIES_COLUMN));
    for (col, name) in header.enumerate() {
        sheet.write_string(0, col as u16, name).map_err(xlsx_err)?;
    }

    for (i, r) in series.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &r.period).map_err(xlsx_err)?;
        let amounts = [
            &r.revenue,
            &r.operating_expenses,
            &r.net_profit,
            &r.total_assets,
            &r.current_assets,
            &r.current_liabilities,
            &r.equity,
            &r.total_liabilities,
        ];
        for (col, value) in amounts.into_iter().enumerate() {
            sheet
                .write_number(row, col as u16 + 1, amount(value))
                .map_err(xlsx_err)?;
        }
    }

    Ok(workbook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeneratorParams;
    use crate::services::generator_service::generate_series;

    fn sheet_bytes(rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell.parse::<f64>() {
                    Ok(n) => sheet.write_number(r as u32, c as u16, n).unwrap(),
                    Err(_) => sheet.write_string(r as u32, c as u16, *cell).unwrap(),
                };
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_generated_workbook_reads_back_exactly() {
        let series = generate_series(&GeneratorParams::default()).unwrap();
        let bytes = series_to_xlsx(&series).unwrap();

        assert!(is_xlsx(&bytes));
        assert_eq!(parse_series_file(&bytes).unwrap(), series);
    }

    #[test]
    fn test_workbook_without_total_liabilities() {
        let bytes = sheet_bytes(&[
            &REQUIRED_COLUMNS,
            &["Q1 2024", "1000", "650", "210", "3000", "1200", "600", "1500.5"],
        ]);
        let series = parse_series_xlsx(&bytes).unwrap();

        let r = series.latest();
        assert_eq!(r.period, "Q1 2024");
        assert_eq!(r.equity.to_string(), "1500.5");
        assert_eq!(r.total_liabilities.to_string(), "1499.5");
    }

    #[test]
    fn test_workbook_missing_columns() {
        let bytes = sheet_bytes(&[&["Quarter", "Revenue"], &["Q1 2024", "1000"]]);
        match parse_series_file(&bytes) {
            Err(AppError::MissingColumns(cols)) => assert_eq!(cols.len(), 6),
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_workbook_is_read_failure() {
        let mut bytes = b"PK\x03\x04".to_vec();
        bytes.extend_from_slice(&[0u8; 64]);
        assert!(matches!(
            parse_series_file(&bytes),
            Err(AppError::FileReadFailure(_))
        ));
    }

    #[test]
    fn test_legacy_xls_rejected() {
        let mut bytes = XLS_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 32]);
        assert!(matches!(
            parse_series_file(&bytes),
            Err(AppError::FileReadFailure(_))
        ));
    }

    #[test]
    fn test_csv_still_dispatched_to_csv_parser() {
        let csv = format!(
            "{}\nQ1 2024,1000,650,210,3000,1200,600,1500\n",
            REQUIRED_COLUMNS.join(",")
        );
        assert!(!is_xlsx(csv.as_bytes()));
        assert_eq!(parse_series_file(csv.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn test_write_series_xlsx_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("financial_data.xlsx");
        let series = generate_series(&GeneratorParams::default()).unwrap();

        write_series_xlsx(&path, &series).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(parse_series_file(&bytes).unwrap(), series);
    }
}
