//! End-to-end properties of the generate -> ratios -> export pipeline.

use std::str::FromStr;

use bigdecimal::BigDecimal;

use finboard_backend::errors::AppError;
use finboard_backend::models::{amount, FinancialRecord, FinancialSeries, GeneratorParams, Period};
use finboard_backend::services::csv_import_service::parse_series_csv;
use finboard_backend::services::export_service::export_ratio_csv;
use finboard_backend::services::generator_service::generate_series;
use finboard_backend::services::ratio_service::{compute_ratios, headline_metrics, ratio_table};

fn params(num_quarters: usize) -> GeneratorParams {
    GeneratorParams {
        num_quarters,
        ..GeneratorParams::default()
    }
}

fn money(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn record(revenue: &str, net_profit: &str) -> FinancialRecord {
    let revenue = money(revenue);
    let scaled = |factor: &str| &revenue * money(factor);
    FinancialRecord {
        period: "Q1 2024".to_string(),
        operating_expenses: scaled("0.62"),
        net_profit: money(net_profit),
        total_assets: scaled("2.8"),
        current_assets: scaled("1.1"),
        current_liabilities: scaled("0.5"),
        total_liabilities: scaled("1.4"),
        equity: scaled("1.4"),
        revenue: revenue.clone(),
    }
}

#[test]
fn test_generator_invariants_hold_for_many_lengths() {
    for n in 1..=30 {
        let series = generate_series(&params(n)).unwrap();
        assert_eq!(series.len(), n);

        let periods: Vec<Period> = series.iter().map(|r| r.period.parse().unwrap()).collect();
        assert!(periods.windows(2).all(|w| w[0] < w[1]), "periods out of order for n={}", n);

        for r in &series {
            assert_eq!(r.equity, &r.total_assets - &r.total_liabilities);
            assert_eq!(r.equity.with_scale(2), r.equity);
            let expense_share = amount(&r.operating_expenses) / amount(&r.revenue);
            assert!((0.59..=0.71).contains(&expense_share));
            let asset_multiple = amount(&r.total_assets) / amount(&r.revenue);
            assert!((2.49..=3.51).contains(&asset_multiple));
        }
    }
}

#[test]
fn test_generator_is_deterministic() {
    let a = generate_series(&params(16)).unwrap();
    let b = generate_series(&params(16)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_generator_rejects_zero_quarters() {
    assert!(matches!(
        generate_series(&params(0)),
        Err(AppError::InvalidInput(_))
    ));
}

#[test]
fn test_generator_rejects_year_overflow() {
    let late = GeneratorParams {
        start_year: i32::MAX - 1,
        ..params(12)
    };
    assert!(matches!(generate_series(&late), Err(AppError::InvalidInput(_))));
}

#[test]
fn test_generated_ratios_are_all_defined() {
    let series = generate_series(&params(12)).unwrap();
    for row in ratio_table(&series) {
        assert!(row.profit_margin.is_some());
        assert!(row.return_on_assets.is_some());
        assert!(row.return_on_equity.is_some());
        assert!(row.current_ratio.unwrap() > 1.0);
        assert!(row.quick_ratio.is_some());
        assert!(row.debt_to_equity.unwrap() > 0.0);
    }
}

#[test]
fn test_profit_margin_of_ten_percent() {
    let row = compute_ratios(&record("1000000", "100000"));
    assert_eq!(format!("{:.2}", row.profit_margin.unwrap()), "10.00");
}

#[test]
fn test_zero_current_liabilities_does_not_crash() {
    let mut r = record("1000000", "100000");
    r.current_liabilities = money("0");
    let row = compute_ratios(&r);
    assert_eq!(row.current_ratio, None);
}

#[test]
fn test_headline_revenue_change() {
    let series = FinancialSeries::new(vec![record("100", "10"), record("110", "12")]).unwrap();
    let headline = headline_metrics(&series);
    assert_eq!(format!("{:+.1}%", headline.revenue_change_pct.unwrap()), "+10.0%");
}

#[test]
fn test_export_round_trips_ratio_values() {
    let source = record("1234567.89", "145678.12");
    let row = compute_ratios(&source);
    let csv = export_ratio_csv(std::slice::from_ref(&row)).unwrap();

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), 7);

    let parsed: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(parsed.len(), 1);
    assert_eq!(&parsed[0][0], "Q1 2024");

    let expected = [
        row.profit_margin,
        row.return_on_assets,
        row.return_on_equity,
        row.current_ratio,
        row.quick_ratio,
        row.debt_to_equity,
    ];
    for (i, value) in expected.iter().enumerate() {
        let back: f64 = parsed[0][i + 1].parse().unwrap();
        let column = headers.get(i + 1).unwrap();
        assert!((back - value.unwrap()).abs() <= 0.005, "column {}", column);
    }
}

#[test]
fn test_upload_to_export_pipeline() {
    let upload = "Quarter,Revenue,Operating_Expenses,Net_Profit,\
                  Total_Assets,Current_Assets,Current_Liabilities,Equity\n\
                  Q3 2023,\"$1,000,000\",650000,100000,3000000,1200000,600000,1500000\n";
    let series = parse_series_csv(upload.as_bytes()).unwrap();
    assert_eq!(series.latest().revenue, money("1000000"));
    let csv = export_ratio_csv(&ratio_table(&series)).unwrap();
    assert_eq!(csv.lines().nth(1), Some("Q3 2023,10.00,3.33,6.67,2.00,1.40,1.00"));
}
