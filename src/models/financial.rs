use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A fiscal quarter such as "Q1 2022".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub quarter: u8,
}

impl Period {
    /// The `index`-th consecutive quarter counting from Q1 of `start_year`.
    /// `None` when the year would not fit in an `i32`.
    pub fn from_index(index: usize, start_year: i32) -> Option<Self> {
        let offset = i32::try_from(index / 4).ok()?;
        Some(Self {
            year: start_year.checked_add(offset)?,
            quarter: (index % 4) as u8 + 1,
        })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} {}", self.quarter, self.year)
    }
}

impl FromStr for Period {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::InvalidInput(format!("Invalid period label: {}", s));

        let (q, y) = s.trim().split_once(' ').ok_or_else(invalid)?;
        let quarter: u8 = q
            .strip_prefix('Q')
            .and_then(|n| n.parse().ok())
            .filter(|n| (1..=4).contains(n))
            .ok_or_else(invalid)?;
        let year: i32 = y.trim().parse().map_err(|_| invalid())?;

        Ok(Self { year, quarter })
    }
}

/// One quarter of reported figures. Ratios are derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub period: String,
    pub revenue: BigDecimal,
    pub operating_expenses: BigDecimal,
    pub net_profit: BigDecimal,
    pub total_assets: BigDecimal,
    pub current_assets: BigDecimal,
    pub current_liabilities: BigDecimal,
    pub total_liabilities: BigDecimal,
    pub equity: BigDecimal,
}

/// Nearest `f64` to an amount, for ratio and chart arithmetic.
/// Goes through the decimal text so cent values land on their closest float.
pub fn amount(value: &BigDecimal) -> f64 {
    value.to_string().parse().unwrap_or(f64::NAN)
}

/// Ordered, non-empty run of quarterly records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FinancialSeries {
    records: Vec<FinancialRecord>,
}

impl FinancialSeries {
    pub fn new(records: Vec<FinancialRecord>) -> Result<Self, AppError> {
        if records.is_empty() {
            return Err(AppError::InvalidInput(
                "a financial series needs at least one record".to_string(),
            ));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn latest(&self) -> &FinancialRecord {
        // non-empty by construction
        &self.records[self.records.len() - 1]
    }

    /// The quarter before the latest one; the latest itself for a single-record series.
    pub fn previous(&self) -> &FinancialRecord {
        let n = self.records.len();
        if n > 1 {
            &self.records[n - 2]
        } else {
            &self.records[0]
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FinancialRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a FinancialSeries {
    type Item = &'a FinancialRecord;
    type IntoIter = std::slice::Iter<'a, FinancialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(period: &str, revenue: i64, net_profit: i64) -> FinancialRecord {
        FinancialRecord {
            period: period.to_string(),
            revenue: BigDecimal::from(revenue),
            operating_expenses: BigDecimal::from(revenue * 65 / 100),
            net_profit: BigDecimal::from(net_profit),
            total_assets: BigDecimal::from(revenue * 3),
            current_assets: BigDecimal::from(revenue * 12 / 10),
            current_liabilities: BigDecimal::from(revenue * 6 / 10),
            total_liabilities: BigDecimal::from(revenue * 15 / 10),
            equity: BigDecimal::from(revenue * 15 / 10),
        }
    }

    #[test]
    fn test_period_from_index_wraps_quarters() {
        let label = |i| Period::from_index(i, 2022).unwrap().to_string();
        assert_eq!(label(0), "Q1 2022");
        assert_eq!(label(3), "Q4 2022");
        assert_eq!(label(4), "Q1 2023");
        assert_eq!(label(11), "Q4 2024");
    }

    #[test]
    fn test_period_from_index_year_overflow() {
        assert!(Period::from_index(3, i32::MAX).is_some());
        assert!(Period::from_index(4, i32::MAX).is_none());
        assert!(Period::from_index(usize::MAX, 0).is_none());
    }

    #[test]
    fn test_amount_conversion() {
        let v: BigDecimal = "1552826.18".parse().unwrap();
        assert_eq!(amount(&v), 1552826.18);
        let v: BigDecimal = "0.07".parse().unwrap();
        assert_eq!(amount(&v), 0.07);
    }

    #[test]
    fn test_period_parse() {
        let p: Period = "Q3 2024".parse().unwrap();
        assert_eq!(p, Period { year: 2024, quarter: 3 });
        assert!("Q5 2024".parse::<Period>().is_err());
        assert!("2024".parse::<Period>().is_err());
        assert!("Q1 twenty".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_ordering_is_chronological() {
        let a: Period = "Q4 2022".parse().unwrap();
        let b: Period = "Q1 2023".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_empty_series_rejected() {
        assert!(matches!(
            FinancialSeries::new(vec![]),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_previous_falls_back_to_latest() {
        let series = FinancialSeries::new(vec![record("Q1 2022", 100, 10)]).unwrap();
        assert_eq!(series.latest(), series.previous());

        let series = FinancialSeries::new(vec![
            record("Q1 2022", 100, 10),
            record("Q2 2022", 110, 12),
        ])
        .unwrap();
        assert_eq!(series.previous().period, "Q1 2022");
        assert_eq!(series.latest().period, "Q2 2022");
    }
}
