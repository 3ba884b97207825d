//! Per-ticker financial ratios from income statement and balance sheet
//!
//! Statements arrive as [`StatementTable`]s: periods most recent first, one
//! column per line item. Line items are coerced to numbers leniently; a cell
//! that cannot be read as a number is treated as missing.

use crate::api::{Frequency, StatementSource};
use crate::error::Result;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, warn};

pub const TOTAL_REVENUE: &str = "Total Revenue";
pub const NET_INCOME: &str = "Net Income";
pub const TOTAL_ASSETS: &str = "Total Assets";

/// Liability line items, most preferred first
pub const LIABILITY_CANDIDATES: [&str; 3] = [
    "Total Liab",
    "Total Liabilities Net Minority Interest",
    "Total Non Current Liabilities Net Minority Interest",
];

/// Equity line items, most preferred first
pub const EQUITY_CANDIDATES: [&str; 2] = ["Total Stockholder Equity", "Common Stock Equity"];

/// A single statement cell as reported by the source
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    /// Numeric value, if the cell holds or spells a finite number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Missing => None,
        }
        .filter(|v| v.is_finite())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(CellValue::Missing, CellValue::Number)
    }
}

/// A financial statement: period index plus named line-item columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementTable {
    periods: Vec<NaiveDate>,
    columns: Vec<(String, Vec<CellValue>)>,
}

impl StatementTable {
    /// Empty table over the given periods, kept in the order given
    pub fn new(periods: Vec<NaiveDate>) -> Self {
        Self {
            periods,
            columns: Vec::new(),
        }
    }

    /// Build from `(line item, period, value)` cells
    ///
    /// Periods are the union over all cells, most recent first; cells not
    /// supplied are missing.
    pub fn from_cells(cells: impl IntoIterator<Item = (String, NaiveDate, CellValue)>) -> Self {
        let cells: Vec<_> = cells.into_iter().collect();
        let periods: BTreeSet<NaiveDate> = cells.iter().map(|(_, p, _)| *p).collect();
        let mut table = Self::new(periods.into_iter().rev().collect());

        for (name, period, value) in cells {
            let Some(row) = table.periods.iter().position(|p| *p == period) else {
                continue;
            };
            let width = table.periods.len();
            let col = match table.columns.iter().position(|(n, _)| *n == name) {
                Some(idx) => idx,
                None => {
                    table.columns.push((name, vec![CellValue::Missing; width]));
                    table.columns.len() - 1
                }
            };
            table.columns[col].1[row] = value;
        }

        table
    }

    /// Add or replace a column; values align with `periods()`
    ///
    /// Short columns are padded with missing cells. Values past the last
    /// period have no row to land in and are dropped.
    pub fn with_column(mut self, name: impl Into<String>, mut values: Vec<CellValue>) -> Self {
        let name = name.into();
        if values.len() > self.periods.len() {
            debug!(
                "Column {} has {} values for {} periods, dropping the extra",
                name,
                values.len(),
                self.periods.len()
            );
        }
        values.resize(self.periods.len(), CellValue::Missing);

        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name, values)),
        }
        self
    }

    pub fn periods(&self) -> &[NaiveDate] {
        &self.periods
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Numeric value of a line item for one period
    pub fn value(&self, name: &str, period: NaiveDate) -> Option<f64> {
        let row = self.periods.iter().position(|p| *p == period)?;
        let (_, values) = self.columns.iter().find(|(n, _)| n == name)?;
        values.get(row).and_then(CellValue::as_f64)
    }

    /// Periods with a usable number for `name`, ascending
    pub fn numeric_series(&self, name: &str) -> Vec<(NaiveDate, f64)> {
        let mut points: Vec<(NaiveDate, f64)> = self
            .periods
            .iter()
            .filter_map(|p| self.value(name, *p).map(|v| (*p, v)))
            .collect();
        points.sort_by_key(|(p, _)| *p);
        points
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() || self.columns.is_empty()
    }
}

/// First candidate for which `is_available` holds
pub fn first_available<'a>(
    candidates: &[&'a str],
    is_available: impl Fn(&str) -> bool,
) -> Option<&'a str> {
    candidates.iter().copied().find(|c| is_available(c))
}

/// Round half away from zero to 4 decimals
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// `numerator / denominator`, missing on a missing or zero denominator
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (n, d) = (numerator?, denominator?);
    if d == 0.0 {
        return None;
    }
    Some(n / d).filter(|v| v.is_finite())
}

/// One reporting period of a ticker's key figures
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialRecord {
    pub period: NaiveDate,
    pub revenues: Option<f64>,
    pub net_income: Option<f64>,
    pub assets: Option<f64>,
    pub liabilities: Option<f64>,
    pub equity: Option<f64>,
    /// NetIncome / Equity, 4 decimals
    pub roe: Option<f64>,
    /// Assets / Liabilities, 4 decimals
    pub current_ratio: Option<f64>,
}

impl FinancialRecord {
    pub fn is_empty(&self) -> bool {
        [
            self.revenues,
            self.net_income,
            self.assets,
            self.liabilities,
            self.equity,
            self.roe,
            self.current_ratio,
        ]
        .iter()
        .all(Option::is_none)
    }
}

/// Key figures for one ticker, oldest period first
#[derive(Debug, Clone, PartialEq)]
pub struct TickerFinancials {
    pub ticker: String,
    pub records: Vec<FinancialRecord>,
}

impl TickerFinancials {
    /// Combine annual statements into ratio records
    ///
    /// Keeps the `periods` most recent periods of the combined index, then
    /// sorts ascending and drops periods where every figure is missing.
    pub fn from_statements(
        ticker: impl Into<String>,
        income: &StatementTable,
        balance: &StatementTable,
        periods: usize,
    ) -> Self {
        let liabilities_col = first_available(&LIABILITY_CANDIDATES, |c| balance.has_column(c));
        let equity_col = first_available(&EQUITY_CANDIDATES, |c| balance.has_column(c));

        let index: BTreeSet<NaiveDate> = income
            .periods()
            .iter()
            .chain(balance.periods())
            .copied()
            .collect();

        let mut records: Vec<FinancialRecord> = index
            .into_iter()
            .rev()
            .take(periods)
            .map(|period| {
                let net_income = income.value(NET_INCOME, period);
                let assets = balance.value(TOTAL_ASSETS, period);
                let liabilities = liabilities_col.and_then(|c| balance.value(c, period));
                let equity = equity_col.and_then(|c| balance.value(c, period));

                FinancialRecord {
                    period,
                    revenues: income.value(TOTAL_REVENUE, period),
                    net_income,
                    assets,
                    liabilities,
                    equity,
                    roe: ratio(net_income, equity).map(round4),
                    current_ratio: ratio(assets, liabilities).map(round4),
                }
            })
            .collect();

        records.sort_by_key(|r| r.period);
        records.retain(|r| !r.is_empty());

        Self {
            ticker: ticker.into(),
            records,
        }
    }

    pub fn latest(&self) -> Option<&FinancialRecord> {
        self.records.last()
    }
}

/// Growth between the two latest usable Total Revenue periods
///
/// Missing when fewer than two periods carry a number or the earlier one is
/// zero.
pub fn revenue_growth(income: &StatementTable) -> Option<f64> {
    let series = income.numeric_series(TOTAL_REVENUE);
    let [.., (_, previous), (_, latest)] = series.as_slice() else {
        return None;
    };
    ratio(Some(latest - previous), Some(*previous)).map(round4)
}

/// Fetch annual statements and build ratio records
pub async fn fetch_ticker_financials(
    source: &dyn StatementSource,
    ticker: &str,
    periods: usize,
) -> Result<TickerFinancials> {
    let income = source.income_statement(ticker, Frequency::Annual).await?;
    let balance = source.balance_sheet(ticker, Frequency::Annual).await?;
    Ok(TickerFinancials::from_statements(ticker, &income, &balance, periods))
}

/// Annual revenue growth, falling back to quarterly
pub async fn fetch_revenue_growth(source: &dyn StatementSource, ticker: &str) -> Result<Option<f64>> {
    let annual = source.income_statement(ticker, Frequency::Annual).await?;
    revenue_growth_with_fallback(source, ticker, &annual).await
}

/// Growth from an already fetched annual statement; quarterly is only
/// fetched when the annual history is too short
pub async fn revenue_growth_with_fallback(
    source: &dyn StatementSource,
    ticker: &str,
    annual: &StatementTable,
) -> Result<Option<f64>> {
    if let Some(growth) = revenue_growth(annual) {
        return Ok(Some(growth));
    }

    debug!("Annual revenue history too short for {}, trying quarterly", ticker);
    let quarterly = source.income_statement(ticker, Frequency::Quarterly).await?;
    Ok(revenue_growth(&quarterly))
}

/// Ratios and revenue growth for one ticker
#[derive(Debug, Clone, PartialEq)]
pub struct TickerFundamentals {
    pub financials: TickerFinancials,
    pub revenue_growth: Option<f64>,
}

/// Fetch statements once and derive both ratios and revenue growth
///
/// A failed quarterly fallback leaves revenue growth missing and keeps the
/// annual ratios.
pub async fn fetch_fundamentals(
    source: &dyn StatementSource,
    ticker: &str,
    periods: usize,
) -> Result<TickerFundamentals> {
    let income = source.income_statement(ticker, Frequency::Annual).await?;
    let balance = source.balance_sheet(ticker, Frequency::Annual).await?;
    let financials = TickerFinancials::from_statements(ticker, &income, &balance, periods);
    let revenue_growth = match revenue_growth_with_fallback(source, ticker, &income).await {
        Ok(growth) => growth,
        Err(e) => {
            warn!("Quarterly revenue for {} unavailable: {}", ticker, e);
            None
        }
    };

    Ok(TickerFundamentals {
        financials,
        revenue_growth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockStatementSource;
    use crate::error::AnalystError;
    use pretty_assertions::assert_eq;

    fn year_end(y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, 12, 31).unwrap()
    }

    /// Periods most recent first, like the source returns them
    fn periods_desc(newest: i32, count: i32) -> Vec<NaiveDate> {
        (0..count).map(|i| year_end(newest - i)).collect()
    }

    fn numbers(values: &[f64]) -> Vec<CellValue> {
        values.iter().copied().map(CellValue::from).collect()
    }

    #[test]
    fn test_cell_coercion() {
        assert_eq!(CellValue::Number(1.5).as_f64(), Some(1.5));
        assert_eq!(CellValue::Text(" 42 ".to_string()).as_f64(), Some(42.0));
        assert_eq!(CellValue::Text("n/a".to_string()).as_f64(), None);
        assert_eq!(CellValue::Number(f64::NAN).as_f64(), None);
        assert_eq!(CellValue::Missing.as_f64(), None);
    }

    #[test]
    fn test_first_available() {
        let present = ["Common Stock Equity"];
        let found = first_available(&EQUITY_CANDIDATES, |c| present.contains(&c));
        assert_eq!(found, Some("Common Stock Equity"));

        let found = first_available(&LIABILITY_CANDIDATES, |_| false);
        assert_eq!(found, None);

        let found = first_available(&LIABILITY_CANDIDATES, |_| true);
        assert_eq!(found, Some("Total Liab"));
    }

    #[test]
    fn test_ratio_and_rounding() {
        assert_eq!(ratio(Some(1.0), Some(3.0)).map(round4), Some(0.3333));
        assert_eq!(ratio(Some(2.0), Some(3.0)).map(round4), Some(0.6667));
        assert_eq!(ratio(Some(1.0), Some(0.0)), None);
        assert_eq!(ratio(None, Some(2.0)), None);
        assert_eq!(ratio(Some(1.0), None), None);
    }

    #[test]
    fn test_from_cells_orders_periods_descending() {
        let table = StatementTable::from_cells(vec![
            (TOTAL_REVENUE.to_string(), year_end(2022), CellValue::Number(10.0)),
            (TOTAL_REVENUE.to_string(), year_end(2024), CellValue::Number(30.0)),
            (NET_INCOME.to_string(), year_end(2023), CellValue::Number(2.0)),
        ]);

        assert_eq!(table.periods(), &[year_end(2024), year_end(2023), year_end(2022)]);
        assert_eq!(table.value(TOTAL_REVENUE, year_end(2023)), None);
        assert_eq!(table.value(NET_INCOME, year_end(2023)), Some(2.0));
    }

    #[test]
    fn test_with_column_pads_and_drops_extra_values() {
        let table = StatementTable::new(periods_desc(2024, 2))
            .with_column(TOTAL_REVENUE, numbers(&[30.0]))
            .with_column(NET_INCOME, numbers(&[3.0, 2.0, 1.0]));

        assert_eq!(table.value(TOTAL_REVENUE, year_end(2024)), Some(30.0));
        assert_eq!(table.value(TOTAL_REVENUE, year_end(2023)), None);
        assert_eq!(table.numeric_series(NET_INCOME), vec![(year_end(2023), 2.0), (year_end(2024), 3.0)]);
    }

    #[test]
    fn test_current_ratio_missing_without_liabilities() {
        let income = StatementTable::new(vec![year_end(2024)]);
        let balance = StatementTable::new(vec![year_end(2024)])
            .with_column(TOTAL_ASSETS, numbers(&[200.0]));

        let financials = TickerFinancials::from_statements("MSFT", &income, &balance, 5);
        let record = financials.latest().unwrap();
        assert_eq!(record.assets, Some(200.0));
        assert_eq!(record.liabilities, None);
        assert_eq!(record.current_ratio, None);
    }

    #[test]
    fn test_equity_from_second_candidate() {
        let income = StatementTable::new(vec![year_end(2024)])
            .with_column(NET_INCOME, numbers(&[25.0]));
        let balance = StatementTable::new(vec![year_end(2024)])
            .with_column("Common Stock Equity", numbers(&[100.0]))
            .with_column("Total Liabilities Net Minority Interest", numbers(&[80.0]))
            .with_column(TOTAL_ASSETS, numbers(&[120.0]));

        let financials = TickerFinancials::from_statements("AAPL", &income, &balance, 5);
        let record = financials.latest().unwrap();
        assert_eq!(record.equity, Some(100.0));
        assert_eq!(record.roe, Some(0.25));
        assert_eq!(record.current_ratio, Some(1.5));
    }

    #[test]
    fn test_zero_equity_gives_missing_roe() {
        let income = StatementTable::new(vec![year_end(2024)])
            .with_column(NET_INCOME, numbers(&[5.0]));
        let balance = StatementTable::new(vec![year_end(2024)])
            .with_column("Total Stockholder Equity", numbers(&[0.0]));

        let financials = TickerFinancials::from_statements("GOOG", &income, &balance, 5);
        assert_eq!(financials.latest().unwrap().roe, None);
    }

    #[test]
    fn test_truncate_then_sort_then_drop_empty() {
        // 8 periods, newest first; the 2nd newest has no data at all
        let periods = periods_desc(2024, 8);
        let revenue = vec![
            CellValue::Number(800.0),
            CellValue::Missing,
            CellValue::Number(600.0),
            CellValue::Number(500.0),
            CellValue::Text("not reported".to_string()),
            CellValue::Number(300.0),
            CellValue::Number(200.0),
            CellValue::Number(100.0),
        ];
        let income = StatementTable::new(periods.clone()).with_column(TOTAL_REVENUE, revenue);
        let balance = StatementTable::new(periods);

        let financials = TickerFinancials::from_statements("MSFT", &income, &balance, 5);

        let kept: Vec<NaiveDate> = financials.records.iter().map(|r| r.period).collect();
        assert_eq!(
            kept,
            vec![year_end(2021), year_end(2022), year_end(2024)],
            "oldest periods are cut before empty rows are dropped"
        );
        let revenues: Vec<Option<f64>> = financials.records.iter().map(|r| r.revenues).collect();
        assert_eq!(revenues, vec![Some(500.0), Some(600.0), Some(800.0)]);
    }

    #[test]
    fn test_revenue_growth_annual() {
        let income = StatementTable::new(vec![year_end(2024), year_end(2023)])
            .with_column(TOTAL_REVENUE, numbers(&[150.0, 100.0]));
        assert_eq!(revenue_growth(&income), Some(0.5));
    }

    #[test]
    fn test_revenue_growth_needs_two_periods() {
        let income = StatementTable::new(vec![year_end(2024), year_end(2023)])
            .with_column(TOTAL_REVENUE, vec![CellValue::Number(150.0), CellValue::Missing]);
        assert_eq!(revenue_growth(&income), None);
        assert_eq!(revenue_growth(&StatementTable::default()), None);
    }

    #[tokio::test]
    async fn test_revenue_growth_falls_back_to_quarterly() {
        let mut source = MockStatementSource::new();
        source
            .expect_income_statement()
            .withf(|t, f| t.to_string() == "MSFT" && *f == Frequency::Annual)
            .times(1)
            .returning(|_, _| {
                Ok(StatementTable::new(vec![year_end(2024)])
                    .with_column(TOTAL_REVENUE, vec![CellValue::Number(245.0)]))
            });
        source
            .expect_income_statement()
            .withf(|t, f| t.to_string() == "MSFT" && *f == Frequency::Quarterly)
            .times(1)
            .returning(|_, _| {
                let q = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap();
                Ok(StatementTable::new(vec![q(12, 31), q(9, 30)])
                    .with_column(TOTAL_REVENUE, vec![CellValue::Number(66.0), CellValue::Number(60.0)]))
            });

        let growth = fetch_revenue_growth(&source, "MSFT").await.unwrap();
        assert_eq!(growth, Some(0.1));
    }

    #[tokio::test]
    async fn test_quarterly_failure_keeps_annual_ratios() {
        let mut source = MockStatementSource::new();
        source
            .expect_income_statement()
            .withf(|t, f| t.to_string() == "MSFT" && *f == Frequency::Annual)
            .times(1)
            .returning(|_, _| {
                Ok(StatementTable::new(vec![year_end(2024)])
                    .with_column(NET_INCOME, numbers(&[25.0]))
                    .with_column(TOTAL_REVENUE, numbers(&[150.0])))
            });
        source
            .expect_income_statement()
            .withf(|t, f| t.to_string() == "MSFT" && *f == Frequency::Quarterly)
            .times(1)
            .returning(|_, _| Err(AnalystError::ApiError("HTTP 500".to_string())));
        source
            .expect_balance_sheet()
            .withf(|t, f| t.to_string() == "MSFT" && *f == Frequency::Annual)
            .times(1)
            .returning(|_, _| {
                Ok(StatementTable::new(vec![year_end(2024)])
                    .with_column("Common Stock Equity", numbers(&[100.0])))
            });

        let fundamentals = fetch_fundamentals(&source, "MSFT", 5).await.unwrap();
        assert_eq!(fundamentals.revenue_growth, None);
        let record = fundamentals.financials.latest().unwrap();
        assert_eq!(record.roe, Some(0.25));
        assert_eq!(record.revenues, Some(150.0));
    }

    #[tokio::test]
    async fn test_fetch_fundamentals_skips_quarterly_when_annual_suffices() {
        let mut source = MockStatementSource::new();
        source
            .expect_income_statement()
            .withf(|t, f| t.to_string() == "AAPL" && *f == Frequency::Annual)
            .times(1)
            .returning(|_, _| {
                Ok(StatementTable::new(vec![year_end(2024), year_end(2023)])
                    .with_column(TOTAL_REVENUE, numbers(&[150.0, 100.0]))
                    .with_column(NET_INCOME, numbers(&[30.0, 20.0])))
            });
        source
            .expect_balance_sheet()
            .withf(|t, f| t.to_string() == "AAPL" && *f == Frequency::Annual)
            .times(1)
            .returning(|_, _| {
                Ok(StatementTable::new(vec![year_end(2024), year_end(2023)])
                    .with_column("Common Stock Equity", numbers(&[60.0, 50.0])))
            });

        let fundamentals = fetch_fundamentals(&source, "AAPL", 5).await.unwrap();
        assert_eq!(fundamentals.revenue_growth, Some(0.5));
        let roe: Vec<Option<f64>> = fundamentals.financials.records.iter().map(|r| r.roe).collect();
        assert_eq!(roe, vec![Some(0.4), Some(0.5)]);
    }
}
