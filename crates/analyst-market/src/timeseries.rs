//! Macro indicator time series: fetch, merge, gap-fill and yearly averages
//!
//! Each indicator becomes one named column. Columns are outer-joined on the
//! observation date, then gaps are forward-filled and afterwards back-filled,
//! so every date in the union carries a value for every indicator that was
//! fetched. An indicator whose fetch failed never gets a column.

use crate::api::SeriesSource;
use analyst_prompt::Language;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// One observation; `None` where the source reported no value
pub type SeriesPoint = (NaiveDate, Option<f64>);

/// A FRED series and the name it is known by in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    /// FRED series id
    pub code: &'static str,
    /// Column name
    pub name: &'static str,
    english_label: &'static str,
    spanish_label: &'static str,
    /// Rendered with a `%` suffix
    pub percent: bool,
}

impl Indicator {
    /// Human-readable label for prompts
    pub fn label(&self, language: &Language) -> &'static str {
        match language {
            Language::Spanish => self.spanish_label,
            _ => self.english_label,
        }
    }
}

/// Indicators fetched for macro analysis, in fetch and render order
pub const INDICATORS: [Indicator; 5] = [
    Indicator {
        code: "CPIAUCSL",
        name: "inflation",
        english_label: "Inflation",
        spanish_label: "Inflación",
        percent: true,
    },
    Indicator {
        code: "FEDFUNDS",
        name: "fed_funds_rate",
        english_label: "Fed Funds Rate",
        spanish_label: "Tasa Fed",
        percent: true,
    },
    Indicator {
        code: "NASDAQCOM",
        name: "nasdaq_return",
        english_label: "Nasdaq Return (12 months)",
        spanish_label: "Retorno Nasdaq (12 meses)",
        percent: true,
    },
    Indicator {
        code: "VIXCLS",
        name: "vix",
        english_label: "VIX (Volatility Index)",
        spanish_label: "VIX (Índice de Volatilidad)",
        percent: false,
    },
    Indicator {
        code: "UMCSENT",
        name: "consumer_sentiment",
        english_label: "Consumer Sentiment (UMich)",
        spanish_label: "Sentimiento del Consumidor (UMich)",
        percent: false,
    },
];

/// Look up an indicator by column name
pub fn indicator(name: &str) -> Option<&'static Indicator> {
    INDICATORS.iter().find(|i| i.name == name)
}

/// A named series of observations in ascending date order
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    name: String,
    points: Vec<SeriesPoint>,
}

impl IndicatorSeries {
    /// Sort by date; for a repeated date the last observation wins
    pub fn new(name: impl Into<String>, points: impl IntoIterator<Item = SeriesPoint>) -> Self {
        let by_date: BTreeMap<NaiveDate, Option<f64>> = points.into_iter().collect();
        Self {
            name: name.into(),
            points: by_date.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Date-indexed table with one column per successfully fetched indicator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedSeriesTable {
    columns: Vec<String>,
    rows: BTreeMap<NaiveDate, Vec<Option<f64>>>,
}

impl MergedSeriesTable {
    /// Outer-join series on date; columns keep the order given
    pub fn outer_join(series: impl IntoIterator<Item = IndicatorSeries>) -> Self {
        let mut table = Self::default();
        for s in series {
            table.join(s);
        }
        table
    }

    /// Add one series as a new column, extending the date index as needed
    pub fn join(&mut self, series: IndicatorSeries) {
        let width = self.columns.len();
        self.columns.push(series.name);

        for row in self.rows.values_mut() {
            row.push(None);
        }

        for (date, value) in series.points {
            let row = self
                .rows
                .entry(date)
                .or_insert_with(|| vec![None; width + 1]);
            row[width] = value;
        }
    }

    /// Forward-fill each column, then back-fill what is still missing
    ///
    /// Leading gaps take the first observed value; a column with no values
    /// at all stays empty.
    pub fn fill_gaps(&mut self) {
        for col in 0..self.columns.len() {
            let mut last = None;
            for row in self.rows.values_mut() {
                let cell = &mut row[col];
                match *cell {
                    Some(v) => last = Some(v),
                    None => *cell = last,
                }
            }

            let mut next = None;
            for row in self.rows.values_mut().rev() {
                let cell = &mut row[col];
                match *cell {
                    Some(v) => next = Some(v),
                    None => *cell = next,
                }
            }
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Dates in ascending order
    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.rows.keys()
    }

    pub fn value(&self, date: NaiveDate, column: &str) -> Option<f64> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(&date).and_then(|row| row[col])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Per-year arithmetic mean of every column
    ///
    /// Only years with at least one row appear, in ascending order. Missing
    /// cells are skipped; a column with no values in a year is left out of
    /// that year's record.
    pub fn yearly_averages(&self) -> Vec<YearlyAverageRecord> {
        let mut sums: BTreeMap<i32, Vec<(f64, usize)>> = BTreeMap::new();

        for (date, row) in &self.rows {
            let acc = sums
                .entry(date.year())
                .or_insert_with(|| vec![(0.0, 0); self.columns.len()]);
            for (slot, value) in acc.iter_mut().zip(row) {
                if let Some(v) = value {
                    slot.0 += v;
                    slot.1 += 1;
                }
            }
        }

        sums.into_iter()
            .map(|(year, acc)| YearlyAverageRecord {
                year,
                values: self
                    .columns
                    .iter()
                    .zip(acc)
                    .filter(|(_, (_, n))| *n > 0)
                    .map(|(name, (sum, n))| (name.clone(), sum / n as f64))
                    .collect(),
            })
            .collect()
    }
}

/// Mean value of each indicator over one calendar year
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyAverageRecord {
    pub year: i32,
    /// `(indicator name, mean)` in column order
    pub values: Vec<(String, f64)>,
}

impl YearlyAverageRecord {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }
}

/// Fetch every indicator in [`INDICATORS`], merge and gap-fill
///
/// Indicators are fetched one after another. A failed fetch is logged and
/// that indicator is left out; the merge always completes.
pub async fn fetch_merged_series(
    source: &dyn SeriesSource,
    start: NaiveDate,
    end: NaiveDate,
) -> MergedSeriesTable {
    let mut table = MergedSeriesTable::default();

    for indicator in &INDICATORS {
        match source.observations(indicator.code, start, end).await {
            Ok(points) => {
                info!(
                    "Fetched {} observations for {} ({})",
                    points.len(),
                    indicator.code,
                    indicator.name
                );
                table.join(IndicatorSeries::new(indicator.name, points));
            }
            Err(e) => {
                warn!("Failed to fetch {} from FRED: {}", indicator.code, e);
            }
        }
    }

    table.fill_gaps();
    table
}

/// Format a value the way reports show it: two decimals, `%` for rates
pub fn format_indicator_value(indicator: &Indicator, value: f64) -> String {
    if indicator.percent {
        format!("{value:.2}%")
    } else {
        format!("{value:.2}")
    }
}
