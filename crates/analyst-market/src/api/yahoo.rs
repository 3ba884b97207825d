//! Yahoo Finance fundamentals client
//!
//! Statements come from the fundamentals-timeseries endpoint, which returns
//! one series per requested line item (`annualTotalRevenue`,
//! `quarterlyNetIncome`, ...). Series are folded into a [`StatementTable`]
//! whose columns use Yahoo's spaced display names ("Total Revenue").

use super::{Frequency, StatementSource};
use crate::error::{AnalystError, Result};
use crate::financials::{
    CellValue, EQUITY_CANDIDATES, LIABILITY_CANDIDATES, NET_INCOME, StatementTable, TOTAL_ASSETS,
    TOTAL_REVENUE,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

const YAHOO_BASE_URL: &str = "https://query2.finance.yahoo.com";

/// Earliest period requested (1985-08-23)
const PERIOD_START: i64 = 493_590_046;

/// Yahoo series key for a display name: `Total Revenue` -> `TotalRevenue`
fn series_key(name: &str) -> String {
    name.split_whitespace().collect()
}

/// Income statement line items read by the ratio fetcher
pub fn income_items() -> Vec<String> {
    [TOTAL_REVENUE, NET_INCOME].into_iter().map(series_key).collect()
}

/// Balance sheet line items read by the ratio fetcher, every liability and
/// equity candidate included
pub fn balance_items() -> Vec<String> {
    std::iter::once(TOTAL_ASSETS)
        .chain(LIABILITY_CANDIDATES)
        .chain(EQUITY_CANDIDATES)
        .map(series_key)
        .collect()
}

/// Yahoo Finance statements client
#[derive(Clone)]
pub struct YahooStatementsClient {
    client: Client,
    base_url: String,
}

impl YahooStatementsClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: YAHOO_BASE_URL.to_string(),
        }
    }

    /// Use a preconfigured HTTP client (timeout, user agent)
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Point the client at another server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch the given line items for one ticker
    pub async fn get_statement(
        &self,
        ticker: &str,
        frequency: Frequency,
        items: &[String],
    ) -> Result<StatementTable> {
        let prefix = frequency.prefix();
        let types = items
            .iter()
            .map(|item| format!("{prefix}{item}"))
            .collect::<Vec<_>>()
            .join(",");
        let period2 = Utc::now().timestamp().to_string();
        let period1 = PERIOD_START.to_string();

        let url = format!(
            "{}/ws/fundamentals-timeseries/v1/finance/timeseries/{}",
            self.base_url, ticker
        );
        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", ticker),
                ("type", types.as_str()),
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AnalystError::ApiError(format!("Yahoo Finance request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalystError::ApiError(format!(
                "Yahoo Finance error {status} for {ticker}: {body}"
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            AnalystError::ApiError(format!("Failed to parse Yahoo Finance response: {e}"))
        })?;

        if let Some(error) = body.pointer("/timeseries/error").filter(|e| !e.is_null()) {
            return Err(AnalystError::ApiError(format!(
                "Yahoo Finance error for {ticker}: {error}"
            )));
        }

        let table = parse_timeseries(&body, prefix);
        debug!(
            "Yahoo returned {} {} periods for {}",
            table.periods().len(),
            prefix,
            ticker
        );
        Ok(table)
    }
}

impl Default for YahooStatementsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatementSource for YahooStatementsClient {
    async fn income_statement(&self, ticker: &str, frequency: Frequency) -> Result<StatementTable> {
        self.get_statement(ticker, frequency, &income_items()).await
    }

    async fn balance_sheet(&self, ticker: &str, frequency: Frequency) -> Result<StatementTable> {
        self.get_statement(ticker, frequency, &balance_items()).await
    }
}

/// Fold a timeseries response into a statement table
///
/// Null points, points without a readable `asOfDate` and series of other
/// frequencies are skipped. A point without a raw value is a missing cell.
fn parse_timeseries(body: &Value, prefix: &str) -> StatementTable {
    let mut cells = Vec::new();

    let results = body
        .pointer("/timeseries/result")
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice);

    for result in results {
        let Some(type_name) = result.pointer("/meta/type/0").and_then(Value::as_str) else {
            continue;
        };
        let Some(item) = type_name.strip_prefix(prefix) else {
            continue;
        };
        let Some(points) = result.get(type_name).and_then(Value::as_array) else {
            continue;
        };

        let name = display_name(item);
        for point in points {
            let Some(date) = point
                .get("asOfDate")
                .and_then(Value::as_str)
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            else {
                continue;
            };

            let value = match point.pointer("/reportedValue/raw") {
                Some(Value::Number(n)) => n.as_f64().into(),
                Some(Value::String(s)) => CellValue::Text(s.clone()),
                _ => CellValue::Missing,
            };
            cells.push((name.clone(), date, value));
        }
    }

    StatementTable::from_cells(cells)
}

/// `TotalNonCurrentLiabilities` -> `Total Non Current Liabilities`
fn display_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 8);
    let mut prev: Option<char> = None;
    for c in key.chars() {
        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}
