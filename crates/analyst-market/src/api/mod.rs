//! API clients for market, macro and news data
//!
//! Each data source the flows depend on sits behind a small trait so the
//! aggregation code can be exercised without network access.

pub mod fred;
pub mod freepik;
pub mod news_apis;
pub mod yahoo;

pub use fred::FredClient;
pub use freepik::FreepikClient;
pub use news_apis::{Article, GNewsClient, NewsApiClient};
pub use yahoo::YahooStatementsClient;

use crate::error::Result;
use crate::financials::StatementTable;
use crate::timeseries::SeriesPoint;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;

/// Date-indexed numeric series provider (FRED)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Observations of `series_id` between `start` and `end`, inclusive
    async fn observations(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SeriesPoint>>;
}

/// Reporting period of a financial statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Annual,
    Quarterly,
}

impl Frequency {
    /// Prefix used in Yahoo fundamentals series names
    pub fn prefix(self) -> &'static str {
        match self {
            Frequency::Annual => "annual",
            Frequency::Quarterly => "quarterly",
        }
    }
}

/// Per-ticker financial statement provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatementSource: Send + Sync {
    /// Income statement, periods most recent first
    async fn income_statement(&self, ticker: &str, frequency: Frequency) -> Result<StatementTable>;

    /// Balance sheet, periods most recent first
    async fn balance_sheet(&self, ticker: &str, frequency: Frequency) -> Result<StatementTable>;
}

/// Search for headlines about a company
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HeadlineSource: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    async fn headlines(&self, query: &str) -> Result<Vec<Article>>;
}

/// Titles of recent popular articles about a ticker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecentNews: Send + Sync {
    async fn recent_titles(&self, query: &str) -> Result<Vec<String>>;
}

/// HTTP client shared by the data clients
///
/// `user_agent` is the configured contact address; without one a crate
/// identifier is sent.
pub fn http_client(timeout: Duration, user_agent: Option<&str>) -> Result<Client> {
    let agent = user_agent.map_or_else(
        || format!("analyst-rs/{}", env!("CARGO_PKG_VERSION")),
        str::to_string,
    );

    Ok(Client::builder().timeout(timeout).user_agent(agent).build()?)
}
