//! Federal Reserve Economic Data (FRED) API client
//!
//! API Key: Free registration at https://fred.stlouisfed.org/docs/api/api_key.html
//! Rate Limit: 120 requests per minute

use super::SeriesSource;
use crate::error::{AnalystError, Result};
use crate::timeseries::SeriesPoint;
use async_trait::async_trait;
use chrono::NaiveDate;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const FRED_BASE_URL: &str = "https://api.stlouisfed.org/fred";

/// FRED's placeholder for a missing observation
const MISSING_VALUE: &str = ".";

/// Raw observation as returned by FRED
#[derive(Debug, Clone, Deserialize)]
pub struct Observation {
    /// Date of observation (YYYY-MM-DD)
    pub date: String,
    /// Value, `"."` when missing
    pub value: String,
}

impl Observation {
    /// Parse into a dated point; `None` when the date itself is malformed
    pub fn parse(&self) -> Option<SeriesPoint> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()?;
        let value = match self.value.trim() {
            MISSING_VALUE => None,
            raw => raw.parse::<f64>().ok().filter(|v| v.is_finite()),
        };
        Some((date, value))
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct FredErrorBody {
    error_message: String,
}

/// FRED API client
pub struct FredClient {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: SharedRateLimiter,
}

impl FredClient {
    /// Create a new FRED client
    ///
    /// # Arguments
    /// * `api_key` - FRED API key
    /// * `rate_limit` - Requests per minute (default 120)
    pub fn new(api_key: impl Into<String>, rate_limit: Option<u32>) -> Self {
        let per_minute = NonZeroU32::new(rate_limit.unwrap_or(120)).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: FRED_BASE_URL.to_string(),
            rate_limiter,
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

    /// Get observations for a series between two dates, inclusive
    pub async fn get_observations(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>> {
        self.rate_limiter.until_ready().await;

        let start = start.format("%Y-%m-%d").to_string();
        let end = end.format("%Y-%m-%d").to_string();
        let params = [
            ("series_id", series_id),
            ("api_key", self.api_key.as_str()),
            ("file_type", "json"),
            ("observation_start", start.as_str()),
            ("observation_end", end.as_str()),
        ];

        let url = format!("{}/series/observations", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| AnalystError::ApiError(format!("FRED request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<FredErrorBody>(&body)
                .map(|b| b.error_message)
                .unwrap_or(body);
            return Err(AnalystError::ApiError(format!(
                "FRED API error {status} for {series_id}: {detail}"
            )));
        }

        let data: ObservationsResponse = response
            .json()
            .await
            .map_err(|e| AnalystError::ApiError(format!("Failed to parse FRED response: {e}")))?;

        debug!("FRED returned {} observations for {}", data.observations.len(), series_id);
        Ok(data.observations)
    }
}

#[async_trait]
impl SeriesSource for FredClient {
    async fn observations(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SeriesPoint>> {
        let observations = self.get_observations(series_id, start, end).await?;
        Ok(observations.iter().filter_map(Observation::parse).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_missing_placeholder() {
        let obs = Observation {
            date: "2024-01-01".to_string(),
            value: ".".to_string(),
        };
        assert_eq!(obs.parse(), Some((d(2024, 1, 1), None)));

        let obs = Observation {
            date: "2024-02-01".to_string(),
            value: "5.33".to_string(),
        };
        assert_eq!(obs.parse(), Some((d(2024, 2, 1), Some(5.33))));

        let obs = Observation {
            date: "not-a-date".to_string(),
            value: "1".to_string(),
        };
        assert_eq!(obs.parse(), None);
    }

    #[tokio::test]
    async fn test_observations_query_and_parse() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/series/observations"))
            .and(query_param("series_id", "FEDFUNDS"))
            .and(query_param("api_key", "test_key"))
            .and(query_param("file_type", "json"))
            .and(query_param("observation_start", "2023-01-01"))
            .and(query_param("observation_end", "2023-12-31"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "realtime_start": "2024-01-01",
                "observations": [
                    { "realtime_start": "2024-01-01", "date": "2023-01-01", "value": "4.33" },
                    { "realtime_start": "2024-01-01", "date": "2023-02-01", "value": "." },
                    { "realtime_start": "2024-01-01", "date": "2023-03-01", "value": "4.65" }
                ]
            })))
            .mount(&server)
            .await;

        let client = FredClient::new("test_key", None).with_base_url(server.uri());
        let points = client
            .observations("FEDFUNDS", d(2023, 1, 1), d(2023, 12, 31))
            .await
            .unwrap();

        assert_eq!(
            points,
            vec![
                (d(2023, 1, 1), Some(4.33)),
                (d(2023, 2, 1), None),
                (d(2023, 3, 1), Some(4.65)),
            ]
        );
    }

    #[tokio::test]
    async fn test_error_message_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/series/observations"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error_code": 400,
                "error_message": "Bad Request.  The series does not exist."
            })))
            .mount(&server)
            .await;

        let client = FredClient::new("test_key", None).with_base_url(server.uri());
        let err = client
            .observations("NOPE", d(2023, 1, 1), d(2023, 12, 31))
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("NOPE"));
        assert!(message.contains("does not exist"));
    }

    #[tokio::test]
    #[ignore] // Requires API key
    async fn test_live_observations() {
        let key = std::env::var("FRED_API_KEY").unwrap();
        let client = FredClient::new(key, None);
        let points = client
            .observations("FEDFUNDS", d(2023, 1, 1), d(2023, 12, 31))
            .await
            .unwrap();
        assert_eq!(points.len(), 12);
    }
}
