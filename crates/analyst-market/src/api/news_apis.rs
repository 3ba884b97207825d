//! News API clients for company headlines

use super::{HeadlineSource, RecentNews};
use crate::error::{AnalystError, Result};
use async_trait::async_trait;
use chrono::{Days, Local};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

const NEWSAPI_BASE_URL: &str = "https://newsapi.org/v2";
const GNEWS_BASE_URL: &str = "https://gnews.io/api/v4";

/// Articles requested per search
pub const MAX_ARTICLES: usize = 5;

/// Window for recent popular titles, in days
pub const RECENT_DAYS: u64 = 30;

/// A news article as returned by NewsAPI or GNews
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Article {
    /// `"{title} {description}"`, only when both are present and non-blank
    pub fn summary(&self) -> Option<String> {
        let title = self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())?;
        Some(format!("{title} {description}"))
    }
}

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct NewsApiErrorBody {
    #[serde(default)]
    message: String,
}

/// NewsAPI client (newsapi.org)
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NewsApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: NEWSAPI_BASE_URL.to_string(),
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

    /// Top English headlines matching `query`
    pub async fn top_headlines(&self, query: &str) -> Result<Vec<Article>> {
        let page_size = MAX_ARTICLES.to_string();
        let params = [
            ("q", query),
            ("language", "en"),
            ("pageSize", page_size.as_str()),
            ("apiKey", self.api_key.as_str()),
        ];
        let mut articles = self.get_articles("top-headlines", &params).await?;
        articles.truncate(MAX_ARTICLES);
        Ok(articles)
    }

    /// Titles of the most popular articles about `query` from the last
    /// [`RECENT_DAYS`] days
    pub async fn everything_titles(&self, query: &str) -> Result<Vec<String>> {
        let since = Local::now()
            .date_naive()
            .checked_sub_days(Days::new(RECENT_DAYS))
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let params = [
            ("q", query),
            ("from", since.as_str()),
            ("sortBy", "popularity"),
            ("apiKey", self.api_key.as_str()),
        ];

        let articles = self.get_articles("everything", &params).await?;
        Ok(articles
            .into_iter()
            .filter_map(|a| a.title.filter(|t| !t.trim().is_empty()))
            .take(MAX_ARTICLES)
            .collect())
    }

    async fn get_articles(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Vec<Article>> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| AnalystError::ApiError(format!("NewsAPI request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AnalystError::InvalidApiKey {
                provider: "NewsAPI".to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<NewsApiErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or(body);
            return Err(AnalystError::ApiError(format!(
                "NewsAPI error {status}: {detail}"
            )));
        }

        let data: ArticlesResponse = response
            .json()
            .await
            .map_err(|e| AnalystError::ApiError(format!("Failed to parse NewsAPI response: {e}")))?;

        debug!("NewsAPI {} returned {} articles", endpoint, data.articles.len());
        Ok(data.articles)
    }
}

#[async_trait]
impl HeadlineSource for NewsApiClient {
    fn name(&self) -> &'static str {
        "NewsAPI"
    }

    async fn headlines(&self, query: &str) -> Result<Vec<Article>> {
        self.top_headlines(query).await
    }
}

#[async_trait]
impl RecentNews for NewsApiClient {
    async fn recent_titles(&self, query: &str) -> Result<Vec<String>> {
        self.everything_titles(query).await
    }
}

/// GNews client (gnews.io)
pub struct GNewsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GNewsClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: GNEWS_BASE_URL.to_string(),
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

    /// English articles matching `query`
    pub async fn search(&self, query: &str) -> Result<Vec<Article>> {
        let max = MAX_ARTICLES.to_string();
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("lang", "en"),
                ("token", self.api_key.as_str()),
                ("max", max.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AnalystError::ApiError(format!("GNews request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AnalystError::InvalidApiKey {
                provider: "GNews".to_string(),
            });
        }
        if !status.is_success() {
            return Err(AnalystError::ApiError(format!(
                "GNews API error: status {}",
                status.as_u16()
            )));
        }

        let mut data: ArticlesResponse = response
            .json()
            .await
            .map_err(|e| AnalystError::ApiError(format!("Failed to parse GNews response: {e}")))?;

        data.articles.truncate(MAX_ARTICLES);
        Ok(data.articles)
    }
}

#[async_trait]
impl HeadlineSource for GNewsClient {
    fn name(&self) -> &'static str {
        "GNews"
    }

    async fn headlines(&self, query: &str) -> Result<Vec<Article>> {
        self.search(query).await
    }
}
