//! Flow entry points wired to the real API clients

use super::{AnalysisReport, FlowEnv, ImageOutcome, TokenCost};
use super::{fundamental, image, macro_analysis, sentiment, token_cost};
use crate::api::{
    self, FredClient, FreepikClient, GNewsClient, HeadlineSource, NewsApiClient, RecentNews,
    YahooStatementsClient,
};
use crate::config::{AppConfig, Credential};
use crate::error::Result;
use crate::prompts;
use crate::report::ReportSink;
use analyst_llm::providers::{GeminiConfig, GeminiProvider};
use analyst_prompt::PromptRegistry;
use chrono::Local;
use reqwest::Client;

/// Runs the analysis flows with clients built from an [`AppConfig`]
///
/// Every entry point checks the credentials its flow needs before any
/// client is built or request sent.
pub struct Assistant {
    config: AppConfig,
    prompts: PromptRegistry,
    sink: ReportSink,
}

impl Assistant {
    pub fn new(config: AppConfig) -> Result<Self> {
        let prompts = prompts::default_registry(config.language.clone())?;
        let sink = ReportSink::new(&config.output_dir);
        Ok(Self {
            config,
            prompts,
            sink,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn sink(&self) -> &ReportSink {
        &self.sink
    }

    /// Compare MSFT, AAPL and GOOG
    ///
    /// Headlines are added when a NewsAPI key is configured.
    pub async fn fundamental_analysis(&self) -> Result<AnalysisReport> {
        self.config.credentials.require(&[Credential::Gemini])?;

        let llm = self.gemini()?;
        let http = self.http_client()?;
        let statements = YahooStatementsClient::new().with_http_client(http.clone());
        let news = self
            .config
            .credentials
            .get(Credential::NewsApi)
            .map(|key| NewsApiClient::new(key).with_http_client(http.clone()));

        let env = FlowEnv::new(&llm, &self.prompts, &self.sink);
        fundamental::run(
            &env,
            &self.config.models.fundamental,
            &statements,
            news.as_ref().map(|n| n as &dyn RecentNews),
            self.config.financial_periods,
        )
        .await
    }

    /// Sentiment of NewsAPI and GNews coverage of `company`
    ///
    /// `Ok(None)` when neither source found a usable article.
    pub async fn sentiment_analysis(&self, company: &str) -> Result<Option<AnalysisReport>> {
        let credentials = &self.config.credentials;
        credentials.require(&[Credential::Gemini, Credential::NewsApi, Credential::GNews])?;

        let llm = self.gemini()?;
        let http = self.http_client()?;
        let newsapi = NewsApiClient::new(credentials.key(Credential::NewsApi)?)
            .with_http_client(http.clone());
        let gnews = GNewsClient::new(credentials.key(Credential::GNews)?).with_http_client(http);

        let sources: [&dyn HeadlineSource; 2] = [&newsapi, &gnews];

        let env = FlowEnv::new(&llm, &self.prompts, &self.sink);
        sentiment::run(&env, &self.config.models.sentiment, &sources, company).await
    }

    /// Yearly FRED averages over the configured lookback
    pub async fn macro_analysis(&self) -> Result<AnalysisReport> {
        let credentials = &self.config.credentials;
        credentials.require(&[Credential::Fred, Credential::Gemini])?;

        let llm = self.gemini()?;
        let fred = FredClient::new(
            credentials.key(Credential::Fred)?,
            Some(self.config.fred_rate_limit),
        )
        .with_http_client(self.http_client()?);

        let env = FlowEnv::new(&llm, &self.prompts, &self.sink);
        macro_analysis::run(
            &env,
            &self.config.models.macro_analysis,
            &fred,
            Local::now().date_naive(),
            self.config.macro_lookback_years,
        )
        .await
    }

    /// Generate an image with Freepik
    pub async fn generate_image(&self, prompt: &str) -> Result<ImageOutcome> {
        let key = self.config.credentials.key(Credential::Freepik)?;
        let client = FreepikClient::new(key).with_http_client(self.http_client()?);
        Ok(image::run(&client, &self.sink, prompt).await)
    }

    /// Token counts and cost of a saved transcript
    pub async fn estimate_token_cost(&self, file_name: &str) -> Result<TokenCost> {
        self.config.credentials.require(&[Credential::Gemini])?;

        let llm = self.gemini()?;
        token_cost::run(&llm, &self.sink, &self.config.models.token_cost, file_name).await
    }

    fn gemini(&self) -> Result<GeminiProvider> {
        let key = self.config.credentials.key(Credential::Gemini)?;
        Ok(GeminiProvider::with_config(GeminiConfig::new(key))?)
    }

    fn http_client(&self) -> Result<Client> {
        api::http_client(
            self.config.request_timeout,
            self.config.credentials.get(Credential::Email),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::error::AnalystError;
    use tempfile::TempDir;

    fn assistant(credentials: Credentials, dir: &TempDir) -> Assistant {
        let config = AppConfig::builder()
            .credentials(credentials)
            .output_dir(dir.path())
            .build()
            .unwrap();
        Assistant::new(config).unwrap()
    }

    fn missing(err: AnalystError) -> &'static str {
        match err {
            AnalystError::MissingCredential(name) => name,
            other => panic!("expected a missing credential, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_flows_require_credentials() {
        let dir = TempDir::new().unwrap();
        let assistant = assistant(Credentials::default(), &dir);

        let err = assistant.fundamental_analysis().await.unwrap_err();
        assert_eq!(missing(err), "GEMINI_API_KEY");

        let err = assistant.macro_analysis().await.unwrap_err();
        assert_eq!(missing(err), "FRED_API_KEY");

        let err = assistant.generate_image("a harbor").await.unwrap_err();
        assert_eq!(missing(err), "FREEPIK_API_KEY");

        let err = assistant.estimate_token_cost("x.txt").await.unwrap_err();
        assert_eq!(missing(err), "GEMINI_API_KEY");
    }

    #[tokio::test]
    async fn test_sentiment_names_first_missing_key() {
        let dir = TempDir::new().unwrap();
        let credentials = Credentials {
            gemini_api_key: Some("g".to_string()),
            newsapi_api_key: Some("n".to_string()),
            ..Credentials::default()
        };
        let assistant = assistant(credentials, &dir);

        let err = assistant.sentiment_analysis("Apple").await.unwrap_err();
        assert_eq!(missing(err), "GNEWS_API_KEY");
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
