//! Application configuration
//!
//! Everything the flows need from the environment is read once at startup into
//! an [`AppConfig`] and passed down explicitly.

use crate::error::{AnalystError, Result};
use analyst_prompt::Language;
use analyst_utils::{EnvSource, ProcessEnv};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// An external-service credential read from the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Credential {
    Fred,
    NewsApi,
    GNews,
    Gemini,
    Freepik,
    /// Contact address sent as the HTTP `User-Agent`
    Email,
}

impl Credential {
    pub const ALL: [Credential; 6] = [
        Credential::Fred,
        Credential::NewsApi,
        Credential::GNews,
        Credential::Gemini,
        Credential::Freepik,
        Credential::Email,
    ];

    /// Environment variable holding this credential
    pub fn env_var(self) -> &'static str {
        match self {
            Credential::Fred => "FRED_API_KEY",
            Credential::NewsApi => "NEWSAPI_API_KEY",
            Credential::GNews => "GNEWS_API_KEY",
            Credential::Gemini => "GEMINI_API_KEY",
            Credential::Freepik => "FREEPIK_API_KEY",
            Credential::Email => "EMAIL",
        }
    }
}

/// API keys and contact identifier, all optional until a flow needs them
#[derive(Clone, Default)]
pub struct Credentials {
    pub fred_api_key: Option<String>,
    pub newsapi_api_key: Option<String>,
    pub gnews_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub freepik_api_key: Option<String>,
    pub email: Option<String>,
}

impl Credentials {
    pub fn from_source(env: &impl EnvSource) -> Self {
        Self {
            fred_api_key: env.var(Credential::Fred.env_var()),
            newsapi_api_key: env.var(Credential::NewsApi.env_var()),
            gnews_api_key: env.var(Credential::GNews.env_var()),
            gemini_api_key: env.var(Credential::Gemini.env_var()),
            freepik_api_key: env.var(Credential::Freepik.env_var()),
            email: env.var(Credential::Email.env_var()),
        }
    }

    pub fn get(&self, credential: Credential) -> Option<&str> {
        let value = match credential {
            Credential::Fred => &self.fred_api_key,
            Credential::NewsApi => &self.newsapi_api_key,
            Credential::GNews => &self.gnews_api_key,
            Credential::Gemini => &self.gemini_api_key,
            Credential::Freepik => &self.freepik_api_key,
            Credential::Email => &self.email,
        };
        value.as_deref()
    }

    /// Check that every listed credential is present
    ///
    /// The error names the first missing one, in the order given.
    pub fn require(&self, required: &[Credential]) -> Result<()> {
        match required.iter().find(|c| self.get(**c).is_none()) {
            Some(missing) => Err(AnalystError::MissingCredential(missing.env_var())),
            None => Ok(()),
        }
    }

    /// A single credential, or `MissingCredential`
    pub fn key(&self, credential: Credential) -> Result<&str> {
        self.get(credential)
            .ok_or(AnalystError::MissingCredential(credential.env_var()))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Credentials");
        for credential in Credential::ALL {
            let state = if self.get(credential).is_some() { "set" } else { "unset" };
            s.field(credential.env_var(), &state);
        }
        s.finish()
    }
}

/// Gemini model used by each flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowModels {
    pub fundamental: String,
    pub sentiment: String,
    pub macro_analysis: String,
    pub token_cost: String,
}

impl Default for FlowModels {
    fn default() -> Self {
        Self {
            fundamental: "gemini-2.5-flash".to_string(),
            sentiment: "gemini-1.5-flash-latest".to_string(),
            macro_analysis: "gemini-1.5-flash".to_string(),
            token_cost: "gemini-2.5-flash".to_string(),
        }
    }
}

impl FlowModels {
    /// Defaults overridden by `GEMINI_MODEL_*` variables
    pub fn from_source(env: &impl EnvSource) -> Self {
        let defaults = Self::default();
        Self {
            fundamental: env
                .var("GEMINI_MODEL_FUNDAMENTAL")
                .unwrap_or(defaults.fundamental),
            sentiment: env.var("GEMINI_MODEL_SENTIMENT").unwrap_or(defaults.sentiment),
            macro_analysis: env.var("GEMINI_MODEL_MACRO").unwrap_or(defaults.macro_analysis),
            token_cost: env.var("GEMINI_MODEL_TOKENS").unwrap_or(defaults.token_cost),
        }
    }
}

/// Configuration for the assistant
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,

    pub models: FlowModels,

    /// Directory receiving transcripts, image responses and the error log
    pub output_dir: PathBuf,

    /// Language prompts are rendered in
    pub language: Language,

    /// Per-request HTTP timeout
    pub request_timeout: Duration,

    /// FRED requests per minute
    pub fred_rate_limit: u32,

    /// Most recent statement periods kept per ticker
    pub financial_periods: usize,

    /// Length of the macro window, in 365-day years
    pub macro_lookback_years: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            models: FlowModels::default(),
            output_dir: PathBuf::from("outputs"),
            language: Language::English,
            request_timeout: Duration::from_secs(30),
            fred_rate_limit: 120,
            financial_periods: 5,
            macro_lookback_years: 5,
        }
    }
}

impl AppConfig {
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load from the process environment
    ///
    /// Call [`analyst_utils::load_dotenv`] first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        let mut builder = Self::builder()
            .credentials(Credentials::from_source(env))
            .models(FlowModels::from_source(env));

        if let Some(dir) = env.var("ANALYST_OUTPUT_DIR") {
            builder = builder.output_dir(dir);
        }

        if let Some(code) = env.var("ANALYST_LANGUAGE") {
            let language = Language::from_code(&code);
            if language.is_known() {
                builder = builder.language(language);
            } else {
                tracing::warn!("Unsupported ANALYST_LANGUAGE '{}', using English", code);
            }
        }

        builder.build()
    }

    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(AnalystError::ConfigError(
                "output_dir must not be empty".to_string(),
            ));
        }

        if self.fred_rate_limit == 0 {
            return Err(AnalystError::ConfigError(
                "fred_rate_limit must be greater than 0".to_string(),
            ));
        }

        if self.financial_periods == 0 {
            return Err(AnalystError::ConfigError(
                "financial_periods must be greater than 0".to_string(),
            ));
        }

        if self.macro_lookback_years == 0 {
            return Err(AnalystError::ConfigError(
                "macro_lookback_years must be greater than 0".to_string(),
            ));
        }

        let models = [
            &self.models.fundamental,
            &self.models.sentiment,
            &self.models.macro_analysis,
            &self.models.token_cost,
        ];
        if models.iter().any(|m| m.trim().is_empty()) {
            return Err(AnalystError::ConfigError(
                "model identifiers must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    credentials: Option<Credentials>,
    models: Option<FlowModels>,
    output_dir: Option<PathBuf>,
    language: Option<Language>,
    request_timeout: Option<Duration>,
    fred_rate_limit: Option<u32>,
    financial_periods: Option<usize>,
    macro_lookback_years: Option<u32>,
}

impl AppConfigBuilder {
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn models(mut self, models: FlowModels) -> Self {
        self.models = Some(models);
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn fred_rate_limit(mut self, per_minute: u32) -> Self {
        self.fred_rate_limit = Some(per_minute);
        self
    }

    pub fn financial_periods(mut self, periods: usize) -> Self {
        self.financial_periods = Some(periods);
        self
    }

    pub fn macro_lookback_years(mut self, years: u32) -> Self {
        self.macro_lookback_years = Some(years);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig> {
        let defaults = AppConfig::default();

        let config = AppConfig {
            credentials: self.credentials.unwrap_or(defaults.credentials),
            models: self.models.unwrap_or(defaults.models),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            language: self.language.unwrap_or(defaults.language),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            fred_rate_limit: self.fred_rate_limit.unwrap_or(defaults.fred_rate_limit),
            financial_periods: self.financial_periods.unwrap_or(defaults.financial_periods),
            macro_lookback_years: self
                .macro_lookback_years
                .unwrap_or(defaults.macro_lookback_years),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
        assert_eq!(config.language, Language::English);
        assert_eq!(config.fred_rate_limit, 120);
        assert_eq!(config.financial_periods, 5);
        assert_eq!(config.macro_lookback_years, 5);
        assert_eq!(config.models.sentiment, "gemini-1.5-flash-latest");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_source() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("FRED_API_KEY", "fred"),
            ("GEMINI_API_KEY", "gemini"),
            ("EMAIL", "analyst@example.com"),
            ("ANALYST_OUTPUT_DIR", "reports"),
            ("ANALYST_LANGUAGE", "es"),
            ("GEMINI_MODEL_MACRO", "gemini-2.0-flash"),
        ]);

        let config = AppConfig::from_source(&env).unwrap();
        assert_eq!(config.credentials.get(Credential::Fred), Some("fred"));
        assert_eq!(config.credentials.get(Credential::NewsApi), None);
        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.language, Language::Spanish);
        assert_eq!(config.models.macro_analysis, "gemini-2.0-flash");
        assert_eq!(config.models.fundamental, "gemini-2.5-flash");
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        let env: HashMap<&str, &str> = HashMap::from([("ANALYST_LANGUAGE", "klingon")]);
        let config = AppConfig::from_source(&env).unwrap();
        assert_eq!(config.language, Language::English);
    }

    #[test]
    fn test_require_names_first_missing() {
        let env: HashMap<&str, &str> = HashMap::from([("GEMINI_API_KEY", "g")]);
        let credentials = Credentials::from_source(&env);

        assert!(credentials.require(&[Credential::Gemini]).is_ok());

        let err = credentials
            .require(&[Credential::Gemini, Credential::NewsApi, Credential::GNews])
            .unwrap_err();
        assert!(matches!(err, AnalystError::MissingCredential("NEWSAPI_API_KEY")));
    }

    #[test]
    fn test_debug_hides_keys() {
        let env: HashMap<&str, &str> = HashMap::from([("GEMINI_API_KEY", "super-secret")]);
        let debug = format!("{:?}", Credentials::from_source(&env));
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("GEMINI_API_KEY: \"set\""));
    }

    #[test]
    fn test_builder_validation() {
        assert!(AppConfig::builder().fred_rate_limit(0).build().is_err());
        assert!(AppConfig::builder().financial_periods(0).build().is_err());
        assert!(AppConfig::builder().output_dir("").build().is_err());

        let config = AppConfig::builder()
            .financial_periods(3)
            .request_timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(config.financial_periods, 3);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
