//! Financial and macroeconomic analysis flows
//!
//! This crate gathers data from external APIs, condenses it and hands it to a
//! language model for a written analysis:
//!
//! - Per-ticker financial ratios and revenue growth (Yahoo Finance statements)
//! - Macro indicators merged, gap-filled and averaged per year (FRED)
//! - Company headlines for sentiment analysis (NewsAPI, GNews)
//! - Text-to-image generation (Freepik)
//! - Token cost estimates for saved transcripts (Gemini)
//!
//! # Architecture
//!
//! Data sources sit behind small traits in [`api`]; the aggregation in
//! [`financials`] and [`timeseries`] only sees those traits. Each flow in
//! [`flows`] renders a bilingual prompt from [`prompts`], makes one model
//! call and writes the transcript through [`report::ReportSink`].
//! [`Assistant`] builds the real clients from an [`AppConfig`].
//!
//! # Example
//!
//! ```rust,no_run
//! use analyst_market::{AppConfig, Assistant};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> analyst_market::Result<()> {
//!     analyst_utils::load_dotenv();
//!     let assistant = Assistant::new(AppConfig::from_env()?)?;
//!
//!     let report = assistant.macro_analysis().await?;
//!     println!("{}", report.text);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod financials;
pub mod flows;
pub mod prompts;
pub mod report;
pub mod timeseries;

// Re-export main types for convenience
pub use config::{AppConfig, Credential, Credentials, FlowModels};
pub use error::{AnalystError, Result};
pub use financials::{FinancialRecord, TickerFinancials, TickerFundamentals};
pub use flows::{AnalysisKind, AnalysisReport, Assistant, ImageOutcome, TokenCost};
pub use report::ReportSink;
pub use timeseries::{MergedSeriesTable, YearlyAverageRecord};

// Re-export Language from analyst-prompt
pub use analyst_prompt::Language;
