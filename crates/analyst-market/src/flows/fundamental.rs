//! Fundamental comparison of Microsoft, Apple and Google

use super::{AnalysisKind, AnalysisReport, FlowEnv};
use crate::api::{RecentNews, StatementSource};
use crate::error::{AnalystError, Result};
use crate::financials::{TickerFundamentals, fetch_fundamentals};
use crate::prompts::{self, company_list, fundamental_data_block};
use serde_json::json;
use tracing::{debug, info, warn};

/// Tickers compared, in fetch and render order
pub const COMPANIES: [(&str, &str); 3] = [("MSFT", "Microsoft"), ("AAPL", "Apple"), ("GOOG", "Google")];

/// Transcript label
pub const LABEL: &str = "Fundamental Analysis";

/// Everything gathered for one company
#[derive(Debug, Clone, PartialEq)]
pub struct CompanySnapshot {
    pub ticker: String,
    pub company: String,
    pub fundamentals: TickerFundamentals,
    /// Recent popular titles, empty without a news source
    pub headlines: Vec<String>,
}

/// Fetch fundamentals and headlines for every company in order
///
/// A ticker whose statements fail to load, or that yields no usable figures,
/// is logged and skipped. Headline failures only drop the headlines.
pub async fn collect_snapshots(
    statements: &dyn StatementSource,
    news: Option<&dyn RecentNews>,
    periods: usize,
) -> Vec<CompanySnapshot> {
    let mut snapshots = Vec::with_capacity(COMPANIES.len());

    for (ticker, company) in COMPANIES {
        let fundamentals = match fetch_fundamentals(statements, ticker, periods).await {
            Ok(f) => f,
            Err(e) => {
                warn!("Failed to fetch financial data for {}: {}", ticker, e);
                continue;
            }
        };

        if fundamentals.financials.records.is_empty() && fundamentals.revenue_growth.is_none() {
            warn!("No usable financial data for {}, skipping", ticker);
            continue;
        }

        let headlines = match news {
            Some(source) => source.recent_titles(ticker).await.unwrap_or_else(|e| {
                warn!("Failed to fetch headlines for {}: {}", ticker, e);
                Vec::new()
            }),
            None => Vec::new(),
        };

        debug!(
            "{}: {} periods, {} headlines",
            ticker,
            fundamentals.financials.records.len(),
            headlines.len()
        );
        snapshots.push(CompanySnapshot {
            ticker: ticker.to_string(),
            company: company.to_string(),
            fundamentals,
            headlines,
        });
    }

    snapshots
}

/// Run the fundamental comparison
///
/// Fails with `DataUnavailable` when no company produced data; the model is
/// not called in that case.
pub async fn run(
    env: &FlowEnv<'_>,
    model: &str,
    statements: &dyn StatementSource,
    news: Option<&dyn RecentNews>,
    periods: usize,
) -> Result<AnalysisReport> {
    let snapshots = collect_snapshots(statements, news, periods).await;
    if snapshots.is_empty() {
        return Err(AnalystError::DataUnavailable {
            item: "MSFT, AAPL, GOOG".to_string(),
            reason: "no financial statements could be retrieved".to_string(),
        });
    }
    info!("Collected fundamentals for {} companies", snapshots.len());

    let language = env.prompts.default_language();
    let names: Vec<&str> = snapshots.iter().map(|s| s.company.as_str()).collect();
    let prompt = env.prompts.render(
        prompts::FUNDAMENTAL,
        &json!({
            "companies": company_list(&names, language),
            "data": fundamental_data_block(&snapshots, language),
        }),
    )?;

    env.complete_and_save(AnalysisKind::Fundamental, LABEL.to_string(), model, prompt)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Frequency, MockRecentNews, MockStatementSource};
    use crate::financials::{
        CellValue, NET_INCOME, StatementTable, TOTAL_ASSETS, TOTAL_REVENUE,
    };
    use crate::flows::testing::FakeLlm;
    use crate::report::ReportSink;
    use analyst_prompt::Language;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn income() -> StatementTable {
        let periods = vec![
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        ];
        StatementTable::new(periods)
            .with_column(TOTAL_REVENUE, vec![CellValue::Number(150.0), CellValue::Number(100.0)])
            .with_column(NET_INCOME, vec![CellValue::Number(30.0), CellValue::Number(20.0)])
    }

    fn balance() -> StatementTable {
        let periods = vec![
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        ];
        StatementTable::new(periods)
            .with_column(TOTAL_ASSETS, vec![CellValue::Number(400.0), CellValue::Number(300.0)])
            .with_column(
                "Common Stock Equity",
                vec![CellValue::Number(120.0), CellValue::Number(100.0)],
            )
    }

    /// Statements for every ticker except `failing`
    fn statements(failing: &'static str) -> MockStatementSource {
        let mut source = MockStatementSource::new();
        source
            .expect_income_statement()
            .returning(move |ticker, _| {
                if ticker.to_string() == failing {
                    Err(AnalystError::ApiError("HTTP 404".to_string()))
                } else {
                    Ok(income())
                }
            });
        source
            .expect_balance_sheet()
            .withf(|_, frequency| *frequency == Frequency::Annual)
            .returning(|_, _| Ok(balance()));
        source
    }

    #[tokio::test]
    async fn test_failed_ticker_is_skipped() {
        let source = statements("AAPL");
        let snapshots = collect_snapshots(&source, None, 5).await;

        let tickers: Vec<&str> = snapshots.iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["MSFT", "GOOG"]);
        assert_eq!(snapshots[0].fundamentals.revenue_growth, Some(0.5));
        assert_eq!(snapshots[0].fundamentals.financials.records.len(), 2);
    }

    #[tokio::test]
    async fn test_headline_failure_keeps_company() {
        let source = statements("none");
        let mut news = MockRecentNews::new();
        news.expect_recent_titles().returning(|ticker| {
            if ticker.to_string() == "MSFT" {
                Err(AnalystError::ApiError("rate limited".to_string()))
            } else {
                Ok(vec![format!("{ticker} headline")])
            }
        });

        let snapshots = collect_snapshots(&source, Some(&news), 5).await;
        assert_eq!(snapshots.len(), 3);
        assert!(snapshots[0].headlines.is_empty());
        assert_eq!(snapshots[1].headlines, vec!["AAPL headline".to_string()]);
    }

    #[tokio::test]
    async fn test_run_renders_and_saves() {
        let dir = TempDir::new().unwrap();
        let sink = ReportSink::new(dir.path());
        let registry = prompts::default_registry(Language::English).unwrap();
        let llm = FakeLlm::replying("Microsoft offers the best long-term value.");
        let env = FlowEnv::new(&llm, &registry, &sink);

        let source = statements("GOOG");
        let report = run(&env, "gemini-2.5-flash", &source, None, 5).await.unwrap();

        assert_eq!(report.title, "Fundamental Analysis");
        assert_eq!(report.text, "Microsoft offers the best long-term value.");
        assert!(report.prompt.contains("annual reports of Microsoft and Apple."));
        assert!(report.prompt.contains("--- Apple (AAPL) ---"));
        assert!(!report.prompt.contains("Google"));
        assert!(report.saved_to.as_ref().is_some_and(|p| p.is_file()));

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_run_without_data_skips_model() {
        let dir = TempDir::new().unwrap();
        let sink = ReportSink::new(dir.path());
        let registry = prompts::default_registry(Language::English).unwrap();
        let llm = FakeLlm::replying("unused");
        let env = FlowEnv::new(&llm, &registry, &sink);

        let mut source = MockStatementSource::new();
        source
            .expect_income_statement()
            .returning(|_, _| Err(AnalystError::ApiError("offline".to_string())));

        let err = run(&env, "gemini-2.5-flash", &source, None, 5).await.unwrap_err();
        assert!(matches!(err, AnalystError::DataUnavailable { .. }));
        assert!(llm.requests().is_empty());
    }
}
