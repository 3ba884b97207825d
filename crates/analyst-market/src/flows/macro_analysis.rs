//! Macroeconomic analysis from FRED yearly averages

use super::{AnalysisKind, AnalysisReport, FlowEnv};
use crate::api::SeriesSource;
use crate::error::{AnalystError, Result};
use crate::prompts::{self, macro_data_block};
use crate::timeseries::fetch_merged_series;
use chrono::{Datelike, Days, NaiveDate};
use serde_json::json;
use tracing::info;

/// Transcript label
pub const LABEL: &str = "Macroeconomic Analysis";

/// `today - years * 365 days ..= today`
pub fn lookback_range(today: NaiveDate, years: u32) -> (NaiveDate, NaiveDate) {
    let start = today
        .checked_sub_days(Days::new(u64::from(years) * 365))
        .unwrap_or(NaiveDate::MIN);
    (start, today)
}

/// Run the macroeconomic analysis ending at `today`
///
/// Fails with `DataUnavailable` when no indicator could be fetched.
pub async fn run(
    env: &FlowEnv<'_>,
    model: &str,
    source: &dyn SeriesSource,
    today: NaiveDate,
    lookback_years: u32,
) -> Result<AnalysisReport> {
    let (start, end) = lookback_range(today, lookback_years);
    info!("Fetching macro indicators from {} to {}", start, end);

    let table = fetch_merged_series(source, start, end).await;
    let yearly = table.yearly_averages();
    if yearly.is_empty() {
        return Err(AnalystError::DataUnavailable {
            item: "macro indicators".to_string(),
            reason: "no FRED series could be retrieved".to_string(),
        });
    }

    let language = env.prompts.default_language();
    let prompt = env.prompts.render(
        prompts::MACRO,
        &json!({
            "current_year": today.year(),
            "next_year": today.year() + 1,
            "data": macro_data_block(&yearly, lookback_years, language),
        }),
    )?;

    env.complete_and_save(AnalysisKind::Macro, LABEL.to_string(), model, prompt)
        .await
}
