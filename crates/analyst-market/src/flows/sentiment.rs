//! News sentiment analysis for one company

use super::{AnalysisKind, AnalysisReport, FlowEnv};
use crate::api::HeadlineSource;
use crate::error::{AnalystError, Result};
use crate::prompts;
use serde_json::json;
use tracing::{error, info, warn};

/// Article lines from every source plus the providers that rejected their key
#[derive(Debug, Default, PartialEq)]
pub struct GatheredNews {
    pub lines: Vec<String>,
    pub rejected_keys: Vec<String>,
}

/// Gather article lines from every source, in order
///
/// Each article contributes `"{title} {description}"` when both are present.
/// A failing source is logged and contributes nothing.
pub async fn gather_news(sources: &[&dyn HeadlineSource], company: &str) -> GatheredNews {
    let mut news = GatheredNews::default();

    for source in sources {
        match source.headlines(company).await {
            Ok(articles) => {
                let before = news.lines.len();
                news.lines.extend(articles.iter().filter_map(|a| a.summary()));
                info!(
                    "{} returned {} usable articles for {}",
                    source.name(),
                    news.lines.len() - before,
                    company
                );
            }
            Err(AnalystError::InvalidApiKey { provider }) => {
                error!("{} rejected the API key", provider);
                news.rejected_keys.push(provider);
            }
            Err(e) => {
                warn!("Failed to fetch news from {}: {}", source.name(), e);
            }
        }
    }

    news
}

/// Run the sentiment analysis for `company`
///
/// Returns `Ok(None)` without calling the model when no source produced a
/// usable article, or the invalid-key error when a rejected key is the
/// reason nothing came back.
pub async fn run(
    env: &FlowEnv<'_>,
    model: &str,
    sources: &[&dyn HeadlineSource],
    company: &str,
) -> Result<Option<AnalysisReport>> {
    let company = company.trim();
    if company.is_empty() {
        return Err(AnalystError::InvalidInput("company name is empty".to_string()));
    }

    let GatheredNews {
        lines: news,
        rejected_keys,
    } = gather_news(sources, company).await;
    if news.is_empty() {
        if let Some(provider) = rejected_keys.into_iter().next() {
            return Err(AnalystError::InvalidApiKey { provider });
        }
        warn!("No news found for {}", company);
        return Ok(None);
    }

    let prompt = env.prompts.render(
        prompts::SENTIMENT,
        &json!({ "company": company, "news": news }),
    )?;

    env.complete_and_save(
        AnalysisKind::Sentiment,
        format!("Sentiment Analysis {company}"),
        model,
        prompt,
    )
    .await
    .map(Some)
}
