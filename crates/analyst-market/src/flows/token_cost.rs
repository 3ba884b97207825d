//! Token and cost estimate for a saved transcript

use crate::error::{AnalystError, Result};
use crate::report::{IMAGE_RESPONSE_MARKER, PROMPT_MARKER, RESPONSE_MARKER, ReportSink};
use analyst_llm::LLMProvider;
use std::io::ErrorKind;
use tracing::debug;

/// USD per million input tokens
pub const INPUT_PRICE_PER_MILLION: f64 = 0.30;

/// USD per million output tokens
pub const OUTPUT_PRICE_PER_MILLION: f64 = 2.50;

/// Token counts of a transcript and their price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenCost {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl TokenCost {
    pub fn input_cost(&self) -> f64 {
        self.input_tokens as f64 / 1_000_000.0 * INPUT_PRICE_PER_MILLION
    }

    pub fn output_cost(&self) -> f64 {
        self.output_tokens as f64 / 1_000_000.0 * OUTPUT_PRICE_PER_MILLION
    }

    pub fn total_cost(&self) -> f64 {
        self.input_cost() + self.output_cost()
    }
}

/// Split a transcript into its prompt and response
///
/// The transcript marker is tried before the image-response marker. The
/// chosen marker must occur exactly once.
pub fn split_transcript(content: &str) -> Result<(String, String)> {
    let marker = [RESPONSE_MARKER, IMAGE_RESPONSE_MARKER]
        .into_iter()
        .find(|m| content.contains(m))
        .ok_or_else(|| {
            AnalystError::InvalidInput(format!(
                "unexpected file format; it must contain '{RESPONSE_MARKER}' or '{IMAGE_RESPONSE_MARKER}'"
            ))
        })?;

    let parts: Vec<&str> = content.split(marker).collect();
    let [prompt, response] = parts.as_slice() else {
        return Err(AnalystError::InvalidInput(
            "the file could not be split into PROMPT and RESPONSE".to_string(),
        ));
    };

    Ok((
        prompt.replace(PROMPT_MARKER, "").trim().to_string(),
        response.trim().to_string(),
    ))
}

/// Count prompt and response tokens of `content` with `model`
pub async fn estimate(llm: &dyn LLMProvider, model: &str, content: &str) -> Result<TokenCost> {
    let (prompt, response) = split_transcript(content)?;

    let input_tokens = llm.count_tokens(model, &prompt).await?;
    let output_tokens = llm.count_tokens(model, &response).await?;
    debug!("Counted {} input and {} output tokens", input_tokens, output_tokens);

    Ok(TokenCost {
        input_tokens,
        output_tokens,
    })
}

/// Estimate the cost of the transcript named `file_name`
///
/// The file is looked up in the output directory first, then as given.
pub async fn run(
    llm: &dyn LLMProvider,
    sink: &ReportSink,
    model: &str,
    file_name: &str,
) -> Result<TokenCost> {
    let path = sink.resolve(file_name.trim());
    let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            AnalystError::DataUnavailable {
                item: file_name.to_string(),
                reason: "file not found".to_string(),
            }
        } else {
            AnalystError::IoError(e)
        }
    })?;

    estimate(llm, model, &content).await
}
