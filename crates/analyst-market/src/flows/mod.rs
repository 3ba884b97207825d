//! Analysis flows
//!
//! A flow gathers data from its sources, renders a prompt, makes a single
//! language-model call and saves the transcript. Flows take their sources as
//! trait objects; [`Assistant`] wires them to the real API clients.

mod assistant;
pub mod fundamental;
pub mod image;
pub mod macro_analysis;
pub mod sentiment;
pub mod token_cost;

pub use assistant::Assistant;
pub use fundamental::CompanySnapshot;
pub use image::ImageOutcome;
pub use token_cost::TokenCost;

use crate::error::Result;
use crate::report::ReportSink;
use analyst_llm::{CompletionRequest, LLMProvider};
use analyst_prompt::PromptRegistry;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Which analysis produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AnalysisKind {
    Fundamental,
    Sentiment,
    Macro,
}

/// A generated analysis and where its transcript was saved
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub kind: AnalysisKind,
    /// Transcript label, e.g. `Sentiment Analysis Apple`
    pub title: String,
    pub prompt: String,
    /// Model answer, possibly empty
    pub text: String,
    /// `None` when the transcript could not be written
    pub saved_to: Option<PathBuf>,
    pub generated_at: DateTime<Local>,
}

/// Collaborators shared by every flow
#[derive(Clone, Copy)]
pub struct FlowEnv<'a> {
    pub llm: &'a dyn LLMProvider,
    pub prompts: &'a PromptRegistry,
    pub sink: &'a ReportSink,
}

impl<'a> FlowEnv<'a> {
    pub fn new(llm: &'a dyn LLMProvider, prompts: &'a PromptRegistry, sink: &'a ReportSink) -> Self {
        Self { llm, prompts, sink }
    }

    /// Send `prompt` to `model`, save the transcript under `title`
    pub(crate) async fn complete_and_save(
        &self,
        kind: AnalysisKind,
        title: String,
        model: &str,
        prompt: String,
    ) -> Result<AnalysisReport> {
        info!("Requesting {} from {} ({})", title, self.llm.name(), model);
        let response = self
            .llm
            .complete(CompletionRequest::prompt(model, prompt.as_str()))
            .await?;

        let saved_to = self.sink.save_transcript(&title, &prompt, &response.text);
        Ok(AnalysisReport {
            kind,
            title,
            prompt,
            text: response.text,
            saved_to,
            generated_at: Local::now(),
        })
    }
}
