//! Error types for prompt operations

use thiserror::Error;

/// Result type for prompt operations
pub type Result<T> = std::result::Result<T, PromptError>;

/// Errors raised while building or rendering prompt templates
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Template '{name}' has no '{language}' variant")]
    TemplateNotFound { name: String, language: String },

    #[error("Failed to parse template '{name}' ({language}): {detail}")]
    TemplateParseFailed {
        name: String,
        language: String,
        detail: String,
    },

    #[error("Failed to render template '{name}': {detail}")]
    RenderError { name: String, detail: String },

    #[error("No templates provided for '{0}'")]
    NoTemplatesProvided(String),

    #[error("No language available for template '{0}'")]
    NoLanguageAvailable(String),

    #[error("Template '{0}' not registered")]
    TemplateNotRegistered(String),
}
