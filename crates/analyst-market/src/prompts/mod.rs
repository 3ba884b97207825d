//! Analysis prompts
//!
//! - `templates`: bilingual MiniJinja templates, one per flow
//! - `blocks`: the data sections rendered into those templates

mod blocks;
mod templates;

pub use blocks::{company_list, fundamental_data_block, macro_data_block};
pub use templates::*;

use analyst_prompt::{Language, PromptRegistry, Result};

/// Register every analysis prompt with `registry`
pub fn register_prompts(registry: &PromptRegistry) -> Result<()> {
    registry.register(fundamental_prompt()?);
    registry.register(sentiment_prompt()?);
    registry.register(macro_prompt()?);
    Ok(())
}

/// A registry rendering in `language` with every analysis prompt loaded
pub fn default_registry(language: Language) -> Result<PromptRegistry> {
    let registry = PromptRegistry::with_language(language);
    register_prompts(&registry)?;
    Ok(registry)
}
