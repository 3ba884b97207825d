//! Prompt templates for analyst-rs
//!
//! Templates are MiniJinja sources with an English and a Spanish variant,
//! looked up by name in a [`PromptRegistry`] that renders in the configured
//! language and falls back to English. [`PromptBuilder`] assembles the
//! data-driven blocks that get interpolated into those templates.
//!
//! ```
//! use analyst_prompt::{JinjaTemplate, Language, PromptBuilder, PromptRegistry};
//! use serde_json::json;
//!
//! let registry = PromptRegistry::with_language(Language::English);
//! registry.register(
//!     JinjaTemplate::bilingual("report", "Data:\n{{ data }}", "Datos:\n{{ data }}").unwrap(),
//! );
//!
//! let data = PromptBuilder::new().field("VIX", "18.20").build();
//! let prompt = registry.render("report", &json!({ "data": data })).unwrap();
//! assert_eq!(prompt, "Data:\nVIX: 18.20\n");
//! ```

mod builder;
mod error;
mod jinja;
mod language;
mod registry;
mod template;

pub use builder::PromptBuilder;
pub use error::{PromptError, Result};
pub use jinja::{JinjaTemplate, JinjaTemplateBuilder};
pub use language::Language;
pub use registry::PromptRegistry;
pub use template::PromptTemplate;

