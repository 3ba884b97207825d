//! Core prompt template trait

use crate::{Language, PromptError, Result};

/// A named prompt with one variant per language
///
/// Variables are passed as `serde_json::Value` so the trait stays
/// dyn-compatible and templates can live behind `Arc<dyn PromptTemplate>`.
pub trait PromptTemplate: Send + Sync {
    /// Template identifier
    fn name(&self) -> &str;

    /// Languages this template has a variant for
    fn languages(&self) -> Vec<Language>;

    fn supports_language(&self, lang: &Language) -> bool {
        self.languages().contains(lang)
    }

    /// Render the variant for `lang`; fails if that variant is missing
    fn render(&self, lang: &Language, vars: &serde_json::Value) -> Result<String>;

    /// Render `lang`, else English, else whichever variant exists
    fn render_with_fallback(&self, lang: &Language, vars: &serde_json::Value) -> Result<String> {
        if self.supports_language(lang) {
            return self.render(lang, vars);
        }

        if self.supports_language(&Language::English) {
            return self.render(&Language::English, vars);
        }

        let fallback = self
            .languages()
            .into_iter()
            .next()
            .ok_or_else(|| PromptError::NoLanguageAvailable(self.name().to_string()))?;

        self.render(&fallback, vars)
    }

    /// Raw template source for a language
    fn raw_template(&self, lang: &Language) -> Option<&str>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    struct StaticTemplate {
        name: String,
        variants: HashMap<Language, String>,
    }

    impl StaticTemplate {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                variants: HashMap::new(),
            }
        }

        fn with(mut self, lang: Language, text: &str) -> Self {
            self.variants.insert(lang, text.to_string());
            self
        }
    }

    impl PromptTemplate for StaticTemplate {
        fn name(&self) -> &str {
            &self.name
        }

        fn languages(&self) -> Vec<Language> {
            self.variants.keys().cloned().collect()
        }

        fn render(&self, lang: &Language, _vars: &serde_json::Value) -> Result<String> {
            self.variants
                .get(lang)
                .cloned()
                .ok_or_else(|| PromptError::TemplateNotFound {
                    name: self.name.clone(),
                    language: lang.code().to_string(),
                })
        }

        fn raw_template(&self, lang: &Language) -> Option<&str> {
            self.variants.get(lang).map(String::as_str)
        }
    }

    #[test]
    fn test_fallback_prefers_english() {
        let template = StaticTemplate::new("report")
            .with(Language::English, "Report")
            .with(Language::Spanish, "Informe");

        let text = template
            .render_with_fallback(&Language::Other("fr".to_string()), &json!({}))
            .unwrap();
        assert_eq!(text, "Report");
    }

    #[test]
    fn test_fallback_to_only_variant() {
        let template = StaticTemplate::new("report").with(Language::Spanish, "Informe");

        let text = template
            .render_with_fallback(&Language::English, &json!({}))
            .unwrap();
        assert_eq!(text, "Informe");
    }

    #[test]
    fn test_fallback_without_variants_fails() {
        let template = StaticTemplate::new("empty");
        let err = template
            .render_with_fallback(&Language::English, &json!({}))
            .unwrap_err();
        assert!(matches!(err, PromptError::NoLanguageAvailable(name) if name == "empty"));
    }

    #[test]
    fn test_exact_render_requires_variant() {
        let template = StaticTemplate::new("report").with(Language::English, "Report");
        assert!(template.render(&Language::Spanish, &json!({})).is_err());
        assert_eq!(template.raw_template(&Language::English), Some("Report"));
    }
}
