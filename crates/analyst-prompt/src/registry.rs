//! Prompt template registry

use crate::{Language, PromptError, PromptTemplate, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe lookup of templates by name, rendered in a default language
///
/// # Examples
///
/// ```
/// use analyst_prompt::{JinjaTemplate, Language, PromptRegistry};
/// use serde_json::json;
///
/// let registry = PromptRegistry::with_language(Language::Spanish);
/// registry.register(
///     JinjaTemplate::bilingual("title", "Report for {{ year }}", "Informe {{ year }}").unwrap(),
/// );
///
/// let text = registry.render("title", &json!({ "year": 2024 })).unwrap();
/// assert_eq!(text, "Informe 2024");
/// ```
pub struct PromptRegistry {
    templates: RwLock<HashMap<String, Arc<dyn PromptTemplate>>>,
    default_language: Language,
}

impl PromptRegistry {
    /// Empty registry rendering in English
    pub fn new() -> Self {
        Self::with_language(Language::English)
    }

    pub fn with_language(lang: Language) -> Self {
        Self {
            templates: RwLock::new(HashMap::new()),
            default_language: lang,
        }
    }

    pub fn default_language(&self) -> &Language {
        &self.default_language
    }

    /// Register a template, replacing one with the same name
    pub fn register<T: PromptTemplate + 'static>(&self, template: T) {
        if let Ok(mut templates) = self.templates.write() {
            templates.insert(template.name().to_string(), Arc::new(template));
        }
    }

    pub fn register_all<T: PromptTemplate + 'static>(&self, templates: Vec<T>) {
        for template in templates {
            self.register(template);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn PromptTemplate>> {
        self.templates.read().ok()?.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates
            .read()
            .map(|t| t.contains_key(name))
            .unwrap_or(false)
    }

    /// Render `name` in the default language, with English fallback
    pub fn render(&self, name: &str, vars: &serde_json::Value) -> Result<String> {
        self.render_with_lang(name, &self.default_language, vars)
    }

    /// Render `name` in `lang`, with English fallback
    pub fn render_with_lang(
        &self,
        name: &str,
        lang: &Language,
        vars: &serde_json::Value,
    ) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| PromptError::TemplateNotRegistered(name.to_string()))?;

        template.render_with_fallback(lang, vars)
    }

    /// Registered names, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .templates
            .read()
            .map(|t| t.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.templates.read().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PromptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRegistry")
            .field("default_language", &self.default_language)
            .field("templates", &self.list())
            .finish()
    }
}
