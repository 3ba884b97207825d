//! MiniJinja-backed templates

use crate::{Language, PromptError, PromptTemplate, Result};
use minijinja::Environment;
use std::collections::HashMap;

/// A prompt template rendered with MiniJinja
///
/// Standard Jinja2 syntax applies (`{{ var }}`, `{% for %}`, `{% if %}`).
/// Every variant is compiled once when the template is built, so syntax
/// errors surface at registration instead of at render time.
///
/// # Examples
///
/// ```
/// use analyst_prompt::{JinjaTemplate, Language, PromptTemplate};
/// use serde_json::json;
///
/// let template = JinjaTemplate::bilingual(
///     "headline",
///     "News about {{ company }}",
///     "Noticias sobre {{ company }}",
/// )
/// .unwrap();
///
/// let es = template
///     .render(&Language::Spanish, &json!({ "company": "Apple" }))
///     .unwrap();
/// assert_eq!(es, "Noticias sobre Apple");
/// ```
pub struct JinjaTemplate {
    name: String,
    templates: HashMap<Language, String>,
}

impl JinjaTemplate {
    pub fn builder(name: impl Into<String>) -> JinjaTemplateBuilder {
        JinjaTemplateBuilder::new(name)
    }

    /// English-only template
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Result<Self> {
        Self::builder(name).english(template).build()
    }

    /// English and Spanish variants
    pub fn bilingual(
        name: impl Into<String>,
        english: impl Into<String>,
        spanish: impl Into<String>,
    ) -> Result<Self> {
        Self::builder(name).english(english).spanish(spanish).build()
    }
}

impl PromptTemplate for JinjaTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn languages(&self) -> Vec<Language> {
        self.templates.keys().cloned().collect()
    }

    fn render(&self, lang: &Language, vars: &serde_json::Value) -> Result<String> {
        let source = self
            .templates
            .get(lang)
            .ok_or_else(|| PromptError::TemplateNotFound {
                name: self.name.clone(),
                language: lang.code().to_string(),
            })?;

        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);

        let value = minijinja::Value::from_serialize(vars);
        env.render_str(source, value)
            .map_err(|e| PromptError::RenderError {
                name: self.name.clone(),
                detail: e.to_string(),
            })
    }

    fn raw_template(&self, lang: &Language) -> Option<&str> {
        self.templates.get(lang).map(String::as_str)
    }
}

impl std::fmt::Debug for JinjaTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JinjaTemplate")
            .field("name", &self.name)
            .field("languages", &self.templates.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`JinjaTemplate`]
pub struct JinjaTemplateBuilder {
    name: String,
    templates: HashMap<Language, String>,
}

impl JinjaTemplateBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            templates: HashMap::new(),
        }
    }

    /// Add a variant for `lang`, replacing any previous one
    pub fn template(mut self, lang: Language, content: impl Into<String>) -> Self {
        self.templates.insert(lang, content.into());
        self
    }

    pub fn english(self, content: impl Into<String>) -> Self {
        self.template(Language::English, content)
    }

    pub fn spanish(self, content: impl Into<String>) -> Self {
        self.template(Language::Spanish, content)
    }

    /// Compile every variant and build the template
    pub fn build(self) -> Result<JinjaTemplate> {
        if self.templates.is_empty() {
            return Err(PromptError::NoTemplatesProvided(self.name));
        }

        let env = Environment::new();
        for (lang, content) in &self.templates {
            env.template_from_str(content)
                .map_err(|e| PromptError::TemplateParseFailed {
                    name: self.name.clone(),
                    language: lang.code().to_string(),
                    detail: e.to_string(),
                })?;
        }

        Ok(JinjaTemplate {
            name: self.name,
            templates: self.templates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_bilingual_render() {
        let template = JinjaTemplate::bilingual(
            "sentiment",
            "Analyze the sentiment about {{ company }}.",
            "Analiza el sentimiento sobre {{ company }}.",
        )
        .unwrap();

        let vars = json!({ "company": "Apple" });
        assert_eq!(
            template.render(&Language::English, &vars).unwrap(),
            "Analyze the sentiment about Apple."
        );
        assert_eq!(
            template.render(&Language::Spanish, &vars).unwrap(),
            "Analiza el sentimiento sobre Apple."
        );
    }

    #[test]
    fn test_loop_over_news() {
        let template = JinjaTemplate::new(
            "news",
            "News:\n{% for item in news %}{{ item }}\n{% endfor %}",
        )
        .unwrap();

        let text = template
            .render(
                &Language::English,
                &json!({ "news": ["Apple beats estimates", "iPhone sales slow"] }),
            )
            .unwrap();
        assert_eq!(text, "News:\nApple beats estimates\niPhone sales slow\n");
    }

    #[test]
    fn test_trailing_newline_kept() {
        let template = JinjaTemplate::new("t", "line\n").unwrap();
        assert_eq!(template.render(&Language::English, &json!({})).unwrap(), "line\n");
    }

    #[test]
    fn test_conditional_section() {
        let template = JinjaTemplate::new(
            "c",
            "{% if headlines %}Recent headlines included{% else %}No headlines{% endif %}",
        )
        .unwrap();

        let with = template
            .render(&Language::English, &json!({ "headlines": true }))
            .unwrap();
        assert_eq!(with, "Recent headlines included");

        let without = template.render(&Language::English, &json!({})).unwrap();
        assert_eq!(without, "No headlines");
    }

    #[test]
    fn test_no_templates_error() {
        let err = JinjaTemplate::builder("empty").build().unwrap_err();
        assert!(matches!(err, PromptError::NoTemplatesProvided(_)));
    }

    #[test]
    fn test_parse_error_names_language() {
        let err = JinjaTemplate::builder("broken")
            .english("fine")
            .spanish("{{ sin cerrar")
            .build()
            .unwrap_err();
        match err {
            PromptError::TemplateParseFailed { name, language, .. } => {
                assert_eq!(name, "broken");
                assert_eq!(language, "es");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_variant() {
        let template = JinjaTemplate::new("t", "Hello").unwrap();
        assert!(template.render(&Language::Spanish, &json!({})).is_err());
        assert_eq!(
            template
                .render_with_fallback(&Language::Spanish, &json!({}))
                .unwrap(),
            "Hello"
        );
    }

    #[test]
    fn test_debug_lists_name() {
        let template = JinjaTemplate::bilingual("macro", "a", "b").unwrap();
        assert!(format!("{template:?}").contains("macro"));
    }
}
