//! Prompt languages
//!
//! Reports are written in English or Spanish. Unknown codes are kept in
//! `Other` so a template set can still carry extra variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language a prompt is rendered in
///
/// # Examples
///
/// ```
/// use analyst_prompt::Language;
///
/// assert_eq!(Language::from_code("es"), Language::Spanish);
/// assert_eq!(Language::Spanish.code(), "es");
/// assert_eq!(Language::from_code("pt"), Language::Other("pt".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    English,
    Spanish,
    /// Any other ISO 639-1 code
    Other(String),
}

impl Language {
    /// ISO 639-1 code
    pub fn code(&self) -> &str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::Other(code) => code,
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::Other(code) => code,
        }
    }

    /// Parse an ISO 639-1 code or a common name, case-insensitively
    pub fn from_code(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" | "en-us" | "en-gb" => Language::English,
            "es" | "spanish" | "español" | "espanol" | "es-es" | "es-mx" => Language::Spanish,
            other => Language::Other(other.to_string()),
        }
    }

    /// Whether this is one of the built-in languages
    pub fn is_known(&self) -> bool {
        !matches!(self, Language::Other(_))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        Language::from_code(s)
    }
}
