//! Environment lookup used by configuration loaders

use std::collections::HashMap;
use std::path::PathBuf;

/// A source of configuration values keyed by variable name
///
/// Blank values are reported as absent, so `FRED_API_KEY=` in a `.env` file
/// behaves the same as not setting the key at all.
pub trait EnvSource {
    /// Look up a variable, returning `None` when it is unset or blank
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().and_then(non_blank)
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned().and_then(non_blank)
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| (*v).to_string()).and_then(non_blank)
    }
}

/// Load a `.env` file from the current directory or its parents
///
/// Returns the path of the loaded file; a missing file is not an error.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!("Failed to load .env file: {}", e);
            None
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
