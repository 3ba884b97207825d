//! Fluent builder for data sections embedded in prompts

/// Assembles plain-text data blocks line by line
///
/// Used for the parts of a prompt that are generated from data (per-year
/// indicator blocks, per-company figures) before they are passed into a
/// template.
///
/// # Examples
///
/// ```
/// use analyst_prompt::PromptBuilder;
///
/// let block = PromptBuilder::new()
///     .title("=== YEARLY AVERAGES ===")
///     .blank_line()
///     .banner("2024")
///     .field("Inflation", "3.10%")
///     .build();
///
/// assert_eq!(block, "=== YEARLY AVERAGES ===\n\n--- 2024 ---\nInflation: 3.10%\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    parts: Vec<String>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw text, no newline added
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.parts.push(content.into());
        self
    }

    /// Text followed by a newline
    pub fn line(self, content: impl Into<String>) -> Self {
        let mut content = content.into();
        content.push('\n');
        self.text(content)
    }

    /// A title line, same as [`line`](Self::line)
    pub fn title(self, title: impl Into<String>) -> Self {
        self.line(title)
    }

    pub fn blank_line(self) -> Self {
        self.text("\n")
    }

    /// `--- label ---` on its own line
    pub fn banner(self, label: impl std::fmt::Display) -> Self {
        self.line(format!("--- {label} ---"))
    }

    /// `key: value` on its own line
    pub fn field(self, key: impl std::fmt::Display, value: impl std::fmt::Display) -> Self {
        self.line(format!("{key}: {value}"))
    }

    pub fn bullet(self, content: impl std::fmt::Display) -> Self {
        self.line(format!("- {content}"))
    }

    /// Apply `f` when `condition` holds
    pub fn when(self, condition: bool, f: impl FnOnce(Self) -> Self) -> Self {
        if condition { f(self) } else { self }
    }

    /// Apply `f` once per item
    pub fn each<I, F>(self, items: I, mut f: F) -> Self
    where
        I: IntoIterator,
        F: FnMut(Self, I::Item) -> Self,
    {
        items.into_iter().fold(self, |builder, item| f(builder, item))
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn build(self) -> String {
        self.parts.concat()
    }
}

impl From<PromptBuilder> for String {
    fn from(builder: PromptBuilder) -> Self {
        builder.build()
    }
}
