use crate::error::AppError;
use crate::models::ExtractedText;

/// Placeholder substituted with the extracted page text.
pub const TEXT_PLACEHOLDER: &str = "{text}";

/// Characters of page text that make it into a prompt by default.
pub const DEFAULT_MAX_TEXT_CHARS: usize = 8000;

const DEFAULT_TEMPLATE: &str = "Please analyze this board game information and provide a concise summary including:
- Theme and setting
- Core mechanics
- Number of players
- Type of players who would enjoy this game (e.g., strategy enthusiasts, casual gamers, families, etc.)

Board game information:
{text}

Please provide a natural, engaging paragraph summarizing this game.";

/// Instruction wrapped around the page text before it goes to a model.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    max_text_chars: usize,
}

impl PromptTemplate {
    /// Custom template. Must contain [`TEXT_PLACEHOLDER`] exactly once.
    pub fn new(template: impl Into<String>) -> Result<Self, AppError> {
        let template = template.into();
        match template.matches(TEXT_PLACEHOLDER).count() {
            1 => Ok(Self {
                template,
                max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            }),
            n => Err(AppError::ConfigError(format!(
                "Prompt template must contain {TEXT_PLACEHOLDER} exactly once (found {n})"
            ))),
        }
    }

    /// Cap on how many characters of page text are substituted in.
    pub fn with_max_text_chars(mut self, max: usize) -> Self {
        self.max_text_chars = max;
        self
    }

    pub fn max_text_chars(&self) -> usize {
        self.max_text_chars
    }

    pub fn render(&self, text: &ExtractedText) -> String {
        let body = truncate_chars(text.as_str(), self.max_text_chars);
        self.template.replacen(TEXT_PLACEHOLDER, body, 1)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
