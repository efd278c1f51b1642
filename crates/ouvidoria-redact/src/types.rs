//! Request and result types shared by both redaction tiers.

use ouvidoria_core::config::DEFAULT_LANGUAGE;
use serde::Serialize;

/// Which tier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactionSource {
    Remote,
    Local,
}

/// Body sent to the remote detector (`POST /api/processar`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedactionRequest {
    #[serde(rename = "texto")]
    pub text: String,
    pub language: String,
}

impl RedactionRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: DEFAULT_LANGUAGE.into(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Outcome of redacting one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionResult {
    pub original_text: String,
    pub redacted_text: String,
    /// Number of substitutions performed.
    pub hidden_count: usize,
    pub source: RedactionSource,
}

impl RedactionResult {
    pub fn new(
        original_text: impl Into<String>,
        redacted_text: impl Into<String>,
        hidden_count: usize,
        source: RedactionSource,
    ) -> Self {
        Self {
            original_text: original_text.into(),
            redacted_text: redacted_text.into(),
            hidden_count,
            source,
        }
    }

    /// Result for text that needed no redaction.
    pub fn unchanged(text: &str, source: RedactionSource) -> Self {
        Self::new(text, text, 0, source)
    }
}
