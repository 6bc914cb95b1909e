//! Immutable recognition session configuration.

use std::fmt;
use std::str::FromStr;

use crate::error::SttError;

/// Recognition language model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageModel {
    /// Biased toward short, search-style phrases
    WebSearch,
    /// Biased toward free-form sentences
    FreeForm,
}

impl LanguageModel {
    /// Token identifying this model to the engine.
    pub fn as_token(&self) -> &'static str {
        match self {
            LanguageModel::WebSearch => "web_search",
            LanguageModel::FreeForm => "free_form",
        }
    }
}

impl FromStr for LanguageModel {
    type Err = SttError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web_search" => Ok(LanguageModel::WebSearch),
            "free_form" => Ok(LanguageModel::FreeForm),
            other => Err(SttError::InvalidLanguageModel(other.to_string())),
        }
    }
}

impl fmt::Display for LanguageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Configuration handed to the engine on every `start_listening` call.
/// Built once by the adapter; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    language_model: LanguageModel,
    calling_identity: String,
}

impl SessionConfig {
    pub(crate) fn new(language_model: LanguageModel, calling_identity: impl Into<String>) -> Self {
        Self { language_model, calling_identity: calling_identity.into() }
    }

    pub fn language_model(&self) -> LanguageModel {
        self.language_model
    }

    /// Identity of the application requesting recognition.
    pub fn calling_identity(&self) -> &str {
        &self.calling_identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_model_tokens() {
        assert_eq!("web_search".parse::<LanguageModel>().unwrap(), LanguageModel::WebSearch);
        assert_eq!("free_form".parse::<LanguageModel>().unwrap(), LanguageModel::FreeForm);
        assert_eq!(LanguageModel::FreeForm.to_string(), "free_form");
    }

    #[test]
    fn test_parse_rejects_other_tokens() {
        for token in ["", "WEB_SEARCH", "freeform", "dictation"] {
            match token.parse::<LanguageModel>() {
                Err(SttError::InvalidLanguageModel(t)) => assert_eq!(t, token),
                other => panic!("expected InvalidLanguageModel for '{}', got {:?}", token, other),
            }
        }
    }
}
