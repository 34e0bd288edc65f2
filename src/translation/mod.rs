// Translation module
// Language-pair keyed translators with explicit failure kinds

pub mod ollama;
pub mod registry;


use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

pub use ollama::OllamaTranslator;
pub use registry::TranslatorRegistry;

/// Language the FAQ answers and intent responses are written in
pub const PIVOT_LANGUAGE: &str = "en";

/// Directed language pair, keyed as "source-target" (e.g. "hi-en")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    #[inline]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// The same pair in the opposite direction
    #[inline]
    pub fn reversed(&self) -> Self {
        Self::new(self.target.clone(), self.source.clone())
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }
}

impl fmt::Display for LanguagePair {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

impl FromStr for LanguagePair {
    type Err = TranslationError;

    #[inline]
    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key.split_once('-') {
            Some((source, target)) if !source.is_empty() && !target.is_empty() => {
                Ok(Self::new(source, target))
            }
            _ => Err(TranslationError::InvalidPair(key.to_string())),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("No translation route for {pair}")]
    UnsupportedLanguage { pair: LanguagePair },
    #[error("Translation model '{model}' is unavailable")]
    ModelUnavailable { model: String },
    #[error("Transient translation failure: {0}")]
    Transient(String),
    #[error("Invalid language pair key: {0}")]
    InvalidPair(String),
}

pub trait Translator: Send + Sync {
    fn translate(&self, text: &str, source: &str, target: &str)
    -> Result<String, TranslationError>;
}

/// Translate, returning `text` unchanged if translation fails for any reason
#[inline]
pub fn translate_or_original(
    translator: &dyn Translator,
    text: &str,
    source: &str,
    target: &str,
) -> String {
    match translator.translate(text, source, target) {
        Ok(translated) => translated,
        Err(e) => {
            warn!(
                error = %e,
                source_lang = source,
                target_lang = target,
                "Translation failed, using original text"
            );
            text.to_string()
        }
    }
}

/// English display name for a language code, used in translation prompts
#[inline]
pub fn language_name(code: &str) -> &str {
    match code {
        "en" => "English",
        "hi" => "Hindi",
        "ta" => "Tamil",
        "te" => "Telugu",
        "kn" => "Kannada",
        "ml" => "Malayalam",
        "bn" => "Bengali",
        "mr" => "Marathi",
        "gu" => "Gujarati",
        "pa" => "Punjabi",
        "or" => "Odia",
        "as" => "Assamese",
        "ur" => "Urdu",
        other => other,
    }
}
