
use tracing::debug;

use super::{LanguagePair, TranslationError, Translator, language_name};
use crate::ollama::{OllamaClient, OllamaError};

/// Translator backed by a single Ollama generation model.
///
/// The model is prompted per request with the source and target language
/// names, so one multilingual model can serve every registered pair.
#[derive(Debug, Clone)]
pub struct OllamaTranslator {
    client: OllamaClient,
    model: String,
}

impl OllamaTranslator {
    #[inline]
    pub fn new(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(pair: &LanguagePair) -> String {
        format!(
            "You are a translator for a college help desk. \
             Translate the user's message from {} to {}. \
             Return ONLY the translated text, nothing else. \
             Preserve names, dates, numbers and URLs as-is.",
            language_name(&pair.source),
            language_name(&pair.target),
        )
    }

    fn map_error(&self, error: OllamaError) -> TranslationError {
        match error {
            OllamaError::Status(404) | OllamaError::ModelNotFound { .. } => {
                TranslationError::ModelUnavailable {
                    model: self.model.clone(),
                }
            }
            other => TranslationError::Transient(other.to_string()),
        }
    }
}

impl Translator for OllamaTranslator {
    #[inline]
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        let pair = LanguagePair::new(source, target);
        debug!("Translating {} characters ({}) with {}", text.len(), pair, self.model);

        let response = self
            .client
            .generate(&self.model, &Self::system_prompt(&pair), text)
            .map_err(|e| self.map_error(e))?;

        let translated = response.trim();
        if translated.is_empty() {
            return Err(TranslationError::Transient(format!(
                "model {} returned an empty translation",
                self.model
            )));
        }

        Ok(translated.to_string())
    }
}
