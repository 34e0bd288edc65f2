
use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info};

use super::{LanguagePair, OllamaTranslator, PIVOT_LANGUAGE, TranslationError, Translator};
use crate::config::TranslationConfig;
use crate::ollama::OllamaClient;

/// Static routing table from language pair to the translator serving it.
///
/// Built once at startup and shared by reference. Pairs that were never
/// registered fail with [`TranslationError::UnsupportedLanguage`].
#[derive(Default)]
pub struct TranslatorRegistry {
    routes: BTreeMap<LanguagePair, Box<dyn Translator>>,
}

impl fmt::Debug for TranslatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorRegistry")
            .field(
                "routes",
                &self.routes.keys().map(ToString::to_string).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl TranslatorRegistry {
    /// Registry with no routes; every translation degrades to the input text
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register both directions between English and every configured
    /// language, honouring per-pair model overrides
    #[inline]
    pub fn from_config(
        config: &TranslationConfig,
        client: &OllamaClient,
        default_model: &str,
    ) -> Result<Self, TranslationError> {
        let mut registry = Self::empty();
        for language in config.languages.iter().filter(|l| l.as_str() != PIVOT_LANGUAGE) {
            let inbound = LanguagePair::new(language.clone(), PIVOT_LANGUAGE);
            for pair in [inbound.reversed(), inbound] {
                let model = config
                    .models
                    .get(&pair.to_string())
                    .map_or(default_model, String::as_str);
                registry.register(pair, OllamaTranslator::new(client.clone(), model));
            }
        }

        // Overrides may also name pairs outside the pivot routes
        for (key, model) in &config.models {
            let pair: LanguagePair = key.parse()?;
            if !registry.supports(&pair) {
                registry.register(pair, OllamaTranslator::new(client.clone(), model.as_str()));
            }
        }

        info!("Translator registry ready with {} routes", registry.len());
        Ok(registry)
    }

    #[inline]
    pub fn register<T>(&mut self, pair: LanguagePair, translator: T)
    where
        T: Translator + 'static,
    {
        debug!("Registering translation route {}", pair);
        self.routes.insert(pair, Box::new(translator));
    }

    #[inline]
    pub fn supports(&self, pair: &LanguagePair) -> bool {
        pair.is_identity() || self.routes.contains_key(pair)
    }

    #[inline]
    pub fn pairs(&self) -> impl Iterator<Item = &LanguagePair> {
        self.routes.keys()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Translator for TranslatorRegistry {
    #[inline]
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        let pair = LanguagePair::new(source, target);
        if pair.is_identity() || text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let translator = self
            .routes
            .get(&pair)
            .ok_or_else(|| TranslationError::UnsupportedLanguage { pair: pair.clone() })?;
        translator.translate(text, source, target)
    }
}
