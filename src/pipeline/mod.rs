//! Per-turn request handling.
//!
//! Both pipelines detect the user's language, resolve an English answer and
//! hand it to the [`ResponseAssembler`] for translation back. Translation
//! and detection failures degrade to English; only the embedding step of
//! the semantic pipeline can fail a turn.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::{debug, info};

use crate::Result;
use crate::intents::{IntentTable, clean_text};
use crate::language::LanguageDetector;
use crate::retrieval::{Embedder, SemanticMatcher};
use crate::translation::{PIVOT_LANGUAGE, Translator, translate_or_original};

/// Where a reply came from
#[derive(Debug, Clone, PartialEq)]
pub enum ReplySource {
    Faq { index: usize, distance: f32 },
    Intent { name: String },
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Detected language of the user's message
    pub language: String,
    /// Text the answer was resolved from: the English translation for the
    /// semantic pipeline, the cleaned input for the keyword pipeline
    pub query: String,
    pub text: String,
    pub source: ReplySource,
}

pub trait Pipeline {
    fn respond(&self, input: &str) -> Result<Reply>;
}

/// Turns an English answer into the user's language.
///
/// Answers are always written in [`PIVOT_LANGUAGE`], whatever the detector
/// falls back to, so every route runs from or to English.
pub struct ResponseAssembler {
    translator: Arc<dyn Translator>,
}

impl ResponseAssembler {
    #[inline]
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    /// English text verbatim for English users, otherwise its translation,
    /// or the English text again if translation fails
    #[inline]
    pub fn assemble(&self, english: &str, lang: &str) -> String {
        if lang == PIVOT_LANGUAGE {
            return english.to_string();
        }
        translate_or_original(self.translator.as_ref(), english, PIVOT_LANGUAGE, lang)
    }

    /// Bring user input into the pivot language, keeping it as-is on failure
    #[inline]
    pub fn to_pivot(&self, input: &str, lang: &str) -> String {
        if lang == PIVOT_LANGUAGE {
            return input.to_string();
        }
        translate_or_original(self.translator.as_ref(), input, lang, PIVOT_LANGUAGE)
    }
}

/// Pipeline A: translate in, nearest FAQ question, translate out
pub struct SemanticPipeline<E> {
    detector: Arc<dyn LanguageDetector>,
    assembler: ResponseAssembler,
    matcher: SemanticMatcher<E>,
}

impl<E: Embedder> SemanticPipeline<E> {
    #[inline]
    pub fn new(
        detector: Arc<dyn LanguageDetector>,
        assembler: ResponseAssembler,
        matcher: SemanticMatcher<E>,
    ) -> Self {
        Self {
            detector,
            assembler,
            matcher,
        }
    }

    #[inline]
    pub fn matcher(&self) -> &SemanticMatcher<E> {
        &self.matcher
    }
}

impl<E: Embedder> Pipeline for SemanticPipeline<E> {
    #[inline]
    fn respond(&self, input: &str) -> Result<Reply> {
        let language = self.detector.detect(input).code;
        let query = self.assembler.to_pivot(input, &language);

        let found = self.matcher.best_match(&query)?;
        let text = self.assembler.assemble(&found.entry.answer_en, &language);

        info!(
            language = %language,
            faq_index = found.index,
            distance = found.distance,
            "Answered from FAQ"
        );
        Ok(Reply {
            language,
            query,
            text,
            source: ReplySource::Faq {
                index: found.index,
                distance: found.distance,
            },
        })
    }
}

/// Pipeline B: clean, keyword-match an intent, canned answer out
pub struct KeywordPipeline {
    detector: Arc<dyn LanguageDetector>,
    assembler: ResponseAssembler,
    intents: IntentTable,
    fallback_message: String,
}

impl KeywordPipeline {
    #[inline]
    pub fn new(
        detector: Arc<dyn LanguageDetector>,
        assembler: ResponseAssembler,
        intents: IntentTable,
        fallback_message: impl Into<String>,
    ) -> Self {
        Self {
            detector,
            assembler,
            intents,
            fallback_message: fallback_message.into(),
        }
    }

    #[inline]
    pub fn intents(&self) -> &IntentTable {
        &self.intents
    }
}

impl Pipeline for KeywordPipeline {
    #[inline]
    fn respond(&self, input: &str) -> Result<Reply> {
        let language = self.detector.detect(input).code;
        let query = clean_text(input);

        let Some(intent) = self.intents.match_intent(&query) else {
            debug!("No intent matched, replying with fallback");
            return Ok(Reply {
                language,
                query,
                text: self.fallback_message.clone(),
                source: ReplySource::Fallback,
            });
        };

        let text = if let Some(localized) = self
            .intents
            .response(&intent.name, &language)
            .filter(|_| language != PIVOT_LANGUAGE)
        {
            localized.to_string()
        } else {
            let english = self.intents.english_response(&intent.name).unwrap_or_default();
            self.assembler.assemble(english, &language)
        };

        info!(language = %language, intent = %intent.name, "Answered from intent table");
        Ok(Reply {
            language,
            query,
            text,
            source: ReplySource::Intent {
                name: intent.name.clone(),
            },
        })
    }
}
