// Keyword intent matching
// Ordered intent table with canned per-language responses

pub mod cleaning;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::translation::PIVOT_LANGUAGE;
use crate::{FaqError, Result};

pub use cleaning::{clean_text, unescape_html};

const BUILTIN_INTENTS: &str = include_str!("../../data/intents.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    pub keywords: Vec<String>,
}

/// On-disk layout: ordered intents plus `intent -> {lang_code: text}`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IntentFile {
    intents: Vec<Intent>,
    responses: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentTable {
    intents: Vec<Intent>,
    responses: BTreeMap<String, BTreeMap<String, String>>,
}

impl IntentTable {
    /// Build a table, normalizing keywords with [`clean_text`] so they
    /// compare against cleaned user input
    #[inline]
    pub fn new(
        intents: Vec<Intent>,
        responses: BTreeMap<String, BTreeMap<String, String>>,
    ) -> Result<Self> {
        if intents.is_empty() {
            return Err(FaqError::Data("Intent table must contain at least one intent".to_string()));
        }

        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(intents.len());

        for intent in intents {
            if intent.name.trim().is_empty() {
                return Err(FaqError::Data("Intent names cannot be blank".to_string()));
            }
            if !seen.insert(intent.name.clone()) {
                return Err(FaqError::Data(format!("Duplicate intent: {}", intent.name)));
            }

            let keywords: Vec<String> = intent
                .keywords
                .iter()
                .map(|k| clean_text(k))
                .filter(|k| !k.is_empty())
                .collect();
            if keywords.is_empty() {
                return Err(FaqError::Data(format!(
                    "Intent {} has no usable keywords",
                    intent.name
                )));
            }

            let has_english = responses
                .get(&intent.name)
                .and_then(|by_lang| by_lang.get(PIVOT_LANGUAGE))
                .is_some_and(|text| !text.trim().is_empty());
            if !has_english {
                return Err(FaqError::Data(format!(
                    "Intent {} has no English response",
                    intent.name
                )));
            }

            normalized.push(Intent {
                name: intent.name,
                keywords,
            });
        }

        if let Some(orphan) = responses.keys().find(|name| !seen.contains(*name)) {
            return Err(FaqError::Data(format!(
                "Response defined for unknown intent: {}",
                orphan
            )));
        }

        Ok(Self {
            intents: normalized,
            responses,
        })
    }

    #[inline]
    pub fn from_json(json: &str) -> Result<Self> {
        let file: IntentFile = serde_json::from_str(json)
            .map_err(|e| FaqError::Data(format!("Failed to parse intent table: {}", e)))?;
        Self::new(file.intents, file.responses)
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading intent table from {}", path.display());

        let content = fs::read_to_string(path)?;
        let table = Self::from_json(&content)?;

        info!("Loaded {} intents from {}", table.len(), path.display());
        Ok(table)
    }

    /// The intent table bundled with the binary
    #[inline]
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_INTENTS)
    }

    #[inline]
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(Self::builtin, Self::load)
    }

    /// First intent, in table order, with a keyword occurring in `cleaned`
    #[inline]
    pub fn match_intent(&self, cleaned: &str) -> Option<&Intent> {
        let matched = self.intents.iter().find(|intent| {
            intent
                .keywords
                .iter()
                .any(|keyword| cleaned.contains(keyword.as_str()))
        });

        debug!(
            "Intent match for {:?}: {:?}",
            cleaned,
            matched.map(|i| i.name.as_str())
        );
        matched
    }

    /// Clean `text` and match it
    #[inline]
    pub fn classify(&self, text: &str) -> Option<&Intent> {
        self.match_intent(&clean_text(text))
    }

    #[inline]
    pub fn english_response(&self, intent: &str) -> Option<&str> {
        self.response(intent, PIVOT_LANGUAGE)
    }

    /// Hand-written response for `intent` in `lang`, if the table has one
    #[inline]
    pub fn response(&self, intent: &str, lang: &str) -> Option<&str> {
        self.responses
            .get(intent)
            .and_then(|by_lang| by_lang.get(lang))
            .map(String::as_str)
    }

    #[inline]
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    #[inline]
    pub fn contains(&self, intent: &str) -> bool {
        self.intents.iter().any(|i| i.name == intent)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}
