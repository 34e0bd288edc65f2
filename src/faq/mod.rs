
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{FaqError, Result};

const BUILTIN_FAQ: &str = include_str!("../../data/faq_data.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question_en: String,
    pub answer_en: String,
}

/// Ordered, immutable list of FAQ entries; an entry's position is its key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqSet {
    entries: Vec<FaqEntry>,
}

impl FaqSet {
    #[inline]
    pub fn new(entries: Vec<FaqEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(FaqError::Data("FAQ set must contain at least one entry".to_string()));
        }

        if let Some(position) = entries
            .iter()
            .position(|e| e.question_en.trim().is_empty() || e.answer_en.trim().is_empty())
        {
            return Err(FaqError::Data(format!(
                "FAQ entry {} has a blank question or answer",
                position
            )));
        }

        Ok(Self { entries })
    }

    #[inline]
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<FaqEntry> = serde_json::from_str(json)
            .map_err(|e| FaqError::Data(format!("Failed to parse FAQ data: {}", e)))?;
        Self::new(entries)
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading FAQ data from {}", path.display());

        let content = fs::read_to_string(path)?;
        let set = Self::from_json(&content)?;

        info!("Loaded {} FAQ entries from {}", set.len(), path.display());
        Ok(set)
    }

    /// The FAQ set bundled with the binary
    #[inline]
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_FAQ)
    }

    /// Load from `path` when given, otherwise fall back to the bundled set
    #[inline]
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(Self::builtin, Self::load)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&FaqEntry> {
        self.entries.get(index)
    }

    #[inline]
    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    #[inline]
    pub fn questions(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.question_en.clone()).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
