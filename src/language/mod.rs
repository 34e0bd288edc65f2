//! Language detection by Unicode script.
//!
//! Every supported Indian language has its own script (or shares one with a
//! single sibling), so counting letters per script block is enough to pick a
//! language code. Detection never fails: anything that cannot be attributed
//! to a known script resolves to the configured default language.


use tracing::debug;

use crate::config::DEFAULT_LANGUAGE;

/// Result of a detection pass
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub code: String,
    /// Share of letters that belong to the winning script, 0.0 for defaults
    pub confidence: f32,
}

pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Detection;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Script {
    Latin,
    Devanagari,
    Bengali,
    Gurmukhi,
    Gujarati,
    Oriya,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Arabic,
}

const SCRIPT_COUNT: usize = 11;

impl Script {
    const ALL: [Self; SCRIPT_COUNT] = [
        Self::Latin,
        Self::Devanagari,
        Self::Bengali,
        Self::Gurmukhi,
        Self::Gujarati,
        Self::Oriya,
        Self::Tamil,
        Self::Telugu,
        Self::Kannada,
        Self::Malayalam,
        Self::Arabic,
    ];

    fn of(c: char) -> Option<Self> {
        let script = match c {
            'a'..='z' | 'A'..='Z' | '\u{00C0}'..='\u{024F}' => Self::Latin,
            '\u{0900}'..='\u{097F}' | '\u{A8E0}'..='\u{A8FF}' => Self::Devanagari,
            '\u{0980}'..='\u{09FF}' => Self::Bengali,
            '\u{0A00}'..='\u{0A7F}' => Self::Gurmukhi,
            '\u{0A80}'..='\u{0AFF}' => Self::Gujarati,
            '\u{0B00}'..='\u{0B7F}' => Self::Oriya,
            '\u{0B80}'..='\u{0BFF}' => Self::Tamil,
            '\u{0C00}'..='\u{0C7F}' => Self::Telugu,
            '\u{0C80}'..='\u{0CFF}' => Self::Kannada,
            '\u{0D00}'..='\u{0D7F}' => Self::Malayalam,
            '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}' => Self::Arabic,
            _ => return None,
        };
        Some(script)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Detector that maps the dominant script of the text to a language code
#[derive(Debug, Clone)]
pub struct ScriptDetector {
    default_code: String,
}

impl Default for ScriptDetector {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

impl ScriptDetector {
    #[inline]
    pub fn new(default_code: impl Into<String>) -> Self {
        Self {
            default_code: default_code.into(),
        }
    }

    #[inline]
    pub fn default_code(&self) -> &str {
        &self.default_code
    }

    fn fallback(&self) -> Detection {
        Detection {
            code: self.default_code.clone(),
            confidence: 0.0,
        }
    }
}

impl LanguageDetector for ScriptDetector {
    #[inline]
    fn detect(&self, text: &str) -> Detection {
        let mut counts = [0_usize; SCRIPT_COUNT];
        for script in text.chars().filter_map(Script::of) {
            counts[script.index()] += 1;
        }

        let total: usize = counts.iter().sum();
        if total == 0 {
            debug!("No letters in input, defaulting to {}", self.default_code);
            return self.fallback();
        }

        let best = counts.iter().copied().max().unwrap_or(0);
        let mut leaders = Script::ALL.iter().filter(|s| counts[s.index()] == best);
        let (Some(&script), None) = (leaders.next(), leaders.next()) else {
            debug!("Ambiguous script mix, defaulting to {}", self.default_code);
            return self.fallback();
        };

        let code = match script {
            Script::Latin => return self.fallback(),
            Script::Devanagari if text.contains('ळ') => "mr",
            Script::Devanagari => "hi",
            Script::Bengali if text.contains(['ৰ', 'ৱ']) => "as",
            Script::Bengali => "bn",
            Script::Gurmukhi => "pa",
            Script::Gujarati => "gu",
            Script::Oriya => "or",
            Script::Tamil => "ta",
            Script::Telugu => "te",
            Script::Kannada => "kn",
            Script::Malayalam => "ml",
            Script::Arabic => "ur",
        };

        let confidence = best as f32 / total as f32;

        debug!(
            "Detected language {} ({:?}, confidence {:.2})",
            code, script, confidence
        );
        Detection {
            code: code.to_string(),
            confidence,
        }
    }
}
