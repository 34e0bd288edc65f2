use std::collections::BTreeMap;
use std::sync::Mutex;

use super::*;
use crate::FaqError;
use crate::config::DEFAULT_FALLBACK_MESSAGE;
use crate::faq::{FaqEntry, FaqSet};
use crate::intents::Intent;
use crate::language::{Detection, ScriptDetector};
use crate::translation::{LanguagePair, TranslationError, TranslatorRegistry};

struct FixedDetector(&'static str);

impl LanguageDetector for FixedDetector {
    fn detect(&self, _: &str) -> Detection {
        Detection {
            code: self.0.to_string(),
            confidence: 1.0,
        }
    }
}

/// Records every call and tags the output with the target language
#[derive(Default)]
struct RecordingTranslator {
    calls: Mutex<Vec<String>>,
}

impl RecordingTranslator {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Translator for RecordingTranslator {
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> std::result::Result<String, TranslationError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("{}-{}", source, target));
        }
        Ok(format!("[{}] {}", target, text))
    }
}

struct DownTranslator;

impl Translator for DownTranslator {
    fn translate(
        &self,
        _: &str,
        _: &str,
        _: &str,
    ) -> std::result::Result<String, TranslationError> {
        Err(TranslationError::ModelUnavailable {
            model: "opus-mt-en-ta".to_string(),
        })
    }
}

/// Embeds a text as [has "fee", has "exam"]
struct TinyEmbedder;

impl Embedder for TinyEmbedder {
    fn embed(&self, texts: &[String]) -> crate::Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let t = t.to_lowercase();
                vec![
                    if t.contains("fee") { 1.0 } else { 0.0 },
                    if t.contains("exam") { 1.0 } else { 0.0 },
                ]
            })
            .collect())
    }
}

struct OfflineEmbedder;

impl Embedder for OfflineEmbedder {
    fn embed(&self, texts: &[String]) -> crate::Result<Vec<Vec<f32>>> {
        if texts.len() > 1 {
            Ok(vec![vec![0.0]; texts.len()])
        } else {
            Err(FaqError::Embedding("connection refused".to_string()))
        }
    }
}

fn keyword_pipeline(
    detector: Arc<dyn LanguageDetector>,
    translator: Arc<dyn Translator>,
) -> KeywordPipeline {
    KeywordPipeline::new(
        detector,
        ResponseAssembler::new(translator),
        IntentTable::builtin().expect("builtin intents"),
        DEFAULT_FALLBACK_MESSAGE,
    )
}

fn semantic_pipeline<E: Embedder>(
    detector: Arc<dyn LanguageDetector>,
    translator: Arc<dyn Translator>,
    embedder: E,
) -> SemanticPipeline<E> {
    let faq = FaqSet::new(vec![
        FaqEntry {
            question_en: "What is the fee?".to_string(),
            answer_en: "Rs. 85,000 per year.".to_string(),
        },
        FaqEntry {
            question_en: "When is the exam?".to_string(),
            answer_en: "Semester exams will begin from December 10th.".to_string(),
        },
    ])
    .expect("faq should build");
    let matcher = SemanticMatcher::build(faq, embedder).expect("matcher should build");
    SemanticPipeline::new(detector, ResponseAssembler::new(translator), matcher)
}

#[test]
fn assembler_returns_english_verbatim() {
    let translator = Arc::new(RecordingTranslator::default());
    let assembler = ResponseAssembler::new(translator.clone());

    assert_eq!(assembler.assemble("Hello", "en"), "Hello");
    assert_eq!(assembler.to_pivot("Hello", "en"), "Hello");
    assert!(translator.calls().is_empty());

    assert_eq!(assembler.assemble("Hello", "hi"), "[hi] Hello");
    assert_eq!(assembler.to_pivot("नमस्ते", "hi"), "[en] नमस्ते");
    assert_eq!(translator.calls(), vec!["en-hi", "hi-en"]);
}

#[test]
fn assembler_falls_back_to_english() {
    let assembler = ResponseAssembler::new(Arc::new(DownTranslator));
    assert_eq!(assembler.assemble("Hostels are open.", "ta"), "Hostels are open.");
}

#[test]
fn english_exam_question_is_answered_verbatim() {
    let translator = Arc::new(RecordingTranslator::default());
    let pipeline = keyword_pipeline(Arc::new(ScriptDetector::default()), translator.clone());

    let reply = pipeline
        .respond("exam dates please")
        .expect("keyword pipeline never fails");

    assert_eq!(reply.language, "en");
    assert_eq!(reply.text, "Semester exams will begin from December 10th.");
    assert_eq!(
        reply.source,
        ReplySource::Intent {
            name: "exam".to_string()
        }
    );
    assert!(translator.calls().is_empty());
}

#[test]
fn tamil_hostel_question_is_translated_to_tamil() {
    let translator = Arc::new(RecordingTranslator::default());
    let pipeline = keyword_pipeline(Arc::new(FixedDetector("ta")), translator.clone());

    let reply = pipeline
        .respond("hostel பற்றி சொல்லுங்கள்")
        .expect("keyword pipeline never fails");

    assert_eq!(reply.language, "ta");
    assert_eq!(
        reply.text,
        "[ta] Hostel facilities are available for both boys and girls."
    );
    assert_eq!(translator.calls(), vec!["en-ta"]);
}

#[test]
fn tamil_hostel_question_falls_back_to_english() {
    let pipeline = keyword_pipeline(Arc::new(FixedDetector("ta")), Arc::new(DownTranslator));

    let reply = pipeline
        .respond("விடுதி பற்றி சொல்லுங்கள்")
        .expect("keyword pipeline never fails");

    assert_eq!(
        reply.text,
        "Hostel facilities are available for both boys and girls."
    );
    assert_eq!(
        reply.source,
        ReplySource::Intent {
            name: "hostel".to_string()
        }
    );
}

#[test]
fn fallback_language_does_not_change_translation_source() {
    let translator = Arc::new(RecordingTranslator::default());
    let pipeline = keyword_pipeline(Arc::new(ScriptDetector::new("hi")), translator.clone());

    // Latin text falls back to Hindi, but the canned answer is still English
    let reply = pipeline.respond("hostel please").expect("never fails");
    assert_eq!(reply.language, "hi");
    assert_eq!(
        reply.text,
        "[hi] Hostel facilities are available for both boys and girls."
    );

    pipeline
        .respond("விடுதி பற்றி சொல்லுங்கள்")
        .expect("never fails");
    assert_eq!(translator.calls(), vec!["en-hi", "en-ta"]);
}

#[test]
fn unmatched_input_gets_untranslated_fallback() {
    let translator = Arc::new(RecordingTranslator::default());
    let pipeline = keyword_pipeline(Arc::new(FixedDetector("hi")), translator.clone());

    let reply = pipeline.respond("hello there").expect("never fails");
    assert_eq!(reply.text, DEFAULT_FALLBACK_MESSAGE);
    assert_eq!(reply.source, ReplySource::Fallback);
    assert_eq!(reply.query, "hello there");
    assert!(translator.calls().is_empty());
}

#[test]
fn localized_intent_response_skips_translation() {
    let translator = Arc::new(RecordingTranslator::default());
    let intents = IntentTable::new(
        vec![Intent {
            name: "hostel".to_string(),
            keywords: vec!["hostel".to_string()],
        }],
        BTreeMap::from([(
            "hostel".to_string(),
            BTreeMap::from([
                ("en".to_string(), "Hostels are available.".to_string()),
                ("ta".to_string(), "விடுதி வசதி உள்ளது.".to_string()),
            ]),
        )]),
    )
    .expect("table should build");
    let pipeline = KeywordPipeline::new(
        Arc::new(FixedDetector("ta")),
        ResponseAssembler::new(translator.clone()),
        intents,
        "fallback",
    );

    let reply = pipeline.respond("hostel?").expect("never fails");
    assert_eq!(reply.text, "விடுதி வசதி உள்ளது.");
    assert!(translator.calls().is_empty());
    assert_eq!(pipeline.intents().len(), 1);
}

#[test]
fn semantic_pipeline_translates_in_and_out() {
    let translator = Arc::new(RecordingTranslator::default());
    let pipeline = semantic_pipeline(Arc::new(FixedDetector("hi")), translator.clone(), TinyEmbedder);

    // RecordingTranslator keeps the original words, so "fee" survives
    let reply = pipeline.respond("fee कितनी है").expect("search should succeed");

    assert_eq!(reply.language, "hi");
    assert_eq!(reply.query, "[en] fee कितनी है");
    assert_eq!(reply.text, "[hi] Rs. 85,000 per year.");
    assert!(matches!(reply.source, ReplySource::Faq { index: 0, .. }));
    assert_eq!(translator.calls(), vec!["hi-en", "en-hi"]);
}

#[test]
fn semantic_pipeline_answers_english_without_translation() {
    let translator = Arc::new(RecordingTranslator::default());
    let pipeline = semantic_pipeline(
        Arc::new(ScriptDetector::default()),
        translator.clone(),
        TinyEmbedder,
    );

    let reply = pipeline.respond("exam dates please").expect("search should succeed");
    assert_eq!(reply.text, "Semester exams will begin from December 10th.");
    assert!(matches!(reply.source, ReplySource::Faq { index: 1, .. }));
    assert!(translator.calls().is_empty());
    assert_eq!(pipeline.matcher().faq().len(), 2);
}

#[test]
fn semantic_pipeline_with_unsupported_language_answers_in_english() {
    let pipeline = semantic_pipeline(
        Arc::new(FixedDetector("fr")),
        Arc::new(TranslatorRegistry::empty()),
        TinyEmbedder,
    );

    let reply = pipeline.respond("exam").expect("search should succeed");
    assert_eq!(reply.query, "exam");
    assert_eq!(reply.text, "Semester exams will begin from December 10th.");
    assert!(!TranslatorRegistry::empty().supports(&LanguagePair::new("en", "fr")));
}

#[test]
fn semantic_pipeline_surfaces_embedding_failure() {
    let pipeline = semantic_pipeline(
        Arc::new(ScriptDetector::default()),
        Arc::new(TranslatorRegistry::empty()),
        OfflineEmbedder,
    );

    assert!(matches!(
        pipeline.respond("fees?"),
        Err(FaqError::Embedding(_))
    ));
}
