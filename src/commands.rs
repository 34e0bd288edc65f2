use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::{Config, PipelineMode};
use crate::faq::FaqSet;
use crate::intents::IntentTable;
use crate::language::{LanguageDetector, ScriptDetector};
use crate::ollama::OllamaClient;
use crate::pipeline::{
    KeywordPipeline, Pipeline, Reply, ReplySource, ResponseAssembler, SemanticPipeline,
};
use crate::retrieval::{OllamaEmbedder, SemanticMatcher};
use crate::session::ChatSession;
use crate::translation::{Translator, TranslatorRegistry};

/// Which data `faq-bot list` prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ListTarget {
    Faq,
    Intents,
}

/// Build the pipeline for `mode` from the loaded configuration.
///
/// Offline mode skips Ollama entirely: the translator registry is empty and
/// the keyword pipeline is used whatever mode was asked for.
#[inline]
pub fn build_pipeline(config: &Config, mode: PipelineMode, offline: bool) -> Result<Box<dyn Pipeline>> {
    let detector: Arc<dyn LanguageDetector> =
        Arc::new(ScriptDetector::new(config.translation.default_language.clone()));

    let mode = if offline && mode == PipelineMode::Semantic {
        warn!("Offline mode has no embedding model, switching to keyword matching");
        PipelineMode::Keyword
    } else {
        mode
    };

    let translator: Arc<dyn Translator> = if offline {
        Arc::new(TranslatorRegistry::empty())
    } else {
        let client = OllamaClient::new(&config.ollama).context("Failed to create Ollama client")?;
        let registry = TranslatorRegistry::from_config(
            &config.translation,
            &client,
            &config.ollama.translation_model,
        )
        .context("Failed to build translator registry")?;
        Arc::new(registry)
    };
    let assembler = ResponseAssembler::new(translator);

    match mode {
        PipelineMode::Keyword => {
            let intents = IntentTable::load_or_builtin(config.data.intents_path.as_deref())
                .context("Failed to load intent table")?;
            info!("Loaded {} intents", intents.len());
            Ok(Box::new(KeywordPipeline::new(
                detector,
                assembler,
                intents,
                config.chat.fallback_message.clone(),
            )))
        }
        PipelineMode::Semantic => {
            let faq = FaqSet::load_or_builtin(config.data.faq_path.as_deref())
                .context("Failed to load FAQ data")?;
            let client = OllamaClient::new(&config.ollama).context("Failed to create Ollama client")?;
            let embedder = OllamaEmbedder::new(client, config.ollama.embedding_model.clone());

            let bar = if console::user_attended_stderr() {
                ProgressBar::new_spinner().with_style(
                    ProgressStyle::with_template("{spinner} Embedding {msg}")
                        .context("Invalid progress template")?,
                )
            } else {
                ProgressBar::hidden()
            };
            bar.set_message(format!("{} FAQ questions", faq.len()));
            bar.enable_steady_tick(std::time::Duration::from_millis(100));
            let matcher = SemanticMatcher::build(faq, embedder);
            bar.finish_and_clear();

            let matcher = matcher.with_context(|| {
                format!(
                    "Failed to embed FAQ questions with '{}'. Is Ollama running at {}:{}?",
                    config.ollama.embedding_model, config.ollama.host, config.ollama.port
                )
            })?;
            Ok(Box::new(SemanticPipeline::new(detector, assembler, matcher)))
        }
    }
}

/// Answer a single question and print the reply
#[inline]
pub fn ask(config: &Config, text: &str, mode: PipelineMode, offline: bool) -> Result<()> {
    let pipeline = build_pipeline(config, mode, offline)?;
    let mut session = ChatSession::new();

    match session.handle_turn(pipeline.as_ref(), text)? {
        Some(reply) => {
            println!("{}", reply.text);
            info!("Reply source: {}", describe_source(&reply));
        }
        None => println!("Nothing to answer."),
    }

    Ok(())
}

/// Interactive chat loop on the terminal
#[inline]
pub fn run_chat(config: &Config, mode: PipelineMode, offline: bool) -> Result<()> {
    let pipeline = build_pipeline(config, mode, offline)?;
    let mut session = ChatSession::new();

    println!("{}", style("🎓 College FAQ Bot").bold().cyan());
    println!("Ask in English or any supported Indian language.");
    println!(
        "Type {} to reset the conversation, {} to leave.",
        style("/clear").yellow(),
        style("/quit").yellow()
    );
    println!();

    loop {
        let input = match Input::<String>::new()
            .with_prompt(style("You").bold().green().to_string())
            .allow_empty(true)
            .interact_text()
        {
            Ok(input) => input,
            // EOF or a closed terminal ends the chat
            Err(_) => break,
        };

        match input.trim() {
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear();
                println!("{}", style("Conversation cleared.").dim());
                continue;
            }
            _ => {}
        }

        match session.handle_turn(pipeline.as_ref(), &input) {
            Ok(Some(reply)) => {
                println!("{} {}", style("Bot:").bold().cyan(), reply.text);
                println!("    {}", style(describe_source(&reply)).dim());
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Turn failed: {}", e);
                println!("{} {}", style("⚠️  Could not answer:").yellow(), e);
            }
        }
    }

    println!("Goodbye! ({} messages exchanged)", session.len());
    Ok(())
}

/// Print the FAQ entries or the intent table
#[inline]
pub fn list(config: &Config, target: ListTarget) -> Result<()> {
    match target {
        ListTarget::Faq => list_faq(config),
        ListTarget::Intents => list_intents(config),
    }
}

#[inline]
pub fn list_faq(config: &Config) -> Result<()> {
    let faq = FaqSet::load_or_builtin(config.data.faq_path.as_deref())
        .context("Failed to load FAQ data")?;

    println!("FAQ Entries ({} total):", faq.len());
    println!();
    for (i, entry) in faq.entries().iter().enumerate() {
        println!("{:>3}. {}", i, style(&entry.question_en).bold());
        println!("     {}", entry.answer_en);
    }

    Ok(())
}

#[inline]
pub fn list_intents(config: &Config) -> Result<()> {
    let intents = IntentTable::load_or_builtin(config.data.intents_path.as_deref())
        .context("Failed to load intent table")?;

    println!("Intents ({} total, matched in this order):", intents.len());
    println!();
    for intent in intents.intents() {
        println!("📌 {}", style(&intent.name).bold());
        println!("   Keywords: {}", intent.keywords.join(", "));
        if let Some(response) = intents.english_response(&intent.name) {
            println!("   Response: {}", response);
        }
    }

    Ok(())
}

/// Check Ollama and the configured models
#[inline]
pub fn show_status(config: &Config) -> Result<()> {
    let client = OllamaClient::new(&config.ollama).context("Failed to create Ollama client")?;

    println!("Ollama: {}", style(client.base_url()).cyan());
    let models = [
        config.ollama.embedding_model.as_str(),
        config.ollama.translation_model.as_str(),
    ];
    match client.health_check(&models) {
        Ok(()) => println!("  {}", style("✓ reachable, models available").green()),
        Err(e) => println!("  {} {}", style("✗").red(), e),
    }

    println!("Default mode: {}", config.chat.mode);
    println!(
        "Languages: {} (undetected input treated as {})",
        config.translation.languages.join(", "),
        config.translation.default_language
    );

    Ok(())
}

/// One-line description of where a reply came from
#[inline]
pub fn describe_source(reply: &Reply) -> String {
    match &reply.source {
        ReplySource::Faq { index, distance } => {
            format!("[{}] FAQ #{} (distance {:.3})", reply.language, index, distance)
        }
        ReplySource::Intent { name } => format!("[{}] intent '{}'", reply.language, name),
        ReplySource::Fallback => format!("[{}] no match", reply.language),
    }
}
