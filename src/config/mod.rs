// Configuration management module
// TOML settings under ~/.faq-bot plus the interactive editor

pub mod interactive;
pub mod settings;

#[cfg(test)]
mod tests;

pub use interactive::{run_interactive_config, show_config};
pub use settings::{
    ChatConfig, Config, ConfigError, DEFAULT_FALLBACK_MESSAGE, DEFAULT_LANGUAGE, DataConfig,
    OllamaConfig, PipelineMode, SUPPORTED_LANGUAGES, TranslationConfig,
};
