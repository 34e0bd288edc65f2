use clap::{Parser, Subcommand};
use faq_bot::commands::{ListTarget, ask, list, run_chat, show_status};
use faq_bot::config::{Config, PipelineMode, run_interactive_config, show_config};

#[derive(Parser)]
#[command(name = "faq-bot")]
#[command(about = "A multilingual college FAQ chatbot backed by local Ollama models")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure Ollama connection and chat settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Start an interactive chat session
    Chat {
        /// Matching pipeline, defaults to the configured mode
        #[arg(long, value_enum)]
        mode: Option<PipelineMode>,
        /// Run without Ollama: keyword matching only, replies stay in English
        #[arg(long)]
        offline: bool,
    },
    /// Answer a single question and exit
    Ask {
        /// The question, in any supported language
        text: String,
        /// Matching pipeline, defaults to the configured mode
        #[arg(long, value_enum)]
        mode: Option<PipelineMode>,
        /// Run without Ollama: keyword matching only, replies stay in English
        #[arg(long)]
        offline: bool,
    },
    /// Show the loaded FAQ entries or intent table
    List {
        #[arg(value_enum, default_value = "faq")]
        target: ListTarget,
    },
    /// Check that Ollama and the configured models are available
    Status,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
        }
        Commands::Chat { mode, offline } => {
            let config = Config::load_default()?;
            let mode = mode.unwrap_or(config.chat.mode);
            run_chat(&config, mode, offline)?;
        }
        Commands::Ask {
            text,
            mode,
            offline,
        } => {
            let config = Config::load_default()?;
            let mode = mode.unwrap_or(config.chat.mode);
            ask(&config, &text, mode, offline)?;
        }
        Commands::List { target } => {
            list(&Config::load_default()?, target)?;
        }
        Commands::Status => {
            show_status(&Config::load_default()?)?;
        }
    }

    Ok(())
}
