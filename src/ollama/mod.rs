
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::OllamaConfig;

pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const EXPONENTIAL_BACKOFF_BASE: u64 = 2;

#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("Invalid Ollama URL: {0}")]
    InvalidUrl(String),
    #[error("Ollama returned HTTP {0}")]
    Status(u16),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Model '{model}' is not available. Available models: {available:?}")]
    ModelNotFound {
        model: String,
        available: Vec<String>,
    },
    #[error("Mismatch between request and response counts: {expected} vs {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

/// Blocking client for the handful of Ollama endpoints the bot needs:
/// model listing, embeddings and non-streaming generation.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: Url,
    batch_size: u32,
    agent: ureq::Agent,
    retry_attempts: u32,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
pub struct ModelInfo {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

impl OllamaClient {
    #[inline]
    pub fn new(config: &OllamaConfig) -> Result<Self, OllamaError> {
        let base_url = config
            .ollama_url()
            .map_err(|e| OllamaError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            base_url,
            batch_size: config.batch_size,
            agent: build_agent(Duration::from_secs(config.timeout_seconds)),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        })
    }

    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = build_agent(timeout);
        self
    }

    #[inline]
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts.max(1);
        self
    }

    #[inline]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Test connection to Ollama server and verify every model is available
    #[inline]
    pub fn health_check(&self, models: &[&str]) -> Result<(), OllamaError> {
        debug!("Performing health check for Ollama at {}", self.base_url);

        let available = self.list_models()?;
        for model in models {
            Self::ensure_model(&available, model)?;
        }

        info!(
            "Health check passed for Ollama server at {} with models {:?}",
            self.base_url, models
        );
        Ok(())
    }

    /// List all available models
    #[inline]
    pub fn list_models(&self) -> Result<Vec<ModelInfo>, OllamaError> {
        let url = self.endpoint("/api/tags")?;

        debug!("Fetching available models from {}", url);

        let response_text = self.make_request_with_retry(|| {
            self.agent
                .get(url.as_str())
                .call()
                .and_then(|mut resp| resp.body_mut().read_to_string())
        })?;

        let models_response: ModelsResponse = serde_json::from_str(&response_text)?;

        debug!("Found {} models", models_response.models.len());
        Ok(models_response.models)
    }

    /// Generate embeddings for every text, batching by the configured batch size
    #[inline]
    pub fn embed(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>, OllamaError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let mut results = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size.max(1) as usize) {
            results.extend(self.embed_single_batch(model, chunk)?);
        }

        debug!("Generated {} embeddings total", results.len());
        Ok(results)
    }

    /// Run a single non-streaming completion and return the raw response text
    #[inline]
    pub fn generate(&self, model: &str, system: &str, prompt: &str) -> Result<String, OllamaError> {
        debug!(
            "Generating with model {} (prompt length: {})",
            model,
            prompt.len()
        );

        let request = GenerateRequest {
            model,
            prompt,
            system,
            stream: false,
            options: GenerateOptions { temperature: 0.0 },
        };
        let url = self.endpoint("/api/generate")?;
        let request_json = serde_json::to_string(&request)?;

        let response_text = self.make_request_with_retry(|| {
            self.agent
                .post(url.as_str())
                .header("Content-Type", "application/json")
                .send(&request_json)
                .and_then(|mut resp| resp.body_mut().read_to_string())
        })?;

        let response: GenerateResponse = serde_json::from_str(&response_text)?;
        Ok(response.response)
    }

    fn embed_single_batch(
        &self,
        model: &str,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, OllamaError> {
        let request = EmbedRequest {
            model,
            input: texts,
        };
        let url = self.endpoint("/api/embed")?;
        let request_json = serde_json::to_string(&request)?;

        let response_text = self.make_request_with_retry(|| {
            self.agent
                .post(url.as_str())
                .header("Content-Type", "application/json")
                .send(&request_json)
                .and_then(|mut resp| resp.body_mut().read_to_string())
        })?;

        let response: EmbedResponse = serde_json::from_str(&response_text)?;

        if response.embeddings.len() != texts.len() {
            return Err(OllamaError::CountMismatch {
                expected: texts.len(),
                actual: response.embeddings.len(),
            });
        }

        Ok(response.embeddings)
    }

    fn ensure_model(available: &[ModelInfo], model: &str) -> Result<(), OllamaError> {
        // Ollama reports bare names with an implicit ":latest" tag
        let matches = |name: &str| {
            name == model || name.strip_suffix(":latest").is_some_and(|bare| bare == model)
        };

        if available.iter().any(|m| matches(&m.name)) {
            debug!("Model {} is available", model);
            return Ok(());
        }

        let available: Vec<String> = available.iter().map(|m| m.name.clone()).collect();
        warn!(
            "Model {} not found. Available models: {:?}",
            model, available
        );
        Err(OllamaError::ModelNotFound {
            model: model.to_string(),
            available,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, OllamaError> {
        self.base_url
            .join(path)
            .map_err(|e| OllamaError::InvalidUrl(format!("{}{}: {}", self.base_url, path, e)))
    }

    fn make_request_with_retry<F>(&self, mut request_fn: F) -> Result<String, OllamaError>
    where
        F: FnMut() -> Result<String, ureq::Error>,
    {
        let mut last_error = None;

        for attempt in 1..=self.retry_attempts {
            debug!("HTTP request attempt {}/{}", attempt, self.retry_attempts);

            match request_fn() {
                Ok(response_text) => {
                    debug!("Request succeeded on attempt {}", attempt);
                    return Ok(response_text);
                }
                Err(ureq::Error::StatusCode(status)) if status < 500 => {
                    warn!("Client error (status {}), not retrying", status);
                    return Err(OllamaError::Status(status));
                }
                Err(ureq::Error::StatusCode(status)) => {
                    warn!(
                        "Server error (status {}), attempt {}/{}",
                        status, attempt, self.retry_attempts
                    );
                    last_error = Some(OllamaError::Status(status));
                }
                Err(
                    error @ (ureq::Error::ConnectionFailed
                    | ureq::Error::HostNotFound
                    | ureq::Error::Timeout(_)
                    | ureq::Error::Io(_)),
                ) => {
                    warn!(
                        "Transport error: {}, attempt {}/{}",
                        error, attempt, self.retry_attempts
                    );
                    last_error = Some(OllamaError::Transport(error.to_string()));
                }
                Err(error) => {
                    warn!("Non-retryable error: {}", error);
                    return Err(OllamaError::Transport(error.to_string()));
                }
            }

            if attempt < self.retry_attempts {
                let delay_ms = EXPONENTIAL_BACKOFF_BASE.pow(attempt - 1) * 1000;
                let delay = Duration::from_millis(delay_ms);
                debug!("Waiting {:?} before retry", delay);
                std::thread::sleep(delay);
            }
        }

        error!("All retry attempts failed for request to {}", self.base_url);

        Err(last_error
            .unwrap_or_else(|| OllamaError::Transport("Request failed after retries".to_string())))
    }
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}
