use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::language_utils;

use super::Translator;

/// Generate request for the Ollama API
#[derive(Debug, Serialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    stream: bool,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: false,
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions {
            temperature: Some(temperature),
        });
        self
    }
}

/// Generation response from the Ollama API
#[derive(Debug, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
}

/// Cultural adaptation backed by a local Ollama server
#[derive(Debug, Clone)]
pub struct OllamaTranslator {
    /// Base URL of the Ollama API
    base_url: Url,
    /// HTTP client for making requests
    client: Client,
    /// Model used for adaptation
    model: String,
    /// System prompt template with `{source_language}` / `{target_language}`
    system_prompt: String,
    /// Sampling temperature
    temperature: f32,
}

impl OllamaTranslator {
    /// Create a client for the Ollama server at `endpoint`
    pub fn new(
        endpoint: &str,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let base_url = Url::parse(endpoint)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        Ok(Self {
            base_url,
            client,
            model: model.into(),
            system_prompt: system_prompt.into(),
            temperature,
        })
    }

    /// URL of the generate endpoint
    pub fn generate_url(&self) -> Result<Url, ProviderError> {
        self.base_url
            .join("api/generate")
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))
    }

    /// Fill the system prompt template with human readable language names
    pub fn render_system_prompt(&self, source_language: Option<&str>, target_language: &str) -> String {
        let source = source_language
            .map(display_language)
            .unwrap_or_else(|| "the original language".to_string());
        let target = display_language(target_language);

        self.system_prompt
            .replace("{source_language}", &source)
            .replace("{target_language}", &target)
    }

    /// Generate text from the Ollama API
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = self.generate_url()?;

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Ollama API error ({}): {}", status, message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        serde_json::from_str::<GenerationResponse>(&body)
            .map_err(|e| ProviderError::ParseError(format!("{}: {}", e, truncate(&body, 200))))
    }
}

#[async_trait]
impl Translator for OllamaTranslator {
    async fn adapt(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let request = GenerationRequest::new(self.model.clone(), text)
            .system(self.render_system_prompt(source_language, target_language))
            .temperature(self.temperature);

        debug!("Adapting prompt for '{}' with model {}", target_language, self.model);

        let response = self.generate(&request).await?;
        let adapted = response.response.trim();

        if adapted.is_empty() {
            return Err(ProviderError::ParseError("Empty response from Ollama".to_string()));
        }

        Ok(adapted.to_string())
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

fn display_language(code: &str) -> String {
    language_utils::get_language_name(code).unwrap_or_else(|_| code.to_string())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
