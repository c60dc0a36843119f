use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::errors::{ConfigError, ProviderError};
use crate::pipeline::StageKind;
use crate::providers::{OllamaTranslator, PassthroughTranslator, Translator};

/// Application configuration module
/// This module handles loading, validating and saving the validator settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Result cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Stage selection and order
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Cultural adaptation backend
    #[serde(default)]
    pub adapter: AdapterConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Result cache configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CacheConfig {
    /// Whether results are memoized at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of cached results
    #[serde(default = "default_cache_max_size")]
    pub max_size: usize,

    /// Time to live of a cached result, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size: default_cache_max_size(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Stages to run, in order
    #[serde(default = "default_stages")]
    pub stages: Vec<StageKind>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stages: default_stages(),
        }
    }
}

/// Backend used by the cultural adaptation stage
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdapterBackend {
    /// Leave the prompt unchanged
    #[default]
    Passthrough,
    /// Local Ollama server
    Ollama,
}

impl AdapterBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passthrough => "passthrough",
            Self::Ollama => "ollama",
        }
    }
}

impl std::fmt::Display for AdapterBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AdapterBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "passthrough" => Ok(Self::Passthrough),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow::anyhow!("Invalid adapter backend: {}", s)),
        }
    }
}

/// Cultural adaptation backend configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AdapterConfig {
    /// Backend to use
    #[serde(default)]
    pub backend: AdapterBackend,

    /// Service endpoint URL
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// System prompt template
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            backend: AdapterBackend::default(),
            endpoint: default_ollama_endpoint(),
            model: default_ollama_model(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl AdapterConfig {
    /// Instantiate the configured backend
    pub fn build_translator(&self) -> Result<Arc<dyn Translator>, ProviderError> {
        match self.backend {
            AdapterBackend::Passthrough => Ok(Arc::new(PassthroughTranslator)),
            AdapterBackend::Ollama => Ok(Arc::new(OllamaTranslator::new(
                &self.endpoint,
                self.model.clone(),
                self.system_prompt.clone(),
                self.temperature,
                Duration::from_secs(self.timeout_secs),
            )?)),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cache_max_size() -> usize {
    1000
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_stages() -> Vec<StageKind> {
    StageKind::ALL.to_vec()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_temperature() -> f32 {
    0.3
}

fn default_system_prompt() -> String {
    "You adapt prompts written in {source_language} for speakers of {target_language}. Adjust idioms, examples and cultural references so they feel natural to that audience, keep the intent and structure of the prompt, and reply with the adapted prompt only.".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.max_size == 0 {
            return Err(ConfigError::InvalidCacheSize(self.cache.max_size));
        }

        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::InvalidTtl);
        }

        if self.pipeline.stages.is_empty() {
            return Err(ConfigError::EmptyPipeline);
        }

        Url::parse(&self.adapter.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: self.adapter.endpoint.clone(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    /// Load the configuration at `path`, writing a default one first if the
    /// file does not exist.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            return Self::load(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }
}
