/*!
 * Entry point of the validation service.
 *
 * `PromptValidator` wraps the orchestrator with the result cache: a lookup
 * before the run, a store after a successful one. Failed runs are never
 * cached.
 */

use log::{debug, info};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::app_config::Config;
use crate::cache::{CacheStats, ResultCache};
use crate::errors::{AppError, PipelineError};
use crate::language_utils;
use crate::pipeline::{PipelineOrchestrator, PromptOptions, ValidationResult};

/// Key segment used when no target language was requested
const AUTO_TARGET: &str = "auto";

/// Prompts are shortened to this many characters in log lines
const LOG_PREVIEW_CHARS: usize = 30;

/// A validation request as received from a transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,

    #[serde(default)]
    pub options: PromptOptions,
}

impl PromptRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_language: None,
            target_language: None,
            options: PromptOptions::default(),
        }
    }
}

/// Derive the cache key for a prompt.
///
/// The text is hashed with surrounding whitespace trimmed; inner whitespace
/// and casing are kept. The target language is trimmed, lowercased and
/// reduced to its ISO 639-1 form when it is a known code; an absent or blank
/// target becomes `auto`.
pub fn cache_key(text: &str, target_language: Option<&str>) -> String {
    let digest = Sha256::digest(text.trim().as_bytes());
    let hash: String = digest.iter().map(|b| format!("{:02x}", b)).collect();

    let target = target_language
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .map(|t| language_utils::normalize_to_part1_or_part2t(&t).unwrap_or(t))
        .unwrap_or_else(|| AUTO_TARGET.to_string());

    format!("{}:{}", hash, target)
}

/// Runs prompts through the pipeline with result memoization
pub struct PromptValidator {
    orchestrator: PipelineOrchestrator,
    cache: Option<Arc<ResultCache>>,
}

impl PromptValidator {
    /// Create a validator sharing `cache` with any other holder of it
    pub fn new(orchestrator: PipelineOrchestrator, cache: Arc<ResultCache>) -> Self {
        Self {
            orchestrator,
            cache: Some(cache),
        }
    }

    /// Create a validator that always runs the pipeline
    pub fn without_cache(orchestrator: PipelineOrchestrator) -> Self {
        Self {
            orchestrator,
            cache: None,
        }
    }

    /// Build the stages, backend and cache described by `config`
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        config.validate()?;

        let translator = config.adapter.build_translator()?;
        let orchestrator = PipelineOrchestrator::from_kinds(&config.pipeline.stages, translator);

        info!(
            "Pipeline stages: {} (adapter: {})",
            orchestrator.stage_names().join(", "),
            config.adapter.backend
        );

        if !config.cache.enabled {
            info!("Result cache disabled");
            return Ok(Self::without_cache(orchestrator));
        }

        let cache = ResultCache::with_ttl_secs(config.cache.max_size, config.cache.ttl_secs)?;
        Ok(Self::new(orchestrator, Arc::new(cache)))
    }

    pub fn orchestrator(&self) -> &PipelineOrchestrator {
        &self.orchestrator
    }

    /// Validate a prompt, answering from the cache when possible
    pub async fn run_pipeline(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: Option<&str>,
        options: PromptOptions,
    ) -> Result<ValidationResult, PipelineError> {
        let Some(cache) = &self.cache else {
            return self
                .orchestrator
                .run(text, source_language, target_language, options)
                .await;
        };

        let key = cache_key(text, target_language);

        if let Some(cached) = cache.get(&key) {
            info!("Cache hit for prompt: {}", preview(text));
            return Ok(cached);
        }

        debug!("Cache miss for prompt: {}", preview(text));

        let result = self
            .orchestrator
            .run(text, source_language, target_language, options)
            .await?;

        cache.set(&key, result.clone());
        debug!("Cached result for prompt: {}", preview(text));

        Ok(result)
    }

    /// Validate a transport request
    pub async fn validate(&self, request: &PromptRequest) -> Result<ValidationResult, PipelineError> {
        self.run_pipeline(
            &request.text,
            request.source_language.as_deref(),
            request.target_language.as_deref(),
            request.options.clone(),
        )
        .await
    }

    /// Cache counters, `None` when running without a cache
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    /// Number of cached results, `None` when running without a cache
    pub fn cache_len(&self) -> Option<usize> {
        self.cache.as_ref().map(|cache| cache.len())
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= LOG_PREVIEW_CHARS {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(LOG_PREVIEW_CHARS).collect::<String>())
    }
}
