/*!
 * Translation backends used by the cultural adaptation stage.
 *
 * - `PassthroughTranslator`: returns the text unchanged
 * - `ollama::OllamaTranslator`: asks a local Ollama server to adapt the prompt
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation backends
///
/// Implementations adapt a prompt to the cultural context of a target
/// language. Retries, if any, are the backend's own business; the pipeline
/// treats every error as fatal for the run.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Adapt `text` for speakers of `target_language`
    ///
    /// # Arguments
    /// * `text` - The prompt as produced by the previous stages
    /// * `source_language` - Language of `text`, when known
    /// * `target_language` - Language whose cultural context to adapt to
    async fn adapt(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Short backend identifier for logs
    fn name(&self) -> &str;
}

/// Backend that leaves every prompt as it is
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

#[async_trait]
impl Translator for PassthroughTranslator {
    async fn adapt(
        &self,
        text: &str,
        _source_language: Option<&str>,
        _target_language: &str,
    ) -> Result<String, ProviderError> {
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "passthrough"
    }
}

pub mod ollama;

pub use ollama::OllamaTranslator;
