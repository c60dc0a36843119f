/*!
 * Common test utilities for the promptbridge test suite
 */

use anyhow::Result;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

use promptbridge::errors::{ProviderError, StageError};
use promptbridge::pipeline::{PipelineOrchestrator, ProcessingContext, Stage};
use promptbridge::providers::{PassthroughTranslator, Translator};

/// Route library logs to the test output; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Orchestrator with every built-in stage and a passthrough backend
pub fn default_orchestrator() -> PipelineOrchestrator {
    PipelineOrchestrator::with_default_stages(Arc::new(PassthroughTranslator))
}

/// Translator that tags the text with the target language and counts calls
#[derive(Debug, Default)]
pub struct TaggingTranslator {
    calls: AtomicUsize,
}

impl TaggingTranslator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for TaggingTranslator {
    async fn adapt(
        &self,
        text: &str,
        _source_language: Option<&str>,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{} [{}]", text, target_language))
    }

    fn name(&self) -> &str {
        "tagging"
    }
}

/// Translator that always fails
#[derive(Debug, Default)]
pub struct FailingTranslator;

#[async_trait]
impl Translator for FailingTranslator {
    async fn adapt(&self, _: &str, _: Option<&str>, _: &str) -> Result<String, ProviderError> {
        Err(ProviderError::ApiError {
            status_code: 503,
            message: "model not loaded".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Stage that counts how often it ran and records the call order
pub struct CountingStage {
    name: String,
    calls: Arc<AtomicUsize>,
}

impl CountingStage {
    pub fn new(name: &str, calls: Arc<AtomicUsize>) -> Self {
        Self {
            name: name.to_string(),
            calls,
        }
    }
}

#[async_trait]
impl Stage for CountingStage {
    async fn process(&self, mut context: ProcessingContext) -> Result<ProcessingContext, StageError> {
        let order = self.calls.fetch_add(1, Ordering::SeqCst);
        context.set_metric(format!("{}_order", self.name), order);
        Ok(context)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Stage that always fails with the given message
pub struct FailingStage {
    pub message: String,
}

#[async_trait]
impl Stage for FailingStage {
    async fn process(&self, _context: ProcessingContext) -> Result<ProcessingContext, StageError> {
        Err(StageError::Internal(self.message.clone()))
    }

    fn name(&self) -> &str {
        "failing_stage"
    }
}
