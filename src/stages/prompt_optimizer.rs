use async_trait::async_trait;
use log::debug;

use crate::errors::StageError;
use crate::pipeline::{OutputFormat, ProcessingContext, Stage, Suggestion};

/// Tone reported when the caller asked for none
pub const DEFAULT_TONE: &str = "neutral";

/// Fixed optimization hints: (text, confidence)
const OPTIMIZATION_HINTS: &[(&str, f64)] = &[
    ("Add specific examples to make your prompt clearer", 0.85),
    ("Consider breaking down complex requests into steps", 0.78),
];

/// Applies the requested output format and adds general optimization hints
#[derive(Debug, Default)]
pub struct PromptOptimizer;

impl PromptOptimizer {
    pub fn new() -> Self {
        Self
    }

    /// Render `text` in the given output format
    pub fn apply_format(text: &str, format: OutputFormat) -> Result<String, StageError> {
        match format {
            OutputFormat::Plaintext => Ok(text.to_string()),
            OutputFormat::Markdown => Ok(format!("# Optimized Prompt\n\n{}", text)),
            OutputFormat::Json => serde_json::to_string(&serde_json::json!({ "prompt": text }))
                .map_err(|e| StageError::Internal(format!("Failed to encode prompt as JSON: {}", e))),
        }
    }
}

#[async_trait]
impl Stage for PromptOptimizer {
    async fn process(&self, mut context: ProcessingContext) -> Result<ProcessingContext, StageError> {
        let format = context.options.format.unwrap_or_default();
        let tone = context
            .options
            .tone
            .clone()
            .unwrap_or_else(|| DEFAULT_TONE.to_string());

        debug!("Optimizing prompt: format={}, tone={}", format, tone);

        context.current_text = Self::apply_format(&context.current_text, format)?;
        context.extend_suggestions(
            OPTIMIZATION_HINTS
                .iter()
                .map(|(hint, confidence)| Suggestion::optimization(hint, *confidence)),
        );
        context.set_metric("output_format", format.as_str());
        context.set_metric("tone", tone);

        Ok(context)
    }

    fn name(&self) -> &str {
        "prompt_optimizer"
    }
}
