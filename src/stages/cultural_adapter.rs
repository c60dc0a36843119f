use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use crate::errors::StageError;
use crate::language_utils;
use crate::pipeline::{ProcessingContext, Stage, Suggestion};
use crate::providers::Translator;

/// Adapts the prompt to the target language's cultural context.
///
/// Backend errors are not retried; they fail the stage and with it the run.
#[derive(Debug)]
pub struct CulturalAdapter {
    translator: Arc<dyn Translator>,
}

impl CulturalAdapter {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    /// Whether `target` names the same language as `source`
    fn same_language(source: Option<&str>, target: &str) -> bool {
        match source {
            Some(source) => {
                source.eq_ignore_ascii_case(target) || language_utils::language_codes_match(source, target)
            }
            None => false,
        }
    }
}

#[async_trait]
impl Stage for CulturalAdapter {
    async fn process(&self, mut context: ProcessingContext) -> Result<ProcessingContext, StageError> {
        let target = match context.target_language.as_deref().map(str::trim) {
            Some(target) if !target.is_empty() => target.to_string(),
            _ => {
                debug!("No target language, skipping cultural adaptation");
                return Ok(context);
            }
        };

        if Self::same_language(context.source_language.as_deref(), &target) {
            debug!("Target language '{}' matches the source, skipping cultural adaptation", target);
            return Ok(context);
        }

        info!("Adapting prompt for '{}' using {}", target, self.translator.name());

        let adapted = self
            .translator
            .adapt(&context.current_text, context.source_language.as_deref(), &target)
            .await?;

        let applied = adapted != context.current_text;
        if applied {
            let suggestion = Suggestion::cultural(&context.current_text, &adapted, &target);
            context.push_suggestion(suggestion);
            context.current_text = adapted;
        }
        context.set_metric("cultural_adaptation_applied", applied);

        Ok(context)
    }

    fn name(&self) -> &str {
        "cultural_adapter"
    }
}
