/*!
 * Pipeline orchestrator driving a context through the configured stages.
 *
 * Stages run strictly one after another: stage k+1 starts only after stage k
 * has returned. The first failing stage aborts the run and no partial result
 * is produced.
 */

use log::{debug, error, info};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::errors::PipelineError;
use crate::providers::Translator;

use super::context::{PROCESSING_TIME_METRIC, ProcessingContext, PromptOptions, ValidationResult};
use super::stage::{Stage, StageKind};

/// Owns an ordered, fixed list of stages and runs contexts through them.
pub struct PipelineOrchestrator {
    stages: Vec<Box<dyn Stage>>,
}

impl PipelineOrchestrator {
    /// Create an orchestrator over the given stages, in order.
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Build the built-in stages listed in `kinds`, in that order.
    pub fn from_kinds(kinds: &[StageKind], translator: Arc<dyn Translator>) -> Self {
        let stages = kinds
            .iter()
            .map(|kind| kind.build(translator.clone()))
            .collect();
        Self::new(stages)
    }

    /// All built-in stages in default order.
    pub fn with_default_stages(translator: Arc<dyn Translator>) -> Self {
        Self::from_kinds(&StageKind::ALL, translator)
    }

    /// Names of the configured stages, in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run one prompt through every stage and assemble the result.
    pub async fn run(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: Option<&str>,
        options: PromptOptions,
    ) -> Result<ValidationResult, PipelineError> {
        let run_id = short_run_id();
        let start_time = Instant::now();
        let mut context = ProcessingContext::new(text, source_language, target_language, options);

        for stage in &self.stages {
            let stage_name = stage.name();
            info!("[{}] Running stage: {}", run_id, stage_name);

            let issues_before = context.issues().len();
            let suggestions_before = context.suggestions().len();

            context = match stage.process(context).await {
                Ok(next) => next,
                Err(e) => {
                    error!("[{}] Stage {} failed: {}", run_id, stage_name, e);
                    return Err(PipelineError::StageFailed {
                        stage: stage_name.to_string(),
                        source: e,
                    });
                }
            };

            check_contract(stage_name, text, issues_before, suggestions_before, &context)?;
        }

        let elapsed_ms = start_time.elapsed().as_secs_f64() * 1000.0;
        context.set_metric(PROCESSING_TIME_METRIC, round_to_hundredths(elapsed_ms));

        debug!(
            "[{}] Pipeline finished in {:.2}ms with {} issue(s) and {} suggestion(s)",
            run_id,
            elapsed_ms,
            context.issues().len(),
            context.suggestions().len()
        );

        Ok(context.into_result())
    }
}

fn check_contract(
    stage: &str,
    input_text: &str,
    issues_before: usize,
    suggestions_before: usize,
    context: &ProcessingContext,
) -> Result<(), PipelineError> {
    let violation = if context.original_text() != input_text {
        Some("original_text was modified".to_string())
    } else if context.issues().len() < issues_before {
        Some(format!(
            "issues shrank from {} to {}",
            issues_before,
            context.issues().len()
        ))
    } else if context.suggestions().len() < suggestions_before {
        Some(format!(
            "suggestions shrank from {} to {}",
            suggestions_before,
            context.suggestions().len()
        ))
    } else if context.metric(PROCESSING_TIME_METRIC).is_some() {
        Some(format!("reserved metric '{}' was set", PROCESSING_TIME_METRIC))
    } else {
        None
    };

    match violation {
        Some(reason) => Err(PipelineError::ContractViolation {
            stage: stage.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn short_run_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
