/*!
 * Validation pipeline.
 *
 * A prompt is wrapped in a `ProcessingContext` and threaded through an
 * ordered list of stages:
 * 1. **Language detection**: fill in the source language
 * 2. **Grammar correction**: fix common mistakes
 * 3. **Toxicity screening**: flag hostile wording
 * 4. **Cultural adaptation**: adapt the prompt for the target language
 * 5. **Optimization**: apply the requested output format
 *
 * The orchestrator only knows the `Stage` contract; the built-in stages live
 * in `crate::stages`.
 */

pub mod context;
pub mod orchestrator;
pub mod stage;

pub use context::{
    Issue, IssueKind, OutputFormat, PROCESSING_TIME_METRIC, Position, ProcessingContext,
    PromptOptions, Severity, Suggestion, ValidationResult,
};
pub use orchestrator::PipelineOrchestrator;
pub use stage::{Stage, StageKind};
