/*!
 * Stage contract and the closed set of built-in stages.
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::StageError;
use crate::providers::Translator;
use crate::stages::{
    CulturalAdapter, GrammarCorrector, LanguageDetector, PromptOptimizer, ToxicityClassifier,
};

use super::context::ProcessingContext;

/// A unit of the validation pipeline.
///
/// A stage takes ownership of the context, may rewrite `current_text`, fill in
/// languages, append issues and suggestions, or add metrics, and hands the
/// context back. It must keep `original_text` intact, never drop previously
/// appended issues or suggestions, and never write the
/// `processing_time_ms` metric. Returning an error aborts the run.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Process the context and return the updated one.
    async fn process(&self, context: ProcessingContext) -> Result<ProcessingContext, StageError>;

    /// Stable identifier used in logs and errors.
    fn name(&self) -> &str;
}

/// The built-in stages, in their default pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    LanguageDetector,
    GrammarCorrector,
    ToxicityClassifier,
    CulturalAdapter,
    PromptOptimizer,
}

impl StageKind {
    /// Every built-in stage in default order.
    pub const ALL: [StageKind; 5] = [
        StageKind::LanguageDetector,
        StageKind::GrammarCorrector,
        StageKind::ToxicityClassifier,
        StageKind::CulturalAdapter,
        StageKind::PromptOptimizer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LanguageDetector => "language_detector",
            Self::GrammarCorrector => "grammar_corrector",
            Self::ToxicityClassifier => "toxicity_classifier",
            Self::CulturalAdapter => "cultural_adapter",
            Self::PromptOptimizer => "prompt_optimizer",
        }
    }

    /// Instantiate the stage. Only the cultural adapter uses the translator.
    pub fn build(&self, translator: Arc<dyn Translator>) -> Box<dyn Stage> {
        match self {
            Self::LanguageDetector => Box::new(LanguageDetector::new()),
            Self::GrammarCorrector => Box::new(GrammarCorrector::new()),
            Self::ToxicityClassifier => Box::new(ToxicityClassifier::new()),
            Self::CulturalAdapter => Box::new(CulturalAdapter::new(translator)),
            Self::PromptOptimizer => Box::new(PromptOptimizer::new()),
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| anyhow::anyhow!("Unknown stage: {}", s))
    }
}
