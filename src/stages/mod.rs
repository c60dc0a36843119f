/*!
 * Built-in pipeline stages.
 *
 * These are placeholder implementations driven by fixed pattern tables;
 * none of them runs model inference:
 * - `language_detector`: fills in the source language
 * - `grammar_corrector`: fixes a handful of common mistakes
 * - `toxicity_classifier`: flags hostile wording
 * - `cultural_adapter`: adapts the prompt through a `Translator`
 * - `prompt_optimizer`: applies the requested output format
 */

pub mod cultural_adapter;
pub mod grammar_corrector;
pub mod language_detector;
pub mod prompt_optimizer;
pub mod toxicity_classifier;

pub use cultural_adapter::CulturalAdapter;
pub use grammar_corrector::GrammarCorrector;
pub use language_detector::LanguageDetector;
pub use prompt_optimizer::PromptOptimizer;
pub use toxicity_classifier::ToxicityClassifier;
