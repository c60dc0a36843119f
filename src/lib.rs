/*!
 * # promptbridge - prompt validation and cultural adaptation
 *
 * A Rust library that validates and rewrites free-text prompts by passing
 * them through an ordered sequence of stages, producing a structured report
 * of issues, metrics and suggestions.
 *
 * ## Features
 *
 * - Source language detection
 * - Grammar correction with per-issue positions
 * - Toxicity screening
 * - Cultural adaptation through a pluggable backend:
 *   - Passthrough (no change)
 *   - Ollama (local LLM)
 * - Output formatting (plain text, JSON, Markdown)
 * - Bounded, time-limited memoization of results
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `pipeline`: Processing context, stage contract and orchestrator
 * - `stages`: The built-in stages
 * - `cache`: Bounded TTL cache of final results
 * - `validator`: Cache-aware entry point and cache key derivation
 * - `providers`: Cultural adaptation backends
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod cache;
pub mod errors;
pub mod language_utils;
pub mod pipeline;
pub mod providers;
pub mod stages;
pub mod validator;

// Re-export main types for easier usage
pub use app_config::Config;
pub use cache::{CacheStats, ResultCache, TtlCache};
pub use errors::{AppError, ConfigError, PipelineError, ProviderError, StageError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use pipeline::{
    Issue, IssueKind, OutputFormat, PipelineOrchestrator, ProcessingContext, PromptOptions, Stage,
    StageKind, Suggestion, ValidationResult,
};
pub use validator::{PromptRequest, PromptValidator, cache_key};
