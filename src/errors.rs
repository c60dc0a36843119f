/*!
 * Error types for the promptbridge library.
 *
 * This module contains custom error types for the different parts of the
 * validation pipeline, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Errors a single stage can raise while processing a context
#[derive(Error, Debug)]
pub enum StageError {
    /// The stage's backend failed
    #[error("Backend error: {0}")]
    Provider(#[from] ProviderError),

    /// The context handed to the stage cannot be processed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Any other stage-internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A stage failed; the remaining stages were not run
    #[error("Stage '{stage}' failed: {source}")]
    StageFailed {
        /// Name of the failing stage
        stage: String,
        /// The error the stage returned
        #[source]
        source: StageError,
    },

    /// A stage returned a context that breaks the stage contract
    #[error("Stage '{stage}' violated the stage contract: {reason}")]
    ContractViolation {
        /// Name of the offending stage
        stage: String,
        /// What was violated
        reason: String,
    },
}

impl PipelineError {
    /// Name of the stage this error originated from
    pub fn stage(&self) -> &str {
        match self {
            Self::StageFailed { stage, .. } => stage,
            Self::ContractViolation { stage, .. } => stage,
        }
    }
}

/// Invalid configuration, detected at construction time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Cache capacity must be positive
    #[error("Cache max_size must be greater than zero, got {0}")]
    InvalidCacheSize(usize),

    /// Cache TTL must be positive
    #[error("Cache ttl must be greater than zero")]
    InvalidTtl,

    /// Translation backend endpoint is not a valid URL
    #[error("Invalid adapter endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The endpoint as configured
        endpoint: String,
        /// Parser message
        reason: String,
    },

    /// The pipeline has no stages configured
    #[error("Pipeline must contain at least one stage")]
    EmptyPipeline,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a pipeline run
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Error from a translation backend
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
