//! Error types for the advisor

use thiserror::Error;

/// Result type for advisor operations
pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Language model call failed
    #[error(transparent)]
    Llm(#[from] invest_llm::LLMError),

    /// Company data could not be loaded or serialized
    #[error(transparent)]
    Invest(#[from] invest_core::InvestError),

    #[error("Failed to parse template '{name}' ({language}): {detail}")]
    TemplateParse {
        name: String,
        language: String,
        detail: String,
    },

    #[error("Failed to render template '{name}': {detail}")]
    Render { name: String, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),
}
