//! Concrete LLM provider implementations

pub mod ollama;
pub mod openai;

pub use ollama::{OllamaConfig, OllamaProvider};
pub use openai::{OpenAIConfig, OpenAIProvider};
