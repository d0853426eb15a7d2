//! Language model provider layer for the investment simulator
//!
//! This crate provides provider-agnostic abstractions for chat completion:
//!
//! - Role-tagged message types
//! - Completion request/response types
//! - The `LLMProvider` trait with explicit lifecycle hooks
//! - Concrete providers for OpenAI-compatible servers and Ollama

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;
