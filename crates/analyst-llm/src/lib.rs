//! Language-model provider abstraction for analyst-rs
//!
//! This crate provides provider-agnostic types for sending a prompt to a
//! generative language model and reading back its text:
//!
//! - Message types for the conversation
//! - Completion request/response types
//! - The [`LLMProvider`] trait implemented by concrete providers
//! - A Gemini provider (behind the `gemini` feature)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, FinishReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "gemini")]
pub mod providers;
