//! coniuga-providers: LLM-backed collaborators for the quiz session.
//!
//! Implements the `LlmProvider` trait for Anthropic, OpenAI, and Ollama, and
//! builds the question generator and conjugation table provider on top of it.

pub mod anthropic;
pub mod config;
pub mod error;
pub mod generator;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod prompt;

pub use config::{create_provider, load_config, load_config_from, ConiugaConfig, ProviderConfig};
pub use error::ProviderError;
pub use generator::{GeneratorConfig, LlmGenerator};
