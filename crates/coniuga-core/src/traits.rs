//! Collaborator trait definitions.
//!
//! The session engine never talks to a network directly. It asks a
//! `QuestionGenerator` for questions; the learn view asks a
//! `ConjugationProvider` for full tables. Both are implemented in
//! `coniuga-providers` on top of an `LlmProvider`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{QuizQuestion, VerbData};

// ---------------------------------------------------------------------------
// Question generation
// ---------------------------------------------------------------------------

/// Constraints handed to the question generator.
///
/// `None` means "no constraint". When `verb` is set, `category` and
/// `exclude` are left empty and `mood`/`tense` are hints the generator may
/// not honour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub verb: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub tense: Option<String>,
    /// Verbs already asked in this session.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Produces quiz questions.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Generate one question satisfying `request` as far as possible.
    async fn generate_question(&self, request: &GenerationRequest)
        -> anyhow::Result<QuizQuestion>;
}

/// Produces full conjugation tables.
#[async_trait]
pub trait ConjugationProvider: Send + Sync {
    async fn conjugation_table(&self, verb: &str) -> anyhow::Result<VerbData>;
}

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// Trait for LLM backends that complete prompts.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "anthropic").
    fn name(&self) -> &str;

    /// Complete a prompt.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;

    /// List available models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Request to complete a prompt with an LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "claude-sonnet-4-20250514").
    pub model: String,
    /// The user prompt.
    pub prompt: String,
    /// Optional system prompt override.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Response from an LLM completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The raw response text.
    pub content: String,
    /// Model that actually generated the response.
    pub model: String,
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting for one completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub estimated_cost_usd: f64,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
    /// Cost per 1K input tokens in USD.
    pub cost_per_1k_input: f64,
    /// Cost per 1K output tokens in USD.
    pub cost_per_1k_output: f64,
}
