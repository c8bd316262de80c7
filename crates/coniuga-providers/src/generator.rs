//! LLM-backed question generator and conjugation table provider.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

use coniuga_core::model::{QuizQuestion, VerbData};
use coniuga_core::parser::{parse_quiz_question, parse_verb_data};
use coniuga_core::reference::ReferenceData;
use coniuga_core::traits::{
    ConjugationProvider, GenerateRequest, GenerationRequest, LlmProvider, QuestionGenerator,
};

use crate::prompt::{question_prompt, table_prompt, SYSTEM_PROMPT};

/// Settings for an [`LlmGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Language the infinitive is translated into.
    pub translation_language: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            translation_language: "French".to_string(),
        }
    }
}

/// Generates questions and tables by prompting an LLM for JSON.
pub struct LlmGenerator {
    provider: Arc<dyn LlmProvider>,
    reference: ReferenceData,
    config: GeneratorConfig,
}

impl LlmGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, config: GeneratorConfig) -> Self {
        Self {
            provider,
            reference: ReferenceData::italian(),
            config,
        }
    }

    pub fn with_reference(mut self, reference: ReferenceData) -> Self {
        self.reference = reference;
        self
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    async fn complete(&self, prompt: String, max_tokens: u32) -> anyhow::Result<String> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt,
            system_prompt: Some(SYSTEM_PROMPT.to_string()),
            max_tokens,
            temperature: self.config.temperature,
        };
        let response = self.provider.generate(&request).await?;
        tracing::debug!(
            provider = self.provider.name(),
            model = %response.model,
            latency_ms = response.latency_ms,
            tokens = response.token_usage.total_tokens,
            cost_usd = response.token_usage.estimated_cost_usd,
            "completion received"
        );
        Ok(response.content)
    }
}

#[async_trait]
impl QuestionGenerator for LlmGenerator {
    #[instrument(skip(self, request), fields(verb = ?request.verb))]
    async fn generate_question(
        &self,
        request: &GenerationRequest,
    ) -> anyhow::Result<QuizQuestion> {
        let prompt = question_prompt(request, &self.reference, &self.config.translation_language);
        let content = self.complete(prompt, self.config.max_tokens).await?;
        parse_quiz_question(&content).context("generator returned an unusable quiz question")
    }
}

#[async_trait]
impl ConjugationProvider for LlmGenerator {
    #[instrument(skip(self))]
    async fn conjugation_table(&self, verb: &str) -> anyhow::Result<VerbData> {
        let verb = verb.trim();
        anyhow::ensure!(!verb.is_empty(), "no verb given");
        let prompt = table_prompt(verb, &self.config.translation_language);
        // Full tables are several times longer than a single tense.
        let content = self.complete(prompt, self.config.max_tokens.saturating_mul(4)).await?;
        parse_verb_data(&content).context("generator returned an unusable conjugation table")
    }
}
