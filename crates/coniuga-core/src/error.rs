//! Error types shared across coniuga crates.
//!
//! `ProviderError` lives here so the session layer and the providers agree
//! on one classification of backend failures.

use thiserror::Error;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// A generator response that could not be turned into a question or table.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field `{0}` is missing or blank")]
    BlankField(&'static str),

    #[error("no conjugations in {0}")]
    NoConjugations(String),

    #[error("person `{person}` appears twice in {context}")]
    DuplicatePerson { person: String, context: String },
}

/// Errors surfaced by the quiz session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The generator was unreachable or returned an unusable question.
    #[error("{0}")]
    GenerationFailure(String),

    /// The request was rejected before reaching the generator.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The operation is not allowed in the current phase.
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },

    /// Review was requested but no failed questions are queued.
    #[error("no questions to review")]
    NothingToReview,
}
