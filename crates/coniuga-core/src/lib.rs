//! coniuga-core: Quiz session engine, data model, and answer evaluation.
//!
//! This crate defines the data model, collaborator traits, and the
//! session state machine that the rest of coniuga builds on.

pub mod error;
pub mod evaluator;
pub mod filters;
pub mod model;
pub mod parser;
pub mod reference;
pub mod retry;
pub mod session;
pub mod tracker;
pub mod traits;

pub use error::{ParseError, ProviderError, SessionError};
pub use filters::{QuizFilters, SpecificTarget};
pub use model::{AnswerFeedback, ConjugationPair, QuizQuestion, VerbData};
pub use reference::ReferenceData;
pub use session::{Advance, PendingRequest, Resolution, SessionController, SessionPhase, Submission};
