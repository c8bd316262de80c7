//! Quiz session controller.
//!
//! `SessionController` owns all session state and exposes it only through
//! transition methods. Question acquisition is split in two halves so the
//! caller can run the generator call wherever it likes:
//!
//! 1. `begin_request` / `begin_specific` / `advance` hand out a
//!    [`PendingRequest`] ticket carrying a sequence number.
//! 2. `resolve` installs the generator's answer, but only if the ticket is
//!    still the latest one issued. Anything older is discarded.
//!
//! The async helpers (`request_question`, `request_specific`,
//! `advance_with`) chain both halves for callers that await inline.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::error::SessionError;
use crate::evaluator::feedback_for;
use crate::filters::{QuizFilters, SpecificTarget};
use crate::model::{AnswerFeedback, QuizQuestion};
use crate::retry::RetryQueue;
use crate::tracker::AskedVerbsTracker;
use crate::traits::{GenerationRequest, QuestionGenerator};

const RANDOM_FAILURE: &str = "Failed to load a new question. Please try again.";
const SPECIFIC_FAILURE: &str = "Could not generate a quiz for this combination. \
                                Check that the verb, mood, and tense are valid.";

/// Coarse state tag for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Waiting for the generator.
    Loading,
    /// A question is displayed and accepts answers.
    Ready,
    /// Feedback has been computed for the current question.
    Submitted,
    /// The last acquisition failed.
    Error,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Loading => "loading",
            SessionPhase::Ready => "ready",
            SessionPhase::Submitted => "submitted",
            SessionPhase::Error => "in error",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket for one in-flight generator call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending request must be resolved or it will leave the session loading"]
pub struct PendingRequest {
    seq: u64,
    request: GenerationRequest,
    failure_message: &'static str,
}

impl PendingRequest {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Constraints to hand to the generator.
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

/// What `resolve` did with a generator response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The question is now current.
    Installed,
    /// The ticket was superseded; state is unchanged.
    Discarded,
}

/// What `advance` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The next retry question was installed from the review queue.
    Replayed,
    /// A fresh question must be fetched with this ticket.
    Fetch(PendingRequest),
}

/// Summary of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub feedback: Vec<AnswerFeedback>,
    pub all_correct: bool,
    /// `false` in review mode, where the score is untouched.
    pub counted: bool,
    /// The question was newly added to the review queue.
    pub requeued: bool,
}

/// Single-owner quiz session state machine.
#[derive(Debug)]
pub struct SessionController {
    phase: SessionPhase,
    current: Option<QuizQuestion>,
    answers: BTreeMap<String, String>,
    feedback: Option<Vec<AnswerFeedback>>,
    score: u32,
    attempted: u32,
    retry_queue: RetryQueue,
    review_mode: bool,
    asked: AskedVerbsTracker,
    error: Option<String>,
    next_seq: u64,
    in_flight: Option<u64>,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Loading,
            current: None,
            answers: BTreeMap::new(),
            feedback: None,
            score: 0,
            attempted: 0,
            retry_queue: RetryQueue::new(),
            review_mode: false,
            asked: AskedVerbsTracker::new(),
            error: None,
            next_seq: 0,
            in_flight: None,
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.current.as_ref()
    }

    /// Answers typed so far, keyed by person.
    pub fn answers(&self) -> &BTreeMap<String, String> {
        &self.answers
    }

    pub fn answer(&self, person: &str) -> Option<&str> {
        self.answers.get(person).map(String::as_str)
    }

    /// Feedback for the current question, once submitted.
    pub fn feedback(&self) -> Option<&[AnswerFeedback]> {
        self.feedback.as_deref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn attempted(&self) -> u32 {
        self.attempted
    }

    pub fn pending_retries(&self) -> usize {
        self.retry_queue.peek_count()
    }

    pub fn retry_queue(&self) -> &RetryQueue {
        &self.retry_queue
    }

    pub fn is_review_mode(&self) -> bool {
        self.review_mode
    }

    /// Review mode has drained the queue and the last retry was submitted.
    pub fn review_finished(&self) -> bool {
        self.review_mode && self.phase == SessionPhase::Submitted && self.retry_queue.is_empty()
    }

    pub fn asked_verbs(&self) -> &AskedVerbsTracker {
        &self.asked
    }

    /// User-facing message for the last failed acquisition.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // -----------------------------------------------------------------------
    // Acquisition
    // -----------------------------------------------------------------------

    /// Start fetching a random question under `filters`.
    ///
    /// Leaves review mode. The exclusion list is the set of verbs asked so
    /// far. Any earlier outstanding ticket becomes stale.
    pub fn begin_request(&mut self, filters: &QuizFilters) -> PendingRequest {
        let request = GenerationRequest {
            verb: None,
            category: non_blank(filters.category.as_deref()),
            mood: non_blank(filters.mood.as_deref()),
            tense: non_blank(filters.tense.as_deref()),
            exclude: self.asked.snapshot(),
        };
        self.issue(request, RANDOM_FAILURE)
    }

    /// Start fetching a question for an exact verb, mood, and tense.
    ///
    /// Rejects a blank verb without touching any state. No exclusion list
    /// or category is sent.
    pub fn begin_specific(
        &mut self,
        target: &SpecificTarget,
    ) -> Result<PendingRequest, SessionError> {
        let verb = target.verb.trim();
        if verb.is_empty() {
            return Err(SessionError::InvalidRequest("please enter a verb".into()));
        }
        let request = GenerationRequest {
            verb: Some(verb.to_string()),
            category: None,
            mood: non_blank(Some(&target.mood)),
            tense: non_blank(Some(&target.tense)),
            exclude: Vec::new(),
        };
        Ok(self.issue(request, SPECIFIC_FAILURE))
    }

    fn issue(&mut self, request: GenerationRequest, failure_message: &'static str) -> PendingRequest {
        self.next_seq += 1;
        let seq = self.next_seq;
        if let Some(stale) = self.in_flight.replace(seq) {
            tracing::debug!(stale, seq, "superseding in-flight request");
        }
        self.review_mode = false;
        self.error = None;
        self.phase = SessionPhase::Loading;
        tracing::debug!(seq, ?request, "requesting question");
        PendingRequest {
            seq,
            request,
            failure_message,
        }
    }

    /// Apply the generator's result for `ticket`.
    ///
    /// A stale ticket is discarded without touching state. On failure the
    /// current question, if any, is kept and the session enters `Error`.
    pub fn resolve(
        &mut self,
        ticket: PendingRequest,
        result: anyhow::Result<QuizQuestion>,
    ) -> Result<Resolution, SessionError> {
        if self.in_flight != Some(ticket.seq) {
            tracing::warn!(seq = ticket.seq, "discarding stale generator response");
            return Ok(Resolution::Discarded);
        }
        self.in_flight = None;

        let question = result.and_then(|q| check_question(&q).map(|()| q));
        match question {
            Ok(question) => {
                tracing::info!(
                    seq = ticket.seq,
                    verb = %question.verb,
                    mood = %question.mood,
                    tense = %question.tense,
                    "question received"
                );
                self.asked.record(&question.verb);
                self.install(question);
                Ok(Resolution::Installed)
            }
            Err(e) => {
                tracing::warn!(seq = ticket.seq, "question generation failed: {e:#}");
                let message = ticket.failure_message.to_string();
                self.error = Some(message.clone());
                self.phase = SessionPhase::Error;
                Err(SessionError::GenerationFailure(message))
            }
        }
    }

    /// Make `question` current with blank answers and no feedback.
    fn install(&mut self, question: QuizQuestion) {
        self.answers = question
            .persons()
            .map(|p| (p.to_string(), String::new()))
            .collect();
        self.feedback = None;
        self.error = None;
        self.current = Some(question);
        self.phase = SessionPhase::Ready;
    }

    // -----------------------------------------------------------------------
    // Answering
    // -----------------------------------------------------------------------

    /// Overwrite the answer for `person`.
    ///
    /// Ignored unless a question is displayed and not yet submitted, or if
    /// `person` is not asked by the current question. Returns whether the
    /// answer was stored.
    pub fn update_answer(&mut self, person: &str, text: &str) -> bool {
        if self.phase != SessionPhase::Ready || self.feedback.is_some() {
            return false;
        }
        match self.answers.get_mut(person) {
            Some(slot) => {
                *slot = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Grade the current answers.
    ///
    /// Outside review mode this counts an attempt, scores a fully correct
    /// answer, and queues anything else for review.
    pub fn submit(&mut self) -> Result<Submission, SessionError> {
        if self.phase != SessionPhase::Ready {
            return Err(self.invalid("submit"));
        }
        let Some(question) = self.current.as_ref() else {
            return Err(self.invalid("submit"));
        };

        let feedback: Vec<AnswerFeedback> = question
            .conjugations
            .iter()
            .map(|pair| {
                let answer = self.answers.get(&pair.person).map_or("", String::as_str);
                feedback_for(pair, answer)
            })
            .collect();
        let all_correct = feedback.iter().all(|f| f.is_correct);

        let counted = !self.review_mode;
        let mut requeued = false;
        if counted {
            self.attempted += 1;
            if all_correct {
                self.score += 1;
            } else {
                requeued = self.retry_queue.enqueue(question.clone());
            }
        }

        tracing::debug!(
            verb = %question.verb,
            all_correct,
            counted,
            requeued,
            score = self.score,
            attempted = self.attempted,
            "answers submitted"
        );

        self.feedback = Some(feedback.clone());
        self.phase = SessionPhase::Submitted;

        Ok(Submission {
            feedback,
            all_correct,
            counted,
            requeued,
        })
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Move past a submitted question.
    ///
    /// In review mode the next queued question is installed directly. When
    /// the queue is empty, or outside review mode, a fresh question is
    /// requested under `filters`.
    pub fn advance(&mut self, filters: &QuizFilters) -> Result<Advance, SessionError> {
        if self.phase != SessionPhase::Submitted {
            return Err(self.invalid("advance"));
        }
        if self.review_mode {
            if let Some(next) = self.retry_queue.dequeue() {
                self.replay(next);
                return Ok(Advance::Replayed);
            }
            tracing::info!("review queue drained, leaving review mode");
        }
        Ok(Advance::Fetch(self.begin_request(filters)))
    }

    /// Enter review mode with the oldest failed question.
    pub fn start_review(&mut self) -> Result<(), SessionError> {
        let Some(first) = self.retry_queue.dequeue() else {
            return Err(SessionError::NothingToReview);
        };
        tracing::info!(
            remaining = self.retry_queue.peek_count(),
            "starting review"
        );
        self.review_mode = true;
        self.replay(first);
        Ok(())
    }

    /// Install a queued question without the generator or the tracker.
    fn replay(&mut self, question: QuizQuestion) {
        if let Some(stale) = self.in_flight.take() {
            tracing::debug!(stale, "invalidating in-flight request for review");
        }
        tracing::debug!(verb = %question.verb, "replaying failed question");
        self.install(question);
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            phase: self.phase.as_str(),
        }
    }

    // -----------------------------------------------------------------------
    // Async helpers
    // -----------------------------------------------------------------------

    /// Fetch and install a random question.
    pub async fn request_question(
        &mut self,
        generator: &dyn QuestionGenerator,
        filters: &QuizFilters,
    ) -> Result<Resolution, SessionError> {
        let ticket = self.begin_request(filters);
        let result = generator.generate_question(ticket.request()).await;
        self.resolve(ticket, result)
    }

    /// Fetch and install a question for an exact target.
    pub async fn request_specific(
        &mut self,
        generator: &dyn QuestionGenerator,
        target: &SpecificTarget,
    ) -> Result<Resolution, SessionError> {
        let ticket = self.begin_specific(target)?;
        let result = generator.generate_question(ticket.request()).await;
        self.resolve(ticket, result)
    }

    /// `advance`, fetching from the generator when needed.
    pub async fn advance_with(
        &mut self,
        generator: &dyn QuestionGenerator,
        filters: &QuizFilters,
    ) -> Result<Resolution, SessionError> {
        match self.advance(filters)? {
            Advance::Replayed => Ok(Resolution::Installed),
            Advance::Fetch(ticket) => {
                let result = generator.generate_question(ticket.request()).await;
                self.resolve(ticket, result)
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Reject questions that would break the answer-key invariant.
fn check_question(question: &QuizQuestion) -> anyhow::Result<()> {
    anyhow::ensure!(
        !question.conjugations.is_empty(),
        "question for '{}' has no conjugations",
        question.verb
    );
    let mut seen = HashSet::new();
    for person in question.persons() {
        anyhow::ensure!(
            seen.insert(person),
            "question for '{}' repeats person '{}'",
            question.verb,
            person
        );
    }
    Ok(())
}
