//! Answer evaluation.

use crate::model::{AnswerFeedback, ConjugationPair};

/// Returns `true` if `user_answer` matches `correct_answer`.
///
/// Both sides are trimmed and compared case-insensitively with Unicode
/// lowercasing, so accented forms like "È" and "è" match. A blank answer
/// is never correct. There is no partial credit.
pub fn evaluate(user_answer: &str, correct_answer: &str) -> bool {
    let user = user_answer.trim();
    if user.is_empty() {
        return false;
    }
    user.to_lowercase() == correct_answer.trim().to_lowercase()
}

/// Build the feedback entry for one person.
pub fn feedback_for(pair: &ConjugationPair, user_answer: &str) -> AnswerFeedback {
    AnswerFeedback {
        person: pair.person.clone(),
        user_answer: user_answer.trim().to_string(),
        correct_answer: pair.verb.clone(),
        is_correct: evaluate(user_answer, &pair.verb),
    }
}
