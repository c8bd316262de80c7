//! FIFO queue of failed questions awaiting review.

use std::collections::VecDeque;

use crate::model::QuizQuestion;

/// Failed questions, oldest first, deduplicated by `(verb, mood, tense)`.
#[derive(Debug, Clone, Default)]
pub struct RetryQueue {
    items: VecDeque<QuizQuestion>,
}

impl RetryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `question` unless one with the same identity is already queued.
    ///
    /// Returns `true` if the question was added.
    pub fn enqueue(&mut self, question: QuizQuestion) -> bool {
        if self.items.iter().any(|q| q.same_identity(&question)) {
            tracing::debug!(
                verb = %question.verb,
                mood = %question.mood,
                tense = %question.tense,
                "question already queued for review"
            );
            return false;
        }
        self.items.push_back(question);
        true
    }

    /// Remove and return the oldest queued question.
    pub fn dequeue(&mut self) -> Option<QuizQuestion> {
        self.items.pop_front()
    }

    /// Exact number of pending retries.
    pub fn peek_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConjugationPair;

    fn question(verb: &str, tense: &str, form: &str) -> QuizQuestion {
        QuizQuestion {
            verb: verb.into(),
            mood: "Indicativo".into(),
            tense: tense.into(),
            translation: String::new(),
            icon_hint: String::new(),
            conjugations: vec![ConjugationPair::new("io", form)],
        }
    }

    #[test]
    fn dedups_by_identity() {
        let mut queue = RetryQueue::new();
        assert!(queue.enqueue(question("parlare", "Presente", "parlo")));
        assert!(!queue.enqueue(question("parlare", "Presente", "something else")));
        assert_eq!(queue.peek_count(), 1);
    }

    #[test]
    fn different_tense_is_a_different_question() {
        let mut queue = RetryQueue::new();
        queue.enqueue(question("parlare", "Presente", "parlo"));
        queue.enqueue(question("parlare", "Imperfetto", "parlavo"));
        assert_eq!(queue.peek_count(), 2);
    }

    #[test]
    fn fifo_order() {
        let mut queue = RetryQueue::new();
        queue.enqueue(question("parlare", "Presente", "parlo"));
        queue.enqueue(question("fare", "Presente", "faccio"));
        queue.enqueue(question("dire", "Presente", "dico"));

        let order: Vec<String> = std::iter::from_fn(|| queue.dequeue())
            .map(|q| q.verb)
            .collect();
        assert_eq!(order, vec!["parlare", "fare", "dire"]);
        assert!(queue.is_empty());
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn requeue_after_dequeue_is_allowed() {
        let mut queue = RetryQueue::new();
        queue.enqueue(question("parlare", "Presente", "parlo"));
        let q = queue.dequeue().unwrap();
        assert!(queue.enqueue(q));
        assert_eq!(queue.peek_count(), 1);
    }
}
