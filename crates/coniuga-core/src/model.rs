//! Core data model types for coniuga.
//!
//! Questions and conjugation tables arrive from an external generator and
//! are treated as immutable once received. Feedback is derived at
//! submission time.

use serde::{Deserialize, Serialize};

/// One grammatical person and its conjugated form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConjugationPair {
    /// The pronoun or person (e.g. "io", "lui/lei").
    pub person: String,
    /// The conjugated verb form.
    pub verb: String,
}

impl ConjugationPair {
    pub fn new(person: impl Into<String>, verb: impl Into<String>) -> Self {
        Self {
            person: person.into(),
            verb: verb.into(),
        }
    }
}

/// A single quiz question: conjugate `verb` in `mood`/`tense` for every person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Infinitive form.
    pub verb: String,
    pub mood: String,
    pub tense: String,
    /// Translation of the infinitive.
    pub translation: String,
    /// Lowercase English keyword used to pick an icon.
    #[serde(rename = "icon_suggestion")]
    pub icon_hint: String,
    /// Expected answers, in display order.
    pub conjugations: Vec<ConjugationPair>,
}

impl QuizQuestion {
    /// Identity used for retry deduplication.
    pub fn identity(&self) -> QuestionIdentity<'_> {
        QuestionIdentity {
            verb: &self.verb,
            mood: &self.mood,
            tense: &self.tense,
        }
    }

    /// Returns `true` if both questions share the same verb, mood, and tense.
    pub fn same_identity(&self, other: &QuizQuestion) -> bool {
        self.identity() == other.identity()
    }

    /// Persons asked by this question, in order.
    pub fn persons(&self) -> impl Iterator<Item = &str> {
        self.conjugations.iter().map(|c| c.person.as_str())
    }
}

/// Borrowed `(verb, mood, tense)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuestionIdentity<'a> {
    pub verb: &'a str,
    pub mood: &'a str,
    pub tense: &'a str,
}

/// Outcome for a single person after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub person: String,
    /// The submitted answer, trimmed.
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// All conjugations of a tense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenseData {
    pub tense: String,
    pub conjugations: Vec<ConjugationPair>,
}

/// All tenses of a mood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodData {
    pub mood: String,
    pub tenses: Vec<TenseData>,
}

/// A full conjugation table, as shown by the learn view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbData {
    pub verb: String,
    pub translation: String,
    #[serde(rename = "icon_suggestion")]
    pub icon_hint: String,
    pub conjugations: Vec<MoodData>,
}

impl VerbData {
    /// Look up one tense of one mood.
    pub fn tense(&self, mood: &str, tense: &str) -> Option<&TenseData> {
        self.conjugations
            .iter()
            .find(|m| m.mood == mood)
            .and_then(|m| m.tenses.iter().find(|t| t.tense == tense))
    }
}
