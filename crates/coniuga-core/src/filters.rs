//! User-selected quiz constraints.

use serde::{Deserialize, Serialize};

use crate::reference::ReferenceData;

/// Filters for the random quiz. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizFilters {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub tense: Option<String>,
}

impl QuizFilters {
    pub fn any() -> Self {
        Self::default()
    }

    /// Drop a tense that does not belong to the selected mood.
    pub fn reconcile(mut self, reference: &ReferenceData) -> Self {
        if let (Some(mood), Some(tense)) = (&self.mood, &self.tense) {
            if !reference.is_valid_tense(mood, tense) {
                tracing::debug!(%mood, %tense, "clearing tense filter not valid for mood");
                self.tense = None;
            }
        }
        self
    }
}

/// An exact verb/mood/tense target for the focused quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificTarget {
    pub verb: String,
    pub mood: String,
    pub tense: String,
}

impl SpecificTarget {
    pub fn new(verb: impl Into<String>, mood: impl Into<String>, tense: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            mood: mood.into(),
            tense: tense.into(),
        }
    }

    /// Replace an invalid tense with the mood's first tense.
    ///
    /// Leaves the target unchanged when the mood is unknown.
    pub fn reconcile(mut self, reference: &ReferenceData) -> Self {
        let tenses = reference.tenses_for(Some(&self.mood));
        if !tenses.contains(&self.tense.as_str()) {
            if let Some(first) = tenses.first() {
                self.tense = first.to_string();
            }
        }
        self
    }
}
