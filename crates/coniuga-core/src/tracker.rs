//! Verbs already presented during a session.

use std::collections::BTreeSet;

/// Grow-only set of verbs the user has already been asked.
///
/// The snapshot is handed to the generator as an exclusion list.
#[derive(Debug, Clone, Default)]
pub struct AskedVerbsTracker {
    verbs: BTreeSet<String>,
}

impl AskedVerbsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a verb. Recording the same verb twice is a no-op.
    pub fn record(&mut self, verb: &str) {
        if !self.verbs.contains(verb) {
            self.verbs.insert(verb.to_string());
        }
    }

    /// Current contents, sorted.
    pub fn snapshot(&self) -> Vec<String> {
        self.verbs.iter().cloned().collect()
    }

    pub fn contains(&self, verb: &str) -> bool {
        self.verbs.contains(verb)
    }

    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }
}
