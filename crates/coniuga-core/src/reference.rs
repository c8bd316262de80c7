//! Static reference data: verb categories, moods, and tenses.
//!
//! The tables are trusted as given. Nothing here checks that a category's
//! verbs exist or that moods and tenses line up.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A named group of verbs (e.g. "Regular -are verbs").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbCategory {
    pub name: String,
    pub verbs: Vec<String>,
}

/// A mood and its tenses, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodTenses {
    pub mood: String,
    pub tenses: Vec<String>,
}

/// Read-only lookup tables for filters and prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub categories: Vec<VerbCategory>,
    #[serde(default)]
    pub moods: Vec<MoodTenses>,
}

impl ReferenceData {
    /// Built-in Italian tables.
    pub fn italian() -> Self {
        fn category(name: &str, verbs: &[&str]) -> VerbCategory {
            VerbCategory {
                name: name.to_string(),
                verbs: verbs.iter().map(|v| v.to_string()).collect(),
            }
        }
        fn mood(mood: &str, tenses: &[&str]) -> MoodTenses {
            MoodTenses {
                mood: mood.to_string(),
                tenses: tenses.iter().map(|t| t.to_string()).collect(),
            }
        }

        Self {
            categories: vec![
                category("Verbes auxiliaires", &["essere", "avere"]),
                category(
                    "Verbes réguliers en -are",
                    &["parlare", "mangiare", "guardare", "trovare"],
                ),
                category(
                    "Verbes réguliers en -ere",
                    &["credere", "vedere", "leggere", "scrivere"],
                ),
                category(
                    "Verbes réguliers en -ire",
                    &["dormire", "sentire", "partire", "finire"],
                ),
                category(
                    "Verbes irréguliers",
                    &[
                        "andare", "fare", "dire", "potere", "volere", "sapere", "stare", "dare",
                        "venire", "uscire",
                    ],
                ),
            ],
            moods: vec![
                mood(
                    "Indicativo",
                    &[
                        "Presente",
                        "Passato prossimo",
                        "Imperfetto",
                        "Trapassato prossimo",
                        "Passato remoto",
                        "Trapassato remoto",
                        "Futuro semplice",
                        "Futuro anteriore",
                    ],
                ),
                mood(
                    "Congiuntivo",
                    &["Presente", "Passato", "Imperfetto", "Trapassato"],
                ),
                mood("Condizionale", &["Presente", "Passato"]),
                mood("Imperativo", &["Presente"]),
            ],
        }
    }

    pub fn category(&self, name: &str) -> Option<&VerbCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Every verb across all categories, in category order.
    pub fn all_verbs(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|c| c.verbs.iter().map(String::as_str))
    }

    pub fn mood_names(&self) -> impl Iterator<Item = &str> {
        self.moods.iter().map(|m| m.mood.as_str())
    }

    /// Tenses valid for `mood`, or every tense when `mood` is `None`.
    pub fn tenses_for(&self, mood: Option<&str>) -> Vec<&str> {
        match mood {
            Some(mood) => self
                .moods
                .iter()
                .find(|m| m.mood == mood)
                .map(|m| m.tenses.iter().map(String::as_str).collect())
                .unwrap_or_default(),
            None => self.all_tenses(),
        }
    }

    /// Flattened tenses across all moods, first occurrence wins.
    pub fn all_tenses(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.moods
            .iter()
            .flat_map(|m| m.tenses.iter().map(String::as_str))
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Returns `true` if `tense` belongs to `mood`.
    pub fn is_valid_tense(&self, mood: &str, tense: &str) -> bool {
        self.tenses_for(Some(mood)).contains(&tense)
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::italian()
    }
}

/// Load reference data from a TOML file.
pub fn load_reference_data(path: &Path) -> Result<ReferenceData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read reference data: {}", path.display()))?;
    parse_reference_str(&content, path)
}

/// Parse reference data from a TOML string.
pub fn parse_reference_str(content: &str, source_path: &Path) -> Result<ReferenceData> {
    toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))
}
