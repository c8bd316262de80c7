//! The `coniuga learn` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use comfy_table::{Cell, Table};

use coniuga_core::model::{MoodData, VerbData};
use coniuga_core::traits::{ConjugationProvider, LlmProvider};
use coniuga_providers::config::load_config_from;
use coniuga_providers::LlmGenerator;

pub const DEFAULT_VERB: &str = "essere";

pub async fn execute(verb: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let provider: Arc<dyn LlmProvider> = Arc::from(config.default_llm()?);
    let generator = LlmGenerator::new(provider, config.generator_config());

    eprintln!("Fetching conjugations for '{verb}'...");
    let data = generator.conjugation_table(&verb).await?;

    print!("{}", render_verb_data(&data));
    Ok(())
}

/// Header line plus one table per mood.
pub fn render_verb_data(data: &VerbData) -> String {
    let mut out = format!("{} ({}) [{}]\n", data.verb, data.translation, data.icon_hint);
    for mood in &data.conjugations {
        out.push_str(&format!("\n{}\n{}\n", mood.mood, mood_table(mood)));
    }
    out
}

/// Persons as rows, tenses as columns. Persons missing from a tense
/// (e.g. `io` in the imperative) are left blank.
fn mood_table(mood: &MoodData) -> Table {
    let mut persons: Vec<&str> = Vec::new();
    for tense in &mood.tenses {
        for pair in &tense.conjugations {
            if !persons.contains(&pair.person.as_str()) {
                persons.push(&pair.person);
            }
        }
    }

    let mut table = Table::new();
    let mut header = vec![Cell::new("")];
    header.extend(mood.tenses.iter().map(|t| Cell::new(&t.tense)));
    table.set_header(header);

    for person in persons {
        let mut row = vec![Cell::new(person)];
        row.extend(mood.tenses.iter().map(|tense| {
            let form = tense
                .conjugations
                .iter()
                .find(|pair| pair.person == person)
                .map_or("", |pair| pair.verb.as_str());
            Cell::new(form)
        }));
        table.add_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use coniuga_core::model::{ConjugationPair, TenseData};

    fn tense(name: &str, forms: &[(&str, &str)]) -> TenseData {
        TenseData {
            tense: name.into(),
            conjugations: forms
                .iter()
                .map(|(p, v)| ConjugationPair::new(*p, *v))
                .collect(),
        }
    }

    #[test]
    fn renders_one_table_per_mood() {
        let data = VerbData {
            verb: "essere".into(),
            translation: "être".into(),
            icon_hint: "be".into(),
            conjugations: vec![
                MoodData {
                    mood: "Indicativo".into(),
                    tenses: vec![
                        tense("Presente", &[("io", "sono"), ("tu", "sei")]),
                        tense("Imperfetto", &[("io", "ero"), ("tu", "eri")]),
                    ],
                },
                MoodData {
                    mood: "Imperativo".into(),
                    tenses: vec![tense("Presente", &[("tu", "sii")])],
                },
            ],
        };

        let rendered = render_verb_data(&data);
        assert!(rendered.starts_with("essere (être) [be]"));
        assert!(rendered.contains("Indicativo"));
        assert!(rendered.contains("Imperfetto"));
        assert!(rendered.contains("eri"));
        assert!(rendered.contains("Imperativo"));
        assert!(rendered.contains("sii"));
    }

    #[test]
    fn missing_person_is_blank() {
        let mood = MoodData {
            mood: "Imperativo".into(),
            tenses: vec![
                tense("Presente", &[("tu", "parla")]),
                tense("Negativo", &[("io", "-"), ("tu", "non parlare")]),
            ],
        };
        let table = mood_table(&mood);
        assert_eq!(table.row_iter().count(), 2);
    }
}
