//! Prompt construction for question and table generation.

use coniuga_core::reference::ReferenceData;
use coniuga_core::traits::GenerationRequest;

/// Persons every question must cover.
pub const PERSONS: [&str; 6] = ["io", "tu", "lui/lei", "noi", "voi", "loro"];

/// System prompt shared by both generation tasks.
pub const SYSTEM_PROMPT: &str = "You are an Italian grammar assistant. Respond ONLY with a single JSON object matching the requested shape. Do not add explanations or markdown.";

const QUESTION_SHAPE: &str = r#"{"verb": string, "mood": string, "tense": string, "translation": string, "icon_suggestion": string, "conjugations": [{"person": string, "verb": string}]}"#;

const TABLE_SHAPE: &str = r#"{"verb": string, "translation": string, "icon_suggestion": string, "conjugations": [{"mood": string, "tenses": [{"tense": string, "conjugations": [{"person": string, "verb": string}]}]}]}"#;

/// Build the prompt for one quiz question.
///
/// A specific verb takes precedence over the category. Unknown categories
/// fall back to "a common verb".
pub fn question_prompt(
    request: &GenerationRequest,
    reference: &ReferenceData,
    translation_language: &str,
) -> String {
    let mut prompt = String::new();

    match &request.verb {
        Some(verb) => {
            prompt.push_str(&format!(
                "Generate a quiz question for the Italian verb '{verb}'. "
            ));
        }
        None => {
            prompt.push_str("Generate a quiz question about conjugating an Italian verb. ");
            match request
                .category
                .as_deref()
                .and_then(|name| reference.category(name))
            {
                Some(category) => prompt.push_str(&format!(
                    "Choose a verb from this list of '{}' verbs: {}. ",
                    category.name,
                    category.verbs.join(", ")
                )),
                None => prompt.push_str(
                    "Choose a common Italian verb (auxiliary, regular, or common irregular). ",
                ),
            }
        }
    }

    match &request.mood {
        Some(mood) => prompt.push_str(&format!("The mood must be '{mood}'. ")),
        None => {
            let moods: Vec<&str> = reference.mood_names().collect();
            prompt.push_str(&format!(
                "Choose a mood at random among {}. ",
                moods.join(", ")
            ));
        }
    }

    match &request.tense {
        Some(tense) => prompt.push_str(&format!("The tense must be '{tense}'. ")),
        None => prompt.push_str("Choose a tense at random that fits the chosen mood. "),
    }

    if request.verb.is_none() && !request.exclude.is_empty() {
        prompt.push_str(&format!(
            "Do not use any of these verbs, they were already asked: {}. ",
            request.exclude.join(", ")
        ));
    }

    prompt.push_str(&format!(
        "Provide the full conjugation for every person ({}) in the chosen mood and tense. \
         Also provide the {translation_language} translation of the infinitive and a single \
         lowercase English keyword for an icon (for example 'eat', 'speak', 'go'). \
         Answer with JSON shaped exactly like: {QUESTION_SHAPE}",
        PERSONS.join(", ")
    ));

    prompt
}

/// Build the prompt for a full conjugation table.
pub fn table_prompt(verb: &str, translation_language: &str) -> String {
    format!(
        "Provide the complete conjugation of the Italian verb '{verb}', covering every mood \
         and tense. Also provide the {translation_language} translation of the infinitive and \
         a single lowercase English keyword for an icon (for example 'eat', 'speak', 'go'). \
         Answer with JSON shaped exactly like: {TABLE_SHAPE}"
    )
}
