//! Generator response parsing.
//!
//! Turns raw LLM output into validated `QuizQuestion` and `VerbData` values.
//! Validation runs to completion before anything is returned, so a caller
//! never sees a half-checked question.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::ParseError;
use crate::model::{ConjugationPair, MoodData, QuizQuestion, TenseData, VerbData};

/// Intermediate JSON structure for a quiz question.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    verb: String,
    #[serde(default, alias = "mode")]
    mood: String,
    #[serde(default)]
    tense: String,
    #[serde(default)]
    translation: String,
    #[serde(default)]
    icon_suggestion: String,
    #[serde(default)]
    conjugations: Vec<RawPair>,
}

#[derive(Debug, Deserialize)]
struct RawPair {
    #[serde(default)]
    person: String,
    #[serde(default)]
    verb: String,
}

#[derive(Debug, Deserialize)]
struct RawVerbData {
    #[serde(default)]
    verb: String,
    #[serde(default)]
    translation: String,
    #[serde(default)]
    icon_suggestion: String,
    #[serde(default)]
    conjugations: Vec<RawMood>,
}

#[derive(Debug, Deserialize)]
struct RawMood {
    #[serde(default)]
    mood: String,
    #[serde(default)]
    tenses: Vec<RawTense>,
}

#[derive(Debug, Deserialize)]
struct RawTense {
    #[serde(default)]
    tense: String,
    #[serde(default)]
    conjugations: Vec<RawPair>,
}

/// Strip surrounding whitespace and a markdown code fence, if any.
///
/// Handles ```` ```json ```` and bare ```` ``` ```` openers; a missing
/// closing fence is tolerated.
pub fn clean_json_payload(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        text = rest.strip_suffix("```").unwrap_or(rest);
    }
    text.trim()
}

/// Parse and validate a quiz question.
pub fn parse_quiz_question(raw: &str) -> Result<QuizQuestion, ParseError> {
    let parsed: RawQuestion = serde_json::from_str(clean_json_payload(raw))?;

    let verb = required(parsed.verb, "verb")?;
    let mood = required(parsed.mood, "mood")?;
    let tense = required(parsed.tense, "tense")?;
    let translation = required(parsed.translation, "translation")?;
    let context = format!("{verb} {mood} {tense}");
    let conjugations = pairs(parsed.conjugations, &context)?;

    Ok(QuizQuestion {
        verb,
        mood,
        tense,
        translation,
        icon_hint: parsed.icon_suggestion.trim().to_lowercase(),
        conjugations,
    })
}

/// Parse and validate a full conjugation table.
pub fn parse_verb_data(raw: &str) -> Result<VerbData, ParseError> {
    let parsed: RawVerbData = serde_json::from_str(clean_json_payload(raw))?;

    let verb = required(parsed.verb, "verb")?;
    let translation = required(parsed.translation, "translation")?;
    if parsed.conjugations.is_empty() {
        return Err(ParseError::NoConjugations(verb));
    }

    let conjugations = parsed
        .conjugations
        .into_iter()
        .map(|m| -> Result<MoodData, ParseError> {
            let mood = required(m.mood, "mood")?;
            if m.tenses.is_empty() {
                return Err(ParseError::NoConjugations(format!("{verb} {mood}")));
            }
            let tenses = m
                .tenses
                .into_iter()
                .map(|t| -> Result<TenseData, ParseError> {
                    let tense = required(t.tense, "tense")?;
                    let conjugations = pairs(t.conjugations, &format!("{verb} {mood} {tense}"))?;
                    Ok(TenseData {
                        tense,
                        conjugations,
                    })
                })
                .collect::<Result<Vec<_>, ParseError>>()?;
            Ok(MoodData { mood, tenses })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    Ok(VerbData {
        verb,
        translation,
        icon_hint: parsed.icon_suggestion.trim().to_lowercase(),
        conjugations,
    })
}

fn required(value: String, field: &'static str) -> Result<String, ParseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ParseError::BlankField(field));
    }
    Ok(trimmed.to_string())
}

fn pairs(raw: Vec<RawPair>, context: &str) -> Result<Vec<ConjugationPair>, ParseError> {
    if raw.is_empty() {
        return Err(ParseError::NoConjugations(context.to_string()));
    }

    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|p| -> Result<ConjugationPair, ParseError> {
            let person = required(p.person, "person")?;
            let verb = required(p.verb, "conjugated form")?;
            if !seen.insert(person.clone()) {
                return Err(ParseError::DuplicatePerson {
                    person,
                    context: context.to_string(),
                });
            }
            Ok(ConjugationPair { person, verb })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUESTION_JSON: &str = r#"{
        "verb": "parlare",
        "mood": "Indicativo",
        "tense": "Presente",
        "translation": "parler",
        "icon_suggestion": "Speak",
        "conjugations": [
            {"person": "io", "verb": "parlo"},
            {"person": "tu", "verb": "parli"},
            {"person": "lui/lei", "verb": "parla"},
            {"person": "noi", "verb": "parliamo"},
            {"person": "voi", "verb": "parlate"},
            {"person": "loro", "verb": "parlano"}
        ]
    }"#;

    #[test]
    fn clean_strips_json_fence() {
        assert_eq!(clean_json_payload("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(clean_json_payload("  ```\n{}\n```  "), "{}");
        assert_eq!(clean_json_payload("{}"), "{}");
    }

    #[test]
    fn clean_tolerates_unclosed_fence() {
        assert_eq!(clean_json_payload("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn parse_valid_question() {
        let q = parse_quiz_question(QUESTION_JSON).unwrap();
        assert_eq!(q.verb, "parlare");
        assert_eq!(q.icon_hint, "speak");
        assert_eq!(q.conjugations.len(), 6);
        assert_eq!(q.conjugations[3], ConjugationPair::new("noi", "parliamo"));
    }

    #[test]
    fn parse_fenced_question() {
        let fenced = format!("```json\n{QUESTION_JSON}\n```");
        assert!(parse_quiz_question(&fenced).is_ok());
    }

    #[test]
    fn parse_accepts_mode_alias() {
        let json = r#"{"verb":"fare","mode":"Congiuntivo","tense":"Presente","translation":"faire",
            "icon_suggestion":"make","conjugations":[{"person":"io","verb":"faccia"}]}"#;
        assert_eq!(parse_quiz_question(json).unwrap().mood, "Congiuntivo");
    }

    #[test]
    fn reject_malformed_json() {
        assert!(matches!(
            parse_quiz_question("not json at all"),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn reject_blank_tense() {
        let json = r#"{"verb":"fare","mood":"Indicativo","tense":"  ","translation":"faire",
            "conjugations":[{"person":"io","verb":"faccio"}]}"#;
        assert!(matches!(
            parse_quiz_question(json),
            Err(ParseError::BlankField("tense"))
        ));
    }

    #[test]
    fn reject_empty_conjugations() {
        let json = r#"{"verb":"fare","mood":"Indicativo","tense":"Presente","translation":"faire",
            "conjugations":[]}"#;
        assert!(matches!(
            parse_quiz_question(json),
            Err(ParseError::NoConjugations(_))
        ));
    }

    #[test]
    fn reject_duplicate_person() {
        let json = r#"{"verb":"fare","mood":"Indicativo","tense":"Presente","translation":"faire",
            "conjugations":[{"person":"io","verb":"faccio"},{"person":"io","verb":"fo"}]}"#;
        let err = parse_quiz_question(json).unwrap_err();
        assert!(err.to_string().contains("appears twice"));
    }

    #[test]
    fn reject_blank_form() {
        let json = r#"{"verb":"fare","mood":"Indicativo","tense":"Presente","translation":"faire",
            "conjugations":[{"person":"io","verb":""}]}"#;
        assert!(matches!(
            parse_quiz_question(json),
            Err(ParseError::BlankField("conjugated form"))
        ));
    }

    #[test]
    fn parse_verb_table() {
        let json = r#"{
            "verb": "essere",
            "translation": "être",
            "icon_suggestion": "be",
            "conjugations": [
                {"mood": "Indicativo", "tenses": [
                    {"tense": "Presente", "conjugations": [
                        {"person": "io", "verb": "sono"},
                        {"person": "tu", "verb": "sei"}
                    ]},
                    {"tense": "Imperfetto", "conjugations": [
                        {"person": "io", "verb": "ero"}
                    ]}
                ]},
                {"mood": "Imperativo", "tenses": [
                    {"tense": "Presente", "conjugations": [
                        {"person": "tu", "verb": "sii"}
                    ]}
                ]}
            ]
        }"#;
        let data = parse_verb_data(json).unwrap();
        assert_eq!(data.conjugations.len(), 2);
        assert_eq!(
            data.tense("Indicativo", "Imperfetto").unwrap().conjugations[0].verb,
            "ero"
        );
    }

    #[test]
    fn reject_table_with_empty_mood() {
        let json = r#"{"verb":"essere","translation":"être","icon_suggestion":"be",
            "conjugations":[{"mood":"Indicativo","tenses":[]}]}"#;
        assert!(matches!(
            parse_verb_data(json),
            Err(ParseError::NoConjugations(_))
        ));
    }
}
