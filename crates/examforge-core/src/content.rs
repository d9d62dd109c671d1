//! Typed question content, one variant per question type.
//!
//! Raw content (generator output, hand edits) arrives as JSON and is only
//! turned into a [`QuestionContent`] after it passes the validator, so a
//! value of this type is always structurally well-formed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::QuestionType;
use crate::validator::{validate, Validation};

/// Placeholder marker a fill-in-blank text must contain.
pub const BLANK_MARKER: &str = "____";

/// Content of a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionContent {
    MultipleChoice(MultipleChoice),
    TrueFalse(TrueFalse),
    Matching(Matching),
    FillBlank(FillBlank),
    Essay(Essay),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipleChoice {
    pub stem: String,
    pub options: Options,
    /// Upper-case letter A-D.
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Options {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl Options {
    /// Options paired with their letters, in order.
    pub fn lettered(&self) -> [(&'static str, &str); 4] {
        [
            ("A", self.a.as_str()),
            ("B", self.b.as_str()),
            ("C", self.c.as_str()),
            ("D", self.d.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrueFalse {
    pub stem: String,
    pub statements: Vec<Statement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub statement: String,
    pub answer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matching {
    pub stem: String,
    pub matching: MatchingColumns,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingColumns {
    pub left: Vec<String>,
    pub right: Vec<String>,
    /// Left key to right key. Keys are not checked against the columns.
    pub answer: BTreeMap<String, String>,
}

impl MatchingColumns {
    /// Answer pairs with numeric keys in numeric order, so "2" comes before
    /// "10". Non-numeric keys follow in text order.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .answer
            .iter()
            .map(|(left, right)| (left.as_str(), right.as_str()))
            .collect();
        pairs.sort_by_key(|(left, _)| (left.trim().parse::<u64>().map_err(|_| ()), *left));
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillBlank {
    pub stem: String,
    pub fill_blank: BlankText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlankText {
    pub text: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Essay {
    pub stem: String,
    pub essay: EssayPrompt,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssayPrompt {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric: Option<Vec<String>>,
}

impl QuestionContent {
    /// Validate a raw JSON value for `question_type` and convert it.
    ///
    /// Returns the validator message (or the shape mismatch) on failure.
    pub fn from_value(question_type: QuestionType, value: Value) -> Result<Self, String> {
        let validation = validate(question_type, &value);
        if !validation.ok {
            return Err(validation.message);
        }
        let shape_err = |e: serde_json::Error| format!("{question_type}: {e}");
        let content = match question_type {
            QuestionType::MultipleChoice => {
                let mut mc: MultipleChoice = serde_json::from_value(value).map_err(shape_err)?;
                mc.correct_answer = mc.correct_answer.trim().to_uppercase();
                QuestionContent::MultipleChoice(mc)
            }
            QuestionType::TrueFalse => {
                QuestionContent::TrueFalse(serde_json::from_value(value).map_err(shape_err)?)
            }
            QuestionType::Matching => {
                let mut value = value;
                if let Some(matching) = value.get_mut("matching") {
                    for key in ["left", "right", "answer"] {
                        if let Some(entries) = matching.get_mut(key) {
                            stringify_entries(entries);
                        }
                    }
                }
                QuestionContent::Matching(serde_json::from_value(value).map_err(shape_err)?)
            }
            QuestionType::FillBlank => {
                QuestionContent::FillBlank(serde_json::from_value(value).map_err(shape_err)?)
            }
            QuestionType::Essay => {
                let mut value = value;
                if let Some(rubric) = value.pointer_mut("/essay/rubric") {
                    stringify_entries(rubric);
                }
                QuestionContent::Essay(serde_json::from_value(value).map_err(shape_err)?)
            }
        };
        Ok(content)
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionContent::MultipleChoice(_) => QuestionType::MultipleChoice,
            QuestionContent::TrueFalse(_) => QuestionType::TrueFalse,
            QuestionContent::Matching(_) => QuestionType::Matching,
            QuestionContent::FillBlank(_) => QuestionType::FillBlank,
            QuestionContent::Essay(_) => QuestionType::Essay,
        }
    }

    pub fn stem(&self) -> &str {
        match self {
            QuestionContent::MultipleChoice(c) => &c.stem,
            QuestionContent::TrueFalse(c) => &c.stem,
            QuestionContent::Matching(c) => &c.stem,
            QuestionContent::FillBlank(c) => &c.stem,
            QuestionContent::Essay(c) => &c.stem,
        }
    }

    pub fn explanation(&self) -> Option<&str> {
        match self {
            QuestionContent::MultipleChoice(c) => c.explanation.as_deref(),
            QuestionContent::TrueFalse(c) => c.explanation.as_deref(),
            QuestionContent::Matching(c) => c.explanation.as_deref(),
            QuestionContent::FillBlank(c) => c.explanation.as_deref(),
            QuestionContent::Essay(c) => c.explanation.as_deref(),
        }
    }

    /// The content in the untagged JSON shape the validator and the
    /// generation prompt use.
    pub fn to_value(&self) -> Value {
        let value = match self {
            QuestionContent::MultipleChoice(c) => serde_json::to_value(c),
            QuestionContent::TrueFalse(c) => serde_json::to_value(c),
            QuestionContent::Matching(c) => serde_json::to_value(c),
            QuestionContent::FillBlank(c) => serde_json::to_value(c),
            QuestionContent::Essay(c) => serde_json::to_value(c),
        };
        // Plain structs of strings, bools and string maps always serialize.
        value.unwrap_or(Value::Null)
    }

    /// Re-run the structural rules, e.g. after a field was edited in place.
    pub fn validate(&self) -> Validation {
        validate(self.question_type(), &self.to_value())
    }
}

/// Render the entries of an array, or the values of an object, as text.
/// Non-strings keep their JSON text; null becomes empty.
fn stringify_entries(value: &mut Value) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(stringify_entry),
        Value::Object(map) => map.values_mut().for_each(stringify_entry),
        _ => {}
    }
}

fn stringify_entry(entry: &mut Value) {
    let text = match &*entry {
        Value::String(_) => return,
        Value::Null => String::new(),
        other => other.to_string(),
    };
    *entry = Value::String(text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_normalizes_answer_letter() {
        let value = json!({
            "stem": "2 + 2 = ?",
            "options": {"A": "3", "B": "4", "C": "5", "D": "6"},
            "correct_answer": " b ",
            "explanation": "Two plus two is four."
        });
        let content = QuestionContent::from_value(QuestionType::MultipleChoice, value).unwrap();
        let QuestionContent::MultipleChoice(mc) = &content else {
            panic!("expected multiple choice");
        };
        assert_eq!(mc.correct_answer, "B");
        assert_eq!(content.stem(), "2 + 2 = ?");
        assert_eq!(content.explanation(), Some("Two plus two is four."));
    }

    #[test]
    fn from_value_reports_validator_message() {
        let err = QuestionContent::from_value(QuestionType::Essay, json!({"stem": "  "}))
            .unwrap_err();
        assert!(err.contains("stem"), "got: {err}");
    }

    #[test]
    fn from_value_keeps_non_string_entries_as_text() {
        let value = json!({
            "stem": "Match",
            "matching": {"left": [1, 2], "right": ["a", true], "answer": {"1": "a", "2": 2}}
        });
        let content = QuestionContent::from_value(QuestionType::Matching, value).unwrap();
        let QuestionContent::Matching(m) = &content else {
            panic!("expected matching");
        };
        assert_eq!(m.matching.left, vec!["1", "2"]);
        assert_eq!(m.matching.right, vec!["a", "true"]);
        assert_eq!(m.matching.answer["2"], "2");

        let value = json!({
            "stem": "Write",
            "essay": {"prompt": "Describe", "rubric": ["Ideas", 2, null]}
        });
        let content = QuestionContent::from_value(QuestionType::Essay, value).unwrap();
        let QuestionContent::Essay(e) = &content else {
            panic!("expected essay");
        };
        assert_eq!(
            e.essay.rubric,
            Some(vec!["Ideas".to_string(), "2".to_string(), String::new()])
        );
    }

    #[test]
    fn matching_pairs_sort_numerically() {
        let answer: BTreeMap<String, String> = (1..=11)
            .map(|i| (i.to_string(), ((b'A' + i as u8 - 1) as char).to_string()))
            .chain([("x".to_string(), "Z".to_string())])
            .collect();
        let columns = MatchingColumns {
            left: vec![],
            right: vec![],
            answer,
        };
        let keys: Vec<&str> = columns.pairs().iter().map(|(left, _)| *left).collect();
        assert_eq!(keys, ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "x"]);
        assert_eq!(columns.pairs()[9], ("10", "J"));
    }

    #[test]
    fn tagged_serde_roundtrip_keeps_variant() {
        let value = json!({
            "stem": "Complete the sentence",
            "fill_blank": {"text": "Hà Nội là ____ của Việt Nam.", "answer": "thủ đô"}
        });
        let content = QuestionContent::from_value(QuestionType::FillBlank, value).unwrap();
        let json = serde_json::to_string(&content).unwrap();
        assert!(json.contains("\"type\":\"fill_blank\""));
        let back: QuestionContent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, content);
        assert!(back.validate().ok);
    }

    #[test]
    fn edited_content_is_revalidated() {
        let value = json!({
            "stem": "Write a paragraph",
            "essay": {"prompt": "Describe your school.", "rubric": ["Ideas", "Grammar"]}
        });
        let mut content = QuestionContent::from_value(QuestionType::Essay, value).unwrap();
        if let QuestionContent::Essay(essay) = &mut content {
            essay.essay.prompt = "   ".into();
        }
        let validation = content.validate();
        assert!(!validation.ok);
        assert!(validation.message.contains("prompt"));
    }
}
