//! Structural validation of raw question content.
//!
//! Every rule short-circuits on the first violation and reports a message
//! specific enough to fix the content by hand.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::content::BLANK_MARKER;
use crate::model::QuestionType;

const OPTION_KEYS: [&str; 4] = ["A", "B", "C", "D"];

/// Outcome of validating one content value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub ok: bool,
    pub message: String,
}

impl Validation {
    pub fn pass() -> Self {
        Self {
            ok: true,
            message: "OK".to_string(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Validate content given a free-form type tag.
///
/// The object and stem checks run first; an unknown tag then fails with a
/// message naming it.
pub fn validate_tagged(tag: &str, content: &Value) -> Validation {
    if let Err(message) = check_common(content) {
        return Validation::fail(message);
    }
    match tag.parse::<QuestionType>() {
        Ok(question_type) => validate(question_type, content),
        Err(message) => Validation::fail(message),
    }
}

/// Validate `content` against the structural rules of `question_type`.
pub fn validate(question_type: QuestionType, content: &Value) -> Validation {
    let obj = match check_common(content) {
        Ok(obj) => obj,
        Err(message) => return Validation::fail(message),
    };

    let result = match question_type {
        QuestionType::MultipleChoice => check_multiple_choice(obj),
        QuestionType::TrueFalse => check_true_false(obj),
        QuestionType::Matching => check_matching(obj),
        QuestionType::FillBlank => check_fill_blank(obj),
        QuestionType::Essay => check_essay(obj),
    };

    match result {
        Ok(()) => Validation::pass(),
        Err(message) => Validation::fail(message),
    }
}

/// Rules shared by every type: an object with a non-blank stem.
fn check_common(content: &Value) -> Result<&Map<String, Value>, &'static str> {
    let obj = content.as_object().ok_or("content is not a JSON object")?;
    if non_empty_str(obj.get("stem")).is_none() {
        return Err("missing 'stem' (question text)");
    }
    Ok(obj)
}

/// Trimmed string content, if the value is a string with non-blank text.
fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn check_multiple_choice(obj: &Map<String, Value>) -> Result<(), String> {
    let options = obj
        .get("options")
        .and_then(Value::as_object)
        .ok_or("multiple_choice: 'options' must be an object")?;
    for key in OPTION_KEYS {
        if non_empty_str(options.get(key)).is_none() {
            return Err(format!("multiple_choice: missing option {key}"));
        }
    }
    let answer = obj
        .get("correct_answer")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_uppercase())
        .unwrap_or_default();
    if !OPTION_KEYS.contains(&answer.as_str()) {
        return Err("multiple_choice: 'correct_answer' must be A, B, C or D".to_string());
    }
    Ok(())
}

fn check_true_false(obj: &Map<String, Value>) -> Result<(), String> {
    let statements = obj
        .get("statements")
        .and_then(Value::as_array)
        .filter(|s| s.len() >= 2)
        .ok_or("true_false: 'statements' needs at least 2 entries")?;
    for (i, entry) in statements.iter().enumerate() {
        let n = i + 1;
        let Some(entry) = entry.as_object() else {
            return Err(format!("true_false: statement {n} is not an object"));
        };
        if non_empty_str(entry.get("statement")).is_none() {
            return Err(format!("true_false: statement {n} has no text"));
        }
        if !matches!(entry.get("answer"), Some(Value::Bool(_))) {
            return Err(format!("true_false: answer of statement {n} must be true or false"));
        }
    }
    Ok(())
}

fn check_matching(obj: &Map<String, Value>) -> Result<(), String> {
    let matching = obj
        .get("matching")
        .and_then(Value::as_object)
        .ok_or("matching: 'matching' must be an object")?;
    let long_enough = |key: &str| {
        matching
            .get(key)
            .and_then(Value::as_array)
            .is_some_and(|items| items.len() >= 2)
    };
    if !long_enough("left") {
        return Err("matching: 'left' needs at least 2 entries".to_string());
    }
    if !long_enough("right") {
        return Err("matching: 'right' needs at least 2 entries".to_string());
    }
    let pairs = matching
        .get("answer")
        .and_then(Value::as_object)
        .map_or(0, Map::len);
    if pairs < 2 {
        return Err("matching: 'answer' needs at least 2 pairs".to_string());
    }
    Ok(())
}

fn check_fill_blank(obj: &Map<String, Value>) -> Result<(), String> {
    let blank = obj
        .get("fill_blank")
        .and_then(Value::as_object)
        .ok_or("fill_blank: 'fill_blank' must be an object")?;
    let text = blank.get("text").and_then(Value::as_str).unwrap_or_default();
    if !text.contains(BLANK_MARKER) {
        return Err(format!("fill_blank: 'text' must contain the blank '{BLANK_MARKER}'"));
    }
    if non_empty_str(blank.get("answer")).is_none() {
        return Err("fill_blank: missing 'answer'".to_string());
    }
    Ok(())
}

fn check_essay(obj: &Map<String, Value>) -> Result<(), String> {
    let essay = obj
        .get("essay")
        .and_then(Value::as_object)
        .ok_or("essay: 'essay' must be an object")?;
    if non_empty_str(essay.get("prompt")).is_none() {
        return Err("essay: missing 'prompt'".to_string());
    }
    match essay.get("rubric") {
        None | Some(Value::Null) | Some(Value::Array(_)) => Ok(()),
        Some(_) => Err("essay: 'rubric' must be a list when present".to_string()),
    }
}
