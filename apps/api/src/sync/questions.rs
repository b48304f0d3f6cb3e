//! Pass-through of upstream performance-review questions.
//!
//! Questions are proxied per request, not cached: the upstream owns the
//! question set and it is small. Payload shapes have drifted across upstream
//! revisions, so normalization accepts the known field aliases.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    pub text: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<QuestionOption>>,
    pub max_rating: i64,
    pub placeholder: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub id: Option<String>,
    pub label: Option<String>,
    pub value: Option<String>,
}

fn string_any(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        raw.get(*key).and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    })
}

fn normalize_option(raw: &Value) -> QuestionOption {
    QuestionOption {
        id: string_any(raw, &["id", "value"]),
        label: string_any(raw, &["label", "text"]),
        value: string_any(raw, &["value"]),
    }
}

fn normalize_question(raw: &Value) -> Question {
    Question {
        id: string_any(raw, &["id", "questionId"]),
        question_type: string_any(raw, &["type", "questionType"]),
        text: string_any(raw, &["text", "question"]),
        required: raw
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        options: raw
            .get("options")
            .and_then(Value::as_array)
            .map(|opts| opts.iter().map(normalize_option).collect()),
        max_rating: raw
            .get("maxRating")
            .or_else(|| raw.get("scale"))
            .and_then(Value::as_i64)
            .unwrap_or(5),
        placeholder: string_any(raw, &["placeholder"])
            .unwrap_or_else(|| "Enter your comments...".to_string()),
    }
}

/// Normalizes an upstream questions payload. Accepts either a bare array or
/// an object with a `questions` array.
pub fn normalize_questions(raw: &Value) -> Vec<Question> {
    let items = match raw {
        Value::Array(items) => items.as_slice(),
        _ => raw
            .get("questions")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
    };
    items.iter().map(normalize_question).collect()
}
