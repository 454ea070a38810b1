//! Parsing of the structured plan returned by the project wizard.
//!
//! The model is asked for a bare JSON object but regularly wraps it in a
//! Markdown code fence. The fence is stripped before parsing; anything that
//! is still not JSON is rejected as a whole, never partially accepted.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Leading fence, with or without the `json` language tag.
static OPENING_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?:json)?").expect("valid regex"));

/// Trailing fence.
static CLOSING_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```$").expect("valid regex"));

/// Step plan, material list and time estimate for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiPlan {
    pub steps: Vec<String>,
    pub materials: Vec<String>,
    pub time_estimate: String,
}

/// Remove a surrounding triple-backtick fence, if the text starts with one.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let without_open = match OPENING_FENCE_RE.find(trimmed) {
        Some(m) => &trimmed[m.end()..],
        None => trimmed,
    };
    let without_close = match CLOSING_FENCE_RE.find(without_open) {
        Some(m) => &without_open[..m.start()],
        None => without_open,
    };
    without_close.trim()
}

/// Parse the wizard answer into an [`AiPlan`].
///
/// Missing fields default to empty. Returns
/// [`CoreError::InvalidAiResponse`] carrying the original text when the
/// stripped answer is not a JSON object.
pub fn parse_plan(raw: &str) -> Result<AiPlan, CoreError> {
    let invalid = || CoreError::InvalidAiResponse {
        raw: raw.to_string(),
    };
    let value: Value = serde_json::from_str(strip_code_fence(raw)).map_err(|_| invalid())?;
    if !value.is_object() {
        return Err(invalid());
    }

    Ok(AiPlan {
        steps: string_list(value.get("steps")),
        materials: string_list(value.get("materials")),
        time_estimate: value
            .get("time_estimate")
            .map(scalar_to_string)
            .unwrap_or_default(),
    })
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(scalar_to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
