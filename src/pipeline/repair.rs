//! Repair of model output into a JSON object.
//!
//! Models asked for "JSON only" still wrap the payload in prose or Markdown
//! fences now and then. Parsing is attempted in a fixed order:
//!
//! 1. the whole text, strictly;
//! 2. the substring from the first `{` to the last `}`.
//!
//! Only a JSON *object* is accepted at either step. When both fail the
//! error carries a short, whitespace-collapsed preview of what the model
//! actually said.

use crate::error::BrdError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Maximum number of characters kept in a diagnostic preview.
pub const PREVIEW_CHARS: usize = 500;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Parse the model's raw completion text into a JSON object.
pub fn parse_report_json(raw: &str) -> Result<Map<String, Value>, BrdError> {
    if let Some(map) = parse_object(raw) {
        return Ok(map);
    }

    if let Some(inner) = outer_braces(raw) {
        if let Some(map) = parse_object(inner) {
            debug!(
                "Recovered JSON object from {} of {} bytes",
                inner.len(),
                raw.len()
            );
            return Ok(map);
        }
    }

    let preview = compact_preview(raw);
    warn!("Model output is not JSON: {}", preview);
    Err(BrdError::MalformedModelOutput { preview })
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Slice from the first `{` to the last `}` inclusive, if such a pair exists.
fn outer_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Collapse whitespace runs to single spaces and keep at most
/// [`PREVIEW_CHARS`] characters.
pub fn compact_preview(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text.trim(), " ");
    if collapsed.is_empty() {
        return "<empty response>".to_string();
    }
    collapsed.chars().take(PREVIEW_CHARS).collect()
}
