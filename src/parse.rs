//! Conversion of raw generator text into typed content items.
//!
//! Models rarely return a bare JSON array; they wrap it in prose, code fences
//! or numbering. The primary strategy grabs the first top-level bracketed
//! array substring and parses that. Plain word lists additionally get a
//! line-splitting fallback; structured records (cards, pairs) do not, because
//! a half-guessed record is worse than an error.

use crate::error::{GameError, GameResult};
use serde::de::DeserializeOwned;

/// Substring spanning the first `[` through the last `]`, if any.
fn bracketed_array(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    (end > start).then(|| &raw[start..=end])
}

/// Parse a batch of structured items. Any shape mismatch is a hard error.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> GameResult<Vec<T>> {
    let array = bracketed_array(raw)
        .ok_or_else(|| GameError::Parse("no JSON array in generator output".to_string()))?;
    serde_json::from_str(array).map_err(|e| GameError::Parse(e.to_string()))
}

/// Parse a batch of plain strings, falling back to line splitting when the
/// output is not a well-formed JSON array.
pub fn parse_words(raw: &str) -> Vec<String> {
    if let Some(array) = bracketed_array(raw) {
        if let Ok(words) = serde_json::from_str::<Vec<String>>(array) {
            return words;
        }
    }

    raw.lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip leading list markers (numbers, dots, dashes, bullets) and whitespace.
fn strip_list_marker(line: &str) -> &str {
    line.trim_start()
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == '-' || c == '*')
        .trim()
}
