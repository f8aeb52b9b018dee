//! Reply parsing for personalization.
//!
//! The prompt asks for a JSON array of `{"index", "text"}` objects. When the
//! model ignores that, fall back to scanning for `Text N:` lines.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::llm_client::strip_json_fences;

#[derive(Debug, Deserialize)]
struct IndexedText {
    index: usize,
    text: String,
}

/// Parses a model reply into exactly `expected` personalized texts.
///
/// Entries the model did not produce are empty strings.
pub fn parse_personalized_reply(reply: &str, expected: usize) -> Vec<String> {
    if let Some(texts) = parse_structured(reply, expected) {
        debug!("Parsed structured personalization reply");
        return texts;
    }

    warn!("Personalization reply is not structured JSON; scanning for `Text N:` lines");
    scan_prefixed_lines(reply, expected)
}

/// Accepts the reply only if every index is within `1..=expected` and unique.
fn parse_structured(reply: &str, expected: usize) -> Option<Vec<String>> {
    let entries: Vec<IndexedText> = serde_json::from_str(strip_json_fences(reply)).ok()?;

    let mut seen = HashSet::new();
    for entry in &entries {
        if entry.index == 0 || entry.index > expected || !seen.insert(entry.index) {
            return None;
        }
    }

    let mut texts = vec![String::new(); expected];
    for entry in entries {
        texts[entry.index - 1] = entry.text.trim().to_string();
    }
    Some(texts)
}

/// For each index N (1-based), takes the first line starting with `Text N:`.
pub fn scan_prefixed_lines(reply: &str, expected: usize) -> Vec<String> {
    (1..=expected)
        .map(|n| {
            let prefix = format!("Text {n}:");
            reply
                .lines()
                .find_map(|line| line.strip_prefix(prefix.as_str()))
                .map(|rest| rest.trim().to_string())
                .unwrap_or_default()
        })
        .collect()
}
