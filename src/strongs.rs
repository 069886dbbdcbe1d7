//! Strong's Concordance dictionary loading and gloss cleaning.
//!
//! The upstream data ships either as plain JSON or as a JavaScript module
//! (`var strongsHebrewDictionary = {...};`); both forms are accepted.

use crate::models::StrongsEntry;
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrongsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not locate a JSON object in {0}")]
    NoJsonObject(String),
    #[error("dictionary root is not an object")]
    NotAnObject,
}

/// Result of a dictionary load: parsed entries plus the count of malformed
/// entries that were skipped (skipping is not fatal).
#[derive(Debug)]
pub struct StrongsDictionary {
    pub entries: Vec<StrongsEntry>,
    pub skipped: usize,
}

/// Load a Strong's Hebrew dictionary from JSON or a JS-wrapped JSON file.
pub fn load_strongs(path: &Path) -> Result<StrongsDictionary, StrongsError> {
    let content = fs::read_to_string(path)?;
    parse_strongs(&content, &path.display().to_string())
}

/// Parse dictionary content. Exposed for tests.
pub fn parse_strongs(content: &str, source: &str) -> Result<StrongsDictionary, StrongsError> {
    let json_str = if content.contains("var ") || content.contains("strongsHebrewDictionary") {
        // JavaScript module form: take the outermost object literal.
        let start = content
            .find('{')
            .ok_or_else(|| StrongsError::NoJsonObject(source.to_string()))?;
        let end = content
            .rfind('}')
            .ok_or_else(|| StrongsError::NoJsonObject(source.to_string()))?;
        &content[start..=end]
    } else {
        content
    };

    let root: Value = serde_json::from_str(json_str)?;
    let map = root.as_object().ok_or(StrongsError::NotAnObject)?;

    let mut entries = Vec::with_capacity(map.len());
    let mut skipped = 0;

    for (number, value) in map {
        match parse_entry(number, value) {
            Some(entry) => entries.push(entry),
            None => skipped += 1,
        }
    }

    Ok(StrongsDictionary { entries, skipped })
}

/// Parse one entry object; None when it is not an object or carries no
/// usable lemma in any known field.
fn parse_entry(number: &str, value: &Value) -> Option<StrongsEntry> {
    let obj = value.as_object()?;

    let lemma = extract_lemma(obj)?;

    let field = |name: &str| {
        obj.get(name)
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    };

    Some(StrongsEntry {
        number: number.to_string(),
        lemma,
        xlit: field("xlit"),
        pron: field("pron"),
        kjv_def: field("kjv_def"),
    })
}

/// Hebrew lemma with field-name fallback: lemma, hebrew, word, text.
fn extract_lemma(obj: &serde_json::Map<String, Value>) -> Option<String> {
    for name in ["lemma", "hebrew", "word", "text"] {
        if let Some(text) = obj.get(name).and_then(Value::as_str) {
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

/// Clean a raw KJV definition string into a gloss list.
///
/// Strips the concordance's markup (`[idiom]`, `[phrase]`, `X`, `+`, `×`),
/// splits on commas, drops parenthesized qualifiers, lowercases, and keeps
/// only word characters, whitespace and hyphens. Single-character fragments
/// are discarded.
///
/// Returns the comma-joined string and the individual glosses.
pub fn clean_kjv_glosses(kjv_def: &str) -> (String, Vec<String>) {
    if kjv_def.is_empty() {
        return (String::new(), Vec::new());
    }

    let cleaned = kjv_def
        .replace("[idiom]", "")
        .replace("[phrase]", "")
        .replace(['X', '+', '×'], "");

    let mut glosses = Vec::new();

    for part in cleaned.split(',') {
        let part = strip_parenthesized(part);
        let part: String = part
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
            .collect();
        let part = part.trim().to_string();

        if part.chars().count() > 1 {
            glosses.push(part);
        }
    }

    (glosses.join(","), glosses)
}

/// Remove `(...)` spans, non-nested, as they appear in KJV definitions.
fn strip_parenthesized(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let content = r#"{
            "H1": {"lemma": "אָב", "xlit": "ʼâb", "kjv_def": "father"},
            "H157": {"lemma": "אָהַב", "kjv_def": "love"}
        }"#;
        let dict = parse_strongs(content, "test").unwrap();
        assert_eq!(dict.entries.len(), 2);
        assert_eq!(dict.skipped, 0);
        let h1 = dict.entries.iter().find(|e| e.number == "H1").unwrap();
        assert_eq!(h1.lemma, "אָב");
        assert_eq!(h1.xlit, "ʼâb");
    }

    #[test]
    fn test_parse_js_wrapped() {
        let content = r#"var strongsHebrewDictionary = {
            "H1": {"lemma": "אָב", "kjv_def": "father"}
        };"#;
        let dict = parse_strongs(content, "test").unwrap();
        assert_eq!(dict.entries.len(), 1);
        assert_eq!(dict.entries[0].lemma, "אָב");
    }

    #[test]
    fn test_js_without_object_is_error() {
        let err = parse_strongs("var strongsHebrewDictionary = null;", "bad.js");
        assert!(matches!(err, Err(StrongsError::NoJsonObject(_))));
    }

    #[test]
    fn test_field_fallback() {
        let content = r#"{
            "H2": {"hebrew": "אָהַב"},
            "H3": {"word": "דָּוִד"},
            "H4": {"text": "תּוֹרָה"}
        }"#;
        let dict = parse_strongs(content, "test").unwrap();
        assert_eq!(dict.entries.len(), 3);
        let lemmas: Vec<&str> = dict.entries.iter().map(|e| e.lemma.as_str()).collect();
        assert!(lemmas.contains(&"אָהַב"));
        assert!(lemmas.contains(&"דָּוִד"));
        assert!(lemmas.contains(&"תּוֹרָה"));
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let content = r#"{
            "H1": {"lemma": "אָב"},
            "H2": "not an object",
            "H3": {"other": "no lemma field"}
        }"#;
        let dict = parse_strongs(content, "test").unwrap();
        assert_eq!(dict.entries.len(), 1);
        assert_eq!(dict.skipped, 2);
    }

    #[test]
    fn test_clean_glosses_basic() {
        let (joined, list) = clean_kjv_glosses("father, chief, forefather");
        assert_eq!(list, vec!["father", "chief", "forefather"]);
        assert_eq!(joined, "father,chief,forefather");
    }

    #[test]
    fn test_clean_glosses_markers() {
        let (_, list) = clean_kjv_glosses("[idiom] beloved, X dearly, + friend");
        assert_eq!(list, vec!["beloved", "dearly", "friend"]);
    }

    #[test]
    fn test_clean_glosses_parens_and_case() {
        let (_, list) = clean_kjv_glosses("Love (affection), LIKE (to be fond of)");
        assert_eq!(list, vec!["love", "like"]);
    }

    #[test]
    fn test_clean_glosses_drops_short() {
        let (_, list) = clean_kjv_glosses("a, go, I");
        assert_eq!(list, vec!["go"]);
    }

    #[test]
    fn test_clean_glosses_empty() {
        let (joined, list) = clean_kjv_glosses("");
        assert!(joined.is_empty());
        assert!(list.is_empty());
    }

    #[test]
    fn test_clean_glosses_keeps_hyphens() {
        let (_, list) = clean_kjv_glosses("burnt-offering");
        assert_eq!(list, vec!["burnt-offering"]);
    }
}
