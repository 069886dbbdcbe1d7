//! Gloss search and structural-query helpers.
//!
//! Supports the query-assistance workflow: find mapping entries by English
//! gloss, pull likely search terms out of free-form input, assemble a
//! context block for prompt templates, and validate hand-written structural
//! queries before they run.

use thiserror::Error;

use crate::models::ForwardMapping;

/// Node types a structural query may open with.
pub const VALID_NODE_TYPES: &[&str] = &[
    "word", "phrase", "clause", "sentence", "verse", "chapter", "book",
];

/// English terms worth looking up even when not quoted.
const COMMON_TERMS: &[&str] = &[
    "give", "create", "say", "see", "make", "go", "come", "take", "YHWH", "God", "lord", "heaven",
    "earth", "man", "woman", "day", "night", "light", "darkness", "water", "land", "verb", "noun",
    "preposition", "to", "in", "from",
];

/// One gloss-search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct GlossHit {
    pub strongs: String,
    pub lemma: String,
    pub glosses: String,
}

/// Case-insensitive substring search over the mapping's cleaned glosses,
/// capped at `max_results`.
pub fn search_glosses(mapping: &ForwardMapping, term: &str, max_results: usize) -> Vec<GlossHit> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    mapping
        .entries
        .iter()
        .filter(|entry| entry.kjv_glosses.contains(&needle))
        .take(max_results)
        .map(|entry| GlossHit {
            strongs: entry.strongs_number.clone(),
            lemma: entry.strongs_lemma.clone(),
            glosses: entry.kjv_glosses.clone(),
        })
        .collect()
}

/// Pull candidate search terms out of free-form input: anything in double
/// or single quotes, plus a fixed list of common terms when present.
/// First occurrence order, no duplicates.
pub fn extract_keywords(input: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    let mut push = |term: String| {
        if !term.is_empty() && !keywords.contains(&term) {
            keywords.push(term);
        }
    };

    for quote in ['"', '\''] {
        let mut parts = input.split(quote);
        // Odd-indexed fragments sit between quote pairs; a trailing odd
        // fragment means the quote was never closed.
        parts.next();
        while let Some(quoted) = parts.next() {
            if parts.next().is_none() {
                break;
            }
            push(quoted.to_string());
        }
    }

    let input_lower = input.to_lowercase();
    for term in COMMON_TERMS {
        if input_lower.contains(&term.to_lowercase()) {
            push((*term).to_string());
        }
    }

    keywords
}

/// Assemble the context block handed to a query template: matched lexemes
/// first, then the user's request.
pub fn build_context_prompt(input: &str, hits: &[GlossHit]) -> String {
    let mut parts = Vec::new();

    if !hits.is_empty() {
        parts.push("## RELEVANT LEXEMES\n".to_string());
        for hit in hits {
            parts.push(format!("- {}: {} ({})", hit.glosses, hit.lemma, hit.strongs));
        }
        parts.push("\n".to_string());
    }

    parts.push("## USER REQUEST\n".to_string());
    parts.push(input.to_string());

    parts.join("\n")
}

/// Why a structural query was rejected.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("query is empty")]
    Empty,
    #[error("line {line}: indentation must use multiples of 2 spaces")]
    OddIndentation { line: usize },
    #[error("line {line}: use spaces, not tabs for indentation")]
    Tabs { line: usize },
    #[error("line {line}: use '{wanted}=' not '{found}=' for {feature}")]
    WrongFeatureName {
        line: usize,
        found: &'static str,
        wanted: &'static str,
        feature: &'static str,
    },
    #[error("first line must start with a valid node type: {0}")]
    BadNodeType(String),
}

/// Validate a structural query's surface syntax.
///
/// Checks indentation (even spaces, no tabs), the feature-name mistakes
/// people actually make, and that the first line opens with a known node
/// type (an optional `name:` prefix is allowed).
pub fn validate_query(query: &str) -> Result<(), QueryError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(QueryError::Empty);
    }
    let lines: Vec<&str> = trimmed.lines().collect();

    const FEATURE_FIXES: &[(&str, &str, &str)] = &[
        ("pos", "sp", "part of speech"),
        ("gender", "gn", "gender"),
        ("number", "nu", "number"),
    ];

    for (i, line) in lines.iter().enumerate() {
        let line_no = i + 1;

        let leading = line.len() - line.trim_start_matches(' ').len();
        if leading % 2 != 0 {
            return Err(QueryError::OddIndentation { line: line_no });
        }

        if line.contains('\t') {
            return Err(QueryError::Tabs { line: line_no });
        }

        for &(found, wanted, feature) in FEATURE_FIXES {
            if line.contains(&format!("{found}=")) {
                return Err(QueryError::WrongFeatureName {
                    line: line_no,
                    found,
                    wanted,
                    feature,
                });
            }
        }
    }

    let first = lines[0].trim();
    let node_type = first
        .split_whitespace()
        .next()
        .and_then(|token| token.split(':').next_back())
        .unwrap_or("");

    if !VALID_NODE_TYPES.contains(&node_type) {
        return Err(QueryError::BadNodeType(VALID_NODE_TYPES.join(", ")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, MappingEntry, MappingParams, MappingSummary};

    fn mapping_with_glosses(entries: &[(&str, &str, &str)]) -> ForwardMapping {
        ForwardMapping {
            version: "test".to_string(),
            parameters: MappingParams::default(),
            entries: entries
                .iter()
                .map(|(number, lemma, glosses)| MappingEntry {
                    strongs_number: number.to_string(),
                    strongs_lemma: lemma.to_string(),
                    strongs_normalized: String::new(),
                    candidates: Vec::new(),
                    kjv_glosses: glosses.to_string(),
                    gloss_list: glosses.split(',').map(str::to_string).collect(),
                    confidence: Confidence::None,
                    match_count: 0,
                })
                .collect(),
            summary: MappingSummary::default(),
        }
    }

    #[test]
    fn test_search_glosses() {
        let mapping = mapping_with_glosses(&[
            ("H157", "אָהַב", "love,beloved"),
            ("H1", "אָב", "father,chief"),
            ("H160", "אַהֲבָה", "love"),
        ]);
        let hits = search_glosses(&mapping, "love", 10);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].strongs, "H157");
        assert_eq!(hits[1].strongs, "H160");
    }

    #[test]
    fn test_search_glosses_case_and_cap() {
        let mapping = mapping_with_glosses(&[
            ("H157", "אָהַב", "love"),
            ("H160", "אַהֲבָה", "love"),
        ]);
        assert_eq!(search_glosses(&mapping, "  LOVE ", 1).len(), 1);
        assert!(search_glosses(&mapping, "", 10).is_empty());
        assert!(search_glosses(&mapping, "zebra", 10).is_empty());
    }

    #[test]
    fn test_extract_quoted_keywords() {
        let keywords = extract_keywords("find verses with \"shalom\" or 'mishpat'");
        assert!(keywords.contains(&"shalom".to_string()));
        assert!(keywords.contains(&"mishpat".to_string()));
        // An unclosed quote is not a term.
        assert!(!extract_keywords("see \"shalom").contains(&"shalom".to_string()));
    }

    #[test]
    fn test_extract_common_terms() {
        let keywords = extract_keywords("verses where God created the heaven");
        assert!(keywords.contains(&"create".to_string()));
        assert!(keywords.contains(&"God".to_string()));
        assert!(keywords.contains(&"heaven".to_string()));
    }

    #[test]
    fn test_extract_keywords_dedup() {
        let keywords = extract_keywords("\"light\" and more light");
        let count = keywords.iter().filter(|k| k.as_str() == "light").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_build_context_prompt() {
        let hits = vec![GlossHit {
            strongs: "H157".to_string(),
            lemma: "אָהַב".to_string(),
            glosses: "love".to_string(),
        }];
        let prompt = build_context_prompt("verbs of love", &hits);
        assert!(prompt.contains("## RELEVANT LEXEMES"));
        assert!(prompt.contains("- love: אָהַב (H157)"));
        assert!(prompt.contains("## USER REQUEST"));
        assert!(prompt.ends_with("verbs of love"));

        let bare = build_context_prompt("anything", &[]);
        assert!(!bare.contains("RELEVANT LEXEMES"));
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        let query = "clause\n  phrase function=Pred\n    word sp=verb";
        assert_eq!(validate_query(query), Ok(()));
    }

    #[test]
    fn test_validate_named_node_type() {
        assert_eq!(validate_query("w:word sp=verb"), Ok(()));
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert_eq!(validate_query("   \n  "), Err(QueryError::Empty));
    }

    #[test]
    fn test_validate_rejects_odd_indent() {
        let query = "clause\n   word";
        assert_eq!(
            validate_query(query),
            Err(QueryError::OddIndentation { line: 2 })
        );
    }

    #[test]
    fn test_validate_rejects_tabs() {
        let query = "clause\n\tword";
        assert_eq!(validate_query(query), Err(QueryError::Tabs { line: 2 }));
    }

    #[test]
    fn test_validate_rejects_wrong_feature_names() {
        for (bad, wanted) in [("pos=verb", "sp"), ("gender=f", "gn"), ("number=pl", "nu")] {
            let query = format!("word {bad}");
            match validate_query(&query) {
                Err(QueryError::WrongFeatureName { wanted: w, .. }) => assert_eq!(w, wanted),
                other => panic!("expected feature-name error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_validate_rejects_unknown_node_type() {
        assert!(matches!(
            validate_query("paragraph sp=verb"),
            Err(QueryError::BadNodeType(_))
        ));
    }
}
