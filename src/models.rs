//! Data structures for the Gesher lexicon alignment pipeline.

use serde::{Deserialize, Serialize};

/// A Strong's Concordance Hebrew dictionary entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrongsEntry {
    /// Strong's number, e.g. "H157".
    pub number: String,
    /// Pointed Hebrew lemma as printed in the concordance.
    #[serde(default)]
    pub lemma: String,
    /// Transliteration, e.g. "ʼâhab".
    #[serde(default)]
    pub xlit: String,
    /// Pronunciation guide.
    #[serde(default)]
    pub pron: String,
    /// Raw KJV definition string.
    #[serde(default)]
    pub kjv_def: String,
}

/// A unique corpus lexeme assembled from the BHSA feature files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexeme {
    /// Word node of the first occurrence.
    pub node: u32,
    /// Consonantal transliterated/bare form (lex_utf8).
    pub consonantal: String,
    /// Vocalized form (voc_lex_utf8); primary key for uniqueness.
    pub vocalized: String,
    /// "Hebrew" or "Aramaic".
    pub language: String,
    /// Consonantal skeleton of the vocalized form (or bare form when the
    /// vocalized field is empty).
    pub normalized: String,
}

/// How a mapping was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    ExactMatch,
    ConsonantalMatch,
    FuzzyMatch,
    ManualCorrection,
}

/// Confidence bucket derived from the best candidate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Best score >= 0.95.
    High,
    /// Best score in [0.85, 0.95).
    Medium,
    /// Best score below 0.85.
    Low,
    /// No candidate at all.
    None,
}

impl Confidence {
    /// Bucket a best-candidate score.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.95 {
            Confidence::High
        } else if score >= 0.85 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

/// One scored corpus candidate for a reference entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub node: u32,
    /// Similarity score, rounded to 3 decimals for output stability.
    pub score: f64,
    pub consonantal: String,
    pub vocalized: String,
    pub language: String,
}

/// Mapping entry for a single Strong's number: ranked corpus candidates
/// plus the cleaned glosses used downstream for keyword search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingEntry {
    pub strongs_number: String,
    pub strongs_lemma: String,
    pub strongs_normalized: String,
    pub candidates: Vec<CandidateMatch>,
    /// Comma-joined cleaned KJV glosses.
    pub kjv_glosses: String,
    pub gloss_list: Vec<String>,
    pub confidence: Confidence,
    pub match_count: usize,
}

/// Reverse-direction entry: one corpus lexeme resolved to one Strong's
/// number, with method and provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReverseEntry {
    pub strongs: String,
    pub strongs_lemma: String,
    pub score: f64,
    pub method: MatchMethod,
    pub kjv_glosses: String,
    /// Strong's number displaced by a manual correction, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_match: Option<String>,
}

/// Tunable parameters for the mapping build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingParams {
    /// Candidates below this score are excluded from ranked lists.
    pub min_score: f64,
    /// Fuzzy fallback only considers forms whose normalized length differs
    /// by at most this much from the reference.
    pub max_length_delta: usize,
    /// Ranked candidate lists are capped at this many entries.
    pub max_candidates: usize,
    /// Enable the edit-distance tier of the comparator.
    pub fuzzy: bool,
}

impl Default for MappingParams {
    fn default() -> Self {
        Self {
            min_score: 0.7,
            max_length_delta: 2,
            max_candidates: 10,
            fuzzy: true,
        }
    }
}

/// Forward mapping: Strong's number -> ranked corpus candidates.
#[derive(Debug, Serialize, Deserialize)]
pub struct ForwardMapping {
    pub version: String,
    pub parameters: MappingParams,
    pub entries: Vec<MappingEntry>,
    pub summary: MappingSummary,
}

/// Reverse mapping: vocalized corpus form -> resolved Strong's entry.
/// Keys follow corpus order of first occurrence.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReverseMapping {
    pub version: String,
    pub entries: Vec<(String, ReverseEntry)>,
    pub summary: ReverseSummary,
}

impl ReverseMapping {
    /// Look up a corpus form.
    pub fn get(&self, vocalized: &str) -> Option<&ReverseEntry> {
        self.entries.iter().find(|(k, _)| k == vocalized).map(|(_, v)| v)
    }
}

/// Aggregate statistics for a forward mapping run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingSummary {
    pub total_entries: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Entries with more than one candidate.
    pub ambiguous: usize,
    /// Malformed dictionary entries skipped during the run.
    pub skipped: usize,
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub low_confidence: usize,
}

impl MappingSummary {
    /// Matched fraction in percent.
    pub fn coverage(&self) -> f64 {
        if self.total_entries == 0 {
            0.0
        } else {
            100.0 * self.matched as f64 / self.total_entries as f64
        }
    }
}

/// Aggregate statistics for a reverse (total-coverage) mapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReverseSummary {
    pub total_lexemes: usize,
    pub total_matched: usize,
    pub exact: usize,
    pub consonantal: usize,
    pub fuzzy: usize,
    pub manual: usize,
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub low_confidence: usize,
}

impl ReverseSummary {
    pub fn coverage(&self) -> f64 {
        if self.total_lexemes == 0 {
            0.0
        } else {
            100.0 * self.total_matched as f64 / self.total_lexemes as f64
        }
    }
}

/// Round a score to 3 decimals the way the mapping files record it.
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_buckets() {
        assert_eq!(Confidence::from_score(1.0), Confidence::High);
        assert_eq!(Confidence::from_score(0.95), Confidence::High);
        assert_eq!(Confidence::from_score(0.9), Confidence::Medium);
        assert_eq!(Confidence::from_score(0.85), Confidence::Medium);
        assert_eq!(Confidence::from_score(0.7), Confidence::Low);
        assert_eq!(Confidence::from_score(0.0), Confidence::Low);
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.8571428), 0.857);
        assert_eq!(round_score(1.0), 1.0);
        assert_eq!(round_score(0.6999), 0.7);
    }

    #[test]
    fn test_summary_coverage() {
        let summary = MappingSummary {
            total_entries: 200,
            matched: 180,
            unmatched: 20,
            ..Default::default()
        };
        assert!((summary.coverage() - 90.0).abs() < 1e-9);

        let empty = MappingSummary::default();
        assert_eq!(empty.coverage(), 0.0);
    }

    #[test]
    fn test_method_serde_tags() {
        let json = serde_json::to_string(&MatchMethod::ConsonantalMatch).unwrap();
        assert_eq!(json, "\"consonantal_match\"");
        let back: MatchMethod = serde_json::from_str("\"fuzzy_match\"").unwrap();
        assert_eq!(back, MatchMethod::FuzzyMatch);
    }

    #[test]
    fn test_default_params() {
        let params = MappingParams::default();
        assert!((params.min_score - 0.7).abs() < 1e-9);
        assert_eq!(params.max_length_delta, 2);
        assert_eq!(params.max_candidates, 10);
        assert!(params.fuzzy);
    }
}
