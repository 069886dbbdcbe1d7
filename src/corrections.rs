//! Manual correction overrides for the reverse mapping.
//!
//! Corrections live in a JSON file as an ordered list; each names a corpus
//! form and the Strong's number it must resolve to. They are applied after
//! every automatic pass, so a correction always wins, and the displaced
//! automatic match is kept as provenance.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::models::{ForwardMapping, MatchMethod, ReverseEntry, ReverseMapping};

#[derive(Error, Debug)]
pub enum CorrectionsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One override: a vocalized corpus form pinned to a Strong's number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Correction {
    /// Vocalized corpus form, exactly as it appears as a reverse-mapping key.
    pub form: String,
    /// Strong's number the form must map to.
    pub strongs: String,
    /// Lemma to record when the number is absent from the forward mapping.
    #[serde(default)]
    pub lemma: String,
    /// Reviewer's note on why the automatic match was wrong.
    #[serde(default)]
    pub note: String,
    /// Score to record; corrections are authoritative by default.
    #[serde(default = "default_score")]
    pub score: f64,
}

fn default_score() -> f64 {
    1.0
}

/// What a correction pass did.
#[derive(Debug, Default)]
pub struct CorrectionReport {
    /// Existing entries overridden.
    pub overridden: usize,
    /// Forms absent from the mapping, added fresh.
    pub added: usize,
}

/// Load an ordered correction list from a JSON file.
pub fn load_corrections(path: &Path) -> Result<Vec<Correction>, CorrectionsError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Apply corrections to a reverse mapping, in list order.
///
/// An existing entry is replaced and its Strong's number recorded in
/// `previous_match`; an unknown form is appended as a new entry. Lemma and
/// glosses come from the forward mapping when the number is known there.
/// Summary counts are updated in place.
pub fn apply_corrections(
    reverse: &mut ReverseMapping,
    corrections: &[Correction],
    forward: &ForwardMapping,
) -> CorrectionReport {
    let by_number: HashMap<&str, (&str, &str)> = forward
        .entries
        .iter()
        .map(|e| {
            (
                e.strongs_number.as_str(),
                (e.strongs_lemma.as_str(), e.kjv_glosses.as_str()),
            )
        })
        .collect();

    let mut report = CorrectionReport::default();

    for correction in corrections {
        let (lemma, glosses) = match by_number.get(correction.strongs.as_str()) {
            Some(&(lemma, glosses)) => (lemma.to_string(), glosses.to_string()),
            None => (correction.lemma.clone(), String::new()),
        };

        let position = reverse
            .entries
            .iter()
            .position(|(form, _)| form == &correction.form);

        match position {
            Some(idx) => {
                let old = &reverse.entries[idx].1;
                decrement_buckets(&mut reverse.summary, old);
                // A re-corrected entry keeps the original automatic match
                // as provenance.
                let previous = old
                    .previous_match
                    .clone()
                    .or_else(|| Some(old.strongs.clone()));
                reverse.entries[idx].1 = ReverseEntry {
                    strongs: correction.strongs.clone(),
                    strongs_lemma: lemma,
                    score: correction.score,
                    method: MatchMethod::ManualCorrection,
                    kjv_glosses: glosses,
                    previous_match: previous,
                };
                report.overridden += 1;
            }
            None => {
                reverse.entries.push((
                    correction.form.clone(),
                    ReverseEntry {
                        strongs: correction.strongs.clone(),
                        strongs_lemma: lemma,
                        score: correction.score,
                        method: MatchMethod::ManualCorrection,
                        kjv_glosses: glosses,
                        previous_match: None,
                    },
                ));
                reverse.summary.total_matched += 1;
                report.added += 1;
            }
        }

        reverse.summary.manual += 1;
        increment_confidence(&mut reverse.summary, correction.score);
    }

    report
}

fn decrement_buckets(summary: &mut crate::models::ReverseSummary, old: &ReverseEntry) {
    match old.method {
        MatchMethod::ExactMatch => summary.exact = summary.exact.saturating_sub(1),
        MatchMethod::ConsonantalMatch => summary.consonantal = summary.consonantal.saturating_sub(1),
        MatchMethod::FuzzyMatch => summary.fuzzy = summary.fuzzy.saturating_sub(1),
        MatchMethod::ManualCorrection => summary.manual = summary.manual.saturating_sub(1),
    }
    if old.score >= 0.9 {
        summary.high_confidence = summary.high_confidence.saturating_sub(1);
    } else if old.score >= 0.7 {
        summary.medium_confidence = summary.medium_confidence.saturating_sub(1);
    } else {
        summary.low_confidence = summary.low_confidence.saturating_sub(1);
    }
}

fn increment_confidence(summary: &mut crate::models::ReverseSummary, score: f64) {
    if score >= 0.9 {
        summary.high_confidence += 1;
    } else if score >= 0.7 {
        summary.medium_confidence += 1;
    } else {
        summary.low_confidence += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Confidence, MappingEntry, MappingParams, MappingSummary, ReverseSummary,
    };

    fn forward_with(number: &str, lemma: &str, glosses: &str) -> ForwardMapping {
        ForwardMapping {
            version: "test".to_string(),
            parameters: MappingParams::default(),
            entries: vec![MappingEntry {
                strongs_number: number.to_string(),
                strongs_lemma: lemma.to_string(),
                strongs_normalized: String::new(),
                candidates: Vec::new(),
                kjv_glosses: glosses.to_string(),
                gloss_list: Vec::new(),
                confidence: Confidence::None,
                match_count: 0,
            }],
            summary: MappingSummary::default(),
        }
    }

    fn reverse_with(form: &str, strongs: &str, score: f64, method: MatchMethod) -> ReverseMapping {
        let mut summary = ReverseSummary {
            total_lexemes: 1,
            total_matched: 1,
            ..Default::default()
        };
        match method {
            MatchMethod::ExactMatch => summary.exact = 1,
            MatchMethod::ConsonantalMatch => summary.consonantal = 1,
            MatchMethod::FuzzyMatch => summary.fuzzy = 1,
            MatchMethod::ManualCorrection => summary.manual = 1,
        }
        if score >= 0.9 {
            summary.high_confidence = 1;
        } else if score >= 0.7 {
            summary.medium_confidence = 1;
        } else {
            summary.low_confidence = 1;
        }
        ReverseMapping {
            version: "test".to_string(),
            entries: vec![(
                form.to_string(),
                ReverseEntry {
                    strongs: strongs.to_string(),
                    strongs_lemma: String::new(),
                    score,
                    method,
                    kjv_glosses: String::new(),
                    previous_match: None,
                },
            )],
            summary,
        }
    }

    fn correction(form: &str, strongs: &str) -> Correction {
        Correction {
            form: form.to_string(),
            strongs: strongs.to_string(),
            lemma: String::new(),
            note: String::new(),
            score: 1.0,
        }
    }

    #[test]
    fn test_override_records_previous_match() {
        let forward = forward_with("H157", "אָהַב", "love");
        let mut reverse = reverse_with("אָהַב", "H156", 0.72, MatchMethod::FuzzyMatch);

        let report = apply_corrections(&mut reverse, &[correction("אָהַב", "H157")], &forward);

        assert_eq!(report.overridden, 1);
        assert_eq!(report.added, 0);
        let entry = reverse.get("אָהַב").unwrap();
        assert_eq!(entry.strongs, "H157");
        assert_eq!(entry.strongs_lemma, "אָהַב");
        assert_eq!(entry.kjv_glosses, "love");
        assert_eq!(entry.method, MatchMethod::ManualCorrection);
        assert!((entry.score - 1.0).abs() < 1e-9);
        assert_eq!(entry.previous_match.as_deref(), Some("H156"));

        assert_eq!(reverse.summary.fuzzy, 0);
        assert_eq!(reverse.summary.manual, 1);
        assert_eq!(reverse.summary.medium_confidence, 0);
        assert_eq!(reverse.summary.high_confidence, 1);
    }

    #[test]
    fn test_unknown_form_added() {
        let forward = forward_with("H1", "אָב", "father");
        let mut reverse = reverse_with("אָהַב", "H157", 1.0, MatchMethod::ExactMatch);

        let report = apply_corrections(&mut reverse, &[correction("מֶלֶךְ", "H1")], &forward);

        assert_eq!(report.added, 1);
        assert_eq!(reverse.entries.len(), 2);
        let entry = reverse.get("מֶלֶךְ").unwrap();
        assert_eq!(entry.strongs, "H1");
        assert!(entry.previous_match.is_none());
        assert_eq!(reverse.summary.total_matched, 2);
    }

    #[test]
    fn test_unknown_strongs_uses_correction_lemma() {
        let forward = forward_with("H1", "אָב", "father");
        let mut reverse = reverse_with("דָּוִד", "H1", 0.8, MatchMethod::FuzzyMatch);

        let mut fix = correction("דָּוִד", "H1732");
        fix.lemma = "דָּוִד".to_string();
        apply_corrections(&mut reverse, &[fix], &forward);

        let entry = reverse.get("דָּוִד").unwrap();
        assert_eq!(entry.strongs, "H1732");
        assert_eq!(entry.strongs_lemma, "דָּוִד");
        assert!(entry.kjv_glosses.is_empty());
    }

    #[test]
    fn test_repeated_correction_keeps_original_provenance() {
        let forward = forward_with("H157", "אָהַב", "love");
        let mut reverse = reverse_with("אָהַב", "H156", 0.72, MatchMethod::FuzzyMatch);

        apply_corrections(&mut reverse, &[correction("אָהַב", "H160")], &forward);
        apply_corrections(&mut reverse, &[correction("אָהַב", "H157")], &forward);

        let entry = reverse.get("אָהַב").unwrap();
        assert_eq!(entry.strongs, "H157");
        // Provenance points at the automatic match, not the first correction.
        assert_eq!(entry.previous_match.as_deref(), Some("H156"));
    }

    #[test]
    fn test_corrections_roundtrip_json() {
        let json = r#"[
            {"form": "אָהַב", "strongs": "H157", "note": "homograph"},
            {"form": "מֶלֶךְ", "strongs": "H4428", "score": 0.95}
        ]"#;
        let corrections: Vec<Correction> = serde_json::from_str(json).unwrap();
        assert_eq!(corrections.len(), 2);
        assert!((corrections[0].score - 1.0).abs() < 1e-9);
        assert_eq!(corrections[0].note, "homograph");
        assert!((corrections[1].score - 0.95).abs() < 1e-9);
    }
}
