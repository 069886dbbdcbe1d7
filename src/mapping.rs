//! Mapping orchestration between Strong's entries and corpus lexemes.
//!
//! Forward pass: every Strong's entry gets a ranked candidate list via an
//! index on normalized forms, with a length-bounded fuzzy fallback. Reverse
//! pass: candidates are inverted to corpus keys, then a total-coverage pass
//! guarantees every corpus form ends up mapped to something, however weakly.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::compare::compare;
use crate::models::{
    round_score, CandidateMatch, Confidence, ForwardMapping, Lexeme, MappingEntry, MappingParams,
    MappingSummary, MatchMethod, ReverseEntry, ReverseMapping, ReverseSummary, StrongsEntry,
};
use crate::normalize::normalize;
use crate::strongs::clean_kjv_glosses;

fn progress_bar(len: u64, show: bool) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )
            .unwrap()
            .progress_chars("#>-"),
    );
    Some(pb)
}

/// Index of corpus lexemes keyed by exact normalized form.
pub struct LexemeIndex<'a> {
    lexemes: &'a [Lexeme],
    by_normalized: HashMap<&'a str, Vec<usize>>,
}

impl<'a> LexemeIndex<'a> {
    pub fn build(lexemes: &'a [Lexeme]) -> Self {
        let mut by_normalized: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (idx, lexeme) in lexemes.iter().enumerate() {
            by_normalized
                .entry(lexeme.normalized.as_str())
                .or_default()
                .push(idx);
        }
        Self {
            lexemes,
            by_normalized,
        }
    }

    pub fn unique_forms(&self) -> usize {
        self.by_normalized.len()
    }
}

/// Find ranked corpus candidates for one normalized reference form.
///
/// Indexed O(1) lookup first; when that yields nothing at or above the score
/// threshold, fall back to a scan over forms whose normalized length differs
/// by at most `max_length_delta`. Results are sorted by score descending and
/// capped at `max_candidates`.
pub fn find_candidates(
    reference_normalized: &str,
    index: &LexemeIndex<'_>,
    params: &MappingParams,
) -> Vec<CandidateMatch> {
    if reference_normalized.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();

    if let Some(indices) = index.by_normalized.get(reference_normalized) {
        for &idx in indices {
            let lexeme = &index.lexemes[idx];
            let score = compare(reference_normalized, &lexeme.normalized, params.fuzzy);
            if score >= params.min_score {
                matches.push(candidate(lexeme, score));
            }
        }
    }

    if matches.is_empty() {
        let ref_len = reference_normalized.chars().count();
        for (form, indices) in &index.by_normalized {
            let delta = form.chars().count().abs_diff(ref_len);
            if delta > params.max_length_delta {
                continue;
            }
            for &idx in indices {
                let lexeme = &index.lexemes[idx];
                let score = compare(reference_normalized, &lexeme.normalized, params.fuzzy);
                if score >= params.min_score {
                    matches.push(candidate(lexeme, score));
                }
            }
        }
    }

    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.node.cmp(&b.node))
    });
    matches.truncate(params.max_candidates);
    matches
}

fn candidate(lexeme: &Lexeme, score: f64) -> CandidateMatch {
    CandidateMatch {
        node: lexeme.node,
        score: round_score(score),
        consonantal: lexeme.consonantal.clone(),
        vocalized: lexeme.vocalized.clone(),
        language: lexeme.language.clone(),
    }
}

/// Build the forward mapping: every Strong's entry scored against the
/// corpus vocabulary. The per-entry work is independent, so the scan runs
/// in parallel.
pub fn build_forward(
    strongs: &[StrongsEntry],
    lexemes: &[Lexeme],
    skipped: usize,
    params: &MappingParams,
    show_progress: bool,
) -> ForwardMapping {
    if show_progress {
        eprintln!("Building normalized-form index ({} lexemes)...", lexemes.len());
    }
    let index = LexemeIndex::build(lexemes);
    if show_progress {
        eprintln!("  {} unique normalized forms", index.unique_forms());
        eprintln!("Matching {} Strong's entries...", strongs.len());
    }

    let progress = progress_bar(strongs.len() as u64, show_progress);

    let entries: Vec<MappingEntry> = strongs
        .par_iter()
        .map(|entry| {
            let normalized = normalize(&entry.lemma);
            let candidates = find_candidates(&normalized, &index, params);
            let (gloss_string, gloss_list) = clean_kjv_glosses(&entry.kjv_def);

            let confidence = match candidates.first() {
                Some(best) => Confidence::from_score(best.score),
                None => Confidence::None,
            };

            if let Some(ref pb) = progress {
                pb.inc(1);
            }

            MappingEntry {
                strongs_number: entry.number.clone(),
                strongs_lemma: entry.lemma.clone(),
                strongs_normalized: normalized,
                match_count: candidates.len(),
                candidates,
                kjv_glosses: gloss_string,
                gloss_list,
                confidence,
            }
        })
        .collect();

    if let Some(pb) = progress {
        pb.finish_with_message("Done");
    }

    let mut summary = MappingSummary {
        total_entries: entries.len(),
        skipped,
        ..Default::default()
    };
    for entry in &entries {
        match entry.confidence {
            Confidence::High => {
                summary.high_confidence += 1;
                summary.matched += 1;
            }
            Confidence::Medium => {
                summary.medium_confidence += 1;
                summary.matched += 1;
            }
            Confidence::Low => {
                summary.low_confidence += 1;
                summary.matched += 1;
            }
            Confidence::None => summary.unmatched += 1,
        }
        if entry.match_count > 1 {
            summary.ambiguous += 1;
        }
    }

    if show_progress {
        eprintln!(
            "  Matched {}/{} entries ({:.1}%)",
            summary.matched,
            summary.total_entries,
            summary.coverage()
        );
    }

    ForwardMapping {
        version: env!("CARGO_PKG_VERSION").to_string(),
        parameters: params.clone(),
        entries,
        summary,
    }
}

/// Invert a forward mapping into corpus-keyed entries.
///
/// Each candidate's vocalized form becomes a key; the first assignment in
/// forward-entry order wins. These inherited matches are tagged
/// `exact_match` since they came through the indexed tier.
fn invert_forward(forward: &ForwardMapping) -> Vec<(String, ReverseEntry)> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut entries = Vec::new();

    for entry in &forward.entries {
        for candidate in &entry.candidates {
            if candidate.vocalized.is_empty() || seen.contains(candidate.vocalized.as_str()) {
                continue;
            }
            seen.insert(candidate.vocalized.as_str());
            entries.push((
                candidate.vocalized.clone(),
                ReverseEntry {
                    strongs: entry.strongs_number.clone(),
                    strongs_lemma: entry.strongs_lemma.clone(),
                    score: candidate.score,
                    method: MatchMethod::ExactMatch,
                    kjv_glosses: entry.kjv_glosses.clone(),
                    previous_match: None,
                },
            ));
        }
    }

    entries
}

/// Build the complete reverse mapping with the total-coverage guarantee.
///
/// Forms already reachable from the forward mapping keep those matches;
/// every remaining corpus form is then assigned its single best-scoring
/// Strong's entry regardless of how low the score is, tagged `fuzzy_match`
/// below 0.9 and `consonantal_match` otherwise. By construction every
/// lexeme with a usable key receives exactly one mapping.
pub fn build_reverse(
    forward: &ForwardMapping,
    lexemes: &[Lexeme],
    show_progress: bool,
) -> ReverseMapping {
    if show_progress {
        eprintln!("Inverting forward mapping...");
    }
    let mut entries = invert_forward(forward);
    let matched_keys: HashSet<String> = entries.iter().map(|(k, _)| k.clone()).collect();

    let unmatched: Vec<&Lexeme> = lexemes
        .iter()
        .filter(|lex| {
            let key = reverse_key(lex);
            !key.is_empty() && !matched_keys.contains(key)
        })
        .collect();

    if show_progress {
        eprintln!(
            "  {} lexemes matched, {} need the coverage pass",
            matched_keys.len(),
            unmatched.len()
        );
    }

    // References with an empty skeleton can never score above 0.0 and are
    // skipped up front.
    let references: Vec<&MappingEntry> = forward
        .entries
        .iter()
        .filter(|e| !e.strongs_normalized.is_empty())
        .collect();

    let progress = progress_bar(unmatched.len() as u64, show_progress);

    let assigned: Vec<(String, ReverseEntry)> = unmatched
        .into_par_iter()
        .filter_map(|lexeme| {
            let mut best: Option<(f64, &MappingEntry)> = None;
            for &reference in &references {
                let score = compare(&lexeme.normalized, &reference.strongs_normalized, true);
                let better = match best {
                    Some((best_score, _)) => score > best_score,
                    None => true,
                };
                if better {
                    best = Some((score, reference));
                }
            }

            if let Some(ref pb) = progress {
                pb.inc(1);
            }

            best.map(|(score, reference)| {
                let method = if score < 0.9 {
                    MatchMethod::FuzzyMatch
                } else {
                    MatchMethod::ConsonantalMatch
                };
                (
                    reverse_key(lexeme).to_string(),
                    ReverseEntry {
                        strongs: reference.strongs_number.clone(),
                        strongs_lemma: reference.strongs_lemma.clone(),
                        score: round_score(score),
                        method,
                        kjv_glosses: reference.kjv_glosses.clone(),
                        previous_match: None,
                    },
                )
            })
        })
        .collect();

    if let Some(pb) = progress {
        pb.finish_with_message("Done");
    }

    entries.extend(assigned);

    let summary = summarize_reverse(&entries, lexemes);

    ReverseMapping {
        version: env!("CARGO_PKG_VERSION").to_string(),
        entries,
        summary,
    }
}

/// Uniqueness key for the reverse direction: vocalized form, bare form as
/// fallback.
pub fn reverse_key(lexeme: &Lexeme) -> &str {
    if lexeme.vocalized.is_empty() {
        &lexeme.consonantal
    } else {
        &lexeme.vocalized
    }
}

/// Recompute reverse-mapping statistics.
pub fn summarize_reverse(entries: &[(String, ReverseEntry)], lexemes: &[Lexeme]) -> ReverseSummary {
    let mut summary = ReverseSummary {
        total_lexemes: lexemes.len(),
        total_matched: entries.len(),
        ..Default::default()
    };

    for (_, entry) in entries {
        match entry.method {
            MatchMethod::ExactMatch => summary.exact += 1,
            MatchMethod::ConsonantalMatch => summary.consonantal += 1,
            MatchMethod::FuzzyMatch => summary.fuzzy += 1,
            MatchMethod::ManualCorrection => summary.manual += 1,
        }
        if entry.score >= 0.9 {
            summary.high_confidence += 1;
        } else if entry.score >= 0.7 {
            summary.medium_confidence += 1;
        } else {
            summary.low_confidence += 1;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexeme(node: u32, voc: &str, cons: &str) -> Lexeme {
        let source = if voc.is_empty() { cons } else { voc };
        Lexeme {
            node,
            consonantal: cons.to_string(),
            vocalized: voc.to_string(),
            language: "Hebrew".to_string(),
            normalized: normalize(source),
        }
    }

    fn strongs(number: &str, lemma: &str, kjv_def: &str) -> StrongsEntry {
        StrongsEntry {
            number: number.to_string(),
            lemma: lemma.to_string(),
            kjv_def: kjv_def.to_string(),
            ..Default::default()
        }
    }

    fn test_lexemes() -> Vec<Lexeme> {
        vec![
            lexeme(1, "אָב", "אב"),
            lexeme(2, "אָהַב", "אהב"),
            lexeme(3, "מֶלֶךְ", "מלכ"),
            lexeme(4, "שָׁלוֹם", "שלומ"),
        ]
    }

    #[test]
    fn test_indexed_lookup() {
        let lexemes = test_lexemes();
        let index = LexemeIndex::build(&lexemes);
        let params = MappingParams::default();

        let candidates = find_candidates("אהב", &index, &params);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].node, 2);
        assert!((candidates[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fuzzy_fallback_respects_length_delta() {
        let lexemes = vec![lexeme(1, "", "אהב"), lexeme(2, "", "אבגדהוזחטי")];
        let index = LexemeIndex::build(&lexemes);
        let params = MappingParams {
            min_score: 0.1,
            ..Default::default()
        };

        // אהד misses the index; the fallback only reaches forms within
        // length delta 2, so node 2 (10 letters) is never scored.
        let candidates = find_candidates("אהד", &index, &params);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].node, 1);
    }

    #[test]
    fn test_fallback_only_when_index_empty() {
        let lexemes = vec![lexeme(1, "", "אהב"), lexeme(2, "", "אהד")];
        let index = LexemeIndex::build(&lexemes);
        let params = MappingParams::default();

        // Exact form present: fallback never runs, so the near-miss אהד is
        // not in the list.
        let candidates = find_candidates("אהב", &index, &params);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].node, 1);
    }

    #[test]
    fn test_empty_reference_no_candidates() {
        let lexemes = test_lexemes();
        let index = LexemeIndex::build(&lexemes);
        let candidates = find_candidates("", &index, &MappingParams::default());
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_forward_mapping_confidence() {
        let lexemes = test_lexemes();
        let entries = vec![
            strongs("H1", "אָב", "father"),
            strongs("H157", "אָהַב", "love"),
            strongs("H9999", "קקקקק", "nothing like it"),
        ];

        let forward = build_forward(&entries, &lexemes, 0, &MappingParams::default(), false);

        assert_eq!(forward.entries.len(), 3);
        let h1 = &forward.entries[0];
        assert_eq!(h1.confidence, Confidence::High);
        assert_eq!(h1.candidates[0].node, 1);
        assert_eq!(h1.gloss_list, vec!["father"]);

        let miss = &forward.entries[2];
        assert_eq!(miss.confidence, Confidence::None);
        assert!(miss.candidates.is_empty());

        assert_eq!(forward.summary.matched, 2);
        assert_eq!(forward.summary.unmatched, 1);
    }

    #[test]
    fn test_reverse_total_coverage() {
        let lexemes = test_lexemes();
        let entries = vec![strongs("H1", "אָב", "father"), strongs("H157", "אָהַב", "love")];

        let forward = build_forward(&entries, &lexemes, 0, &MappingParams::default(), false);
        let reverse = build_reverse(&forward, &lexemes, false);

        // Every lexeme gets exactly one mapping.
        assert_eq!(reverse.entries.len(), lexemes.len());
        let mut keys: Vec<&str> = reverse.entries.iter().map(|(k, _)| k.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), lexemes.len());
        assert!((reverse.summary.coverage() - 100.0).abs() < 1e-9);

        // מלך and שלום had no forward match: assigned best-effort, tagged by
        // score threshold.
        let melekh = reverse.get("מֶלֶךְ").unwrap();
        assert!(matches!(
            melekh.method,
            MatchMethod::FuzzyMatch | MatchMethod::ConsonantalMatch
        ));
    }

    #[test]
    fn test_reverse_inherited_matches_win() {
        let lexemes = test_lexemes();
        let entries = vec![strongs("H1", "אָב", "father")];
        let forward = build_forward(&entries, &lexemes, 0, &MappingParams::default(), false);
        let reverse = build_reverse(&forward, &lexemes, false);

        let av = reverse.get("אָב").unwrap();
        assert_eq!(av.strongs, "H1");
        assert_eq!(av.method, MatchMethod::ExactMatch);
        assert!((av.score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_reverse_summary_buckets() {
        let lexemes = vec![lexeme(1, "אָב", "אב")];
        let entries = vec![(
            "אָב".to_string(),
            ReverseEntry {
                strongs: "H1".to_string(),
                strongs_lemma: "אָב".to_string(),
                score: 0.75,
                method: MatchMethod::FuzzyMatch,
                kjv_glosses: String::new(),
                previous_match: None,
            },
        )];
        let summary = summarize_reverse(&entries, &lexemes);
        assert_eq!(summary.fuzzy, 1);
        assert_eq!(summary.medium_confidence, 1);
        assert_eq!(summary.high_confidence, 0);
    }
}
