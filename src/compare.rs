//! Tiered Hebrew similarity scoring.
//!
//! This is the HOT PATH of the mapping build: the fuzzy fallback calls
//! `compare` across the full reference-by-corpus cross product.

use crate::normalize::{collapse_vowel_letters, normalize};

/// Scoring weights for the tiered comparison.
///
/// Defaults reproduce the reference behavior; `compare` uses them as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompareWeights {
    /// Raw identical strings.
    pub exact: f64,
    /// Equal consonantal skeletons.
    pub consonantal: f64,
    /// Equal after collapsing doubled vowel letters (plene/defective pair).
    pub variant: f64,
    /// Multiplier applied to the edit-distance similarity.
    pub fuzzy: f64,
}

impl Default for CompareWeights {
    fn default() -> Self {
        Self {
            exact: 1.0,
            consonantal: 0.9,
            variant: 0.85,
            fuzzy: 0.7,
        }
    }
}

/// Levenshtein edit distance over code points.
///
/// Classic insert/delete/substitute DP with a rolling row: O(a·b) time,
/// O(min(a, b)) space. The shorter string becomes the row dimension.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let s1: Vec<char> = a.chars().collect();
    let s2: Vec<char> = b.chars().collect();

    // Keep the row over the shorter string.
    let (s1, s2) = if s1.len() < s2.len() { (s2, s1) } else { (s1, s2) };

    if s2.is_empty() {
        return s1.len();
    }

    let mut prev: Vec<usize> = (0..=s2.len()).collect();
    let mut curr: Vec<usize> = vec![0; s2.len() + 1];

    for (i, &c1) in s1.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &c2) in s2.iter().enumerate() {
            let insert = prev[j + 1] + 1;
            let delete = curr[j] + 1;
            let substitute = prev[j] + usize::from(c1 != c2);
            curr[j + 1] = insert.min(delete).min(substitute);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[s2.len()]
}

/// Compare two Hebrew strings, returning a similarity in [0.0, 1.0].
///
/// Tiers, first hit wins:
/// 1. either input empty → 0.0
/// 2. raw identical → 1.0
/// 3. equal consonantal skeletons → 0.9 (the dominant real case: same word,
///    different pointing)
/// 4. `fuzzy` disabled → 0.0
/// 5/6. normalized edit-distance similarity; when it is below 0.9 and the
///    vowel-letter-collapsed skeletons agree (non-empty), the pair is a
///    plene/defective spelling variant → 0.85; otherwise the similarity is
///    scaled by the fuzzy weight so edit-distance hits never outrank a true
///    consonantal match.
///
/// The variant override is skipped when the raw similarity is already
/// ≥ 0.9 — near-identical skeletons keep their fuzzy score instead of the
/// flat 0.85. This produces a score discontinuity around the 0.9 boundary;
/// it is observed behavior and kept as such.
pub fn compare(text1: &str, text2: &str, fuzzy: bool) -> f64 {
    compare_weighted(text1, text2, fuzzy, &CompareWeights::default())
}

/// `compare` with explicit weights.
pub fn compare_weighted(text1: &str, text2: &str, fuzzy: bool, weights: &CompareWeights) -> f64 {
    if text1.is_empty() || text2.is_empty() {
        return 0.0;
    }

    if text1 == text2 {
        return weights.exact;
    }

    let norm1 = normalize(text1);
    let norm2 = normalize(text2);

    if norm1 == norm2 {
        return weights.consonantal;
    }

    if !fuzzy {
        return 0.0;
    }

    let max_len = norm1.chars().count().max(norm2.chars().count());
    if max_len == 0 {
        return 0.0;
    }

    let distance = levenshtein_distance(&norm1, &norm2);
    let similarity = 1.0 - (distance as f64 / max_len as f64);

    if similarity < 0.9 {
        let collapsed1 = collapse_vowel_letters(&norm1);
        let collapsed2 = collapse_vowel_letters(&norm2);
        if collapsed1 == collapsed2 && !collapsed1.is_empty() {
            return weights.variant;
        }
    }

    similarity * weights.fuzzy
}
