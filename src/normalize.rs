//! Hebrew text normalization to the consonantal skeleton.
//!
//! This is the foundation of all matching: Strong's lemmas carry full
//! Tiberian pointing while BHSA lexemes may be vocalized or bare, so both
//! sides are reduced to the same 22-letter skeleton before comparison.

/// Base Hebrew consonant range: א (0x05D0) through ת (0x05EA).
const HEBREW_LETTER_FIRST: u32 = 0x05D0;
const HEBREW_LETTER_LAST: u32 = 0x05EA;

/// Hebrew point ranges stripped in addition to the Unicode Mn category.
/// Category classification of some points differs across Unicode versions,
/// so these explicit ranges keep the output stable.
const HEBREW_POINT_RANGES: [(u32, u32); 3] = [
    (0x05B0, 0x05BC), // main niqqud
    (0x05BF, 0x05C2), // rafe, paseq, shin/sin dots
    (0x05C4, 0x05C5), // upper/lower puncta
];

/// Qamats qatan, added in Unicode 4.1 and inconsistently classified.
const QAMATS_QATAN: u32 = 0x05C7;

/// Map a final-form consonant to its base form, if it is one.
#[inline]
fn unfinalize(c: char) -> char {
    match c {
        'ך' => 'כ',
        'ם' => 'מ',
        'ן' => 'נ',
        'ף' => 'פ',
        'ץ' => 'צ',
        other => other,
    }
}

#[inline]
fn is_final_form(c: char) -> bool {
    matches!(c, 'ך' | 'ם' | 'ן' | 'ף' | 'ץ')
}

#[inline]
fn is_base_consonant(c: char) -> bool {
    (HEBREW_LETTER_FIRST..=HEBREW_LETTER_LAST).contains(&(c as u32))
}

#[inline]
fn is_hebrew_point(c: char) -> bool {
    let cp = c as u32;
    cp == QAMATS_QATAN
        || HEBREW_POINT_RANGES
            .iter()
            .any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

/// Nonspacing-mark test restricted to what Hebrew text actually contains.
///
/// Covers the Hebrew points/accents blocks (niqqud, cantillation, dagesh,
/// meteg) plus the general combining-diacritics block that shows up in
/// transliteration-contaminated input. Equivalent to a category lookup for
/// every mark this pipeline encounters, without pulling in a Unicode table.
#[inline]
fn is_nonspacing_mark(c: char) -> bool {
    let cp = c as u32;
    matches!(cp,
        0x0591..=0x05BD      // Hebrew accents and points
        | 0x05BF
        | 0x05C1..=0x05C2    // shin/sin dots
        | 0x05C4..=0x05C5
        | 0x05C7             // qamats qatan
        | 0x0300..=0x036F    // combining diacritical marks
        | 0xFB1E             // Judeo-Spanish varika
    )
}

/// Reduce Hebrew text to its consonantal skeleton.
///
/// Pipeline, in order:
/// 1. Drop nonspacing marks (niqqud, dagesh, cantillation).
/// 2. Drop the explicit Hebrew point ranges not caught by the mark test.
/// 3. Map final forms to base forms (ך→כ ם→מ ן→נ ף→פ ץ→צ).
/// 4. Keep only base consonants א–ת; digits, Latin, punctuation and
///    whitespace all fall out here.
///
/// Total over any input: empty in, empty out; text with no Hebrew letters
/// yields the empty string. Idempotent.
///
/// Final-form mapping runs before the consonant filter on purpose — the
/// substitution targets are themselves inside the kept range.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        if is_nonspacing_mark(c) || is_hebrew_point(c) {
            continue;
        }
        let c = unfinalize(c);
        if is_base_consonant(c) {
            out.push(c);
        }
    }

    out
}

/// Collapse doubled vowel letters (matres lectionis) for spelling-variant
/// detection: a run of exactly two ו or two י becomes one.
///
/// True mater detection needs morphology; this shallow form exists only so
/// the comparator can recognize plene/defective pairs like דוד / דויד.
pub fn collapse_vowel_letters(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;

    for c in text.chars() {
        if (c == 'ו' || c == 'י') && prev == Some(c) {
            // Second letter of a doubled run collapses away.
            prev = None;
            continue;
        }
        out.push(c);
        prev = Some(c);
    }

    out
}

/// True iff the text contains at least one base Hebrew consonant (א–ת).
pub fn is_hebrew_text(text: &str) -> bool {
    text.chars().any(is_base_consonant)
}

/// Diagnostic counts over raw (unnormalized) Hebrew text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HebrewStats {
    pub consonants: usize,
    pub vowel_points: usize,
    pub final_forms: usize,
    pub has_niqqud: bool,
    /// Total input length in code points.
    pub length: usize,
}

/// Count consonants, vowel points and final forms in raw input.
pub fn hebrew_stats(text: &str) -> HebrewStats {
    let mut stats = HebrewStats::default();

    for c in text.chars() {
        stats.length += 1;

        if is_base_consonant(c) {
            stats.consonants += 1;
            if is_final_form(c) {
                stats.final_forms += 1;
            }
        }

        if is_nonspacing_mark(c) {
            stats.vowel_points += 1;
            stats.has_niqqud = true;
        }
    }

    stats
}
