//! Gesher Lexicon Alignment Library
//!
//! Aligns Strong's Concordance Hebrew entries with BHSA corpus lexemes by
//! consonantal-skeleton matching, with a tiered fuzzy comparator for
//! spelling variation, a total-coverage reverse mapping, and an English
//! translation splice for corpus word nodes.
//!
//! # Example
//!
//! ```no_run
//! use gesher_align::prelude::*;
//! use std::path::Path;
//!
//! let params = MappingParams::default();
//!
//! // Load the reference dictionary and the corpus vocabulary
//! let dictionary = load_strongs(Path::new("strongs-hebrew.json")).unwrap();
//! let corpus = Corpus::load(Path::new("bhsa/")).unwrap();
//! let lexemes = corpus.lexemes();
//!
//! // Forward: Strong's number -> ranked corpus candidates
//! let forward = build_forward(&dictionary.entries, &lexemes, dictionary.skipped, &params, false);
//!
//! // Reverse: every corpus form resolved to its best Strong's entry
//! let reverse = build_reverse(&forward, &lexemes, false);
//!
//! println!("Coverage: {:.1}%", reverse.summary.coverage());
//! ```
//!
//! # Comparing two strings directly
//!
//! ```
//! use gesher_align::prelude::*;
//!
//! // Same skeleton, different pointing
//! assert_eq!(compare("אָהַב", "אהב", true), 0.9);
//! ```

pub mod compare;
pub mod corpus;
pub mod corrections;
pub mod english;
pub mod mapping;
pub mod models;
pub mod normalize;
pub mod output;
pub mod query;
pub mod strongs;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::compare::{compare, compare_weighted, levenshtein_distance, CompareWeights};
    pub use crate::corpus::{load_feature, parse_feature, parse_otype, Corpus, CorpusError, Feature};
    pub use crate::corrections::{
        apply_corrections, load_corrections, Correction, CorrectionReport, CorrectionsError,
    };
    pub use crate::english::{
        parse_bsb_field, EnglishError, OffsetTable, TranslationProvider, WordTranslation,
    };
    pub use crate::mapping::{
        build_forward, build_reverse, find_candidates, reverse_key, summarize_reverse, LexemeIndex,
    };
    pub use crate::models::{
        round_score, CandidateMatch, Confidence, ForwardMapping, Lexeme, MappingEntry,
        MappingParams, MappingSummary, MatchMethod, ReverseEntry, ReverseMapping, ReverseSummary,
        StrongsEntry,
    };
    pub use crate::normalize::{
        collapse_vowel_letters, hebrew_stats, is_hebrew_text, normalize, HebrewStats,
    };
    pub use crate::output::{
        ambiguous_entries, print_forward_summary, print_reverse_summary, write_ambiguous_json,
        write_forward_json, write_forward_json_file, write_report, write_reverse_json,
        write_reverse_json_file, OutputError,
    };
    pub use crate::query::{
        build_context_prompt, extract_keywords, search_glosses, validate_query, GlossHit,
        QueryError, VALID_NODE_TYPES,
    };
    pub use crate::strongs::{
        clean_kjv_glosses, load_strongs, parse_strongs, StrongsDictionary, StrongsError,
    };
}

// Re-export commonly used types at the crate root
pub use compare::compare;
pub use models::{ForwardMapping, MappingParams, ReverseMapping};
pub use normalize::normalize;
