//! Gesher Lexicon Alignment Pipeline
//!
//! Aligns Strong's Concordance Hebrew entries with BHSA corpus lexemes and
//! splices English translations onto corpus word nodes.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

mod compare;
mod corpus;
mod corrections;
mod english;
mod mapping;
mod models;
mod normalize;
mod output;
mod query;
mod strongs;

use compare::{compare_weighted, CompareWeights};
use corpus::Corpus;
use corrections::{apply_corrections, load_corrections};
use english::TranslationProvider;
use mapping::{build_forward, build_reverse};
use models::{ForwardMapping, MappingParams, ReverseMapping};
use normalize::{hebrew_stats, normalize};
use output::{
    print_forward_summary, print_reverse_summary, write_ambiguous_json, write_forward_json_file,
    write_report, write_reverse_json_file,
};
use query::search_glosses;
use strongs::load_strongs;

#[derive(Parser)]
#[command(name = "gesher-align")]
#[command(about = "Strong's-to-BHSA Hebrew lexicon alignment")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the forward mapping (Strong's entry -> ranked corpus candidates)
    ///
    /// All parameters default to MappingParams::default(). Override any
    /// parameter explicitly to customize behavior.
    Build {
        /// Path to the Strong's Hebrew dictionary (JSON or JS-wrapped JSON)
        #[arg(long)]
        strongs: PathBuf,

        /// Directory with the corpus .tf feature files
        #[arg(long)]
        corpus: PathBuf,

        /// Output JSON file
        #[arg(long)]
        output: PathBuf,

        /// Also write the multi-candidate subset here for manual review
        #[arg(long)]
        ambiguous: Option<PathBuf>,

        /// Minimum candidate score [default: 0.7]
        #[arg(long)]
        min_score: Option<f64>,

        /// Max normalized-length difference for the fuzzy fallback [default: 2]
        #[arg(long)]
        max_length_delta: Option<usize>,

        /// Candidate list cap [default: 10]
        #[arg(long)]
        max_candidates: Option<usize>,

        /// Disable the edit-distance tier
        #[arg(long)]
        no_fuzzy: bool,

        /// Suppress progress output
        #[arg(long)]
        quiet: bool,
    },

    /// Build the reverse mapping with the total-coverage pass
    ///
    /// Every corpus form receives a match; optionally applies a manual
    /// correction table afterwards.
    Complete {
        /// Path to the Strong's Hebrew dictionary
        #[arg(long)]
        strongs: PathBuf,

        /// Directory with the corpus .tf feature files
        #[arg(long)]
        corpus: PathBuf,

        /// Output JSON file
        #[arg(long)]
        output: PathBuf,

        /// Manual correction table (JSON list), applied last
        #[arg(long)]
        corrections: Option<PathBuf>,

        /// Write a plain-text statistics report here
        #[arg(long)]
        report: Option<PathBuf>,

        /// Minimum candidate score [default: 0.7]
        #[arg(long)]
        min_score: Option<f64>,

        /// Max normalized-length difference for the fuzzy fallback [default: 2]
        #[arg(long)]
        max_length_delta: Option<usize>,

        /// Candidate list cap [default: 10]
        #[arg(long)]
        max_candidates: Option<usize>,

        /// Disable the edit-distance tier
        #[arg(long)]
        no_fuzzy: bool,

        /// Suppress progress output
        #[arg(long)]
        quiet: bool,
    },

    /// Apply a manual correction table to an existing reverse mapping
    Corrections {
        /// Reverse mapping JSON to patch
        #[arg(long)]
        reverse: PathBuf,

        /// Forward mapping JSON (source of lemmas and glosses)
        #[arg(long)]
        forward: PathBuf,

        /// Correction table (JSON list)
        #[arg(long)]
        corrections: PathBuf,

        /// Output JSON file
        #[arg(long)]
        output: PathBuf,

        /// Suppress progress output
        #[arg(long)]
        quiet: bool,
    },

    /// Score two Hebrew strings against each other
    Compare {
        /// First string
        text1: String,

        /// Second string
        text2: String,

        /// Disable the edit-distance tier
        #[arg(long)]
        no_fuzzy: bool,

        /// Weight for equal consonantal skeletons [default: 0.9]
        #[arg(long)]
        consonantal_weight: Option<f64>,

        /// Weight for collapsed spelling variants [default: 0.85]
        #[arg(long)]
        variant_weight: Option<f64>,

        /// Multiplier on the edit-distance similarity [default: 0.7]
        #[arg(long)]
        fuzzy_weight: Option<f64>,
    },

    /// Show Hebrew character statistics for a string
    Stats {
        /// Input string
        text: String,
    },

    /// Look up English translations for corpus word nodes
    Translate {
        /// Tab-separated interlinear table
        #[arg(long)]
        table: PathBuf,

        /// Node-offset table (JSON object)
        #[arg(long)]
        offsets: PathBuf,

        /// Word node IDs
        #[arg(required = true)]
        nodes: Vec<u32>,

        /// Assemble one line in translation word order instead of per-node rows
        #[arg(long)]
        verse: bool,
    },

    /// Search a forward mapping by English gloss
    Search {
        /// Forward mapping JSON
        #[arg(long)]
        mapping: PathBuf,

        /// English search term
        term: String,

        /// Result cap
        #[arg(long, default_value = "10")]
        max_results: usize,
    },
}

fn overlay_params(
    min_score: Option<f64>,
    max_length_delta: Option<usize>,
    max_candidates: Option<usize>,
    no_fuzzy: bool,
) -> MappingParams {
    let defaults = MappingParams::default();
    MappingParams {
        min_score: min_score.unwrap_or(defaults.min_score),
        max_length_delta: max_length_delta.unwrap_or(defaults.max_length_delta),
        max_candidates: max_candidates.unwrap_or(defaults.max_candidates),
        fuzzy: !no_fuzzy,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            strongs,
            corpus,
            output,
            ambiguous,
            min_score,
            max_length_delta,
            max_candidates,
            no_fuzzy,
            quiet,
        } => {
            let params = overlay_params(min_score, max_length_delta, max_candidates, no_fuzzy);

            let dictionary = load_strongs(&strongs)?;
            if !quiet && dictionary.skipped > 0 {
                eprintln!("Skipped {} malformed dictionary entries", dictionary.skipped);
            }

            let corpus = Corpus::load(&corpus)?;
            let lexemes = corpus.lexemes();

            let forward = build_forward(
                &dictionary.entries,
                &lexemes,
                dictionary.skipped,
                &params,
                !quiet,
            );

            write_forward_json_file(&forward, &output)?;
            if let Some(path) = ambiguous {
                let mut file = fs::File::create(path)?;
                write_ambiguous_json(&forward, &mut file)?;
            }

            if !quiet {
                print_forward_summary(&forward);
            }
        }

        Commands::Complete {
            strongs,
            corpus,
            output,
            corrections,
            report,
            min_score,
            max_length_delta,
            max_candidates,
            no_fuzzy,
            quiet,
        } => {
            let params = overlay_params(min_score, max_length_delta, max_candidates, no_fuzzy);

            let dictionary = load_strongs(&strongs)?;
            let corpus = Corpus::load(&corpus)?;
            let lexemes = corpus.lexemes();

            let forward = build_forward(
                &dictionary.entries,
                &lexemes,
                dictionary.skipped,
                &params,
                !quiet,
            );
            let mut reverse = build_reverse(&forward, &lexemes, !quiet);

            if let Some(path) = corrections {
                let table = load_corrections(&path)?;
                let result = apply_corrections(&mut reverse, &table, &forward);
                if !quiet {
                    eprintln!(
                        "Applied {} corrections ({} overridden, {} added)",
                        table.len(),
                        result.overridden,
                        result.added
                    );
                }
            }

            write_reverse_json_file(&reverse, &output)?;
            if let Some(path) = report {
                let mut file = fs::File::create(path)?;
                write_report(&reverse, &mut file)?;
            }

            if !quiet {
                print_reverse_summary(&reverse);
            }
        }

        Commands::Corrections {
            reverse,
            forward,
            corrections,
            output,
            quiet,
        } => {
            let mut reverse: ReverseMapping = serde_json::from_str(&fs::read_to_string(reverse)?)?;
            let forward: ForwardMapping = serde_json::from_str(&fs::read_to_string(forward)?)?;
            let table = load_corrections(&corrections)?;

            let result = apply_corrections(&mut reverse, &table, &forward);
            write_reverse_json_file(&reverse, &output)?;

            if !quiet {
                eprintln!(
                    "Applied {} corrections ({} overridden, {} added)",
                    table.len(),
                    result.overridden,
                    result.added
                );
                print_reverse_summary(&reverse);
            }
        }

        Commands::Compare {
            text1,
            text2,
            no_fuzzy,
            consonantal_weight,
            variant_weight,
            fuzzy_weight,
        } => {
            let defaults = CompareWeights::default();
            let weights = CompareWeights {
                exact: defaults.exact,
                consonantal: consonantal_weight.unwrap_or(defaults.consonantal),
                variant: variant_weight.unwrap_or(defaults.variant),
                fuzzy: fuzzy_weight.unwrap_or(defaults.fuzzy),
            };

            let score = compare_weighted(&text1, &text2, !no_fuzzy, &weights);
            println!("{score:.3}");
            println!("  normalized: {:?} vs {:?}", normalize(&text1), normalize(&text2));
        }

        Commands::Stats { text } => {
            let stats = hebrew_stats(&text);
            println!("Length:       {}", stats.length);
            println!("Consonants:   {}", stats.consonants);
            println!("Vowel points: {}", stats.vowel_points);
            println!("Final forms:  {}", stats.final_forms);
            println!("Has niqqud:   {}", stats.has_niqqud);
            println!("Normalized:   {}", normalize(&text));
        }

        Commands::Translate {
            table,
            offsets,
            nodes,
            verse,
        } => {
            let mut provider = TranslationProvider::open(&table, &offsets)?;

            if verse {
                println!("{}", provider.verse(&nodes));
            } else {
                for node in nodes {
                    match provider.translation(node) {
                        Some(record) => {
                            println!("{node}\t{}\t{}", record.gloss, record.english)
                        }
                        None => println!("{node}\t-\t-"),
                    }
                }
            }
        }

        Commands::Search {
            mapping,
            term,
            max_results,
        } => {
            let forward: ForwardMapping = serde_json::from_str(&fs::read_to_string(mapping)?)?;
            let hits = search_glosses(&forward, &term, max_results);

            if hits.is_empty() {
                println!("No entries match {term:?}");
            } else {
                for hit in hits {
                    println!("{}\t{}\t{}", hit.strongs, hit.lemma, hit.glosses);
                }
            }
        }
    }

    Ok(())
}
