//! Output formatting for mapping results (JSON, reports, summaries).

use crate::models::{ForwardMapping, MappingEntry, ReverseMapping};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write a forward mapping as JSON.
pub fn write_forward_json<W: Write>(
    mapping: &ForwardMapping,
    writer: &mut W,
) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(mapping)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Write a forward mapping as JSON to a file.
pub fn write_forward_json_file(mapping: &ForwardMapping, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_forward_json(mapping, &mut file)
}

/// Write a reverse mapping as JSON.
pub fn write_reverse_json<W: Write>(
    mapping: &ReverseMapping,
    writer: &mut W,
) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(mapping)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Write a reverse mapping as JSON to a file.
pub fn write_reverse_json_file(mapping: &ReverseMapping, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_reverse_json(mapping, &mut file)
}

/// Entries with more than one candidate, for manual review.
pub fn ambiguous_entries(mapping: &ForwardMapping) -> Vec<&MappingEntry> {
    mapping
        .entries
        .iter()
        .filter(|entry| entry.match_count > 1)
        .collect()
}

/// Write the ambiguous subset as JSON.
pub fn write_ambiguous_json<W: Write>(
    mapping: &ForwardMapping,
    writer: &mut W,
) -> Result<(), OutputError> {
    let subset = ambiguous_entries(mapping);
    let json = serde_json::to_string_pretty(&subset)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Write a plain-text statistics report for a reverse mapping.
///
/// Coverage below 90% gets a warning line: the completion pass should make
/// that impossible, so a shortfall means the inputs are wrong.
pub fn write_report<W: Write>(mapping: &ReverseMapping, writer: &mut W) -> Result<(), OutputError> {
    let summary = &mapping.summary;

    writeln!(writer, "=== Reverse Mapping Report ===")?;
    writeln!(writer, "Version: {}", mapping.version)?;
    writeln!(writer)?;
    writeln!(writer, "Lexemes: {}", summary.total_lexemes)?;
    writeln!(writer, "Mapped:  {}", summary.total_matched)?;
    writeln!(writer, "Coverage: {:.1}%", summary.coverage())?;
    writeln!(writer)?;
    writeln!(writer, "By method:")?;
    writeln!(writer, "  exact:       {}", summary.exact)?;
    writeln!(writer, "  consonantal: {}", summary.consonantal)?;
    writeln!(writer, "  fuzzy:       {}", summary.fuzzy)?;
    writeln!(writer, "  manual:      {}", summary.manual)?;
    writeln!(writer)?;
    writeln!(writer, "By confidence:")?;
    writeln!(writer, "  high (>= 0.9):        {}", summary.high_confidence)?;
    writeln!(writer, "  medium (0.7 - 0.9):   {}", summary.medium_confidence)?;
    writeln!(writer, "  low (< 0.7):          {}", summary.low_confidence)?;

    if summary.coverage() < 90.0 {
        writeln!(writer)?;
        writeln!(
            writer,
            "WARNING: coverage {:.1}% is below 90% - check input files",
            summary.coverage()
        )?;
    }

    Ok(())
}

/// Print a forward-mapping summary to stdout.
pub fn print_forward_summary(mapping: &ForwardMapping) {
    let summary = &mapping.summary;
    println!("\n=== Forward Mapping Summary ===");
    println!("Version: {}", mapping.version);
    println!();
    println!("Parameters:");
    println!("  Min score: {}", mapping.parameters.min_score);
    println!("  Max length delta: {}", mapping.parameters.max_length_delta);
    println!("  Max candidates: {}", mapping.parameters.max_candidates);
    println!("  Fuzzy: {}", mapping.parameters.fuzzy);
    println!();
    println!("Results:");
    println!("  Entries: {}", summary.total_entries);
    println!("  Matched: {} ({:.1}%)", summary.matched, summary.coverage());
    println!("  Unmatched: {}", summary.unmatched);
    println!("  Ambiguous: {}", summary.ambiguous);
    println!("  Skipped (malformed): {}", summary.skipped);
    println!("  High confidence: {}", summary.high_confidence);
    println!("  Medium confidence: {}", summary.medium_confidence);
    println!("  Low confidence: {}", summary.low_confidence);
}

/// Print a reverse-mapping summary to stdout.
pub fn print_reverse_summary(mapping: &ReverseMapping) {
    let summary = &mapping.summary;
    println!("\n=== Reverse Mapping Summary ===");
    println!("Version: {}", mapping.version);
    println!();
    println!("  Lexemes: {}", summary.total_lexemes);
    println!("  Mapped: {} ({:.1}%)", summary.total_matched, summary.coverage());
    println!(
        "  exact {} / consonantal {} / fuzzy {} / manual {}",
        summary.exact, summary.consonantal, summary.fuzzy, summary.manual
    );
}
