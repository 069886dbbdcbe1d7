//! BHSA corpus access: line-per-record `.tf` feature files.
//!
//! A feature file is a header of `@`-prefixed lines followed by data lines.
//! A data line either carries an explicit node spec (`node<TAB>value` or
//! `start-end<TAB>value`) or is a bare value assigned to the next implicit
//! node. Node numbering starts at 1.

use crate::normalize::normalize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::Lexeme;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("feature file not found: {0}")]
    FeatureNotFound(PathBuf),
    #[error("invalid node spec {spec:?} in {file}")]
    InvalidNodeSpec { spec: String, file: String },
}

/// One loaded feature: node -> value.
#[derive(Debug, Default)]
pub struct Feature {
    values: HashMap<u32, String>,
    max_node: u32,
}

impl Feature {
    pub fn get(&self, node: u32) -> Option<&str> {
        self.values.get(&node).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn max_node(&self) -> u32 {
        self.max_node
    }
}

/// Parse `.tf` content into a node->value table.
pub fn parse_feature(content: &str, file: &str) -> Result<Feature, CorpusError> {
    let mut values: HashMap<u32, String> = HashMap::new();
    let mut max_node = 0u32;
    let mut next_node = 1u32;
    let mut in_header = true;

    for line in content.lines() {
        if in_header {
            if line.starts_with('@') {
                continue;
            }
            in_header = false;
            // Header is terminated by one blank line in well-formed files.
            if line.is_empty() {
                continue;
            }
        }

        let mut assign = |node: u32, value: &str, values: &mut HashMap<u32, String>| {
            if !value.is_empty() {
                values.insert(node, value.to_string());
            }
            if node > max_node {
                max_node = node;
            }
        };

        match line.split_once('\t') {
            Some((spec, value)) if looks_like_node_spec(spec) => {
                if let Some((start_str, end_str)) = spec.split_once('-') {
                    let start: u32 = start_str.parse().map_err(|_| {
                        CorpusError::InvalidNodeSpec {
                            spec: spec.to_string(),
                            file: file.to_string(),
                        }
                    })?;
                    let end: u32 = end_str.parse().map_err(|_| {
                        CorpusError::InvalidNodeSpec {
                            spec: spec.to_string(),
                            file: file.to_string(),
                        }
                    })?;
                    for node in start..=end {
                        assign(node, value, &mut values);
                    }
                    next_node = end + 1;
                } else {
                    let node: u32 = spec.parse().map_err(|_| {
                        CorpusError::InvalidNodeSpec {
                            spec: spec.to_string(),
                            file: file.to_string(),
                        }
                    })?;
                    assign(node, value, &mut values);
                    next_node = node + 1;
                }
            }
            _ => {
                // Bare value line: next implicit node. Empty lines still
                // consume a node so downstream alignment is preserved.
                assign(next_node, line, &mut values);
                next_node += 1;
            }
        }
    }

    Ok(Feature { values, max_node })
}

fn looks_like_node_spec(spec: &str) -> bool {
    !spec.is_empty() && spec.chars().all(|c| c.is_ascii_digit() || c == '-')
}

/// Load a single feature file from the corpus directory.
pub fn load_feature(dir: &Path, name: &str) -> Result<Feature, CorpusError> {
    let path = dir.join(name);
    if !path.exists() {
        return Err(CorpusError::FeatureNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    parse_feature(&content, name)
}

/// Parse `otype.tf` into type -> node list.
pub fn parse_otype(content: &str, file: &str) -> Result<HashMap<String, Vec<u32>>, CorpusError> {
    let feature = parse_feature(content, file)?;
    let mut otypes: HashMap<String, Vec<u32>> = HashMap::new();
    let mut nodes: Vec<u32> = feature.values.keys().copied().collect();
    nodes.sort_unstable();
    for node in nodes {
        if let Some(otype) = feature.get(node) {
            otypes.entry(otype.to_string()).or_default().push(node);
        }
    }
    Ok(otypes)
}

/// The corpus access provider: raw text fields keyed by word node, plus the
/// deduplicated lexeme vocabulary derived from them.
#[derive(Debug)]
pub struct Corpus {
    lex: Feature,
    voc_lex: Feature,
    language: Feature,
    word_count: u32,
}

impl Corpus {
    /// Load the lexeme-bearing features from a corpus directory.
    ///
    /// `language.tf` is optional; absent values default to "Hebrew".
    pub fn load(dir: &Path) -> Result<Self, CorpusError> {
        let lex = load_feature(dir, "lex_utf8.tf")?;
        let voc_lex = load_feature(dir, "voc_lex_utf8.tf")?;
        let language = match load_feature(dir, "language.tf") {
            Ok(f) => f,
            Err(CorpusError::FeatureNotFound(_)) => Feature::default(),
            Err(e) => return Err(e),
        };

        let word_count = lex.max_node().max(voc_lex.max_node());

        Ok(Self {
            lex,
            voc_lex,
            language,
            word_count,
        })
    }

    /// Build a corpus directly from in-memory features (tests, synthetic data).
    pub fn from_features(lex: Feature, voc_lex: Feature, language: Feature) -> Self {
        let word_count = lex.max_node().max(voc_lex.max_node());
        Self {
            lex,
            voc_lex,
            language,
            word_count,
        }
    }

    /// Raw text fields for a word node: (bare form, vocalized form).
    pub fn fields(&self, node: u32) -> (Option<&str>, Option<&str>) {
        (self.lex.get(node), self.voc_lex.get(node))
    }

    pub fn word_count(&self) -> u32 {
        self.word_count
    }

    /// Assemble the unique lexeme vocabulary.
    ///
    /// The vocalized form is the uniqueness key (bare form when vocalized is
    /// missing); the first occurrence in node order wins and records its
    /// node. Normalization is applied to the vocalized form, falling back to
    /// the bare form.
    pub fn lexemes(&self) -> Vec<Lexeme> {
        let mut seen: HashMap<String, ()> = HashMap::new();
        let mut lexemes = Vec::new();

        for node in 1..=self.word_count {
            let (lex, voc) = self.fields(node);
            let lex = lex.unwrap_or("");
            let voc = voc.unwrap_or("");

            if lex.is_empty() && voc.is_empty() {
                continue;
            }

            let key = if voc.is_empty() { lex } else { voc };
            if seen.contains_key(key) {
                continue;
            }
            seen.insert(key.to_string(), ());

            let source = if voc.is_empty() { lex } else { voc };
            lexemes.push(Lexeme {
                node,
                consonantal: lex.to_string(),
                vocalized: voc.to_string(),
                language: self
                    .language
                    .get(node)
                    .unwrap_or("Hebrew")
                    .to_string(),
                normalized: normalize(source),
            });
        }

        lexemes
    }
}
