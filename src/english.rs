//! English translation splice for corpus word nodes.
//!
//! BSB interlinear rows live in a tab-separated table whose row numbering
//! drifts from the corpus node numbering; a position-offset table corrects
//! the drift. The provider is constructed explicitly, owns its data, and
//! keeps a fixed-capacity LRU cache of parsed records.

use lru::LruCache;
use serde_json::Value;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnglishError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("offset table is not an object of integer offsets")]
    BadOffsetTable,
}

/// Fullwidth commercial at, the sort/text separator inside a BSB field.
const BSB_SEPARATOR: char = '\u{ff20}';

const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Node-threshold offset table.
///
/// Lookup rule: the offset of the greatest threshold that is <= the node,
/// or 0 when no threshold qualifies.
#[derive(Debug, Default, Clone)]
pub struct OffsetTable {
    /// (threshold, offset), sorted by threshold ascending.
    entries: Vec<(u32, i64)>,
}

impl OffsetTable {
    pub fn new(mut entries: Vec<(u32, i64)>) -> Self {
        entries.sort_unstable_by_key(|&(threshold, _)| threshold);
        Self { entries }
    }

    /// Parse the JSON form: an object of stringified thresholds to offsets.
    pub fn from_json(content: &str) -> Result<Self, EnglishError> {
        let root: Value = serde_json::from_str(content)?;
        let map = root.as_object().ok_or(EnglishError::BadOffsetTable)?;

        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            let threshold: u32 = key.parse().map_err(|_| EnglishError::BadOffsetTable)?;
            let offset = value.as_i64().ok_or(EnglishError::BadOffsetTable)?;
            entries.push((threshold, offset));
        }
        Ok(Self::new(entries))
    }

    pub fn load(path: &Path) -> Result<Self, EnglishError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn offset_for(&self, node: u32) -> i64 {
        let mut offset = 0;
        for &(threshold, value) in &self.entries {
            if node >= threshold {
                offset = value;
            } else {
                break;
            }
        }
        offset
    }
}

/// Parsed interlinear record for one word node.
#[derive(Debug, Clone, PartialEq)]
pub struct WordTranslation {
    /// ETCBC gloss column.
    pub gloss: String,
    /// BSB English text, empty when the field is absent or malformed.
    pub english: String,
    /// BSB word-order key; None when unparseable.
    pub bsb_sort: Option<u32>,
}

/// Parse a BSB field of the form `〔sort＠text〕`.
///
/// The surrounding brackets are stripped and the remainder split on the
/// fullwidth `＠`; anything that does not split into exactly two parts
/// yields an empty text.
pub fn parse_bsb_field(field: &str) -> (String, Option<u32>) {
    if field.is_empty() {
        return (String::new(), None);
    }

    let chars: Vec<char> = field.chars().collect();
    let inner: String = if chars.len() > 2 {
        chars[1..chars.len() - 1].iter().collect()
    } else {
        field.to_string()
    };

    let parts: Vec<&str> = inner.split(BSB_SEPARATOR).collect();
    if parts.len() != 2 {
        return (String::new(), None);
    }

    (parts[1].to_string(), parts[0].parse().ok())
}

/// The translation provider: interlinear rows plus the offset table.
///
/// Records are parsed lazily and kept in a bounded least-recently-used
/// cache; the least recently requested record is evicted at capacity.
#[derive(Debug)]
pub struct TranslationProvider {
    /// Raw file lines; index 0 is the header row, data rows align with
    /// offset-corrected node numbers.
    lines: Vec<String>,
    offsets: OffsetTable,
    cache: LruCache<u32, Option<WordTranslation>>,
}

impl TranslationProvider {
    /// Open a provider from the interlinear table and offset files.
    pub fn open(table_path: &Path, offsets_path: &Path) -> Result<Self, EnglishError> {
        Self::open_with_capacity(table_path, offsets_path, DEFAULT_CACHE_CAPACITY)
    }

    pub fn open_with_capacity(
        table_path: &Path,
        offsets_path: &Path,
        capacity: usize,
    ) -> Result<Self, EnglishError> {
        let content = fs::read_to_string(table_path)?;
        let lines = content.lines().map(str::to_string).collect();
        let offsets = OffsetTable::load(offsets_path)?;
        Ok(Self::from_parts(lines, offsets, capacity))
    }

    /// Build a provider from in-memory rows (tests, synthetic data).
    pub fn from_parts(lines: Vec<String>, offsets: OffsetTable, capacity: usize) -> Self {
        let capacity =
            NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            lines,
            offsets,
            cache: LruCache::new(capacity),
        }
    }

    /// Number of records currently cached.
    pub fn cached_records(&self) -> usize {
        self.cache.len()
    }

    /// Translation record for one word node, None when the node falls
    /// outside the table or its row is too short.
    pub fn translation(&mut self, node: u32) -> Option<WordTranslation> {
        if let Some(cached) = self.cache.get(&node) {
            return cached.clone();
        }
        let parsed = self.parse_record(node);
        self.cache.put(node, parsed.clone());
        parsed
    }

    fn parse_record(&self, node: u32) -> Option<WordTranslation> {
        let index = i64::from(node) + self.offsets.offset_for(node);
        if index < 1 {
            return None;
        }
        let line = self.lines.get(index as usize)?;

        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 3 {
            return None;
        }

        let gloss = parts[2].to_string();
        let (english, bsb_sort) = match parts.get(3) {
            Some(field) => parse_bsb_field(field),
            None => (String::new(), None),
        };

        Some(WordTranslation {
            gloss,
            english,
            bsb_sort,
        })
    }

    /// Assemble the English text for a sequence of word nodes, reordered by
    /// BSB sort key (node number when the key is missing). Words without
    /// English text are dropped.
    pub fn verse(&mut self, nodes: &[u32]) -> String {
        let mut words: Vec<(u32, String)> = Vec::with_capacity(nodes.len());

        for &node in nodes {
            if let Some(record) = self.translation(node) {
                if !record.english.is_empty() {
                    let sort_key = record.bsb_sort.unwrap_or(node);
                    words.push((sort_key, record.english));
                }
            }
        }

        words.sort_by_key(|&(key, _)| key);
        words
            .into_iter()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
