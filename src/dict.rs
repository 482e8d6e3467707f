//! CSV dictionary loading: Hanzi headword → ordered pronunciation lists.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use log::{debug, info};
use regex::Regex;

use crate::TailoError;
use crate::romanize::convert_word;
use crate::segment::contains_hanzi;

static BRACKETED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[(.*)\]$").unwrap());

/// In-memory pronunciation dictionary.
///
/// Each headword maps to its distinct pronunciations in first-seen order;
/// the first entry is the default. Built once, immutable afterwards, so a
/// shared `&Dictionary` is safe across threads.
#[derive(Debug, Default, Clone)]
pub struct Dictionary {
    entries: HashMap<String, Vec<String>>,
    max_key_len: usize,
}

impl Dictionary {
    /// Load a CSV dictionary file.
    ///
    /// The header row must name `word` and `chinese` columns (in any
    /// order). Headwords come from the bracket-wrapped `chinese` field and
    /// must contain at least one Hanzi character; the `word` field is
    /// converted to Tâi-lô before storage. Unusable rows are skipped.
    ///
    /// # Errors
    ///
    /// [`TailoError::SourceNotFound`] if `path` does not exist,
    /// [`TailoError::EmptyDictionary`] if no usable rows were found.
    pub fn from_csv_path(path: &Path, orthography: bool) -> Result<Self, TailoError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => TailoError::SourceNotFound {
                path: path.to_path_buf(),
            },
            _ => TailoError::Io(e),
        })?;

        let dict = Self::from_reader(BufReader::new(file), orthography)?;
        if dict.entries.is_empty() {
            return Err(TailoError::EmptyDictionary {
                path: path.to_path_buf(),
            });
        }
        Ok(dict)
    }

    /// Build a dictionary from `(headword, pronunciation)` pairs, keeping
    /// first-seen order and collapsing duplicates. Pronunciations are
    /// stored as given, without conversion.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut dict = Self::default();
        for (key, pronunciation) in pairs {
            dict.insert(key.into(), pronunciation.into());
        }
        dict
    }

    fn from_reader<R: BufRead>(reader: R, orthography: bool) -> Result<Self, TailoError> {
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line?,
            None => return Ok(Self::default()),
        };

        let mut word_col = None;
        let mut chinese_col = None;
        for (idx, name) in header.trim_start_matches('\u{feff}').split(',').enumerate() {
            match name.trim() {
                "word" => word_col = Some(idx),
                "chinese" => chinese_col = Some(idx),
                _ => {}
            }
        }
        let (Some(word_col), Some(chinese_col)) = (word_col, chinese_col) else {
            debug!("dictionary header lacks word/chinese columns: {header}");
            return Ok(Self::default());
        };

        let mut dict = Self::default();
        let mut rows = 0usize;
        let mut skipped = 0usize;
        for line in lines {
            let line = line?;
            rows += 1;

            let fields: Vec<&str> = line.split(',').collect();
            let Some(key) = fields.get(chinese_col).and_then(|f| headword(f)) else {
                skipped += 1;
                continue;
            };
            let Some(word) = fields
                .get(word_col)
                .map(|f| f.trim())
                .filter(|w| !w.is_empty())
            else {
                skipped += 1;
                continue;
            };

            let tailo = convert_word(word, orthography);
            if tailo.is_empty() {
                skipped += 1;
                continue;
            }
            dict.insert(key, tailo);
        }

        info!(
            "loaded {} headwords from {rows} rows ({skipped} skipped)",
            dict.entries.len()
        );
        Ok(dict)
    }

    fn insert(&mut self, key: String, pronunciation: String) {
        self.max_key_len = self.max_key_len.max(key.chars().count());
        let entry = self.entries.entry(key).or_default();
        if !entry.contains(&pronunciation) {
            entry.push(pronunciation);
        }
    }

    /// All known pronunciations for `headword`, first-seen first.
    pub fn lookup(&self, headword: &str) -> Option<&[String]> {
        self.entries.get(headword).map(Vec::as_slice)
    }

    /// Longest headword length in characters; bounds the segmenter's
    /// lookup window.
    pub fn max_key_len(&self) -> usize {
        self.max_key_len
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extract a Hanzi headword from a bracket-wrapped field like `[一]`.
fn headword(field: &str) -> Option<String> {
    let caps = BRACKETED_RE.captures(field.trim())?;
    let key = caps[1].trim();
    if key.is_empty() || !contains_hanzi(key) {
        return None;
    }
    Some(key.to_string())
}
