//! Convert Hanzi text and POJ-style Southern Min romanization into Tâi-lô
//! (台羅), with optional IPA phonetic output.
//!
//! The pipeline: Hanzi runs are segmented against a pronunciation
//! dictionary with greedy longest-match lookup, POJ-style spellings are
//! rewritten into Tâi-lô orthography, numeric tones become diacritics, and
//! the result can optionally be rendered as IPA with superscript tone
//! numerals.

use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use thiserror::Error;

pub mod dict;
mod ipa;
pub mod opencc;
mod romanize;
mod segment;

pub use dict::Dictionary;
pub use ipa::{syllable_to_ipa, text_to_ipa};
pub use opencc::OpenCcPool;
pub use romanize::{
    apply_tone_mark, convert_numeric_tones, convert_word, strip_tone, to_tailo_orthography,
};
pub use segment::{UNKNOWN_MARK, contains_hanzi, hanzi_to_tailo, is_hanzi};

#[derive(Error, Debug)]
pub enum TailoError {
    #[error("dictionary not found: {} (use --dict PATH)", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("no entries loaded from {}", path.display())]
    EmptyDictionary { path: PathBuf },

    #[error("(not found) {word}")]
    HeadwordNotFound { word: String },

    #[error("unrecognized policy `{0}`")]
    InvalidPolicy(String),

    #[error("a dictionary is required for Hanzi conversion")]
    DictionaryRequired,

    #[error(
        "OpenCC support not compiled in (rebuild with the `opencc` feature or pass --no-opencc)"
    )]
    OpenccUnavailable,

    #[error("OpenCC conversion failed: {0}")]
    Opencc(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Segment Hanzi when present, then convert numeric-tone syllables.
    #[default]
    Auto,
    /// Dictionary segmentation of Hanzi only.
    Hanzi,
    /// Treat the whole input as POJ-style romanization.
    Poj,
}

/// How to render a headword with more than one known pronunciation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmbiguousPolicy {
    /// Emit the first-seen pronunciation.
    #[default]
    First,
    /// Emit all of them, `{a/b}`-style.
    All,
}

/// What to do with Hanzi absent from the dictionary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownPolicy {
    /// Copy the character through unchanged.
    #[default]
    Keep,
    /// Emit the `<?>` placeholder.
    Mark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Tailo,
    Ipa,
}

impl FromStr for AmbiguousPolicy {
    type Err = TailoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::First),
            "all" => Ok(Self::All),
            _ => Err(TailoError::InvalidPolicy(s.to_string())),
        }
    }
}

impl FromStr for UnknownPolicy {
    type Err = TailoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(Self::Keep),
            "mark" => Ok(Self::Mark),
            _ => Err(TailoError::InvalidPolicy(s.to_string())),
        }
    }
}

/// Options shared by every conversion entry point.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    pub mode: Mode,
    /// Apply the POJ→Tâi-lô digraph/vowel rewrites. Tone numbers and the
    /// nasal marker are normalized either way.
    pub orthography: bool,
    pub ambiguous: AmbiguousPolicy,
    pub unknown: UnknownPolicy,
    pub output: OutputFormat,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Auto,
            orthography: true,
            ambiguous: AmbiguousPolicy::First,
            unknown: UnknownPolicy::Keep,
            output: OutputFormat::Tailo,
        }
    }
}

/// The conversion façade: options plus an optional dictionary.
///
/// A dictionary is only needed for Hanzi segmentation; POJ conversion and
/// numeric-tone rewriting work without one.
///
/// # Example
/// ```
/// use tailo::{ConvertOptions, Mode, Tailo};
///
/// let converter = Tailo::new(ConvertOptions {
///     mode: Mode::Poj,
///     ..ConvertOptions::default()
/// });
/// assert_eq!(converter.convert("chit8 e5").unwrap(), "tsi̍t ê");
/// ```
pub struct Tailo {
    dict: Option<Dictionary>,
    options: ConvertOptions,
}

impl Tailo {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            dict: None,
            options,
        }
    }

    pub fn with_dictionary(dict: Dictionary, options: ConvertOptions) -> Self {
        Self {
            dict: Some(dict),
            options,
        }
    }

    pub fn dictionary(&self) -> Option<&Dictionary> {
        self.dict.as_ref()
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert `text` according to the configured mode and output format.
    ///
    /// # Errors
    ///
    /// [`TailoError::DictionaryRequired`] when the text needs Hanzi
    /// segmentation but no dictionary was supplied.
    pub fn convert(&self, text: &str) -> Result<String, TailoError> {
        let out = match self.options.mode {
            Mode::Poj => romanize::convert_word(text, self.options.orthography),
            Mode::Hanzi => self.segment(text)?,
            Mode::Auto => {
                let segmented = if segment::contains_hanzi(text) {
                    self.segment(text)?
                } else {
                    text.to_string()
                };
                romanize::convert_numeric_tones(&segmented, self.options.orthography)
            }
        };

        Ok(match self.options.output {
            OutputFormat::Tailo => out,
            OutputFormat::Ipa => ipa::text_to_ipa(&out),
        })
    }

    /// Convert line by line in parallel, preserving order. Sound because
    /// the dictionary is immutable after construction and shared
    /// read-only.
    pub fn convert_parallel(&self, text: &str) -> Result<String, TailoError> {
        let lines: Vec<&str> = text.lines().collect();
        let converted: Vec<String> = lines
            .par_iter()
            .map(|line| self.convert(line))
            .collect::<Result<_, _>>()?;
        Ok(converted.join("\n"))
    }

    /// All known pronunciations for an exact headword.
    ///
    /// # Errors
    ///
    /// [`TailoError::HeadwordNotFound`] on a miss,
    /// [`TailoError::DictionaryRequired`] without a dictionary.
    pub fn lookup(&self, headword: &str) -> Result<&[String], TailoError> {
        let dict = self.dict.as_ref().ok_or(TailoError::DictionaryRequired)?;
        dict.lookup(headword)
            .ok_or_else(|| TailoError::HeadwordNotFound {
                word: headword.to_string(),
            })
    }

    fn segment(&self, text: &str) -> Result<String, TailoError> {
        let dict = self.dict.as_ref().ok_or(TailoError::DictionaryRequired)?;
        Ok(segment::hanzi_to_tailo(
            text,
            dict,
            self.options.ambiguous,
            self.options.unknown,
        ))
    }
}
