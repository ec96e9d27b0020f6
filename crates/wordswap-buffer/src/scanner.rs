//! Word scanning.
//!
//! A word is a non-empty run of Unicode word characters (letters, digits,
//! marks, connector punctuation such as `_`). How digits at the start of a run
//! are treated depends on the [`WordRule`].
//!
//! ## Learning: Lazy Statics
//!
//! Compiling a regex is expensive compared to running it. `LazyLock` compiles
//! each pattern once, on first use, and shares it between all callers.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::WordIndex;

static STANDARD: LazyLock<Regex> = LazyLock::new(|| compile(r"\w+"));
static STRICT_DIGITS: LazyLock<Regex> = LazyLock::new(|| compile(r"\d*[^\W\d]\w*"));
static LETTER_LED: LazyLock<Regex> = LazyLock::new(|| compile(r"[^\W\d]\w*"));

fn compile(pattern: &str) -> Regex {
    // Patterns are literals above; a failure here is a programming error.
    Regex::new(pattern).expect("word pattern must compile")
}

/// Tokenization rule used to find words in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WordRule {
    /// Maximal runs of word characters. Leading digits merge into the rest of
    /// the run and a bare number is a word of its own.
    #[default]
    Standard,

    /// `\d*(?!\d)\w+`: a word must contain a non-digit. Leading digits merge
    /// into it, bare numbers are skipped.
    StrictDigits,

    /// `(?!\d)\w+`: a word starts at the first non-digit of a run, so leading
    /// digits are dropped.
    LetterLed,
}

impl WordRule {
    /// Returns the compiled pattern for this rule.
    pub fn regex(self) -> &'static Regex {
        match self {
            WordRule::Standard => &STANDARD,
            WordRule::StrictDigits => &STRICT_DIGITS,
            WordRule::LetterLed => &LETTER_LED,
        }
    }

    /// Name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            WordRule::Standard => "standard",
            WordRule::StrictDigits => "strict-digits",
            WordRule::LetterLed => "letter-led",
        }
    }
}

impl std::fmt::Display for WordRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Scans `text` for words, left to right.
///
/// With `Some(limit)` scanning stops after `limit` matches. An unlimited scan
/// always returns a superset of a limited one, in the same order.
///
/// # Example
/// ```
/// use wordswap_buffer::{WordRule, scan};
///
/// let words = scan("cat, dog!", None, WordRule::Standard);
/// assert_eq!(words.len(), 2);
/// assert_eq!(words[1].extract("cat, dog!").unwrap(), "dog");
/// ```
pub fn scan(text: &str, limit: Option<usize>, rule: WordRule) -> Vec<WordIndex> {
    scan_from(text, 0, limit, rule)
}

/// Scans `text` starting at byte `offset`.
///
/// `offset` must sit on a word boundary, e.g. the end of the last word a
/// previous scan returned. Offsets past the end of `text` yield nothing.
pub fn scan_from(text: &str, offset: usize, limit: Option<usize>, rule: WordRule) -> Vec<WordIndex> {
    if offset > text.len() || !text.is_char_boundary(offset) {
        return Vec::new();
    }

    let matches = rule
        .regex()
        .find_iter(&text[offset..])
        .filter(|m| !m.is_empty())
        .map(|m| WordIndex::new(offset + m.start(), m.len()))
        // Offsets come from a live `&str`, so they cannot overflow.
        .filter_map(Result::ok);

    match limit {
        Some(limit) => matches.take(limit).collect(),
        None => matches.collect(),
    }
}
