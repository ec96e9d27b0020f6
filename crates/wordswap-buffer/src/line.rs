//! A single line of text with a lazily built word index.
//!
//! ## Why Lazy?
//!
//! Most queries only look at the first few words of a line ("does it have a
//! word?", "is word 2 there?"). Scanning the entire line for every query would
//! waste work on long lines, so the buffer keeps a cache of the words found so
//! far and extends it only as far as a query needs.
//!
//! The cache follows two rules:
//! - **Extension appends.** New entries are always found after the last cached
//!   word, so the cache stays a prefix of the full word list.
//! - **Mutation shifts.** A swap rewrites the text, then fixes the offsets of
//!   the cached words it moved in a separate pass.
//!
//! ## Learning: Borrowing Two Lines at Once
//!
//! [`LineBuffer::swap_words_cross_line`] takes `&mut self` and
//! `other: &mut LineBuffer`. The borrow checker guarantees the two are
//! distinct objects, so there is no need for an identity check at runtime.

use crate::scanner::{WordRule, scan_from};
use crate::{BufferError, BufferResult, WordIndex};

/// One line of a document plus the words located in it so far.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    /// The line's text, without a line terminator
    text: String,

    /// Words found so far, left to right
    words: Vec<WordIndex>,

    /// Whether `words` holds every word of `text`
    fully_scanned: bool,

    /// Tokenization rule for this line
    rule: WordRule,
}

impl LineBuffer {
    /// Creates an empty line using the default word rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty line that will scan with `rule`.
    pub fn empty(rule: WordRule) -> Self {
        Self {
            rule,
            ..Self::default()
        }
    }

    /// Creates a line from text. Nothing is scanned yet.
    ///
    /// # Errors
    /// Returns [`BufferError::EmbeddedNewline`] if `text` contains `'\n'`.
    pub fn with_rule(text: impl Into<String>, rule: WordRule) -> BufferResult<Self> {
        let text = text.into();
        if let Some(offset) = text.find('\n') {
            return Err(BufferError::EmbeddedNewline { offset });
        }
        Ok(Self {
            text,
            words: Vec::new(),
            fully_scanned: false,
            rule,
        })
    }

    // ==================== Accessors ====================

    /// Returns the line's text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the word rule this line scans with.
    #[inline]
    pub fn rule(&self) -> WordRule {
        self.rule
    }

    /// True if the line has no text at all.
    ///
    /// This is not the same as having no words: `" ,. "` is not empty but has
    /// no words. Use [`has_words`](Self::has_words) for that.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True once every word of the line has been located.
    #[inline]
    pub fn is_fully_scanned(&self) -> bool {
        self.fully_scanned
    }

    /// Words located so far, without scanning further.
    #[inline]
    pub fn cached_words(&self) -> &[WordIndex] {
        &self.words
    }

    // ==================== Word Queries ====================

    /// Returns the number of words, scanning the whole line if needed.
    pub fn word_count(&mut self) -> usize {
        self.extend_cache(None);
        self.words.len()
    }

    /// Returns the number of words, scanning no further than `k` words.
    ///
    /// The result is `min(k, word_count())` unless more than `k` words were
    /// already cached, in which case the cached count is returned.
    pub fn word_count_at_least(&mut self, k: usize) -> usize {
        self.extend_cache(Some(k));
        self.words.len()
    }

    /// True if word `index` exists.
    pub fn is_word_in_bounds(&mut self, index: usize) -> bool {
        match index.checked_add(1) {
            Some(needed) => {
                self.extend_cache(Some(needed));
                index < self.words.len()
            }
            None => false,
        }
    }

    /// True if the line has at least one word.
    pub fn has_words(&mut self) -> bool {
        self.is_word_in_bounds(0)
    }

    /// Returns word `index`.
    ///
    /// # Errors
    /// Returns [`BufferError::WordOutOfRange`] if the line has no such word.
    pub fn word(&mut self, index: usize) -> BufferResult<&str> {
        let word = self.locate(index)?;
        word.extract(&self.text)
    }

    /// Returns every word of the line, scanning it fully.
    ///
    /// # Errors
    /// Returns [`BufferError::SpanOutOfRange`] if a cached offset no longer
    /// fits the text.
    pub fn words(&mut self) -> BufferResult<Vec<&str>> {
        self.extend_cache(None);
        let text = self.text.as_str();
        self.words.iter().map(|w| w.extract(text)).collect()
    }

    // ==================== Swaps ====================

    /// Swaps words `i` and `j` of this line.
    ///
    /// Words outside the span between the two keep their offsets, since the
    /// span's total length does not change. Words inside it move by the
    /// difference of the two lengths.
    ///
    /// # Errors
    /// Returns [`BufferError::WordOutOfRange`] if either index is missing.
    pub fn swap_words_same_line(&mut self, i: usize, j: usize) -> BufferResult<()> {
        if i == j {
            return Ok(());
        }
        let (lo, hi) = (i.min(j), i.max(j));

        let left = self.locate(lo)?;
        let right = self.locate(hi)?;

        let mut text = String::with_capacity(self.text.len());
        text.push_str(&self.text[..left.start()]);
        text.push_str(right.extract(&self.text)?);
        text.push_str(&self.text[left.end()..right.start()]);
        text.push_str(left.extract(&self.text)?);
        text.push_str(&self.text[right.end()..]);
        self.text = text;

        let delta = length_delta(right, left);

        // Only the right word and the words between the two move.
        self.words[hi].shift(delta)?;
        let (head, tail) = self.words.split_at_mut(hi);
        head[lo].swap_lengths(&mut tail[0])?;
        self.shift_words_between(lo, hi, delta)?;

        Ok(())
    }

    /// Swaps word `own` of this line with word `theirs` of `other`.
    ///
    /// Both lines may change length. Words after the swapped one in each line
    /// shift by the length difference; words before it stay put. The two
    /// swapped records keep their start offsets and exchange lengths.
    ///
    /// # Errors
    /// Returns [`BufferError::WordOutOfRange`] if either index is missing.
    /// Neither line is modified in that case.
    pub fn swap_words_cross_line(
        &mut self,
        other: &mut LineBuffer,
        own: usize,
        theirs: usize,
    ) -> BufferResult<()> {
        let own_word = self.locate(own)?;
        let their_word = other.locate(theirs)?;

        let delta = length_delta(their_word, own_word);
        let own_text = own_word.extract(&self.text)?.to_owned();
        let their_text = their_word.extract(&other.text)?.to_owned();

        if delta == 0 && own_text == their_text {
            return Ok(());
        }

        self.splice(own_word, &their_text);
        self.shift_words_after(own, delta)?;

        other.splice(their_word, &own_text);
        other.shift_words_after(theirs, -delta)?;

        let (a, b) = (&mut self.words[own], &mut other.words[theirs]);
        a.swap_lengths(b)
    }

    // ==================== Cache Maintenance ====================

    /// Returns the record for word `index`, extending the cache if needed.
    fn locate(&mut self, index: usize) -> BufferResult<WordIndex> {
        if !self.is_word_in_bounds(index) {
            return Err(BufferError::WordOutOfRange {
                index,
                count: self.words.len(),
            });
        }
        Ok(self.words[index])
    }

    /// Appends newly found words until the cache holds `upto` of them, or all
    /// of them for `None`.
    fn extend_cache(&mut self, upto: Option<usize>) {
        if self.fully_scanned {
            return;
        }
        let have = self.words.len();
        let wanted = match upto {
            Some(upto) if upto <= have => return,
            Some(upto) => Some(upto - have),
            None => None,
        };

        let resume_at = self.words.last().map_or(0, WordIndex::end);
        let found = scan_from(&self.text, resume_at, wanted, self.rule);

        if wanted.is_none_or(|wanted| found.len() < wanted) {
            self.fully_scanned = true;
        }
        self.words.extend(found);
    }

    /// Shifts every cached word after `index` by `delta`.
    fn shift_words_after(&mut self, index: usize, delta: isize) -> BufferResult<()> {
        if delta == 0 {
            return Ok(());
        }
        for word in self.words.iter_mut().skip(index + 1) {
            word.shift(delta)?;
        }
        Ok(())
    }

    /// Shifts every cached word strictly between `lo` and `hi` by `delta`.
    fn shift_words_between(&mut self, lo: usize, hi: usize, delta: isize) -> BufferResult<()> {
        if delta == 0 {
            return Ok(());
        }
        for word in &mut self.words[lo + 1..hi] {
            word.shift(delta)?;
        }
        Ok(())
    }

    /// Replaces the text covered by `word` with `replacement`.
    fn splice(&mut self, word: WordIndex, replacement: &str) {
        self.text
            .replace_range(word.start()..word.end(), replacement);
    }
}

/// `a.len() - b.len()` as a signed byte count.
#[inline]
fn length_delta(a: WordIndex, b: WordIndex) -> isize {
    // String lengths never exceed isize::MAX.
    a.len() as isize - b.len() as isize
}

impl std::fmt::Display for LineBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl TryFrom<&str> for LineBuffer {
    type Error = BufferError;

    fn try_from(text: &str) -> BufferResult<Self> {
        Self::with_rule(text, WordRule::default())
    }
}

impl TryFrom<String> for LineBuffer {
    type Error = BufferError;

    fn try_from(text: String) -> BufferResult<Self> {
        Self::with_rule(text, WordRule::default())
    }
}
