//! Position records for single words.
//!
//! ## Learning: Checked Arithmetic
//!
//! `usize + usize` panics on overflow in debug builds and wraps in release
//! builds. `checked_add` and `checked_add_signed` return `None` instead, which
//! we turn into a proper error with `ok_or`.

use std::fmt;

use crate::{BufferError, BufferResult};

/// Locates one word inside its owning line's text.
///
/// Offsets are byte offsets into the UTF-8 text, so a `WordIndex` can slice
/// the text directly. The record is owned by exactly one [`LineBuffer`];
/// nothing outside the buffer holds on to it.
///
/// [`LineBuffer`]: crate::LineBuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WordIndex {
    start: usize,
    len: usize,
}

impl WordIndex {
    /// Creates a record, failing if `start + len` does not fit in a `usize`.
    pub fn new(start: usize, len: usize) -> BufferResult<Self> {
        start
            .checked_add(len)
            .ok_or(BufferError::OffsetOverflow { start, delta: len as isize })?;
        Ok(Self { start, len })
    }

    /// Byte offset of the first byte of the word.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Length of the word in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Byte offset just past the last byte of the word.
    #[inline]
    pub fn end(&self) -> usize {
        // Checked at construction and on every mutation.
        self.start + self.len
    }

    /// Scanned words are never empty, but a default-constructed one is.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Moves the word by `delta` bytes.
    pub fn shift(&mut self, delta: isize) -> BufferResult<()> {
        let overflow = || BufferError::OffsetOverflow {
            start: self.start,
            delta,
        };
        let start = self.start.checked_add_signed(delta).ok_or_else(overflow)?;
        start.checked_add(self.len).ok_or_else(overflow)?;
        self.start = start;
        Ok(())
    }

    /// Exchanges lengths with `other`. Start offsets stay where they are.
    pub fn swap_lengths(&mut self, other: &mut WordIndex) -> BufferResult<()> {
        self.start
            .checked_add(other.len)
            .ok_or(BufferError::OffsetOverflow {
                start: self.start,
                delta: other.len as isize,
            })?;
        other
            .start
            .checked_add(self.len)
            .ok_or(BufferError::OffsetOverflow {
                start: other.start,
                delta: self.len as isize,
            })?;
        std::mem::swap(&mut self.len, &mut other.len);
        Ok(())
    }

    /// Slices the word out of `text`.
    ///
    /// Fails if the span runs past the end of `text` or does not fall on
    /// character boundaries.
    pub fn extract<'a>(&self, text: &'a str) -> BufferResult<&'a str> {
        text.get(self.start..self.end())
            .ok_or(BufferError::SpanOutOfRange {
                start: self.start,
                end: self.end(),
                len: text.len(),
            })
    }
}

impl fmt::Display for WordIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ start: {}; len: {} }}", self.start, self.len)
    }
}
