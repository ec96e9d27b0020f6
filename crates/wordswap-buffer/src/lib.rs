//! # Wordswap Buffer
//!
//! Line buffers that know where their words are.
//!
//! ## Key Concepts for Learning Rust
//!
//! ### Ownership & Borrowing
//! - `LineBuffer` owns its text and its word records
//! - Queries that may scan take `&mut self`, because scanning fills a cache
//! - `word()` returns a `&str` borrowed from the line, no copy is made
//!
//! ### Memory Safety
//! - Word records store byte offsets, and every slice goes through
//!   `str::get`, so a stale offset becomes an error instead of a panic
//! - Offset arithmetic is checked; overflow is reported, never wrapped

mod line;
mod scanner;
mod word;

pub use line::LineBuffer;
pub use scanner::{WordRule, scan, scan_from};
pub use word::WordIndex;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("Word {index} is out of range (line has {count} words)")]
    WordOutOfRange { index: usize, count: usize },

    #[error("Word span {start}..{end} does not fit a line of {len} bytes")]
    SpanOutOfRange { start: usize, end: usize, len: usize },

    #[error("Moving offset {start} by {delta} overflows")]
    OffsetOverflow { start: usize, delta: isize },

    #[error("Line contains a line break at byte {offset}")]
    EmbeddedNewline { offset: usize },
}

impl BufferError {
    /// True for errors caused by a caller-supplied index.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, BufferError::WordOutOfRange { .. })
    }
}
