//! # Wordswap Core
//!
//! Documents made of word-indexed lines, and the commands that edit them.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │            Front-end (CLI / shell)               │
//! │                 │ Command                         │
//! │  ┌──────────────┴──────────────┐  ┌───────────┐  │
//! │  │          Document           │──│ LineStore │  │
//! │  │ ┌────────┐┌────────┐        │  └───────────┘  │
//! │  │ │ Line 1 ││ Line 2 │  ...   │                 │
//! │  │ └────────┘└────────┘        │                 │
//! │  └─────────────────────────────┘                 │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Learning: Module Organization
//!
//! Rust modules map to files:
//! - `mod foo;` looks for `foo.rs` or `foo/mod.rs`
//! - `pub use` re-exports items for cleaner public APIs

use std::path::PathBuf;

pub mod command;
pub mod config;
pub mod document;
pub mod store;

pub use command::{Command, Outcome};
pub use config::{Config, ConfigError};
pub use document::{Document, DocumentState};
pub use store::{FsStore, LineStore, MemoryStore};
pub use wordswap_buffer::{BufferError, LineBuffer, WordRule};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Access denied: {}", .0.display())]
    Denied(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Line {index} is out of range (document has {count} lines)")]
    LineOutOfRange { index: usize, count: usize },

    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error("Document already written and closed")]
    Closed,

    #[error("Document has no lines")]
    Empty,

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl CoreError {
    /// True if a line or word index was out of range. The caller can ask for
    /// another index and try again.
    pub fn is_out_of_range(&self) -> bool {
        match self {
            CoreError::LineOutOfRange { .. } => true,
            CoreError::Buffer(err) => err.is_out_of_range(),
            _ => false,
        }
    }

    /// True if the session cannot continue with this file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CoreError::Denied(_) | CoreError::Closed | CoreError::Write { .. }
        )
    }
}
