//! Reading and writing documents as lines.
//!
//! ## Learning: Traits at the Edge
//!
//! `Document` never touches the filesystem directly. It talks to a
//! `LineStore`, so tests can swap in an in-memory store and embedders can
//! plug in their own storage.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::{CoreError, CoreResult};

/// Loads and saves a document as an ordered list of lines.
pub trait LineStore: std::fmt::Debug {
    /// Reads `path` and splits it into lines.
    ///
    /// # Errors
    /// [`CoreError::NotFound`], [`CoreError::Denied`] or [`CoreError::Read`].
    fn read_all_lines(&self, path: &Path) -> CoreResult<Vec<String>>;

    /// Writes `lines` to `path`, separated by `\n`, replacing its content.
    ///
    /// # Errors
    /// [`CoreError::Denied`] or [`CoreError::Write`].
    fn write_all(&self, path: &Path, lines: &[&str]) -> CoreResult<()>;

    /// Checks that `path` exists and may be written, before any editing.
    ///
    /// # Errors
    /// [`CoreError::NotFound`], [`CoreError::Denied`] or [`CoreError::Read`].
    fn check_editable(&self, path: &Path) -> CoreResult<()>;
}

/// Splits file content into lines.
///
/// Both `\n` and `\r\n` end a line. A final fragment without a terminator is
/// still a line, and empty content has no lines at all. A trailing terminator
/// produces a final empty line, so [`join_lines`] gives back the input
/// (modulo `\r`).
pub fn split_lines(content: &str) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_owned())
        .collect()
}

/// Joins lines with `\n`, without a trailing separator.
pub fn join_lines(lines: &[&str]) -> String {
    lines.join("\n")
}

/// Store backed by the local filesystem.
#[derive(Debug, Clone, Copy)]
pub struct FsStore {
    /// Write to a temporary sibling file and rename it over the target
    pub atomic_write: bool,
}

impl Default for FsStore {
    fn default() -> Self {
        Self { atomic_write: true }
    }
}

impl FsStore {
    /// Creates a store with atomic writes enabled.
    pub fn new() -> Self {
        Self::default()
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".wordswap.tmp");
        path.with_file_name(name)
    }
}

impl LineStore for FsStore {
    fn read_all_lines(&self, path: &Path) -> CoreResult<Vec<String>> {
        let bytes = std::fs::read(path).map_err(|e| read_error(path, e))?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(
                    "{} is not valid UTF-8, replacing invalid sequences",
                    path.display()
                );
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        Ok(split_lines(&content))
    }

    fn write_all(&self, path: &Path, lines: &[&str]) -> CoreResult<()> {
        let content = join_lines(lines);

        if !self.atomic_write {
            return std::fs::write(path, content).map_err(|e| write_error(path, e));
        }

        // Write to a temporary file first, then rename (atomic write)
        let temp_path = Self::temp_path(path);
        std::fs::write(&temp_path, content).map_err(|e| write_error(path, e))?;
        std::fs::rename(&temp_path, path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            write_error(path, e)
        })
    }

    fn check_editable(&self, path: &Path) -> CoreResult<()> {
        let metadata = std::fs::metadata(path).map_err(|e| read_error(path, e))?;
        if !metadata.is_file() {
            return Err(CoreError::Read {
                path: path.to_path_buf(),
                source: io::Error::other("not a regular file"),
            });
        }
        if metadata.permissions().readonly() {
            return Err(CoreError::Denied(path.to_path_buf()));
        }
        Ok(())
    }
}

fn read_error(path: &Path, source: io::Error) -> CoreError {
    match source.kind() {
        io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => CoreError::Denied(path.to_path_buf()),
        _ => CoreError::Read {
            path: path.to_path_buf(),
            source,
        },
    }
}

fn write_error(path: &Path, source: io::Error) -> CoreError {
    match source.kind() {
        io::ErrorKind::PermissionDenied => CoreError::Denied(path.to_path_buf()),
        _ => CoreError::Write {
            path: path.to_path_buf(),
            source,
        },
    }
}

/// Store that keeps files in memory.
///
/// Clones share the same files, so a test can keep one handle and give the
/// other to a `Document`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: Rc<RefCell<HashMap<PathBuf, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.borrow_mut().insert(path.into(), content.into());
    }

    /// Returns the current content of a file.
    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }
}

impl LineStore for MemoryStore {
    fn read_all_lines(&self, path: &Path) -> CoreResult<Vec<String>> {
        self.files
            .borrow()
            .get(path)
            .map(|content| split_lines(content))
            .ok_or_else(|| CoreError::NotFound(path.to_path_buf()))
    }

    fn write_all(&self, path: &Path, lines: &[&str]) -> CoreResult<()> {
        self.insert(path, join_lines(lines));
        Ok(())
    }

    fn check_editable(&self, path: &Path) -> CoreResult<()> {
        if self.files.borrow().contains_key(path) {
            Ok(())
        } else {
            Err(CoreError::NotFound(path.to_path_buf()))
        }
    }
}
