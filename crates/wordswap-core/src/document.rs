//! Documents: ordered lines bound to a file.
//!
//! ## Learning: State as an Enum
//!
//! A committed document must refuse every further operation. Instead of an
//! `Option<Vec<_>>` that callers could forget to check, the lines live inside
//! `DocumentState::Open`. The only way to reach them is through
//! `lines()`/`lines_mut()`, which return `CoreError::Closed` once the
//! document is committed.
//!
//! ## Learning: `split_at_mut`
//!
//! A cross-line word swap needs `&mut` access to two elements of the same
//! `Vec`. Indexing twice would borrow the vector mutably twice, which the
//! compiler rejects. `split_at_mut` splits one mutable borrow into two
//! non-overlapping ones.

use std::path::{Path, PathBuf};

use wordswap_buffer::{LineBuffer, WordRule};

use crate::store::{FsStore, LineStore};
use crate::{CoreError, CoreResult};

/// Lifecycle of a document.
#[derive(Debug)]
pub enum DocumentState {
    /// Loaded and editable
    Open(Vec<LineBuffer>),
    /// Written back; no further operations allowed
    Closed,
}

/// A file loaded as word-indexed lines.
#[derive(Debug)]
pub struct Document {
    /// File the document was loaded from and commits to
    path: PathBuf,

    /// Lines, or the closed marker after commit
    state: DocumentState,

    /// Where commit writes to
    store: Box<dyn LineStore>,

    /// Word rule for new and loaded lines
    rule: WordRule,
}

impl Document {
    /// Opens a file from disk with the default word rule.
    ///
    /// # Errors
    /// [`CoreError::NotFound`], [`CoreError::Denied`] or [`CoreError::Read`].
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        Self::open_with(path, WordRule::default(), Box::new(FsStore::default()))
    }

    /// Opens a document through `store`, scanning words with `rule`.
    pub fn open_with(
        path: impl AsRef<Path>,
        rule: WordRule,
        store: Box<dyn LineStore>,
    ) -> CoreResult<Self> {
        let path = path.as_ref();
        let lines = store.read_all_lines(path)?;
        tracing::info!("Opened {} ({} lines)", path.display(), lines.len());
        Self::from_lines(path, lines, rule, store)
    }

    /// Builds an open document from lines already in memory.
    ///
    /// # Errors
    /// Fails with [`CoreError::Buffer`] if a line contains `'\n'`.
    pub fn from_lines<I, S>(
        path: impl Into<PathBuf>,
        lines: I,
        rule: WordRule,
        store: Box<dyn LineStore>,
    ) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines
            .into_iter()
            .map(|line| LineBuffer::with_rule(line, rule))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            path: path.into(),
            state: DocumentState::Open(lines),
            store,
            rule,
        })
    }

    // ==================== Getters ====================

    /// Returns the file path. Available after commit too.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the word rule lines are scanned with.
    pub fn rule(&self) -> WordRule {
        self.rule
    }

    /// True once the document has been committed.
    pub fn is_closed(&self) -> bool {
        matches!(self.state, DocumentState::Closed)
    }

    fn lines(&self) -> CoreResult<&Vec<LineBuffer>> {
        match &self.state {
            DocumentState::Open(lines) => Ok(lines),
            DocumentState::Closed => Err(CoreError::Closed),
        }
    }

    fn lines_mut(&mut self) -> CoreResult<&mut Vec<LineBuffer>> {
        match &mut self.state {
            DocumentState::Open(lines) => Ok(lines),
            DocumentState::Closed => Err(CoreError::Closed),
        }
    }

    fn line_mut(&mut self, index: usize) -> CoreResult<&mut LineBuffer> {
        let lines = self.lines_mut()?;
        let count = lines.len();
        lines
            .get_mut(index)
            .ok_or(CoreError::LineOutOfRange { index, count })
    }

    // ==================== Line Queries ====================

    /// Returns the number of lines.
    pub fn line_count(&self) -> CoreResult<usize> {
        Ok(self.lines()?.len())
    }

    /// True if the document has no lines.
    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.lines()?.is_empty())
    }

    /// True if `index` addresses an existing line.
    pub fn is_line_in_bounds(&self, index: usize) -> CoreResult<bool> {
        Ok(index < self.lines()?.len())
    }

    /// Returns the text of line `index`.
    pub fn line(&self, index: usize) -> CoreResult<&str> {
        let lines = self.lines()?;
        lines
            .get(index)
            .map(LineBuffer::text)
            .ok_or(CoreError::LineOutOfRange {
                index,
                count: lines.len(),
            })
    }

    /// True if the last line has no text. False for a document without lines.
    pub fn is_last_line_empty(&self) -> CoreResult<bool> {
        Ok(self.lines()?.last().is_some_and(LineBuffer::is_empty))
    }

    // ==================== Word Queries ====================

    /// Returns word `word` of line `line`.
    pub fn word(&mut self, line: usize, word: usize) -> CoreResult<&str> {
        Ok(self.line_mut(line)?.word(word)?)
    }

    /// Returns the number of words on line `line`.
    pub fn word_count(&mut self, line: usize) -> CoreResult<usize> {
        Ok(self.line_mut(line)?.word_count())
    }

    /// Counts words on line `line`, scanning no further than `k` of them.
    pub fn word_count_at_least(&mut self, line: usize, k: usize) -> CoreResult<usize> {
        Ok(self.line_mut(line)?.word_count_at_least(k))
    }

    /// True if word `word` exists on line `line`.
    pub fn is_word_in_bounds(&mut self, line: usize, word: usize) -> CoreResult<bool> {
        Ok(self.line_mut(line)?.is_word_in_bounds(word))
    }

    /// True if line `line` has at least one word.
    pub fn line_has_words(&mut self, line: usize) -> CoreResult<bool> {
        Ok(self.line_mut(line)?.has_words())
    }

    /// True if the whole document holds at least two words.
    ///
    /// Each line is scanned only as far as needed to reach the total.
    pub fn has_words_to_swap(&mut self) -> CoreResult<bool> {
        let mut found = 0;
        for line in self.lines_mut()? {
            found += line.word_count_at_least(2 - found);
            if found >= 2 {
                return Ok(true);
            }
        }
        Ok(false)
    }

    // ==================== Mutations ====================

    /// Exchanges lines `i` and `j`.
    ///
    /// Identical indices are a no-op and are not bounds checked.
    pub fn swap_lines(&mut self, i: usize, j: usize) -> CoreResult<()> {
        let lines = self.lines_mut()?;
        if i == j {
            return Ok(());
        }
        let count = lines.len();
        for index in [i, j] {
            if index >= count {
                return Err(CoreError::LineOutOfRange { index, count });
            }
        }
        lines.swap(i, j);
        tracing::debug!("Swapped lines {} and {}", i, j);
        Ok(())
    }

    /// Swaps word `wi` of line `i` with word `wj` of line `j`.
    ///
    /// On the same line this is an in-line swap; across lines both lines are
    /// rewritten and may change length.
    pub fn swap_words(&mut self, i: usize, wi: usize, j: usize, wj: usize) -> CoreResult<()> {
        if i == j {
            self.line_mut(i)?.swap_words_same_line(wi, wj)?;
        } else {
            let (first, second) = pair_mut(self.lines_mut()?, i, j)?;
            first.swap_words_cross_line(second, wi, wj)?;
        }
        tracing::debug!("Swapped word {}:{} with {}:{}", i, wi, j, wj);
        Ok(())
    }

    /// Appends an empty line.
    pub fn add_empty_line(&mut self) -> CoreResult<()> {
        let rule = self.rule;
        self.lines_mut()?.push(LineBuffer::empty(rule));
        Ok(())
    }

    /// Removes the last line, whatever its content.
    ///
    /// # Errors
    /// [`CoreError::Empty`] if there are no lines.
    pub fn remove_last_line(&mut self) -> CoreResult<()> {
        self.lines_mut()?.pop().map(|_| ()).ok_or(CoreError::Empty)
    }

    // ==================== Output ====================

    /// Renders the lines for display as `"{n} || {text}"` rows, 1-based.
    pub fn render(&self) -> CoreResult<String> {
        let rows: Vec<String> = self
            .lines()?
            .iter()
            .enumerate()
            .map(|(i, line)| format!("{} || {}", i + 1, line.text()))
            .collect();
        Ok(rows.join("\n"))
    }

    /// Writes the lines back to the file and closes the document.
    ///
    /// Committing a closed document does nothing. If the write fails the
    /// document stays open, so the caller may retry.
    pub fn commit(&mut self) -> CoreResult<()> {
        let DocumentState::Open(lines) = &self.state else {
            return Ok(());
        };

        let texts: Vec<&str> = lines.iter().map(LineBuffer::text).collect();
        self.store.write_all(&self.path, &texts)?;

        tracing::info!("Committed {} ({} lines)", self.path.display(), texts.len());
        self.state = DocumentState::Closed;
        Ok(())
    }

    /// Commits this document and continues with the file at `path`.
    ///
    /// The next file is checked and loaded before anything is written, so if
    /// it cannot be opened the current document stays open and unchanged.
    ///
    /// # Errors
    /// [`CoreError::Closed`], the store's open errors for `path`, or the
    /// commit's write errors.
    pub fn switch_to(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        self.lines()?;
        let path = path.as_ref();
        self.store.check_editable(path)?;

        let rule = self.rule;
        let next = self
            .store
            .read_all_lines(path)?
            .into_iter()
            .map(|line| LineBuffer::with_rule(line, rule))
            .collect::<Result<Vec<_>, _>>()?;

        self.commit()?;
        tracing::info!(
            "Switched from {} to {} ({} lines)",
            self.path.display(),
            path.display(),
            next.len()
        );
        self.path = path.to_path_buf();
        self.state = DocumentState::Open(next);
        Ok(())
    }
}

/// Borrows two distinct lines mutably.
fn pair_mut(
    lines: &mut [LineBuffer],
    i: usize,
    j: usize,
) -> CoreResult<(&mut LineBuffer, &mut LineBuffer)> {
    let count = lines.len();
    for index in [i, j] {
        if index >= count {
            return Err(CoreError::LineOutOfRange { index, count });
        }
    }

    if i < j {
        let (head, tail) = lines.split_at_mut(j);
        Ok((&mut head[i], &mut tail[0]))
    } else {
        let (head, tail) = lines.split_at_mut(i);
        Ok((&mut tail[0], &mut head[j]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const PATH: &str = "doc.txt";

    fn open_doc(content: &str) -> (Document, MemoryStore) {
        doc_with_rule(content, WordRule::Standard)
    }

    fn doc_with_rule(content: &str, rule: WordRule) -> (Document, MemoryStore) {
        let store = MemoryStore::new();
        store.insert(PATH, content);
        let doc = Document::open_with(PATH, rule, Box::new(store.clone())).unwrap();
        (doc, store)
    }

    fn texts(doc: &Document) -> Vec<String> {
        (0..doc.line_count().unwrap())
            .map(|i| doc.line(i).unwrap().to_owned())
            .collect()
    }

    #[test]
    fn test_open_splits_lines() {
        let (doc, _) = open_doc("cat dog\r\nfish bird");
        assert_eq!(texts(&doc), vec!["cat dog", "fish bird"]);
        assert_eq!(doc.path(), Path::new(PATH));
    }

    #[test]
    fn test_open_empty_file() {
        let (doc, _) = open_doc("");
        assert!(doc.is_empty().unwrap());
        assert_eq!(doc.line_count().unwrap(), 0);
        assert!(!doc.is_last_line_empty().unwrap());
    }

    #[test]
    fn test_open_missing_file() {
        let err = Document::open_with("nope.txt", WordRule::Standard, Box::new(MemoryStore::new()))
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn test_cross_line_word_swap_scenario() {
        let (mut doc, _) = open_doc("cat dog\nfish bird");
        doc.swap_words(0, 0, 1, 1).unwrap();
        assert_eq!(texts(&doc), vec!["bird dog", "fish cat"]);
    }

    #[test]
    fn test_cross_line_swap_reversed_indices() {
        let (mut doc, _) = open_doc("cat dog\nfish bird");
        doc.swap_words(1, 0, 0, 1).unwrap();
        assert_eq!(texts(&doc), vec!["cat fish", "dog bird"]);
    }

    #[test]
    fn test_same_line_word_swap() {
        let (mut doc, _) = open_doc("one two three");
        doc.swap_words(0, 2, 0, 0).unwrap();
        assert_eq!(doc.line(0).unwrap(), "three two one");
        assert_eq!(doc.word(0, 1).unwrap(), "two");
    }

    #[test]
    fn test_word_swap_out_of_range() {
        let (mut doc, _) = open_doc("a b\nc");
        assert!(doc.swap_words(0, 0, 1, 1).unwrap_err().is_out_of_range());
        assert!(doc.swap_words(0, 0, 2, 0).unwrap_err().is_out_of_range());
        assert!(doc.swap_words(0, 0, 0, 5).unwrap_err().is_out_of_range());
        assert_eq!(texts(&doc), vec!["a b", "c"]);
    }

    #[test]
    fn test_swap_lines() {
        let (mut doc, _) = open_doc("1\n2\n3");
        doc.swap_lines(0, 2).unwrap();
        assert_eq!(texts(&doc), vec!["3", "2", "1"]);
        doc.swap_lines(0, 2).unwrap();
        assert_eq!(texts(&doc), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_swap_lines_single_line() {
        let (mut doc, _) = open_doc("only");
        doc.swap_lines(0, 0).unwrap();
        assert_eq!(texts(&doc), vec!["only"]);
        assert!(!doc.is_line_in_bounds(1).unwrap());
        assert!(matches!(
            doc.swap_lines(0, 1),
            Err(CoreError::LineOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn test_swapped_lines_keep_their_word_cache() {
        let (mut doc, _) = open_doc("alpha beta\ngamma");
        assert_eq!(doc.word_count(0).unwrap(), 2);
        doc.swap_lines(0, 1).unwrap();
        assert_eq!(doc.word(1, 1).unwrap(), "beta");
        assert_eq!(doc.word_count(0).unwrap(), 1);
    }

    #[test]
    fn test_numbers_are_words() {
        let (mut doc, _) = open_doc("1 2 3");
        assert_eq!(doc.word_count(0).unwrap(), 3);
        assert_eq!(doc.word(0, 0).unwrap(), "1");
        assert_eq!(doc.word(0, 2).unwrap(), "3");

        let (mut strict, _) = doc_with_rule("1 2 3", WordRule::StrictDigits);
        assert_eq!(strict.word_count(0).unwrap(), 0);
    }

    #[test]
    fn test_add_and_remove_lines() {
        let (mut doc, _) = open_doc("text");
        doc.add_empty_line().unwrap();
        assert_eq!(doc.line_count().unwrap(), 2);
        assert!(doc.is_last_line_empty().unwrap());
        assert!(!doc.line_has_words(1).unwrap());
        doc.remove_last_line().unwrap();
        assert_eq!(doc.line_count().unwrap(), 1);
        assert!(!doc.is_last_line_empty().unwrap());

        // Removal does not require the line to be empty.
        doc.remove_last_line().unwrap();
        assert!(matches!(doc.remove_last_line(), Err(CoreError::Empty)));
    }

    #[test]
    fn test_has_words_to_swap() {
        let (mut doc, _) = open_doc("one\n\n, .\ntwo three");
        assert!(doc.has_words_to_swap().unwrap());

        let (mut doc, _) = open_doc("one\n...");
        assert!(!doc.has_words_to_swap().unwrap());
    }

    #[test]
    fn test_render() {
        let (doc, _) = open_doc("cat dog\n\nfish");
        assert_eq!(doc.render().unwrap(), "1 || cat dog\n2 || \n3 || fish");

        let (empty, _) = open_doc("");
        assert_eq!(empty.render().unwrap(), "");
    }

    #[test]
    fn test_commit_writes_and_closes() {
        let (mut doc, store) = open_doc("cat dog\r\nfish bird\n");
        doc.swap_words(0, 0, 1, 1).unwrap();
        doc.commit().unwrap();

        assert_eq!(store.content(PATH).as_deref(), Some("bird dog\nfish cat\n"));
        assert!(doc.is_closed());
        assert_eq!(doc.path(), Path::new(PATH));

        // Idempotent.
        store.insert(PATH, "changed elsewhere");
        doc.commit().unwrap();
        assert_eq!(store.content(PATH).as_deref(), Some("changed elsewhere"));
    }

    #[test]
    fn test_operations_after_commit_fail() {
        let (mut doc, _) = open_doc("a b\nc d");
        doc.commit().unwrap();

        assert!(matches!(doc.line_count(), Err(CoreError::Closed)));
        assert!(matches!(doc.is_empty(), Err(CoreError::Closed)));
        assert!(matches!(doc.is_line_in_bounds(0), Err(CoreError::Closed)));
        assert!(matches!(doc.swap_lines(0, 0), Err(CoreError::Closed)));
        assert!(matches!(doc.swap_lines(0, 1), Err(CoreError::Closed)));
        assert!(matches!(doc.swap_words(0, 0, 1, 0), Err(CoreError::Closed)));
        assert!(matches!(doc.add_empty_line(), Err(CoreError::Closed)));
        assert!(matches!(doc.remove_last_line(), Err(CoreError::Closed)));
        assert!(matches!(doc.is_last_line_empty(), Err(CoreError::Closed)));
        assert!(matches!(doc.render(), Err(CoreError::Closed)));
        assert!(matches!(doc.word(0, 0), Err(CoreError::Closed)));
        assert!(matches!(doc.word_count(0), Err(CoreError::Closed)));
        assert!(matches!(doc.has_words_to_swap(), Err(CoreError::Closed)));
    }

    #[test]
    fn test_commit_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "cat dog\nfish bird").unwrap();

        let mut doc = Document::open(&path).unwrap();
        doc.swap_lines(0, 1).unwrap();
        doc.add_empty_line().unwrap();
        doc.commit().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fish bird\ncat dog\n");
    }

    #[test]
    fn test_failed_commit_leaves_document_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone").join("notes.txt");
        let store = FsStore { atomic_write: false };
        let mut doc =
            Document::from_lines(&path, ["a", "b"], WordRule::Standard, Box::new(store)).unwrap();

        assert!(matches!(doc.commit(), Err(CoreError::Write { .. })));
        assert!(!doc.is_closed());
        assert_eq!(doc.line_count().unwrap(), 2);
    }

    #[test]
    fn test_from_lines_rejects_newlines() {
        let err = Document::from_lines(
            PATH,
            ["ok", "bad\nline"],
            WordRule::Standard,
            Box::new(MemoryStore::new()),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Buffer(_)));
    }

    #[test]
    fn test_switch_to_commits_and_opens_next() {
        let (mut doc, store) = doc_with_rule("cat dog", WordRule::StrictDigits);
        store.insert("next.txt", "fish 42 bird");
        doc.swap_words(0, 0, 0, 1).unwrap();

        doc.switch_to("next.txt").unwrap();
        assert_eq!(store.content(PATH).as_deref(), Some("dog cat"));
        assert!(!doc.is_closed());
        assert_eq!(doc.path(), Path::new("next.txt"));
        assert_eq!(doc.rule(), WordRule::StrictDigits);
        assert_eq!(doc.word_count(0).unwrap(), 2);

        doc.swap_words(0, 0, 0, 1).unwrap();
        doc.commit().unwrap();
        assert_eq!(store.content("next.txt").as_deref(), Some("bird 42 fish"));
    }

    #[test]
    fn test_switch_to_missing_file_keeps_document() {
        let (mut doc, store) = open_doc("cat dog");
        doc.swap_words(0, 0, 0, 1).unwrap();

        assert!(matches!(doc.switch_to("missing.txt"), Err(CoreError::NotFound(_))));
        assert!(!doc.is_closed());
        assert_eq!(doc.path(), Path::new(PATH));
        assert_eq!(doc.line(0).unwrap(), "dog cat");
        assert_eq!(store.content(PATH).as_deref(), Some("cat dog"));
    }

    #[test]
    fn test_switch_to_after_commit_fails() {
        let (mut doc, store) = open_doc("a");
        store.insert("next.txt", "b");
        doc.commit().unwrap();
        assert!(matches!(doc.switch_to("next.txt"), Err(CoreError::Closed)));
    }
}
