//! Commands a front-end can issue against a document.
//!
//! ## Learning: The Command Pattern
//!
//! Commands encapsulate actions as values:
//! - The shell parses text into a `Command`
//! - The CLI builds the same `Command` from its arguments
//! - Both run it through `Command::execute`, so validation lives in one place
//!
//! Numbers typed by users are 1-based; `Command` stores 0-based indices.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::document::Document;
use crate::{CoreError, CoreResult};

/// Built-in document commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Command {
    /// Print the document
    Show,
    /// Exchange two lines
    SwapLines { first: usize, second: usize },
    /// Exchange two words, on one line or across two
    SwapWords {
        first_line: usize,
        first_word: usize,
        second_line: usize,
        second_word: usize,
    },
    /// Append an empty line
    AddEmptyLine,
    /// Remove the last line; without `force` it must be empty
    RemoveLastLine { force: bool },
    /// Write the document back and close it
    Commit,
    /// Write the document back and continue with another file
    Open { path: PathBuf },
    /// Leave without writing
    Quit,
    /// List commands
    Help,
}

/// What happened when a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Rendered document text
    Rendered(String),
    /// The document changed
    Changed,
    /// The document was written and closed
    Committed,
    /// The document at the given path was written; editing goes on with
    /// another file
    Switched(PathBuf),
    /// The caller should stop without writing
    Exit,
    /// Usage text
    Help(&'static str),
}

/// Usage text for the interactive shell.
pub const HELP: &str = "\
show                               print the document
swap-lines <line> <line>           swap two lines
swap-words <line> <word> <line> <word>
                                   swap two words
add-line                           append an empty line
remove-line [--force]              remove the last line (must be empty unless forced)
open <path>                        save and edit another file
write                              save and exit
abort                              exit without saving
help                               show this text";

impl Command {
    /// Parses a shell line such as `swap-words 1 2 3 1`.
    ///
    /// # Errors
    /// [`CoreError::InvalidCommand`] for unknown names, wrong argument counts
    /// and numbers that are not positive integers.
    pub fn parse(input: &str) -> CoreResult<Self> {
        let mut parts = input.split_whitespace();
        let Some(name) = parts.next() else {
            return Err(CoreError::InvalidCommand("empty command".to_string()));
        };
        let args: Vec<&str> = parts.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "show" | "s" | "print" => {
                expect_args(name, &args, 0)?;
                Command::Show
            }
            "swap-lines" | "sl" => {
                expect_args(name, &args, 2)?;
                Command::SwapLines {
                    first: position(args[0])?,
                    second: position(args[1])?,
                }
            }
            "swap-words" | "sw" => {
                expect_args(name, &args, 4)?;
                Command::SwapWords {
                    first_line: position(args[0])?,
                    first_word: position(args[1])?,
                    second_line: position(args[2])?,
                    second_word: position(args[3])?,
                }
            }
            "add-line" | "add" => {
                expect_args(name, &args, 0)?;
                Command::AddEmptyLine
            }
            "remove-line" | "rm" => match args.as_slice() {
                [] => Command::RemoveLastLine { force: false },
                ["--force" | "-f"] => Command::RemoveLastLine { force: true },
                _ => return Err(CoreError::InvalidCommand(format!("usage: {name} [--force]"))),
            },
            "open" | "o" => {
                let path = input.trim_start()[name.len()..].trim();
                if path.is_empty() {
                    return Err(CoreError::InvalidCommand(format!("usage: {name} <path>")));
                }
                Command::Open {
                    path: PathBuf::from(path),
                }
            }
            "write" | "w" | "quit" | "q" | "exit" => {
                expect_args(name, &args, 0)?;
                Command::Commit
            }
            "abort" | "q!" => {
                expect_args(name, &args, 0)?;
                Command::Quit
            }
            "help" | "h" | "?" => Command::Help,
            other => {
                return Err(CoreError::InvalidCommand(format!(
                    "unknown command '{other}', try 'help'"
                )));
            }
        };
        Ok(command)
    }

    /// Runs the command against `doc`.
    ///
    /// Besides the document's own errors, this enforces the front-end rules:
    /// swapping lines needs two lines, swapping words needs two words, and an
    /// unforced remove needs an empty last line.
    pub fn execute(&self, doc: &mut Document) -> CoreResult<Outcome> {
        tracing::debug!("Executing {:?}", self);

        match self {
            Command::Show => Ok(Outcome::Rendered(doc.render()?)),
            Command::SwapLines { first, second } => {
                if doc.line_count()? < 2 {
                    return Err(CoreError::InvalidOperation(
                        "not enough lines to perform a swap".to_string(),
                    ));
                }
                doc.swap_lines(*first, *second)?;
                Ok(Outcome::Changed)
            }
            Command::SwapWords {
                first_line,
                first_word,
                second_line,
                second_word,
            } => {
                if !doc.has_words_to_swap()? {
                    return Err(CoreError::InvalidOperation(
                        "not enough words to perform a swap".to_string(),
                    ));
                }
                doc.swap_words(*first_line, *first_word, *second_line, *second_word)?;
                Ok(Outcome::Changed)
            }
            Command::AddEmptyLine => {
                doc.add_empty_line()?;
                Ok(Outcome::Changed)
            }
            Command::RemoveLastLine { force } => {
                if doc.is_empty()? {
                    return Err(CoreError::Empty);
                }
                if !*force && !doc.is_last_line_empty()? {
                    tracing::warn!("Refusing to remove a non-empty last line");
                    return Err(CoreError::InvalidOperation(
                        "last line is not empty (use --force)".to_string(),
                    ));
                }
                doc.remove_last_line()?;
                Ok(Outcome::Changed)
            }
            Command::Commit => {
                doc.commit()?;
                Ok(Outcome::Committed)
            }
            Command::Open { path } => {
                let previous = doc.path().to_path_buf();
                doc.switch_to(path)?;
                Ok(Outcome::Switched(previous))
            }
            Command::Quit => Ok(Outcome::Exit),
            Command::Help => Ok(Outcome::Help(HELP)),
        }
    }

    /// Returns the command's display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Command::Show => "Show",
            Command::SwapLines { .. } => "Swap Lines",
            Command::SwapWords { .. } => "Swap Words",
            Command::AddEmptyLine => "Add Empty Line",
            Command::RemoveLastLine { .. } => "Remove Last Line",
            Command::Commit => "Write",
            Command::Open { .. } => "Open",
            Command::Quit => "Abort",
            Command::Help => "Help",
        }
    }

    /// True if the command may modify the document.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::SwapLines { .. }
                | Command::SwapWords { .. }
                | Command::AddEmptyLine
                | Command::RemoveLastLine { .. }
        )
    }
}

impl FromStr for Command {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

fn expect_args(name: &str, args: &[&str], count: usize) -> CoreResult<()> {
    if args.len() == count {
        Ok(())
    } else {
        Err(CoreError::InvalidCommand(format!(
            "'{name}' takes {count} arguments, got {}",
            args.len()
        )))
    }
}

/// Parses a 1-based position into a 0-based index.
pub fn position(arg: &str) -> CoreResult<usize> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(CoreError::InvalidCommand(format!(
            "'{arg}' is not a positive whole number"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use wordswap_buffer::WordRule;

    fn document(content: &str) -> (Document, MemoryStore) {
        let store = MemoryStore::new();
        store.insert("cmd.txt", content);
        let doc = Document::open_with("cmd.txt", WordRule::Standard, Box::new(store.clone())).unwrap();
        (doc, store)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("show").unwrap(), Command::Show);
        assert_eq!(
            Command::parse("  swap-lines 1 3 ").unwrap(),
            Command::SwapLines { first: 0, second: 2 }
        );
        assert_eq!(
            "SW 1 2 2 1".parse::<Command>().unwrap(),
            Command::SwapWords {
                first_line: 0,
                first_word: 1,
                second_line: 1,
                second_word: 0
            }
        );
        assert_eq!(
            Command::parse("remove-line --force").unwrap(),
            Command::RemoveLastLine { force: true }
        );
        assert_eq!(Command::parse("write").unwrap(), Command::Commit);
        assert_eq!(Command::parse("abort").unwrap(), Command::Quit);
        assert_eq!(
            Command::parse("open  my notes.txt ").unwrap(),
            Command::Open {
                path: PathBuf::from("my notes.txt")
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        for input in ["", "fly", "swap-lines 1", "swap-lines 0 1", "swap-lines a b", "show x", "rm now", "open", "o  "] {
            assert!(
                matches!(Command::parse(input), Err(CoreError::InvalidCommand(_))),
                "{input:?} should not parse"
            );
        }
    }

    #[test]
    fn test_command_display_name() {
        assert_eq!(Command::Show.display_name(), "Show");
        assert_eq!(Command::AddEmptyLine.to_string(), "Add Empty Line");
        assert!(Command::AddEmptyLine.is_mutation());
        assert!(!Command::Commit.is_mutation());
        assert!(!Command::Open { path: PathBuf::from("a.txt") }.is_mutation());
    }

    #[test]
    fn test_execute_swaps() {
        let (mut doc, _) = document("cat dog\nfish bird");
        let swap = Command::parse("swap-words 1 1 2 2").unwrap();
        assert_eq!(swap.execute(&mut doc).unwrap(), Outcome::Changed);
        assert_eq!(
            Command::Show.execute(&mut doc).unwrap(),
            Outcome::Rendered("1 || bird dog\n2 || fish cat".to_string())
        );

        Command::parse("swap-lines 1 2").unwrap().execute(&mut doc).unwrap();
        assert_eq!(doc.line(0).unwrap(), "fish cat");
    }

    #[test]
    fn test_execute_guards() {
        let (mut doc, _) = document("lonely");
        assert!(matches!(
            Command::SwapLines { first: 0, second: 0 }.execute(&mut doc),
            Err(CoreError::InvalidOperation(_))
        ));
        assert!(matches!(
            Command::parse("sw 1 1 1 1").unwrap().execute(&mut doc),
            Err(CoreError::InvalidOperation(_))
        ));
        assert!(matches!(
            Command::RemoveLastLine { force: false }.execute(&mut doc),
            Err(CoreError::InvalidOperation(_))
        ));
        assert_eq!(
            Command::RemoveLastLine { force: true }.execute(&mut doc).unwrap(),
            Outcome::Changed
        );
        assert!(matches!(
            Command::RemoveLastLine { force: true }.execute(&mut doc),
            Err(CoreError::Empty)
        ));
    }

    #[test]
    fn test_execute_commit() {
        let (mut doc, store) = document("a b");
        Command::AddEmptyLine.execute(&mut doc).unwrap();
        assert_eq!(Command::Commit.execute(&mut doc).unwrap(), Outcome::Committed);
        assert_eq!(store.content("cmd.txt").as_deref(), Some("a b\n"));
        assert!(matches!(Command::Show.execute(&mut doc), Err(CoreError::Closed)));
    }

    #[test]
    fn test_execute_open() {
        let (mut doc, store) = document("a b");
        store.insert("next.txt", "c d");
        Command::parse("sw 1 1 1 2").unwrap().execute(&mut doc).unwrap();

        let open = Command::parse("open next.txt").unwrap();
        assert_eq!(
            open.execute(&mut doc).unwrap(),
            Outcome::Switched(PathBuf::from("cmd.txt"))
        );
        assert_eq!(store.content("cmd.txt").as_deref(), Some("b a"));
        assert_eq!(doc.line(0).unwrap(), "c d");

        assert!(matches!(
            Command::parse("open gone.txt").unwrap().execute(&mut doc),
            Err(CoreError::NotFound(_))
        ));
        assert_eq!(doc.path(), std::path::Path::new("next.txt"));
    }

    #[test]
    fn test_quit_and_help() {
        let (mut doc, store) = document("a b");
        assert_eq!(Command::Quit.execute(&mut doc).unwrap(), Outcome::Exit);
        assert_eq!(Command::Help.execute(&mut doc).unwrap(), Outcome::Help(HELP));
        assert_eq!(store.content("cmd.txt").as_deref(), Some("a b"));
    }
}
