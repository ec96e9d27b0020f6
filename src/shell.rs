//! Interactive command loop.
//!
//! Reads one command per line, runs it against the document and prints the
//! result. Mistakes such as a bad index are reported and the loop goes on;
//! only errors that end the session (denied access, a closed document) stop it.
//! `open <path>` saves the current file and keeps going with another one.

use std::io::{BufRead, Write};

use anyhow::Context;
use wordswap_core::{Command, Config, CoreError, Document, Outcome};

/// How the shell session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The document was written back
    Committed,
    /// The user left without writing
    Aborted,
}

/// Runs the shell until the user writes, aborts, or input ends.
///
/// End of input leaves without writing.
pub fn run<R: BufRead, W: Write>(
    doc: &mut Document,
    config: &Config,
    input: R,
    mut output: W,
) -> anyhow::Result<Exit> {
    banner(doc, &mut output)?;

    // Unsaved changes to the current file
    let mut dirty = false;

    let mut lines = input.lines();
    loop {
        write!(output, "{}", config.shell.prompt)?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            if dirty {
                writeln!(output, "Input closed, changes were not written.")?;
            } else {
                writeln!(output, "Input closed.")?;
            }
            return Ok(Exit::Aborted);
        };
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                report(&mut output, err)?;
                continue;
            }
        };
        if let Command::Open { path } = &command {
            if !config.accepts(path) {
                writeln!(
                    output,
                    "error: {} does not have the required extension",
                    path.display()
                )?;
                continue;
            }
        }

        match command.execute(doc) {
            Ok(Outcome::Rendered(text)) => writeln!(output, "{text}")?,
            Ok(Outcome::Changed) => {
                dirty |= command.is_mutation();
                if config.shell.show_after_change {
                    writeln!(output, "{}", doc.render()?)?;
                }
            }
            Ok(Outcome::Committed) => {
                writeln!(output, "Written to {}.", doc.path().display())?;
                return Ok(Exit::Committed);
            }
            Ok(Outcome::Switched(previous)) => {
                dirty = false;
                writeln!(output, "Written to {}.", previous.display())?;
                banner(doc, &mut output)?;
            }
            Ok(Outcome::Exit) => {
                if dirty {
                    writeln!(output, "Changes were not written.")?;
                }
                return Ok(Exit::Aborted);
            }
            Ok(Outcome::Help(text)) => writeln!(output, "{text}")?,
            Err(err) => report(&mut output, err)?,
        }
    }
}

fn banner(doc: &Document, output: &mut impl Write) -> anyhow::Result<()> {
    writeln!(
        output,
        "Editing {} ({} words). Type 'help' for commands.",
        doc.path().display(),
        doc.rule()
    )?;
    writeln!(output, "{}", doc.render()?)?;
    Ok(())
}

/// Prints a recoverable error, or ends the session on a fatal one.
fn report(output: &mut impl Write, err: CoreError) -> anyhow::Result<()> {
    if err.is_fatal() {
        return Err(err).context("Shell session ended");
    }

    tracing::debug!("Recoverable error: {}", err);
    writeln!(output, "error: {err}")?;
    if err.is_out_of_range() {
        writeln!(output, "Positions are 1-based; 'show' lists the lines.")?;
    }
    Ok(())
}
