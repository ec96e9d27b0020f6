//! # Wordswap - Swap Lines and Words in Text Files
//!
//! ## Quick Start
//!
//! ```bash
//! # Edit interactively
//! cargo run -- notes.txt
//!
//! # Swap word 1 of line 1 with word 2 of line 2 and save
//! cargo run -- notes.txt swap-words 1 1 2 2
//!
//! # Print the file with line numbers
//! cargo run -- notes.txt show
//! ```
//!
//! Line and word positions are 1-based on the command line.

mod shell;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wordswap_core::command::position;
use wordswap_core::{Command, Config, Document, LineStore, WordRule};

/// Wordswap - swap lines and words in plain-text files
#[derive(Parser, Debug)]
#[command(name = "wordswap")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to edit
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Word rule: standard, strict-digits or letter-led
    #[arg(long, value_name = "RULE", value_parser = parse_rule)]
    rule: Option<WordRule>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    action: Option<Action>,
}

/// One-shot edits. Everything except `show` and `shell` saves the file.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Action {
    /// Print the file with line numbers
    Show,

    /// Swap two lines
    SwapLines {
        #[arg(value_parser = parse_position)]
        first: usize,
        #[arg(value_parser = parse_position)]
        second: usize,
    },

    /// Swap two words, on the same line or on different lines
    SwapWords {
        #[arg(value_parser = parse_position)]
        first_line: usize,
        #[arg(value_parser = parse_position)]
        first_word: usize,
        #[arg(value_parser = parse_position)]
        second_line: usize,
        #[arg(value_parser = parse_position)]
        second_word: usize,
    },

    /// Append an empty line
    AddLine,

    /// Remove the last line
    RemoveLine {
        /// Remove it even if it is not empty
        #[arg(short, long)]
        force: bool,
    },

    /// Edit interactively (default)
    Shell,
}

impl Action {
    /// The document command this action runs, if it is a one-shot edit.
    fn command(&self) -> Option<Command> {
        match *self {
            Action::Show | Action::Shell => None,
            Action::SwapLines { first, second } => Some(Command::SwapLines { first, second }),
            Action::SwapWords {
                first_line,
                first_word,
                second_line,
                second_word,
            } => Some(Command::SwapWords {
                first_line,
                first_word,
                second_line,
                second_word,
            }),
            Action::AddLine => Some(Command::AddEmptyLine),
            Action::RemoveLine { force } => Some(Command::RemoveLastLine { force }),
        }
    }
}

fn parse_position(arg: &str) -> Result<usize, String> {
    position(arg).map_err(|e| e.to_string())
}

fn parse_rule(arg: &str) -> Result<WordRule, String> {
    [WordRule::Standard, WordRule::StrictDigits, WordRule::LetterLed]
        .into_iter()
        .find(|rule| rule.name() == arg)
        .ok_or_else(|| format!("unknown word rule '{arg}'"))
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting wordswap v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Cannot load config {}", path.display()))?,
        None => Config::load(),
    };

    if !config.accepts(&args.file) {
        bail!(
            "{} does not have the required extension",
            args.file.display()
        );
    }

    let action = args.action.unwrap_or(Action::Shell);
    let store = config.store();
    if action != Action::Show {
        store
            .check_editable(&args.file)
            .with_context(|| format!("Cannot edit {}", args.file.display()))?;
    }

    let rule = args.rule.unwrap_or(config.words.rule);
    let mut doc = Document::open_with(&args.file, rule, Box::new(store))
        .with_context(|| format!("Cannot open {}", args.file.display()))?;

    match action.command() {
        Some(command) => {
            command.execute(&mut doc)?;
            Command::Commit.execute(&mut doc)?;
        }
        None if action == Action::Show => println!("{}", doc.render()?),
        None => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let exit = shell::run(&mut doc, &config, stdin.lock(), stdout.lock())?;
            tracing::info!("Shell finished: {:?}", exit);
        }
    }

    Ok(())
}
