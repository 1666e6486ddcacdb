//! Interactive session over a single in-memory library

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{bail, Result};
use clap::Parser;
use tracing::debug;

use super::app::{execute, Commands};
use super::output::Output;
use crate::domain::LendingLibrary;

/// One shell line, parsed like the arguments that follow `lend`
#[derive(Parser)]
#[command(no_binary_name = true, name = "lend>")]
struct ShellLine {
    #[command(subcommand)]
    command: Commands,
}

/// Reads commands from stdin until end of input or `exit`
pub fn run(library: &mut LendingLibrary, output: &Output) -> Result<()> {
    let stdin = io::stdin();
    let interactive = output.is_text() && stdin.is_terminal();

    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("lend> ");
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else { break };
        let words = match split_words(&line?) {
            Ok(words) => words,
            Err(e) => {
                output.error(&e.to_string());
                continue;
            }
        };
        let Some(first) = words.first() else { continue };
        if first == "exit" || first == "quit" {
            break;
        }

        debug!(line = %words.join(" "), "shell command");
        match ShellLine::try_parse_from(&words) {
            Ok(parsed) => {
                if let Err(e) = execute(library, parsed.command, output) {
                    output.error(&format!("{:#}", e));
                }
            }
            Err(e) => {
                // Help and version requests are not failures.
                let _ = e.print();
            }
        }
    }
    Ok(())
}

/// Splits a line into words, honoring single and double quotes
fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        bail!("Unterminated {} quote", q);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
