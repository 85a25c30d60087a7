//! Interactive yes/no prompt on the terminal
//!
//! The question is written to stderr; stdout carries only command output.

use std::io::{self, BufRead, Write};

use piggin_core::ConfirmationPrompt;

/// Prompt that reads the answer from stdin
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl ConfirmationPrompt for StdinPrompt {
    fn ask(&self, message: &str) -> bool {
        if let Err(e) = write_question(&mut io::stderr(), message) {
            tracing::debug!(error = %e, "could not show confirmation prompt");
        }

        read_answer(io::stdin().lock())
    }
}

/// Write the question on one line, without a newline, and flush
fn write_question(mut out: impl Write, message: &str) -> io::Result<()> {
    write!(out, "{message} [y/N]: ")?;
    out.flush()
}

/// Read one line and decide whether it is a yes; read errors count as no
fn read_answer(mut reader: impl BufRead) -> bool {
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(_) => is_yes(&input),
        Err(e) => {
            tracing::debug!(error = %e, "could not read confirmation");
            false
        }
    }
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
