//! The diagnostics collector.
//!
//! Warnings and hard errors interleave with generation in source order. The
//! collector prints each message as it arrives (colored, in the shell
//! tradition of compilers) and retains the rendered text so tests can assert
//! on what was reported without capturing stderr.

use colored::Colorize;

use crate::errors::errors::{Error, ErrorTip};
use crate::Position;

/// Collects and prints warnings and errors during a run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<String>,
    errors: Vec<String>,
    /// Suppresses terminal output; messages are still collected.
    pub quiet: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    /// A collector that records but does not print, for tests.
    pub fn silent() -> Self {
        Diagnostics {
            quiet: true,
            ..Diagnostics::default()
        }
    }

    /// Records an advisory warning. Warnings never stop generation.
    pub fn warning(&mut self, message: &str, pos: Option<&Position>) {
        let rendered = render(message, pos);
        if !self.quiet {
            eprintln!("{} {}", "warning:".yellow().bold(), rendered);
        }
        self.warnings.push(rendered);
    }

    /// Records a hard error. The caller abandons the construct at hand but
    /// the run continues.
    pub fn error(&mut self, error: &Error) {
        let rendered = match error.get_tip() {
            ErrorTip::None => render(&error.to_string(), Some(error.get_position())),
            tip => render(
                &format!("{} ({})", error, tip),
                Some(error.get_position()),
            ),
        };
        if !self.quiet {
            eprintln!("{} {}", "error:".red().bold(), rendered);
        }
        self.errors.push(rendered);
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Whether any warning contains the given text.
    pub fn has_warning(&self, needle: &str) -> bool {
        self.warnings.iter().any(|w| w.contains(needle))
    }
}

fn render(message: &str, pos: Option<&Position>) -> String {
    match pos {
        Some(pos) if !pos.is_null() => {
            format!("line {}: {} | {}", pos.0, message, pos.1.trim())
        }
        _ => message.to_string(),
    }
}
