//! Styled output for filebatch commands
//!
//! Human-readable messages go to stdout, errors to stderr. Quiet mode hides
//! everything except errors and the summary itself.

use console::style;

use crate::batch::{Summary, SummaryLine};

/// Output handler for consistent CLI formatting
#[derive(Debug, Clone, Copy)]
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        // Errors are always shown, even in quiet mode
        eprintln!("{} {}", style("✖").red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    /// Print a key-value pair with consistent styling
    pub fn key_value(&self, key: &str, value: &str, highlight: bool) {
        if !self.quiet {
            let styled_value = if highlight {
                style(value).green().bold()
            } else {
                style(value).white()
            };
            println!("  {} {}", style(key).dim(), styled_value);
        }
    }

    /// Print the end-of-run report: one line per job, then the totals
    pub fn summary(&self, summary: &Summary) {
        println!();
        println!("{}", style(RULE).dim());
        println!("{}", style("Processing Summary").bold().underlined());
        println!("{}", style(RULE).dim());
        for line in &summary.lines {
            self.summary_line(line);
        }
        println!("{}", style(RULE).dim());

        let totals = summary.totals_line();
        if summary.has_failures() {
            println!("{}", style(totals).red().bold());
        } else {
            println!("{}", style(totals).green().bold());
        }
        println!("{}", style(summary.items_line()).bold());
    }

    fn summary_line(&self, line: &SummaryLine) {
        let text = line.to_string();
        if line.success {
            println!("{}", style(text).green());
        } else {
            println!("{}", style(text).red());
        }
    }
}

const RULE: &str = "==========================================================";
