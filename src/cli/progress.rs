//! Live progress display for a running batch

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::parallel::{ProgressSink, ProgressUpdate};

/// Prints one status line per finished job to stderr.
///
/// On a terminal the lines are printed above an indicatif bar tracking
/// completed jobs; otherwise they are written as plain lines.
pub struct ConsoleProgress {
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl ConsoleProgress {
    pub fn new(total: usize, quiet: bool) -> Self {
        Self::with_mode(total, quiet, atty::is(atty::Stream::Stderr))
    }

    pub fn with_mode(total: usize, quiet: bool, interactive: bool) -> Self {
        let bar = (interactive && !quiet).then(|| {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(bar_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });

        Self { bar, quiet }
    }

    pub fn is_interactive(&self) -> bool {
        self.bar.is_some()
    }

    /// Remove the bar once the run is over
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-")
}

fn status_line(update: &ProgressUpdate) -> String {
    let marker = if update.success {
        style(update.marker()).green().bold()
    } else {
        style(update.marker()).red().bold()
    };
    format!(
        "{} {} {}",
        style(format!("[{}/{}]", update.state.completed, update.state.total)).dim(),
        marker,
        update.name
    )
}

impl ProgressSink for ConsoleProgress {
    fn report(&self, update: &ProgressUpdate) {
        let line = status_line(update);
        match &self.bar {
            Some(bar) => {
                bar.println(line);
                bar.set_position(update.state.completed as u64);
                if update.state.failed > 0 {
                    bar.set_message(format!("{} failed", update.state.failed));
                }
            }
            None if !self.quiet => eprintln!("{line}"),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ProgressState;

    fn update(success: bool) -> ProgressUpdate {
        ProgressUpdate {
            name: "data.csv".to_string(),
            success,
            state: ProgressState {
                total: 4,
                completed: 2,
                failed: usize::from(!success),
            },
        }
    }

    #[test]
    fn test_non_interactive_has_no_bar() {
        let progress = ConsoleProgress::with_mode(4, false, false);
        assert!(!progress.is_interactive());
        progress.report(&update(true));
        progress.finish();
    }

    #[test]
    fn test_quiet_never_draws_a_bar() {
        let progress = ConsoleProgress::with_mode(4, true, true);
        assert!(!progress.is_interactive());
    }

    #[test]
    fn test_status_line_contains_counts_and_name() {
        console::set_colors_enabled(false);
        let line = status_line(&update(false));
        assert_eq!(line, "[2/4] ✗ data.csv");
    }
}
