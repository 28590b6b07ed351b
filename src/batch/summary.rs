//! Post-run reduction of collected results into a report

use serde::Serialize;
use std::fmt;
use std::time::Duration;

use super::types::ProcessResult;

const RULE: &str = "==========================================================";

/// Per-job line of the summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub name: String,
    pub success: bool,
    pub item_count: usize,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate figures for a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub files: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_items: usize,
    #[serde(rename = "total_duration_ms", serialize_with = "as_millis")]
    pub total_duration: Duration,
    /// `None` when no job succeeded
    #[serde(rename = "average_duration_ms", serialize_with = "option_as_millis")]
    pub average_duration: Option<Duration>,
    pub lines: Vec<SummaryLine>,
}

impl Summary {
    /// Reduce a result list. Only successful jobs contribute items and time.
    pub fn from_results(results: &[ProcessResult]) -> Self {
        let mut succeeded = 0usize;
        let mut total_items = 0usize;
        let mut total_duration = Duration::ZERO;
        let mut lines = Vec::with_capacity(results.len());

        for result in results {
            match &result.outcome {
                Ok(()) => {
                    succeeded += 1;
                    total_items += result.item_count;
                    total_duration += result.duration;
                    lines.push(SummaryLine {
                        name: result.name.clone(),
                        success: true,
                        item_count: result.item_count,
                        duration: result.duration,
                        error_kind: None,
                        error: None,
                    });
                }
                Err(e) => lines.push(SummaryLine {
                    name: result.name.clone(),
                    success: false,
                    item_count: 0,
                    duration: result.duration,
                    error_kind: Some(e.kind()),
                    error: Some(e.to_string()),
                }),
            }
        }

        let average_duration = average(total_duration, succeeded);

        Self {
            files: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            total_items,
            total_duration,
            average_duration,
            lines,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// The totals line, e.g. `Files: 3 | Success: 2 | Failed: 1`
    pub fn totals_line(&self) -> String {
        format!(
            "Files: {} | Success: {} | Failed: {}",
            self.files, self.succeeded, self.failed
        )
    }

    pub fn items_line(&self) -> String {
        let average = match self.average_duration {
            Some(average) => format!("{average:?}"),
            None => "n/a".to_string(),
        };
        format!("Total Rows: {} | Avg Time: {}", self.total_items, average)
    }
}

fn average(total: Duration, count: usize) -> Option<Duration> {
    let count = u32::try_from(count).ok().filter(|count| *count > 0)?;
    Some(total / count)
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn as_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(millis(*duration))
}

fn option_as_millis<S: serde::Serializer>(
    duration: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match duration {
        Some(duration) => serializer.serialize_some(&millis(*duration)),
        None => serializer.serialize_none(),
    }
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => write!(
                f,
                "✓ {}: {} rows in {:?}",
                self.name, self.item_count, self.duration
            ),
            Some(error) => write!(f, "✗ {}: {}", self.name, error),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "Processing Summary")?;
        writeln!(f, "{RULE}")?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        writeln!(f, "{RULE}")?;
        writeln!(f, "{}", self.totals_line())?;
        writeln!(f, "{}", self.items_line())?;
        write!(f, "{RULE}")
    }
}
