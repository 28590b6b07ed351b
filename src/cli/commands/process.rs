use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::batch::{ProgressState, Summary};
use crate::cli::{ConsoleProgress, Output};
use crate::config::BatchConfig;
use crate::parallel::{BatchProcessor, BatchRun};
use crate::records::RecordFormat;

/// Exit status of a run stopped by Ctrl-C or SIGTERM
const EXIT_CANCELLED: i32 = 130;

#[derive(Args)]
pub struct ProcessArgs {
    /// Files to process
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Worker threads (0 sizes the pool from file and CPU count)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Record format of the input files
    #[arg(long, value_enum)]
    pub format: Option<RecordFormat>,

    /// Treat the first row as data instead of a header
    #[arg(long)]
    pub no_headers: bool,

    /// Field delimiter
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Simulated work per record, in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Summary output format
    #[arg(long, value_enum, default_value = "text")]
    pub format_output: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON format
    Json,
}

impl ProcessArgs {
    /// CLI flags take precedence over every configuration layer
    fn apply_overrides(&self, config: &mut BatchConfig) {
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if self.no_headers {
            config.has_headers = false;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.record_delay_ms = delay_ms;
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    workers: usize,
    cancelled: bool,
    elapsed_ms: f64,
    progress: ProgressState,
    #[serde(flatten)]
    summary: &'a Summary,
}

pub async fn execute(
    args: ProcessArgs,
    config_path: Option<&Path>,
    verbose: u8,
    quiet: bool,
) -> Result<()> {
    let output = Output::new(verbose > 0, quiet);
    let text = args.format_output == OutputFormat::Text;

    let mut config = BatchConfig::load_with_custom_config(config_path)?;
    args.apply_overrides(&mut config);
    config.validate()?;

    let processor_config = config.processor_config(args.files.len())?;
    if text {
        output.info(&format!(
            "Processing {} files with {} workers...",
            args.files.len(),
            processor_config.worker_count().min(args.files.len())
        ));
        output.verbose(&format!(
            "format={:?} headers={} delimiter={:?} delay={}ms",
            config.format, config.has_headers, config.delimiter, config.record_delay_ms
        ));
    }

    let progress = Arc::new(ConsoleProgress::new(args.files.len(), quiet));
    let processor = BatchProcessor::new(processor_config, config.record_source())
        .with_progress_sink(progress.clone());

    // Ctrl-C or SIGTERM cancels the run; the blocking run observes it
    // through the controller
    let controller = processor.controller();
    let signals = ShutdownSignals::install()?;
    let signal_task = tokio::spawn(async move {
        if let Some(signal) = signals.recv().await {
            output.warning(&format!("Received {signal}, cancelling processing..."));
            controller.trigger();
        }
    });

    let files = args.files;
    let run = tokio::task::spawn_blocking(move || processor.process_files(&files))
        .await
        .context("Batch run task failed")??;

    signal_task.abort();
    progress.finish();

    let summary = run.summary();
    match args.format_output {
        OutputFormat::Text => {
            output.summary(&summary);
            output.key_value("Total Time:", &format!("{:?}", run.elapsed), false);
        }
        OutputFormat::Json => print_json(&run, &summary)?,
    }

    if run.cancelled {
        output.error(&format!(
            "Processing cancelled: {} of {} files completed",
            run.progress.completed, run.progress.total
        ));
        std::process::exit(EXIT_CANCELLED);
    }
    if summary.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}

/// Signals that cancel a running batch
struct ShutdownSignals {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignals {
    /// Register the handlers now so a signal arriving early is not lost
    fn install() -> Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: tokio::signal::unix::signal(
                tokio::signal::unix::SignalKind::terminate(),
            )
            .context("Failed to install SIGTERM handler")?,
        })
    }

    /// Name of the first signal received, or `None` if listening failed
    async fn recv(self) -> Option<&'static str> {
        #[cfg(unix)]
        {
            let mut terminate = self.terminate;
            tokio::select! {
                Ok(()) = tokio::signal::ctrl_c() => Some("interrupt"),
                Some(()) = terminate.recv() => Some("SIGTERM"),
                else => None,
            }
        }
        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await.ok().map(|()| "interrupt")
        }
    }
}

fn print_json(run: &BatchRun, summary: &Summary) -> Result<()> {
    let report = JsonReport {
        workers: run.workers,
        cancelled: run.cancelled,
        elapsed_ms: run.elapsed.as_secs_f64() * 1000.0,
        progress: run.progress,
        summary,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
