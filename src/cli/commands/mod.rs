use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

pub mod generate;
pub mod process;

#[derive(Parser)]
#[command(
    name = "filebatch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Process many files in parallel with live progress and clean cancellation",
    long_about = "filebatch fans a list of record files out to a pool of worker threads, \
                  counts the records in each, reports progress as jobs finish and prints \
                  a summary. Ctrl-C cancels the run and still reports what completed."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process files in parallel and print a summary
    Process(process::ProcessArgs),
    /// Write sample CSV files to try a run on
    Generate(generate::GenerateArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // Set up logging based on verbosity
        setup_logging(self.verbose, self.quiet);

        match self.command {
            Some(Commands::Process(args)) => {
                process::execute(args, self.config.as_deref(), self.verbose, self.quiet).await
            }
            Some(Commands::Generate(args)) => generate::execute(args, self.quiet).await,
            None => {
                // Show help when no command is provided
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // try_init: a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
