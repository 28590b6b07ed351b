//! Command-line interface for filebatch
//!
//! Argument parsing is clap derive; each subcommand lives in its own module
//! under [`commands`]. Styled console output and the live progress display
//! are kept separate so the commands only decide *what* to print.

pub mod commands;
pub mod output;
pub mod progress;

pub use commands::Cli;
pub use output::Output;
pub use progress::ConsoleProgress;
