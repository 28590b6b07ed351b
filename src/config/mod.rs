//! Configuration management for filebatch
//!
//! Settings are layered with figment, lowest priority first:
//! embedded defaults, a project file (`filebatch.toml` / `filebatch.json`) or
//! the file given with `--config`, then `FILEBATCH_*` environment variables.

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Json, Toml};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::parallel::{DEFAULT_POLL_INTERVAL, ProcessorConfig};
use crate::records::{AnySource, RecordFormat};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Main configuration structure for a batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker threads (0 = derive from job count and CPUs)
    pub workers: usize,

    /// Record format of the input files
    pub format: RecordFormat,

    /// Whether the first row of each file is a header
    pub has_headers: bool,

    /// Field delimiter, a single ASCII character
    pub delimiter: char,

    /// Simulated work per record (milliseconds)
    pub record_delay_ms: u64,

    /// Cancellation polling interval for blocked queue operations (milliseconds)
    pub poll_interval_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            format: RecordFormat::Csv,
            has_headers: true,
            delimiter: ',',
            record_delay_ms: 0,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

impl BatchConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    pub fn load_with_custom_config(custom_config: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        // A custom config replaces the project files
        if let Some(custom_path) = custom_config {
            if let Some(warning) = missing_config_warning(custom_path) {
                tracing::warn!("{}", warning);
            }
            let is_json = custom_path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            figment = if is_json {
                figment.merge(Json::file(custom_path))
            } else {
                figment.merge(Toml::file(custom_path))
            };
        } else {
            figment = figment
                .merge(Toml::file("filebatch.toml"))
                .merge(Json::file("filebatch.json"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("FILEBATCH_"));

        Self::from_figment(figment)
    }

    /// Extract and validate a configuration from an arbitrary provider chain
    pub fn from_figment(figment: Figment) -> Result<Self> {
        tracing::trace!("Extracting batch configuration");
        let config: BatchConfig = figment
            .extract()
            .context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            anyhow::bail!(
                "Delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            );
        }
        if self.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms cannot be 0");
        }
        Ok(())
    }

    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.delimiter as u8
    }

    /// Record source described by this configuration
    pub fn record_source(&self) -> AnySource {
        AnySource::new(self.format, self.delimiter_byte(), self.has_headers)
    }

    /// Processor settings for a batch of `job_count` jobs
    pub fn processor_config(&self, job_count: usize) -> Result<ProcessorConfig> {
        let config = if self.workers == 0 {
            ProcessorConfig::for_jobs(job_count)
        } else {
            ProcessorConfig::new(self.workers)?
        };

        config
            .with_record_delay(Duration::from_millis(self.record_delay_ms))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
    }
}

/// Figment skips absent files silently
fn missing_config_warning(path: &Path) -> Option<String> {
    (!path.exists()).then(|| {
        format!(
            "Config file {} not found, continuing without it",
            path.display()
        )
    })
}

#[cfg(test)]
mod tests;
