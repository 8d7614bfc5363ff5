//! Logger builder implementation

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Format};
use crate::{LogError, LogResult};

/// Logger builder
pub struct LoggerBuilder {
    config: Config,
}

/// Guard that keeps the logger installation alive
///
/// Hold it for the lifetime of `main`.
pub struct LoggerGuard {
    _private: (),
}

impl LoggerBuilder {
    /// Create builder from config
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Build and install the global subscriber
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = EnvFilter::try_new(&self.config.level)
            .map_err(|e| LogError::Filter(format!("{}: {e}", self.config.level)))?;

        match self.config.format {
            Format::Pretty => self.init_pretty(filter)?,
            Format::Compact => self.init_compact(filter)?,
            Format::Json => self.init_json(filter)?,
        }

        Ok(LoggerGuard { _private: () })
    }

    fn init_pretty(&self, filter: EnvFilter) -> LogResult<()> {
        Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_ansi(self.config.display.colors)
                    .with_target(self.config.display.target)
                    .with_file(self.config.display.source)
                    .with_line_number(self.config.display.source),
            )
            .try_init()
            .map_err(|_| LogError::AlreadyInitialized)
    }

    fn init_compact(&self, filter: EnvFilter) -> LogResult<()> {
        Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_ansi(self.config.display.colors)
                    .with_target(self.config.display.target)
                    .with_file(self.config.display.source)
                    .with_line_number(self.config.display.source),
            )
            .try_init()
            .map_err(|_| LogError::AlreadyInitialized)
    }

    fn init_json(&self, filter: EnvFilter) -> LogResult<()> {
        Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_target(self.config.display.target)
                    .with_file(self.config.display.source)
                    .with_line_number(self.config.display.source),
            )
            .try_init()
            .map_err(|_| LogError::AlreadyInitialized)
    }
}
