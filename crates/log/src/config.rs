//! Configuration types for the logger

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::LogError;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level filter (e.g. `"info"`, `"debug,hyper=warn"`)
    pub level: String,

    /// Output format
    pub format: Format,

    /// Display configuration
    pub display: DisplayConfig,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Human-readable with colors and indentation
    Pretty,
    /// Compact single-line output
    Compact,
    /// Structured JSON output
    Json,
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Trace level
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warn level
    Warn,
    /// Error level
    Error,
}

impl Level {
    /// Lowercase name of the level
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    // Case-insensitive; `warning` is accepted as an alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(LogError::Level(s.to_string())),
        }
    }
}

impl From<Level> for tracing::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => tracing::Level::TRACE,
            Level::Debug => tracing::Level::DEBUG,
            Level::Info => tracing::Level::INFO,
            Level::Warn => tracing::Level::WARN,
            Level::Error => tracing::Level::ERROR,
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show source location (file:line)
    pub source: bool,
    /// Show target module
    pub target: bool,
    /// Use ANSI colors
    pub colors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: Level::Info.to_string(),
            format: Format::Compact,
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("STANZA_LOG") {
            config.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            config.level = level;
        }

        if let Ok(format) = std::env::var("STANZA_LOG_FORMAT") {
            config.format = match format.to_lowercase().as_str() {
                "pretty" => Format::Pretty,
                "json" => Format::Json,
                _ => Format::Compact,
            };
        }

        config.display.parse_env();
        config
    }

    /// Development configuration (pretty, debug level)
    pub fn development() -> Self {
        Self {
            level: Level::Debug.to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                source: true,
                colors: true,
                ..DisplayConfig::default()
            },
        }
    }

    /// Production configuration (JSON, info level)
    pub fn production() -> Self {
        Self {
            level: Level::Info.to_string(),
            format: Format::Json,
            display: DisplayConfig {
                source: false,
                colors: false,
                ..DisplayConfig::default()
            },
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            source: cfg!(debug_assertions),
            target: true,
            colors: std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}

impl DisplayConfig {
    fn parse_env(&mut self) {
        if let Ok(v) = std::env::var("STANZA_LOG_SOURCE") {
            self.source = v != "0" && v != "false";
        }
        if let Ok(v) = std::env::var("STANZA_LOG_COLORS") {
            self.colors = v != "0" && v != "false";
        }
    }
}
