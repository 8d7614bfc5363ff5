//! Stanza Log - small logging facade for the stanza toolkit
//!
//! Wraps `tracing` with level parsing, optional caller-location capture,
//! and a choice of output formats behind one init call.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stanza_log::prelude::*;
//!
//! fn main() -> LogResult<()> {
//!     let _guard = stanza_log::auto_init()?;
//!     info!(path = "conf.ini", "loading configuration");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builder;
mod config;

// Public API
pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format, Level};

// Re-export tracing macros
pub use tracing::{debug, error, info, instrument, span, trace, warn};

/// Result type for logger operations
pub type LogResult<T> = Result<T, LogError>;

/// Error type for logger operations
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Unrecognized log level name
    #[error("invalid log level: {0}")]
    Level(String),

    /// Filter directives rejected by the subscriber
    #[error("invalid filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed
    #[error("logger already initialized")]
    AlreadyInitialized,
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::{LogResult, Level, debug, error, info, trace, warn};
}

/// Auto-detect and initialize the best logging configuration
pub fn auto_init() -> LogResult<LoggerGuard> {
    if std::env::var("STANZA_LOG").is_ok() || std::env::var("RUST_LOG").is_ok() {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initialize with default configuration
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with custom configuration
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}
