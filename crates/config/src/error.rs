//! Loader error types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::schema::ValueKind;

/// Standard result type for loader operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Loader error type
///
/// Unresolved names (a section header or key the schema does not declare)
/// are tolerated by the loader and never surface here.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoadError {
    /// Schema declaration rejected at build time
    #[error("schema error: {message}")]
    Schema {
        /// Description of the declaration defect
        message: String,
    },

    /// Configuration file missing or unreadable
    #[error("failed to read configuration file {path}: {message}")]
    Io {
        /// Path to the configuration file
        path: PathBuf,
        /// Rendered OS error
        message: String,
    },

    /// Malformed section header or assignment line
    #[error("line {line}: syntax error: {message}")]
    Syntax {
        /// 1-based line number of the offending line
        line: usize,
        /// Description of the malformation
        message: String,
    },

    /// A value could not be coerced to its declared kind
    #[error("line {line}: value `{value}` for key `{key}` is not a valid {expected}")]
    Value {
        /// 1-based line number of the offending line
        line: usize,
        /// Key the value was bound to
        key: String,
        /// Kind the schema declares for the key
        expected: ValueKind,
        /// Raw text that failed to coerce
        value: String,
    },
}

impl LoadError {
    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a syntax error
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Create a value coercion error
    pub fn value(
        line: usize,
        key: impl Into<String>,
        expected: ValueKind,
        value: impl Into<String>,
    ) -> Self {
        Self::Value {
            line,
            key: key.into(),
            expected,
            value: value.into(),
        }
    }

    /// Source line the error points at, if the error carries one
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. } | Self::Value { line, .. } => Some(*line),
            Self::Schema { .. } | Self::Io { .. } => None,
        }
    }

    /// Whether the error was raised before any line was parsed
    pub fn is_pre_parse(&self) -> bool {
        matches!(self, Self::Schema { .. } | Self::Io { .. })
    }
}

/// Extension trait routing load failures through the logging collaborator
///
/// Diagnostics belong at the boundary of the whole operation, so this is
/// the one place a failure meets the logger.
pub trait LoadResultExt<T> {
    /// Log the error, if any, and convert to an option
    fn log_error(self) -> Option<T>;
}

impl<T> LoadResultExt<T> for LoadResult<T> {
    fn log_error(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                stanza_log::error!("configuration load failed: {e}");
                None
            }
        }
    }
}
