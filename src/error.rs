//! Error types for configuration materialization.
//!
//! Two families:
//! - [`Error`] is fatal. Any I/O or parse failure on a document aborts the
//!   run, since no document can be trusted after it.
//! - [`OverrideError`] is recoverable. It is reported for one binding and the
//!   run continues with that field left at its prior value.

use crate::coerce::TypeTag;
use crate::document::PathError;
use std::fmt;
use std::path::PathBuf;

/// Result type for materialization operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors. These stop the run before the downstream application starts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON document at {path}: {message}")]
    MalformedDocument { path: PathBuf, message: String },

    #[error("Failed to serialize document '{name}': {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid run configuration ({origin}): {message}")]
    RunConfig { origin: String, message: String },

    #[error(
        "{} environment override(s) rejected in strict mode: {}",
        .errors.len(),
        join_messages(.errors)
    )]
    OverridesRejected { errors: Vec<OverrideError> },
}

fn join_messages(errors: &[OverrideError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn run_config(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RunConfig {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

/// An environment variable whose text does not coerce to its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the offending environment variable.
    pub variable: String,
    /// The type the binding declares.
    pub expected: TypeTag,
    /// The raw text as read from the environment.
    pub raw: String,
    /// Parser detail, if any.
    pub detail: Option<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {:?}",
            self.variable,
            self.expected.describe(),
            self.raw
        )?;
        if let Some(ref detail) = self.detail {
            write!(f, " ({})", detail)?;
        }
        if self.expected == TypeTag::Array {
            write!(
                f,
                ". If this was set from a shell, quote the whole value so the inner \
                 double quotes survive, e.g. {}='[\"a\", \"b\"]'",
                self.variable
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A rejected override. The field it targets keeps its prior value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverrideError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{variable}: cannot write to {source}")]
    Unaddressable {
        variable: String,
        #[source]
        source: PathError,
    },
}

impl OverrideError {
    /// Name of the environment variable the error is about.
    pub fn variable(&self) -> &str {
        match self {
            OverrideError::Validation(err) => &err.variable,
            OverrideError::Unaddressable { variable, .. } => variable,
        }
    }
}
