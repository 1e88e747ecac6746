use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type returned while generating docs for a single model.
#[derive(Debug, Error)]
pub enum DocError {
    /// The model class could not be loaded or instantiated.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The schema source could not describe the model's table.
    #[error("schema source failed: {0}")]
    Schema(#[from] SchemaError),

    /// The target document could not be patched.
    #[error("patch failed: {0}")]
    Patch(#[from] PatchError),

    /// Reading or writing the model file failed.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error means the target was skipped rather than failed.
    pub fn is_skip(&self) -> bool {
        matches!(self, DocError::Load(_))
    }
}

/// Reasons a model class cannot be turned into a live instance.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("{class} is not exists")]
    NotFound { class: String },

    #[error("{class} is not Model Subclass")]
    NotAModel { class: String },

    #[error("{class} is abstract")]
    Abstract { class: String },
}

/// Failures reported by a [`SchemaSource`](crate::SchemaSource).
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("table '{table}' does not exist")]
    MissingTable { table: String },

    #[error("failed to read columns for '{table}': {source}")]
    Read {
        table: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid column data for '{table}': {message}")]
    Invalid { table: String, message: String },
}

/// Raised by the anchor patcher when a document lacks the structure it needs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("class declaration `{line}` not found")]
    ClassLineMissing { line: String },

    #[error("schema block starting at line {start} has no closing `];`")]
    UnterminatedSchema { start: usize },
}

/// Failure while probing a method for a relation.
///
/// Probe failures are expected (plenty of zero-argument methods are not relations)
/// and never surface to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("method {method} is not declared")]
    UnknownMethod { method: String },

    #[error("relation {method} is misconfigured: {reason}")]
    Misconfigured { method: String, reason: String },
}

/// Problems loading a model manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate model class {class} in manifest")]
    DuplicateClass { class: String },
}
