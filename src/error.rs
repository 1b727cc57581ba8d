//! Error type shared by catalog loading, sky calculation and rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by this crate.
///
/// Empty results (a filter that matches nothing, projecting zero points)
/// are never errors.
#[derive(Error, Debug)]
pub enum SkyError {
    /// The star catalog file does not exist.
    #[error("catalog resource not found: {}", path.display())]
    ResourceNotFound { path: PathBuf },

    /// A catalog record could not be parsed. `line` is 1-based.
    #[error("malformed catalog record at line {line}: {reason}")]
    MalformedCatalogRecord { line: usize, reason: String },

    /// An operation was called before the state it depends on exists.
    #[error("precondition violated: {0}")]
    PreconditionViolation(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl SkyError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        SkyError::MalformedCatalogRecord {
            line,
            reason: reason.into(),
        }
    }
}

pub type SkyResult<T> = Result<T, SkyError>;
