//! Error types for the stats parser.
//!
//! The parser is the operator-facing diagnostic surface: when rsync
//! changes its output format, the error message must show the exact
//! line shape that was expected so the broken match is recognizable
//! without reading the source.

use thiserror::Error;

/// Failure to extract a metric from captured rsync output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    /// A mandatory stats line could not be located (or its numeral could
    /// not be read). The display string is the expected line shape,
    /// e.g. `Number of files: X,XXX (reg: X,XXX, dir: X,XXX)`.
    #[error("{expected}")]
    StatsNotFound { expected: &'static str },
}
