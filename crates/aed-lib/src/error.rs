use std::path::PathBuf;
use thiserror::Error;

/// Failures while building a [`crate::signal::Trace`] from disk or from raw sequences.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("length mismatch: {timestamps} timestamps, {amplitudes} amplitudes, {peaks} peaks")]
    LengthMismatch {
        timestamps: usize,
        amplitudes: usize,
        peaks: usize,
    },
    #[error("timestamp at index {index} goes backwards ({previous} -> {current})")]
    NonMonotonic {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("no samples found")]
    Empty,
}
