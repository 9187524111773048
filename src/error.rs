//! Error types for session mutations and exports.

use std::io;

/// Errors raised by session operations.
///
/// Telemetry updates never fail; only lookups of unknown identities and
/// export I/O do.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// No cell with the given id exists in the registry.
    #[error("cell not found: {0}")]
    CellNotFound(String),

    /// No task with the given id exists in the ledger.
    #[error("task not found: {0}")]
    TaskNotFound(String),

    /// Filesystem failure while exporting.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// CSV serialization failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, SimError>;
