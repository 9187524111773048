//! File and stream output.

/// CSV writers and export file naming.
pub mod export;
