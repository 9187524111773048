//! Battery cell simulator: live telemetry drift, task queue, CSV export.

#[cfg(feature = "api")]
pub mod api;
pub mod cells;
pub mod config;
pub mod error;
pub mod io;
/// Session state, clock, tickers and summaries.
pub mod sim;
pub mod tasks;
#[cfg(feature = "tui")]
pub mod tui;
