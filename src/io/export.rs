//! CSV export for cells, tasks and history.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::info;

use crate::cells::{Cell, HistoricalSample};
use crate::error::Result;
use crate::sim::session::Session;
use crate::tasks::{Task, TaskParam};

/// Cell table column header.
const CELL_HEADER: [&str; 9] = [
    "cell_id",
    "type",
    "voltage",
    "current",
    "temp",
    "capacity",
    "min_voltage",
    "max_voltage",
    "status",
];

/// Columns every task row carries, ahead of the kind-specific ones.
const TASK_BASE_HEADER: [&str; 4] = ["task_id", "task_type", "status", "progress"];

/// History table column header.
const HISTORY_HEADER: [&str; 6] = ["timestamp", "cell_id", "voltage", "current", "temp", "capacity"];

/// Timestamp layout in the history table.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Wall-clock layout embedded in export file names.
const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// The three exportable tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Cells,
    Tasks,
    History,
}

impl ExportKind {
    pub const ALL: [ExportKind; 3] = [ExportKind::Cells, ExportKind::Tasks, ExportKind::History];

    /// Parses the short name used in URLs (`cells`, `tasks`, `history`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cells" => Some(Self::Cells),
            "tasks" => Some(Self::Tasks),
            "history" => Some(Self::History),
            _ => None,
        }
    }

    /// File name prefix.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Cells => "battery_cells",
            Self::Tasks => "battery_tasks",
            Self::History => "battery_historical",
        }
    }

    /// File name `{prefix}_{YYYYMMDD_HHMMSS}.csv` for an export taken at `now`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use cell_sim::io::export::ExportKind;
    ///
    /// let now = NaiveDate::from_ymd_opt(2025, 2, 3)
    ///     .and_then(|d| d.and_hms_opt(4, 5, 6))
    ///     .unwrap();
    /// assert_eq!(ExportKind::Cells.file_name(now), "battery_cells_20250203_040506.csv");
    /// ```
    pub fn file_name(self, now: NaiveDateTime) -> String {
        format!("{}_{}.csv", self.prefix(), now.format(FILE_STAMP_FORMAT))
    }
}

/// Writes one table of the session as CSV to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv(kind: ExportKind, session: &Session, writer: impl Write) -> Result<()> {
    match kind {
        ExportKind::Cells => write_cells_csv(session.cells().cells(), writer),
        ExportKind::Tasks => write_tasks_csv(session.tasks().tasks(), writer),
        ExportKind::History => write_history_csv(session.history(), writer),
    }
}

/// Writes the cell table: one row per cell in insertion order.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_cells_csv(cells: &[Cell], writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(CELL_HEADER)?;
    for c in cells {
        wtr.write_record(&[
            c.cell_id.clone(),
            c.chemistry.as_str().to_string(),
            format!("{:.2}", c.voltage),
            format!("{:.2}", c.current),
            format!("{:.1}", c.temp),
            format!("{:.2}", c.capacity),
            format!("{:.2}", c.min_voltage),
            format!("{:.2}", c.max_voltage),
            c.status.as_str().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the task table.
///
/// Parameter columns are limited to those carried by at least one task;
/// tasks lacking a column get an empty field.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_tasks_csv(tasks: &[Task], writer: impl Write) -> Result<()> {
    let params: Vec<TaskParam> = TaskParam::ALL
        .into_iter()
        .filter(|&p| tasks.iter().any(|t| t.kind.param(p).is_some()))
        .collect();

    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    let header = TASK_BASE_HEADER
        .iter()
        .copied()
        .chain(params.iter().map(|p| p.column()));
    wtr.write_record(header)?;

    for t in tasks {
        let mut row = vec![
            t.task_id.clone(),
            t.kind.name().to_string(),
            t.status.as_str().to_string(),
            t.progress.to_string(),
        ];
        row.extend(params.iter().map(|&p| t.kind.param(p).unwrap_or_default()));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the history table: one row per (tick, cell), oldest first.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_history_csv(history: &[HistoricalSample], writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HISTORY_HEADER)?;
    for h in history {
        wtr.write_record(&[
            h.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            h.cell_id.clone(),
            format!("{:.2}", h.voltage),
            format!("{:.2}", h.current),
            format!("{:.1}", h.temp),
            format!("{:.2}", h.capacity),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes one table to `dir` under its timestamped file name.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_to_dir(
    kind: ExportKind,
    session: &Session,
    dir: &Path,
    now: NaiveDateTime,
) -> Result<PathBuf> {
    let path = dir.join(kind.file_name(now));
    let file = File::create(&path)?;
    write_csv(kind, session, io::BufWriter::new(file))?;
    info!(path = %path.display(), "export written");
    Ok(path)
}

/// Writes all three tables to `dir`, creating it if needed.
///
/// # Returns
///
/// Paths of the written files, in cells, tasks, history order.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be written.
pub fn export_all(session: &Session, dir: &Path, now: NaiveDateTime) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    ExportKind::ALL
        .into_iter()
        .map(|kind| export_to_dir(kind, session, dir, now))
        .collect()
}
