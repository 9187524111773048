//! Post-hoc aggregate statistics over a session.

use std::fmt;

use serde::Serialize;

use crate::tasks::TaskStatus;

use super::session::Session;

/// Aggregate figures derived from the current session state.
///
/// Computed on demand from the registry, history and ledger so the figures
/// can never drift from the data they describe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of configured cells.
    pub active_cells: usize,
    /// Number of queued tasks in any state.
    pub tasks: usize,
    /// Tasks currently running.
    pub running_tasks: usize,
    /// Tasks that reached 100 %.
    pub completed_tasks: usize,
    /// Mean live voltage across cells (V).
    pub avg_voltage: Option<f64>,
    /// Mean live temperature across cells (°C).
    pub avg_temp: Option<f64>,
    /// Ticks recorded since the last history reset.
    pub ticks: u64,
    /// Number of historical samples.
    pub history_records: usize,
    /// Mean voltage over all samples (V).
    pub history_avg_voltage: Option<f64>,
    /// Mean temperature over all samples (°C).
    pub history_avg_temp: Option<f64>,
    /// Whether automatic ticking is on.
    pub running: bool,
}

impl Summary {
    /// Computes every figure from the session.
    pub fn from_session(session: &Session) -> Self {
        let cells = session.cells().cells();
        let history = session.history();
        let ledger = session.tasks();

        Self {
            active_cells: cells.len(),
            tasks: ledger.len(),
            running_tasks: ledger.running(),
            completed_tasks: ledger
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .count(),
            avg_voltage: mean(cells.iter().map(|c| c.voltage)),
            avg_temp: mean(cells.iter().map(|c| c.temp)),
            ticks: session.tick_count(),
            history_records: history.len(),
            history_avg_voltage: mean(history.iter().map(|h| h.voltage)),
            history_avg_temp: mean(history.iter().map(|h| h.temp)),
            running: session.is_running(),
        }
    }

    /// One-line status used by the headless runner.
    pub fn status_line(&self) -> String {
        format!(
            "t={:>4} | cells={:>2}  avg_v={}  avg_t={} | tasks={} running={} done={}",
            self.ticks,
            self.active_cells,
            fmt_opt(self.avg_voltage, 2, "V"),
            fmt_opt(self.avg_temp, 1, "°C"),
            self.tasks,
            self.running_tasks,
            self.completed_tasks,
        )
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn fmt_opt(value: Option<f64>, decimals: usize, unit: &str) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.decimals$}{unit}"))
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Session Summary ---")?;
        writeln!(f, "Active cells:          {}", self.active_cells)?;
        writeln!(
            f,
            "Tasks:                 {} ({} running, {} completed)",
            self.tasks, self.running_tasks, self.completed_tasks
        )?;
        writeln!(
            f,
            "Avg voltage:           {}",
            fmt_opt(self.avg_voltage, 2, " V")
        )?;
        writeln!(f, "Ticks:                 {}", self.ticks)?;
        writeln!(f, "Total records:         {}", self.history_records)?;
        writeln!(
            f,
            "History avg voltage:   {}",
            fmt_opt(self.history_avg_voltage, 2, " V")
        )?;
        write!(
            f,
            "History avg temp:      {}",
            fmt_opt(self.history_avg_temp, 1, " °C")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::Chemistry;
    use crate::tasks::TaskKind;

    #[test]
    fn empty_session_has_no_averages() {
        let s = Summary::from_session(&Session::new(Some(0)));
        assert_eq!(s.active_cells, 0);
        assert_eq!(s.avg_voltage, None);
        assert_eq!(s.history_avg_temp, None);
        assert!(format!("{s}").contains("Avg voltage:           -"));
    }

    #[test]
    fn fresh_cells_average_nominal_voltage() {
        let mut session = Session::new(Some(1));
        session.create_cells(Chemistry::Lfp, 2);
        session.create_cells(Chemistry::Nmc, 2);
        let s = session.summary();
        assert_eq!(s.active_cells, 4);
        let avg = s.avg_voltage.unwrap();
        assert!((avg - 3.4).abs() < 1e-9);
    }

    #[test]
    fn counts_history_and_tasks() {
        let mut session = Session::new(Some(2));
        session.create_cells(Chemistry::Nmc, 3);
        session.tick();
        session.tick();
        let id = session.add_task(TaskKind::Idle { time_seconds: 60 });
        session.add_task(TaskKind::Idle { time_seconds: 60 });
        session.start_task(&id).unwrap();

        let s = session.summary();
        assert_eq!(s.history_records, 6);
        assert_eq!(s.ticks, 2);
        assert_eq!(s.tasks, 2);
        assert_eq!(s.running_tasks, 1);
        assert!(s.history_avg_voltage.is_some());
        assert!(s.status_line().contains("cells= 3"));
    }
}
