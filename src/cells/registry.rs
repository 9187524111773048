use chrono::NaiveDateTime;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::cell::Cell;
use super::types::Chemistry;
use crate::error::{Result, SimError};
use crate::sim::clock::SimClock;

/// Smallest batch accepted by [`CellRegistry::create_cells`].
pub const MIN_BATCH: usize = 1;
/// Largest batch accepted by [`CellRegistry::create_cells`].
pub const MAX_BATCH: usize = 20;

/// Snapshot of one cell taken at the end of a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalSample {
    /// Synthetic timestamp: session start plus one second per tick.
    pub timestamp: NaiveDateTime,
    pub cell_id: String,
    pub voltage: f64,
    pub current: f64,
    pub temp: f64,
    pub capacity: f64,
}

impl From<(&Cell, NaiveDateTime)> for HistoricalSample {
    fn from((cell, timestamp): (&Cell, NaiveDateTime)) -> Self {
        Self {
            timestamp,
            cell_id: cell.cell_id.clone(),
            voltage: cell.voltage,
            current: cell.current,
            temp: cell.temp,
            capacity: cell.capacity,
        }
    }
}

/// Owns every configured cell, the append-only sample history, and the
/// tick counter that stamps it.
///
/// Cells keep insertion order and are never removed one at a time; only
/// [`CellRegistry::clear`] drops them.
#[derive(Debug, Clone)]
pub struct CellRegistry {
    cells: Vec<Cell>,
    history: Vec<HistoricalSample>,
    clock: SimClock,
}

impl CellRegistry {
    /// Creates an empty registry stamping samples from `clock`.
    pub fn new(clock: SimClock) -> Self {
        Self {
            cells: Vec::new(),
            history: Vec::new(),
            clock,
        }
    }

    /// Appends a batch of new cells of one chemistry.
    ///
    /// Sequence numbers continue from the current registry size. `count` is
    /// clamped into `[MIN_BATCH, MAX_BATCH]`.
    ///
    /// # Returns
    ///
    /// Ids of the created cells, in creation order.
    pub fn create_cells(
        &mut self,
        chemistry: Chemistry,
        count: usize,
        rng: &mut impl Rng,
    ) -> Vec<String> {
        let count = count.clamp(MIN_BATCH, MAX_BATCH);
        let start = self.cells.len() + 1;
        let mut ids = Vec::with_capacity(count);
        for seq in start..start + count {
            let cell = Cell::new(seq, chemistry, rng);
            ids.push(cell.cell_id.clone());
            self.cells.push(cell);
        }
        info!(%chemistry, count, total = self.cells.len(), "cells created");
        ids
    }

    /// Advances every cell by one simulation step and records a sample per
    /// cell.
    ///
    /// Does nothing when the registry is empty; the tick counter only moves
    /// when samples are recorded.
    ///
    /// # Returns
    ///
    /// Number of samples appended.
    pub fn tick(&mut self, rng: &mut impl Rng) -> usize {
        if self.cells.is_empty() {
            return 0;
        }

        for cell in &mut self.cells {
            cell.perturb(rng);
        }

        let timestamp = self.clock.timestamp();
        self.history
            .extend(self.cells.iter().map(|c| HistoricalSample::from((c, timestamp))));
        self.clock.advance();

        debug!(
            tick = self.clock.ticks(),
            samples = self.cells.len(),
            "cells ticked"
        );
        self.cells.len()
    }

    /// Drops all cells and the whole history.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.history.clear();
        info!("cells and history cleared");
    }

    /// Drops the history and restarts the tick counter; cells are kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.clock.reset();
        info!("history cleared");
    }

    /// Looks up a cell by id.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::CellNotFound`] for unknown ids.
    pub fn get(&self, cell_id: &str) -> Result<&Cell> {
        self.cells
            .iter()
            .find(|c| c.cell_id == cell_id)
            .ok_or_else(|| {
                warn!(cell_id, "unknown cell");
                SimError::CellNotFound(cell_id.to_string())
            })
    }

    /// All cells in insertion order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All recorded samples, oldest first.
    pub fn history(&self) -> &[HistoricalSample] {
        &self.history
    }

    /// Number of ticks that produced samples since the last history reset.
    pub fn tick_count(&self) -> u64 {
        self.clock.ticks()
    }

    /// The clock stamping samples.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rand::{SeedableRng, rngs::StdRng};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    fn registry() -> CellRegistry {
        CellRegistry::new(SimClock::new(start()))
    }

    #[test]
    fn create_cells_continues_sequence() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut reg = registry();
        let first = reg.create_cells(Chemistry::Lfp, 2, &mut rng);
        let second = reg.create_cells(Chemistry::Nmc, 3, &mut rng);
        assert_eq!(first, vec!["cell_1_lfp", "cell_2_lfp"]);
        assert_eq!(second, vec!["cell_3_nmc", "cell_4_nmc", "cell_5_nmc"]);
        assert_eq!(reg.len(), 5);
    }

    #[test]
    fn create_cells_clamps_count() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut reg = registry();
        assert_eq!(reg.create_cells(Chemistry::Lfp, 0, &mut rng).len(), 1);
        assert_eq!(reg.create_cells(Chemistry::Lfp, 99, &mut rng).len(), MAX_BATCH);
    }

    #[test]
    fn tick_on_empty_registry_is_noop() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut reg = registry();
        assert_eq!(reg.tick(&mut rng), 0);
        assert_eq!(reg.tick_count(), 0);
        assert!(reg.history().is_empty());
    }

    #[test]
    fn tick_records_one_sample_per_cell_with_second_spacing() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut reg = registry();
        reg.create_cells(Chemistry::Nmc, 3, &mut rng);
        reg.tick(&mut rng);
        reg.tick(&mut rng);

        assert_eq!(reg.history().len(), 6);
        assert_eq!(reg.tick_count(), 2);
        assert_eq!(reg.history()[0].timestamp, start());
        assert_eq!(reg.history()[3].timestamp, start() + Duration::seconds(1));

        let last = &reg.history()[5];
        let cell = reg.get(&last.cell_id).unwrap();
        assert_eq!(last.voltage, cell.voltage);
        assert_eq!(last.capacity, cell.capacity);
    }

    #[test]
    fn clear_empties_cells_and_history() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut reg = registry();
        reg.create_cells(Chemistry::Lfp, 4, &mut rng);
        reg.tick(&mut rng);
        reg.clear();
        assert!(reg.is_empty());
        assert!(reg.history().is_empty());

        // sequence restarts after a clear
        let ids = reg.create_cells(Chemistry::Lfp, 1, &mut rng);
        assert_eq!(ids, vec!["cell_1_lfp"]);
    }

    #[test]
    fn clear_history_keeps_cells_and_resets_counter() {
        let mut rng = StdRng::seed_from_u64(15);
        let mut reg = registry();
        reg.create_cells(Chemistry::Lfp, 2, &mut rng);
        reg.tick(&mut rng);
        reg.tick(&mut rng);
        reg.clear_history();
        assert_eq!(reg.len(), 2);
        assert!(reg.history().is_empty());
        assert_eq!(reg.tick_count(), 0);

        reg.tick(&mut rng);
        assert_eq!(reg.history()[0].timestamp, start());
    }

    #[test]
    fn get_unknown_cell_fails() {
        let reg = registry();
        let err = reg.get("cell_1_lfp").unwrap_err();
        assert!(matches!(err, SimError::CellNotFound(id) if id == "cell_1_lfp"));
    }
}
