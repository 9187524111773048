use rand::Rng;
use serde::Serialize;

use super::types::{CellStatus, Chemistry, TEMP_MAX_C, TEMP_MIN_C, round_to};

/// Largest voltage change applied in one tick (V, symmetric).
const VOLTAGE_STEP_V: f64 = 0.05;
/// Largest temperature change applied in one tick (°C, symmetric).
const TEMP_STEP_C: f64 = 1.0;
/// Largest current change applied in one tick (A, symmetric).
const CURRENT_STEP_A: f64 = 0.1;

/// A simulated battery cell with live telemetry.
///
/// Voltage, temperature and current are kept inside their bounds after every
/// update; `capacity` is always `voltage * current` rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    /// Composite id, e.g. `cell_3_lfp`.
    pub cell_id: String,

    /// Cell chemistry.
    #[serde(rename = "type")]
    pub chemistry: Chemistry,

    /// Terminal voltage (V), 2 decimals.
    pub voltage: f64,

    /// Current (A, >= 0), 2 decimals.
    pub current: f64,

    /// Temperature (°C, 20..=50), 1 decimal.
    pub temp: f64,

    /// Derived `voltage * current` (Wh), 2 decimals.
    pub capacity: f64,

    /// Lower voltage bound fixed at creation (V).
    pub min_voltage: f64,

    /// Upper voltage bound fixed at creation (V).
    pub max_voltage: f64,

    /// Operational status.
    pub status: CellStatus,
}

impl Cell {
    /// Creates a cell at the chemistry's nominal voltage with random
    /// current (0.1..=2.0 A) and temperature (25..=40 °C).
    ///
    /// # Arguments
    ///
    /// * `seq` - Sequence number (1-based) forming the first half of the id
    /// * `chemistry` - Cell chemistry
    /// * `rng` - Random source for the initial current and temperature
    pub fn new(seq: usize, chemistry: Chemistry, rng: &mut impl Rng) -> Self {
        let voltage = chemistry.nominal_voltage();
        let (min_voltage, max_voltage) = chemistry.voltage_bounds();
        let current = round_to(rng.random_range(0.1..=2.0), 2);
        let temp = round_to(rng.random_range(25.0..=40.0), 1);

        Self {
            cell_id: format!("cell_{seq}_{}", chemistry.tag()),
            chemistry,
            voltage,
            current,
            temp,
            capacity: round_to(voltage * current, 2),
            min_voltage,
            max_voltage,
            status: CellStatus::Active,
        }
    }

    /// Applies one tick of bounded random drift.
    ///
    /// Deltas are drawn uniformly, the new values are clamped to the cell's
    /// voltage bounds, `[20, 50]` °C and `>= 0` A, then rounded. Capacity is
    /// recomputed from the rounded voltage and current.
    pub fn perturb(&mut self, rng: &mut impl Rng) {
        let dv = rng.random_range(-VOLTAGE_STEP_V..=VOLTAGE_STEP_V);
        let dt = rng.random_range(-TEMP_STEP_C..=TEMP_STEP_C);
        let di = rng.random_range(-CURRENT_STEP_A..=CURRENT_STEP_A);

        let voltage = (self.voltage + dv).clamp(self.min_voltage, self.max_voltage);
        let temp = (self.temp + dt).clamp(TEMP_MIN_C, TEMP_MAX_C);
        let current = (self.current + di).max(0.0);

        self.voltage = round_to(voltage, 2);
        self.temp = round_to(temp, 1);
        self.current = round_to(current, 2).max(0.0);
        self.capacity = round_to(self.voltage * self.current, 2);
    }
}
