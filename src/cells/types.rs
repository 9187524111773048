//! Common types for cell simulation: chemistries, status, and rounding.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest temperature a cell can report (°C).
pub const TEMP_MIN_C: f64 = 20.0;
/// Highest temperature a cell can report (°C).
pub const TEMP_MAX_C: f64 = 50.0;

/// Battery chemistry, which fixes a cell's nominal voltage and bounds.
///
/// # Examples
///
/// ```
/// use cell_sim::cells::Chemistry;
///
/// assert_eq!(Chemistry::Lfp.nominal_voltage(), 3.2);
/// assert_eq!(Chemistry::Nmc.voltage_bounds(), (3.2, 4.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chemistry {
    /// Lithium iron phosphate.
    #[serde(rename = "LFP", alias = "lfp")]
    Lfp,
    /// Nickel manganese cobalt.
    #[serde(rename = "NMC", alias = "nmc")]
    Nmc,
}

impl Chemistry {
    /// Both chemistries, in display order.
    pub const ALL: [Chemistry; 2] = [Chemistry::Lfp, Chemistry::Nmc];

    /// Voltage a freshly created cell starts at (V).
    pub fn nominal_voltage(self) -> f64 {
        match self {
            Self::Lfp => 3.2,
            Self::Nmc => 3.6,
        }
    }

    /// Inclusive `(min, max)` voltage range (V).
    pub fn voltage_bounds(self) -> (f64, f64) {
        match self {
            Self::Lfp => (2.8, 3.6),
            Self::Nmc => (3.2, 4.0),
        }
    }

    /// Upper-case name used in exports and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lfp => "LFP",
            Self::Nmc => "NMC",
        }
    }

    /// Lower-case tag used inside cell ids.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Lfp => "lfp",
            Self::Nmc => "nmc",
        }
    }
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational status of a cell. Every created cell is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStatus {
    Active,
}

impl CellStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
        }
    }
}

/// Rounds `value` half away from zero to `decimals` places.
///
/// # Examples
///
/// ```
/// use cell_sim::cells::types::round_to;
///
/// assert_eq!(round_to(3.14159, 2), 3.14);
/// assert_eq!(round_to(27.46, 1), 27.5);
/// ```
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
