//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::cells::Chemistry;
use crate::cells::registry::{MAX_BATCH, MIN_BATCH};
use crate::tasks::TaskKind;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the `empty` preset. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or pick a built-in preset with
/// [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Timing, seeding and startup behaviour.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Cell batches created at startup, in order.
    #[serde(default)]
    pub cells: Vec<CellBatchConfig>,
    /// Tasks queued at startup, in order.
    #[serde(default)]
    pub tasks: Vec<TaskKind>,
}

/// Timing, seeding and startup behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Random seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Interval between automatic cell ticks while running (ms, > 0).
    pub tick_interval_ms: u64,
    /// Interval between task progress steps (ms, > 0).
    pub progress_interval_ms: u64,
    /// Set the running flag at startup.
    pub autostart: bool,
    /// Start every configured task at startup.
    pub start_tasks: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_interval_ms: 1000,
            progress_interval_ms: 1000,
            autostart: false,
            start_tasks: false,
        }
    }
}

/// A batch of identical-chemistry cells.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellBatchConfig {
    /// `"LFP"` or `"NMC"`.
    pub chemistry: Chemistry,
    /// Number of cells (1..=20).
    pub count: usize,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.tick_interval_ms"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ScenarioConfig {
    /// Names accepted by [`ScenarioConfig::from_preset`].
    pub const PRESETS: [&str; 3] = ["empty", "demo", "stress"];

    /// No cells, no tasks, one-second ticks.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Two cells of each chemistry and one task of each kind.
    pub fn demo() -> Self {
        Self {
            simulation: SimulationConfig {
                seed: Some(42),
                ..SimulationConfig::default()
            },
            cells: vec![
                CellBatchConfig {
                    chemistry: Chemistry::Lfp,
                    count: 2,
                },
                CellBatchConfig {
                    chemistry: Chemistry::Nmc,
                    count: 2,
                },
            ],
            tasks: vec![
                TaskKind::CcCv {
                    cc_cp: "5A".to_string(),
                    cv_voltage: 3.6,
                    current: 1.0,
                    capacity: 10.0,
                    time_seconds: 3600,
                },
                TaskKind::Idle { time_seconds: 1800 },
                TaskKind::CcCd {
                    cc_cp: "10W".to_string(),
                    voltage: 3.2,
                    capacity: 10.0,
                    time_seconds: 3600,
                },
            ],
        }
    }

    /// Full batches of both chemistries ticking every 100 ms from startup.
    pub fn stress() -> Self {
        Self {
            simulation: SimulationConfig {
                tick_interval_ms: 100,
                progress_interval_ms: 100,
                autostart: true,
                start_tasks: true,
                ..SimulationConfig::default()
            },
            cells: vec![
                CellBatchConfig {
                    chemistry: Chemistry::Lfp,
                    count: MAX_BATCH,
                },
                CellBatchConfig {
                    chemistry: Chemistry::Nmc,
                    count: MAX_BATCH,
                },
            ],
            tasks: (0..5)
                .map(|i| TaskKind::Idle {
                    time_seconds: 600 * (i + 1),
                })
                .collect(),
        }
    }

    /// Returns a preset configuration by name.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the name is not a known preset.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "empty" => Ok(Self::empty()),
            "demo" => Ok(Self::demo()),
            "stress" => Ok(Self::stress()),
            _ => Err(ConfigError {
                field: "preset".into(),
                message: format!(
                    "unknown preset \"{name}\"; expected one of: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] on malformed TOML or unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".into(),
            message: e.to_string(),
        })
    }

    /// Reads and parses a TOML scenario file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "file".into(),
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks every constraint and returns all violations.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.tick_interval_ms == 0 {
            errors.push(ConfigError {
                field: "simulation.tick_interval_ms".into(),
                message: "must be > 0".into(),
            });
        }
        if s.progress_interval_ms == 0 {
            errors.push(ConfigError {
                field: "simulation.progress_interval_ms".into(),
                message: "must be > 0".into(),
            });
        }

        for (i, batch) in self.cells.iter().enumerate() {
            if !(MIN_BATCH..=MAX_BATCH).contains(&batch.count) {
                errors.push(ConfigError {
                    field: format!("cells[{i}].count"),
                    message: format!("must be in [{MIN_BATCH}, {MAX_BATCH}]"),
                });
            }
        }

        for (i, task) in self.tasks.iter().enumerate() {
            for (field, message) in task.problems() {
                errors.push(ConfigError {
                    field: format!("tasks[{i}].{field}"),
                    message: message.into(),
                });
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
        assert_eq!(e.field, "preset");
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
seed = 7
tick_interval_ms = 250
autostart = true

[[cells]]
chemistry = "LFP"
count = 2

[[cells]]
chemistry = "NMC"
count = 1

[[tasks]]
kind = "IDLE"
time_seconds = 1800

[[tasks]]
kind = "CC_CV"
cc_cp = "5A"
cv_voltage = 3.6
current = 1.0
capacity = 10.0
time_seconds = 3600
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        let cfg = cfg.as_ref();
        assert_eq!(cfg.and_then(|c| c.simulation.seed), Some(7));
        assert_eq!(cfg.map(|c| c.simulation.tick_interval_ms), Some(250));
        assert_eq!(cfg.map(|c| c.simulation.progress_interval_ms), Some(1000));
        assert_eq!(cfg.map(|c| c.cells.len()), Some(2));
        assert_eq!(cfg.map(|c| c.tasks[1].name()), Some("CC_CV"));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
tick_interval_ms = 100
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn unknown_chemistry_rejected() {
        let toml = r#"
[[cells]]
chemistry = "LCO"
count = 1
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_zero_intervals() {
        let mut cfg = ScenarioConfig::empty();
        cfg.simulation.tick_interval_ms = 0;
        cfg.simulation.progress_interval_ms = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.tick_interval_ms"));
        assert!(errors.iter().any(|e| e.field == "simulation.progress_interval_ms"));
    }

    #[test]
    fn validation_catches_batch_out_of_range() {
        let mut cfg = ScenarioConfig::demo();
        cfg.cells[1].count = 21;
        let errors = cfg.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "cells[1].count");
    }

    #[test]
    fn validation_catches_bad_task_parameters() {
        let mut cfg = ScenarioConfig::empty();
        cfg.tasks.push(TaskKind::Idle { time_seconds: 0 });
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "tasks[0].time_seconds"));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = ScenarioConfig::from_toml_str("[simulation]\nautostart = true\n");
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.autostart), Some(true));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.tick_interval_ms), Some(1000));
        assert_eq!(cfg.as_ref().map(|c| c.cells.is_empty()), Some(true));
    }

    #[test]
    fn config_error_display() {
        let e = ConfigError {
            field: "cells[0].count".into(),
            message: "must be in [1, 20]".into(),
        };
        assert_eq!(e.to_string(), "config error: cells[0].count: must be in [1, 20]");
    }
}
