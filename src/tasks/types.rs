//! Task kinds, lifecycle states, and the task record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Progress value at which a running task completes.
pub const PROGRESS_DONE: u8 = 100;

/// An operation queued against the cells, carrying only its own parameters.
///
/// Serialized with a `kind` tag (`"CC_CV"`, `"IDLE"`, `"CC_CD"`), which is
/// also the TOML shape used in scenario files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TaskKind {
    /// Constant-current then constant-voltage charge.
    #[serde(rename = "CC_CV")]
    CcCv {
        /// Free-form CC/CP setpoint, e.g. `"5A"` or `"10W"`.
        #[serde(default)]
        cc_cp: String,
        cv_voltage: f64,
        current: f64,
        capacity: f64,
        time_seconds: u64,
    },
    /// Hold with no load.
    #[serde(rename = "IDLE")]
    Idle { time_seconds: u64 },
    /// Constant-current discharge.
    #[serde(rename = "CC_CD")]
    CcCd {
        #[serde(default)]
        cc_cp: String,
        voltage: f64,
        capacity: f64,
        time_seconds: u64,
    },
}

impl TaskKind {
    /// Wire name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CcCv { .. } => "CC_CV",
            Self::Idle { .. } => "IDLE",
            Self::CcCd { .. } => "CC_CD",
        }
    }

    /// Requested duration (s). Informational only; progress is not tied to it.
    pub fn time_seconds(&self) -> u64 {
        match self {
            Self::CcCv { time_seconds, .. }
            | Self::Idle { time_seconds }
            | Self::CcCd { time_seconds, .. } => *time_seconds,
        }
    }

    /// Value of one parameter column, or `None` if this kind has no such field.
    pub fn param(&self, param: TaskParam) -> Option<String> {
        match (self, param) {
            (Self::CcCv { cc_cp, .. } | Self::CcCd { cc_cp, .. }, TaskParam::CcCp) => {
                Some(cc_cp.clone())
            }
            (Self::CcCv { cv_voltage, .. }, TaskParam::CvVoltage) => Some(cv_voltage.to_string()),
            (Self::CcCd { voltage, .. }, TaskParam::Voltage) => Some(voltage.to_string()),
            (Self::CcCv { current, .. }, TaskParam::Current) => Some(current.to_string()),
            (
                Self::CcCv { capacity, .. } | Self::CcCd { capacity, .. },
                TaskParam::Capacity,
            ) => Some(capacity.to_string()),
            (_, TaskParam::TimeSeconds) => Some(self.time_seconds().to_string()),
            _ => None,
        }
    }

    /// Lists parameter problems as `(field, message)` pairs.
    ///
    /// Durations must be at least one second; electrical values must not be
    /// negative.
    pub fn problems(&self) -> Vec<(&'static str, &'static str)> {
        let mut out = Vec::new();
        if self.time_seconds() < 1 {
            out.push(("time_seconds", "must be >= 1"));
        }
        let non_negative: Vec<(&'static str, f64)> = match self {
            Self::CcCv {
                cv_voltage,
                current,
                capacity,
                ..
            } => vec![
                ("cv_voltage", *cv_voltage),
                ("current", *current),
                ("capacity", *capacity),
            ],
            Self::Idle { .. } => Vec::new(),
            Self::CcCd {
                voltage, capacity, ..
            } => vec![("voltage", *voltage), ("capacity", *capacity)],
        };
        for (field, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                out.push((field, "must be >= 0"));
            }
        }
        out
    }
}

/// Kind-specific parameter columns, in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskParam {
    CcCp,
    CvVoltage,
    Voltage,
    Current,
    Capacity,
    TimeSeconds,
}

impl TaskParam {
    pub const ALL: [TaskParam; 6] = [
        TaskParam::CcCp,
        TaskParam::CvVoltage,
        TaskParam::Voltage,
        TaskParam::Current,
        TaskParam::Capacity,
        TaskParam::TimeSeconds,
    ];

    /// Column header for this parameter.
    pub fn column(self) -> &'static str {
        match self {
            Self::CcCp => "cc_cp",
            Self::CvVoltage => "cv_voltage",
            Self::Voltage => "voltage",
            Self::Current => "current",
            Self::Capacity => "capacity",
            Self::TimeSeconds => "time_seconds",
        }
    }
}

/// Task lifecycle: `Pending -> Running -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A queued task and its progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    /// Sequential id, e.g. `task_3`.
    pub task_id: String,
    /// Kind and parameters, flattened into the JSON object.
    #[serde(flatten)]
    pub kind: TaskKind,
    pub status: TaskStatus,
    /// Completion percentage, 0..=100.
    pub progress: u8,
}

impl Task {
    /// Creates a pending task at 0 % progress.
    pub fn new(task_id: String, kind: TaskKind) -> Self {
        Self {
            task_id,
            kind,
            status: TaskStatus::Pending,
            progress: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cc_cv() -> TaskKind {
        TaskKind::CcCv {
            cc_cp: "5A".into(),
            cv_voltage: 3.6,
            current: 1.0,
            capacity: 10.0,
            time_seconds: 3600,
        }
    }

    #[test]
    fn kind_names_match_wire_format() {
        assert_eq!(cc_cv().name(), "CC_CV");
        assert_eq!(TaskKind::Idle { time_seconds: 5 }.name(), "IDLE");
    }

    #[test]
    fn params_only_exist_for_their_kind() {
        let idle = TaskKind::Idle { time_seconds: 1800 };
        assert_eq!(idle.param(TaskParam::TimeSeconds).as_deref(), Some("1800"));
        assert_eq!(idle.param(TaskParam::CcCp), None);
        assert_eq!(idle.param(TaskParam::Voltage), None);

        let charge = cc_cv();
        assert_eq!(charge.param(TaskParam::CvVoltage).as_deref(), Some("3.6"));
        assert_eq!(charge.param(TaskParam::Voltage), None);
        assert_eq!(charge.param(TaskParam::CcCp).as_deref(), Some("5A"));
    }

    #[test]
    fn problems_flags_zero_duration_and_negative_values() {
        assert!(cc_cv().problems().is_empty());

        let bad = TaskKind::CcCd {
            cc_cp: String::new(),
            voltage: -1.0,
            capacity: 2.0,
            time_seconds: 0,
        };
        let fields: Vec<&str> = bad.problems().iter().map(|(f, _)| *f).collect();
        assert_eq!(fields, vec!["time_seconds", "voltage"]);
    }

    #[test]
    fn deserializes_tagged_kind() {
        let kind: TaskKind = toml::from_str(
            r#"
kind = "CC_CD"
cc_cp = "10W"
voltage = 3.2
capacity = 10.0
time_seconds = 3600
"#,
        )
        .unwrap();
        assert_eq!(kind.name(), "CC_CD");
        assert_eq!(kind.time_seconds(), 3600);
    }

    #[test]
    fn new_task_is_pending() {
        let t = Task::new("task_1".into(), cc_cv());
        assert_eq!(t.status, TaskStatus::Pending);
        assert_eq!(t.progress, 0);
    }
}
