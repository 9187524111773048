//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};

use cell_sim::cells::Chemistry;
use cell_sim::sim::session::Session;
use cell_sim::tasks::TaskKind;

/// Default seed for reproducible sessions.
pub const SEED: u64 = 42;

/// Fixed session start (2025-01-01 00:00:00).
pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid fixed start")
}

/// Empty seeded session anchored at [`start`].
pub fn empty_session() -> Session {
    Session::with_start(start(), Some(SEED))
}

/// Seeded session with `lfp` LFP cells followed by `nmc` NMC cells.
pub fn session_with_cells(lfp: usize, nmc: usize) -> Session {
    let mut session = empty_session();
    if lfp > 0 {
        session.create_cells(Chemistry::Lfp, lfp);
    }
    if nmc > 0 {
        session.create_cells(Chemistry::Nmc, nmc);
    }
    session
}

/// A CC_CV task with typical parameters.
pub fn cc_cv() -> TaskKind {
    TaskKind::CcCv {
        cc_cp: "5A".to_string(),
        cv_voltage: 3.6,
        current: 1.0,
        capacity: 10.0,
        time_seconds: 3600,
    }
}

/// A 30-minute IDLE task.
pub fn idle() -> TaskKind {
    TaskKind::Idle { time_seconds: 1800 }
}
