mod common;

use std::fs;

use cell_sim::io::export::{ExportKind, export_all, write_csv};
use cell_sim::tasks::TaskKind;

fn export_string(kind: ExportKind, session: &cell_sim::sim::session::Session) -> String {
    let mut buf = Vec::new();
    write_csv(kind, session, &mut buf).expect("in-memory export succeeds");
    String::from_utf8(buf).expect("export is UTF-8")
}

#[test]
fn export_all_writes_timestamped_files_with_headers() {
    let dir = std::env::temp_dir().join(format!("cell_sim_it_export_{}", std::process::id()));
    let mut session = common::session_with_cells(1, 1);
    session.add_task(common::idle());
    for _ in 0..3 {
        session.tick();
    }

    let paths = export_all(&session, &dir, common::start()).expect("export succeeds");
    let names: Vec<String> = paths
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "battery_cells_20250101_000000.csv",
            "battery_tasks_20250101_000000.csv",
            "battery_historical_20250101_000000.csv",
        ]
    );

    let history = fs::read_to_string(&paths[2]).expect("history file readable");
    assert_eq!(history.lines().count(), 1 + 3 * 2);
    assert!(history.starts_with("timestamp,cell_id,voltage,current,temp,capacity\n"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn history_rows_match_registry_samples() {
    let mut session = common::session_with_cells(2, 0);
    session.tick();
    let csv = export_string(ExportKind::History, &session);

    let mut rdr = csv::Reader::from_reader(csv.as_bytes());
    let rows: Vec<csv::StringRecord> = rdr.records().filter_map(Result::ok).collect();
    assert_eq!(rows.len(), 2);
    for (row, sample) in rows.iter().zip(session.history()) {
        assert_eq!(&row[0], "2025-01-01 00:00:00.000000");
        assert_eq!(&row[1], sample.cell_id);
        assert_eq!(row[2].parse::<f64>().ok(), Some(sample.voltage));
    }
}

#[test]
fn task_export_tracks_deletions_and_mixed_kinds() {
    let mut session = common::empty_session();
    session.add_task(common::cc_cv());
    let idle = session.add_task(common::idle());
    session.add_task(TaskKind::CcCd {
        cc_cp: "10W".to_string(),
        voltage: 3.2,
        capacity: 10.0,
        time_seconds: 3600,
    });

    let before = export_string(ExportKind::Tasks, &session);
    assert_eq!(before.lines().count(), 4);
    assert_eq!(
        before.lines().next(),
        Some(
            "task_id,task_type,status,progress,cc_cp,cv_voltage,voltage,current,capacity,time_seconds"
        )
    );

    session.delete_task(&idle).expect("task exists");
    let after = export_string(ExportKind::Tasks, &session);
    assert_eq!(after.lines().count(), 3);
    assert!(!after.contains(&format!("{idle},")));
}

#[test]
fn cleared_session_exports_headers_only() {
    let mut session = common::session_with_cells(2, 2);
    session.tick();
    session.clear();
    assert_eq!(export_string(ExportKind::Cells, &session).lines().count(), 1);
    assert_eq!(export_string(ExportKind::History, &session).lines().count(), 1);
}
