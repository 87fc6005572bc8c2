use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use wt_results::{
    OutputSnapshot, ResultsError, RunInfo, RunManifest, RunStore, StateSnapshot, TimeseriesRecord,
};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn manifest(run_id: &str, scenario: &str) -> RunManifest {
    RunManifest::new(
        run_id.to_string(),
        scenario,
        "0.1.0",
        RunInfo {
            segments: 1,
            ticks: 2,
            t_end_s: 0.3,
            record_every: 1,
        },
    )
}

fn record(time_s: f64, status: &str) -> TimeseriesRecord {
    TimeseriesRecord {
        time_s,
        segment: 0,
        paused: false,
        state: StateSnapshot {
            omega_rad_s: 0.6,
            yaw_abs_deg: 270.0,
            cable_pos_deg: 0.0,
            unwinding: false,
            rotor_angle_rad: 0.09,
        },
        outputs: OutputSnapshot {
            nacelle_dir_deg: 270.0,
            misalignment_deg: 0.0,
            v_eff_mps: 10.0,
            cp: 0.42,
            aero_power_kw: 8_000.0,
            electrical_power_kw: 7_680.0,
            rotor_rpm: 5.73,
            tip_speed_mps: 60.0,
            tsr: 6.0,
            cable_turns: 0.0,
            status: status.to_string(),
            aero_torque_nm: 1.3e7,
            generator_torque_nm: 1.2e7,
            omega_target_rad_s: 0.63,
        },
    }
}

#[test]
fn save_list_load_roundtrip() {
    let scenario_dir = unique_temp_dir("wt_results_scenario");
    fs::create_dir_all(&scenario_dir).expect("failed to create temp scenario dir");
    let scenario_path = scenario_dir.join("scenario.yaml");
    fs::write(&scenario_path, "version: 1\nname: test\n").expect("failed to write scenario");

    let store = RunStore::for_scenario(&scenario_path).expect("failed to create run store");
    assert!(store.root_dir().ends_with(".windsim/runs"));

    let records = vec![record(0.15, "NORMAL"), record(0.3, "CABLE LIMIT")];
    store
        .save_run(&manifest("run-123", "test"), &records)
        .expect("failed to save run");
    store
        .save_run(&manifest("run-456", "other"), &records[..1])
        .expect("failed to save run");

    assert!(store.has_run("run-123"));
    let runs = store.list_runs("test").expect("failed to list runs");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, "run-123");

    let loaded_manifest = store
        .load_manifest("run-123")
        .expect("failed to load manifest");
    assert_eq!(loaded_manifest.scenario_name, "test");
    assert_eq!(loaded_manifest.info.ticks, 2);
    assert!(chrono::DateTime::parse_from_rfc3339(&loaded_manifest.timestamp).is_ok());

    let loaded_records = store
        .load_timeseries("run-123")
        .expect("failed to load records");
    assert_eq!(loaded_records, records);

    store.delete_run("run-123").expect("failed to delete run");
    assert!(!store.has_run("run-123"));
    assert!(matches!(
        store.load_manifest("run-123"),
        Err(ResultsError::RunNotFound { .. })
    ));

    let _ = fs::remove_dir_all(&scenario_dir);
}

#[test]
fn stray_directories_are_ignored() {
    let root = unique_temp_dir("wt_results_stray");
    let store = RunStore::new(root.clone()).expect("failed to create run store");
    fs::create_dir_all(root.join("not-a-run")).expect("failed to create stray dir");
    fs::write(root.join("notes.txt"), "hello").expect("failed to write stray file");

    assert!(store.list_runs("test").expect("list").is_empty());

    let _ = fs::remove_dir_all(&root);
}
