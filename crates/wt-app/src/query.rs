//! Query helpers for extracting data from loaded runs.

use std::io::Write;
use wt_results::TimeseriesRecord;

use crate::error::{AppError, AppResult};

/// Variables accepted by [`extract_series`].
pub const SERIES_VARIABLES: &[&str] = &[
    "omega_rad_s",
    "yaw_abs_deg",
    "cable_pos_deg",
    "unwinding",
    "rotor_angle_rad",
    "nacelle_dir_deg",
    "misalignment_deg",
    "v_eff_mps",
    "cp",
    "aero_power_kw",
    "electrical_power_kw",
    "rotor_rpm",
    "tip_speed_mps",
    "tsr",
    "cable_turns",
    "aero_torque_nm",
    "generator_torque_nm",
    "omega_target_rad_s",
];

/// Summary of a run's time range and headline numbers.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub time_range: (f64, f64),
    pub record_count: usize,
    pub segment_count: usize,
    pub peak_electrical_power_kw: f64,
    pub mean_electrical_power_kw: f64,
    pub max_abs_cable_turns: f64,
    pub unwinding_records: usize,
    pub final_status: String,
}

/// Get run summary from timeseries records.
pub fn get_run_summary(records: &[TimeseriesRecord]) -> AppResult<RunSummary> {
    let (first, last) = match (records.first(), records.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(AppError::InvalidInput("No records in run".to_string())),
    };

    let power = records.iter().map(|r| r.outputs.electrical_power_kw);
    let peak_electrical_power_kw = power.clone().fold(0.0, f64::max);
    let mean_electrical_power_kw = power.sum::<f64>() / records.len() as f64;
    let max_abs_cable_turns = records
        .iter()
        .map(|r| r.outputs.cable_turns.abs())
        .fold(0.0, f64::max);

    Ok(RunSummary {
        time_range: (first.time_s, last.time_s),
        record_count: records.len(),
        segment_count: last.segment + 1,
        peak_electrical_power_kw,
        mean_electrical_power_kw,
        max_abs_cable_turns,
        unwinding_records: records.iter().filter(|r| r.state.unwinding).count(),
        final_status: last.outputs.status.clone(),
    })
}

/// Value of one variable in a record; `None` for unknown names.
pub fn record_value(record: &TimeseriesRecord, variable: &str) -> Option<f64> {
    let s = &record.state;
    let o = &record.outputs;
    let value = match variable {
        "omega_rad_s" | "omega" => s.omega_rad_s,
        "yaw_abs_deg" => s.yaw_abs_deg,
        "cable_pos_deg" => s.cable_pos_deg,
        "unwinding" => f64::from(u8::from(s.unwinding)),
        "rotor_angle_rad" => s.rotor_angle_rad,
        "nacelle_dir_deg" | "nacelle" => o.nacelle_dir_deg,
        "misalignment_deg" | "misalignment" => o.misalignment_deg,
        "v_eff_mps" | "effective_wind" => o.v_eff_mps,
        "cp" => o.cp,
        "aero_power_kw" => o.aero_power_kw,
        "electrical_power_kw" | "power" => o.electrical_power_kw,
        "rotor_rpm" | "rpm" => o.rotor_rpm,
        "tip_speed_mps" => o.tip_speed_mps,
        "tsr" => o.tsr,
        "cable_turns" => o.cable_turns,
        "aero_torque_nm" => o.aero_torque_nm,
        "generator_torque_nm" => o.generator_torque_nm,
        "omega_target_rad_s" => o.omega_target_rad_s,
        _ => return None,
    };
    Some(value)
}

/// Extract `(time, value)` pairs for a variable.
pub fn extract_series(records: &[TimeseriesRecord], variable: &str) -> AppResult<Vec<(f64, f64)>> {
    let mut series = Vec::with_capacity(records.len());

    for record in records {
        let value = record_value(record, variable).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Unknown variable: {} (expected one of: {})",
                variable,
                SERIES_VARIABLES.join(", ")
            ))
        })?;
        series.push((record.time_s, value));
    }

    Ok(series)
}

/// Write a series as two-column CSV with a header row.
pub fn write_series_csv<W: Write>(
    mut out: W,
    variable: &str,
    series: &[(f64, f64)],
) -> AppResult<()> {
    writeln!(out, "time_s,{}", variable)?;
    for (t, v) in series {
        writeln!(out, "{},{}", t, v)?;
    }
    out.flush()?;
    Ok(())
}
