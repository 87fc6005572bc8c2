//! Result data types.

use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub scenario_name: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub engine_version: String,
    pub info: RunInfo,
}

impl RunManifest {
    /// Manifest stamped with the current time.
    pub fn new(
        run_id: RunId,
        scenario_name: impl Into<String>,
        engine_version: impl Into<String>,
        info: RunInfo,
    ) -> Self {
        Self {
            run_id,
            scenario_name: scenario_name.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            engine_version: engine_version.into(),
            info,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunInfo {
    pub segments: usize,
    pub ticks: usize,
    pub t_end_s: f64,
    pub record_every: usize,
}

/// One recorded tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeseriesRecord {
    pub time_s: f64,
    pub segment: usize,
    #[serde(default)]
    pub paused: bool,
    pub state: StateSnapshot,
    pub outputs: OutputSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateSnapshot {
    pub omega_rad_s: f64,
    pub yaw_abs_deg: f64,
    pub cable_pos_deg: f64,
    pub unwinding: bool,
    pub rotor_angle_rad: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputSnapshot {
    pub nacelle_dir_deg: f64,
    pub misalignment_deg: f64,
    pub v_eff_mps: f64,
    pub cp: f64,
    pub aero_power_kw: f64,
    pub electrical_power_kw: f64,
    pub rotor_rpm: f64,
    pub tip_speed_mps: f64,
    pub tsr: f64,
    pub cable_turns: f64,
    /// Status label, e.g. `CABLE LIMIT`
    pub status: String,
    pub aero_torque_nm: f64,
    pub generator_torque_nm: f64,
    pub omega_target_rad_s: f64,
}
