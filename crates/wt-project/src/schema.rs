//! Scenario schema definitions.
//!
//! Every section except `name` has defaults, so a minimal file is
//!
//! ```yaml
//! version: 1
//! name: Calm day
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioDef {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turbine: Option<TurbineDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controls: Option<ControlsDef>,
    #[serde(default)]
    pub inputs: InputsDef,
    /// Omitted: reset aligned with the base wind direction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<InitialStateDef>,
    #[serde(default)]
    pub schedule: Vec<SegmentDef>,
}

impl ScenarioDef {
    /// Latest-version scenario with default inputs and no schedule.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: name.into(),
            turbine: None,
            controls: None,
            inputs: InputsDef::default(),
            initial: None,
            schedule: Vec::new(),
        }
    }

    /// Inputs in effect during segment `idx`.
    pub fn segment_inputs(&self, idx: usize) -> Option<InputsDef> {
        self.schedule
            .get(idx)
            .map(|seg| self.inputs.with_overrides(&seg.overrides))
    }

    /// Ticks across the whole schedule.
    pub fn total_steps(&self) -> usize {
        self.schedule.iter().map(|s| s.steps).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TurbineDef {
    pub rotor_radius_m: f64,
    pub rated_power_kw: f64,
    pub hub_height_m: f64,
    pub tsr_opt: f64,
    pub omega_max_rad_s: f64,
    pub omega_seed_rad_s: f64,
}

impl Default for TurbineDef {
    fn default() -> Self {
        Self {
            rotor_radius_m: 100.0,
            rated_power_kw: 11_000.0,
            hub_height_m: 125.0,
            tsr_opt: 6.3,
            omega_max_rad_s: 0.85,
            omega_seed_rad_s: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlsDef {
    pub generator_kp: f64,
    pub torque_ceiling_nm: f64,
    pub unwind_threshold_deg: f64,
    pub unwind_release_deg: f64,
    pub unwind_rate_factor: f64,
    pub unwind_rate_ceiling_deg_s: f64,
}

impl Default for ControlsDef {
    fn default() -> Self {
        Self {
            generator_kp: 2.0e7,
            torque_ceiling_nm: 2.0e7,
            unwind_threshold_deg: 900.0,
            unwind_release_deg: 1.0,
            unwind_rate_factor: 2.0,
            unwind_rate_ceiling_deg_s: 3.0,
        }
    }
}

/// Operator and environment inputs, in file units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputsDef {
    pub wind_speed_mps: f64,
    pub wind_dir_deg: f64,
    pub pitch_deg: f64,
    /// Generator efficiency in percent
    pub efficiency_pct: f64,
    pub dt_s: f64,
    pub yaw_rate_limit_deg_s: f64,
    pub yaw_deadband_deg: f64,
    pub air_density_kg_m3: f64,
    pub inertia_kg_m2: f64,
    pub damping_nms: f64,
}

impl Default for InputsDef {
    fn default() -> Self {
        Self {
            wind_speed_mps: 10.0,
            wind_dir_deg: 270.0,
            pitch_deg: 2.0,
            efficiency_pct: 96.0,
            dt_s: 0.15,
            yaw_rate_limit_deg_s: 0.7,
            yaw_deadband_deg: 2.0,
            air_density_kg_m3: 1.225,
            inertia_kg_m2: 4.0e7,
            damping_nms: 1.0e5,
        }
    }
}

impl InputsDef {
    /// Copy with every present override applied.
    pub fn with_overrides(&self, o: &InputOverrides) -> Self {
        Self {
            wind_speed_mps: o.wind_speed_mps.unwrap_or(self.wind_speed_mps),
            wind_dir_deg: o.wind_dir_deg.unwrap_or(self.wind_dir_deg),
            pitch_deg: o.pitch_deg.unwrap_or(self.pitch_deg),
            efficiency_pct: o.efficiency_pct.unwrap_or(self.efficiency_pct),
            dt_s: o.dt_s.unwrap_or(self.dt_s),
            yaw_rate_limit_deg_s: o.yaw_rate_limit_deg_s.unwrap_or(self.yaw_rate_limit_deg_s),
            yaw_deadband_deg: o.yaw_deadband_deg.unwrap_or(self.yaw_deadband_deg),
            air_density_kg_m3: o.air_density_kg_m3.unwrap_or(self.air_density_kg_m3),
            inertia_kg_m2: o.inertia_kg_m2.unwrap_or(self.inertia_kg_m2),
            damping_nms: o.damping_nms.unwrap_or(self.damping_nms),
        }
    }

    /// Field name and value pairs, in declaration order.
    pub fn fields(&self) -> [(&'static str, f64); 10] {
        [
            ("wind_speed_mps", self.wind_speed_mps),
            ("wind_dir_deg", self.wind_dir_deg),
            ("pitch_deg", self.pitch_deg),
            ("efficiency_pct", self.efficiency_pct),
            ("dt_s", self.dt_s),
            ("yaw_rate_limit_deg_s", self.yaw_rate_limit_deg_s),
            ("yaw_deadband_deg", self.yaw_deadband_deg),
            ("air_density_kg_m3", self.air_density_kg_m3),
            ("inertia_kg_m2", self.inertia_kg_m2),
            ("damping_nms", self.damping_nms),
        ]
    }
}

/// Per-segment input changes; absent fields keep the base value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct InputOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed_mps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_dir_deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaw_rate_limit_deg_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaw_deadband_deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_density_kg_m3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inertia_kg_m2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damping_nms: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InitialStateDef {
    /// Omitted: the turbine's seed speed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omega_rad_s: Option<f64>,
    pub yaw_abs_deg: f64,
    #[serde(default)]
    pub cable_pos_deg: f64,
    #[serde(default)]
    pub unwinding: bool,
    #[serde(default)]
    pub rotor_angle_rad: f64,
}

/// One stretch of the schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentDef {
    pub steps: usize,
    /// Outputs only; state and time hold still
    #[serde(default)]
    pub paused: bool,
    /// Rebuild state from this segment's inputs first
    #[serde(default)]
    pub reset: bool,
    #[serde(flatten)]
    pub overrides: InputOverrides,
}

impl SegmentDef {
    pub fn running(steps: usize) -> Self {
        Self {
            steps,
            paused: false,
            reset: false,
            overrides: InputOverrides::default(),
        }
    }
}
