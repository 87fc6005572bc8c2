//! Turbine state, per-step inputs and derived outputs.

use wt_controls::{OperatingStatus, YawState};
use wt_core::constants::RHO_AIR_STD;
use wt_core::{clamp_finite, finite_or, wrap_360, wrap_tau};

/// Physical state carried between steps.
///
/// Owned by the caller; only [`crate::Turbine::step`] produces a new one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurbineState {
    /// Rotor angular speed (rad/s), `0 ≤ ω ≤ ω_max`
    pub omega: f64,
    /// Absolute nacelle yaw (deg), unbounded
    pub yaw_abs: f64,
    /// Accumulated cable twist since last straight (deg)
    pub cable_pos: f64,
    /// Protective unwind in progress
    pub unwinding: bool,
    /// Blade azimuth (rad), `[0, 2π)`
    pub rotor_angle: f64,
}

impl TurbineState {
    pub fn yaw(&self) -> YawState {
        YawState {
            yaw_abs_deg: self.yaw_abs,
            cable_pos_deg: self.cable_pos,
            unwinding: self.unwinding,
        }
    }

    pub(crate) fn with_yaw(self, yaw: YawState) -> Self {
        Self {
            yaw_abs: yaw.yaw_abs_deg,
            cable_pos: yaw.cable_pos_deg,
            unwinding: yaw.unwinding,
            ..self
        }
    }

    /// Bring a caller-supplied state back inside its invariants.
    pub(crate) fn sanitized(&self, omega_max: f64) -> Self {
        Self {
            omega: clamp_finite(self.omega, 0.0, omega_max, 0.0),
            yaw_abs: finite_or(self.yaw_abs, 0.0),
            cable_pos: finite_or(self.cable_pos, 0.0),
            unwinding: self.unwinding,
            rotor_angle: wrap_tau(finite_or(self.rotor_angle, 0.0)),
        }
    }
}

/// Accepted range of every input; values outside are clamped.
pub mod limits {
    pub const WIND_SPEED_MPS: (f64, f64) = (0.0, 30.0);
    pub const PITCH_DEG: (f64, f64) = (-2.0, 25.0);
    pub const EFFICIENCY: (f64, f64) = (0.85, 0.99);
    pub const DT_S: (f64, f64) = (0.05, 1.0);
    pub const YAW_RATE_DEG_S: (f64, f64) = (0.1, 2.0);
    pub const YAW_DEADBAND_DEG: (f64, f64) = (0.0, 10.0);
    pub const AIR_DENSITY_KG_M3: (f64, f64) = (1.00, 1.30);
    pub const INERTIA_KG_M2: (f64, f64) = (4.0e7, 1.5e8);
    pub const DAMPING_NMS: (f64, f64) = (0.0, 1.0e6);
}

/// Environmental and operator inputs for one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepInputs {
    /// Free-stream wind speed (m/s)
    pub wind_speed: f64,
    /// Direction the wind comes from (deg)
    pub wind_dir: f64,
    /// Blade pitch (deg)
    pub pitch: f64,
    /// Generator efficiency (fraction)
    pub efficiency: f64,
    /// Timestep (s)
    pub dt: f64,
    /// Yaw tracking rate limit (deg/s)
    pub yaw_rate_limit: f64,
    /// Misalignment tolerated without yawing (deg)
    pub yaw_deadband: f64,
    /// Air density (kg/m³)
    pub air_density: f64,
    /// Rotor inertia J (kg·m²)
    pub inertia: f64,
    /// Drivetrain damping B (N·m·s/rad)
    pub damping: f64,
}

impl Default for StepInputs {
    fn default() -> Self {
        Self {
            wind_speed: 10.0,
            wind_dir: 270.0,
            pitch: 2.0,
            efficiency: 0.96,
            dt: 0.15,
            yaw_rate_limit: 0.7,
            yaw_deadband: 2.0,
            air_density: RHO_AIR_STD,
            inertia: 4.0e7,
            damping: 1.0e5,
        }
    }
}

impl StepInputs {
    /// Copy with every field clamped into its accepted range.
    ///
    /// Non-finite values fall back to the default for that field.
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        let fit = |v: f64, (lo, hi): (f64, f64), fallback: f64| clamp_finite(v, lo, hi, fallback);
        Self {
            wind_speed: fit(self.wind_speed, limits::WIND_SPEED_MPS, d.wind_speed),
            wind_dir: wrap_360(finite_or(self.wind_dir, d.wind_dir)),
            pitch: fit(self.pitch, limits::PITCH_DEG, d.pitch),
            efficiency: fit(self.efficiency, limits::EFFICIENCY, d.efficiency),
            dt: fit(self.dt, limits::DT_S, d.dt),
            yaw_rate_limit: fit(self.yaw_rate_limit, limits::YAW_RATE_DEG_S, d.yaw_rate_limit),
            yaw_deadband: fit(self.yaw_deadband, limits::YAW_DEADBAND_DEG, d.yaw_deadband),
            air_density: fit(self.air_density, limits::AIR_DENSITY_KG_M3, d.air_density),
            inertia: fit(self.inertia, limits::INERTIA_KG_M2, d.inertia),
            damping: fit(self.damping, limits::DAMPING_NMS, d.damping),
        }
    }

    /// Names of fields that [`Self::sanitized`] would change.
    pub fn clamped_fields(&self) -> Vec<&'static str> {
        let s = self.sanitized();
        let pairs = [
            ("wind_speed", self.wind_speed, s.wind_speed),
            ("wind_dir", self.wind_dir, s.wind_dir),
            ("pitch", self.pitch, s.pitch),
            ("efficiency", self.efficiency, s.efficiency),
            ("dt", self.dt, s.dt),
            ("yaw_rate_limit", self.yaw_rate_limit, s.yaw_rate_limit),
            ("yaw_deadband", self.yaw_deadband, s.yaw_deadband),
            ("air_density", self.air_density, s.air_density),
            ("inertia", self.inertia, s.inertia),
            ("damping", self.damping, s.damping),
        ];
        pairs
            .into_iter()
            .filter(|(_, raw, fixed)| raw != fixed)
            .map(|(name, _, _)| name)
            .collect()
    }
}

/// Quantities reported after every step or observation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutputs {
    /// Nacelle compass direction (deg), `[0, 360)`
    pub nacelle_dir: f64,
    /// Wind minus nacelle (deg), `[-180, 180)`
    pub misalignment: f64,
    /// Effective wind at the rotor (m/s)
    pub v_eff: f64,
    /// Power coefficient
    pub cp: f64,
    /// Aerodynamic power (kW)
    pub aero_power_kw: f64,
    /// Electrical power (kW)
    pub electrical_power_kw: f64,
    /// Rotor speed (rpm)
    pub rotor_rpm: f64,
    /// Blade tip speed (m/s)
    pub tip_speed: f64,
    /// Tip-speed ratio
    pub tsr: f64,
    /// Cable twist (turns)
    pub cable_turns: f64,
    pub status: OperatingStatus,
    /// Aerodynamic torque (N·m)
    pub aero_torque_nm: f64,
    /// Generator reaction torque (N·m)
    pub generator_torque_nm: f64,
    /// Speed the generator loop tracks (rad/s)
    pub omega_target: f64,
}
