//! Direct-drive generator torque control.
//!
//! With no gearbox the generator's only handle on the rotor is reaction torque.
//! The law has two parts:
//!
//! ```text
//! T_power = P_elec / max(ω, ω_floor)
//! T_track = Kp · (ω − ω_target)
//! T_gen   = clamp(T_power + T_track, 0, T_ceiling)
//! ```
//!
//! `T_power` extracts the (rated-capped) electrical power; `T_track` is a
//! proportional speed loop that holds the rotor near the design tip-speed
//! ratio. The clamp at zero means the generator never motors the rotor.

use crate::error::{ControlError, ControlResult};
use serde::{Deserialize, Serialize};
use wt_core::constants::{TORQUE_OMEGA_FLOOR_RAD_S, WIND_SPEED_FLOOR_MPS};
use wt_core::{ensure_non_negative, ensure_positive};

/// Tunable gains of the torque law.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorGains {
    /// Proportional speed-tracking gain (N·m·s/rad).
    pub kp: f64,
    /// Upper torque clamp (N·m).
    pub torque_ceiling_nm: f64,
}

impl Default for GeneratorGains {
    fn default() -> Self {
        Self {
            kp: 2.0e7,
            torque_ceiling_nm: 2.0e7,
        }
    }
}

/// Generator response for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorOutput {
    /// Speed the tracking term pulls toward (rad/s).
    pub omega_target: f64,
    /// Electrical power delivered (W).
    pub electrical_power_w: f64,
    /// Reaction torque on the rotor (N·m), never negative.
    pub torque_nm: f64,
}

/// Generator controller bound to a turbine's ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorController {
    pub gains: GeneratorGains,
    /// Rated electrical output (W).
    pub rated_power_w: f64,
    /// Design-optimal tip-speed ratio.
    pub tsr_opt: f64,
    /// Mechanical speed ceiling (rad/s).
    pub omega_max: f64,
    /// Rotor radius (m).
    pub rotor_radius_m: f64,
}

impl GeneratorController {
    /// Create a new generator controller.
    ///
    /// # Arguments
    ///
    /// * `gains` - Speed-tracking gain and torque ceiling
    /// * `rated_power_w` - Electrical power cap (W)
    /// * `tsr_opt` - Tip-speed ratio the tracking loop aims for
    /// * `omega_max` - Highest rotor speed the target may ask for (rad/s)
    /// * `rotor_radius_m` - Rotor radius (m)
    pub fn new(
        gains: GeneratorGains,
        rated_power_w: f64,
        tsr_opt: f64,
        omega_max: f64,
        rotor_radius_m: f64,
    ) -> ControlResult<Self> {
        ensure_non_negative(gains.kp, "generator kp")?;
        ensure_positive(gains.torque_ceiling_nm, "generator torque ceiling")?;
        ensure_positive(rated_power_w, "rated power")?;
        ensure_positive(tsr_opt, "design tip-speed ratio")?;
        ensure_positive(omega_max, "maximum rotor speed")?;
        ensure_positive(rotor_radius_m, "rotor radius")?;
        if omega_max <= TORQUE_OMEGA_FLOOR_RAD_S {
            return Err(ControlError::InvalidArg {
                what: "maximum rotor speed must exceed the torque floor",
            });
        }
        Ok(Self {
            gains,
            rated_power_w,
            tsr_opt,
            omega_max,
            rotor_radius_m,
        })
    }

    /// Rotor speed that holds `tsr_opt` at the given effective wind.
    pub fn target_speed(&self, v_eff: f64) -> f64 {
        let v = v_eff.max(WIND_SPEED_FLOOR_MPS);
        (self.tsr_opt * v / self.rotor_radius_m).clamp(0.0, self.omega_max)
    }

    /// Electrical power for a given aerodynamic power, capped at rating.
    pub fn electrical_power(&self, aero_power_w: f64, efficiency: f64) -> f64 {
        (aero_power_w * efficiency).clamp(0.0, self.rated_power_w)
    }

    /// Compute generator torque and power.
    ///
    /// # Arguments
    ///
    /// * `omega` - Current rotor speed (rad/s)
    /// * `aero_power_w` - Aerodynamic power at the rotor (W)
    /// * `v_eff` - Effective wind speed (m/s)
    /// * `efficiency` - Generator efficiency (fraction)
    pub fn update(
        &self,
        omega: f64,
        aero_power_w: f64,
        v_eff: f64,
        efficiency: f64,
    ) -> GeneratorOutput {
        let omega_target = self.target_speed(v_eff);
        let electrical_power_w = self.electrical_power(aero_power_w, efficiency);

        let t_power = electrical_power_w / omega.max(TORQUE_OMEGA_FLOOR_RAD_S);
        let t_track = self.gains.kp * (omega - omega_target);
        let torque_nm = (t_power + t_track).clamp(0.0, self.gains.torque_ceiling_nm);

        GeneratorOutput {
            omega_target,
            electrical_power_w,
            torque_nm,
        }
    }
}
