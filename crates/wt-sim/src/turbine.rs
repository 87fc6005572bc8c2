//! Turbine-class constants.

use std::f64::consts::PI;

use crate::error::{SimError, SimResult};
use wt_core::units::{AngularVel, Area, Length, Power, kw, m, m2, rad_per_s};
use wt_core::{ensure_positive, to_kw};

/// Fixed properties of the turbine class being simulated.
///
/// Defaults describe an 11 MW direct-drive machine with a 200 m rotor.
#[derive(Clone, Debug, PartialEq)]
pub struct TurbineSpec {
    /// Blade tip radius
    pub rotor_radius: Length,
    /// Rated electrical output
    pub rated_power: Power,
    /// Hub height above sea level (informational)
    pub hub_height: Length,
    /// Design-optimal tip-speed ratio
    pub tsr_opt: f64,
    /// Mechanical speed ceiling
    pub omega_max: AngularVel,
    /// Rotor speed a fresh state starts at
    pub omega_seed: AngularVel,
}

impl Default for TurbineSpec {
    fn default() -> Self {
        Self {
            rotor_radius: m(100.0),
            rated_power: kw(11_000.0),
            hub_height: m(125.0),
            // Cp-optimal λ of the lambda-prime curve at zero pitch
            tsr_opt: 6.3,
            omega_max: rad_per_s(0.85),
            omega_seed: rad_per_s(0.6),
        }
    }
}

impl TurbineSpec {
    /// Create a turbine spec.
    ///
    /// # Errors
    /// Returns error if any quantity is non-physical or the seed speed
    /// exceeds the ceiling.
    pub fn new(
        rotor_radius: Length,
        rated_power: Power,
        hub_height: Length,
        tsr_opt: f64,
        omega_max: AngularVel,
        omega_seed: AngularVel,
    ) -> SimResult<Self> {
        ensure_positive(rotor_radius.value, "rotor radius")?;
        ensure_positive(rated_power.value, "rated power")?;
        ensure_positive(hub_height.value, "hub height")?;
        ensure_positive(tsr_opt, "design tip-speed ratio")?;
        ensure_positive(omega_max.value, "maximum rotor speed")?;
        ensure_positive(omega_seed.value, "seed rotor speed")?;
        if omega_seed.value > omega_max.value {
            return Err(SimError::NonPhysical {
                what: "seed rotor speed exceeds maximum rotor speed",
            });
        }
        Ok(Self {
            rotor_radius,
            rated_power,
            hub_height,
            tsr_opt,
            omega_max,
            omega_seed,
        })
    }

    pub fn radius_m(&self) -> f64 {
        self.rotor_radius.value
    }

    /// Swept disc area, πR².
    pub fn swept_area(&self) -> Area {
        m2(PI * self.radius_m() * self.radius_m())
    }

    pub fn rated_power_w(&self) -> f64 {
        self.rated_power.value
    }

    pub fn rated_power_kw(&self) -> f64 {
        to_kw(self.rated_power)
    }

    pub fn omega_max_rad_s(&self) -> f64 {
        self.omega_max.value
    }

    pub fn omega_seed_rad_s(&self) -> f64 {
        self.omega_seed.value
    }
}
