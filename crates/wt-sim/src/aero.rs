//! Rotor aerodynamics.
//!
//! Actuator-disc power with an empirical lambda-prime power coefficient:
//!
//! ```text
//! 1/λi = 1/(λ + 0.08β) − 0.035/(β³ + 1)
//! Cp   = 0.22 · (116/λi − 0.4β − 5) · exp(−12.5/λi)      clamped to [0, 0.5]
//! P    = ½ · ρ · A · Cp · v³
//! T    = P / max(ω, 0.2)
//! ```
//!
//! Both λi denominators are floored in magnitude. The pitch-cubic floor is
//! wide: near β = −1 the correction term grows without bound and squeezes the
//! whole Cp curve into a sliver of λ, steep enough to make the explicit rotor
//! update ring. Outside `β ∈ (−1.145, −0.794)` the curve is unchanged.
//!
//! Yaw misalignment reduces the effective wind as `v·cos(γ)^1.5`, with the rotor
//! fully decoupled from the wind at 90° and beyond.

use wt_core::constants::{TORQUE_OMEGA_FLOOR_RAD_S, WIND_SPEED_FLOOR_MPS};
use wt_core::signed_floor;

/// Upper clamp on the power coefficient (below the Betz limit).
pub const CP_MAX: f64 = 0.50;

/// Magnitude floor for the `λ + 0.08β` denominator.
const TSR_DENOM_FLOOR: f64 = 1e-3;

/// Magnitude floor for the `β³ + 1` denominator.
const PITCH_CUBE_FLOOR: f64 = 0.5;

/// Effective wind seen by a misaligned rotor.
pub fn effective_wind(wind_speed: f64, misalignment_deg: f64) -> f64 {
    let gamma = misalignment_deg.abs();
    if gamma >= 90.0 {
        return 0.0;
    }
    // cos can round a hair below zero just under 90°
    let c = gamma.to_radians().cos().max(0.0);
    wind_speed * c.powf(1.5)
}

/// Tip-speed ratio with the wind floored at 0.1 m/s.
pub fn tip_speed_ratio(omega: f64, radius_m: f64, v_eff: f64) -> f64 {
    omega * radius_m / v_eff.max(WIND_SPEED_FLOOR_MPS)
}

/// Lambda-prime power coefficient, clamped to `[0, CP_MAX]`.
pub fn power_coefficient(tsr: f64, pitch_deg: f64) -> f64 {
    let beta = pitch_deg;
    let inv_lambda_i = 1.0 / signed_floor(tsr + 0.08 * beta, TSR_DENOM_FLOOR)
        - 0.035 / signed_floor(beta.powi(3) + 1.0, PITCH_CUBE_FLOOR);
    // outside the curve's validity; no useful lift
    if !(inv_lambda_i > 0.0) {
        return 0.0;
    }
    let cp = 0.22 * (116.0 * inv_lambda_i - 0.4 * beta - 5.0) * (-12.5 * inv_lambda_i).exp();
    if cp.is_finite() {
        cp.clamp(0.0, CP_MAX)
    } else {
        0.0
    }
}

/// Aerodynamic operating point for one rotor speed and wind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AeroPoint {
    pub tsr: f64,
    pub cp: f64,
    /// Aerodynamic power (W)
    pub power_w: f64,
    /// Aerodynamic torque on the shaft (N·m)
    pub torque_nm: f64,
}

/// Rotor aerodynamics for a fixed geometry.
#[derive(Clone, Debug)]
pub struct AeroModel {
    /// Rotor radius (m)
    pub radius_m: f64,
    /// Swept area (m²)
    pub swept_area_m2: f64,
}

impl AeroModel {
    pub fn new(radius_m: f64, swept_area_m2: f64) -> Self {
        Self {
            radius_m,
            swept_area_m2,
        }
    }

    /// Power extracted from a wind stream with the given Cp.
    pub fn power(&self, air_density: f64, cp: f64, v_eff: f64) -> f64 {
        0.5 * air_density * self.swept_area_m2 * cp * v_eff.powi(3)
    }

    /// Shaft torque for a power at a rotor speed, floored near standstill.
    pub fn torque(&self, power_w: f64, omega: f64) -> f64 {
        power_w / omega.max(TORQUE_OMEGA_FLOOR_RAD_S)
    }

    /// Evaluate the operating point.
    ///
    /// # Arguments
    /// * `omega` - Rotor speed (rad/s)
    /// * `v_eff` - Effective wind speed (m/s)
    /// * `pitch_deg` - Blade pitch (deg)
    /// * `air_density` - Air density (kg/m³)
    pub fn evaluate(&self, omega: f64, v_eff: f64, pitch_deg: f64, air_density: f64) -> AeroPoint {
        let tsr = tip_speed_ratio(omega, self.radius_m, v_eff);
        let cp = power_coefficient(tsr, pitch_deg);
        let power_w = self.power(air_density, cp, v_eff);
        let torque_nm = self.torque(power_w, omega);
        AeroPoint {
            tsr,
            cp,
            power_w,
            torque_nm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn model() -> AeroModel {
        AeroModel::new(100.0, PI * 100.0 * 100.0)
    }

    #[test]
    fn aligned_rotor_sees_full_wind() {
        assert_eq!(effective_wind(10.0, 0.0), 10.0);
    }

    #[test]
    fn misalignment_loss() {
        let v = effective_wind(10.0, 60.0);
        assert!((v - 10.0 * 0.5_f64.powf(1.5)).abs() < 1e-9);
        // symmetric in sign
        assert_eq!(effective_wind(10.0, -60.0), v);
    }

    #[test]
    fn decoupled_at_and_beyond_90() {
        assert_eq!(effective_wind(25.0, 90.0), 0.0);
        assert_eq!(effective_wind(25.0, -135.0), 0.0);
        assert_eq!(effective_wind(25.0, -180.0), 0.0);
        assert!(effective_wind(25.0, 89.999) >= 0.0);
    }

    #[test]
    fn tsr_floor_on_calm() {
        let tsr = tip_speed_ratio(0.6, 100.0, 0.0);
        assert!((tsr - 600.0).abs() < 1e-9);
    }

    #[test]
    fn cp_peak_near_design_tsr() {
        let peak = power_coefficient(6.3, 0.0);
        assert!(peak > 0.43 && peak < 0.45, "peak Cp = {peak}");
        assert!(power_coefficient(4.0, 0.0) < peak);
        assert!(power_coefficient(10.0, 0.0) < peak);
    }

    #[test]
    fn pitching_reduces_cp() {
        assert!(power_coefficient(6.3, 10.0) < power_coefficient(6.3, 0.0));
    }

    #[test]
    fn cp_guards_singular_pitch() {
        // β = -1 zeroes β³ + 1
        let cp = power_coefficient(6.0, -1.0);
        assert!(cp.is_finite());
        assert!((0.0..=CP_MAX).contains(&cp));
    }

    #[test]
    fn cp_curve_stays_wide_near_singular_pitch() {
        // usable power near the design λ, no spike close to standstill
        assert!(power_coefficient(5.4, -1.0) > 0.4);
        assert!(power_coefficient(0.1, -1.0) < 0.05);
        // the floor leaves the curve alone at ordinary pitch
        let beta: f64 = 2.0;
        let inv = 1.0 / (6.0 + 0.08 * beta) - 0.035 / (beta.powi(3) + 1.0);
        let exact = 0.22 * (116.0 * inv - 0.4 * beta - 5.0) * (-12.5 * inv).exp();
        assert!((power_coefficient(6.0, beta) - exact).abs() < 1e-15);
    }

    #[test]
    fn cp_zero_at_extreme_tsr() {
        assert_eq!(power_coefficient(600.0, 2.0), 0.0);
        assert_eq!(power_coefficient(0.0, 0.0), 0.0);
    }

    #[test]
    fn operating_point_at_10_mps() {
        let p = model().evaluate(0.6, 10.0, 2.0, 1.225);
        assert!((p.tsr - 6.0).abs() < 1e-12);
        assert!(p.cp > 0.3 && p.cp <= CP_MAX);
        assert!(p.power_w > 5.0e6 && p.power_w < 10.0e6, "P = {}", p.power_w);
        assert!((p.torque_nm - p.power_w / 0.6).abs() < 1e-6);
    }

    #[test]
    fn no_wind_no_power() {
        let p = model().evaluate(0.5, 0.0, 0.0, 1.225);
        assert_eq!(p.power_w, 0.0);
        assert_eq!(p.torque_nm, 0.0);
    }
}
