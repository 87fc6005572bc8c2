//! Rotor torque balance for a direct-drive drivetrain.

use crate::error::{SimError, SimResult};
use wt_core::wrap_tau;

/// Torques and drivetrain properties acting on the rotor during one step.
#[derive(Clone, Copy, Debug)]
pub struct RotorLoad {
    /// Aerodynamic driving torque (N·m)
    pub aero_torque_nm: f64,
    /// Generator reaction torque (N·m)
    pub generator_torque_nm: f64,
    /// Rotor + generator moment of inertia (kg·m²)
    pub inertia: f64,
    /// Viscous damping coefficient (N·m·s/rad)
    pub damping: f64,
}

/// Rotor speed and azimuth after a step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotorStep {
    /// Angular velocity (rad/s)
    pub omega: f64,
    /// Blade azimuth in `[0, 2π)` (rad)
    pub rotor_angle: f64,
}

/// Single-shaft rotor with viscous damping.
///
/// Models the rotor and direct-drive generator as one rigid inertia:
///
/// ```text
/// J · dω/dt = T_aero − T_gen − B·ω
/// ```
///
/// Integrated with one explicit forward-Euler step per call. The result is
/// clamped to `[0, ω_max]`; the rotor cannot spin backwards and the
/// mechanical ceiling is hard.
#[derive(Clone, Debug)]
pub struct RotorDynamics {
    /// Mechanical speed ceiling (rad/s)
    pub omega_max: f64,
}

impl RotorDynamics {
    /// Create rotor dynamics with a speed ceiling.
    ///
    /// # Errors
    /// Returns error if the ceiling is not a positive finite speed.
    pub fn new(omega_max: f64) -> SimResult<Self> {
        if !(omega_max > 0.0 && omega_max.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "rotor speed ceiling must be positive",
            });
        }
        Ok(Self { omega_max })
    }

    /// Damping torque (always opposes motion).
    pub fn damping_torque(&self, omega: f64, damping: f64) -> f64 {
        -damping * omega
    }

    /// Angular acceleration dω/dt (rad/s²).
    pub fn angular_acceleration(&self, load: &RotorLoad, omega: f64) -> f64 {
        let net = load.aero_torque_nm - load.generator_torque_nm
            + self.damping_torque(omega, load.damping);
        net / load.inertia
    }

    /// Advance speed and azimuth by `dt`.
    ///
    /// Azimuth advances with the speed at the start of the step.
    pub fn step(&self, omega: f64, rotor_angle: f64, load: &RotorLoad, dt: f64) -> RotorStep {
        let alpha = self.angular_acceleration(load, omega);
        let omega_next = (omega + dt * alpha).clamp(0.0, self.omega_max);
        let omega_next = if omega_next.is_finite() { omega_next } else { 0.0 };

        RotorStep {
            omega: omega_next,
            rotor_angle: wrap_tau(rotor_angle + omega * dt),
        }
    }
}
