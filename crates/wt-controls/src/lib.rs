//! Turbine supervisory controllers for windsim.
//!
//! Two controllers act on the turbine every timestep:
//! - **Yaw**: rate-limited wind tracking with a cable-twist protection state
//!   machine (NORMAL / UNWINDING) that overrides tracking when the tower cable
//!   has been wound too far.
//! - **Generator**: power-derived reaction torque plus a proportional
//!   speed-tracking term, clamped so the generator never motors the rotor.
//!
//! Controllers are plain configuration values; all per-step state is passed in
//! and returned, so updates are pure functions of their arguments.

pub mod error;
pub mod generator;
pub mod yaw;

pub use error::{ControlError, ControlResult};
pub use generator::{GeneratorController, GeneratorGains, GeneratorOutput};
pub use yaw::{OperatingStatus, YawController, YawMode, YawState, YawUpdate};
