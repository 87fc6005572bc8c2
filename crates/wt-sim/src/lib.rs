//! Discrete-time simulation of an offshore wind turbine's rotor, yaw and
//! generator.
//!
//! Provides:
//! - Turbine-class constants ([`TurbineSpec`])
//! - Lambda-prime aerodynamic model with yaw-misalignment loss
//! - Forward-Euler rotor torque balance
//! - The fixed-order timestep ([`Turbine::step`] / [`Turbine::observe`])
//! - A segment-based scenario runner for batch use

pub mod aero;
pub mod error;
pub mod rotor;
pub mod sim;
pub mod state;
pub mod stepper;
pub mod turbine;

// Re-exports for public API
pub use aero::{AeroModel, AeroPoint, CP_MAX, effective_wind, power_coefficient, tip_speed_ratio};
pub use error::{SimError, SimResult};
pub use rotor::{RotorDynamics, RotorLoad, RotorStep};
pub use sim::{
    Segment, SimOptions, SimProgress, SimRecord, SimSample, run_scenario,
    run_scenario_with_progress,
};
pub use state::{StepInputs, StepOutputs, TurbineState, limits};
pub use stepper::Turbine;
pub use turbine::TurbineSpec;
