//! Error types for simulation setup.

use thiserror::Error;

/// Errors encountered while building a turbine or running a scenario.
///
/// The timestep itself never fails; these come from construction and
/// runner options.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Controller error: {0}")]
    Control(#[from] wt_controls::ControlError),

    #[error("Parameter error: {0}")]
    Core(#[from] wt_core::WtError),
}

pub type SimResult<T> = Result<T, SimError>;
