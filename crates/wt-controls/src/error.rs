//! Error types for controller configuration.

use thiserror::Error;

/// Result type for control system operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur when configuring a controller.
///
/// Controller updates themselves never fail; only construction is checked.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Numeric parameter failed a core check.
    #[error("Parameter error: {0}")]
    Parameter(#[from] wt_core::WtError),
}
