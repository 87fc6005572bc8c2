//! Nacelle yaw tracking with cable-twist protection.
//!
//! The power/control cable hangs down the tower from the nacelle, so every
//! degree of yaw twists it. `cable_pos_deg` accumulates the applied yaw deltas;
//! once it passes the unwind threshold the controller stops tracking the wind
//! and drives the nacelle back until the cable is straight again.
//!
//! ```text
//!            |cable| > threshold
//!   NORMAL ───────────────────────▶ UNWINDING
//!     ▲                                 │
//!     └─────────────────────────────────┘
//!            |cable| < release
//! ```
//!
//! Both transitions are level-triggered on the state at the start of a step.

use std::fmt;

use crate::error::{ControlError, ControlResult};
use serde::{Deserialize, Serialize};
use wt_core::{ensure_positive, wrap_180, wrap_360};

/// Yaw state carried between steps.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct YawState {
    /// Absolute nacelle yaw (deg). Unbounded; multi-turn history lives here.
    pub yaw_abs_deg: f64,
    /// Accumulated yaw since the cable was last straight (deg).
    pub cable_pos_deg: f64,
    /// Protective unwind in progress.
    pub unwinding: bool,
}

impl YawState {
    /// State pointing at `direction_deg` with a straight cable.
    pub fn aligned(direction_deg: f64) -> Self {
        Self {
            yaw_abs_deg: wrap_360(direction_deg),
            cable_pos_deg: 0.0,
            unwinding: false,
        }
    }

    /// Compass direction of the nacelle, `[0, 360)`.
    pub fn nacelle_dir_deg(&self) -> f64 {
        wrap_360(self.yaw_abs_deg)
    }

    /// Signed shortest-path offset from nacelle to wind, `[-180, 180)`.
    pub fn misalignment_deg(&self, wind_dir_deg: f64) -> f64 {
        wrap_180(wind_dir_deg - self.nacelle_dir_deg())
    }

    /// Cable twist in full turns.
    pub fn cable_turns(&self) -> f64 {
        self.cable_pos_deg / 360.0
    }

    pub fn mode(&self) -> YawMode {
        if self.unwinding {
            YawMode::Unwinding
        } else {
            YawMode::Normal
        }
    }
}

/// Yaw controller operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum YawMode {
    #[default]
    Normal,
    Unwinding,
}

/// Status label shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingStatus {
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "UNWINDING")]
    Unwinding,
    /// Twist is past the threshold but no unwind has started yet.
    #[serde(rename = "CABLE LIMIT")]
    CableLimit,
}

impl OperatingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Unwinding => "UNWINDING",
            Self::CableLimit => "CABLE LIMIT",
        }
    }
}

impl fmt::Display for OperatingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Result of one yaw update besides the new state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YawUpdate {
    /// Mode the step was executed in.
    pub mode: YawMode,
    /// Yaw applied this step (deg).
    pub delta_deg: f64,
    /// Misalignment after the yaw moved (deg). Aerodynamics use this one.
    pub misalignment_after_deg: f64,
}

/// Yaw controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YawController {
    /// Twist magnitude that starts an unwind (deg). 2.5 turns by default.
    pub unwind_threshold_deg: f64,
    /// Twist magnitude below which an unwind ends (deg).
    pub unwind_release_deg: f64,
    /// Unwind rate as a multiple of the tracking rate limit.
    pub unwind_rate_factor: f64,
    /// Absolute ceiling on the unwind rate (deg/s).
    pub unwind_rate_ceiling_deg_s: f64,
}

impl Default for YawController {
    fn default() -> Self {
        Self {
            unwind_threshold_deg: 900.0,
            unwind_release_deg: 1.0,
            unwind_rate_factor: 2.0,
            unwind_rate_ceiling_deg_s: 3.0,
        }
    }
}

impl YawController {
    /// Create a new yaw controller.
    ///
    /// # Arguments
    ///
    /// * `unwind_threshold_deg` - Twist that triggers an unwind
    /// * `unwind_release_deg` - Twist below which tracking resumes
    /// * `unwind_rate_factor` - Unwind speed relative to the tracking limit (>= 1)
    /// * `unwind_rate_ceiling_deg_s` - Hard cap on unwind speed
    pub fn new(
        unwind_threshold_deg: f64,
        unwind_release_deg: f64,
        unwind_rate_factor: f64,
        unwind_rate_ceiling_deg_s: f64,
    ) -> ControlResult<Self> {
        ensure_positive(unwind_threshold_deg, "unwind threshold")?;
        ensure_positive(unwind_release_deg, "unwind release")?;
        ensure_positive(unwind_rate_ceiling_deg_s, "unwind rate ceiling")?;
        if unwind_release_deg >= unwind_threshold_deg {
            return Err(ControlError::InvalidArg {
                what: "unwind release must be below the unwind threshold",
            });
        }
        if !(unwind_rate_factor >= 1.0 && unwind_rate_factor.is_finite()) {
            return Err(ControlError::InvalidArg {
                what: "unwind rate factor must be at least 1",
            });
        }
        Ok(Self {
            unwind_threshold_deg,
            unwind_release_deg,
            unwind_rate_factor,
            unwind_rate_ceiling_deg_s,
        })
    }

    /// Mode to run the coming step in, given the state at its start.
    pub fn next_mode(&self, state: &YawState) -> YawMode {
        let twist = state.cable_pos_deg.abs();
        match state.mode() {
            YawMode::Normal if twist > self.unwind_threshold_deg => YawMode::Unwinding,
            YawMode::Unwinding if twist < self.unwind_release_deg => YawMode::Normal,
            mode => mode,
        }
    }

    /// Unwind slew rate (deg/s) for a given tracking rate limit.
    pub fn unwind_rate(&self, rate_limit_deg_s: f64) -> f64 {
        (self.unwind_rate_factor * rate_limit_deg_s).min(self.unwind_rate_ceiling_deg_s)
    }

    /// Rate-limited tracking correction with deadband.
    pub fn tracking_delta(
        &self,
        misalignment_deg: f64,
        rate_limit_deg_s: f64,
        deadband_deg: f64,
        dt: f64,
    ) -> f64 {
        if misalignment_deg.abs() <= deadband_deg {
            return 0.0;
        }
        let max_step = rate_limit_deg_s * dt;
        misalignment_deg.clamp(-max_step, max_step)
    }

    /// Unwind correction: opposite the twist, never past straight.
    pub fn unwind_delta(&self, cable_pos_deg: f64, rate_limit_deg_s: f64, dt: f64) -> f64 {
        let max_step = self.unwind_rate(rate_limit_deg_s) * dt;
        -cable_pos_deg.signum() * max_step.min(cable_pos_deg.abs())
    }

    /// Advance yaw by one step.
    ///
    /// # Arguments
    ///
    /// * `state` - Yaw state at the start of the step
    /// * `wind_dir_deg` - Compass direction the wind comes from
    /// * `rate_limit_deg_s` - Tracking slew limit
    /// * `deadband_deg` - Misalignment tolerated without moving
    /// * `dt` - Timestep (seconds)
    ///
    /// # Returns
    ///
    /// Updated state and what happened during the step.
    pub fn update(
        &self,
        state: &YawState,
        wind_dir_deg: f64,
        rate_limit_deg_s: f64,
        deadband_deg: f64,
        dt: f64,
    ) -> (YawState, YawUpdate) {
        let mode = self.next_mode(state);
        let misalignment_deg = state.misalignment_deg(wind_dir_deg);

        let delta_deg = match mode {
            YawMode::Normal => {
                self.tracking_delta(misalignment_deg, rate_limit_deg_s, deadband_deg, dt)
            }
            YawMode::Unwinding => self.unwind_delta(state.cable_pos_deg, rate_limit_deg_s, dt),
        };

        // yaw and cable move together; the cable is only ever unwound by deltas
        let new_state = YawState {
            yaw_abs_deg: state.yaw_abs_deg + delta_deg,
            cable_pos_deg: state.cable_pos_deg + delta_deg,
            unwinding: mode == YawMode::Unwinding,
        };

        let update = YawUpdate {
            mode,
            delta_deg,
            misalignment_after_deg: new_state.misalignment_deg(wind_dir_deg),
        };

        (new_state, update)
    }

    /// Operator-facing status for a state.
    pub fn status(&self, state: &YawState) -> OperatingStatus {
        if state.unwinding {
            OperatingStatus::Unwinding
        } else if state.cable_pos_deg.abs() > self.unwind_threshold_deg {
            OperatingStatus::CableLimit
        } else {
            OperatingStatus::Normal
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn yaw_and_cable_move_together(
            yaw in -2000.0_f64..2000.0,
            cable in -1200.0_f64..1200.0,
            unwinding in any::<bool>(),
            wind in 0.0_f64..360.0,
            rate in 0.1_f64..2.0,
            deadband in 0.0_f64..10.0,
            dt in 0.05_f64..1.0,
        ) {
            let ctrl = YawController::default();
            let start = YawState { yaw_abs_deg: yaw, cable_pos_deg: cable, unwinding };
            let (next, upd) = ctrl.update(&start, wind, rate, deadband, dt);
            prop_assert!((next.yaw_abs_deg - start.yaw_abs_deg - upd.delta_deg).abs() < 1e-9);
            prop_assert!((next.cable_pos_deg - start.cable_pos_deg - upd.delta_deg).abs() < 1e-9);
            let limit = match upd.mode {
                YawMode::Normal => rate * dt,
                YawMode::Unwinding => ctrl.unwind_rate(rate) * dt,
            };
            prop_assert!(upd.delta_deg.abs() <= limit + 1e-12);
        }

        #[test]
        fn unwinding_never_grows_twist(cable in -5000.0_f64..5000.0, rate in 0.1_f64..2.0, dt in 0.05_f64..1.0) {
            let ctrl = YawController::default();
            let d = ctrl.unwind_delta(cable, rate, dt);
            prop_assert!((cable + d).abs() <= cable.abs());
        }
    }
}
