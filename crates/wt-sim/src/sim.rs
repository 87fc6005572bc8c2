//! Scenario runner and result recording.
//!
//! Drives a [`Turbine`] through a list of segments the way an interactive
//! front end would: running segments step the physics once per tick, paused
//! segments only re-evaluate outputs, and a segment may start with a reset.
//! Time is simulated time only; the runner never sleeps.

use tracing::{debug, info};

use crate::error::{SimError, SimResult};
use crate::state::{StepInputs, StepOutputs, TurbineState};
use crate::stepper::Turbine;
use wt_controls::OperatingStatus;

/// One stretch of constant inputs.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Ticks to execute
    pub steps: usize,
    /// Observe only; state and time stand still
    pub paused: bool,
    /// Rebuild the state from these inputs before the first tick
    pub reset: bool,
    pub inputs: StepInputs,
}

impl Segment {
    pub fn running(steps: usize, inputs: StepInputs) -> Self {
        Self {
            steps,
            paused: false,
            reset: false,
            inputs,
        }
    }
}

/// Options for scenario runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Maximum number of ticks across all segments (safety limit)
    pub max_steps: usize,
    /// Record every N-th tick (decimation)
    pub record_every: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            max_steps: 1_000_000,
            record_every: 1,
        }
    }
}

/// Recorded sample.
#[derive(Clone, Debug, PartialEq)]
pub struct SimSample {
    /// Simulated time (s)
    pub t: f64,
    /// Segment the sample belongs to
    pub segment: usize,
    pub paused: bool,
    pub state: TurbineState,
    pub outputs: StepOutputs,
}

/// Record of a scenario run.
#[derive(Clone, Debug, Default)]
pub struct SimRecord {
    pub samples: Vec<SimSample>,
    /// Ticks executed (running and paused)
    pub ticks: usize,
    /// Simulated time at the end (s)
    pub t_end: f64,
    /// State after the last tick
    pub final_state: Option<TurbineState>,
}

/// Progress report emitted once per tick.
#[derive(Clone, Copy, Debug)]
pub struct SimProgress {
    pub tick: usize,
    pub total_ticks: usize,
    pub segment: usize,
    pub t: f64,
    pub status: OperatingStatus,
}

/// Run a scenario.
pub fn run_scenario(
    turbine: &Turbine,
    initial: TurbineState,
    segments: &[Segment],
    opts: &SimOptions,
) -> SimResult<SimRecord> {
    run_scenario_with_progress(turbine, initial, segments, opts, None)
}

/// Run a scenario and report progress.
pub fn run_scenario_with_progress(
    turbine: &Turbine,
    initial: TurbineState,
    segments: &[Segment],
    opts: &SimOptions,
    mut progress_cb: Option<&mut dyn FnMut(SimProgress)>,
) -> SimResult<SimRecord> {
    if opts.record_every == 0 {
        return Err(SimError::InvalidArg {
            what: "record_every must be positive",
        });
    }
    if opts.max_steps == 0 {
        return Err(SimError::InvalidArg {
            what: "max_steps must be positive",
        });
    }
    let total_ticks: usize = segments.iter().map(|s| s.steps).sum();
    if total_ticks > opts.max_steps {
        return Err(SimError::InvalidArg {
            what: "scenario exceeds max_steps",
        });
    }

    info!(
        segments = segments.len(),
        ticks = total_ticks,
        "starting scenario run"
    );

    let mut state = initial;
    let mut t = 0.0;
    let mut tick = 0;
    let mut samples = Vec::new();
    let mut last_sample: Option<SimSample> = None;

    for (idx, segment) in segments.iter().enumerate() {
        if segment.reset {
            state = turbine.reset(&segment.inputs);
            debug!(segment = idx, "state reset");
        }
        debug!(
            segment = idx,
            steps = segment.steps,
            paused = segment.paused,
            "entering segment"
        );

        for _ in 0..segment.steps {
            let was_unwinding = state.unwinding;
            let outputs = if segment.paused {
                turbine.observe(&state, &segment.inputs)
            } else {
                let (next, outputs) = turbine.step(&state, &segment.inputs);
                state = next;
                t += segment.inputs.sanitized().dt;
                outputs
            };
            tick += 1;

            if state.unwinding != was_unwinding {
                debug!(
                    t,
                    cable_pos = state.cable_pos,
                    unwinding = state.unwinding,
                    "yaw mode changed"
                );
            }

            let sample = SimSample {
                t,
                segment: idx,
                paused: segment.paused,
                state,
                outputs,
            };
            if tick % opts.record_every == 0 {
                samples.push(sample.clone());
            }
            last_sample = Some(sample);

            if let Some(cb) = progress_cb.as_deref_mut() {
                cb(SimProgress {
                    tick,
                    total_ticks,
                    segment: idx,
                    t,
                    status: outputs.status,
                });
            }
        }
    }

    // Always record final tick
    if tick % opts.record_every != 0 {
        if let Some(sample) = last_sample {
            samples.push(sample);
        }
    }

    info!(ticks = tick, t_end = t, samples = samples.len(), "scenario run finished");

    Ok(SimRecord {
        samples,
        ticks: tick,
        t_end: t,
        final_state: Some(state),
    })
}
