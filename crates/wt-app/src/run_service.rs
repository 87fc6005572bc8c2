//! Run execution and caching service.

use std::path::Path;
use std::time::Instant;
use tracing::info;
use wt_results::{
    OutputSnapshot, RunInfo, RunManifest, RunStore, StateSnapshot, TimeseriesRecord,
};
use wt_sim::{SimOptions, SimProgress, SimSample};

use crate::error::AppResult;
use crate::progress::{RunProgressEvent, RunStage, SimulationProgress};
use crate::project_service;
use crate::scenario_compile;

/// Engine version mixed into every run ID.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options for running scenarios.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub engine_version: String,
    /// Keep every N-th tick (the last tick is always kept)
    pub record_every: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            engine_version: ENGINE_VERSION.to_string(),
            record_every: 1,
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub scenario_path: &'a Path,
    pub options: RunOptions,
}

/// Wall-clock timing for a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub compile_time_s: f64,
    pub simulate_time_s: f64,
    pub save_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
    pub ticks: usize,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    pub timing: RunTimingSummary,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: &str,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            Some(message.to_string()),
        ));
    }
}

/// Execute or load a run based on request.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run and stream progress events.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    emit_progress(&mut progress_cb, RunStage::LoadingScenario, started, "Loading scenario");
    let scenario = project_service::load_scenario(request.scenario_path)?;

    emit_progress(&mut progress_cb, RunStage::CheckingCache, started, "Checking run cache");
    let opts = SimOptions {
        record_every: request.options.record_every,
        ..SimOptions::default()
    };
    // decimation changes the stored series, so it is part of the key
    let key_version = format!(
        "{}/record_every={}",
        request.options.engine_version, opts.record_every
    );
    let run_id = wt_results::compute_run_id(&scenario, &key_version)?;
    let store = RunStore::for_scenario(request.scenario_path)?;

    if request.options.use_cache && store.has_run(&run_id) {
        emit_progress(
            &mut progress_cb,
            RunStage::LoadingCachedResult,
            started,
            "Loading cached run",
        );
        let load_started = Instant::now();
        let manifest = store.load_manifest(&run_id)?;
        timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
        timing.ticks = manifest.info.ticks;
        timing.total_time_s = started.elapsed().as_secs_f64();
        info!(run_id = %run_id, scenario = %scenario.name, "loaded cached run");
        emit_progress(&mut progress_cb, RunStage::Completed, started, "Loaded cached run");
        return Ok(RunResponse {
            run_id,
            manifest,
            loaded_from_cache: true,
            timing,
        });
    }

    if store.has_run(&run_id) {
        info!(run_id = %run_id, "replacing stored run");
    }
    // start from an empty run directory
    store.delete_run(&run_id)?;

    emit_progress(&mut progress_cb, RunStage::Compiling, started, "Compiling scenario");
    let compile_started = Instant::now();
    let compiled = scenario_compile::compile_scenario(&scenario)?;
    timing.compile_time_s = compile_started.elapsed().as_secs_f64();

    emit_progress(&mut progress_cb, RunStage::Simulating, started, "Running scenario");
    let sim_started = Instant::now();
    let record = {
        let mut forward = |p: SimProgress| {
            if let Some(cb) = progress_cb.as_deref_mut() {
                let fraction_complete = if p.total_ticks > 0 {
                    p.tick as f64 / p.total_ticks as f64
                } else {
                    1.0
                };
                cb(RunProgressEvent {
                    stage: RunStage::Simulating,
                    elapsed_wall_s: started.elapsed().as_secs_f64(),
                    message: None,
                    simulation: Some(SimulationProgress {
                        tick: p.tick,
                        total_ticks: p.total_ticks,
                        sim_time_s: p.t,
                        fraction_complete,
                        segment: p.segment,
                        status: p.status,
                    }),
                });
            }
        };
        wt_sim::run_scenario_with_progress(
            &compiled.turbine,
            compiled.initial,
            &compiled.segments,
            &opts,
            Some(&mut forward),
        )?
    };
    timing.simulate_time_s = sim_started.elapsed().as_secs_f64();
    timing.ticks = record.ticks;

    emit_progress(&mut progress_cb, RunStage::SavingResults, started, "Saving results");
    let save_started = Instant::now();
    let records: Vec<TimeseriesRecord> = record.samples.iter().map(to_record).collect();
    let manifest = RunManifest::new(
        run_id.clone(),
        scenario.name.clone(),
        request.options.engine_version.clone(),
        RunInfo {
            segments: compiled.segments.len(),
            ticks: record.ticks,
            t_end_s: record.t_end,
            record_every: opts.record_every,
        },
    );
    store.save_run(&manifest, &records)?;
    timing.save_time_s = save_started.elapsed().as_secs_f64();
    timing.total_time_s = started.elapsed().as_secs_f64();

    info!(
        run_id = %run_id,
        scenario = %scenario.name,
        ticks = record.ticks,
        records = records.len(),
        "run saved"
    );
    emit_progress(&mut progress_cb, RunStage::Completed, started, "Run completed");

    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        timing,
    })
}

/// Flatten one simulator sample into a storable record.
pub fn to_record(sample: &SimSample) -> TimeseriesRecord {
    let s = &sample.state;
    let o = &sample.outputs;
    TimeseriesRecord {
        time_s: sample.t,
        segment: sample.segment,
        paused: sample.paused,
        state: StateSnapshot {
            omega_rad_s: s.omega,
            yaw_abs_deg: s.yaw_abs,
            cable_pos_deg: s.cable_pos,
            unwinding: s.unwinding,
            rotor_angle_rad: s.rotor_angle,
        },
        outputs: OutputSnapshot {
            nacelle_dir_deg: o.nacelle_dir,
            misalignment_deg: o.misalignment,
            v_eff_mps: o.v_eff,
            cp: o.cp,
            aero_power_kw: o.aero_power_kw,
            electrical_power_kw: o.electrical_power_kw,
            rotor_rpm: o.rotor_rpm,
            tip_speed_mps: o.tip_speed,
            tsr: o.tsr,
            cable_turns: o.cable_turns,
            status: o.status.label().to_string(),
            aero_torque_nm: o.aero_torque_nm,
            generator_torque_nm: o.generator_torque_nm,
            omega_target_rad_s: o.omega_target,
        },
    }
}

/// List stored runs of the scenario, newest first.
pub fn list_runs(scenario_path: &Path) -> AppResult<Vec<RunManifest>> {
    let scenario = project_service::load_scenario(scenario_path)?;
    let store = RunStore::for_scenario(scenario_path)?;

    let mut runs = store.list_runs(&scenario.name)?;
    runs.sort_by_key(|r| {
        std::cmp::Reverse(
            chrono::DateTime::parse_from_rfc3339(&r.timestamp)
                .map(|t| t.timestamp_micros())
                .unwrap_or(i64::MIN),
        )
    });
    Ok(runs)
}

/// Load a specific run.
pub fn load_run(
    scenario_path: &Path,
    run_id: &str,
) -> AppResult<(RunManifest, Vec<TimeseriesRecord>)> {
    let store = RunStore::for_scenario(scenario_path)?;

    let manifest = store.load_manifest(run_id)?;
    let records = store.load_timeseries(run_id)?;

    Ok((manifest, records))
}
