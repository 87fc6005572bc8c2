use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use wt_app::{
    AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, RunTimingSummary, panel,
    project_service, query, run_service,
};

#[derive(Parser)]
#[command(name = "wt-cli")]
#[command(about = "WindSim CLI - Offshore wind turbine rotor/yaw/generator simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and values
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Run a scenario and store the results
    Run {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
        /// Keep every N-th tick only
        #[arg(long, default_value_t = 1)]
        record_every: usize,
    },
    /// List cached runs for a scenario
    Runs {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export one variable of a run as CSV
    ExportSeries {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Variable name (e.g., electrical_power_kw, rotor_rpm, cable_turns)
        variable: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Advance one timestep from the scenario's start and print the metrics
    Step {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
}

fn main() -> AppResult<()> {
    // Logs go to stderr so CSV on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Run {
            scenario_path,
            no_cache,
            record_every,
        } => cmd_run(&scenario_path, !no_cache, record_every),
        Commands::Runs { scenario_path } => cmd_runs(&scenario_path),
        Commands::ShowRun {
            scenario_path,
            run_id,
        } => cmd_show_run(&scenario_path, &run_id),
        Commands::ExportSeries {
            scenario_path,
            run_id,
            variable,
            output,
        } => cmd_export_series(&scenario_path, &run_id, &variable, output.as_deref()),
        Commands::Step { scenario_path } => cmd_step(&scenario_path),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = project_service::load_scenario(scenario_path)?;
    let warnings = project_service::validate_scenario(&scenario)?;
    let summary = project_service::summarize_scenario(&scenario);

    println!("✓ Scenario is valid: {}", summary.name);
    println!(
        "  {} segments, {} steps ({} paused, {} resets), {:.1} s simulated",
        summary.segment_count,
        summary.total_steps,
        summary.paused_steps,
        summary.resets,
        summary.simulated_time_s
    );
    for warning in &warnings {
        println!("  ! {}", warning);
    }
    Ok(())
}

fn cmd_run(scenario_path: &Path, use_cache: bool, record_every: usize) -> AppResult<()> {
    println!("Running scenario: {}", scenario_path.display());

    let request = RunRequest {
        scenario_path,
        options: RunOptions {
            use_cache,
            record_every,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let mut last_stage = None;
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event: RunProgressEvent| {
            let emit_now =
                last_stage != Some(event.stage) || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = Some(event.stage);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Simulation completed: {}", response.run_id);
    }
    print_timing_summary(&response.timing, response.loaded_from_cache);

    let (_manifest, records) = run_service::load_run(scenario_path, &response.run_id)?;
    print_run_summary(&query::get_run_summary(&records)?);

    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.simulation) {
        (RunStage::Simulating, Some(sim)) => {
            let width = 28usize;
            let filled = ((sim.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  t={:.1}s  tick={}/{}  segment={}  {}",
                bar,
                sim.fraction_complete * 100.0,
                sim.sim_time_s,
                sim.tick,
                sim.total_ticks,
                sim.segment,
                sim.status
            );
        }
        _ => {
            if let Some(message) = &event.message {
                print!("\r{:<60} elapsed={:.1}s", message, event.elapsed_wall_s);
            }
        }
    }
    let _ = io::stdout().flush();
}

fn print_timing_summary(timing: &RunTimingSummary, cached: bool) {
    if cached {
        println!(
            "  Loaded in {:.3} s ({} ticks)",
            timing.load_cache_time_s, timing.ticks
        );
    } else {
        println!(
            "  {} ticks: compile {:.3} s, simulate {:.3} s, save {:.3} s, total {:.3} s",
            timing.ticks,
            timing.compile_time_s,
            timing.simulate_time_s,
            timing.save_time_s,
            timing.total_time_s
        );
    }
}

fn print_run_summary(summary: &query::RunSummary) {
    println!("  Time points: {}", summary.record_count);
    println!(
        "  Time range: {:.2} - {:.2} s",
        summary.time_range.0, summary.time_range.1
    );
    println!("  Segments: {}", summary.segment_count);
    println!(
        "  Electrical power: peak {:.1} kW, mean {:.1} kW",
        summary.peak_electrical_power_kw, summary.mean_electrical_power_kw
    );
    println!("  Max cable twist: {:.2} turns", summary.max_abs_cable_turns);
    println!("  Unwinding records: {}", summary.unwinding_records);
    println!("  Final status: {}", summary.final_status);
}

fn cmd_runs(scenario_path: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(scenario_path)?;

    if runs.is_empty() {
        println!("No cached runs found for: {}", scenario_path.display());
    } else {
        println!("Cached runs for '{}':", runs[0].scenario_name);
        for manifest in runs {
            println!(
                "  {} ({}, {} ticks, t_end {:.1} s)",
                manifest.run_id, manifest.timestamp, manifest.info.ticks, manifest.info.t_end_s
            );
        }
    }
    Ok(())
}

fn cmd_show_run(scenario_path: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, records) = run_service::load_run(scenario_path, run_id)?;
    let summary = query::get_run_summary(&records)?;

    println!("\nRun Summary:");
    println!("  Scenario: {}", manifest.scenario_name);
    println!("  Created: {}", manifest.timestamp);
    println!("  Engine: {}", manifest.engine_version);
    println!("  Ticks: {} (every {} recorded)", manifest.info.ticks, manifest.info.record_every);
    print_run_summary(&summary);

    println!("\nVariables:");
    for name in query::SERIES_VARIABLES {
        println!("  {}", name);
    }

    Ok(())
}

fn cmd_export_series(
    scenario_path: &Path,
    run_id: &str,
    variable: &str,
    output: Option<&Path>,
) -> AppResult<()> {
    let (_manifest, records) = run_service::load_run(scenario_path, run_id)?;
    let series = query::extract_series(&records, variable)?;

    if let Some(path) = output {
        let file = io::BufWriter::new(std::fs::File::create(path)?);
        query::write_series_csv(file, variable, &series)?;
        println!(
            "✓ Exported {} data points to {}",
            series.len(),
            path.display()
        );
    } else {
        query::write_series_csv(io::stdout().lock(), variable, &series)?;
    }

    Ok(())
}

fn cmd_step(scenario_path: &Path) -> AppResult<()> {
    let scenario = project_service::load_scenario(scenario_path)?;
    let report = panel::step_once(&scenario)?;

    println!("{}", report.panel);
    println!(
        "  Rotor speed {:.4} → {:.4} rad/s, cable {:.2}° → {:.2}°",
        report.before.omega, report.after.omega, report.before.cable_pos, report.after.cable_pos
    );
    Ok(())
}
