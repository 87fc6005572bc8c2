use wt_controls::OperatingStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingScenario,
    CheckingCache,
    LoadingCachedResult,
    Compiling,
    Simulating,
    SavingResults,
    Completed,
}

#[derive(Debug, Clone)]
pub struct SimulationProgress {
    pub tick: usize,
    pub total_ticks: usize,
    pub sim_time_s: f64,
    pub fraction_complete: f64,
    pub segment: usize,
    pub status: OperatingStatus,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub simulation: Option<SimulationProgress>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            simulation: None,
        }
    }
}
