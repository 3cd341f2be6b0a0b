//! Cooperative cancellation and background mission execution.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use ascent_core::design::PlaneDesign;
use ascent_vehicle::{FlightPlan, Vehicle};

use crate::mission::{MissionError, MissionResult, MissionSettings, simulate_mission};

/// Shared flag polled once per integration step.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// A mission running on its own thread.
#[derive(Debug)]
pub struct MissionHandle {
    token: CancellationToken,
    worker: JoinHandle<Result<MissionResult, MissionError>>,
}

impl MissionHandle {
    /// Ask the mission to stop at its next integration step.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Wait for the mission to finish.
    pub fn join(self) -> Result<MissionResult, MissionError> {
        self.worker.join().map_err(|_| MissionError::WorkerPanicked)?
    }
}

/// Run [`simulate_mission`] on a background thread.
pub fn spawn_mission(
    plan: FlightPlan,
    vehicle: Vehicle,
    design: PlaneDesign,
    settings: MissionSettings,
) -> MissionHandle {
    let token = CancellationToken::new();
    let worker_token = token.clone();
    let worker =
        thread::spawn(move || simulate_mission(&plan, &vehicle, &design, &settings, &worker_token));
    MissionHandle { token, worker }
}
