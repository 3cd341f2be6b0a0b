//! Time-stepped ascent simulation: segment integrator, mission runner, and cancellation.

pub mod cancel;
pub mod mission;
pub mod segment;

pub use cancel::{CancellationToken, MissionHandle, spawn_mission};
pub use mission::{
    MissionError, MissionResult, MissionSettings, OrbitCriteria, mission_score, simulate_mission,
};
pub use segment::{
    FlightSegmentResult, FlightState, SegmentSimulator, SettingsError, SimulationSettings,
    TerminationReason, TrajectoryPoint,
};
