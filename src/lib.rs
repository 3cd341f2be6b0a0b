//! Hypersonic ascent simulation and vehicle sizing.
//!
//! The physics lives in the `ascent_*` workspace crates. This facade re-exports them and turns
//! scenario configuration into runtime values.

pub mod scenario;

pub use ascent_atmosphere;
pub use ascent_config;
pub use ascent_core;
pub use ascent_flight;
pub use ascent_propulsion;
pub use ascent_sizing;
pub use ascent_thermal;
pub use ascent_vehicle;

pub use ascent_core::design::PlaneDesign;
pub use ascent_flight::{CancellationToken, MissionResult, simulate_mission, spawn_mission};
pub use ascent_propulsion::EngineMode;
pub use ascent_sizing::{OptimizationResult, SizingOptimizer};
pub use ascent_vehicle::{FlightPlan, Vehicle, Waypoint};

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
