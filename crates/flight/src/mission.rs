//! Whole-plan execution and scoring.

use ascent_atmosphere::AtmosphereModel;
use ascent_core::design::PlaneDesign;
use ascent_core::units::m_to_ft;
use ascent_thermal::ThermalModel;
use ascent_vehicle::{FlightPlan, PlanError, Vehicle};
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::cancel::CancellationToken;
use crate::segment::{
    FlightSegmentResult, FlightState, SegmentSimulator, SettingsError, SimulationSettings,
    TerminationReason,
};

/// Points awarded for full progress toward the orbital thresholds.
pub const PROGRESS_POINTS: f64 = 1_000.0;
/// Flat bonus for reaching orbit.
pub const ORBIT_BONUS_POINTS: f64 = 1_000.0;
/// Bonus per unit fraction of propellant left on reaching orbit.
pub const FUEL_BONUS_POINTS: f64 = 1_000.0;

/// Final conditions that count as orbital.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitCriteria {
    pub altitude_m: f64,
    pub mach: f64,
}

impl Default for OrbitCriteria {
    fn default() -> Self {
        Self {
            altitude_m: 100_000.0,
            mach: 22.0,
        }
    }
}

impl OrbitCriteria {
    pub fn is_met(&self, altitude_m: f64, mach: f64) -> bool {
        altitude_m >= self.altitude_m && mach >= self.mach
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MissionSettings {
    pub simulation: SimulationSettings,
    pub orbit: OrbitCriteria,
}

#[derive(Debug, Error)]
pub enum MissionError {
    #[error("invalid flight plan: {0}")]
    InvalidPlan(#[from] PlanError),
    #[error("invalid simulation settings: {0}")]
    InvalidSettings(#[from] SettingsError),
    #[error("mission worker thread panicked")]
    WorkerPanicked,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissionResult {
    pub segments: Vec<FlightSegmentResult>,
    pub total_fuel_used_kg: f64,
    pub fuel_remaining_kg: f64,
    pub total_time_s: f64,
    pub success: bool,
    pub final_altitude_ft: f64,
    pub final_mach: f64,
    pub score: u32,
    pub max_temperature_c: f64,
}

/// Score a finished mission: progress toward orbit, plus a bonus scaled by leftover
/// propellant when orbit is reached.
pub fn mission_score(
    criteria: &OrbitCriteria,
    final_altitude_m: f64,
    final_mach: f64,
    success: bool,
    fuel_fraction_remaining: f64,
) -> u32 {
    let altitude_progress = (final_altitude_m / criteria.altitude_m).clamp(0.0, 1.0);
    let mach_progress = (final_mach / criteria.mach).clamp(0.0, 1.0);
    let mut score = PROGRESS_POINTS * 0.5 * (altitude_progress + mach_progress);
    if success {
        score += ORBIT_BONUS_POINTS + FUEL_BONUS_POINTS * fuel_fraction_remaining.clamp(0.0, 1.0);
    }
    if score.is_finite() { score.round() as u32 } else { 0 }
}

/// Fly every segment of `plan` starting at rest on the ground with a full tank.
///
/// Segments that time out or diverge hand their end state to the next segment; running out of
/// propellant or being cancelled ends the mission.
pub fn simulate_mission(
    plan: &FlightPlan,
    vehicle: &Vehicle,
    design: &PlaneDesign,
    settings: &MissionSettings,
    cancel: &CancellationToken,
) -> Result<MissionResult, MissionError> {
    plan.validate_for(vehicle.engines.low_speed_kind)?;
    let simulator = SegmentSimulator::checked(settings.simulation)?;

    let mut manager = vehicle.propulsion();
    let mut state = FlightState::on_ground(vehicle.fuel_capacity_kg);
    let mut segments: Vec<FlightSegmentResult> = Vec::with_capacity(plan.len().saturating_sub(1));

    for (index, (from, to)) in plan.segments().enumerate() {
        let result = simulator.simulate(from, to, state, vehicle, design, &mut manager, cancel);
        state = result.final_state;
        let termination = result.termination;
        segments.push(result);
        if !termination.allows_continuation() {
            warn!("mission stopped in segment {} ({termination:?})", index + 1);
            break;
        }
    }

    let final_altitude_m = state.altitude_m;
    let final_mach = state.velocity_m_s / AtmosphereModel::new().speed_of_sound(final_altitude_m);
    let success = settings.orbit.is_met(final_altitude_m, final_mach);
    let fuel_fraction = if vehicle.fuel_capacity_kg > 0.0 {
        state.fuel_kg / vehicle.fuel_capacity_kg
    } else {
        0.0
    };
    let ground_temperature_c = ThermalModel::new().recovery_temperature(0.0, 0.0, design);
    let max_temperature_c = segments
        .iter()
        .map(|s| s.max_temperature_c)
        .fold(ground_temperature_c, f64::max);

    let result = MissionResult {
        total_fuel_used_kg: segments.iter().map(|s| s.fuel_used_kg).sum(),
        fuel_remaining_kg: state.fuel_kg,
        total_time_s: state.time_s,
        success,
        final_altitude_ft: m_to_ft(final_altitude_m),
        final_mach,
        score: mission_score(
            &settings.orbit,
            final_altitude_m,
            final_mach,
            success,
            fuel_fraction,
        ),
        max_temperature_c,
        segments,
    };
    info!(
        "mission finished: success={} score={} fuel used={:.0} kg time={:.1} s",
        result.success, result.score, result.total_fuel_used_kg, result.total_time_s
    );
    Ok(result)
}
