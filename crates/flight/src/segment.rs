//! Explicit-Euler integration of a single waypoint-to-waypoint segment.

use ascent_atmosphere::AtmosphereModel;
use ascent_core::constants::G0;
use ascent_core::design::PlaneDesign;
use ascent_core::gravity;
use ascent_core::units::{ft_to_m, m_to_ft};
use ascent_propulsion::{EngineMode, PropulsionManager};
use ascent_thermal::ThermalModel;
use ascent_vehicle::{Vehicle, Waypoint};
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::cancel::CancellationToken;

/// Integrator and termination tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationSettings {
    pub time_step_s: f64,
    pub max_segment_duration_s: f64,
    /// Target capture tolerance on altitude (m).
    pub altitude_tolerance_m: f64,
    /// Target capture tolerance on velocity (m/s).
    pub velocity_tolerance_m_s: f64,
    /// Divergence is not declared before this much segment time has elapsed. Also the
    /// longest stretch without available thrust tolerated while short of the target energy.
    pub divergence_grace_s: f64,
    /// Growth of the altitude error beyond its initial value that counts as divergence (m).
    pub divergence_margin_m: f64,
    pub sample_interval_s: f64,
    /// Time constant of the flight-path angle loop (s).
    pub climb_time_constant_s: f64,
    /// Limit on |sin γ|.
    pub max_climb_sine: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            time_step_s: 0.1,
            max_segment_duration_s: 1_000.0,
            altitude_tolerance_m: ft_to_m(1_000.0),
            velocity_tolerance_m_s: 50.0,
            divergence_grace_s: 10.0,
            divergence_margin_m: ft_to_m(50_000.0),
            sample_interval_s: 1.0,
            climb_time_constant_s: 10.0,
            max_climb_sine: 0.5,
        }
    }
}

/// A [`SimulationSettings`] field that would stall or destabilise the integrator.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("{field} must be finite and positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be finite and non-negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("max_climb_sine must lie in (0, 1] (got {0})")]
    ClimbSineOutOfRange(f64),
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("time_step_s", self.time_step_s),
            ("max_segment_duration_s", self.max_segment_duration_s),
            ("sample_interval_s", self.sample_interval_s),
            ("altitude_tolerance_m", self.altitude_tolerance_m),
            ("velocity_tolerance_m_s", self.velocity_tolerance_m_s),
            ("climb_time_constant_s", self.climb_time_constant_s),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::NotPositive { field, value });
            }
        }
        for (field, value) in [
            ("divergence_grace_s", self.divergence_grace_s),
            ("divergence_margin_m", self.divergence_margin_m),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SettingsError::Negative { field, value });
            }
        }
        if !(self.max_climb_sine > 0.0 && self.max_climb_sine <= 1.0) {
            return Err(SettingsError::ClimbSineOutOfRange(self.max_climb_sine));
        }
        Ok(())
    }
}

/// Kinematic and propellant state carried between segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlightState {
    /// Mission elapsed time (s).
    pub time_s: f64,
    pub altitude_m: f64,
    pub velocity_m_s: f64,
    pub fuel_kg: f64,
}

impl FlightState {
    /// At rest on the runway with `fuel_kg` aboard.
    pub fn on_ground(fuel_kg: f64) -> Self {
        Self {
            time_s: 0.0,
            altitude_m: 0.0,
            velocity_m_s: 0.0,
            fuel_kg,
        }
    }
}

/// Why a segment stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TerminationReason {
    FuelExhausted,
    TargetReached,
    Diverged,
    Cancelled,
    TimedOut,
}

impl TerminationReason {
    /// Whether the mission can carry on after a segment ending this way.
    pub fn allows_continuation(self) -> bool {
        !matches!(
            self,
            TerminationReason::FuelExhausted | TerminationReason::Cancelled
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    pub time_s: f64,
    pub altitude_ft: f64,
    pub mach: f64,
    pub fuel_remaining_kg: f64,
    pub engine_mode: EngineMode,
    pub temperature_c: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlightSegmentResult {
    pub trajectory: Vec<TrajectoryPoint>,
    pub fuel_used_kg: f64,
    pub final_altitude_ft: f64,
    pub final_mach: f64,
    pub duration_s: f64,
    /// Mode in use for the longest time during the segment.
    pub engine_used: EngineMode,
    pub termination: TerminationReason,
    pub max_temperature_c: f64,
    pub final_state: FlightState,
}

/// Accumulates time spent in each engine mode.
#[derive(Debug, Default)]
struct ModeClock {
    totals: Vec<(EngineMode, f64)>,
}

impl ModeClock {
    fn tick(&mut self, mode: EngineMode, dt: f64) {
        match self.totals.iter_mut().find(|(m, _)| *m == mode) {
            Some((_, total)) => *total += dt,
            None => self.totals.push((mode, dt)),
        }
    }

    /// Longest-running mode; the earliest one wins ties.
    fn dominant(&self) -> Option<EngineMode> {
        let mut best: Option<(EngineMode, f64)> = None;
        for &(mode, total) in &self.totals {
            if best.is_none_or(|(_, t)| total > t) {
                best = Some((mode, total));
            }
        }
        best.map(|(mode, _)| mode)
    }
}

/// Specific mechanical energy (J/kg) used by the guidance law.
fn specific_energy(altitude_m: f64, velocity_m_s: f64) -> f64 {
    0.5 * velocity_m_s * velocity_m_s + gravity::acceleration(altitude_m) * altitude_m
}

/// Energy-managed point-mass integrator for one segment.
#[derive(Debug, Clone, Default)]
pub struct SegmentSimulator {
    settings: SimulationSettings,
    atmosphere: AtmosphereModel,
    thermal: ThermalModel,
}

impl SegmentSimulator {
    /// Callers own validation; see [`SegmentSimulator::checked`].
    pub fn new(settings: SimulationSettings) -> Self {
        Self {
            settings,
            atmosphere: AtmosphereModel::new(),
            thermal: ThermalModel::new(),
        }
    }

    pub fn checked(settings: SimulationSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::new(settings))
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    fn mach(&self, altitude_m: f64, velocity_m_s: f64) -> f64 {
        velocity_m_s / self.atmosphere.speed_of_sound(altitude_m)
    }

    fn sample(
        &self,
        state: &FlightState,
        mode: EngineMode,
        design: &PlaneDesign,
    ) -> TrajectoryPoint {
        TrajectoryPoint {
            time_s: state.time_s,
            altitude_ft: m_to_ft(state.altitude_m),
            mach: self.mach(state.altitude_m, state.velocity_m_s),
            fuel_remaining_kg: state.fuel_kg,
            engine_mode: mode,
            temperature_c: self.thermal.recovery_temperature(
                state.altitude_m,
                state.velocity_m_s,
                design,
            ),
        }
    }

    /// Fly from `state` toward `to`.
    ///
    /// Guidance drives specific energy toward the target while the flight-path angle follows an
    /// altitude schedule that is quadratic in energy progress, so the vehicle gains most of its
    /// speed low and climbs as it approaches the target energy.
    #[allow(clippy::too_many_arguments)]
    pub fn simulate(
        &self,
        from: &Waypoint,
        to: &Waypoint,
        start: FlightState,
        vehicle: &Vehicle,
        design: &PlaneDesign,
        manager: &mut PropulsionManager,
        cancel: &CancellationToken,
    ) -> FlightSegmentResult {
        let cfg = &self.settings;
        let dt = cfg.time_step_s;

        let target_altitude_m = ft_to_m(to.altitude_ft);
        let target_velocity = to.mach * self.atmosphere.speed_of_sound(target_altitude_m);
        let target_energy = specific_energy(target_altitude_m, target_velocity);
        let start_energy = specific_energy(start.altitude_m, start.velocity_m_s);
        let energy_span = target_energy - start_energy;
        let capture_energy = G0 * cfg.altitude_tolerance_m;
        let altitude_span = target_altitude_m - start.altitude_m;
        let initial_altitude_error = altitude_span.abs();
        let max_accel = to.max_g * G0;

        if to.engine_mode.is_auto() {
            manager.enable_auto_mode();
        } else {
            manager.set_manual_engine(to.engine_mode);
        }

        let mut state = start;
        let mut elapsed = 0.0_f64;
        let mut clock = ModeClock::default();
        let mut max_temperature = f64::NEG_INFINITY;
        let mut next_sample = cfg.sample_interval_s;
        let mut unpowered_s = 0.0_f64;

        let first = self.sample(&state, manager.current_mode(), design);
        max_temperature = max_temperature.max(first.temperature_c);
        let mut trajectory = vec![first];

        let termination = loop {
            let h = state.altitude_m;
            let v = state.velocity_m_s;
            let air = self.atmosphere.state(h);
            let mach = v / air.speed_of_sound_m_s;
            let altitude_ft = m_to_ft(h);

            manager.update(altitude_ft, mach);
            let mode = manager.current_mode();
            let available = if state.fuel_kg > 0.0 {
                manager.performance(altitude_ft, mach)
            } else {
                Default::default()
            };

            let mass = vehicle.dry_mass_kg + state.fuel_kg;
            let g = gravity::acceleration(h);
            let energy = 0.5 * v * v + g * h;
            let q = 0.5 * air.density_kg_m3 * v * v;
            let drag = vehicle.aero().drag(q, mach);

            // Altitude schedule and flight-path angle.
            let progress = if energy_span.abs() > f64::EPSILON {
                ((energy - start_energy) / energy_span).clamp(0.0, 1.0)
            } else {
                1.0
            };
            let commanded_altitude = if (target_energy - energy).abs() < capture_energy {
                target_altitude_m
            } else {
                start.altitude_m + altitude_span * progress * progress
            };
            let climb_rate = (commanded_altitude - h) / cfg.climb_time_constant_s;
            let mut climb_sine =
                (climb_rate / v.max(1.0)).clamp(-cfg.max_climb_sine, cfg.max_climb_sine);
            if h <= 0.0 {
                climb_sine = climb_sine.max(0.0);
            }

            // Throttle toward the target energy.
            let thrust = if energy < target_energy && available.thrust_n > 0.0 {
                let desired_accel = (0.5 * (target_energy - energy) / v.max(1.0)).min(max_accel);
                (mass * desired_accel + drag).clamp(0.0, available.thrust_n)
            } else {
                0.0
            };
            let throttle = if available.thrust_n > 0.0 {
                thrust / available.thrust_n
            } else {
                0.0
            };

            let accel = (thrust - drag) / mass - g * climb_sine;
            state.velocity_m_s = v + accel * dt;
            state.altitude_m = h + state.velocity_m_s * climb_sine * dt;
            if state.altitude_m <= 0.0 {
                state.altitude_m = 0.0;
                state.velocity_m_s = state.velocity_m_s.max(0.0);
            }
            if available.thrust_n <= 0.0 && energy < target_energy - capture_energy {
                unpowered_s += dt;
            } else {
                unpowered_s = 0.0;
            }
            state.fuel_kg =
                (state.fuel_kg - available.propellant_flow_kg_s * throttle * dt).max(0.0);
            state.time_s += dt;
            elapsed += dt;
            clock.tick(mode, dt);

            let temperature =
                self.thermal.recovery_temperature(state.altitude_m, state.velocity_m_s, design);
            max_temperature = max_temperature.max(temperature);
            if elapsed + 1e-9 >= next_sample {
                trajectory.push(self.sample(&state, mode, design));
                next_sample += cfg.sample_interval_s;
            }

            let altitude_error = (state.altitude_m - target_altitude_m).abs();
            if state.fuel_kg <= 0.0 {
                break TerminationReason::FuelExhausted;
            }
            if altitude_error < cfg.altitude_tolerance_m
                && (state.velocity_m_s - target_velocity).abs() < cfg.velocity_tolerance_m_s
            {
                break TerminationReason::TargetReached;
            }
            if elapsed > cfg.divergence_grace_s
                && (altitude_error > initial_altitude_error + cfg.divergence_margin_m
                    || state.velocity_m_s < 0.0
                    || unpowered_s >= cfg.divergence_grace_s)
            {
                break TerminationReason::Diverged;
            }
            if cancel.is_cancelled() {
                break TerminationReason::Cancelled;
            }
            if elapsed + 1e-9 >= cfg.max_segment_duration_s {
                break TerminationReason::TimedOut;
            }
        };

        let final_mode = manager.current_mode();
        if trajectory
            .last()
            .is_none_or(|last| (last.time_s - state.time_s).abs() > 1e-9)
        {
            trajectory.push(self.sample(&state, final_mode, design));
        }

        let final_mach = self.mach(state.altitude_m, state.velocity_m_s);
        let result = FlightSegmentResult {
            trajectory,
            fuel_used_kg: start.fuel_kg - state.fuel_kg,
            final_altitude_ft: m_to_ft(state.altitude_m),
            final_mach,
            duration_s: elapsed,
            engine_used: clock.dominant().unwrap_or(final_mode),
            termination,
            max_temperature_c: max_temperature,
            final_state: state,
        };

        let summary = format!(
            "segment M{:.2}/{:.0} ft -> M{:.2}/{:.0} ft ended {:?} after {:.1} s at M{:.2}/{:.0} ft",
            from.mach,
            from.altitude_ft,
            to.mach,
            to.altitude_ft,
            termination,
            elapsed,
            final_mach,
            result.final_altitude_ft
        );
        match termination {
            TerminationReason::FuelExhausted | TerminationReason::Diverged => warn!("{summary}"),
            _ => info!("{summary}"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ascent_vehicle::FlightPlan;

    fn vehicle_for(plan: &FlightPlan) -> Vehicle {
        Vehicle::from_volume(3_000.0, plan, &PlaneDesign::default())
    }

    fn climb_plan() -> FlightPlan {
        let mut plan = FlightPlan::new();
        plan.push(Waypoint::new(30_000.0, 0.8, EngineMode::Jet));
        plan
    }

    #[test]
    fn subsonic_climb_reaches_target() {
        let plan = climb_plan();
        let vehicle = vehicle_for(&plan);
        let mut manager = vehicle.propulsion();
        let sim = SegmentSimulator::default();
        let wps = plan.waypoints();
        let result = sim.simulate(
            &wps[0],
            &wps[1],
            FlightState::on_ground(vehicle.fuel_capacity_kg),
            &vehicle,
            &PlaneDesign::default(),
            &mut manager,
            &CancellationToken::new(),
        );
        assert_eq!(result.termination, TerminationReason::TargetReached);
        assert_eq!(result.engine_used, EngineMode::Jet);
        assert!((result.final_altitude_ft - 30_000.0).abs() < 1_000.0);
        assert!(result.fuel_used_kg > 0.0);
    }

    #[test]
    fn samples_are_ordered_and_bracket_the_segment() {
        let plan = climb_plan();
        let vehicle = vehicle_for(&plan);
        let mut manager = vehicle.propulsion();
        let sim = SegmentSimulator::default();
        let wps = plan.waypoints();
        let result = sim.simulate(
            &wps[0],
            &wps[1],
            FlightState::on_ground(vehicle.fuel_capacity_kg),
            &vehicle,
            &PlaneDesign::default(),
            &mut manager,
            &CancellationToken::new(),
        );
        let traj = &result.trajectory;
        assert_eq!(traj[0].time_s, 0.0);
        assert_eq!(traj[0].altitude_ft, 0.0);
        assert!((traj[traj.len() - 1].time_s - result.duration_s).abs() < 1e-6);
        assert!(traj.windows(2).all(|w| w[1].time_s > w[0].time_s));
        assert!(traj.iter().all(|p| p.fuel_remaining_kg >= 0.0));
        // Roughly one sample per simulated second plus the endpoints.
        assert!(traj.len() as f64 <= result.duration_s + 2.0);
    }

    #[test]
    fn empty_tank_stops_immediately() {
        let plan = climb_plan();
        let vehicle = vehicle_for(&plan);
        let mut manager = vehicle.propulsion();
        let sim = SegmentSimulator::default();
        let wps = plan.waypoints();
        let result = sim.simulate(
            &wps[0],
            &wps[1],
            FlightState::on_ground(0.0),
            &vehicle,
            &PlaneDesign::default(),
            &mut manager,
            &CancellationToken::new(),
        );
        assert_eq!(result.termination, TerminationReason::FuelExhausted);
        assert_eq!(result.fuel_used_kg, 0.0);
        assert_eq!(result.final_state.altitude_m, 0.0);
    }

    #[test]
    fn cancellation_is_honoured() {
        let plan = climb_plan();
        let vehicle = vehicle_for(&plan);
        let mut manager = vehicle.propulsion();
        let sim = SegmentSimulator::default();
        let token = CancellationToken::new();
        token.cancel();
        let wps = plan.waypoints();
        let result = sim.simulate(
            &wps[0],
            &wps[1],
            FlightState::on_ground(vehicle.fuel_capacity_kg),
            &vehicle,
            &PlaneDesign::default(),
            &mut manager,
            &token,
        );
        assert_eq!(result.termination, TerminationReason::Cancelled);
        assert!(result.duration_s < 0.2);
        assert_eq!(result.trajectory.len(), 2);
    }

    #[test]
    fn missing_engine_diverges_on_the_runway() {
        let plan = climb_plan();
        let vehicle = vehicle_for(&plan);
        let mut manager = vehicle.propulsion();
        let sim = SegmentSimulator::new(SimulationSettings {
            max_segment_duration_s: 60.0,
            ..SimulationSettings::default()
        });
        // The plan only installs the low-speed family; a rocket override finds nothing.
        let to = Waypoint::new(30_000.0, 0.8, EngineMode::Rocket);
        let result = sim.simulate(
            &plan.waypoints()[0],
            &to,
            FlightState::on_ground(vehicle.fuel_capacity_kg),
            &vehicle,
            &PlaneDesign::default(),
            &mut manager,
            &CancellationToken::new(),
        );
        assert_eq!(result.termination, TerminationReason::Diverged);
        assert!(result.duration_s > 10.0 && result.duration_s < 10.5, "t = {}", result.duration_s);
        assert_eq!(result.fuel_used_kg, 0.0);
        assert_eq!(result.final_state.velocity_m_s, 0.0);
    }

    #[test]
    fn engine_out_above_its_envelope_diverges() {
        // Jet-only vehicle released at Mach 5, where the low-speed engine is silent.
        let plan = climb_plan();
        let vehicle = vehicle_for(&plan);
        let mut manager = vehicle.propulsion();
        let sim = SegmentSimulator::default();
        let start = FlightState {
            time_s: 0.0,
            altitude_m: 20_000.0,
            velocity_m_s: 5.0 * 295.07,
            fuel_kg: vehicle.fuel_capacity_kg,
        };
        let from = Waypoint::new(m_to_ft(20_000.0), 5.0, EngineMode::Jet);
        let to = Waypoint::new(m_to_ft(40_000.0), 6.0, EngineMode::Jet);
        let result = sim.simulate(
            &from,
            &to,
            start,
            &vehicle,
            &PlaneDesign::default(),
            &mut manager,
            &CancellationToken::new(),
        );
        assert_eq!(result.termination, TerminationReason::Diverged);
        assert!(result.duration_s < 11.0, "t = {}", result.duration_s);
        assert_eq!(result.fuel_used_kg, 0.0);
    }

    #[test]
    fn degenerate_settings_are_rejected() {
        assert!(SimulationSettings::default().validate().is_ok());
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let settings = SimulationSettings {
                time_step_s: dt,
                ..SimulationSettings::default()
            };
            assert!(
                matches!(
                    SegmentSimulator::checked(settings),
                    Err(SettingsError::NotPositive { field: "time_step_s", .. })
                ),
                "dt = {dt}"
            );
        }
        let endless = SimulationSettings {
            max_segment_duration_s: f64::INFINITY,
            ..SimulationSettings::default()
        };
        assert!(matches!(
            endless.validate(),
            Err(SettingsError::NotPositive { field: "max_segment_duration_s", .. })
        ));
        let no_samples = SimulationSettings {
            sample_interval_s: 0.0,
            ..SimulationSettings::default()
        };
        assert!(no_samples.validate().is_err());
        let vertical = SimulationSettings {
            max_climb_sine: 1.5,
            ..SimulationSettings::default()
        };
        assert_eq!(vertical.validate(), Err(SettingsError::ClimbSineOutOfRange(1.5)));
    }

    #[test]
    fn mode_clock_prefers_longest_then_earliest() {
        let mut clock = ModeClock::default();
        clock.tick(EngineMode::Jet, 1.0);
        clock.tick(EngineMode::Ramjet, 1.0);
        assert_eq!(clock.dominant(), Some(EngineMode::Jet));
        clock.tick(EngineMode::Ramjet, 0.5);
        assert_eq!(clock.dominant(), Some(EngineMode::Ramjet));
    }
}
