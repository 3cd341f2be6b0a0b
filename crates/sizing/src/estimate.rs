//! Closed-form whole-mission propellant estimate.
//!
//! Each segment's energy change is turned into an effective delta-V with a fixed loss margin,
//! then into a Tsiolkovsky mass ratio using the specific impulse of the engine flying that
//! segment. Chaining the ratios from the dry mass gives the propellant the mission needs.

use ascent_atmosphere::AtmosphereModel;
use ascent_core::constants::G0;
use ascent_core::units::ft_to_m;
use ascent_propulsion::{EngineMode, Rocket, rocket};
use ascent_vehicle::{FlightPlan, Vehicle, Waypoint};
use log::warn;
use serde::Serialize;

/// Multiplier on the ideal delta-V covering drag and gravity losses.
pub const LOSS_FACTOR: f64 = 1.1;
/// Floor on the mean segment speed used to convert energy to delta-V (m/s).
pub const MIN_MEAN_SPEED_M_S: f64 = 100.0;
/// Specific impulse assumed when no installed engine can fly a segment (s).
pub const FALLBACK_ISP_S: f64 = rocket::SEA_LEVEL_ISP_S;

/// Propellant budget for a contiguous run of rocket segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PropellantRequirement {
    /// Index of the first segment in the run (segment `i` flies waypoint `i` to `i + 1`).
    pub first_segment: usize,
    pub segment_count: usize,
    pub delta_v_m_s: f64,
    pub initial_mass_kg: f64,
    pub final_mass_kg: f64,
    pub fuel_kg: f64,
    pub oxidizer_kg: f64,
    pub average_isp_s: f64,
}

/// Per-segment terms of the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentEstimate {
    pub engine_mode: EngineMode,
    pub delta_v_m_s: f64,
    pub specific_impulse_s: f64,
    pub mass_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelEstimate {
    pub fuel_required_kg: f64,
    pub mass_ratio: f64,
    pub segments: Vec<SegmentEstimate>,
    pub rocket_requirements: Vec<PropellantRequirement>,
}

/// Source of the propellant requirement the sizing loop balances against tank capacity.
pub trait FuelEstimator {
    fn estimate(&self, plan: &FlightPlan, vehicle: &Vehicle) -> FuelEstimate;
}

/// Energy-based estimate over the waypoints of a plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissionFuelEstimate {
    atmosphere: AtmosphereModel,
}

impl MissionFuelEstimate {
    pub fn new() -> Self {
        Self::default()
    }

    fn speed(&self, wp: &Waypoint) -> f64 {
        wp.mach * self.atmosphere.speed_of_sound(ft_to_m(wp.altitude_ft))
    }

    fn energy(&self, wp: &Waypoint) -> f64 {
        let v = self.speed(wp);
        0.5 * v * v + G0 * ft_to_m(wp.altitude_ft)
    }

    /// Effective delta-V (m/s) needed to fly from `from` to `to`.
    pub fn segment_delta_v(&self, from: &Waypoint, to: &Waypoint) -> f64 {
        let gain = (self.energy(to) - self.energy(from)).max(0.0);
        let mean_speed = (0.5 * (self.speed(from) + self.speed(to))).max(MIN_MEAN_SPEED_M_S);
        LOSS_FACTOR * gain / mean_speed
    }

    /// Engine mode and specific impulse for a segment, sampled at its midpoint.
    fn segment_engine(
        &self,
        vehicle: &Vehicle,
        from: &Waypoint,
        to: &Waypoint,
    ) -> (EngineMode, f64) {
        let mid_altitude_ft = 0.5 * (from.altitude_ft + to.altitude_ft);
        let mid_mach = 0.5 * (from.mach + to.mach);
        let mut manager = vehicle.propulsion();
        if to.engine_mode.is_auto() {
            manager.update(mid_altitude_ft, mid_mach);
        } else {
            manager.set_manual_engine(to.engine_mode);
        }
        let mode = manager.current_mode();
        let isp = [(mid_altitude_ft, mid_mach), (to.altitude_ft, to.mach)]
            .into_iter()
            .map(|(alt, mach)| manager.performance(alt, mach).specific_impulse_s())
            .find(|isp| *isp > 0.0);
        match isp {
            Some(isp) => (mode, isp),
            None => {
                warn!(
                    "no {mode} thrust between M{:.2} and M{:.2}; assuming {FALLBACK_ISP_S} s",
                    from.mach, to.mach
                );
                (mode, FALLBACK_ISP_S)
            }
        }
    }
}

impl FuelEstimator for MissionFuelEstimate {
    fn estimate(&self, plan: &FlightPlan, vehicle: &Vehicle) -> FuelEstimate {
        let segments: Vec<SegmentEstimate> = plan
            .segments()
            .map(|(from, to)| {
                let delta_v_m_s = self.segment_delta_v(from, to);
                let (engine_mode, specific_impulse_s) = self.segment_engine(vehicle, from, to);
                SegmentEstimate {
                    engine_mode,
                    delta_v_m_s,
                    specific_impulse_s,
                    mass_ratio: (delta_v_m_s / (specific_impulse_s * G0)).exp(),
                }
            })
            .collect();
        let mass_ratio: f64 = segments.iter().map(|s| s.mass_ratio).product();

        // Mass at the end of each segment, walking back from the dry vehicle.
        let mut mass_after = vec![vehicle.dry_mass_kg; segments.len()];
        for i in (0..segments.len().saturating_sub(1)).rev() {
            mass_after[i] = mass_after[i + 1] * segments[i + 1].mass_ratio;
        }

        FuelEstimate {
            fuel_required_kg: vehicle.dry_mass_kg * (mass_ratio - 1.0),
            mass_ratio,
            rocket_requirements: rocket_runs(&segments, &mass_after),
            segments,
        }
    }
}

fn rocket_runs(segments: &[SegmentEstimate], mass_after: &[f64]) -> Vec<PropellantRequirement> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < segments.len() {
        if segments[i].engine_mode != EngineMode::Rocket {
            i += 1;
            continue;
        }
        let start = i;
        while i < segments.len() && segments[i].engine_mode == EngineMode::Rocket {
            i += 1;
        }
        let run = &segments[start..i];
        let final_mass_kg = mass_after[i - 1];
        let initial_mass_kg = final_mass_kg * run.iter().map(|s| s.mass_ratio).product::<f64>();
        let delta_v_m_s: f64 = run.iter().map(|s| s.delta_v_m_s).sum();
        let log_ratio = (initial_mass_kg / final_mass_kg).ln();
        let split = Rocket::propellant_split(initial_mass_kg - final_mass_kg);
        runs.push(PropellantRequirement {
            first_segment: start,
            segment_count: run.len(),
            delta_v_m_s,
            initial_mass_kg,
            final_mass_kg,
            fuel_kg: split.fuel_kg,
            oxidizer_kg: split.oxidizer_kg,
            average_isp_s: if log_ratio > 0.0 {
                delta_v_m_s / (G0 * log_ratio)
            } else {
                run[0].specific_impulse_s
            },
        });
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use ascent_core::design::PlaneDesign;

    fn plan() -> FlightPlan {
        let mut plan = FlightPlan::new();
        plan.push(Waypoint::new(65_000.0, 3.1, EngineMode::Jet));
        plan.push(Waypoint::new(130_000.0, 6.0, EngineMode::Ramjet));
        plan.push(Waypoint::new(300_000.0, 12.0, EngineMode::Rocket));
        plan.push(Waypoint::new(600_000.0, 24.0, EngineMode::Rocket));
        plan
    }

    #[test]
    fn no_energy_gain_needs_no_delta_v() {
        let est = MissionFuelEstimate::new();
        let high = Waypoint::new(50_000.0, 2.0, EngineMode::Auto);
        let low = Waypoint::new(10_000.0, 0.5, EngineMode::Auto);
        assert_eq!(est.segment_delta_v(&high, &low), 0.0);
        assert!(est.segment_delta_v(&low, &high) > 0.0);
    }

    #[test]
    fn fuel_follows_chained_mass_ratio() {
        let plan = plan();
        let vehicle = Vehicle::from_volume(2_000.0, &plan, &PlaneDesign::default());
        let estimate = MissionFuelEstimate::new().estimate(&plan, &vehicle);
        assert_eq!(estimate.segments.len(), 4);
        let product: f64 = estimate.segments.iter().map(|s| s.mass_ratio).product();
        assert!((estimate.mass_ratio - product).abs() < 1e-12);
        assert!(
            (estimate.fuel_required_kg - vehicle.dry_mass_kg * (product - 1.0)).abs() < 1e-6
        );
        // Air-breathing segments run far more efficiently than the rocket.
        assert!(
            estimate.segments[1].specific_impulse_s > 5.0 * estimate.segments[3].specific_impulse_s
        );
    }

    #[test]
    fn consecutive_rocket_segments_form_one_requirement() {
        let plan = plan();
        let vehicle = Vehicle::from_volume(2_000.0, &plan, &PlaneDesign::default());
        let estimate = MissionFuelEstimate::new().estimate(&plan, &vehicle);
        assert_eq!(estimate.rocket_requirements.len(), 1);
        let req = estimate.rocket_requirements[0];
        assert_eq!(req.first_segment, 2);
        assert_eq!(req.segment_count, 2);
        assert!((req.final_mass_kg - vehicle.dry_mass_kg).abs() < 1e-6);
        let propellant = req.initial_mass_kg - req.final_mass_kg;
        assert!((req.fuel_kg + req.oxidizer_kg - propellant).abs() < 1e-6);
        assert!((req.oxidizer_kg / req.fuel_kg - 6.0).abs() < 1e-9);
        assert!(
            req.average_isp_s >= rocket::SEA_LEVEL_ISP_S
                && req.average_isp_s <= rocket::VACUUM_ISP_S
        );
    }
}
