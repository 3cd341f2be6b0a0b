//! Flight plans, the parametric mass model, and assembly of a flyable vehicle from its volume.

pub mod aero;
pub mod mass;
pub mod plan;

use std::sync::Arc;

use ascent_atmosphere::AtmosphereModel;
use ascent_core::design::PlaneDesign;
use ascent_core::units::ft_to_m;
use ascent_propulsion::{EngineSizing, PropulsionManager};
use ascent_thermal::ThermalModel;
use log::debug;

pub use aero::{AeroModel, LiftingBodyAero};
pub use mass::{EngineFamilies, MassBreakdown, MassModel};
pub use plan::{FlightPlan, PlanError, Waypoint};

/// Highest recovery temperature (°C) reached at any waypoint of the plan.
///
/// Waypoints are evaluated at their target altitude and Mach; the ground start contributes
/// ambient temperature.
pub fn peak_plan_temperature(waypoints: &[Waypoint], design: &PlaneDesign) -> f64 {
    let atmosphere = AtmosphereModel::new();
    let thermal = ThermalModel::new();
    waypoints
        .iter()
        .map(|wp| {
            let altitude_m = ft_to_m(wp.altitude_ft);
            let velocity = wp.mach * atmosphere.speed_of_sound(altitude_m);
            thermal.recovery_temperature(altitude_m, velocity, design)
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

/// A sized vehicle ready to fly a plan.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub volume_m3: f64,
    pub dry_mass_kg: f64,
    pub fuel_capacity_kg: f64,
    pub engines: EngineSizing,
    pub mass: MassBreakdown,
    aero: Arc<dyn AeroModel>,
}

impl Vehicle {
    /// Size a vehicle of `volume_m3` for `plan` using the baseline mass model.
    pub fn from_volume(volume_m3: f64, plan: &FlightPlan, design: &PlaneDesign) -> Self {
        Self::from_volume_with(&MassModel::default(), volume_m3, plan, design)
    }

    pub fn from_volume_with(
        model: &MassModel,
        volume_m3: f64,
        plan: &FlightPlan,
        design: &PlaneDesign,
    ) -> Self {
        let waypoints = plan.waypoints();
        let peak = peak_plan_temperature(waypoints, design);
        let mass = model.breakdown(volume_m3, waypoints, design, peak);
        let engines = model.engine_sizing(volume_m3, waypoints, design, peak);
        let vehicle = Self {
            volume_m3,
            dry_mass_kg: mass.total_kg(),
            fuel_capacity_kg: model.fuel_capacity(volume_m3),
            engines,
            mass,
            aero: Arc::new(LiftingBodyAero::new(MassModel::reference_area(volume_m3))),
        };
        debug!(
            "sized vehicle: V={volume_m3:.0} m³ dry={:.0} kg fuel={:.0} kg engines={:?}",
            vehicle.dry_mass_kg, vehicle.fuel_capacity_kg, vehicle.engines
        );
        vehicle
    }

    /// Replace the drag model.
    pub fn with_aero(mut self, aero: Arc<dyn AeroModel>) -> Self {
        self.aero = aero;
        self
    }

    pub fn aero(&self) -> &dyn AeroModel {
        self.aero.as_ref()
    }

    pub fn gross_mass_kg(&self) -> f64 {
        self.dry_mass_kg + self.fuel_capacity_kg
    }

    /// Fresh engine installation with its own selection state.
    pub fn propulsion(&self) -> PropulsionManager {
        PropulsionManager::standard(&self.engines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ascent_propulsion::EngineMode;

    fn ascent_plan() -> FlightPlan {
        let mut plan = FlightPlan::new();
        plan.push(Waypoint::new(65_000.0, 3.1, EngineMode::Jet));
        plan.push(Waypoint::new(130_000.0, 6.0, EngineMode::Ramjet));
        plan
    }

    #[test]
    fn ground_only_plan_peaks_at_ambient() {
        let peak = peak_plan_temperature(&[Waypoint::ground()], &PlaneDesign::default());
        assert!((peak - 15.0).abs() < 1e-9);
    }

    #[test]
    fn peak_temperature_tracks_fastest_waypoint() {
        let plan = ascent_plan();
        let design = PlaneDesign::default();
        let peak = peak_plan_temperature(plan.waypoints(), &design);
        let last = plan.waypoints()[2];
        let altitude_m = ft_to_m(last.altitude_ft);
        let v = last.mach * AtmosphereModel::new().speed_of_sound(altitude_m);
        let expected = ThermalModel::new().recovery_temperature(altitude_m, v, &design);
        assert!((peak - expected).abs() < 1e-9);
    }

    #[test]
    fn vehicle_assembly_is_consistent() {
        let plan = ascent_plan();
        let vehicle = Vehicle::from_volume(3_000.0, &plan, &PlaneDesign::default());
        assert!((vehicle.dry_mass_kg - vehicle.mass.total_kg()).abs() < 1e-9);
        assert!(vehicle.fuel_capacity_kg > vehicle.dry_mass_kg);
        assert!(vehicle.engines.low_speed_units > 0);
        assert!(vehicle.engines.ramjet_capture_area_m2 > 0.0);
        assert_eq!(vehicle.engines.scramjet_capture_area_m2, 0.0);
        assert_eq!(vehicle.engines.rocket_engines, 0);
        let area = MassModel::reference_area(3_000.0);
        assert!((vehicle.aero().reference_area() - area).abs() < 1e-9);
        assert_eq!(vehicle.propulsion().engines().count(), 2);
    }
}
