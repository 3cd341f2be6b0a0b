//! Volume-driven dry-mass estimate and engine sizing.

use ascent_core::constants::G0;
use ascent_core::design::PlaneDesign;
use ascent_propulsion::{EngineMode, EngineSizing, LowSpeedKind, rocket, turbojet};
use ascent_thermal::ThermalModel;

use crate::plan::Waypoint;

/// Reference area (m²) per V^(2/3).
pub const REFERENCE_AREA_FACTOR: f64 = 2.5;
/// Inlet capture area as a fraction of reference area.
pub const CAPTURE_AREA_FRACTION: f64 = 0.35;

/// Engine families a plan calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineFamilies {
    pub low_speed: bool,
    pub ramjet: bool,
    pub scramjet: bool,
    pub rocket: bool,
}

impl EngineFamilies {
    pub const ALL: EngineFamilies = EngineFamilies {
        low_speed: true,
        ramjet: true,
        scramjet: true,
        rocket: true,
    };

    /// Families named by the plan. Any automatic waypoint after the ground start needs all of them.
    pub fn required_by(waypoints: &[Waypoint]) -> Self {
        let mut families = EngineFamilies::default();
        for wp in waypoints.iter().skip(1) {
            match wp.engine_mode {
                EngineMode::Auto => return EngineFamilies::ALL,
                EngineMode::Jet => families.low_speed = true,
                EngineMode::Ramjet => families.ramjet = true,
                EngineMode::Scramjet => families.scramjet = true,
                EngineMode::Rocket => families.rocket = true,
            }
        }
        families
    }

    pub fn needs_inlet(&self) -> bool {
        self.ramjet || self.scramjet
    }
}

/// Component masses making up the dry mass (kg).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MassBreakdown {
    pub fixed_kg: f64,
    pub structure_kg: f64,
    pub thermal_protection_kg: f64,
    pub low_speed_engines_kg: f64,
    pub rocket_engines_kg: f64,
    pub inlets_kg: f64,
}

impl MassBreakdown {
    /// Dry mass excluding engines and inlets.
    pub fn airframe_kg(&self) -> f64 {
        self.fixed_kg + self.structure_kg + self.thermal_protection_kg
    }

    pub fn propulsion_kg(&self) -> f64 {
        self.low_speed_engines_kg + self.rocket_engines_kg + self.inlets_kg
    }

    pub fn total_kg(&self) -> f64 {
        self.airframe_kg() + self.propulsion_kg()
    }
}

/// Parametric mass model. `Default` carries the baseline coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassModel {
    pub fixed_systems_kg: f64,
    pub structure_kg_per_m3: f64,
    pub tps_areal_density_kg_m2: f64,
    /// Wetted area per V^(2/3).
    pub wetted_area_factor: f64,
    pub usable_fuel_fraction: f64,
    pub fuel_bulk_density_kg_m3: f64,
    pub low_speed_kind: LowSpeedKind,
    /// Takeoff thrust as a fraction of gross weight.
    pub low_speed_thrust_to_weight: f64,
    pub low_speed_unit_thrust_n: f64,
    pub low_speed_unit_mass_kg: f64,
    pub rocket_thrust_to_weight: f64,
    pub rocket_engine_mass_kg: f64,
    pub inlet_kg_per_m2: f64,
}

impl Default for MassModel {
    fn default() -> Self {
        Self {
            fixed_systems_kg: 12_000.0,
            structure_kg_per_m3: 30.0,
            tps_areal_density_kg_m2: 4.0,
            wetted_area_factor: 6.0,
            usable_fuel_fraction: 0.65,
            fuel_bulk_density_kg_m3: 220.0,
            low_speed_kind: LowSpeedKind::EjectorRamjet,
            low_speed_thrust_to_weight: 0.7,
            low_speed_unit_thrust_n: 900_000.0,
            low_speed_unit_mass_kg: 2_500.0,
            rocket_thrust_to_weight: 0.6,
            rocket_engine_mass_kg: 3_200.0,
            inlet_kg_per_m2: 120.0,
        }
    }
}

impl MassModel {
    /// Baseline coefficients with afterburning turbojets serving the low-speed regime.
    pub fn with_turbojets() -> Self {
        Self {
            low_speed_kind: LowSpeedKind::Turbojet,
            low_speed_unit_thrust_n: turbojet::SEA_LEVEL_THRUST_N,
            low_speed_unit_mass_kg: 2_000.0,
            ..Self::default()
        }
    }

    pub fn fuel_capacity(&self, volume_m3: f64) -> f64 {
        self.usable_fuel_fraction * self.fuel_bulk_density_kg_m3 * volume_m3.max(0.0)
    }

    pub fn reference_area(volume_m3: f64) -> f64 {
        REFERENCE_AREA_FACTOR * volume_m3.max(0.0).powf(2.0 / 3.0)
    }

    pub fn capture_area(volume_m3: f64) -> f64 {
        CAPTURE_AREA_FRACTION * Self::reference_area(volume_m3)
    }

    pub fn wetted_area(&self, volume_m3: f64) -> f64 {
        self.wetted_area_factor * volume_m3.max(0.0).powf(2.0 / 3.0)
    }

    /// Thermal protection mass. The areal density grows logarithmically with the amount by
    /// which `max_temperature_c` overshoots the design's limit.
    pub fn thermal_protection_mass(
        &self,
        volume_m3: f64,
        design: &PlaneDesign,
        max_temperature_c: f64,
    ) -> f64 {
        let limit = ThermalModel::new().max_temperature(design);
        let excess = (max_temperature_c - limit).max(0.0);
        let penalty = 1.0 + (1.0 + excess / limit).ln();
        self.tps_areal_density_kg_m2 * penalty * self.wetted_area(volume_m3)
    }

    /// Continuous (unrounded) low-speed unit and rocket engine requirements.
    fn engine_requirement(&self, gross_kg: f64) -> (f64, f64) {
        let weight_n = gross_kg * G0;
        (
            self.low_speed_thrust_to_weight * weight_n / self.low_speed_unit_thrust_n,
            self.rocket_thrust_to_weight * weight_n / rocket::VACUUM_THRUST_N,
        )
    }

    pub fn breakdown(
        &self,
        volume_m3: f64,
        waypoints: &[Waypoint],
        design: &PlaneDesign,
        max_temperature_c: f64,
    ) -> MassBreakdown {
        let mut mass = MassBreakdown {
            fixed_kg: self.fixed_systems_kg,
            structure_kg: self.structure_kg_per_m3 * volume_m3.max(0.0),
            thermal_protection_kg: self.thermal_protection_mass(
                volume_m3,
                design,
                max_temperature_c,
            ),
            ..MassBreakdown::default()
        };
        let gross = mass.airframe_kg() + self.fuel_capacity(volume_m3);
        let (low_speed_units, rocket_engines) = self.engine_requirement(gross);
        let families = EngineFamilies::required_by(waypoints);
        if families.low_speed {
            mass.low_speed_engines_kg = low_speed_units * self.low_speed_unit_mass_kg;
        }
        if families.rocket {
            mass.rocket_engines_kg = rocket_engines * self.rocket_engine_mass_kg;
        }
        if families.needs_inlet() {
            mass.inlets_kg = self.inlet_kg_per_m2 * Self::capture_area(volume_m3);
        }
        mass
    }

    /// Dry mass (kg) of a vehicle of the given internal volume flying `waypoints`.
    pub fn dry_mass(
        &self,
        volume_m3: f64,
        waypoints: &[Waypoint],
        design: &PlaneDesign,
        max_temperature_c: f64,
    ) -> f64 {
        self.breakdown(volume_m3, waypoints, design, max_temperature_c)
            .total_kg()
    }

    /// Installed engines. Counts round the continuous requirement up.
    pub fn engine_sizing(
        &self,
        volume_m3: f64,
        waypoints: &[Waypoint],
        design: &PlaneDesign,
        max_temperature_c: f64,
    ) -> EngineSizing {
        let airframe = self
            .breakdown(volume_m3, waypoints, design, max_temperature_c)
            .airframe_kg();
        let (low_speed_units, rocket_engines) =
            self.engine_requirement(airframe + self.fuel_capacity(volume_m3));
        let families = EngineFamilies::required_by(waypoints);
        let capture = Self::capture_area(volume_m3);
        EngineSizing {
            low_speed_kind: self.low_speed_kind,
            low_speed_units: if families.low_speed { ceil_count(low_speed_units) } else { 0 },
            ramjet_capture_area_m2: if families.ramjet { capture } else { 0.0 },
            scramjet_capture_area_m2: if families.scramjet { capture } else { 0.0 },
            rocket_engines: if families.rocket { ceil_count(rocket_engines) } else { 0 },
        }
    }
}

fn ceil_count(requirement: f64) -> u32 {
    if requirement.is_finite() && requirement > 0.0 {
        requirement.ceil() as u32
    } else {
        0
    }
}
