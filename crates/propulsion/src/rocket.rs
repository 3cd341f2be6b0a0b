//! LOX/LH2 rocket with pressure-dependent thrust and specific impulse.

use ascent_atmosphere::AtmosphereModel;
use ascent_core::constants::{G0, SEA_LEVEL_PRESSURE_PA};
use ascent_core::units::ft_to_m;

use crate::{EnginePerformance, OperatingEnvelope, PropulsionSystem};

pub const VACUUM_THRUST_N: f64 = 2_280_000.0;
pub const SEA_LEVEL_THRUST_N: f64 = 1_860_000.0;
pub const VACUUM_ISP_S: f64 = 452.0;
pub const SEA_LEVEL_ISP_S: f64 = 366.0;
/// Oxidizer-to-fuel mass ratio.
pub const MIXTURE_RATIO: f64 = 6.0;

pub(crate) fn envelope() -> OperatingEnvelope {
    OperatingEnvelope::new(0.0..=30.0, 0.0..=2_000_000.0)
}

/// Fuel and oxidizer shares of a propellant mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropellantSplit {
    pub fuel_kg: f64,
    pub oxidizer_kg: f64,
}

#[derive(Debug, Clone)]
pub struct Rocket {
    engines: u32,
    atmosphere: AtmosphereModel,
}

impl Rocket {
    pub fn new(engines: u32) -> Self {
        Self {
            engines,
            atmosphere: AtmosphereModel::new(),
        }
    }

    pub fn engines(&self) -> u32 {
        self.engines
    }

    /// Ambient pressure as a fraction of sea level, clamped to `[0, 1]`.
    fn pressure_fraction(&self, altitude_ft: f64) -> f64 {
        (self.atmosphere.pressure(ft_to_m(altitude_ft)) / SEA_LEVEL_PRESSURE_PA).clamp(0.0, 1.0)
    }

    /// Specific impulse (s), interpolated linearly in ambient pressure.
    pub fn specific_impulse(&self, altitude_ft: f64) -> f64 {
        let x = self.pressure_fraction(altitude_ft);
        VACUUM_ISP_S + (SEA_LEVEL_ISP_S - VACUUM_ISP_S) * x
    }

    /// Split a total propellant mass at the engine mixture ratio.
    pub fn propellant_split(total_kg: f64) -> PropellantSplit {
        let fuel_kg = total_kg / (1.0 + MIXTURE_RATIO);
        PropellantSplit {
            fuel_kg,
            oxidizer_kg: total_kg - fuel_kg,
        }
    }
}

impl PropulsionSystem for Rocket {
    fn name(&self) -> &'static str {
        "rocket"
    }

    fn envelope(&self) -> OperatingEnvelope {
        envelope()
    }

    fn performance(&self, altitude_ft: f64, mach: f64) -> EnginePerformance {
        if self.engines == 0 || !self.can_operate(altitude_ft, mach) {
            return EnginePerformance::ZERO;
        }
        let x = self.pressure_fraction(altitude_ft);
        let thrust_n = f64::from(self.engines)
            * (VACUUM_THRUST_N + (SEA_LEVEL_THRUST_N - VACUUM_THRUST_N) * x);
        let isp = self.specific_impulse(altitude_ft);
        EnginePerformance {
            thrust_n,
            propellant_flow_kg_s: thrust_n / (isp * G0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sea_level_and_vacuum_ratings() {
        let rocket = Rocket::new(1);
        assert!((rocket.thrust(0.0, 0.0) - SEA_LEVEL_THRUST_N).abs() < 1.0);
        assert!((rocket.specific_impulse(0.0) - SEA_LEVEL_ISP_S).abs() < 1e-6);
        let high = 600_000.0;
        assert!((rocket.thrust(high, 20.0) - VACUUM_THRUST_N).abs() < 100.0);
        assert!((rocket.specific_impulse(high) - VACUUM_ISP_S).abs() < 0.1);
    }

    #[test]
    fn flow_matches_isp() {
        let rocket = Rocket::new(2);
        let perf = rocket.performance(100_000.0, 8.0);
        let isp = rocket.specific_impulse(100_000.0);
        assert!((perf.specific_impulse_s() - isp).abs() < 1e-9);
    }

    #[test]
    fn propellant_split_follows_mixture_ratio() {
        let split = Rocket::propellant_split(7_000.0);
        assert!((split.fuel_kg - 1_000.0).abs() < 1e-9);
        assert!((split.oxidizer_kg - 6_000.0).abs() < 1e-9);
    }

    #[test]
    fn rocket_scores_low_efficiency() {
        // Even in vacuum the rocket stays far below the air-breathing reference.
        let rocket = Rocket::new(1);
        let eff = rocket.efficiency(300_000.0, 20.0);
        assert!(eff > 0.05 && eff < 0.1, "eff = {eff}");
    }
}
