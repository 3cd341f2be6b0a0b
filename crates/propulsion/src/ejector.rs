//! Ejector ramjet: rocket primaries entraining air at low speed, blending into ram operation.

use ascent_atmosphere::AtmosphereModel;
use ascent_core::constants::G0;
use ascent_core::units::ft_to_m;

use crate::brayton::BraytonCycle;
use crate::{EnginePerformance, OperatingEnvelope, PropulsionSystem};

/// Primary rocket thrust per unit (N).
pub const PRIMARY_THRUST_N: f64 = 600_000.0;
/// Primary rocket specific impulse (s).
pub const PRIMARY_ISP_S: f64 = 300.0;
/// Ram-mode capture area per unit (m²).
pub const RAM_CAPTURE_PER_UNIT_M2: f64 = 36.0;

const BLEND_START_MACH: f64 = 1.5;
const BLEND_SPAN_MACH: f64 = 1.0;

pub(crate) fn envelope() -> OperatingEnvelope {
    OperatingEnvelope::new(0.0..=3.5, 0.0..=100_000.0)
}

/// A bank of identical ejector-ramjet units.
#[derive(Debug, Clone)]
pub struct EjectorRamjet {
    units: u32,
    ram_cycle: BraytonCycle,
    atmosphere: AtmosphereModel,
}

impl EjectorRamjet {
    pub fn new(units: u32) -> Self {
        Self {
            units,
            ram_cycle: BraytonCycle::ramjet(),
            atmosphere: AtmosphereModel::new(),
        }
    }

    pub fn units(&self) -> u32 {
        self.units
    }

    /// Weight of the ram mode in `[0, 1]`; zero means pure ejector operation.
    pub fn ram_weight(mach: f64) -> f64 {
        ((mach - BLEND_START_MACH) / BLEND_SPAN_MACH).clamp(0.0, 1.0)
    }

    /// Thrust augmentation of the primaries from entrained air.
    fn augmentation(&self, altitude_ft: f64, mach: f64) -> f64 {
        let sigma = self.atmosphere.density(ft_to_m(altitude_ft)) / self.atmosphere.density(0.0);
        1.0 + 0.5 * sigma.max(0.0).sqrt() * (1.0 + 0.5 * mach.max(0.0))
    }
}

impl PropulsionSystem for EjectorRamjet {
    fn name(&self) -> &'static str {
        "ejector-ramjet"
    }

    fn envelope(&self) -> OperatingEnvelope {
        envelope()
    }

    fn performance(&self, altitude_ft: f64, mach: f64) -> EnginePerformance {
        if self.units == 0 || !self.can_operate(altitude_ft, mach) {
            return EnginePerformance::ZERO;
        }
        let n = f64::from(self.units);
        let w = Self::ram_weight(mach);

        let primary = n * PRIMARY_THRUST_N;
        let ejector_thrust = primary * self.augmentation(altitude_ft, mach);
        let ejector_flow = primary / (PRIMARY_ISP_S * G0);

        let ram = if w > 0.0 {
            self.ram_cycle.evaluate(
                &self.atmosphere,
                altitude_ft,
                mach,
                n * RAM_CAPTURE_PER_UNIT_M2,
            )
        } else {
            EnginePerformance::ZERO
        };

        EnginePerformance {
            thrust_n: (1.0 - w) * ejector_thrust + w * ram.thrust_n,
            propellant_flow_kg_s: (1.0 - w) * ejector_flow + w * ram.propellant_flow_kg_s,
        }
    }
}
