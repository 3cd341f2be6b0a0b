//! Afterburning turbojet, the alternative low-speed engine.

use ascent_core::units::{ft_to_m, tsfc_imperial_to_si};

use crate::{EnginePerformance, OperatingEnvelope, PropulsionSystem};

/// Sea-level static thrust per engine (N).
pub const SEA_LEVEL_THRUST_N: f64 = 130_000.0;
/// Static thrust-specific fuel consumption (lb/(lbf·h)).
pub const STATIC_TSFC_IMPERIAL: f64 = 0.9;

const RAM_GAIN_MACH_CAP: f64 = 3.0;
const FADE_SPAN_MACH: f64 = 0.2;
const DENSITY_SCALE_HEIGHT_M: f64 = 8_500.0;

pub(crate) fn envelope() -> OperatingEnvelope {
    OperatingEnvelope::new(0.0..=3.2, 0.0..=80_000.0)
}

#[derive(Debug, Clone)]
pub struct Turbojet {
    engines: u32,
}

impl Turbojet {
    pub fn new(engines: u32) -> Self {
        Self { engines }
    }

    pub fn engines(&self) -> u32 {
        self.engines
    }

    /// Thrust-specific fuel consumption in kg/(N·s).
    pub fn tsfc(mach: f64) -> f64 {
        tsfc_imperial_to_si(STATIC_TSFC_IMPERIAL * (1.0 + 0.25 * mach.max(0.0)))
    }

    /// Compressor-inlet temperature limit: full thrust up to Mach 3, zero by Mach 3.2.
    fn fade(mach: f64) -> f64 {
        if mach <= RAM_GAIN_MACH_CAP {
            1.0
        } else {
            (1.0 - (mach - RAM_GAIN_MACH_CAP) / FADE_SPAN_MACH).max(0.0)
        }
    }
}

impl PropulsionSystem for Turbojet {
    fn name(&self) -> &'static str {
        "turbojet"
    }

    fn envelope(&self) -> OperatingEnvelope {
        envelope()
    }

    fn performance(&self, altitude_ft: f64, mach: f64) -> EnginePerformance {
        if self.engines == 0 || !self.can_operate(altitude_ft, mach) {
            return EnginePerformance::ZERO;
        }
        let per_engine = SEA_LEVEL_THRUST_N
            * (1.0 + 0.3 * mach.min(RAM_GAIN_MACH_CAP))
            * Self::fade(mach)
            * (-ft_to_m(altitude_ft) / DENSITY_SCALE_HEIGHT_M).exp();
        let thrust_n = f64::from(self.engines) * per_engine;
        EnginePerformance {
            thrust_n,
            propellant_flow_kg_s: thrust_n * Self::tsfc(mach),
        }
    }
}
