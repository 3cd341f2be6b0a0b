//! Idealised Brayton-cycle air-breathers: ramjet and scramjet.

use ascent_atmosphere::AtmosphereModel;
use ascent_core::constants::{CP_AIR, GAMMA_AIR};
use ascent_core::units::ft_to_m;

use crate::{EnginePerformance, OperatingEnvelope, PropulsionSystem};

/// Lower heating value of hydrogen (J/kg).
pub const HYDROGEN_HEATING_VALUE_J_KG: f64 = 120.0e6;
/// Stoichiometric hydrogen/air fuel-air ratio.
pub const HYDROGEN_STOICHIOMETRIC_FAR: f64 = 0.0292;

/// Inlet total-pressure recovery as a function of flight Mach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InletRecovery {
    /// MIL-E-5008B subsonic-combustion schedule.
    MilSpec { floor: f64 },
    /// Gaussian schedule centred on the design Mach of a fixed-geometry scramjet inlet.
    Gaussian {
        peak: f64,
        peak_mach: f64,
        width: f64,
        floor: f64,
    },
}

impl InletRecovery {
    pub fn at(&self, mach: f64) -> f64 {
        match *self {
            InletRecovery::MilSpec { floor } => {
                if mach <= 1.0 {
                    0.98
                } else {
                    (0.98 * (1.0 - 0.075 * (mach - 1.0).powf(1.35))).max(floor)
                }
            }
            InletRecovery::Gaussian {
                peak,
                peak_mach,
                width,
                floor,
            } => {
                let x = (mach - peak_mach) / width;
                (peak * (-x * x).exp()).max(floor)
            }
        }
    }
}

/// Cycle parameters shared by the ramjet and scramjet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BraytonCycle {
    pub max_stagnation_temperature_k: f64,
    pub burner_efficiency: f64,
    pub nozzle_efficiency: f64,
    /// Burner exit over inlet total pressure.
    pub burner_pressure_ratio: f64,
    pub inlet: InletRecovery,
    /// Mach at which the activation sigmoid reaches one half.
    pub activation_mach: f64,
    pub activation_width: f64,
}

impl BraytonCycle {
    pub fn ramjet() -> Self {
        Self {
            max_stagnation_temperature_k: 3_000.0,
            burner_efficiency: 0.95,
            nozzle_efficiency: 0.98,
            burner_pressure_ratio: 0.95,
            inlet: InletRecovery::MilSpec { floor: 0.2 },
            activation_mach: 2.0,
            activation_width: 0.25,
        }
    }

    pub fn scramjet() -> Self {
        Self {
            max_stagnation_temperature_k: 12_000.0,
            burner_efficiency: 0.95,
            nozzle_efficiency: 0.98,
            burner_pressure_ratio: 0.95,
            inlet: InletRecovery::Gaussian {
                peak: 0.6,
                peak_mach: 7.0,
                width: 8.0,
                floor: 0.1,
            },
            activation_mach: 5.5,
            activation_width: 0.3,
        }
    }

    /// Smooth gate in `[0, 1]` describing how far the cycle has lit.
    pub fn activation(&self, mach: f64) -> f64 {
        1.0 / (1.0 + (-(mach - self.activation_mach) / self.activation_width).exp())
    }

    /// Run the cycle through a capture area of `capture_area_m2`.
    ///
    /// Fails closed (zero output) when ram compression alone exceeds the combustor limit,
    /// when the nozzle cannot expand, or when the net specific thrust is not positive.
    pub fn evaluate(
        &self,
        atmosphere: &AtmosphereModel,
        altitude_ft: f64,
        mach: f64,
        capture_area_m2: f64,
    ) -> EnginePerformance {
        if mach <= 0.0 || capture_area_m2 <= 0.0 {
            return EnginePerformance::ZERO;
        }
        let ambient = atmosphere.state(ft_to_m(altitude_ft));
        let va = mach * ambient.speed_of_sound_m_s;

        let ram = 1.0 + 0.5 * (GAMMA_AIR - 1.0) * mach * mach;
        let t02 = ambient.temperature_k * ram;
        if t02 >= self.max_stagnation_temperature_k {
            return EnginePerformance::ZERO;
        }
        let p02 =
            ambient.pressure_pa * ram.powf(GAMMA_AIR / (GAMMA_AIR - 1.0)) * self.inlet.at(mach);

        let heat_limited = t02
            + HYDROGEN_STOICHIOMETRIC_FAR * self.burner_efficiency * HYDROGEN_HEATING_VALUE_J_KG
                / CP_AIR;
        let t03 = self.max_stagnation_temperature_k.min(heat_limited);
        let far = CP_AIR * (t03 - t02) / (self.burner_efficiency * HYDROGEN_HEATING_VALUE_J_KG);

        let p04 = p02 * self.burner_pressure_ratio;
        let expansion = ambient.pressure_pa / p04;
        if !(expansion < 1.0) {
            return EnginePerformance::ZERO;
        }
        let ve = self.nozzle_efficiency
            * (2.0 * CP_AIR * t03 * (1.0 - expansion.powf((GAMMA_AIR - 1.0) / GAMMA_AIR))).sqrt();
        let specific_thrust = (1.0 + far) * ve - va;
        if !(specific_thrust > 0.0) {
            return EnginePerformance::ZERO;
        }

        let gate = self.activation(mach);
        let air_flow = ambient.density_kg_m3 * va * capture_area_m2;
        EnginePerformance {
            thrust_n: air_flow * specific_thrust * gate,
            propellant_flow_kg_s: air_flow * far * gate,
        }
    }
}

pub(crate) fn ramjet_envelope() -> OperatingEnvelope {
    OperatingEnvelope::new(1.0..=6.5, 0.0..=140_000.0)
}

pub(crate) fn scramjet_envelope() -> OperatingEnvelope {
    OperatingEnvelope::new(4.0..=16.0, 50_000.0..=250_000.0)
}

/// Subsonic-combustion ramjet.
#[derive(Debug, Clone)]
pub struct Ramjet {
    cycle: BraytonCycle,
    capture_area_m2: f64,
    atmosphere: AtmosphereModel,
}

impl Ramjet {
    pub fn new(capture_area_m2: f64) -> Self {
        Self {
            cycle: BraytonCycle::ramjet(),
            capture_area_m2,
            atmosphere: AtmosphereModel::new(),
        }
    }

    pub fn cycle(&self) -> &BraytonCycle {
        &self.cycle
    }
}

impl PropulsionSystem for Ramjet {
    fn name(&self) -> &'static str {
        "ramjet"
    }

    fn envelope(&self) -> OperatingEnvelope {
        ramjet_envelope()
    }

    fn performance(&self, altitude_ft: f64, mach: f64) -> EnginePerformance {
        if !self.can_operate(altitude_ft, mach) {
            return EnginePerformance::ZERO;
        }
        self.cycle
            .evaluate(&self.atmosphere, altitude_ft, mach, self.capture_area_m2)
    }

    /// Weighted by the activation gate so an unlit cycle never outranks a working engine.
    fn efficiency(&self, altitude_ft: f64, mach: f64) -> f64 {
        if !self.can_operate(altitude_ft, mach) {
            return 0.0;
        }
        self.performance(altitude_ft, mach).normalized_efficiency() * self.cycle.activation(mach)
    }
}

/// Supersonic-combustion ramjet.
#[derive(Debug, Clone)]
pub struct Scramjet {
    cycle: BraytonCycle,
    capture_area_m2: f64,
    atmosphere: AtmosphereModel,
}

impl Scramjet {
    pub fn new(capture_area_m2: f64) -> Self {
        Self {
            cycle: BraytonCycle::scramjet(),
            capture_area_m2,
            atmosphere: AtmosphereModel::new(),
        }
    }

    pub fn cycle(&self) -> &BraytonCycle {
        &self.cycle
    }
}

impl PropulsionSystem for Scramjet {
    fn name(&self) -> &'static str {
        "scramjet"
    }

    fn envelope(&self) -> OperatingEnvelope {
        scramjet_envelope()
    }

    fn performance(&self, altitude_ft: f64, mach: f64) -> EnginePerformance {
        if !self.can_operate(altitude_ft, mach) {
            return EnginePerformance::ZERO;
        }
        self.cycle
            .evaluate(&self.atmosphere, altitude_ft, mach, self.capture_area_m2)
    }

    fn efficiency(&self, altitude_ft: f64, mach: f64) -> f64 {
        if !self.can_operate(altitude_ft, mach) {
            return 0.0;
        }
        self.performance(altitude_ft, mach).normalized_efficiency() * self.cycle.activation(mach)
    }
}
