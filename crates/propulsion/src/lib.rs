//! Propulsion modes, engine cycle models, and the engine-selection state machine.
//!
//! Every engine reports propellant mass flow in kg/s. For the rocket that flow includes
//! oxidizer; the air-breathers burn hydrogen only.

pub mod brayton;
pub mod ejector;
pub mod manager;
pub mod rocket;
pub mod turbojet;

use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

pub use brayton::{BraytonCycle, Ramjet, Scramjet};
pub use ejector::EjectorRamjet;
pub use manager::{ManagerState, PropulsionManager};
pub use rocket::Rocket;
pub use turbojet::Turbojet;

/// Thrust per unit propellant flow (N·s/kg) that maps to an efficiency of 1.0.
pub const EFFICIENCY_REFERENCE_N_S_KG: f64 = 60_000.0;

/// Propulsion regime requested by a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// Resolved to a concrete mode by the manager at simulation time.
    #[default]
    Auto,
    /// Low-speed regime (ejector ramjet or turbojet).
    Jet,
    Ramjet,
    Scramjet,
    Rocket,
}

impl EngineMode {
    /// Concrete modes in their canonical registration order.
    pub const CONCRETE: [EngineMode; 4] = [
        EngineMode::Jet,
        EngineMode::Ramjet,
        EngineMode::Scramjet,
        EngineMode::Rocket,
    ];

    pub fn is_auto(self) -> bool {
        matches!(self, EngineMode::Auto)
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineMode::Auto => write!(f, "auto"),
            EngineMode::Jet => write!(f, "jet"),
            EngineMode::Ramjet => write!(f, "ramjet"),
            EngineMode::Scramjet => write!(f, "scramjet"),
            EngineMode::Rocket => write!(f, "rocket"),
        }
    }
}

/// Mach and altitude ranges inside which an engine produces thrust.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatingEnvelope {
    pub mach_range: RangeInclusive<f64>,
    pub altitude_range_ft: RangeInclusive<f64>,
}

impl OperatingEnvelope {
    pub fn new(mach_range: RangeInclusive<f64>, altitude_range_ft: RangeInclusive<f64>) -> Self {
        Self {
            mach_range,
            altitude_range_ft,
        }
    }

    pub fn contains(&self, altitude_ft: f64, mach: f64) -> bool {
        self.mach_range.contains(&mach) && self.altitude_range_ft.contains(&altitude_ft)
    }
}

/// Instantaneous output of an engine at full throttle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnginePerformance {
    pub thrust_n: f64,
    /// Propellant mass flow (kg/s).
    pub propellant_flow_kg_s: f64,
}

impl EnginePerformance {
    pub const ZERO: EnginePerformance = EnginePerformance {
        thrust_n: 0.0,
        propellant_flow_kg_s: 0.0,
    };

    pub fn is_zero(&self) -> bool {
        self.thrust_n <= 0.0 || self.propellant_flow_kg_s <= 0.0
    }

    /// Effective specific impulse (s), or zero when the engine is idle.
    pub fn specific_impulse_s(&self) -> f64 {
        if self.is_zero() {
            0.0
        } else {
            self.thrust_n / (self.propellant_flow_kg_s * ascent_core::constants::G0)
        }
    }

    /// Thrust per unit propellant flow normalised into `[0, 1]`.
    pub fn normalized_efficiency(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        let ratio = self.thrust_n / self.propellant_flow_kg_s / EFFICIENCY_REFERENCE_N_S_KG;
        if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 }
    }
}

/// Capability set shared by every engine variant so the manager can treat them uniformly.
///
/// Engines never fail: outside their envelope, or when the cycle cannot close, they report
/// zero thrust and zero flow.
pub trait PropulsionSystem: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn envelope(&self) -> OperatingEnvelope;

    /// Thrust and propellant flow at full throttle.
    fn performance(&self, altitude_ft: f64, mach: f64) -> EnginePerformance;

    /// Thrust (N).
    fn thrust(&self, altitude_ft: f64, mach: f64) -> f64 {
        self.performance(altitude_ft, mach).thrust_n
    }

    /// Propellant mass flow (kg/s).
    fn fuel_consumption(&self, altitude_ft: f64, mach: f64) -> f64 {
        self.performance(altitude_ft, mach).propellant_flow_kg_s
    }

    fn can_operate(&self, altitude_ft: f64, mach: f64) -> bool {
        self.envelope().contains(altitude_ft, mach)
    }

    /// Efficiency score in `[0, 1]` used for automatic engine selection.
    fn efficiency(&self, altitude_ft: f64, mach: f64) -> f64 {
        if !self.can_operate(altitude_ft, mach) {
            return 0.0;
        }
        self.performance(altitude_ft, mach).normalized_efficiency()
    }
}

/// Which engine family serves the low-speed (`Jet`) regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LowSpeedKind {
    #[default]
    EjectorRamjet,
    Turbojet,
}

/// Installed engine sizes for a vehicle. Zero entries are not installed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineSizing {
    pub low_speed_kind: LowSpeedKind,
    pub low_speed_units: u32,
    pub ramjet_capture_area_m2: f64,
    pub scramjet_capture_area_m2: f64,
    pub rocket_engines: u32,
}

impl EngineSizing {
    /// Instantiate the installed engines in canonical order.
    pub fn build(&self) -> Vec<(EngineMode, Box<dyn PropulsionSystem>)> {
        let mut engines: Vec<(EngineMode, Box<dyn PropulsionSystem>)> = Vec::new();
        if self.low_speed_units > 0 {
            let engine: Box<dyn PropulsionSystem> = match self.low_speed_kind {
                LowSpeedKind::EjectorRamjet => Box::new(EjectorRamjet::new(self.low_speed_units)),
                LowSpeedKind::Turbojet => Box::new(Turbojet::new(self.low_speed_units)),
            };
            engines.push((EngineMode::Jet, engine));
        }
        if self.ramjet_capture_area_m2 > 0.0 {
            engines.push((
                EngineMode::Ramjet,
                Box::new(Ramjet::new(self.ramjet_capture_area_m2)),
            ));
        }
        if self.scramjet_capture_area_m2 > 0.0 {
            engines.push((
                EngineMode::Scramjet,
                Box::new(Scramjet::new(self.scramjet_capture_area_m2)),
            ));
        }
        if self.rocket_engines > 0 {
            engines.push((EngineMode::Rocket, Box::new(Rocket::new(self.rocket_engines))));
        }
        engines
    }
}

/// Default envelope of the engine that serves `mode`, used for plan validation.
///
/// Returns `None` for [`EngineMode::Auto`].
pub fn nominal_envelope(mode: EngineMode, low_speed: LowSpeedKind) -> Option<OperatingEnvelope> {
    match mode {
        EngineMode::Auto => None,
        EngineMode::Jet => Some(match low_speed {
            LowSpeedKind::EjectorRamjet => ejector::envelope(),
            LowSpeedKind::Turbojet => turbojet::envelope(),
        }),
        EngineMode::Ramjet => Some(brayton::ramjet_envelope()),
        EngineMode::Scramjet => Some(brayton::scramjet_envelope()),
        EngineMode::Rocket => Some(rocket::envelope()),
    }
}
