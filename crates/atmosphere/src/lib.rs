//! Seven-layer 1976 Standard Atmosphere.
//!
//! Altitudes are geometric metres treated as geopotential, which is accurate to a
//! fraction of a percent across the band the ascent vehicle flies through.

use ascent_core::constants::{G0, GAMMA_AIR, R_AIR};

/// Sutherland reference viscosity (Pa·s) at [`SUTHERLAND_T_REF`].
pub const SUTHERLAND_MU_REF: f64 = 1.716e-5;
/// Sutherland reference temperature (K).
pub const SUTHERLAND_T_REF: f64 = 273.15;
/// Sutherland constant for air (K).
pub const SUTHERLAND_S: f64 = 110.4;

/// Top of the tabulated atmosphere (m). Above it the final layer's temperature is held.
pub const TABLE_TOP_M: f64 = 84_852.0;

/// One row of the standard-atmosphere table.
#[derive(Debug, Clone, Copy)]
struct Layer {
    base_altitude_m: f64,
    base_temperature_k: f64,
    base_pressure_pa: f64,
    lapse_rate_k_per_m: f64,
}

const LAYERS: [Layer; 7] = [
    Layer {
        base_altitude_m: 0.0,
        base_temperature_k: 288.15,
        base_pressure_pa: 101_325.0,
        lapse_rate_k_per_m: -0.0065,
    },
    Layer {
        base_altitude_m: 11_000.0,
        base_temperature_k: 216.65,
        base_pressure_pa: 22_632.06,
        lapse_rate_k_per_m: 0.0,
    },
    Layer {
        base_altitude_m: 20_000.0,
        base_temperature_k: 216.65,
        base_pressure_pa: 5_474.889,
        lapse_rate_k_per_m: 0.001,
    },
    Layer {
        base_altitude_m: 32_000.0,
        base_temperature_k: 228.65,
        base_pressure_pa: 868.0187,
        lapse_rate_k_per_m: 0.0028,
    },
    Layer {
        base_altitude_m: 47_000.0,
        base_temperature_k: 270.65,
        base_pressure_pa: 110.9063,
        lapse_rate_k_per_m: 0.0,
    },
    Layer {
        base_altitude_m: 51_000.0,
        base_temperature_k: 270.65,
        base_pressure_pa: 66.938_87,
        lapse_rate_k_per_m: -0.0028,
    },
    Layer {
        base_altitude_m: 71_000.0,
        base_temperature_k: 214.65,
        base_pressure_pa: 3.956_420,
        lapse_rate_k_per_m: -0.002,
    },
];

/// Atmospheric properties at a single altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereState {
    pub temperature_k: f64,
    pub pressure_pa: f64,
    pub density_kg_m3: f64,
    pub speed_of_sound_m_s: f64,
    pub dynamic_viscosity_pa_s: f64,
}

/// Stateless standard-atmosphere model. Cheap to copy and safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtmosphereModel;

impl AtmosphereModel {
    pub fn new() -> Self {
        Self
    }

    /// Static temperature (K).
    pub fn temperature(&self, altitude_m: f64) -> f64 {
        temperature_and_pressure(altitude_m).0
    }

    /// Static pressure (Pa).
    pub fn pressure(&self, altitude_m: f64) -> f64 {
        temperature_and_pressure(altitude_m).1
    }

    /// Density from the ideal-gas law (kg/m³).
    pub fn density(&self, altitude_m: f64) -> f64 {
        let (t, p) = temperature_and_pressure(altitude_m);
        p / (R_AIR * t)
    }

    /// Speed of sound (m/s).
    pub fn speed_of_sound(&self, altitude_m: f64) -> f64 {
        speed_of_sound_at(self.temperature(altitude_m))
    }

    /// Dynamic viscosity from Sutherland's law (Pa·s).
    pub fn dynamic_viscosity(&self, altitude_m: f64) -> f64 {
        sutherland(self.temperature(altitude_m))
    }

    /// All properties at once, sharing a single table lookup.
    pub fn state(&self, altitude_m: f64) -> AtmosphereState {
        let (t, p) = temperature_and_pressure(altitude_m);
        AtmosphereState {
            temperature_k: t,
            pressure_pa: p,
            density_kg_m3: p / (R_AIR * t),
            speed_of_sound_m_s: speed_of_sound_at(t),
            dynamic_viscosity_pa_s: sutherland(t),
        }
    }
}

fn speed_of_sound_at(temperature_k: f64) -> f64 {
    (GAMMA_AIR * R_AIR * temperature_k).sqrt()
}

fn sutherland(temperature_k: f64) -> f64 {
    SUTHERLAND_MU_REF
        * (temperature_k / SUTHERLAND_T_REF).powf(1.5)
        * (SUTHERLAND_T_REF + SUTHERLAND_S)
        / (temperature_k + SUTHERLAND_S)
}

fn temperature_and_pressure(altitude_m: f64) -> (f64, f64) {
    let h = if altitude_m.is_finite() {
        altitude_m.max(0.0)
    } else if altitude_m > 0.0 {
        TABLE_TOP_M
    } else {
        0.0
    };

    if h >= TABLE_TOP_M {
        let (t_top, p_top) = layer_state(&LAYERS[LAYERS.len() - 1], TABLE_TOP_M);
        return (t_top, isothermal_pressure(p_top, t_top, h - TABLE_TOP_M));
    }

    let layer = LAYERS
        .iter()
        .rev()
        .find(|layer| h >= layer.base_altitude_m)
        .unwrap_or(&LAYERS[0]);
    layer_state(layer, h)
}

fn layer_state(layer: &Layer, h: f64) -> (f64, f64) {
    let dh = h - layer.base_altitude_m;
    if layer.lapse_rate_k_per_m == 0.0 {
        let t = layer.base_temperature_k;
        (t, isothermal_pressure(layer.base_pressure_pa, t, dh))
    } else {
        let t = layer.base_temperature_k + layer.lapse_rate_k_per_m * dh;
        let exponent = -G0 / (layer.lapse_rate_k_per_m * R_AIR);
        let p = layer.base_pressure_pa * (t / layer.base_temperature_k).powf(exponent);
        (t, p)
    }
}

fn isothermal_pressure(base_pressure: f64, temperature: f64, dh: f64) -> f64 {
    base_pressure * (-G0 * dh / (R_AIR * temperature)).exp()
}
