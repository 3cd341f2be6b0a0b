//! Recovery-temperature heating estimate and design-dependent thermal ceiling.

use ascent_atmosphere::AtmosphereModel;
use ascent_core::constants::GAMMA_AIR;
use ascent_core::design::PlaneDesign;
use ascent_core::units::kelvin_to_celsius;

/// Turbulent boundary-layer recovery factor.
pub const RECOVERY_FACTOR: f64 = 0.9;
/// Structural temperature limit of the baseline design (°C).
pub const BASELINE_MAX_TEMPERATURE_C: f64 = 600.0;

const SAFE_VELOCITY_BOUNDS_M_S: (f64, f64) = (0.0, 10_000.0);
const SAFE_VELOCITY_ITERATIONS: usize = 20;

/// Outcome of a thermal-limit check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalCheck {
    pub exceeded: bool,
    pub temperature_c: f64,
    /// Limit minus current temperature; negative once exceeded.
    pub margin_c: f64,
}

/// Aerodynamic heating model.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThermalModel {
    atmosphere: AtmosphereModel,
}

impl ThermalModel {
    pub fn new() -> Self {
        Self {
            atmosphere: AtmosphereModel::new(),
        }
    }

    /// Skin recovery temperature (°C) at the given flight condition.
    ///
    /// The rise above ambient is scaled by the design's heating-rate multiplier.
    pub fn recovery_temperature(
        &self,
        altitude_m: f64,
        velocity_m_s: f64,
        design: &PlaneDesign,
    ) -> f64 {
        let ambient_k = self.atmosphere.temperature(altitude_m);
        let mach = velocity_m_s.max(0.0) / self.atmosphere.speed_of_sound(altitude_m);
        let recovery_k =
            ambient_k * (1.0 + RECOVERY_FACTOR * (GAMMA_AIR - 1.0) / 2.0 * mach * mach);
        let rise = (recovery_k - ambient_k) * design.heating_rate_multiplier();
        kelvin_to_celsius(ambient_k + rise)
    }

    /// Maximum allowable skin temperature (°C) for a design.
    pub fn max_temperature(&self, design: &PlaneDesign) -> f64 {
        BASELINE_MAX_TEMPERATURE_C * design.thermal_limit_multiplier()
    }

    pub fn check_thermal_limits(
        &self,
        altitude_m: f64,
        velocity_m_s: f64,
        design: &PlaneDesign,
    ) -> ThermalCheck {
        let temperature_c = self.recovery_temperature(altitude_m, velocity_m_s, design);
        let margin_c = self.max_temperature(design) - temperature_c;
        ThermalCheck {
            exceeded: margin_c < 0.0,
            temperature_c,
            margin_c,
        }
    }

    /// Velocity (m/s) at which the recovery temperature reaches the design limit.
    ///
    /// Relies on recovery temperature increasing monotonically with velocity. Returns the
    /// lower search bound when even zero velocity exceeds the limit, and the upper bound when
    /// the limit is never reached inside it.
    pub fn max_safe_velocity(&self, altitude_m: f64, design: &PlaneDesign) -> f64 {
        let limit = self.max_temperature(design);
        let (mut lo, mut hi) = SAFE_VELOCITY_BOUNDS_M_S;
        for _ in 0..SAFE_VELOCITY_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            if self.recovery_temperature(altitude_m, mid, design) > limit {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        0.5 * (lo + hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stationary_vehicle_sits_at_ambient() {
        let model = ThermalModel::new();
        let t = model.recovery_temperature(0.0, 0.0, &PlaneDesign::default());
        assert!((t - 15.0).abs() < 1e-9, "got {t}");
    }

    #[test]
    fn heating_multiplier_scales_rise_only() {
        let model = ThermalModel::new();
        let neutral = PlaneDesign::default();
        let hot = PlaneDesign::new(60.0, 20.0, 0.9);
        assert!(hot.heating_rate_multiplier() > 1.0);
        let base = model.recovery_temperature(10_000.0, 0.0, &neutral);
        assert!((model.recovery_temperature(10_000.0, 0.0, &hot) - base).abs() < 1e-9);
        assert!(
            model.recovery_temperature(10_000.0, 1_500.0, &hot)
                > model.recovery_temperature(10_000.0, 1_500.0, &neutral)
        );
    }

    #[test]
    fn safe_velocity_sits_on_the_limit() {
        let model = ThermalModel::new();
        let design = PlaneDesign::default();
        let v = model.max_safe_velocity(30_000.0, &design);
        let t = model.recovery_temperature(30_000.0, v, &design);
        assert!((t - model.max_temperature(&design)).abs() < 1.0, "t = {t}");
        assert!(v > 1_000.0 && v < 2_000.0, "v = {v}");
    }

    #[test]
    fn cooler_design_tolerates_more_speed() {
        let model = ThermalModel::new();
        let swept = PlaneDesign::new(0.0, 70.0, 0.3);
        let baseline = PlaneDesign::default();
        assert!(
            model.max_safe_velocity(20_000.0, &swept) > model.max_safe_velocity(20_000.0, &baseline)
        );
    }
}
