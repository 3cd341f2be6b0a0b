//! Core units, constants, and shared primitives for the hypersonic ascent workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Standard gravity at Earth's surface (m/s²).
    pub const G0: f64 = 9.80665;
    /// Mean Earth radius used for inverse-square gravity (m).
    pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
    /// Specific gas constant for dry air (J/(kg·K)).
    pub const R_AIR: f64 = 287.052_87;
    /// Ratio of specific heats for air.
    pub const GAMMA_AIR: f64 = 1.4;
    /// Constant-pressure specific heat of air (J/(kg·K)).
    pub const CP_AIR: f64 = 1_004.5;
    /// Sea-level standard pressure (Pa).
    pub const SEA_LEVEL_PRESSURE_PA: f64 = 101_325.0;
    /// Offset between Kelvin and Celsius.
    pub const KELVIN_OFFSET: f64 = 273.15;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::KELVIN_OFFSET;

    /// Metres per international foot.
    pub const METERS_PER_FOOT: f64 = 0.3048;

    /// Convert feet to metres.
    #[inline]
    pub fn ft_to_m(v: f64) -> f64 {
        v * METERS_PER_FOOT
    }

    /// Convert metres to feet.
    #[inline]
    pub fn m_to_ft(v: f64) -> f64 {
        v / METERS_PER_FOOT
    }

    /// Convert Kelvin to degrees Celsius.
    #[inline]
    pub fn kelvin_to_celsius(t: f64) -> f64 {
        t - KELVIN_OFFSET
    }

    /// Convert degrees Celsius to Kelvin.
    #[inline]
    pub fn celsius_to_kelvin(t: f64) -> f64 {
        t + KELVIN_OFFSET
    }

    /// Thrust-specific fuel consumption in lb/(lbf·h) expressed as kg/(N·s).
    #[inline]
    pub fn tsfc_imperial_to_si(tsfc: f64) -> f64 {
        tsfc * 2.832_545e-5
    }
}

/// Gravity as a function of altitude.
pub mod gravity {
    use super::constants::{EARTH_RADIUS_M, G0};

    /// Inverse-square gravitational acceleration at `altitude_m` above mean radius.
    #[inline]
    pub fn acceleration(altitude_m: f64) -> f64 {
        let r = EARTH_RADIUS_M + altitude_m.max(0.0);
        G0 * (EARTH_RADIUS_M / r).powi(2)
    }
}

/// Planform design parameters that couple geometry to heating.
pub mod design {
    /// Clamp range for [`PlaneDesign::thermal_limit_multiplier`].
    pub const THERMAL_LIMIT_RANGE: (f64, f64) = (0.6, 1.3);

    /// Design parameters chosen in the planform editor.
    ///
    /// `position` is the normalised wing station along the body (0 = nose, 1 = tail).
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct PlaneDesign {
        pub tilt_angle_deg: f64,
        pub sweep_angle_deg: f64,
        pub position: f64,
    }

    impl Default for PlaneDesign {
        fn default() -> Self {
            Self {
                tilt_angle_deg: 0.0,
                sweep_angle_deg: 45.0,
                position: 0.5,
            }
        }
    }

    impl PlaneDesign {
        pub fn new(tilt_angle_deg: f64, sweep_angle_deg: f64, position: f64) -> Self {
            Self {
                tilt_angle_deg,
                sweep_angle_deg,
                position,
            }
        }

        /// Multiplier applied to the baseline structural temperature limit.
        ///
        /// Higher sweep moves the leading edge out of the stagnation region, while tilt
        /// and an aft wing station expose more of the planform to the flow.
        pub fn thermal_limit_multiplier(&self) -> f64 {
            let raw = 1.0 + 0.006 * (self.sweep_angle_deg - 45.0)
                - 0.004 * self.tilt_angle_deg.abs()
                - 0.2 * (self.position - 0.5);
            let (lo, hi) = THERMAL_LIMIT_RANGE;
            if raw.is_finite() { raw.clamp(lo, hi) } else { 1.0 }
        }

        /// Multiplier applied to the aerodynamic temperature rise; reciprocal of the limit
        /// multiplier.
        pub fn heating_rate_multiplier(&self) -> f64 {
            1.0 / self.thermal_limit_multiplier()
        }
    }
}
