//! Drag characteristics supplied to the flight simulator.

use std::fmt;

/// Aerodynamic collaborator: drag coefficient against Mach and the area it refers to.
pub trait AeroModel: fmt::Debug + Send + Sync {
    fn drag_coefficient(&self, mach: f64) -> f64;
    fn reference_area(&self) -> f64;

    /// Drag force (N) for a dynamic pressure `q_pa`.
    fn drag(&self, q_pa: f64, mach: f64) -> f64 {
        q_pa * self.drag_coefficient(mach) * self.reference_area()
    }
}

const SUBSONIC_CD: f64 = 0.012;
const TRANSONIC_PEAK_CD: f64 = 0.030;
const DRAG_RISE_START_MACH: f64 = 0.8;
const DRAG_RISE_END_MACH: f64 = 1.2;

/// Slender lifting body at zero lift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiftingBodyAero {
    pub reference_area_m2: f64,
}

impl LiftingBodyAero {
    pub fn new(reference_area_m2: f64) -> Self {
        Self { reference_area_m2 }
    }
}

impl AeroModel for LiftingBodyAero {
    fn drag_coefficient(&self, mach: f64) -> f64 {
        let mach = mach.max(0.0);
        if mach < DRAG_RISE_START_MACH {
            SUBSONIC_CD
        } else if mach <= DRAG_RISE_END_MACH {
            let t = (mach - DRAG_RISE_START_MACH) / (DRAG_RISE_END_MACH - DRAG_RISE_START_MACH);
            SUBSONIC_CD + t * (TRANSONIC_PEAK_CD - SUBSONIC_CD)
        } else {
            TRANSONIC_PEAK_CD / (mach / DRAG_RISE_END_MACH).sqrt()
        }
    }

    fn reference_area(&self) -> f64 {
        self.reference_area_m2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_curve_is_continuous_through_transonic() {
        let aero = LiftingBodyAero::new(100.0);
        assert_eq!(aero.drag_coefficient(0.3), 0.012);
        assert!((aero.drag_coefficient(1.0) - 0.021).abs() < 1e-12);
        assert!((aero.drag_coefficient(1.2) - 0.030).abs() < 1e-12);
        assert!((aero.drag_coefficient(1.2 + 1e-9) - 0.030).abs() < 1e-6);
        assert!((aero.drag_coefficient(4.8) - 0.015).abs() < 1e-12);
    }

    #[test]
    fn drag_force_scales_with_area() {
        let small = LiftingBodyAero::new(50.0);
        let large = LiftingBodyAero::new(100.0);
        assert!((large.drag(1_000.0, 2.0) - 2.0 * small.drag(1_000.0, 2.0)).abs() < 1e-9);
    }
}
