//! Waypoints and the ordered flight plan that strings them into segments.

use ascent_propulsion::{EngineMode, LowSpeedKind, nominal_envelope};
use thiserror::Error;

/// Default acceleration ceiling for a waypoint, in multiples of g0.
pub const DEFAULT_MAX_G: f64 = 3.0;

/// Target state at the end of a flight segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub altitude_ft: f64,
    pub mach: f64,
    pub engine_mode: EngineMode,
    /// Acceleration ceiling while flying toward this waypoint (g0 multiples).
    pub max_g: f64,
}

impl Waypoint {
    pub fn new(altitude_ft: f64, mach: f64, engine_mode: EngineMode) -> Self {
        Self {
            altitude_ft,
            mach,
            engine_mode,
            max_g: DEFAULT_MAX_G,
        }
    }

    pub fn with_max_g(mut self, max_g: f64) -> Self {
        self.max_g = max_g;
        self
    }

    /// Stationary on the runway with automatic engine selection.
    pub fn ground() -> Self {
        Self::new(0.0, 0.0, EngineMode::Auto)
    }

    fn is_ground(&self) -> bool {
        self.altitude_ft == 0.0 && self.mach == 0.0 && self.engine_mode.is_auto()
    }
}

/// Problems detected while editing or validating a [`FlightPlan`].
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("the ground waypoint at index 0 cannot be replaced or removed")]
    ProtectedGroundWaypoint,
    #[error("waypoint index {index} out of range for plan of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("waypoint {index}: altitude and Mach must be finite")]
    NonFinite { index: usize },
    #[error("waypoint {index}: altitude {altitude_ft} ft is negative")]
    NegativeAltitude { index: usize, altitude_ft: f64 },
    #[error("waypoint {index}: Mach {mach} is negative")]
    NegativeMach { index: usize, mach: f64 },
    #[error("waypoint {index}: max_g must be positive (got {max_g})")]
    NonPositiveMaxG { index: usize, max_g: f64 },
    #[error("first waypoint must be on the ground at rest with automatic engine selection")]
    MissingGroundStart,
    #[error("waypoint {index}: {mode} cannot operate at {altitude_ft} ft, Mach {mach}")]
    OutsideEnvelope {
        index: usize,
        mode: EngineMode,
        altitude_ft: f64,
        mach: f64,
    },
}

/// Ordered waypoints, always starting from the ground.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightPlan {
    waypoints: Vec<Waypoint>,
}

impl Default for FlightPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightPlan {
    /// A plan holding only the ground waypoint.
    pub fn new() -> Self {
        Self {
            waypoints: vec![Waypoint::ground()],
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn push(&mut self, waypoint: Waypoint) {
        self.waypoints.push(waypoint);
    }

    pub fn insert(&mut self, index: usize, waypoint: Waypoint) -> Result<(), PlanError> {
        if index == 0 {
            return Err(PlanError::ProtectedGroundWaypoint);
        }
        if index > self.waypoints.len() {
            return Err(PlanError::IndexOutOfRange {
                index,
                len: self.waypoints.len(),
            });
        }
        self.waypoints.insert(index, waypoint);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Waypoint, PlanError> {
        if index == 0 {
            return Err(PlanError::ProtectedGroundWaypoint);
        }
        if index >= self.waypoints.len() {
            return Err(PlanError::IndexOutOfRange {
                index,
                len: self.waypoints.len(),
            });
        }
        Ok(self.waypoints.remove(index))
    }

    /// Consecutive `(from, to)` waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (&Waypoint, &Waypoint)> {
        self.waypoints.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    /// Validate against the default low-speed installation.
    pub fn validate(&self) -> Result<(), PlanError> {
        self.validate_for(LowSpeedKind::default())
    }

    /// Eagerly reject plans the simulator cannot fly.
    pub fn validate_for(&self, low_speed: LowSpeedKind) -> Result<(), PlanError> {
        match self.waypoints.first() {
            Some(first) if first.is_ground() => {}
            _ => return Err(PlanError::MissingGroundStart),
        }
        for (index, wp) in self.waypoints.iter().enumerate() {
            if !wp.altitude_ft.is_finite() || !wp.mach.is_finite() {
                return Err(PlanError::NonFinite { index });
            }
            if wp.altitude_ft < 0.0 {
                return Err(PlanError::NegativeAltitude {
                    index,
                    altitude_ft: wp.altitude_ft,
                });
            }
            if wp.mach < 0.0 {
                return Err(PlanError::NegativeMach {
                    index,
                    mach: wp.mach,
                });
            }
            if !(wp.max_g > 0.0) {
                return Err(PlanError::NonPositiveMaxG {
                    index,
                    max_g: wp.max_g,
                });
            }
            if let Some(envelope) = nominal_envelope(wp.engine_mode, low_speed) {
                if !envelope.contains(wp.altitude_ft, wp.mach) {
                    return Err(PlanError::OutsideEnvelope {
                        index,
                        mode: wp.engine_mode,
                        altitude_ft: wp.altitude_ft,
                        mach: wp.mach,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> FlightPlan {
        let mut plan = FlightPlan::new();
        plan.push(Waypoint::new(30_000.0, 2.0, EngineMode::Jet));
        plan.push(Waypoint::new(120_000.0, 6.0, EngineMode::Ramjet));
        plan
    }

    #[test]
    fn new_plan_starts_on_the_ground() {
        let plan = FlightPlan::new();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.waypoints()[0], Waypoint::ground());
        assert!(plan.validate().is_ok());
        assert_eq!(plan.segments().count(), 0);
    }

    #[test]
    fn index_zero_is_protected() {
        let mut plan = sample_plan();
        assert_eq!(
            plan.insert(0, Waypoint::ground()),
            Err(PlanError::ProtectedGroundWaypoint)
        );
        assert_eq!(plan.remove(0), Err(PlanError::ProtectedGroundWaypoint));
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn insert_and_remove_interior_waypoints() {
        let mut plan = sample_plan();
        let extra = Waypoint::new(60_000.0, 3.0, EngineMode::Auto);
        plan.insert(2, extra).unwrap();
        assert_eq!(plan.waypoints()[2], extra);
        assert_eq!(plan.remove(2).unwrap(), extra);
        assert_eq!(
            plan.remove(7),
            Err(PlanError::IndexOutOfRange { index: 7, len: 3 })
        );
        let pairs: Vec<_> = plan.segments().map(|(a, b)| (a.mach, b.mach)).collect();
        assert_eq!(pairs, vec![(0.0, 2.0), (2.0, 6.0)]);
    }

    #[test]
    fn validation_rejects_bad_waypoints() {
        let mut plan = FlightPlan::new();
        plan.push(Waypoint::new(-5.0, 1.0, EngineMode::Auto));
        assert!(matches!(
            plan.validate(),
            Err(PlanError::NegativeAltitude { index: 1, .. })
        ));

        let mut plan = FlightPlan::new();
        plan.push(Waypoint::new(10_000.0, f64::NAN, EngineMode::Auto));
        assert_eq!(plan.validate(), Err(PlanError::NonFinite { index: 1 }));

        let mut plan = FlightPlan::new();
        plan.push(Waypoint::new(10_000.0, 1.0, EngineMode::Auto).with_max_g(0.0));
        assert!(matches!(
            plan.validate(),
            Err(PlanError::NonPositiveMaxG { index: 1, .. })
        ));
    }

    #[test]
    fn manual_mode_must_cover_its_target() {
        let mut plan = FlightPlan::new();
        plan.push(Waypoint::new(20_000.0, 8.0, EngineMode::Ramjet));
        assert!(matches!(
            plan.validate(),
            Err(PlanError::OutsideEnvelope {
                index: 1,
                mode: EngineMode::Ramjet,
                ..
            })
        ));
        // Jet at Mach 3.3 is fine for the ejector ramjet but not for a turbojet.
        let mut plan = FlightPlan::new();
        plan.push(Waypoint::new(50_000.0, 3.3, EngineMode::Jet));
        assert!(plan.validate().is_ok());
        assert!(plan.validate_for(LowSpeedKind::Turbojet).is_err());
    }
}
