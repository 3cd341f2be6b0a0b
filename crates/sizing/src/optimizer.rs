//! Newton-Raphson search for the vehicle length whose tank capacity matches the mission's needs.

use ascent_core::design::PlaneDesign;
use ascent_vehicle::{FlightPlan, MassModel, PlanError, Vehicle};
use log::{debug, info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::estimate::{FuelEstimator, MissionFuelEstimate};

/// Length/volume pair the cube-law scaling is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceGeometry {
    pub length_m: f64,
    pub volume_m3: f64,
}

impl ReferenceGeometry {
    /// Internal volume at length `length_m` under uniform scaling.
    pub fn volume_at(&self, length_m: f64) -> f64 {
        self.volume_m3 * (length_m / self.length_m).powi(3)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizingSettings {
    pub initial_length_m: f64,
    pub min_length_m: f64,
    pub max_length_m: f64,
    /// Convergence threshold on |error| relative to dry mass.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for SizingSettings {
    fn default() -> Self {
        Self {
            initial_length_m: 100.0,
            min_length_m: 10.0,
            max_length_m: 300.0,
            tolerance: 1e-3,
            max_iterations: 50,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SizingError {
    #[error("reference geometry must have positive length and volume")]
    InvalidReferenceGeometry,
    #[error("length bounds must satisfy 0 < min < max (got {min} .. {max})")]
    InvalidBounds { min: f64, max: f64 },
    #[error("initial length must be finite")]
    InvalidInitialLength,
    #[error("tolerance must be positive and at least one iteration allowed")]
    InvalidTermination,
    #[error("invalid flight plan: {0}")]
    InvalidPlan(#[from] PlanError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub optimal_length_m: f64,
    pub optimal_volume_m3: f64,
    pub fuel_capacity_kg: f64,
    pub fuel_required_kg: f64,
    pub dry_mass_kg: f64,
    pub converged: bool,
    pub iterations: usize,
    pub length_history: Vec<f64>,
    pub error_history: Vec<f64>,
}

/// Fuel balance at one candidate length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balance {
    pub length_m: f64,
    pub volume_m3: f64,
    pub dry_mass_kg: f64,
    pub fuel_capacity_kg: f64,
    pub fuel_required_kg: f64,
}

impl Balance {
    /// Capacity minus requirement; positive when the tank is larger than needed.
    pub fn error(&self) -> f64 {
        self.fuel_capacity_kg - self.fuel_required_kg
    }
}

/// Sizes a vehicle by scaling a reference geometry.
#[derive(Debug, Clone)]
pub struct SizingOptimizer<E = MissionFuelEstimate> {
    geometry: ReferenceGeometry,
    settings: SizingSettings,
    mass_model: MassModel,
    estimator: E,
}

impl SizingOptimizer<MissionFuelEstimate> {
    pub fn new(geometry: ReferenceGeometry, settings: SizingSettings) -> Self {
        Self::with_estimator(geometry, settings, MissionFuelEstimate::new())
    }
}

impl<E: FuelEstimator> SizingOptimizer<E> {
    pub fn with_estimator(
        geometry: ReferenceGeometry,
        settings: SizingSettings,
        estimator: E,
    ) -> Self {
        Self {
            geometry,
            settings,
            mass_model: MassModel::default(),
            estimator,
        }
    }

    pub fn with_mass_model(mut self, mass_model: MassModel) -> Self {
        self.mass_model = mass_model;
        self
    }

    pub fn settings(&self) -> &SizingSettings {
        &self.settings
    }

    fn check_settings(&self) -> Result<(), SizingError> {
        let g = &self.geometry;
        if !(g.length_m > 0.0 && g.volume_m3 > 0.0)
            || !g.length_m.is_finite()
            || !g.volume_m3.is_finite()
        {
            return Err(SizingError::InvalidReferenceGeometry);
        }
        let s = &self.settings;
        if !(s.min_length_m > 0.0 && s.min_length_m < s.max_length_m)
            || !s.max_length_m.is_finite()
        {
            return Err(SizingError::InvalidBounds {
                min: s.min_length_m,
                max: s.max_length_m,
            });
        }
        if !s.initial_length_m.is_finite() {
            return Err(SizingError::InvalidInitialLength);
        }
        if !(s.tolerance > 0.0) || s.max_iterations == 0 {
            return Err(SizingError::InvalidTermination);
        }
        Ok(())
    }

    /// Size a vehicle of length `length_m` for `plan` and compare its tank with the estimate.
    pub fn balance(&self, plan: &FlightPlan, design: &PlaneDesign, length_m: f64) -> Balance {
        let volume_m3 = self.geometry.volume_at(length_m);
        let vehicle = Vehicle::from_volume_with(&self.mass_model, volume_m3, plan, design);
        let estimate = self.estimator.estimate(plan, &vehicle);
        Balance {
            length_m,
            volume_m3,
            dry_mass_kg: vehicle.dry_mass_kg,
            fuel_capacity_kg: vehicle.fuel_capacity_kg,
            fuel_required_kg: estimate.fuel_required_kg,
        }
    }

    /// Find the length at which fuel capacity equals the fuel required.
    ///
    /// Newton steps use a forward-difference derivative and are clamped to the length bounds.
    /// A bracket on the root is maintained from the sign of the error, and the iteration
    /// bisects it whenever the derivative is degenerate or the Newton step leaves it.
    pub fn optimize_length(
        &self,
        plan: &FlightPlan,
        design: &PlaneDesign,
    ) -> Result<OptimizationResult, SizingError> {
        self.check_settings()?;
        plan.validate_for(self.mass_model.low_speed_kind)?;

        let s = &self.settings;
        let (mut lo, mut hi) = (s.min_length_m, s.max_length_m);
        let mut length = s.initial_length_m.clamp(lo, hi);
        let mut length_history = Vec::new();
        let mut error_history = Vec::new();
        let mut converged = false;
        let mut last = self.balance(plan, design, length);

        for iteration in 1..=s.max_iterations {
            if iteration > 1 {
                last = self.balance(plan, design, length);
            }
            let error = last.error();
            length_history.push(length);
            error_history.push(error);
            debug!(
                "sizing iteration {iteration}: L={length:.3} m error={error:.1} kg dry={:.0} kg",
                last.dry_mass_kg
            );

            if error.abs() < s.tolerance * last.dry_mass_kg {
                converged = true;
                break;
            }
            if error > 0.0 {
                hi = length;
            } else {
                lo = length;
            }

            let step = (1e-3 * length).max(1e-3);
            let derivative = (self.balance(plan, design, length + step).error() - error) / step;
            let newton = (length - error / derivative).clamp(s.min_length_m, s.max_length_m);
            let usable = derivative.is_finite()
                && derivative.abs() > f64::EPSILON * error.abs().max(1.0)
                && newton.is_finite()
                && newton > lo
                && newton < hi;
            length = if usable { newton } else { 0.5 * (lo + hi) };
        }

        let iterations = length_history.len();
        if converged {
            info!(
                "sizing converged in {iterations} iterations: L={:.2} m, V={:.0} m³, fuel={:.0} kg",
                last.length_m, last.volume_m3, last.fuel_capacity_kg
            );
        } else {
            warn!(
                "sizing did not converge after {iterations} iterations (last L={:.2} m, error={:.1} kg)",
                last.length_m,
                last.error()
            );
        }

        Ok(OptimizationResult {
            optimal_length_m: last.length_m,
            optimal_volume_m3: last.volume_m3,
            fuel_capacity_kg: last.fuel_capacity_kg,
            fuel_required_kg: last.fuel_required_kg,
            dry_mass_kg: last.dry_mass_kg,
            converged,
            iterations,
            length_history,
            error_history,
        })
    }
}
