//! Vehicle sizing: a closed-form mission fuel estimate and the length optimizer built on it.

pub mod estimate;
pub mod optimizer;

pub use estimate::{
    FuelEstimate, FuelEstimator, MissionFuelEstimate, PropellantRequirement, SegmentEstimate,
};
pub use optimizer::{
    Balance, OptimizationResult, ReferenceGeometry, SizingError, SizingOptimizer, SizingSettings,
};
