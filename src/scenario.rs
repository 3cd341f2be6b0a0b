//! Conversion of scenario configuration into runtime plans, vehicles, and solver settings.

use std::path::Path;

use ascent_config::{
    ConfigError, DesignConfig, EngineModeConfig, LowSpeedEngineConfig, ScenarioConfig,
    WaypointConfig, load_scenarios,
};
use ascent_core::design::PlaneDesign;
use ascent_flight::{
    CancellationToken, MissionError, MissionResult, MissionSettings, OrbitCriteria,
    SettingsError, SimulationSettings, simulate_mission,
};
use ascent_propulsion::EngineMode;
use ascent_sizing::{
    OptimizationResult, ReferenceGeometry, SizingError, SizingOptimizer, SizingSettings,
};
use ascent_vehicle::{FlightPlan, MassModel, PlanError, Vehicle, Waypoint};
use log::{debug, info};
use thiserror::Error;

/// Errors surfaced when loading or converting scenarios.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("scenario '{name}': {source}")]
    Plan { name: String, source: PlanError },
    #[error("scenario '{0}': reference geometry must be positive")]
    InvalidGeometry(String),
    #[error("scenario '{name}': {source}")]
    Simulation { name: String, source: SettingsError },
    #[error(transparent)]
    Mission(#[from] MissionError),
    #[error(transparent)]
    Sizing(#[from] SizingError),
}

/// A validated scenario ready to simulate or size.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub design: PlaneDesign,
    pub plan: FlightPlan,
    pub geometry: ReferenceGeometry,
    pub mass_model: MassModel,
    pub mission: MissionSettings,
    pub sizing: SizingSettings,
}

impl Scenario {
    /// Vehicle at the reference volume.
    pub fn reference_vehicle(&self) -> Vehicle {
        self.vehicle_with_volume(self.geometry.volume_m3)
    }

    pub fn vehicle_with_volume(&self, volume_m3: f64) -> Vehicle {
        Vehicle::from_volume_with(&self.mass_model, volume_m3, &self.plan, &self.design)
    }

    /// Fly the plan with the reference vehicle.
    pub fn run_mission(&self, cancel: &CancellationToken) -> Result<MissionResult, ScenarioError> {
        let vehicle = self.reference_vehicle();
        Ok(simulate_mission(
            &self.plan,
            &vehicle,
            &self.design,
            &self.mission,
            cancel,
        )?)
    }

    /// Solve for the length at which the tank just holds the mission's propellant.
    pub fn optimize(&self) -> Result<OptimizationResult, ScenarioError> {
        let optimizer = SizingOptimizer::new(self.geometry, self.sizing)
            .with_mass_model(self.mass_model);
        Ok(optimizer.optimize_length(&self.plan, &self.design)?)
    }
}

/// Load and convert every scenario found at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Scenario>, ScenarioError> {
    let path = path.as_ref();
    let scenarios = load_scenarios(path)?
        .iter()
        .map(from_config)
        .collect::<Result<Vec<_>, _>>()?;
    info!("loaded {} scenario(s) from {}", scenarios.len(), path.display());
    Ok(scenarios)
}

/// Convert a `ScenarioConfig` into a validated runtime [`Scenario`].
pub fn from_config(config: &ScenarioConfig) -> Result<Scenario, ScenarioError> {
    let geometry = ReferenceGeometry {
        length_m: config.geometry.reference_length_m,
        volume_m3: config.geometry.reference_volume_m3,
    };
    if !(geometry.length_m > 0.0 && geometry.volume_m3 > 0.0) {
        return Err(ScenarioError::InvalidGeometry(config.name.clone()));
    }

    let mass_model = match config.low_speed_engine {
        LowSpeedEngineConfig::EjectorRamjet => MassModel::default(),
        LowSpeedEngineConfig::Turbojet => MassModel::with_turbojets(),
    };

    let mut plan = FlightPlan::new();
    for wp in &config.waypoints {
        plan.push(waypoint_from_config(wp));
    }
    plan.validate_for(mass_model.low_speed_kind).map_err(|source| ScenarioError::Plan {
        name: config.name.clone(),
        source,
    })?;

    let mut simulation = SimulationSettings::default();
    if let Some(sim) = &config.simulation {
        if let Some(dt) = sim.time_step_s {
            simulation.time_step_s = dt;
        }
        if let Some(max) = sim.max_segment_duration_s {
            simulation.max_segment_duration_s = max;
        }
    }
    simulation.validate().map_err(|source| ScenarioError::Simulation {
        name: config.name.clone(),
        source,
    })?;

    let orbit = config.orbit.map_or_else(OrbitCriteria::default, |o| OrbitCriteria {
        altitude_m: o.altitude_m,
        mach: o.mach,
    });

    let mut sizing = SizingSettings::default();
    if let Some(cfg) = &config.sizing {
        sizing.initial_length_m = cfg.initial_length_m.unwrap_or(sizing.initial_length_m);
        sizing.min_length_m = cfg.min_length_m.unwrap_or(sizing.min_length_m);
        sizing.max_length_m = cfg.max_length_m.unwrap_or(sizing.max_length_m);
        sizing.tolerance = cfg.tolerance.unwrap_or(sizing.tolerance);
        sizing.max_iterations = cfg.max_iterations.unwrap_or(sizing.max_iterations);
    }

    debug!(
        "scenario '{}': {} waypoints, {:?} low-speed engine",
        config.name,
        plan.len(),
        mass_model.low_speed_kind
    );
    Ok(Scenario {
        name: config.name.clone(),
        design: design_from_config(&config.design),
        plan,
        geometry,
        mass_model,
        mission: MissionSettings { simulation, orbit },
        sizing,
    })
}

fn design_from_config(config: &DesignConfig) -> PlaneDesign {
    PlaneDesign::new(
        config.tilt_angle_deg,
        config.sweep_angle_deg,
        config.position,
    )
}

fn waypoint_from_config(config: &WaypointConfig) -> Waypoint {
    Waypoint::new(config.altitude_ft, config.mach, engine_mode(config.engine))
        .with_max_g(config.max_g)
}

fn engine_mode(config: EngineModeConfig) -> EngineMode {
    match config {
        EngineModeConfig::Auto => EngineMode::Auto,
        EngineModeConfig::Jet => EngineMode::Jet,
        EngineModeConfig::Ramjet => EngineMode::Ramjet,
        EngineModeConfig::Scramjet => EngineMode::Scramjet,
        EngineModeConfig::Rocket => EngineMode::Rocket,
    }
}

