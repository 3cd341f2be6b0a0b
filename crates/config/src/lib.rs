//! Configuration models and loaders for hypersonic ascent scenarios.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// A mission scenario: vehicle geometry, planform, and the flight plan to fly.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub name: String,
    #[serde(default)]
    pub design: DesignConfig,
    pub geometry: GeometryConfig,
    /// Waypoints after the implicit ground start.
    pub waypoints: Vec<WaypointConfig>,
    #[serde(default)]
    pub simulation: Option<SimulationConfig>,
    #[serde(default)]
    pub sizing: Option<SizingConfig>,
    #[serde(default)]
    pub orbit: Option<OrbitConfig>,
    #[serde(default)]
    pub low_speed_engine: LowSpeedEngineConfig,
}

/// Planform parameters.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct DesignConfig {
    #[serde(default)]
    pub tilt_angle_deg: f64,
    #[serde(default = "default_sweep")]
    pub sweep_angle_deg: f64,
    #[serde(default = "default_position")]
    pub position: f64,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            tilt_angle_deg: 0.0,
            sweep_angle_deg: default_sweep(),
            position: default_position(),
        }
    }
}

/// Reference vehicle geometry. `volume_m3` is the internal volume at `reference_length_m`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct GeometryConfig {
    pub reference_length_m: f64,
    pub reference_volume_m3: f64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct WaypointConfig {
    pub altitude_ft: f64,
    pub mach: f64,
    #[serde(default)]
    pub engine: EngineModeConfig,
    #[serde(default = "default_max_g")]
    pub max_g: f64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineModeConfig {
    #[default]
    Auto,
    Jet,
    Ramjet,
    Scramjet,
    Rocket,
}

/// Which engine serves the low-speed regime.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LowSpeedEngineConfig {
    #[default]
    EjectorRamjet,
    Turbojet,
}

/// Optional integrator overrides.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct SimulationConfig {
    #[serde(default)]
    pub time_step_s: Option<f64>,
    #[serde(default)]
    pub max_segment_duration_s: Option<f64>,
}

/// Optional optimizer overrides.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct SizingConfig {
    #[serde(default)]
    pub initial_length_m: Option<f64>,
    #[serde(default)]
    pub min_length_m: Option<f64>,
    #[serde(default)]
    pub max_length_m: Option<f64>,
    #[serde(default)]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub max_iterations: Option<usize>,
}

/// Orbital success thresholds.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct OrbitConfig {
    pub altitude_m: f64,
    pub mach: f64,
}

fn default_sweep() -> f64 {
    45.0
}

fn default_position() -> f64 {
    0.5
}

fn default_max_g() -> f64 {
    3.0
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load scenarios from a YAML list, a single TOML file, or a directory of TOML files.
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<ScenarioConfig>, ConfigError> {
    load_records(path)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}
