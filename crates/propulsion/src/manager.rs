//! Engine selection: manual override or automatic best-efficiency choice.

use std::fmt;

use log::debug;

use crate::{EngineMode, EnginePerformance, EngineSizing, PropulsionSystem};

/// Selection policy currently in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManagerState {
    #[default]
    Auto,
    Manual(EngineMode),
}

impl fmt::Display for ManagerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerState::Auto => write!(f, "auto"),
            ManagerState::Manual(mode) => write!(f, "manual({mode})"),
        }
    }
}

/// Owns the installed engines and routes thrust queries to the selected one.
#[derive(Debug, Default)]
pub struct PropulsionManager {
    engines: Vec<(EngineMode, Box<dyn PropulsionSystem>)>,
    state: ManagerState,
    /// Index of the engine chosen by the last automatic update.
    auto_choice: Option<usize>,
}

impl PropulsionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default installation for the given sizing: Jet, Ramjet, Scramjet, Rocket.
    pub fn standard(sizing: &EngineSizing) -> Self {
        Self {
            engines: sizing.build(),
            ..Self::default()
        }
    }

    /// Append an engine. Registration order breaks efficiency ties.
    pub fn register(&mut self, mode: EngineMode, engine: Box<dyn PropulsionSystem>) {
        self.engines.push((mode, engine));
    }

    pub fn engines(&self) -> impl Iterator<Item = (EngineMode, &dyn PropulsionSystem)> {
        self.engines.iter().map(|(mode, engine)| (*mode, engine.as_ref()))
    }

    pub fn state(&self) -> ManagerState {
        self.state
    }

    pub fn set_manual_engine(&mut self, mode: EngineMode) {
        if mode.is_auto() {
            self.enable_auto_mode();
        } else {
            self.state = ManagerState::Manual(mode);
        }
    }

    pub fn enable_auto_mode(&mut self) {
        self.state = ManagerState::Auto;
    }

    /// Re-select the engine for the current flight condition. No-op in manual mode.
    pub fn update(&mut self, altitude_ft: f64, mach: f64) {
        if self.state != ManagerState::Auto {
            return;
        }
        let mut best: Option<(usize, f64)> = None;
        for (index, (_, engine)) in self.engines.iter().enumerate() {
            let score = engine.efficiency(altitude_ft, mach);
            if score > best.map_or(0.0, |(_, s)| s) {
                best = Some((index, score));
            }
        }
        if let Some((index, score)) = best {
            if self.auto_choice != Some(index) {
                debug!(
                    "auto engine switch at {altitude_ft:.0} ft, M{mach:.2}: {} -> {} (efficiency {score:.3})",
                    self.auto_choice.map_or("none", |i| self.engines[i].1.name()),
                    self.engines[index].1.name(),
                );
            }
            self.auto_choice = Some(index);
        }
    }

    fn selected(&self) -> Option<&(EngineMode, Box<dyn PropulsionSystem>)> {
        match self.state {
            ManagerState::Auto => self.auto_choice.and_then(|i| self.engines.get(i)),
            ManagerState::Manual(mode) => self.engines.iter().find(|(m, _)| *m == mode),
        }
    }

    /// Mode currently in use. In manual mode this is the override even when that engine is
    /// not installed; in auto mode before any selection it is [`EngineMode::Auto`].
    pub fn current_mode(&self) -> EngineMode {
        match self.state {
            ManagerState::Manual(mode) => mode,
            ManagerState::Auto => self
                .auto_choice
                .and_then(|i| self.engines.get(i))
                .map_or(EngineMode::Auto, |(mode, _)| *mode),
        }
    }

    pub fn current_engine(&self) -> Option<&dyn PropulsionSystem> {
        self.selected().map(|(_, engine)| engine.as_ref())
    }

    pub fn performance(&self, altitude_ft: f64, mach: f64) -> EnginePerformance {
        self.current_engine()
            .map_or(EnginePerformance::ZERO, |engine| engine.performance(altitude_ft, mach))
    }

    pub fn thrust(&self, altitude_ft: f64, mach: f64) -> f64 {
        self.performance(altitude_ft, mach).thrust_n
    }

    pub fn fuel_consumption(&self, altitude_ft: f64, mach: f64) -> f64 {
        self.performance(altitude_ft, mach).propellant_flow_kg_s
    }
}
