use hypersonic_ascent::ascent_propulsion::{
    EjectorRamjet, EngineMode, EnginePerformance, PropulsionManager, PropulsionSystem, Ramjet,
    Rocket, Scramjet, Turbojet,
};
use hypersonic_ascent::ascent_vehicle::MassModel;
use hypersonic_ascent::{FlightPlan, PlaneDesign, Vehicle, Waypoint};

fn every_variant() -> Vec<Box<dyn PropulsionSystem>> {
    vec![
        Box::new(EjectorRamjet::new(4)),
        Box::new(Turbojet::new(4)),
        Box::new(Ramjet::new(150.0)),
        Box::new(Scramjet::new(150.0)),
        Box::new(Rocket::new(2)),
    ]
}

#[test]
fn engines_are_silent_outside_their_envelopes() {
    let altitudes = [0.0, 25_000.0, 60_000.0, 120_000.0, 200_000.0, 300_000.0, 3.0e6];
    let machs = [0.0, 0.5, 2.0, 3.4, 5.0, 10.0, 17.0, 25.0, 35.0];
    for engine in every_variant() {
        let envelope = engine.envelope();
        for &alt in &altitudes {
            for &mach in &machs {
                let inside = envelope.contains(alt, mach);
                assert_eq!(
                    engine.can_operate(alt, mach),
                    inside,
                    "{} at {alt} ft M{mach}",
                    engine.name()
                );
                if !inside {
                    assert_eq!(engine.performance(alt, mach), EnginePerformance::ZERO);
                    assert_eq!(engine.efficiency(alt, mach), 0.0);
                }
            }
        }
    }
}

#[test]
fn outputs_are_never_negative() {
    for engine in every_variant() {
        for step in 0..=60 {
            let mach = 0.5 * f64::from(step);
            for alt in [0.0, 40_000.0, 90_000.0, 180_000.0, 500_000.0] {
                let perf = engine.performance(alt, mach);
                assert!(perf.thrust_n >= 0.0 && perf.propellant_flow_kg_s >= 0.0);
                let eff = engine.efficiency(alt, mach);
                assert!((0.0..=1.0).contains(&eff), "{} efficiency {eff}", engine.name());
            }
        }
    }
}

#[test]
fn air_breathers_beat_the_rocket_on_specific_impulse() {
    let rocket = Rocket::new(1).performance(100_000.0, 6.0).specific_impulse_s();
    let ramjet = Ramjet::new(100.0).performance(80_000.0, 4.0).specific_impulse_s();
    let scramjet = Scramjet::new(100.0).performance(150_000.0, 9.0).specific_impulse_s();
    assert!(rocket > 400.0 && rocket < 460.0, "rocket isp {rocket}");
    assert!(ramjet > 5.0 * rocket, "ramjet isp {ramjet}");
    assert!(scramjet > 3.0 * rocket, "scramjet isp {scramjet}");
}

#[test]
fn sized_vehicle_walks_through_every_regime() {
    let mut plan = FlightPlan::new();
    plan.push(Waypoint::new(400_000.0, 20.0, EngineMode::Auto));
    let vehicle = Vehicle::from_volume(3_000.0, &plan, &PlaneDesign::default());
    let installed: Vec<_> = vehicle.propulsion().engines().map(|(mode, _)| mode).collect();
    assert_eq!(installed, EngineMode::CONCRETE.to_vec());

    let mut manager = vehicle.propulsion();
    let schedule = [
        (0.0, 0.3, EngineMode::Jet),
        (60_000.0, 4.5, EngineMode::Ramjet),
        (150_000.0, 9.0, EngineMode::Scramjet),
        (400_000.0, 20.0, EngineMode::Rocket),
    ];
    for (alt, mach, expected) in schedule {
        manager.update(alt, mach);
        assert_eq!(manager.current_mode(), expected, "at {alt} ft M{mach}");
        assert!(manager.thrust(alt, mach) > 0.0);
    }
}

/// First engine with the strictly highest positive efficiency, computed from the registry.
fn first_best(manager: &PropulsionManager, alt: f64, mach: f64) -> Option<EngineMode> {
    let mut best: Option<(EngineMode, f64)> = None;
    for (mode, engine) in manager.engines() {
        let score = engine.efficiency(alt, mach);
        if score > 0.0 && best.is_none_or(|(_, s)| score > s) {
            best = Some((mode, score));
        }
    }
    best.map(|(mode, _)| mode)
}

#[test]
fn auto_selection_tracks_the_efficiency_argmax_everywhere() {
    let mut plan = FlightPlan::new();
    plan.push(Waypoint::new(400_000.0, 20.0, EngineMode::Auto));
    let design = PlaneDesign::default();
    for mass_model in [MassModel::default(), MassModel::with_turbojets()] {
        let vehicle = Vehicle::from_volume_with(&mass_model, 3_000.0, &plan, &design);
        let mut sweeping = vehicle.propulsion();
        let mut previous = EngineMode::Auto;
        for alt_step in 0..=40 {
            let alt = 10_000.0 * f64::from(alt_step);
            for mach_step in 0..=60 {
                let mach = 0.5 * f64::from(mach_step);
                let expected = first_best(&sweeping, alt, mach);

                let mut fresh = vehicle.propulsion();
                fresh.update(alt, mach);
                assert_eq!(
                    fresh.current_mode(),
                    expected.unwrap_or(EngineMode::Auto),
                    "fresh manager at {alt} ft M{mach}"
                );

                sweeping.update(alt, mach);
                let current = expected.unwrap_or(previous);
                assert_eq!(sweeping.current_mode(), current, "sweep at {alt} ft M{mach}");
                previous = current;
            }
        }
    }
}
