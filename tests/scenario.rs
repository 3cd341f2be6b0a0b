use std::io::Write;

use hypersonic_ascent::ascent_flight::SettingsError;
use hypersonic_ascent::ascent_propulsion::LowSpeedKind;
use hypersonic_ascent::ascent_vehicle::PlanError;
use hypersonic_ascent::scenario::{self, ScenarioError};
use hypersonic_ascent::{CancellationToken, EngineMode};

#[test]
fn reference_scenarios_load_and_convert() {
    let scenarios = scenario::load("data/scenarios/ascent.yaml").expect("scenario yaml");
    assert_eq!(scenarios.len(), 3);

    let ejector = &scenarios[0];
    assert_eq!(ejector.name, "manual-ejector");
    assert_eq!(ejector.plan.len(), 5);
    assert_eq!(ejector.plan.waypoints()[1].engine_mode, EngineMode::Jet);
    assert_eq!(ejector.mass_model.low_speed_kind, LowSpeedKind::EjectorRamjet);

    let turbojet = &scenarios[1];
    assert_eq!(turbojet.mass_model.low_speed_kind, LowSpeedKind::Turbojet);
    assert_eq!(turbojet.plan.waypoints()[1].max_g, 2.5);
    assert_eq!(turbojet.sizing.initial_length_m, 80.0);
    assert_eq!(turbojet.sizing.max_iterations, 50);

    let swept = &scenarios[2];
    assert_eq!(swept.design.sweep_angle_deg, 60.0);
    assert!(swept.plan.waypoints().iter().all(|wp| wp.engine_mode.is_auto()));
    assert_eq!(swept.mission.simulation.max_segment_duration_s, 600.0);
    assert_eq!(swept.mission.simulation.time_step_s, 0.1);
}

#[test]
fn reference_scenario_flies_and_sizes() {
    let scenarios = scenario::load("data/scenarios/ascent.yaml").unwrap();
    let ejector = &scenarios[0];

    let vehicle = ejector.reference_vehicle();
    assert!((vehicle.volume_m3 - 3_000.0).abs() < 1e-9);
    let result = ejector.run_mission(&CancellationToken::new()).unwrap();
    assert!(result.success);
    assert!(result.total_fuel_used_kg > 0.0);

    let sized = ejector.optimize().unwrap();
    assert!(sized.converged);
    assert!(sized.optimal_length_m < ejector.geometry.length_m);
}

#[test]
fn plan_outside_engine_envelope_is_rejected() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(
        br#"
- name: fast-jet
  geometry: { reference_length_m: 60.0, reference_volume_m3: 3000.0 }
  waypoints:
    - { altitude_ft: 30000, mach: 9.0, engine: jet }
"#,
    )
    .unwrap();
    let err = scenario::load(file.path()).unwrap_err();
    match err {
        ScenarioError::Plan { name, source } => {
            assert_eq!(name, "fast-jet");
            assert!(matches!(source, PlanError::OutsideEnvelope { index: 1, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn stalled_integrator_settings_are_rejected() {
    let cases = [
        ("0.0", "1000.0"),
        ("-0.1", "1000.0"),
        (".nan", "1000.0"),
        ("0.1", ".inf"),
    ];
    for (step, duration) in cases {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            r#"
- name: frozen
  geometry: {{ reference_length_m: 60.0, reference_volume_m3: 3000.0 }}
  simulation: {{ time_step_s: {step}, max_segment_duration_s: {duration} }}
  waypoints:
    - {{ altitude_ft: 30000, mach: 0.8, engine: jet }}
"#
        )
        .unwrap();
        match scenario::load(file.path()) {
            Err(ScenarioError::Simulation { name, source }) => {
                assert_eq!(name, "frozen");
                assert!(matches!(source, SettingsError::NotPositive { .. }), "{source}");
            }
            other => panic!("dt = {step}, duration = {duration}: {other:?}"),
        }
    }
}

#[test]
fn degenerate_geometry_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("flat.toml"),
        "name = \"flat\"\n\n[geometry]\nreference_length_m = 0.0\nreference_volume_m3 = 3000.0\n\n[[waypoints]]\naltitude_ft = 30000.0\nmach = 0.8\n",
    )
    .unwrap();
    assert!(matches!(
        scenario::load(dir.path()),
        Err(ScenarioError::InvalidGeometry(name)) if name == "flat"
    ));
}

#[test]
fn missing_file_surfaces_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");
    assert!(matches!(scenario::load(&missing), Err(ScenarioError::Config(_))));
}
